// Zenoh command bridge with watchdog
// Remote programs publish MotorCommands; each one is applied to the motor layer as it arrives.
// If the publisher goes quiet while motors are running, the watchdog stops them.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use tokio::time::interval;
use tracing::{info, warn};

use crate::config::{CMD_TIMEOUT, LOOP_HZ, TOPIC_CMD_MOTOR, TOPIC_HEALTH};
use crate::messages::{MotorCommand, RuntimeHealth};
use crate::motor::{self, OutPort, TachoMotors};

pub struct Runtime {
    motors: TachoMotors,
    running: BTreeSet<OutPort>,
    cmd_received_at: Option<Instant>,
    health: RuntimeHealth,
}

impl Runtime {
    pub fn new(motors: TachoMotors) -> Self {
        Self {
            motors,
            running: BTreeSet::new(),
            cmd_received_at: None,
            health: RuntimeHealth::CmdStale, // Start stale until first cmd
        }
    }

    pub fn health(&self) -> RuntimeHealth {
        self.health
    }

    /// Ports this runtime has started and not yet stopped
    pub fn running(&self) -> impl Iterator<Item = OutPort> + '_ {
        self.running.iter().copied()
    }

    /// Apply one command to the motors
    pub fn on_command(&mut self, cmd: MotorCommand, now: Instant) -> motor::Result<()> {
        info!("Received command for {}: {:?}", cmd.port(), &cmd);
        self.cmd_received_at = Some(now);

        let result = match cmd {
            MotorCommand::Run { port, speed } => self.motors.run(port, speed).map(|()| {
                self.running.insert(port);
            }),
            MotorCommand::Stop { port } => self.motors.stop(port).map(|()| {
                self.running.remove(&port);
            }),
            MotorCommand::Regulation { port, enabled: true } => {
                self.motors.enable_regulation_mode(port)
            }
            MotorCommand::Regulation { port, enabled: false } => {
                self.motors.disable_regulation_mode(port)
            }
            MotorCommand::Brake { port, enabled: true } => self.motors.enable_brake_mode(port),
            MotorCommand::Brake { port, enabled: false } => self.motors.disable_brake_mode(port),
        };

        match &result {
            Ok(()) => self.health = RuntimeHealth::Ok,
            Err(e) => {
                warn!("Command failed: {}", e);
                self.health = RuntimeHealth::MotorFault;
            }
        }
        result
    }

    /// Stop running motors if commands have gone stale. Returns the ports stopped.
    pub fn check_watchdog(&mut self, now: Instant) -> Vec<OutPort> {
        let stale = match self.cmd_received_at {
            Some(at) => now.saturating_duration_since(at) > CMD_TIMEOUT,
            None => true,
        };
        if !stale {
            return Vec::new();
        }

        if self.health == RuntimeHealth::Ok && !self.running.is_empty() {
            warn!("Commands stale, stopping {} motor(s)", self.running.len());
        }
        self.health = RuntimeHealth::CmdStale;
        self.stop_all()
    }

    /// Stop every motor this runtime started. Ports that fail to stop are
    /// dropped from the running set as well.
    pub fn stop_all(&mut self) -> Vec<OutPort> {
        let ports: Vec<OutPort> = std::mem::take(&mut self.running).into_iter().collect();
        for &port in &ports {
            if let Err(e) = self.motors.stop(port) {
                warn!("Failed to stop {} motor: {}", port, e);
            }
        }
        ports
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        // Leave nothing running behind, whichever way the bridge exits
        if !self.running.is_empty() {
            warn!("Runtime dropped with motors running, stopping them");
            self.stop_all();
        }
    }
}

pub async fn run(motors: TachoMotors) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default()).await?;

    info!("Setting up publishers and subscribers...");
    let subscriber = session.declare_subscriber(TOPIC_CMD_MOTOR).await?;
    let pub_health = session.declare_publisher(TOPIC_HEALTH).await?;

    info!("Using motor class at {}", motors.root().display());
    let mut runtime = Runtime::new(motors);
    let mut tick = interval(Duration::from_millis(1000 / LOOP_HZ));

    info!(
        "Runtime started: {}Hz loop, {}ms watchdog timeout",
        LOOP_HZ,
        CMD_TIMEOUT.as_millis()
    );
    info!("Subscribed to: {}", TOPIC_CMD_MOTOR);
    info!("Publishing to: {}", TOPIC_HEALTH);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = tick.tick() => {}
            _ = &mut ctrl_c => {
                info!("Shutting down");
                break;
            }
        }

        // 1. Drain all pending commands (non-blocking), apply in order
        while let Ok(Some(sample)) = subscriber.try_recv() {
            let payload = sample.payload().to_bytes();
            match serde_json::from_slice::<MotorCommand>(&payload) {
                Ok(cmd) => {
                    // sysfs writes are short, blocking the task is fine here
                    // failures are logged and reflected in health
                    let _ = runtime.on_command(cmd, Instant::now());
                }
                Err(e) => {
                    warn!("Failed to parse command: {}", e);
                }
            }
        }

        // 2. Watchdog
        runtime.check_watchdog(Instant::now());

        // 3. Publish health. An error here drops `runtime`, which stops its motors.
        let health_json = serde_json::to_string(&runtime.health())?;
        pub_health.put(health_json).await?;
    }

    runtime.stop_all();
    Ok(())
}

// Keyboard teleop for a two-motor driving base (left on outB, right on outC)
// W/S forward/back, A/D spin, R/F speed, Q quit
//
// Usage: run `ev3-motor serve` on the brick, then
// cargo run --example teleop
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use ev3_motor_runtime::config::TOPIC_CMD_MOTOR;
use ev3_motor_runtime::logging;
use ev3_motor_runtime::messages::MotorCommand;
use ev3_motor_runtime::motor::OutPort;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::filter::LevelFilter;

const LEFT: OutPort = OutPort::B;
const RIGHT: OutPort = OutPort::C;
const SPEEDS: [i16; 3] = [20, 50, 80]; // duty cycle %
const INPUT_TIMEOUT_MS: u64 = 150; // Stop after this much time with no input

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(logging::env_filter(LevelFilter::INFO))
        .init();

    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default()).await?;
    let publisher = session.declare_publisher(TOPIC_CMD_MOTOR).await?;

    info!("Controls: W/S=drive, A/D=spin, R/F=speed, Q=quit");
    print_speed(0);

    enable_raw_mode()?;
    let result = run_teleop(&publisher).await;
    disable_raw_mode()?;

    // Leave the base stopped whatever happened above
    for port in [LEFT, RIGHT] {
        publish(&publisher, &MotorCommand::Stop { port }).await?;
    }

    result
}

async fn run_teleop(
    publisher: &zenoh::pubsub::Publisher<'_>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut speed_idx: usize = 0;

    // (left, right) duty cycle
    let mut drive: (i16, i16) = (0, 0);
    let mut last_movement_input = Instant::now();
    let mut moving = false;

    loop {
        // Poll for key with 20ms timeout
        if event::poll(Duration::from_millis(20))? {
            if let Event::Key(KeyEvent { code, kind, .. }) = event::read()? {
                let pressed = kind == KeyEventKind::Press || kind == KeyEventKind::Repeat;
                let speed = SPEEDS[speed_idx];

                match code {
                    KeyCode::Char('w') if pressed => {
                        drive = (speed, speed);
                        last_movement_input = Instant::now();
                    }
                    KeyCode::Char('s') if pressed => {
                        drive = (-speed, -speed);
                        last_movement_input = Instant::now();
                    }
                    KeyCode::Char('a') if pressed => {
                        drive = (-speed, speed);
                        last_movement_input = Instant::now();
                    }
                    KeyCode::Char('d') if pressed => {
                        drive = (speed, -speed);
                        last_movement_input = Instant::now();
                    }

                    // Speed control
                    KeyCode::Char('r') if pressed => {
                        speed_idx = (speed_idx + 1).min(SPEEDS.len() - 1);
                        print_speed(speed_idx);
                    }
                    KeyCode::Char('f') if pressed => {
                        speed_idx = speed_idx.saturating_sub(1);
                        print_speed(speed_idx);
                    }

                    // Quit
                    KeyCode::Char('q') | KeyCode::Esc if pressed => break,

                    _ => {}
                }
            }
        }

        if last_movement_input.elapsed() > Duration::from_millis(INPUT_TIMEOUT_MS) {
            drive = (0, 0);
        }

        if drive == (0, 0) {
            if moving {
                publish(publisher, &MotorCommand::Stop { port: LEFT }).await?;
                publish(publisher, &MotorCommand::Stop { port: RIGHT }).await?;
                moving = false;
            }
        } else {
            // Re-sent every cycle, which also keeps the runtime watchdog fed
            publish(publisher, &MotorCommand::Run { port: LEFT, speed: drive.0 }).await?;
            publish(publisher, &MotorCommand::Run { port: RIGHT, speed: drive.1 }).await?;
            moving = true;
        }
    }

    Ok(())
}

async fn publish(
    publisher: &zenoh::pubsub::Publisher<'_>,
    cmd: &MotorCommand,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    publisher.put(serde_json::to_string(cmd)?).await?;
    Ok(())
}

fn print_speed(idx: usize) {
    info!("Speed: {}%", SPEEDS[idx]);
}

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::filter::LevelFilter;

use ev3_motor_runtime::config::TACHO_MOTOR_ROOT;
use ev3_motor_runtime::logging;
use ev3_motor_runtime::messages::MotorState;
use ev3_motor_runtime::motor::{OutPort, TachoMotors};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Control EV3 tacho motors through the kernel driver
#[derive(Debug, Parser)]
#[command(name = "ev3-motor", version)]
struct Cli {
    /// tacho-motor class directory
    #[arg(long, env = "EV3_TACHO_ROOT", default_value = TACHO_MOTOR_ROOT)]
    sysfs_root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run a motor at SPEED (-100..=100)
    Run {
        port: OutPort,
        #[arg(allow_negative_numbers = true)]
        speed: i16,
    },
    /// Stop a motor
    Stop { port: OutPort },
    /// Print target speed and power
    Status {
        port: OutPort,
        #[arg(long)]
        json: bool,
    },
    /// Turn speed regulation on or off
    Regulation { port: OutPort, mode: Toggle },
    /// Brake (on) or coast (off) when stopping
    Brake { port: OutPort, mode: Toggle },
    /// List attached motors
    List,
    /// Bridge motor commands from zenoh
    Serve,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Toggle {
    On,
    Off,
}

#[tokio::main]
async fn main() {
    // Setup logging (set RUST_LOG=info or debug)
    tracing_subscriber::fmt()
        .with_env_filter(logging::env_filter(LevelFilter::INFO))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = execute(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn execute(cli: Cli) -> Result<(), BoxError> {
    let motors = TachoMotors::new(cli.sysfs_root);

    match cli.command {
        Command::Run { port, speed } => motors.run(port, speed)?,
        Command::Stop { port } => motors.stop(port)?,
        Command::Status { port, json } => {
            let motor = motors.find(port)?;
            let state = MotorState {
                port,
                duty_cycle_sp: motor.current_speed()?,
                power: motor.current_power()?,
            };
            if json {
                println!("{}", serde_json::to_string(&state)?);
            } else {
                println!(
                    "{}: speed {} power {}",
                    state.port, state.duty_cycle_sp, state.power
                );
            }
        }
        Command::Regulation { port, mode } => match mode {
            Toggle::On => motors.enable_regulation_mode(port)?,
            Toggle::Off => motors.disable_regulation_mode(port)?,
        },
        Command::Brake { port, mode } => match mode {
            Toggle::On => motors.enable_brake_mode(port)?,
            Toggle::Off => motors.disable_brake_mode(port)?,
        },
        Command::List => {
            let attached = motors.list()?;
            if attached.is_empty() {
                println!("No motors attached");
            }
            for motor in attached {
                println!("{}\t{}", motor.port(), motor.path().display());
            }
        }
        Command::Serve => ev3_motor_runtime::runtime::run(motors).await?,
    }

    Ok(())
}

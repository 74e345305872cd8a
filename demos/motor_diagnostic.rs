// Motor diagnostic: READ-ONLY listing of attached tacho motors
//
// This tool does NOT write anything to the motors - it's completely safe.
//
// Usage: cargo run --example motor_diagnostic -- [class root]
// Example: cargo run --example motor_diagnostic -- /sys/class/tacho-motor

use ev3_motor_runtime::config::TACHO_MOTOR_ROOT;
use ev3_motor_runtime::logging;
use ev3_motor_runtime::motor::{OutPort, TachoMotors};
use tracing_subscriber::filter::LevelFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Setup logging
    tracing_subscriber::fmt()
        .with_env_filter(logging::env_filter(LevelFilter::DEBUG))
        .init();

    // Get class root from args or use default
    let root = std::env::args()
        .nth(1)
        .unwrap_or_else(|| TACHO_MOTOR_ROOT.to_string());
    let motors = TachoMotors::new(&root);

    println!("EV3 Motor Diagnostic (READ-ONLY)");
    println!("Class root: {}", root);
    println!();

    println!("Step 1: Scanning for motors...");
    let attached = match motors.list() {
        Ok(attached) => attached,
        Err(e) => {
            println!("  ✗ Failed to read {}: {}", root, e);
            println!();
            println!("Troubleshooting:");
            println!("  - Check that the tacho-motor driver is loaded");
            println!("  - Verify the class root path is correct");
            return Err(e.into());
        }
    };

    for port in OutPort::ALL {
        match attached.iter().find(|m| m.port() == port) {
            Some(motor) => println!("  {}: ✓ {}", port, motor.path().display()),
            None => println!("  {}: -", port),
        }
    }
    println!();

    println!("Step 2: Reading motor attributes...");
    println!();
    for motor in &attached {
        println!("  === Motor {} ===", motor.port());

        match motor.is_running() {
            Ok(running) => println!("    Running:         {}", running),
            Err(e) => println!("    Running:         ERROR - {}", e),
        }
        match motor.current_speed() {
            Ok(speed) => println!("    Target Speed:    {}%", speed),
            Err(e) => println!("    Target Speed:    ERROR - {}", e),
        }
        match motor.current_power() {
            Ok(power) => println!("    Power:           {}", power),
            Err(e) => println!("    Power:           ERROR - {}", e),
        }
        match motor.regulation_mode() {
            Ok(mode) => println!("    Regulation Mode: {}", mode),
            Err(e) => println!("    Regulation Mode: ERROR - {}", e),
        }
        match motor.stop_mode() {
            Ok(mode) => println!("    Stop Mode:       {}", mode),
            Err(e) => println!("    Stop Mode:       ERROR - {}", e),
        }
        println!();
    }

    println!("Diagnostic complete ({} motor(s) found)", attached.len());
    Ok(())
}

// Device paths, timeouts, topics
use std::time::Duration;

// tacho-motor class directory maintained by the kernel driver
pub const TACHO_MOTOR_ROOT: &str = "/sys/class/tacho-motor";

// Device directories under the class root are named motor0, motor1, ...
pub const MOTOR_DIR_PREFIX: &str = "motor";

// Speed is a duty cycle percentage
pub const MAX_SPEED: i16 = 100;

// Bridge loop frequency
pub const LOOP_HZ: u64 = 50;

// Running motors are stopped when no command arrives for this long
pub const CMD_TIMEOUT: Duration = Duration::from_millis(500);

// Zenoh topics
pub const TOPIC_CMD_MOTOR: &str = "ev3/cmd/motor"; // commands
pub const TOPIC_HEALTH: &str = "ev3/state/health"; // health status

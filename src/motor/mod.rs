// Motor access for the EV3 tacho-motor driver
//
// Provides:
// - Output port names as reported by the driver
// - Attribute file I/O over the tacho-motor class directory
// - Port lookup and the motor operations (run, stop, regulation, braking)

mod driver;
pub mod port;
pub mod sysfs;

pub use driver::{attr, validate_speed, RegulationMode, StopMode, TachoMotor, TachoMotors};
pub use port::OutPort;
pub use sysfs::{Result, TachoError};

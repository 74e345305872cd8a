// Tacho-motor driver for the EV3 output ports
//
// Maps output ports to device directories under the tacho-motor class and
// translates each operation into one or two attribute reads/writes.
// Nothing is cached: every port-keyed call re-scans the class directory, so a
// motor that is replugged into another port is picked up immediately.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{debug, info, warn};

use super::port::OutPort;
use super::sysfs::{self, Result, TachoError};
use crate::config::{MAX_SPEED, MOTOR_DIR_PREFIX, TACHO_MOTOR_ROOT};

/// Attribute names exposed by the driver
pub mod attr {
    pub const PORT_NAME: &str = "port_name";
    pub const RUN: &str = "run";
    pub const DUTY_CYCLE_SP: &str = "duty_cycle_sp";
    pub const POWER: &str = "power";
    pub const REGULATION_MODE: &str = "regulation_mode";
    pub const STOP_MODE: &str = "stop_mode";
}

/// Speed regulation. When on, the driver compensates for load to hold the
/// target speed. Off by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegulationMode {
    On,
    Off,
}

impl RegulationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegulationMode::On => "on",
            RegulationMode::Off => "off",
        }
    }
}

impl FromStr for RegulationMode {
    type Err = TachoError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "on" => Ok(RegulationMode::On),
            "off" => Ok(RegulationMode::Off),
            _ => Err(TachoError::UnknownMode {
                attribute: attr::REGULATION_MODE.to_string(),
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for RegulationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the motor comes to rest on stop. Coast by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopMode {
    Coast,
    Brake,
}

impl StopMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StopMode::Coast => "coast",
            StopMode::Brake => "brake",
        }
    }
}

impl FromStr for StopMode {
    type Err = TachoError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "coast" => Ok(StopMode::Coast),
            "brake" => Ok(StopMode::Brake),
            _ => Err(TachoError::UnknownMode {
                attribute: attr::STOP_MODE.to_string(),
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for StopMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check that a speed is a valid duty cycle percentage
pub fn validate_speed(speed: i16) -> Result<()> {
    if !(-MAX_SPEED..=MAX_SPEED).contains(&speed) {
        return Err(TachoError::SpeedOutOfRange { speed });
    }
    Ok(())
}

/// The tacho-motor class directory
#[derive(Debug, Clone)]
pub struct TachoMotors {
    root: PathBuf,
}

impl Default for TachoMotors {
    fn default() -> Self {
        Self::new(TACHO_MOTOR_ROOT)
    }
}

impl TachoMotors {
    /// Use a custom class directory (alternative mounts, tests)
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn motor_dirs(&self) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(&self.root).map_err(|source| TachoError::Io {
            path: self.root.clone(),
            source,
        })?;

        let mut dirs = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| TachoError::Io {
                path: self.root.clone(),
                source,
            })?;
            if entry
                .file_name()
                .to_string_lossy()
                .starts_with(MOTOR_DIR_PREFIX)
            {
                dirs.push(entry.path());
            }
        }
        // read_dir order is unspecified; scan by name so lookups are stable
        dirs.sort();
        Ok(dirs)
    }

    /// Find the motor attached to `port`
    pub fn find(&self, port: OutPort) -> Result<TachoMotor> {
        for dir in self.motor_dirs()? {
            match sysfs::read_string(&dir, attr::PORT_NAME) {
                Ok(name) if name == port.as_str() => {
                    debug!("Found {} motor at {}", port, dir.display());
                    return Ok(TachoMotor { port, path: dir });
                }
                Ok(_) => {}
                Err(e) => warn!("Skipping {}: {}", dir.display(), e),
            }
        }
        Err(TachoError::MotorNotFound { port })
    }

    /// All attached motors, sorted by port
    pub fn list(&self) -> Result<Vec<TachoMotor>> {
        let mut motors = Vec::new();
        for dir in self.motor_dirs()? {
            match sysfs::read_string(&dir, attr::PORT_NAME).and_then(|name| name.parse::<OutPort>()) {
                Ok(port) => motors.push(TachoMotor { port, path: dir }),
                Err(e) => warn!("Skipping {}: {}", dir.display(), e),
            }
        }
        motors.sort_by(|a, b| a.port.cmp(&b.port).then_with(|| a.path.cmp(&b.path)));
        Ok(motors)
    }

    /// Run the motor at `port`. `speed` ranges from -100 to 100, negative
    /// values run in reverse. The actual speed may fall short of the target
    /// under load unless regulation mode is enabled.
    pub fn run(&self, port: OutPort, speed: i16) -> Result<()> {
        validate_speed(speed)?;
        self.find(port)?.run(speed)
    }

    /// Stop the motor at `port`
    pub fn stop(&self, port: OutPort) -> Result<()> {
        self.find(port)?.stop()
    }

    /// Target speed of the motor at `port`
    pub fn current_speed(&self, port: OutPort) -> Result<i16> {
        self.find(port)?.current_speed()
    }

    /// Operating power of the motor at `port`
    pub fn current_power(&self, port: OutPort) -> Result<i16> {
        self.find(port)?.current_power()
    }

    pub fn enable_regulation_mode(&self, port: OutPort) -> Result<()> {
        self.find(port)?.set_regulation_mode(RegulationMode::On)
    }

    pub fn disable_regulation_mode(&self, port: OutPort) -> Result<()> {
        self.find(port)?.set_regulation_mode(RegulationMode::Off)
    }

    pub fn enable_brake_mode(&self, port: OutPort) -> Result<()> {
        self.find(port)?.set_stop_mode(StopMode::Brake)
    }

    pub fn disable_brake_mode(&self, port: OutPort) -> Result<()> {
        self.find(port)?.set_stop_mode(StopMode::Coast)
    }
}

/// A motor resolved to its device directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TachoMotor {
    port: OutPort,
    path: PathBuf,
}

impl TachoMotor {
    pub fn port(&self) -> OutPort {
        self.port
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Start the motor, then set its duty cycle
    pub fn run(&self, speed: i16) -> Result<()> {
        validate_speed(speed)?;
        info!("Running {} motor at {}", self.port, speed);
        sysfs::write_int(&self.path, attr::RUN, 1)?;
        sysfs::write_int(&self.path, attr::DUTY_CYCLE_SP, i64::from(speed))
    }

    pub fn stop(&self) -> Result<()> {
        info!("Stopping {} motor", self.port);
        sysfs::write_int(&self.path, attr::RUN, 0)
    }

    pub fn is_running(&self) -> Result<bool> {
        let run: i64 = sysfs::read_int(&self.path, attr::RUN)?;
        Ok(run != 0)
    }

    pub fn current_speed(&self) -> Result<i16> {
        sysfs::read_int(&self.path, attr::DUTY_CYCLE_SP)
    }

    pub fn current_power(&self) -> Result<i16> {
        sysfs::read_int(&self.path, attr::POWER)
    }

    pub fn regulation_mode(&self) -> Result<RegulationMode> {
        sysfs::read_string(&self.path, attr::REGULATION_MODE)?.parse()
    }

    pub fn set_regulation_mode(&self, mode: RegulationMode) -> Result<()> {
        info!("Setting {} regulation mode {}", self.port, mode);
        sysfs::write_string(&self.path, attr::REGULATION_MODE, mode.as_str())
    }

    pub fn stop_mode(&self) -> Result<StopMode> {
        sysfs::read_string(&self.path, attr::STOP_MODE)?.parse()
    }

    pub fn set_stop_mode(&self, mode: StopMode) -> Result<()> {
        info!("Setting {} stop mode {}", self.port, mode);
        sysfs::write_string(&self.path, attr::STOP_MODE, mode.as_str())
    }
}

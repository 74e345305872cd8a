// Attribute I/O against the tacho-motor pseudo-filesystem
//
// Each motor is a directory with one small text file per attribute:
// <class root>/motorN/<attribute>
// Reads return the value with the driver's trailing newline stripped,
// writes replace the whole value with a single write.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::debug;

use super::port::OutPort;

/// Error types for tacho-motor access
#[derive(Debug, thiserror::Error)]
pub enum TachoError {
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not parse {attribute} value {value:?}")]
    Parse { attribute: String, value: String },

    #[error("Could not find {port} motor")]
    MotorNotFound { port: OutPort },

    #[error("The speed must be in range [-100, 100], got {speed}")]
    SpeedOutOfRange { speed: i16 },

    #[error("Invalid output port {name:?}")]
    InvalidPort { name: String },

    #[error("Unknown {attribute} mode {value:?}")]
    UnknownMode { attribute: String, value: String },
}

pub type Result<T> = std::result::Result<T, TachoError>;

fn attribute_path(dir: &Path, attribute: &str) -> PathBuf {
    dir.join(attribute)
}

/// Read an attribute as text, trimmed
pub fn read_string(dir: &Path, attribute: &str) -> Result<String> {
    let path = attribute_path(dir, attribute);
    let raw = fs::read_to_string(&path).map_err(|source| TachoError::Io {
        path: path.clone(),
        source,
    })?;
    let value = raw.trim().to_string();
    debug!("Read {} = {:?}", path.display(), value);
    Ok(value)
}

/// Read an attribute and parse it as a number
pub fn read_int<T: FromStr>(dir: &Path, attribute: &str) -> Result<T> {
    let value = read_string(dir, attribute)?;
    parse_value(attribute, &value)
}

fn parse_value<T: FromStr>(attribute: &str, value: &str) -> Result<T> {
    value.parse::<T>().map_err(|_| TachoError::Parse {
        attribute: attribute.to_string(),
        value: value.to_string(),
    })
}

/// Write a text value to an attribute
pub fn write_string(dir: &Path, attribute: &str, value: &str) -> Result<()> {
    let path = attribute_path(dir, attribute);
    debug!("Write {} = {:?}", path.display(), value);
    fs::write(&path, value).map_err(|source| TachoError::Io { path, source })
}

/// Write a number to an attribute
pub fn write_int(dir: &Path, attribute: &str, value: i64) -> Result<()> {
    write_string(dir, attribute, &value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value_numbers() {
        assert_eq!(parse_value::<i16>("power", "-42").unwrap(), -42);
        assert_eq!(parse_value::<i16>("power", "0").unwrap(), 0);
    }

    #[test]
    fn test_parse_value_reports_attribute() {
        match parse_value::<i16>("duty_cycle_sp", "fast") {
            Err(TachoError::Parse { attribute, value }) => {
                assert_eq!(attribute, "duty_cycle_sp");
                assert_eq!(value, "fast");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_value_overflow_is_error() {
        // duty cycle readings are percentages; anything past i16 is garbage
        assert!(parse_value::<i16>("duty_cycle_sp", "40000").is_err());
    }

    #[test]
    fn test_missing_attribute_is_io_error() {
        let dir = Path::new("/nonexistent/tacho-motor/motor0");
        match read_string(dir, "port_name") {
            Err(TachoError::Io { path, .. }) => {
                assert_eq!(path, dir.join("port_name"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_error_messages() {
        let err = TachoError::MotorNotFound { port: OutPort::B };
        assert_eq!(err.to_string(), "Could not find outB motor");

        let err = TachoError::SpeedOutOfRange { speed: 101 };
        assert_eq!(
            err.to_string(),
            "The speed must be in range [-100, 100], got 101"
        );
    }
}

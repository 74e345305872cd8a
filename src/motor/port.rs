// Output ports of the brick
//
// The tacho-motor driver reports the port a motor is plugged into through the
// `port_name` attribute ("outA" .. "outD").

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::sysfs::TachoError;

/// Motor output port
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OutPort {
    #[serde(rename = "outA")]
    A,
    #[serde(rename = "outB")]
    B,
    #[serde(rename = "outC")]
    C,
    #[serde(rename = "outD")]
    D,
}

impl OutPort {
    /// All output ports, in order
    pub const ALL: [OutPort; 4] = [OutPort::A, OutPort::B, OutPort::C, OutPort::D];

    /// Name as written by the driver to `port_name`
    pub fn as_str(&self) -> &'static str {
        match self {
            OutPort::A => "outA",
            OutPort::B => "outB",
            OutPort::C => "outC",
            OutPort::D => "outD",
        }
    }
}

impl fmt::Display for OutPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutPort {
    type Err = TachoError;

    /// Accepts the driver name ("outA") or the bare letter ("A" or "a")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "outA" | "A" | "a" => Ok(OutPort::A),
            "outB" | "B" | "b" => Ok(OutPort::B),
            "outC" | "C" | "c" => Ok(OutPort::C),
            "outD" | "D" | "d" => Ok(OutPort::D),
            _ => Err(TachoError::InvalidPort {
                name: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_driver_names() {
        assert_eq!("outA".parse::<OutPort>().unwrap(), OutPort::A);
        assert_eq!("outD".parse::<OutPort>().unwrap(), OutPort::D);
    }

    #[test]
    fn test_parse_bare_letters() {
        assert_eq!("b".parse::<OutPort>().unwrap(), OutPort::B);
        assert_eq!("C".parse::<OutPort>().unwrap(), OutPort::C);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        for bad in ["outE", "outa", "OUTA", "in1", "", "out", "AB"] {
            assert!(
                matches!(bad.parse::<OutPort>(), Err(TachoError::InvalidPort { .. })),
                "{:?} should not parse",
                bad
            );
        }
    }

    #[test]
    fn test_display_matches_driver_name() {
        for port in OutPort::ALL {
            assert_eq!(port.to_string(), port.as_str());
            assert_eq!(port.to_string().parse::<OutPort>().unwrap(), port);
        }
    }

    #[test]
    fn test_serde_uses_driver_name() {
        assert_eq!(serde_json::to_string(&OutPort::C).unwrap(), "\"outC\"");
        let port: OutPort = serde_json::from_str("\"outB\"").unwrap();
        assert_eq!(port, OutPort::B);
    }
}

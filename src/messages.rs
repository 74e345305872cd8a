// Message types for the command bridge

use serde::{Deserialize, Serialize};

use crate::motor::OutPort;

// Command from teleop/scripts -> runtime
// Tagged by "action", e.g. {"action":"run","port":"outA","speed":50}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum MotorCommand {
    Run { port: OutPort, speed: i16 },
    Stop { port: OutPort },
    Regulation { port: OutPort, enabled: bool },
    Brake { port: OutPort, enabled: bool },
}

impl MotorCommand {
    pub fn port(&self) -> OutPort {
        match self {
            MotorCommand::Run { port, .. }
            | MotorCommand::Stop { port }
            | MotorCommand::Regulation { port, .. }
            | MotorCommand::Brake { port, .. } => *port,
        }
    }
}

/// Snapshot of a motor's target speed and power
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotorState {
    pub port: OutPort,
    pub duty_cycle_sp: i16,
    pub power: i16,
}

/// Health status published by runtime
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeHealth {
    Ok,
    CmdStale,
    MotorFault,
}

pub mod config;
pub mod logging;
pub mod messages;
pub mod motor;
pub mod runtime;

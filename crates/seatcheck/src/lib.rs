pub mod assignments;
pub mod config;
pub mod error;
pub mod telemetry;

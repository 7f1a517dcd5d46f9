pub mod admission;
pub mod config;
pub mod exit;
pub mod listener;
pub mod session;
pub mod signals;
pub mod telemetry;

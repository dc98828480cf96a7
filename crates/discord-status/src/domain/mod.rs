pub mod error;
pub mod gateway;
pub mod models;
pub mod signal;

pub use signal::{ShutdownKind, ShutdownReason, SignalHandler};

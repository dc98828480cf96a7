pub mod config;
pub mod gateway;
pub mod logging;
pub mod signal;

pub use config::{Config, Settings};
pub use gateway::DiscordGateway;
pub use logging::LogGuard;
pub use signal::UnixSignalHandler;

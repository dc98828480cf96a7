use async_trait::async_trait;
use tokio::signal::unix::{Signal, SignalKind, signal};

use crate::domain::{ShutdownKind, SignalHandler};

/// Listens for SIGTERM, SIGINT and SIGHUP. Listeners are installed in
/// [`UnixSignalHandler::new`], before the gateway connects.
pub struct UnixSignalHandler {
    sigterm: Signal,
    sigint: Signal,
    sighup: Signal,
}

impl UnixSignalHandler {
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            sigterm: signal(SignalKind::terminate())?,
            sigint: signal(SignalKind::interrupt())?,
            sighup: signal(SignalKind::hangup())?,
        })
    }
}

#[async_trait]
impl SignalHandler for UnixSignalHandler {
    async fn wait_for_shutdown(mut self) -> ShutdownKind {
        tokio::select! {
            _ = self.sigterm.recv() => ShutdownKind::Terminate,
            _ = self.sigint.recv() => ShutdownKind::Interrupt,
            _ = self.sighup.recv() => ShutdownKind::Hangup,
        }
    }
}

use std::fmt::Display;

use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownKind {
    Terminate,
    Interrupt,
    Hangup,
}

impl Display for ShutdownKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShutdownKind::Terminate => write!(f, "SIGTERM"),
            ShutdownKind::Interrupt => write!(f, "SIGINT (Ctrl+C)"),
            ShutdownKind::Hangup => write!(f, "SIGHUP"),
        }
    }
}

/// Why the process is going down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    Signal(ShutdownKind),
    SessionClosed,
}

impl Display for ShutdownReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShutdownReason::Signal(kind) => write!(f, "signal {kind}"),
            ShutdownReason::SessionClosed => write!(f, "session closed"),
        }
    }
}

/// Resolves once a shutdown has been requested. Handlers register their
/// listeners on construction, so no signal is lost before this is awaited.
#[async_trait]
pub trait SignalHandler: Send + 'static {
    async fn wait_for_shutdown(self) -> ShutdownKind;
}

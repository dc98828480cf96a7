use std::{sync::Arc, time::Duration};

use tokio::{task::JoinHandle, time::timeout};
use tracing::{debug, error, info, warn};

use crate::{
    core::{
        Shutdowner,
        announcer::{Outcome, StatusAnnouncer},
    },
    domain::{
        ShutdownReason, SignalHandler,
        gateway::{Gateway, SessionEvent},
        models::SessionState,
    },
};

pub struct App<S, G> {
    signal_handler: S,
    gateway: Arc<G>,
    announcer: Arc<StatusAnnouncer>,
    shutdown_timeout: Duration,
}

impl<S, G> App<S, G>
where
    S: SignalHandler,
    G: Gateway + Shutdowner,
{
    pub fn new(
        signal_handler: S,
        gateway: Arc<G>,
        announcer: Arc<StatusAnnouncer>,
        shutdown_timeout: Duration,
    ) -> Self {
        Self {
            signal_handler,
            gateway,
            announcer,
            shutdown_timeout,
        }
    }

    /// Drives the session until a signal arrives or the gateway closes, then
    /// makes a bounded, best-effort offline announcement. Returns the final
    /// session state.
    pub async fn run(self) -> anyhow::Result<SessionState> {
        info!("app running...");

        let Self {
            signal_handler,
            gateway,
            announcer,
            shutdown_timeout,
        } = self;

        let mut state = SessionState::Disconnected.transition(SessionState::Connecting)?;
        let mut events = gateway.connect().await?;
        let mut was_ready = false;
        let mut online: Option<JoinHandle<Outcome>> = None;

        let shutdown = signal_handler.wait_for_shutdown();
        tokio::pin!(shutdown);

        let reason = loop {
            tokio::select! {
                kind = &mut shutdown => break ShutdownReason::Signal(kind),

                event = events.recv() => match event {
                    Some(SessionEvent::Ready { user }) => {
                        state = state.transition(SessionState::Ready)?;
                        info!(%user, "connected");

                        if !was_ready {
                            was_ready = true;
                            let announcer = announcer.clone();
                            let gateway = gateway.clone();
                            online = Some(tokio::spawn(async move {
                                announcer.on_ready(gateway.as_ref()).await
                            }));
                        }
                    }
                    Some(SessionEvent::Resumed) => {
                        state = state.transition(SessionState::Ready)?;
                        debug!("session resumed");
                    }
                    Some(SessionEvent::Disconnected) => {
                        state = state.transition(SessionState::Connecting)?;
                        warn!("session disconnected, waiting for the client to reconnect");
                    }
                    Some(SessionEvent::Closed) | None => break ShutdownReason::SessionClosed,
                },
            }
        };

        info!(%reason, "stopping");

        // no ordering between an in-flight online send and the offline one
        if online.as_ref().is_some_and(|h| !h.is_finished()) {
            warn!("online announcement still in flight at shutdown");
        }

        if was_ready {
            match timeout(
                shutdown_timeout,
                announcer.on_shutdown(gateway.as_ref(), reason),
            )
            .await
            {
                Ok(outcome) => debug!(
                    sent = outcome.is_sent(),
                    %outcome,
                    "offline announcement finished"
                ),
                Err(_) => warn!(
                    timeout = ?shutdown_timeout,
                    "offline announcement timed out, dropping it"
                ),
            }
        } else {
            info!("session never became ready, skipping offline announcement");
        }

        if let Err(e) = gateway.shutdown().await {
            error!(error = %e, "gateway shutdown failed");
        }

        let state = state.transition(SessionState::Closed)?;
        info!("shutdown complete");

        Ok(state)
    }
}

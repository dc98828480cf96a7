use std::fmt::Display;

use tracing::{error, info, warn};

use crate::{
    core::shutdown::OnceGuard,
    domain::{
        ShutdownReason,
        error::AnnounceError,
        gateway::ChannelResolver,
        models::{EmbedColor, Status, StatusMessage},
    },
};

#[derive(Debug)]
pub enum Outcome {
    Sent,
    Skipped,
    Failed(AnnounceError),
}

impl Outcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, Outcome::Sent)
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Sent => write!(f, "sent"),
            Outcome::Skipped => write!(f, "skipped"),
            Outcome::Failed(e) => write!(f, "failed: {e}"),
        }
    }
}

impl From<Result<(), AnnounceError>> for Outcome {
    fn from(res: Result<(), AnnounceError>) -> Self {
        match res {
            Ok(()) => Outcome::Sent,
            Err(e) => Outcome::Failed(e),
        }
    }
}

/// Posts status embeds to a single configured channel.
///
/// Errors are logged where they happen and never retried. The online and
/// offline announcements each go out at most once per announcer.
#[non_exhaustive]
pub struct StatusAnnouncer {
    channel_id: String,
    announce_shutdown: bool,
    online: OnceGuard,
    offline: OnceGuard,
}

impl StatusAnnouncer {
    pub fn new(channel_id: impl Into<String>, announce_shutdown: bool) -> Self {
        Self {
            channel_id: channel_id.into(),
            announce_shutdown,
            online: OnceGuard::new(),
            offline: OnceGuard::new(),
        }
    }

    pub fn compose(status: Status, color: EmbedColor) -> StatusMessage {
        StatusMessage::new(status, color)
    }

    pub async fn announce<R>(
        &self,
        resolver: &R,
        status: Status,
        color: EmbedColor,
    ) -> Result<(), AnnounceError>
    where
        R: ChannelResolver + ?Sized,
    {
        let message = Self::compose(status, color);

        let channel = resolver
            .resolve_channel(&self.channel_id)
            .await
            .inspect_err(|e| {
                warn!(
                    channel_id = %self.channel_id,
                    error = %e,
                    "channel lookup failed, dropping {status} announcement"
                )
            })?;

        channel.send(&message).await.inspect_err(|e| {
            error!(
                channel_id = %self.channel_id,
                error = %e,
                "{status} announcement not delivered"
            )
        })?;

        info!(channel_id = %self.channel_id, color = %color, "announced {status}");
        Ok(())
    }

    pub async fn on_ready<R>(&self, resolver: &R) -> Outcome
    where
        R: ChannelResolver + ?Sized,
    {
        if !self.online.try_enter() {
            info!("online announcement already made");
            return Outcome::Skipped;
        }

        self.announce(resolver, Status::Online, Status::Online.default_color())
            .await
            .into()
    }

    pub async fn on_shutdown<R>(&self, resolver: &R, reason: ShutdownReason) -> Outcome
    where
        R: ChannelResolver + ?Sized,
    {
        if !self.offline.try_enter() {
            info!(%reason, "offline announcement already attempted");
            return Outcome::Skipped;
        }

        if !self.announce_shutdown {
            info!(%reason, "shutdown announcements disabled");
            return Outcome::Skipped;
        }

        self.announce(resolver, Status::Offline, Status::Offline.default_color())
            .await
            .into()
    }
}

use std::{num::NonZeroU64, sync::Arc};

use async_trait::async_trait;
use chrono::SecondsFormat;
use serenity::{
    all::{
        Cache, ChannelId, Client, ConnectionStage, Context, CreateEmbed, CreateMessage,
        EventHandler, GatewayIntents, Http, Ready, ResumedEvent, ShardManager,
        ShardStageUpdateEvent, Timestamp,
    },
    http::HttpError,
};
use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::{
    core::Shutdowner,
    domain::{
        error::{ChannelError, DeliveryError},
        gateway::{ChannelHandle, ChannelResolver, Gateway, SessionEvent},
        models::StatusMessage,
    },
    infra::config::Settings,
};

const EVENT_BUFFER: usize = 16;

pub fn intents() -> GatewayIntents {
    GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES
}

/// Discord snowflakes are non-zero integers.
pub fn parse_channel_id(raw: &str) -> Result<ChannelId, ChannelError> {
    raw.trim()
        .parse::<NonZeroU64>()
        .map(|id| ChannelId::new(id.get()))
        .map_err(|_| ChannelError::InvalidId(raw.to_string()))
}

/// Maps a failed channel fetch to a [`ChannelError`] by HTTP status.
/// `None` means the request never got a response.
pub fn channel_error(id: &str, status: Option<u16>, reason: String) -> ChannelError {
    let id = id.to_string();
    match status {
        Some(403) => ChannelError::Inaccessible { id, reason },
        Some(404) => ChannelError::NotFound { id, reason },
        _ => ChannelError::Unavailable { id, reason },
    }
}

/// Whether any cached guild lists `channel_id` among its channels.
pub fn is_cached(cache: &Cache, channel_id: ChannelId) -> bool {
    cache.guilds().into_iter().any(|guild_id| {
        cache
            .guild(guild_id)
            .is_some_and(|guild| guild.channels.contains_key(&channel_id))
    })
}

fn status_code(err: &serenity::Error) -> Option<u16> {
    match err {
        serenity::Error::Http(HttpError::UnsuccessfulRequest(resp)) => {
            Some(resp.status_code.as_u16())
        }
        _ => None,
    }
}

pub fn to_embed(message: &StatusMessage) -> CreateEmbed {
    let rfc3339 = message
        .timestamp
        .to_rfc3339_opts(SecondsFormat::Millis, true);
    let timestamp = Timestamp::parse(&rfc3339)
        .ok()
        .or_else(|| Timestamp::from_unix_timestamp(message.timestamp.timestamp()).ok())
        .unwrap_or_else(Timestamp::now);

    CreateEmbed::new()
        .title(&message.title)
        .description(&message.description)
        .colour(message.color.rgb())
        .timestamp(timestamp)
}

struct SessionForwarder {
    events: mpsc::Sender<SessionEvent>,
}

impl SessionForwarder {
    async fn forward(&self, event: SessionEvent) {
        if self.events.send(event).await.is_err() {
            debug!("session receiver dropped");
        }
    }
}

#[async_trait]
impl EventHandler for SessionForwarder {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(
            user = %ready.user.tag(),
            guilds = ready.guilds.len(),
            "gateway ready"
        );
        self.forward(SessionEvent::Ready {
            user: ready.user.tag(),
        })
        .await;
    }

    async fn resume(&self, _ctx: Context, _: ResumedEvent) {
        self.forward(SessionEvent::Resumed).await;
    }

    async fn shard_stage_update(&self, _ctx: Context, event: ShardStageUpdateEvent) {
        debug!(shard = ?event.shard_id, old = ?event.old, new = ?event.new, "shard stage");
        if event.new == ConnectionStage::Disconnected {
            self.forward(SessionEvent::Disconnected).await;
        }
    }
}

/// Owns the serenity client for the lifetime of the process.
#[non_exhaustive]
pub struct DiscordGateway {
    client: Mutex<Option<Client>>,
    events: Mutex<Option<mpsc::Receiver<SessionEvent>>>,
    closed_tx: mpsc::Sender<SessionEvent>,
    http: Arc<Http>,
    cache: Arc<Cache>,
    shard_manager: Arc<ShardManager>,
    cancel_token: CancellationToken,
}

impl DiscordGateway {
    pub async fn new(settings: &Settings) -> anyhow::Result<Self> {
        Self::with_cancel_token(settings, CancellationToken::new()).await
    }

    pub async fn with_cancel_token(
        settings: &Settings,
        cancel_token: CancellationToken,
    ) -> anyhow::Result<Self> {
        parse_channel_id(&settings.channel_id)?;

        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let forwarder = SessionForwarder { events: tx.clone() };

        let client = Client::builder(settings.token(), intents())
            .event_handler(forwarder)
            .await
            .map_err(|e| anyhow::anyhow!("failed to build discord client: {e}"))?;

        Ok(Self {
            http: client.http.clone(),
            cache: client.cache.clone(),
            shard_manager: client.shard_manager.clone(),
            client: Mutex::new(Some(client)),
            events: Mutex::new(Some(rx)),
            closed_tx: tx,
            cancel_token,
        })
    }
}

#[async_trait]
impl Gateway for DiscordGateway {
    async fn connect(&self) -> anyhow::Result<mpsc::Receiver<SessionEvent>> {
        let mut client = self
            .client
            .lock()
            .await
            .take()
            .ok_or_else(|| anyhow::anyhow!("gateway already connected"))?;
        let events = self
            .events
            .lock()
            .await
            .take()
            .ok_or_else(|| anyhow::anyhow!("session events already taken"))?;

        let cancel_token = self.cancel_token.clone();
        let closed_tx = self.closed_tx.clone();

        tokio::spawn(async move {
            tokio::select! {
                biased;

                _ = cancel_token.cancelled() => {
                    info!("gateway cancelled, stopping...");
                }

                res = client.start() => {
                    match res {
                        Ok(()) => info!("gateway client stopped"),
                        Err(e) => error!(error = %e, "gateway client failed"),
                    }
                    let _ = closed_tx.send(SessionEvent::Closed).await;
                }
            }
        });

        Ok(events)
    }
}

#[async_trait]
impl ChannelResolver for DiscordGateway {
    async fn resolve_channel(&self, id: &str) -> Result<Arc<dyn ChannelHandle>, ChannelError> {
        let channel_id = parse_channel_id(id)?;

        if !is_cached(&self.cache, channel_id) {
            debug!(%channel_id, "channel not cached, fetching");

            if let Err(e) = self.http.get_channel(channel_id).await {
                return Err(channel_error(id, status_code(&e), e.to_string()));
            }
        }

        Ok(Arc::new(DiscordChannel {
            id: channel_id,
            http: self.http.clone(),
        }))
    }
}

#[async_trait]
impl Shutdowner for DiscordGateway {
    async fn shutdown(&self) -> anyhow::Result<()> {
        self.shard_manager.shutdown_all().await;
        self.cancel_token.cancel();
        Ok(())
    }
}

impl Drop for DiscordGateway {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

struct DiscordChannel {
    id: ChannelId,
    http: Arc<Http>,
}

#[async_trait]
impl ChannelHandle for DiscordChannel {
    async fn send(&self, message: &StatusMessage) -> Result<(), DeliveryError> {
        let builder = CreateMessage::new().embed(to_embed(message));

        let sent = self
            .id
            .send_message(self.http.as_ref(), builder)
            .await
            .map_err(|e| DeliveryError(e.to_string()))?;

        debug!(channel_id = %self.id, message_id = %sent.id, "embed delivered");
        Ok(())
    }
}

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::{
    error::{ChannelError, DeliveryError},
    models::StatusMessage,
};

/// Lifecycle notifications forwarded from the gateway client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Ready { user: String },
    Resumed,
    Disconnected,
    Closed,
}

#[async_trait]
pub trait ChannelHandle: Send + Sync {
    async fn send(&self, message: &StatusMessage) -> Result<(), DeliveryError>;
}

#[async_trait]
pub trait ChannelResolver: Send + Sync + 'static {
    async fn resolve_channel(&self, id: &str) -> Result<Arc<dyn ChannelHandle>, ChannelError>;
}

#[async_trait]
pub trait Gateway: ChannelResolver {
    async fn connect(&self) -> anyhow::Result<mpsc::Receiver<SessionEvent>>;
}

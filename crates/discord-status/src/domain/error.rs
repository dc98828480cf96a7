use thiserror::Error;

use crate::domain::models::SessionState;

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("invalid channel id '{0}'")]
    InvalidId(String),

    #[error("channel {id} not found: {reason}")]
    NotFound { id: String, reason: String },

    #[error("channel {id} is not accessible: {reason}")]
    Inaccessible { id: String, reason: String },

    #[error("channel {id} could not be fetched: {reason}")]
    Unavailable { id: String, reason: String },
}

#[derive(Debug, Error)]
#[error("failed to deliver status message: {0}")]
pub struct DeliveryError(pub String);

#[derive(Debug, Error)]
pub enum AnnounceError {
    #[error(transparent)]
    Channel(#[from] ChannelError),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

#[derive(Debug, Error)]
#[error("unknown status '{0}'")]
pub struct UnknownStatus(pub String);

#[derive(Debug, Error)]
#[error("invalid session transition {from:?} -> {to:?}")]
pub struct InvalidTransition {
    pub from: SessionState,
    pub to: SessionState,
}

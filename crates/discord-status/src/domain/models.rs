use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};

use crate::domain::error::{InvalidTransition, UnknownStatus};

pub const STATUS_TITLE: &str = "Bot Status";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Online,
    Offline,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Online => "online",
            Status::Offline => "offline",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Status::Online => "✅ bot is online",
            Status::Offline => "⚠️ bot is offline",
        }
    }

    pub fn default_color(&self) -> EmbedColor {
        match self {
            Status::Online => EmbedColor::GREEN,
            Status::Offline => EmbedColor::RED,
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "online" => Ok(Status::Online),
            "offline" => Ok(Status::Offline),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

/// Packed `0xRRGGBB` embed colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EmbedColor(u32);

impl EmbedColor {
    pub const GREEN: EmbedColor = EmbedColor(0x00FF00);
    pub const RED: EmbedColor = EmbedColor(0xFF0000);

    pub const fn rgb(self) -> u32 {
        self.0
    }
}

impl Display for EmbedColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:06X}", self.0)
    }
}

/// A status embed, built fresh for every announcement.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub title: String,
    pub description: String,
    pub color: EmbedColor,
    pub timestamp: DateTime<Utc>,
}

impl StatusMessage {
    pub fn new(status: Status, color: EmbedColor) -> Self {
        Self {
            title: STATUS_TITLE.to_string(),
            description: status.description().to_string(),
            color,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connecting,
    Ready,
    Closed,
}

impl SessionState {
    /// Moves to `next`. Staying in the same state is always allowed,
    /// nothing leaves `Closed`.
    pub fn transition(self, next: SessionState) -> Result<SessionState, InvalidTransition> {
        use SessionState::*;

        let allowed = self == next
            || matches!(
                (self, next),
                (Disconnected, Connecting)
                    | (Disconnected, Closed)
                    | (Connecting, Ready)
                    | (Connecting, Disconnected)
                    | (Connecting, Closed)
                    | (Ready, Connecting)
                    | (Ready, Closed)
            );

        if allowed {
            Ok(next)
        } else {
            Err(InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, SessionState::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_text_mapping() {
        assert_eq!("online".parse::<Status>().unwrap(), Status::Online);
        assert_eq!(" Offline ".parse::<Status>().unwrap(), Status::Offline);
        assert_eq!(Status::Online.to_string(), "online");
        assert_eq!(Status::Offline.to_string(), "offline");
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let err = "away".parse::<Status>().unwrap_err();
        assert!(err.to_string().contains("away"));
    }

    #[test]
    fn test_online_body_is_affirmative() {
        let message = StatusMessage::new(Status::Online, EmbedColor::GREEN);

        assert_eq!(message.title, "Bot Status");
        assert!(message.description.starts_with('✅'));
        assert!(message.description.contains("online"));
        assert!(!message.description.contains("offline"));
        assert_eq!(message.color.rgb(), 0x00FF00);
    }

    #[test]
    fn test_offline_body_is_warning() {
        let message = StatusMessage::new(Status::Offline, Status::Offline.default_color());

        assert!(message.description.starts_with('⚠'));
        assert!(message.description.contains("offline"));
        assert_eq!(message.color, EmbedColor::RED);
    }

    #[test]
    fn test_repeated_messages_share_content() {
        let first = StatusMessage::new(Status::Online, EmbedColor::GREEN);
        let second = StatusMessage::new(Status::Online, EmbedColor::GREEN);

        assert_eq!(first.title, second.title);
        assert_eq!(first.description, second.description);
        assert_eq!(first.color, second.color);
        assert!(second.timestamp >= first.timestamp);
    }

    #[test]
    fn test_color_display() {
        assert_eq!(EmbedColor::GREEN.to_string(), "#00FF00");
        assert_eq!(EmbedColor::RED.to_string(), "#FF0000");
    }

    #[test]
    fn test_session_happy_path() {
        let state = SessionState::Disconnected
            .transition(SessionState::Connecting)
            .and_then(|s| s.transition(SessionState::Ready))
            .and_then(|s| s.transition(SessionState::Closed))
            .unwrap();

        assert!(state.is_closed());
    }

    #[test]
    fn test_session_reconnect_after_drop() {
        let state = SessionState::Ready
            .transition(SessionState::Connecting)
            .and_then(|s| s.transition(SessionState::Ready))
            .unwrap();

        assert_eq!(state, SessionState::Ready);
    }

    #[test]
    fn test_closed_is_terminal() {
        for next in [
            SessionState::Disconnected,
            SessionState::Connecting,
            SessionState::Ready,
        ] {
            assert!(SessionState::Closed.transition(next).is_err());
        }
        assert_eq!(
            SessionState::Closed.transition(SessionState::Closed).unwrap(),
            SessionState::Closed
        );
    }

    #[test]
    fn test_ready_requires_connecting() {
        let err = SessionState::Disconnected
            .transition(SessionState::Ready)
            .unwrap_err();

        assert_eq!(err.from, SessionState::Disconnected);
        assert_eq!(err.to, SessionState::Ready);
    }
}

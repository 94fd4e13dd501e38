//! Transient status line ("toast") messages.

use std::time::{Duration, Instant};

/// How long a status message stays visible.
pub const STATUS_TTL: Duration = Duration::from_millis(2500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    text: String,
    level: StatusLevel,
    shown_at: Instant,
}

impl StatusMessage {
    #[must_use]
    pub fn info(text: impl Into<String>) -> Self {
        Self::new(text, StatusLevel::Info)
    }

    #[must_use]
    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(text, StatusLevel::Warning)
    }

    fn new(text: impl Into<String>, level: StatusLevel) -> Self {
        Self {
            text: text.into(),
            level,
            shown_at: Instant::now(),
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub const fn level(&self) -> StatusLevel {
        self.level
    }

    #[must_use]
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= STATUS_TTL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expires_after_ttl() {
        let message = StatusMessage::info("Saved");
        assert!(!message.is_expired(message.shown_at));
        assert!(message.is_expired(message.shown_at + STATUS_TTL));
        assert_eq!(message.level(), StatusLevel::Info);
    }
}

//! One-shot notifications carried across a redirect.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use super::session::keys;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Info,
    Error,
}

impl FlashLevel {
    /// CSS modifier used by the notification partial.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Success => "flash--success",
            Self::Info => "flash--info",
            Self::Error => "flash--error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Info,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }

    /// Queue this notification for the next rendered page.
    ///
    /// A session failure only loses the notification, so it is logged
    /// rather than returned.
    pub async fn push(self, session: &Session) {
        let mut pending = session
            .get::<Vec<Self>>(keys::FLASH)
            .await
            .ok()
            .flatten()
            .unwrap_or_default();
        pending.push(self);
        if let Err(e) = session.insert(keys::FLASH, pending).await {
            tracing::warn!(error = %e, "Failed to store flash message");
        }
    }

    /// Remove and return all queued notifications.
    pub async fn take_all(session: &Session) -> Vec<Self> {
        match session.remove::<Vec<Self>>(keys::FLASH).await {
            Ok(pending) => pending.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read flash messages");
                Vec::new()
            }
        }
    }
}

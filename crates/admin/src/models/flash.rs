//! Flash notifications shown after a form post redirects.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use super::session::keys;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Warning,
    Error,
}

impl FlashLevel {
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Success => "flash flash--success",
            Self::Warning => "flash flash--warning",
            Self::Error => "flash flash--error",
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
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Warning,
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

    /// Queue for the next page render. Session failures are logged only.
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

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    #[tokio::test]
    async fn test_flashes_are_taken_once() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);

        Flash::success("Product saved").push(&session).await;
        Flash::warning("Old image could not be removed").push(&session).await;

        let taken = Flash::take_all(&session).await;
        assert_eq!(taken.len(), 2);
        assert_eq!(taken[0].level, FlashLevel::Success);
        assert_eq!(taken[1].message, "Old image could not be removed");
        assert!(Flash::take_all(&session).await.is_empty());
    }
}

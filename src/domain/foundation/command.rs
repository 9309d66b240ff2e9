//! Command infrastructure for CQRS handlers.
//!
//! Instead of each handler accepting `correlation_id: Option<String>,
//! user_id: UserId, source: Option<String>` separately, handlers take a
//! single `CommandMetadata` struct. This keeps signatures stable and
//! naming consistent across the whole caller surface.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

/// Metadata context for command handlers.
///
/// Carries tracing, correlation, and actor context through the command
/// processing pipeline and into emitted events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandMetadata {
    /// The user executing this command.
    pub user_id: UserId,

    /// Links related operations across a single caller request.
    /// Generated lazily if not provided.
    #[serde(skip_serializing_if = "Option::is_none")]
    correlation_id: Option<String>,

    /// Source of this command (e.g., "api", "cron", "admin").
    /// Useful for audit logs and debugging.
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
}

impl CommandMetadata {
    /// Creates new command metadata with the required acting user.
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            correlation_id: None,
            source: None,
        }
    }

    /// Sets the correlation ID.
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// Sets the command source.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Returns the correlation ID, generating a fresh one when unset.
    pub fn correlation_id(&self) -> String {
        self.correlation_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string())
    }

    /// Returns the command source, if recorded.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

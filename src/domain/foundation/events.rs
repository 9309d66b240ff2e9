//! Event infrastructure for domain event publishing and handling.
//!
//! This module provides the core types and traits for event-driven wiring:
//! - `EventId` - Unique identifier for events (deduplication)
//! - `EventMetadata` - Tracing and correlation context
//! - `EventEnvelope` - Transport wrapper for domain events
//! - `DomainEvent` - Trait that all domain events implement
//! - `domain_event!` - Macro to simplify DomainEvent implementations

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use uuid::Uuid;

use super::Timestamp;

/// Trait that all domain events must implement.
///
/// Provides the contract for event identification, routing, ordering, and
/// versioning. Use the `domain_event!` macro to implement this trait with
/// minimal boilerplate.
pub trait DomainEvent: Send + Sync {
    /// Returns the event type string (e.g., "cycle.completed.v1").
    /// Used for routing and filtering.
    /// SHOULD include version suffix (e.g., ".v1", ".v2") for explicit versioning.
    fn event_type(&self) -> &'static str;

    /// Returns the schema version number.
    /// MUST match the version suffix in event_type.
    fn schema_version(&self) -> u32;

    /// Returns the ID of the aggregate that emitted this event.
    fn aggregate_id(&self) -> String;

    /// Returns the type of aggregate (e.g., "Cycle", "Meeting").
    fn aggregate_type(&self) -> &'static str;

    /// Returns when the event occurred.
    fn occurred_at(&self) -> Timestamp;

    /// Returns the unique ID for this event instance.
    fn event_id(&self) -> EventId;
}

/// Extension trait that provides `to_envelope()` for serializable domain events.
///
/// Automatically implemented for any type implementing both `DomainEvent`
/// and `Serialize`, so event authors write zero boilerplate.
pub trait SerializableDomainEvent: DomainEvent + Serialize {
    /// Converts this domain event into an `EventEnvelope` for transport.
    fn to_envelope(&self) -> EventEnvelope {
        let event_type = self.event_type().to_string();
        let schema_version = EventEnvelope::extract_version(&event_type);

        EventEnvelope {
            event_id: self.event_id(),
            event_type,
            schema_version,
            aggregate_id: self.aggregate_id(),
            aggregate_type: self.aggregate_type().to_string(),
            occurred_at: self.occurred_at(),
            payload: serde_json::to_value(self)
                .expect("Event serialization should never fail for well-formed events"),
            metadata: EventMetadata::default(),
        }
    }
}

impl<T: DomainEvent + Serialize> SerializableDomainEvent for T {}

/// Macro to implement DomainEvent trait with minimal boilerplate.
///
/// # Example
///
/// ```ignore
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// pub struct MeetingsGeneratedEvent {
///     pub event_id: EventId,
///     pub cycle_id: CycleId,
///     pub generated_count: u32,
///     pub generated_at: Timestamp,
/// }
///
/// domain_event!(
///     MeetingsGeneratedEvent,
///     event_type = "cycle.meetings_generated.v1",
///     schema_version = 1,
///     aggregate_id = cycle_id,
///     aggregate_type = "Cycle",
///     occurred_at = generated_at,
///     event_id = event_id
/// );
/// ```
#[macro_export]
macro_rules! domain_event {
    (
        $event_name:ident,
        event_type = $event_type:expr,
        schema_version = $schema_version:expr,
        aggregate_id = $agg_id_field:ident,
        aggregate_type = $agg_type:expr,
        occurred_at = $occurred_field:ident,
        event_id = $event_id_field:ident
    ) => {
        impl $crate::domain::foundation::DomainEvent for $event_name {
            fn event_type(&self) -> &'static str {
                $event_type
            }

            fn schema_version(&self) -> u32 {
                $schema_version
            }

            fn aggregate_id(&self) -> String {
                self.$agg_id_field.to_string()
            }

            fn aggregate_type(&self) -> &'static str {
                $agg_type
            }

            fn occurred_at(&self) -> $crate::domain::foundation::Timestamp {
                self.$occurred_field
            }

            fn event_id(&self) -> $crate::domain::foundation::EventId {
                self.$event_id_field.clone()
            }
        }
    };
}

pub use domain_event;

/// Unique identifier for events (used for deduplication).
///
/// Unlike other IDs in the system, EventId uses a String internally
/// to allow for various ID formats while maintaining serializability.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    /// Creates a new random EventId using UUID v4.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Creates an EventId from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Metadata for tracing and correlation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    /// ID linking related events across a single caller request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,

    /// ID of the event that directly caused this event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub causation_id: Option<String>,

    /// User who initiated the action that led to this event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Distributed tracing span/trace ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

/// Transport envelope for domain events.
///
/// Wraps event-specific data with metadata needed for routing (event_type),
/// deduplication (event_id), correlation (aggregate_id, metadata), ordering
/// (occurred_at), and versioning (schema_version).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique ID for this event instance.
    pub event_id: EventId,

    /// Event type for routing (e.g., "cycle.completed.v1").
    pub event_type: String,

    /// Schema version number (extracted from event_type).
    pub schema_version: u32,

    /// ID of the aggregate that emitted this event.
    pub aggregate_id: String,

    /// Type of aggregate (e.g., "Cycle", "Meeting").
    pub aggregate_type: String,

    /// When the event occurred.
    pub occurred_at: Timestamp,

    /// Event-specific payload as JSON.
    pub payload: JsonValue,

    /// Tracing and correlation metadata.
    pub metadata: EventMetadata,
}

impl EventEnvelope {
    /// Creates a new EventEnvelope with required fields.
    ///
    /// Automatically extracts schema version from the event_type suffix
    /// (e.g., "cycle.completed.v2" → 2), defaulting to v1.
    pub fn new(
        event_type: impl Into<String>,
        aggregate_id: impl Into<String>,
        aggregate_type: impl Into<String>,
        payload: JsonValue,
    ) -> Self {
        let event_type = event_type.into();
        let schema_version = Self::extract_version(&event_type);

        Self {
            event_id: EventId::new(),
            event_type,
            schema_version,
            aggregate_id: aggregate_id.into(),
            aggregate_type: aggregate_type.into(),
            occurred_at: Timestamp::now(),
            payload,
            metadata: EventMetadata::default(),
        }
    }

    pub(crate) fn extract_version(event_type: &str) -> u32 {
        event_type
            .rsplit_once(".v")
            .and_then(|(_, version_str)| version_str.parse::<u32>().ok())
            .unwrap_or(1)
    }

    /// Returns the schema version number.
    pub fn version(&self) -> u32 {
        self.schema_version
    }

    /// Add correlation ID for request tracing.
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.metadata.correlation_id = Some(id.into());
        self
    }

    /// Add causation ID (ID of event that caused this one).
    pub fn with_causation_id(mut self, id: impl Into<String>) -> Self {
        self.metadata.causation_id = Some(id.into());
        self
    }

    /// Add user ID for audit.
    pub fn with_user_id(mut self, id: impl Into<String>) -> Self {
        self.metadata.user_id = Some(id.into());
        self
    }

    /// Deserialize payload to a specific event type.
    pub fn payload_as<T: for<'de> Deserialize<'de>>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.payload.clone())
    }
}

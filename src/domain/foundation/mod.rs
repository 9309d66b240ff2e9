//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, enums, and error types
//! that form the vocabulary of the scheduling domain.

mod activity_type;
mod command;
mod cycle_status;
mod errors;
mod events;
mod ids;
mod instructor_role;
mod meeting_status;
mod pricing_mode;
mod registration_status;
mod state_machine;
mod timestamp;

pub use activity_type::ActivityType;
pub use command::CommandMetadata;
pub use cycle_status::CycleStatus;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use events::{
    domain_event, DomainEvent, EventEnvelope, EventId, EventMetadata, SerializableDomainEvent,
};
pub use ids::{
    CustomerId, CycleId, InstructorId, MeetingId, RegistrationId, StudentId, UpsellLeadId, UserId,
};
pub use instructor_role::InstructorRole;
pub use meeting_status::MeetingStatus;
pub use pricing_mode::PricingMode;
pub use registration_status::RegistrationStatus;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;

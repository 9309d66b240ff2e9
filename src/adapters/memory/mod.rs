//! In-memory adapters for testing.
//!
//! Deterministic, dependency-free implementations of the persistence and
//! collaborator ports. Used by handler unit tests and the crate's
//! integration tests; production deployments use the PostgreSQL and HTTP
//! adapters instead.

mod completion_notifier;
mod conference_cleanup;
mod cycle_repository;
mod instructor_directory;
mod meeting_repository;
mod registration_repository;
mod unit_of_work;
mod upsell_lead_repository;

pub use completion_notifier::RecordingCompletionNotifier;
pub use conference_cleanup::RecordingConferenceCleanup;
pub use cycle_repository::InMemoryCycleRepository;
pub use instructor_directory::StaticInstructorDirectory;
pub use meeting_repository::InMemoryMeetingRepository;
pub use registration_repository::InMemoryRegistrationRepository;
pub use unit_of_work::InMemoryUnitOfWork;
pub use upsell_lead_repository::InMemoryUpsellLeadRepository;

//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the scheduling core and the outside world. Adapters implement these
//! ports.
//!
//! ## Persistence ports
//!
//! - `CycleRepository` / `MeetingRepository` / `RegistrationRepository` /
//!   `UpsellLeadRepository` - aggregate persistence
//! - `CompletionUnitOfWork` / `DuplicationUnitOfWork` - transactional
//!   boundaries for the multi-aggregate writes
//!
//! ## Collaborator ports
//!
//! - `HolidayCalendar` - external holiday data source
//! - `InstructorDirectory` - read-only instructor rate lookups
//! - `ConferenceCleanup` - best-effort conferencing teardown
//! - `CompletionNotifier` - fire-and-forget completion summaries
//!
//! ## Event ports
//!
//! - `EventPublisher` - Port for publishing domain events
//! - `EventSubscriber` - Port for subscribing to domain events
//! - `EventHandler` - Handler that processes incoming events

mod completion_notifier;
mod completion_unit_of_work;
mod conference_cleanup;
mod cycle_repository;
mod duplication_unit_of_work;
mod event_publisher;
mod event_subscriber;
mod holiday_calendar;
mod instructor_directory;
mod meeting_repository;
mod registration_repository;
mod upsell_lead_repository;

pub use completion_notifier::{CompletionNotifier, CycleSummary};
pub use completion_unit_of_work::CompletionUnitOfWork;
pub use conference_cleanup::ConferenceCleanup;
pub use cycle_repository::CycleRepository;
pub use duplication_unit_of_work::DuplicationUnitOfWork;
pub use event_publisher::EventPublisher;
pub use event_subscriber::{EventBus, EventHandler, EventSubscriber};
pub use holiday_calendar::HolidayCalendar;
pub use instructor_directory::InstructorDirectory;
pub use meeting_repository::MeetingRepository;
pub use registration_repository::RegistrationRepository;
pub use upsell_lead_repository::UpsellLeadRepository;

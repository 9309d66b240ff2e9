//! PostgreSQL adapters for the persistence ports.

mod conversions;
mod cycle_repository;
mod meeting_repository;
mod registration_repository;
mod unit_of_work;
mod upsell_lead_repository;

pub use cycle_repository::PostgresCycleRepository;
pub use meeting_repository::PostgresMeetingRepository;
pub use registration_repository::PostgresRegistrationRepository;
pub use unit_of_work::PostgresUnitOfWork;
pub use upsell_lead_repository::PostgresUpsellLeadRepository;

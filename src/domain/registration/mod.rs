//! Registration domain - enrollments and the sales handoff they produce.

mod registration;
mod upsell_lead;

pub use registration::Registration;
pub use upsell_lead::UpsellLead;

//! Holiday calendar adapters.
//!
//! `HebcalHolidayCalendar` is the production source; wrap it in
//! `CachedHolidayCalendar` for the per-year process cache and degraded
//! fallback. `FixedHolidayCalendar` backs tests.

mod cached;
mod fixed;
mod hebcal;

pub use cached::CachedHolidayCalendar;
pub use fixed::FixedHolidayCalendar;
pub use hebcal::{HebcalConfig, HebcalHolidayCalendar};

//! Holiday calendar port - the external source of non-teaching dates.

use async_trait::async_trait;

use crate::domain::calendar::HolidaySet;
use crate::domain::foundation::DomainError;

/// Source of holiday dates for a calendar year.
///
/// Backed by any external holiday data source. Callers that must not
/// block on calendar availability wrap an implementation in the caching
/// decorator, which absorbs failures into an empty set.
#[async_trait]
pub trait HolidayCalendar: Send + Sync {
    /// Fetch the holiday dates of one calendar year.
    ///
    /// # Errors
    ///
    /// - `CalendarUnavailable` when the backing source cannot be reached
    async fn fetch_holidays(&self, year: i32) -> Result<HolidaySet, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn holiday_calendar_is_object_safe() {
        fn _accepts_dyn(_cal: &dyn HolidayCalendar) {}
    }
}

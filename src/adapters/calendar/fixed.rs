//! Fixed holiday calendar for testing.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::calendar::HolidaySet;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::HolidayCalendar;

/// Holiday calendar backed by a fixed in-memory table.
///
/// For tests only; supports error injection and counts fetches so cache
/// behavior can be asserted.
#[derive(Default)]
pub struct FixedHolidayCalendar {
    years: Mutex<HashMap<i32, HolidaySet>>,
    fail: Mutex<bool>,
    fetch_count: Mutex<u32>,
}

impl FixedHolidayCalendar {
    /// Creates an empty calendar (every year resolves to no holidays).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a calendar with holidays for one year.
    pub fn with_year(year: i32, dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        let calendar = Self::new();
        calendar.set_year(year, dates);
        calendar
    }

    /// Sets the holidays of a year.
    pub fn set_year(&self, year: i32, dates: impl IntoIterator<Item = NaiveDate>) {
        self.years
            .lock()
            .expect("lock poisoned")
            .insert(year, HolidaySet::from_dates(dates));
    }

    /// Makes every subsequent fetch fail.
    pub fn fail_fetches(&self) {
        *self.fail.lock().expect("lock poisoned") = true;
    }

    /// Restores normal fetching after `fail_fetches`.
    pub fn restore(&self) {
        *self.fail.lock().expect("lock poisoned") = false;
    }

    /// Number of fetches served (for cache assertions).
    pub fn fetch_count(&self) -> u32 {
        *self.fetch_count.lock().expect("lock poisoned")
    }
}

#[async_trait]
impl HolidayCalendar for FixedHolidayCalendar {
    async fn fetch_holidays(&self, year: i32) -> Result<HolidaySet, DomainError> {
        *self.fetch_count.lock().expect("lock poisoned") += 1;
        if *self.fail.lock().expect("lock poisoned") {
            return Err(DomainError::new(
                ErrorCode::CalendarUnavailable,
                "Simulated calendar outage",
            ));
        }
        Ok(self
            .years
            .lock()
            .expect("lock poisoned")
            .get(&year)
            .cloned()
            .unwrap_or_default())
    }
}

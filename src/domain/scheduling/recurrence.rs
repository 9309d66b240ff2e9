//! Recurrence expansion - turning a cycle definition into meeting dates.
//!
//! A `RecurrenceRule` describes a weekly repetition (start date, target
//! weekday, desired meeting count). `expand` walks the weekly grid and
//! returns the concrete dates, skipping holidays without shifting the grid.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::domain::calendar::HolidaySet;
use crate::domain::foundation::{DomainError, ErrorCode};

/// Attempt multiplier guarding against a holiday set that swallows the
/// whole grid. Generation gives up after `count × ATTEMPT_FACTOR` steps.
const ATTEMPT_FACTOR: u32 = 3;

/// Parses a business weekday index (0 = Sunday .. 6 = Saturday).
pub fn weekday_from_index(index: u8) -> Result<Weekday, DomainError> {
    let weekday = match index {
        0 => Weekday::Sun,
        1 => Weekday::Mon,
        2 => Weekday::Tue,
        3 => Weekday::Wed,
        4 => Weekday::Thu,
        5 => Weekday::Fri,
        6 => Weekday::Sat,
        _ => {
            return Err(DomainError::new(
                ErrorCode::InvalidRecurrenceInput,
                format!("Unknown weekday index: {}", index),
            )
            .with_detail("weekday", index.to_string()))
        }
    };
    Ok(weekday)
}

/// Advances `start` forward, day by day, to the first date falling on
/// `weekday`. Never moves backward; a date already on the target weekday
/// is returned unchanged.
pub fn anchor_to_weekday(start: NaiveDate, weekday: Weekday) -> NaiveDate {
    let mut date = start;
    while date.weekday() != weekday {
        date += Duration::days(1);
    }
    date
}

/// Projects the end date of a cycle whose meetings start at `anchor`:
/// the anchor plus `count − 1` whole weeks. Holidays are not consulted;
/// this is the estimate used by cycle duplication, refined later by
/// actually generating meetings.
pub fn project_end_date(anchor: NaiveDate, count: u32) -> NaiveDate {
    anchor + Duration::weeks(i64::from(count.saturating_sub(1)))
}

/// A validated weekly recurrence definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecurrenceRule {
    start_date: NaiveDate,
    weekday: Weekday,
    count: u32,
}

impl RecurrenceRule {
    /// Creates a rule, rejecting a zero meeting count.
    pub fn new(start_date: NaiveDate, weekday: Weekday, count: u32) -> Result<Self, DomainError> {
        if count == 0 {
            return Err(DomainError::new(
                ErrorCode::InvalidRecurrenceInput,
                "Meeting count must be positive",
            )
            .with_detail("count", count.to_string()));
        }
        Ok(Self {
            start_date,
            weekday,
            count,
        })
    }

    /// Returns the rule's start date.
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// Returns the target weekday.
    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    /// Returns the desired number of meetings.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Expands the rule into concrete meeting dates.
    ///
    /// From the weekday anchor, steps forward in fixed 7-day increments.
    /// A date in the holiday set is skipped, but the grid still advances
    /// by 7 days, so a skipped slot pushes the schedule one week out
    /// without changing the weekday alignment.
    ///
    /// Stops once `count` dates are accepted, or after `count × 3`
    /// attempts; in the latter case the result is marked truncated and
    /// carries however many dates were accepted.
    pub fn expand(&self, holidays: &HolidaySet) -> GeneratedSchedule {
        let max_attempts = self.count * ATTEMPT_FACTOR;
        let mut dates = Vec::with_capacity(self.count as usize);
        let mut current = anchor_to_weekday(self.start_date, self.weekday);
        let mut attempts = 0;

        while (dates.len() as u32) < self.count && attempts < max_attempts {
            attempts += 1;
            if !holidays.contains(current) {
                dates.push(current);
            }
            current += Duration::weeks(1);
        }

        GeneratedSchedule::new(dates, self.count)
    }
}

/// The outcome of expanding a recurrence rule.
///
/// Truncation is an explicit, caller-visible signal rather than a silent
/// short list: callers decide whether a shortfall is acceptable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSchedule {
    /// Accepted meeting dates, in ascending order.
    pub dates: Vec<NaiveDate>,
    /// True when the attempt bound was hit before reaching the requested count.
    pub truncated: bool,
    /// Number of requested dates that could not be generated.
    pub shortfall: u32,
}

impl GeneratedSchedule {
    fn new(dates: Vec<NaiveDate>, requested: u32) -> Self {
        let shortfall = requested - dates.len() as u32;
        Self {
            truncated: shortfall > 0,
            shortfall,
            dates,
        }
    }

    /// Returns the last accepted date, which becomes the cycle's end date.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// Returns the number of accepted dates.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Returns true when no dates were accepted at all.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

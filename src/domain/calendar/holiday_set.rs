//! HolidaySet value object - dates on which no meeting may be scheduled.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};

/// An immutable set of non-teaching dates.
///
/// A set is typically scoped to a single calendar year when fetched from
/// the calendar provider; sets for several years are merged when a cycle's
/// meetings span a year boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidaySet {
    dates: HashSet<NaiveDate>,
}

impl HolidaySet {
    /// Creates an empty holiday set.
    ///
    /// An empty set is also the degraded-calendar fallback: scheduling
    /// proceeds without holiday exclusions rather than blocking.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a holiday set from a collection of dates.
    pub fn from_dates(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            dates: dates.into_iter().collect(),
        }
    }

    /// Returns true if the given date is a holiday.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    /// Returns the number of holiday dates in the set.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Returns true if the set holds no dates.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Merges another set into this one, returning the union.
    pub fn merge(mut self, other: HolidaySet) -> Self {
        self.dates.extend(other.dates);
        self
    }

    /// Returns the distinct calendar years covered by the set.
    pub fn years(&self) -> HashSet<i32> {
        self.dates.iter().map(|d| d.year()).collect()
    }

    /// Iterates over the holiday dates (unordered).
    pub fn iter(&self) -> impl Iterator<Item = &NaiveDate> {
        self.dates.iter()
    }
}

impl FromIterator<NaiveDate> for HolidaySet {
    fn from_iter<T: IntoIterator<Item = NaiveDate>>(iter: T) -> Self {
        Self::from_dates(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn empty_set_contains_nothing() {
        let set = HolidaySet::empty();
        assert!(set.is_empty());
        assert!(!set.contains(date(2025, 1, 20)));
    }

    #[test]
    fn from_dates_contains_given_dates() {
        let set = HolidaySet::from_dates([date(2025, 1, 20), date(2025, 4, 13)]);
        assert_eq!(set.len(), 2);
        assert!(set.contains(date(2025, 1, 20)));
        assert!(set.contains(date(2025, 4, 13)));
        assert!(!set.contains(date(2025, 1, 21)));
    }

    #[test]
    fn duplicate_dates_are_collapsed() {
        let set = HolidaySet::from_dates([date(2025, 1, 20), date(2025, 1, 20)]);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn merge_produces_union() {
        let a = HolidaySet::from_dates([date(2025, 12, 25)]);
        let b = HolidaySet::from_dates([date(2026, 1, 1), date(2025, 12, 25)]);

        let merged = a.merge(b);

        assert_eq!(merged.len(), 2);
        assert!(merged.contains(date(2025, 12, 25)));
        assert!(merged.contains(date(2026, 1, 1)));
    }

    #[test]
    fn years_reports_covered_years() {
        let set = HolidaySet::from_dates([date(2025, 12, 25), date(2026, 1, 1)]);
        let years = set.years();
        assert!(years.contains(&2025));
        assert!(years.contains(&2026));
        assert_eq!(years.len(), 2);
    }

    #[test]
    fn collects_from_iterator() {
        let set: HolidaySet = (1..=3).map(|d| date(2025, 9, d)).collect();
        assert_eq!(set.len(), 3);
    }
}

//! Property tests for recurrence expansion.

use chrono::{Datelike, Duration, NaiveDate};
use proptest::prelude::*;

use class_pulse::domain::calendar::HolidaySet;
use class_pulse::domain::scheduling::{weekday_from_index, RecurrenceRule};

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

prop_compose! {
    /// An arbitrary start date within a couple of years of 2024.
    fn arb_start_date()(offset in 0i64..730) -> NaiveDate {
        base_date() + Duration::days(offset)
    }
}

prop_compose! {
    /// A holiday set sprinkled around the start date's neighborhood.
    fn arb_holidays()(offsets in prop::collection::vec(0i64..365, 0..40)) -> Vec<i64> {
        offsets
    }
}

proptest! {
    #[test]
    fn expansion_reaches_count_or_signals_truncation(
        start in arb_start_date(),
        weekday_idx in 0u8..7,
        count in 1u32..25,
        holiday_offsets in arb_holidays(),
    ) {
        let weekday = weekday_from_index(weekday_idx).unwrap();
        let holidays: HolidaySet = holiday_offsets
            .iter()
            .map(|&o| start + Duration::days(o))
            .collect();

        let rule = RecurrenceRule::new(start, weekday, count).unwrap();
        let schedule = rule.expand(&holidays);

        if schedule.truncated {
            prop_assert!(schedule.dates.len() < count as usize);
            prop_assert_eq!(
                schedule.shortfall as usize,
                count as usize - schedule.dates.len()
            );
        } else {
            prop_assert_eq!(schedule.dates.len(), count as usize);
            prop_assert_eq!(schedule.shortfall, 0);
        }
    }

    #[test]
    fn every_date_is_on_target_weekday_and_not_a_holiday(
        start in arb_start_date(),
        weekday_idx in 0u8..7,
        count in 1u32..25,
        holiday_offsets in arb_holidays(),
    ) {
        let weekday = weekday_from_index(weekday_idx).unwrap();
        let holidays: HolidaySet = holiday_offsets
            .iter()
            .map(|&o| start + Duration::days(o))
            .collect();

        let rule = RecurrenceRule::new(start, weekday, count).unwrap();
        let schedule = rule.expand(&holidays);

        for date in &schedule.dates {
            prop_assert_eq!(date.weekday(), weekday);
            prop_assert!(!holidays.contains(*date));
            prop_assert!(*date >= start, "never schedules before the start date");
        }
    }

    #[test]
    fn dates_stay_on_the_weekly_grid(
        start in arb_start_date(),
        weekday_idx in 0u8..7,
        count in 2u32..25,
        holiday_offsets in arb_holidays(),
    ) {
        let weekday = weekday_from_index(weekday_idx).unwrap();
        let holidays: HolidaySet = holiday_offsets
            .iter()
            .map(|&o| start + Duration::days(o))
            .collect();

        let rule = RecurrenceRule::new(start, weekday, count).unwrap();
        let schedule = rule.expand(&holidays);

        // Skipped holidays stretch gaps to larger multiples of a week,
        // but never off the grid.
        for pair in schedule.dates.windows(2) {
            let gap = (pair[1] - pair[0]).num_days();
            prop_assert!(gap > 0);
            prop_assert_eq!(gap % 7, 0);
        }
    }

    #[test]
    fn expansion_without_holidays_is_exactly_weekly(
        start in arb_start_date(),
        weekday_idx in 0u8..7,
        count in 1u32..25,
    ) {
        let weekday = weekday_from_index(weekday_idx).unwrap();
        let rule = RecurrenceRule::new(start, weekday, count).unwrap();
        let schedule = rule.expand(&HolidaySet::empty());

        prop_assert_eq!(schedule.dates.len(), count as usize);
        for pair in schedule.dates.windows(2) {
            prop_assert_eq!((pair[1] - pair[0]).num_days(), 7);
        }
    }
}

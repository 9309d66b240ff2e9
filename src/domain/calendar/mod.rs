//! Calendar domain - holiday dates that block meeting scheduling.

mod holiday_set;

pub use holiday_set::HolidaySet;

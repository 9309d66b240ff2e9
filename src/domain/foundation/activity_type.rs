//! ActivityType enum - the delivery format of a cycle or meeting.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Delivery format of a class activity.
///
/// Drives the hourly-rate lookup in payment calculation: `Online` and
/// `PrivateLesson` fall back to the frontal rate when their own rate is
/// unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Online,
    #[default]
    Frontal,
    PrivateLesson,
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActivityType::Online => "Online",
            ActivityType::Frontal => "Frontal",
            ActivityType::PrivateLesson => "PrivateLesson",
        };
        write!(f, "{}", s)
    }
}

//! RateTable value object - an instructor's hourly rates.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ActivityType;

/// Per-instructor hourly rates, keyed by activity type, plus an optional
/// support-role rate.
///
/// Every rate is optional: a missing rate resolves to zero pay rather
/// than an error, so an unconfigured instructor never blocks a meeting
/// transition. Zero-pay meetings are surfaced for administrative review
/// by the callers instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    /// Hourly rate for frontal (in-person group) teaching.
    pub frontal: Option<f64>,
    /// Hourly rate for online teaching.
    pub online: Option<f64>,
    /// Hourly rate for one-on-one private lessons.
    pub private_lesson: Option<f64>,
    /// Hourly rate when assisting as a support instructor.
    pub support: Option<f64>,
}

impl RateTable {
    /// Creates an empty rate table (all lookups resolve to zero).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sets the frontal hourly rate.
    pub fn with_frontal(mut self, rate: f64) -> Self {
        self.frontal = Some(rate);
        self
    }

    /// Sets the online hourly rate.
    pub fn with_online(mut self, rate: f64) -> Self {
        self.online = Some(rate);
        self
    }

    /// Sets the private-lesson hourly rate.
    pub fn with_private_lesson(mut self, rate: f64) -> Self {
        self.private_lesson = Some(rate);
        self
    }

    /// Sets the support hourly rate.
    pub fn with_support(mut self, rate: f64) -> Self {
        self.support = Some(rate);
        self
    }

    /// Resolves the hourly rate for an activity type.
    ///
    /// Online and private-lesson lookups fall back to the frontal rate
    /// when their own rate is unset; a fully unset table resolves to 0.
    pub fn rate_for(&self, activity: ActivityType) -> f64 {
        let rate = match activity {
            ActivityType::Frontal => self.frontal,
            ActivityType::Online => self.online.or(self.frontal),
            ActivityType::PrivateLesson => self.private_lesson.or(self.frontal),
        };
        rate.unwrap_or(0.0)
    }

    /// Resolves the support-role hourly rate (0 when unset).
    pub fn support_rate(&self) -> f64 {
        self.support.unwrap_or(0.0)
    }
}

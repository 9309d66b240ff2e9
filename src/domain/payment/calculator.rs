//! Instructor payment calculation for a single meeting.
//!
//! Three pricing modes, first match wins: budget envelope for the cycle's
//! primary instructor, support hourly rate for assisting instructors,
//! activity hourly rate otherwise. All modes round to whole currency units.

use crate::domain::foundation::{ActivityType, InstructorRole};

use super::RateTable;

/// Everything the calculator needs to price one meeting.
#[derive(Debug, Clone)]
pub struct PaymentContext {
    /// The assigned instructor's hourly rates.
    pub rates: RateTable,
    /// The instructor's role on this specific meeting.
    pub role: InstructorRole,
    /// Whether the assigned instructor is the cycle's designated primary.
    pub is_primary_instructor: bool,
    /// The cycle's fixed instructor budget, when one exists.
    pub budget_envelope: Option<i64>,
    /// The cycle's planned meeting count (envelope divisor).
    pub total_meetings: u32,
    /// Meeting length in minutes.
    pub duration_minutes: u32,
    /// Meeting delivery format (drives the rate lookup).
    pub activity_type: ActivityType,
}

/// Stateless payment calculator.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaymentCalculator;

impl PaymentCalculator {
    /// Creates a calculator.
    pub fn new() -> Self {
        Self
    }

    /// Computes the instructor payment for one meeting, in whole currency
    /// units.
    ///
    /// Resolution order, first match wins:
    /// 1. Envelope: the assigned instructor is the cycle's primary, the
    ///    cycle carries a budget envelope, and `total_meetings > 0` —
    ///    the envelope divides evenly across meetings, independent of
    ///    duration.
    /// 2. Support: the instructor assists at the support hourly rate.
    /// 3. Activity rate: the hourly rate for the meeting's activity type
    ///    (online/private-lesson fall back to the frontal rate).
    ///
    /// Missing rates or budgets yield 0, never an error.
    pub fn calculate(&self, ctx: &PaymentContext) -> i64 {
        if ctx.is_primary_instructor && ctx.total_meetings > 0 {
            if let Some(envelope) = ctx.budget_envelope {
                return (envelope as f64 / f64::from(ctx.total_meetings)).round() as i64;
            }
        }

        let hours = f64::from(ctx.duration_minutes) / 60.0;
        let hourly = match ctx.role {
            InstructorRole::Support => ctx.rates.support_rate(),
            InstructorRole::Lead => ctx.rates.rate_for(ctx.activity_type),
        };

        (hourly * hours).round() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_context() -> PaymentContext {
        PaymentContext {
            rates: RateTable::empty().with_frontal(120.0),
            role: InstructorRole::Lead,
            is_primary_instructor: false,
            budget_envelope: None,
            total_meetings: 10,
            duration_minutes: 60,
            activity_type: ActivityType::Frontal,
        }
    }

    // ───────────────────────────────────────────────────────────────
    // Envelope mode
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn envelope_divides_evenly_across_meetings() {
        let ctx = PaymentContext {
            is_primary_instructor: true,
            budget_envelope: Some(1000),
            total_meetings: 10,
            ..base_context()
        };

        assert_eq!(PaymentCalculator::new().calculate(&ctx), 100);
    }

    #[test]
    fn envelope_ignores_duration() {
        let short = PaymentContext {
            is_primary_instructor: true,
            budget_envelope: Some(1000),
            duration_minutes: 45,
            ..base_context()
        };
        let long = PaymentContext {
            duration_minutes: 120,
            ..short.clone()
        };

        let calc = PaymentCalculator::new();
        assert_eq!(calc.calculate(&short), calc.calculate(&long));
    }

    #[test]
    fn envelope_rounds_to_nearest_unit() {
        let ctx = PaymentContext {
            is_primary_instructor: true,
            budget_envelope: Some(1000),
            total_meetings: 3,
            ..base_context()
        };

        // 1000 / 3 = 333.33… → 333
        assert_eq!(PaymentCalculator::new().calculate(&ctx), 333);
    }

    #[test]
    fn envelope_requires_primary_instructor() {
        let ctx = PaymentContext {
            is_primary_instructor: false,
            budget_envelope: Some(1000),
            duration_minutes: 90,
            ..base_context()
        };

        // Falls through to the activity rate: 120/hr × 1.5h = 180
        assert_eq!(PaymentCalculator::new().calculate(&ctx), 180);
    }

    #[test]
    fn envelope_with_zero_total_meetings_falls_through() {
        let ctx = PaymentContext {
            is_primary_instructor: true,
            budget_envelope: Some(1000),
            total_meetings: 0,
            duration_minutes: 60,
            ..base_context()
        };

        assert_eq!(PaymentCalculator::new().calculate(&ctx), 120);
    }

    // ───────────────────────────────────────────────────────────────
    // Support mode
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn support_role_uses_support_rate() {
        let ctx = PaymentContext {
            rates: RateTable::empty().with_frontal(120.0).with_support(80.0),
            role: InstructorRole::Support,
            duration_minutes: 90,
            ..base_context()
        };

        // 80/hr × 1.5h = 120
        assert_eq!(PaymentCalculator::new().calculate(&ctx), 120);
    }

    #[test]
    fn support_role_without_rate_pays_zero() {
        let ctx = PaymentContext {
            rates: RateTable::empty().with_frontal(120.0),
            role: InstructorRole::Support,
            ..base_context()
        };

        assert_eq!(PaymentCalculator::new().calculate(&ctx), 0);
    }

    #[test]
    fn envelope_wins_over_support_for_primary() {
        let ctx = PaymentContext {
            rates: RateTable::empty().with_support(80.0),
            role: InstructorRole::Support,
            is_primary_instructor: true,
            budget_envelope: Some(500),
            total_meetings: 5,
            ..base_context()
        };

        assert_eq!(PaymentCalculator::new().calculate(&ctx), 100);
    }

    // ───────────────────────────────────────────────────────────────
    // Activity-rate mode
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn frontal_meeting_pays_rate_times_hours() {
        let ctx = PaymentContext {
            duration_minutes: 90,
            ..base_context()
        };

        // 120/hr × 1.5h = 180
        assert_eq!(PaymentCalculator::new().calculate(&ctx), 180);
    }

    #[test]
    fn online_meeting_falls_back_to_frontal_rate() {
        let ctx = PaymentContext {
            activity_type: ActivityType::Online,
            duration_minutes: 60,
            ..base_context()
        };

        assert_eq!(PaymentCalculator::new().calculate(&ctx), 120);
    }

    #[test]
    fn activity_rate_rounds_to_nearest_unit() {
        let ctx = PaymentContext {
            rates: RateTable::empty().with_frontal(95.0),
            duration_minutes: 50,
            ..base_context()
        };

        // 95 × 50/60 = 79.17 → 79
        assert_eq!(PaymentCalculator::new().calculate(&ctx), 79);
    }

    #[test]
    fn empty_rate_table_pays_zero() {
        let ctx = PaymentContext {
            rates: RateTable::empty(),
            duration_minutes: 90,
            ..base_context()
        };

        assert_eq!(PaymentCalculator::new().calculate(&ctx), 0);
    }
}

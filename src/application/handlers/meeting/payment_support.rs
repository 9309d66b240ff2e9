//! Shared payment resolution for meeting transition handlers.

use std::sync::Arc;

use crate::domain::cycle::Cycle;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::meeting::Meeting;
use crate::domain::payment::{PaymentCalculator, PaymentContext};
use crate::ports::InstructorDirectory;

/// Resolves the instructor payment for one meeting.
///
/// A meeting without an assigned instructor pays 0. An assigned but
/// unknown instructor is a caller error (`InstructorNotFound`); a known
/// instructor with no configured rates resolves to 0 through the rate
/// table's own fallbacks.
pub(crate) async fn resolve_payment(
    cycle: &Cycle,
    meeting: &Meeting,
    directory: &Arc<dyn InstructorDirectory>,
) -> Result<i64, DomainError> {
    let Some(instructor_id) = meeting.instructor_id() else {
        return Ok(0);
    };

    let rates = directory
        .rate_table(&instructor_id)
        .await?
        .ok_or_else(|| {
            DomainError::new(
                ErrorCode::InstructorNotFound,
                format!("Instructor not found: {}", instructor_id),
            )
        })?;

    let ctx = PaymentContext {
        rates,
        role: meeting.instructor_role(),
        is_primary_instructor: cycle.is_primary_instructor(instructor_id),
        budget_envelope: cycle.instructor_budget(),
        total_meetings: cycle.total_meetings(),
        duration_minutes: meeting.duration_minutes(),
        activity_type: meeting.activity_type(),
    };

    Ok(PaymentCalculator::new().calculate(&ctx))
}

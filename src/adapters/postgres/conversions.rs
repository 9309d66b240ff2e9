//! String/integer conversions between domain enums and their column
//! representations.

use chrono::Weekday;

use crate::domain::foundation::{
    ActivityType, CycleStatus, DomainError, ErrorCode, InstructorRole, MeetingStatus,
    PricingMode, RegistrationStatus,
};
use crate::domain::scheduling::weekday_from_index;

pub(crate) fn cycle_status_to_str(status: CycleStatus) -> &'static str {
    match status {
        CycleStatus::Active => "active",
        CycleStatus::Completed => "completed",
        CycleStatus::Cancelled => "cancelled",
    }
}

pub(crate) fn str_to_cycle_status(s: &str) -> Result<CycleStatus, DomainError> {
    match s {
        "active" => Ok(CycleStatus::Active),
        "completed" => Ok(CycleStatus::Completed),
        "cancelled" => Ok(CycleStatus::Cancelled),
        other => Err(unknown_value("cycle status", other)),
    }
}

pub(crate) fn meeting_status_to_str(status: MeetingStatus) -> &'static str {
    match status {
        MeetingStatus::Scheduled => "scheduled",
        MeetingStatus::Completed => "completed",
        MeetingStatus::Cancelled => "cancelled",
        MeetingStatus::Postponed => "postponed",
    }
}

pub(crate) fn str_to_meeting_status(s: &str) -> Result<MeetingStatus, DomainError> {
    match s {
        "scheduled" => Ok(MeetingStatus::Scheduled),
        "completed" => Ok(MeetingStatus::Completed),
        "cancelled" => Ok(MeetingStatus::Cancelled),
        "postponed" => Ok(MeetingStatus::Postponed),
        other => Err(unknown_value("meeting status", other)),
    }
}

pub(crate) fn registration_status_to_str(status: RegistrationStatus) -> &'static str {
    match status {
        RegistrationStatus::Registered => "registered",
        RegistrationStatus::Active => "active",
        RegistrationStatus::Completed => "completed",
        RegistrationStatus::Cancelled => "cancelled",
    }
}

pub(crate) fn str_to_registration_status(s: &str) -> Result<RegistrationStatus, DomainError> {
    match s {
        "registered" => Ok(RegistrationStatus::Registered),
        "active" => Ok(RegistrationStatus::Active),
        "completed" => Ok(RegistrationStatus::Completed),
        "cancelled" => Ok(RegistrationStatus::Cancelled),
        other => Err(unknown_value("registration status", other)),
    }
}

pub(crate) fn activity_type_to_str(at: ActivityType) -> &'static str {
    match at {
        ActivityType::Online => "online",
        ActivityType::Frontal => "frontal",
        ActivityType::PrivateLesson => "private_lesson",
    }
}

pub(crate) fn str_to_activity_type(s: &str) -> Result<ActivityType, DomainError> {
    match s {
        "online" => Ok(ActivityType::Online),
        "frontal" => Ok(ActivityType::Frontal),
        "private_lesson" => Ok(ActivityType::PrivateLesson),
        other => Err(unknown_value("activity type", other)),
    }
}

pub(crate) fn pricing_mode_to_str(mode: PricingMode) -> &'static str {
    match mode {
        PricingMode::Private => "private",
        PricingMode::InstitutionalPerChild => "institutional_per_child",
        PricingMode::InstitutionalFixed => "institutional_fixed",
    }
}

pub(crate) fn str_to_pricing_mode(s: &str) -> Result<PricingMode, DomainError> {
    match s {
        "private" => Ok(PricingMode::Private),
        "institutional_per_child" => Ok(PricingMode::InstitutionalPerChild),
        "institutional_fixed" => Ok(PricingMode::InstitutionalFixed),
        other => Err(unknown_value("pricing mode", other)),
    }
}

pub(crate) fn instructor_role_to_str(role: InstructorRole) -> &'static str {
    match role {
        InstructorRole::Lead => "lead",
        InstructorRole::Support => "support",
    }
}

pub(crate) fn str_to_instructor_role(s: &str) -> Result<InstructorRole, DomainError> {
    match s {
        "lead" => Ok(InstructorRole::Lead),
        "support" => Ok(InstructorRole::Support),
        other => Err(unknown_value("instructor role", other)),
    }
}

/// Stored as 0 = Sunday .. 6 = Saturday, matching the business week.
pub(crate) fn weekday_to_index(weekday: Weekday) -> i16 {
    match weekday {
        Weekday::Sun => 0,
        Weekday::Mon => 1,
        Weekday::Tue => 2,
        Weekday::Wed => 3,
        Weekday::Thu => 4,
        Weekday::Fri => 5,
        Weekday::Sat => 6,
    }
}

pub(crate) fn index_to_weekday(index: i16) -> Result<Weekday, DomainError> {
    u8::try_from(index)
        .map_err(|_| unknown_value("weekday", &index.to_string()))
        .and_then(weekday_from_index)
}

fn unknown_value(what: &str, value: &str) -> DomainError {
    DomainError::new(
        ErrorCode::InternalError,
        format!("Unknown {} in database: {}", what, value),
    )
}

//! Error types for the domain layer.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: i64,
        max: i64,
        actual: i64,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an out of range validation error.
    pub fn out_of_range(field: impl Into<String>, min: i64, max: i64, actual: i64) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,
    InvalidRecurrenceInput,

    // Not found errors
    CycleNotFound,
    MeetingNotFound,
    InstructorNotFound,
    RegistrationNotFound,

    // State errors
    InvalidStateTransition,
    CycleNotActive,
    InconsistentCounters,

    // Degraded dependencies
    CalendarUnavailable,

    // Infrastructure errors
    DatabaseError,
    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::InvalidRecurrenceInput => "INVALID_RECURRENCE_INPUT",
            ErrorCode::CycleNotFound => "CYCLE_NOT_FOUND",
            ErrorCode::MeetingNotFound => "MEETING_NOT_FOUND",
            ErrorCode::InstructorNotFound => "INSTRUCTOR_NOT_FOUND",
            ErrorCode::RegistrationNotFound => "REGISTRATION_NOT_FOUND",
            ErrorCode::InvalidStateTransition => "INVALID_STATE_TRANSITION",
            ErrorCode::CycleNotActive => "CYCLE_NOT_ACTIVE",
            ErrorCode::InconsistentCounters => "INCONSISTENT_COUNTERS",
            ErrorCode::CalendarUnavailable => "CALENDAR_UNAVAILABLE",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code, message, and optional details.
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Creates a validation error for a specific field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::ValidationFailed,
            message: message.into(),
            details: HashMap::new(),
        }
        .with_detail("field", field.into())
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        DomainError::new(ErrorCode::ValidationFailed, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_empty_field_displays_correctly() {
        let err = ValidationError::empty_field("course_name");
        assert_eq!(format!("{}", err), "Field 'course_name' cannot be empty");
    }

    #[test]
    fn validation_error_out_of_range_displays_correctly() {
        let err = ValidationError::out_of_range("weekday", 0, 6, 9);
        assert_eq!(
            format!("{}", err),
            "Field 'weekday' must be between 0 and 6, got 9"
        );
    }

    #[test]
    fn domain_error_displays_code_and_message() {
        let err = DomainError::new(ErrorCode::CycleNotFound, "Cycle not found");
        assert_eq!(format!("{}", err), "[CYCLE_NOT_FOUND] Cycle not found");
    }

    #[test]
    fn domain_error_with_detail_adds_detail() {
        let err = DomainError::new(ErrorCode::ValidationFailed, "Validation failed")
            .with_detail("field", "meeting_count")
            .with_detail("reason", "must be positive");

        assert_eq!(err.details.get("field"), Some(&"meeting_count".to_string()));
        assert_eq!(err.details.get("reason"), Some(&"must be positive".to_string()));
    }

    #[test]
    fn validation_error_converts_to_domain_error() {
        let err: DomainError = ValidationError::empty_field("actor").into();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert!(err.message.contains("actor"));
    }

    #[test]
    fn error_code_display_formats_correctly() {
        assert_eq!(format!("{}", ErrorCode::MeetingNotFound), "MEETING_NOT_FOUND");
        assert_eq!(
            format!("{}", ErrorCode::InvalidRecurrenceInput),
            "INVALID_RECURRENCE_INPUT"
        );
        assert_eq!(
            format!("{}", ErrorCode::InconsistentCounters),
            "INCONSISTENT_COUNTERS"
        );
    }
}

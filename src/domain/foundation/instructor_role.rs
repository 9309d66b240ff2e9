//! InstructorRole enum - an instructor's role on a specific meeting.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of the assigned instructor for one meeting.
///
/// A `Support` instructor is paid at the support hourly rate regardless of
/// activity type; a `Lead` instructor is paid by activity rate or by the
/// cycle's budget envelope when one exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InstructorRole {
    #[default]
    Lead,
    Support,
}

impl fmt::Display for InstructorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InstructorRole::Lead => "Lead",
            InstructorRole::Support => "Support",
        };
        write!(f, "{}", s)
    }
}

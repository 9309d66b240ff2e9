//! PricingMode enum - how a cycle is billed to its customers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Billing arrangement for a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PricingMode {
    /// Individual customers pay per child.
    #[default]
    Private,
    /// An institution pays per enrolled child.
    InstitutionalPerChild,
    /// An institution pays a fixed amount for the whole cycle.
    InstitutionalFixed,
}

impl fmt::Display for PricingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PricingMode::Private => "Private",
            PricingMode::InstitutionalPerChild => "InstitutionalPerChild",
            PricingMode::InstitutionalFixed => "InstitutionalFixed",
        };
        write!(f, "{}", s)
    }
}

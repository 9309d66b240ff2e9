//! Conferencing cleanup adapters.

mod http_cleanup;

pub use http_cleanup::{ConferencingConfig, HttpConferenceCleanup};

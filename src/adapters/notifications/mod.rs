//! Completion notification adapters.

mod webhook;

pub use webhook::{NotificationConfig, WebhookCompletionNotifier};

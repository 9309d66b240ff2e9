//! Cycle domain - recurring classes and their progress counters.

mod aggregate;
mod events;
mod progress;

pub use aggregate::Cycle;
pub use events::CycleEvent;
pub use progress::CycleProgress;

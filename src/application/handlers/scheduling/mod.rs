//! Scheduling command handlers.

mod generate_meetings;

pub use generate_meetings::{
    GenerateMeetingsCommand, GenerateMeetingsError, GenerateMeetingsHandler,
    GenerateMeetingsResult, MeetingsGeneratedEvent,
};

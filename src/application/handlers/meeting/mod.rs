//! Meeting lifecycle command handlers.

mod cancel_meeting;
mod complete_meeting;
mod payment_support;
mod postpone_meeting;
mod recalculate_payment;

pub use cancel_meeting::{
    CancelMeetingCommand, CancelMeetingError, CancelMeetingHandler, CancelMeetingResult,
    MeetingCancelledEvent,
};
pub use complete_meeting::{
    CompleteMeetingCommand, CompleteMeetingError, CompleteMeetingHandler, CompleteMeetingResult,
    MeetingCompletedEvent,
};
pub use postpone_meeting::{
    MeetingPostponedEvent, PostponeMeetingCommand, PostponeMeetingError, PostponeMeetingHandler,
    PostponeMeetingResult,
};
pub use recalculate_payment::{
    MeetingPaymentRecalculatedEvent, RecalculatePaymentCommand, RecalculatePaymentError,
    RecalculatePaymentHandler, RecalculatePaymentResult,
};

//! [`Command`] definition.

pub mod cancel_booking;
pub mod complete_booking;
pub mod submit_booking;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    cancel_booking::CancelBooking, complete_booking::CompleteBooking,
    submit_booking::SubmitBooking,
};

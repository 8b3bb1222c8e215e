//! Domain definitions.

pub mod attempt;
pub mod availability;
pub mod booking;
pub mod listing;
pub mod quote;
pub mod reservation;
pub mod user;

pub use self::{
    attempt::Attempt, booking::Booking, listing::ListingPricing, quote::Quote,
    reservation::Reservation,
};

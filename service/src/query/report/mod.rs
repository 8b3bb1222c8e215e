//! Reporting [`Query`]s over the [`Booking`]s of a host.

pub mod earnings;
pub mod stats;

#[cfg(doc)]
use crate::{domain::Booking, Query};

pub use self::{earnings::HostEarnings, stats::BookingStats};

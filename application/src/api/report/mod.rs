//! Reports over the bookings of a host.

pub mod earnings;
pub mod stats;

pub use self::{earnings::Earnings, stats::Stats};

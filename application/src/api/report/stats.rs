//! [`Stats`] report definition.

use juniper::GraphQLObject;
use service::query::report::stats;

use crate::api::scalar::count;

/// Numbers of bookings of a host by their status.
#[derive(Clone, Copy, Debug, GraphQLObject)]
#[graphql(name = "BookingStatsReport")]
pub struct Stats {
    /// Number of all bookings.
    pub total: i32,

    /// Number of confirmed bookings.
    pub confirmed: i32,

    /// Number of pending bookings.
    pub pending: i32,

    /// Number of completed bookings.
    pub completed: i32,

    /// Number of cancelled bookings.
    pub cancelled: i32,

    /// Number of bookings holding their dates, either pending or confirmed.
    pub active: i32,
}

impl From<stats::Stats> for Stats {
    fn from(s: stats::Stats) -> Self {
        Self {
            total: count(s.total),
            confirmed: count(s.confirmed),
            pending: count(s.pending),
            completed: count(s.completed),
            cancelled: count(s.cancelled),
            active: count(s.active),
        }
    }
}

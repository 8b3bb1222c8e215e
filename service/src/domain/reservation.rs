//! [`Reservation`] definitions.

use common::DateRange;

use crate::domain::{booking, listing, Booking};

/// Existing reservation of a listing, as seen by conflict checks.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Reservation {
    /// ID of the reserved listing.
    pub listing_id: listing::Id,

    /// Reserved days.
    pub range: DateRange,

    /// [`booking::Status`] of the underlying [`Booking`].
    pub status: booking::Status,
}

impl Reservation {
    /// Indicates whether this [`Reservation`] still holds its days.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

impl From<&Booking> for Reservation {
    fn from(booking: &Booking) -> Self {
        Self {
            listing_id: booking.listing_id,
            range: booking.range,
            status: booking.status,
        }
    }
}

//! [`Query`] collection related to multiple [`Booking`]s.

use common::operations::By;

#[cfg(doc)]
use crate::Query;
use crate::{
    domain::{listing, Booking, Reservation},
    read,
};

use super::StoreQuery;

/// Queries [`Booking`]s of a listing.
pub type ByListing = StoreQuery<By<Vec<Booking>, listing::Id>>;

/// Queries [`Booking`]s of the listings hosted by a user.
pub type ByHost = StoreQuery<By<Vec<Booking>, read::booking::Host>>;

/// Queries [`Booking`]s made by a signed-in guest.
pub type ByGuest = StoreQuery<By<Vec<Booking>, read::booking::Guest>>;

/// Queries [`Reservation`]s of a listing.
pub type Reservations = StoreQuery<By<Vec<Reservation>, listing::Id>>;

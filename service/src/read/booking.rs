//! [`Booking`] read model definitions.

#[cfg(doc)]
use crate::domain::Booking;
use crate::domain::user;

/// Selector of [`Booking`]s of listings hosted by a user.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Host(pub user::Id);

/// Selector of [`Booking`]s made by a signed-in guest.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Guest(pub user::Id);

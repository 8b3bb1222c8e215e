//! In-memory [`Store`] implementation.

use std::sync::Arc;

use common::{
    operations::{By, Insert, Select, Update},
    DateRange,
};
use derive_more::{Display, Error as StdError};
use tokio::sync::RwLock;
use tracerr::Traced;

use crate::{
    domain::{booking, listing, Booking, Reservation},
    infra::{store, Store},
    read,
};

/// [`Store`] keeping [`Booking`]s in memory of the current process.
///
/// Rejects inserting an active [`Booking`] overlapping another active one of
/// the same listing, atomically with the insertion.
#[derive(Clone, Debug, Default)]
pub struct Memory {
    /// Stored [`Booking`]s in insertion order.
    bookings: Arc<RwLock<Vec<Booking>>>,
}

impl Memory {
    /// Creates a new [`Memory`] store pre-populated with the provided
    /// [`Booking`]s.
    #[must_use]
    pub fn with_bookings(bookings: impl IntoIterator<Item = Booking>) -> Self {
        Self {
            bookings: Arc::new(RwLock::new(bookings.into_iter().collect())),
        }
    }

    /// Selects clones of the stored [`Booking`]s matching the provided
    /// predicate.
    async fn filter(&self, f: impl Fn(&Booking) -> bool) -> Vec<Booking> {
        self.bookings
            .read()
            .await
            .iter()
            .filter(|b| f(b))
            .cloned()
            .collect()
    }
}

impl Store<Select<By<Vec<Reservation>, listing::Id>>> for Memory {
    type Ok = Vec<Reservation>;
    type Err = Traced<store::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Reservation>, listing::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let listing_id = by.into_inner();
        Ok(self
            .bookings
            .read()
            .await
            .iter()
            .filter(|b| b.listing_id == listing_id)
            .map(Reservation::from)
            .collect())
    }
}

impl Store<Select<By<Option<Booking>, booking::Id>>> for Memory {
    type Ok = Option<Booking>;
    type Err = Traced<store::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Booking>, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self.filter(|b| b.id == id).await.pop())
    }
}

impl Store<Select<By<Vec<Booking>, listing::Id>>> for Memory {
    type Ok = Vec<Booking>;
    type Err = Traced<store::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Booking>, listing::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let listing_id = by.into_inner();
        Ok(self.filter(|b| b.listing_id == listing_id).await)
    }
}

impl Store<Select<By<Vec<Booking>, read::booking::Host>>> for Memory {
    type Ok = Vec<Booking>;
    type Err = Traced<store::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Booking>, read::booking::Host>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::booking::Host(host_id) = by.into_inner();
        Ok(self.filter(|b| b.host_id == host_id).await)
    }
}

impl Store<Select<By<Vec<Booking>, read::booking::Guest>>> for Memory {
    type Ok = Vec<Booking>;
    type Err = Traced<store::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Booking>, read::booking::Guest>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::booking::Guest(guest_id) = by.into_inner();
        Ok(self.filter(|b| b.guest.user_id == Some(guest_id)).await)
    }
}

impl Store<Insert<Booking>> for Memory {
    type Ok = Booking;
    type Err = Traced<store::Error>;

    async fn execute(
        &self,
        Insert(booking): Insert<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut bookings = self.bookings.write().await;

        if bookings.iter().any(|b| b.id == booking.id) {
            return Err(tracerr::new!(store::Error::from(
                Error::AlreadyExists(booking.id)
            )));
        }
        if booking.status.is_active() {
            let taken = bookings.iter().find(|b| {
                b.listing_id == booking.listing_id
                    && b.status.is_active()
                    && b.range.overlaps(&booking.range)
            });
            if let Some(taken) = taken {
                return Err(tracerr::new!(store::Error::from(
                    Error::Conflict {
                        id: taken.id,
                        range: taken.range,
                    }
                )));
            }
        }

        bookings.push(booking.clone());
        Ok(booking)
    }
}

impl Store<Update<Booking>> for Memory {
    type Ok = Booking;
    type Err = Traced<store::Error>;

    async fn execute(
        &self,
        Update(booking): Update<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut bookings = self.bookings.write().await;

        let stored = bookings
            .iter_mut()
            .find(|b| b.id == booking.id)
            .ok_or_else(|| {
                tracerr::new!(store::Error::from(Error::NotExists(booking.id)))
            })?;
        *stored = booking.clone();
        Ok(booking)
    }
}

/// [`Memory`] store error.
#[derive(Clone, Copy, Debug, Display, StdError)]
pub enum Error {
    /// [`Booking`] with the same ID is stored already.
    #[display("`Booking(id: {_0})` already exists")]
    AlreadyExists(#[error(not(source))] booking::Id),

    /// Active [`Booking`] of the same listing overlaps.
    #[display("dates `{range}` are taken by `Booking(id: {id})`")]
    Conflict {
        /// ID of the overlapping [`Booking`].
        id: booking::Id,

        /// Days taken by the overlapping [`Booking`].
        range: DateRange,
    },

    /// [`Booking`] is not stored.
    #[display("`Booking(id: {_0})` does not exist")]
    NotExists(#[error(not(source))] booking::Id),
}

impl Error {
    /// Indicates whether this [`Error`] is a [`Error::Conflict`].
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Insert, Select, Update};

    use crate::{
        domain::{booking, listing, Booking, Reservation},
        fixture,
        infra::store,
        Command as _, Config, Service,
    };

    use super::{Error, Memory, Store as _};

    async fn booked(
        store: &Memory,
        listing_id: listing::Id,
        range: &str,
    ) -> Booking {
        Service::new(Config::default(), store.clone())
            .execute(fixture::submit(listing_id, range))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn rejects_overlapping_active_booking() {
        let store = Memory::default();
        let listing = listing::Id::new();
        let first = booked(&store, listing, "2025-09-10..2025-09-12").await;

        let overlapping = Booking {
            id: booking::Id::new(),
            range: "2025-09-12..2025-09-14".parse().unwrap(),
            ..first.clone()
        };
        let err = store.execute(Insert(overlapping.clone())).await.unwrap_err();
        assert!(err.as_ref().is_conflict());

        let mut cancelled = first;
        cancelled.transition(booking::Status::Cancelled).unwrap();
        _ = store.execute(Update(cancelled)).await.unwrap();
        _ = store.execute(Insert(overlapping)).await.unwrap();

        let reservations = store
            .execute(Select(By::<Vec<Reservation>, _>::new(listing)))
            .await
            .unwrap();
        assert_eq!(reservations.len(), 2);
        assert_eq!(reservations.iter().filter(|r| r.is_active()).count(), 1);
    }

    #[tokio::test]
    async fn rejects_duplicate_ids() {
        let store = Memory::default();
        let stored =
            booked(&store, listing::Id::new(), "2025-09-10..2025-09-12").await;

        let err = store.execute(Insert(stored.clone())).await.unwrap_err();
        assert!(matches!(
            err.as_ref(),
            store::Error::Memory(Error::AlreadyExists(id)) if *id == stored.id,
        ));
    }

    #[tokio::test]
    async fn updates_only_stored_bookings() {
        let store = Memory::default();
        let stored =
            booked(&store, listing::Id::new(), "2025-09-10..2025-09-12").await;
        let stranger = Booking {
            id: booking::Id::new(),
            ..stored
        };

        let err = store.execute(Update(stranger)).await.unwrap_err();
        assert!(matches!(
            err.as_ref(),
            store::Error::Memory(Error::NotExists(_)),
        ));
    }
}

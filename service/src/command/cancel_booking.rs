//! [`Command`] for cancelling a [`Booking`].

use common::operations::{By, Select, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{booking, Booking},
    infra::{store, Store},
    Service,
};

use super::Command;

/// [`Command`] for cancelling a [`Booking`].
#[derive(Clone, Copy, Debug)]
pub struct CancelBooking {
    /// ID of the [`Booking`] to be cancelled.
    pub booking_id: booking::Id,
}

impl<S> Command<CancelBooking> for Service<S>
where
    S: Store<
            Select<By<Option<Booking>, booking::Id>>,
            Ok = Option<Booking>,
            Err = Traced<store::Error>,
        > + Store<Update<Booking>, Ok = Booking, Err = Traced<store::Error>>,
{
    type Ok = Booking;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CancelBooking) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CancelBooking { booking_id } = cmd;

        let mut booking = self
            .store()
            .execute(Select(By::<Option<Booking>, _>::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::BookingNotExists(booking_id))
            .map_err(tracerr::wrap!())?;

        booking
            .transition(booking::Status::Cancelled)
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let booking = self
            .store()
            .execute(Update(booking))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        log::info!(booking.id = %booking.id, "booking cancelled");

        Ok(booking)
    }
}

/// Error of [`CancelBooking`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Booking`] with the provided ID does not exist.
    #[display("`Booking(id: {_0})` does not exist")]
    BookingNotExists(#[error(not(source))] booking::Id),

    /// [`Booking`] cannot be cancelled in its current status.
    #[display("{_0}")]
    #[from]
    InvalidTransition(booking::StatusTransitionError),

    /// [`Store`] error.
    #[display("`Store` operation failed: {_0}")]
    #[from]
    Store(store::Error),
}

#[cfg(test)]
mod spec {
    use crate::{
        domain::{booking, listing},
        fixture,
        infra::Memory,
        Command as _, Config, Service,
    };

    use super::{CancelBooking, ExecutionError};

    #[tokio::test]
    async fn cancels_and_frees_dates() {
        let svc = Service::new(Config::default(), Memory::default());
        let listing = listing::Id::new();
        let booking = svc
            .execute(fixture::submit(listing, "2025-09-10..2025-09-12"))
            .await
            .unwrap();

        let cancelled = svc
            .execute(CancelBooking {
                booking_id: booking.id,
            })
            .await
            .unwrap();
        assert_eq!(cancelled.status, booking::Status::Cancelled);
        assert!(cancelled.cancelled_at.is_some());

        _ = svc
            .execute(fixture::submit(listing, "2025-09-10..2025-09-12"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn cancels_only_once() {
        let svc = Service::new(Config::default(), Memory::default());
        let booking = svc
            .execute(fixture::submit(
                listing::Id::new(),
                "2025-09-10..2025-09-12",
            ))
            .await
            .unwrap();
        let cmd = CancelBooking {
            booking_id: booking.id,
        };

        _ = svc.execute(cmd).await.unwrap();
        let err = svc.execute(cmd).await.unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::InvalidTransition(_)));
    }

    #[tokio::test]
    async fn requires_existing_booking() {
        let svc = Service::new(Config::default(), Memory::default());

        let id = booking::Id::new();
        let err = svc
            .execute(CancelBooking { booking_id: id })
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::BookingNotExists(missing) if *missing == id,
        ));
    }
}

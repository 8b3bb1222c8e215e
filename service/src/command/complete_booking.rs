//! [`Command`] for completing a [`Booking`].

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

/// [`Command`] for completing a [`Booking`].
#[derive(Clone, Copy, Debug)]
pub struct CompleteBooking {
    /// ID of the [`Booking`] to be completed.
    pub booking_id: booking::Id,
}

impl<S> Command<CompleteBooking> for Service<S>
where
    S: Store<
            Select<By<Option<Booking>, booking::Id>>,
            Ok = Option<Booking>,
            Err = Traced<store::Error>,
        > + Store<Update<Booking>, Ok = Booking, Err = Traced<store::Error>>,
{
    type Ok = Booking;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CompleteBooking,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CompleteBooking { booking_id } = cmd;

        let mut booking = self
            .store()
            .execute(Select(By::<Option<Booking>, _>::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::BookingNotExists(booking_id))
            .map_err(tracerr::wrap!())?;

        booking
            .transition(booking::Status::Completed)
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let booking = self
            .store()
            .execute(Update(booking))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        log::info!(booking.id = %booking.id, "booking completed");

        Ok(booking)
    }
}

/// Error of [`CompleteBooking`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Booking`] with the provided ID does not exist.
    #[display("`Booking(id: {_0})` does not exist")]
    BookingNotExists(#[error(not(source))] booking::Id),

    /// [`Booking`] cannot be completed in its current status.
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
        command::CancelBooking,
        domain::{booking, listing},
        fixture,
        infra::Memory,
        Command as _, Config, Service,
    };

    use super::{CompleteBooking, ExecutionError};

    #[tokio::test]
    async fn completes_confirmed_booking() {
        let svc = Service::new(Config::default(), Memory::default());
        let listing = listing::Id::new();
        let booking = svc
            .execute(fixture::submit(listing, "2025-09-10..2025-09-12"))
            .await
            .unwrap();

        let completed = svc
            .execute(CompleteBooking {
                booking_id: booking.id,
            })
            .await
            .unwrap();
        assert_eq!(completed.status, booking::Status::Completed);
        assert!(completed.cancelled_at.is_none());

        // Completed stays don't hold their dates anymore.
        _ = svc
            .execute(fixture::submit(listing, "2025-09-10..2025-09-12"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn cannot_complete_cancelled_booking() {
        let svc = Service::new(Config::default(), Memory::default());
        let booking = svc
            .execute(fixture::submit(
                listing::Id::new(),
                "2025-09-10..2025-09-12",
            ))
            .await
            .unwrap();
        _ = svc
            .execute(CancelBooking {
                booking_id: booking.id,
            })
            .await
            .unwrap();

        let err = svc
            .execute(CompleteBooking {
                booking_id: booking.id,
            })
            .await
            .unwrap_err();
        let ExecutionError::InvalidTransition(e) = err.as_ref() else {
            panic!("unexpected error: {}", err.as_ref());
        };
        assert_eq!(e.from, booking::Status::Cancelled);
        assert_eq!(e.to, booking::Status::Completed);
    }
}

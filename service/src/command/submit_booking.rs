//! [`Command`] for submitting a new [`Booking`].

use std::{future::Future, time::Duration};

use common::{
    operations::{By, Insert, Select},
    DateRange,
};
use derive_more::{Display, Error, From};
use tokio::time;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        attempt::{self, Attempt},
        availability::{self, DateConflict, RangeTooLong, SpanError},
        booking,
        listing,
        quote::InvalidRange,
        user, Booking, ListingPricing, Quote, Reservation,
    },
    infra::{store, Store},
    Service,
};

use super::Command;

/// [`Command`] for submitting a new [`Booking`] of a listing.
///
/// Checks the requested dates against the provided [`Reservation`]s first,
/// then against a fresh snapshot of the [`Store`] right before persisting the
/// [`Booking`].
#[derive(Clone, Debug)]
pub struct SubmitBooking {
    /// ID of the listing to book.
    pub listing_id: listing::Id,

    /// ID of the host owning the listing.
    pub host_id: user::Id,

    /// Requested days.
    pub range: DateRange,

    /// [`ListingPricing`] of the listing.
    pub pricing: ListingPricing,

    /// [`booking::Guest`] the listing is booked for.
    pub guest: booking::Guest,

    /// [`booking::SpecialRequests`] of the guest.
    pub special_requests: Option<booking::SpecialRequests>,

    /// [`Reservation`]s of the listing known to the caller.
    pub reservations: Vec<Reservation>,

    /// Timeout of every [`Store`] operation.
    ///
    /// [`Config::store_timeout`] is used if [`None`].
    ///
    /// [`Config::store_timeout`]: crate::Config::store_timeout
    pub timeout: Option<Duration>,
}

impl<S> Command<SubmitBooking> for Service<S>
where
    S: Store<
            Select<By<Vec<Reservation>, listing::Id>>,
            Ok = Vec<Reservation>,
            Err = Traced<store::Error>,
        > + Store<Insert<Booking>, Ok = Booking, Err = Traced<store::Error>>,
{
    type Ok = Booking;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: SubmitBooking) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let SubmitBooking {
            listing_id,
            host_id,
            range,
            pricing,
            guest,
            special_requests,
            reservations,
            timeout,
        } = cmd;
        let timeout = timeout.unwrap_or(self.config().store_timeout);

        let mut attempt = Attempt::new();
        attempt.select_dates(range).map_err(tracerr::from_and_wrap!(=> E))?;
        _ = attempt.validate().map_err(tracerr::from_and_wrap!(=> E))?;
        log::debug!(
            %listing_id,
            %range,
            stage = %attempt.stage(),
            "validating dates",
        );

        let validated =
            self.validate_booking(listing_id, &range, &pricing, &reservations);
        let quote = match validated {
            Ok(quote) => quote,
            Err(e) => {
                attempt.reject().map_err(tracerr::from_and_wrap!(=> E))?;
                log::debug!(
                    %listing_id,
                    %range,
                    stage = %attempt.stage(),
                    "dates rejected: {e}",
                );
                return Err(tracerr::new!(e));
            }
        };

        attempt.submit(quote).map_err(tracerr::from_and_wrap!(=> E))?;
        log::debug!(
            %listing_id,
            %range,
            stage = %attempt.stage(),
            total = %quote.total,
            "submitting booking",
        );

        let fresh = match bounded(
            timeout,
            self.store()
                .execute(Select(By::<Vec<Reservation>, _>::new(listing_id))),
        )
        .await
        {
            Ok(fresh) => fresh,
            Err(e) => return Err(fail(&mut attempt, e)),
        };
        if let Err(e) = availability::check_conflict(listing_id, &range, &fresh)
            .into_result(range)
        {
            return Err(fail(&mut attempt, tracerr::new!(E::from(e))));
        }

        let created_at = booking::CreationDateTime::now();
        let booking = Booking {
            id: booking::Id::new(),
            reference: booking::Reference::generate(created_at),
            listing_id,
            host_id,
            range,
            guest,
            quote,
            special_requests,
            status: booking::Status::Confirmed,
            payment_status: booking::PaymentStatus::Completed,
            created_at,
            cancelled_at: None,
        };
        let booking =
            match bounded(timeout, self.store().execute(Insert(booking))).await
            {
                Ok(booking) => booking,
                Err(e) => return Err(fail(&mut attempt, e)),
            };

        attempt
            .confirm(booking.clone())
            .map_err(tracerr::from_and_wrap!(=> E))?;
        log::info!(
            %listing_id,
            %range,
            booking.id = %booking.id,
            booking.reference = %booking.reference,
            "booking confirmed",
        );

        Ok(booking)
    }
}

impl<S> Service<S> {
    /// Validates the requested [`DateRange`] of a listing and computes its
    /// [`Quote`].
    ///
    /// The shape of the [`DateRange`] is checked first, then the known
    /// [`Reservation`]s, then the rental span.
    fn validate_booking(
        &self,
        listing_id: listing::Id,
        range: &DateRange,
        pricing: &ListingPricing,
        reservations: &[Reservation],
    ) -> Result<Quote, ExecutionError> {
        if !range.is_valid() {
            return Err(InvalidRange(*range).into());
        }
        availability::check_conflict(listing_id, range, reservations)
            .into_result(*range)?;
        _ = availability::validate_span(range, self.config().max_rental_days)?;
        Ok(Quote::compute(&self.config().pricing, pricing, range)?)
    }
}

/// Awaits the provided [`Store`] operation for no longer than `timeout`.
async fn bounded<T>(
    timeout: Duration,
    op: impl Future<Output = Result<T, Traced<store::Error>>>,
) -> Result<T, Traced<ExecutionError>> {
    time::timeout(timeout, op)
        .await
        .map_err(|_| {
            tracerr::new!(ExecutionError::from(SubmissionError::Timeout(
                timeout
            )))
        })?
        .map_err(tracerr::map_from_and_wrap!(=> ExecutionError))
}

/// Moves the provided [`Attempt`] into the failed state, returning the error
/// which caused it.
fn fail(
    attempt: &mut Attempt,
    err: Traced<ExecutionError>,
) -> Traced<ExecutionError> {
    if let Err(e) = attempt.fail() {
        log::error!("cannot fail booking attempt: {e}");
    }
    log::warn!(stage = %attempt.stage(), "booking submission failed: {err}");
    err
}

/// Error of [`SubmitBooking`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// Requested days overlap active [`Reservation`]s.
    #[display("{_0}")]
    #[from]
    DateConflict(DateConflict),

    /// Requested days end before they start.
    #[display("{_0}")]
    #[from]
    InvalidRange(InvalidRange),

    /// Requested days span too long.
    #[display("{_0}")]
    #[from]
    RangeTooLong(RangeTooLong),

    /// [`Store`] did not accept the [`Booking`].
    #[display("failed to submit booking: {_0}")]
    #[from]
    SubmissionFailed(SubmissionError),

    /// [`Attempt`] was driven out of order.
    #[display("{_0}")]
    #[from]
    Transition(attempt::TransitionError),
}

impl From<SpanError> for ExecutionError {
    fn from(e: SpanError) -> Self {
        match e {
            SpanError::InvalidRange(e) => Self::InvalidRange(e),
            SpanError::TooLong(e) => Self::RangeTooLong(e),
        }
    }
}

impl From<store::Error> for ExecutionError {
    fn from(e: store::Error) -> Self {
        Self::SubmissionFailed(SubmissionError::Store(e))
    }
}

/// Cause of a [`Booking`] not being accepted by a [`Store`].
#[derive(Debug, Display, Error)]
pub enum SubmissionError {
    /// [`Store`] didn't respond in time.
    #[display("booking store didn't respond within {_0:?}")]
    Timeout(#[error(not(source))] Duration),

    /// [`Store`] failed the operation.
    #[display("{_0}")]
    Store(store::Error),
}

impl SubmissionError {
    /// Indicates whether submitting the same [`Booking`] again later may
    /// succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout(_) => true,
            Self::Store(e) => e.is_transient(),
        }
    }

    /// Indicates whether the [`Store`] refused the [`Booking`] because of a
    /// conflicting one.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        match self {
            Self::Timeout(_) => false,
            Self::Store(e) => e.is_conflict(),
        }
    }
}

#[cfg(test)]
mod spec {
    use std::{future, time::Duration};

    use common::{
        operations::{By, Insert, Select},
        DateRange,
    };
    use rust_decimal_macros::dec;
    use tracerr::Traced;

    use crate::{
        domain::{booking, listing, Booking, Reservation},
        fixture,
        infra::{store, Memory, Store},
        Command as _, Config, Service,
    };

    use super::{ExecutionError, SubmissionError};

    /// [`Store`] never responding.
    #[derive(Clone, Copy, Debug)]
    struct Stalled;

    impl Store<Select<By<Vec<Reservation>, listing::Id>>> for Stalled {
        type Ok = Vec<Reservation>;
        type Err = Traced<store::Error>;

        async fn execute(
            &self,
            _: Select<By<Vec<Reservation>, listing::Id>>,
        ) -> Result<Self::Ok, Self::Err> {
            future::pending().await
        }
    }

    impl Store<Insert<Booking>> for Stalled {
        type Ok = Booking;
        type Err = Traced<store::Error>;

        async fn execute(
            &self,
            _: Insert<Booking>,
        ) -> Result<Self::Ok, Self::Err> {
            future::pending().await
        }
    }

    /// [`Memory`] store whose snapshots miss everything, as if another
    /// booking raced in between.
    #[derive(Clone, Debug)]
    struct Racing(Memory);

    impl Store<Select<By<Vec<Reservation>, listing::Id>>> for Racing {
        type Ok = Vec<Reservation>;
        type Err = Traced<store::Error>;

        async fn execute(
            &self,
            _: Select<By<Vec<Reservation>, listing::Id>>,
        ) -> Result<Self::Ok, Self::Err> {
            Ok(vec![])
        }
    }

    impl Store<Insert<Booking>> for Racing {
        type Ok = Booking;
        type Err = Traced<store::Error>;

        async fn execute(
            &self,
            op: Insert<Booking>,
        ) -> Result<Self::Ok, Self::Err> {
            self.0.execute(op).await
        }
    }

    async fn listing_bookings(
        store: &Memory,
        listing_id: listing::Id,
    ) -> Vec<Booking> {
        store
            .execute(Select(By::<Vec<Booking>, _>::new(listing_id)))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn confirms_booking() {
        let store = Memory::default();
        let svc = Service::new(Config::default(), store.clone());
        let listing = listing::Id::new();

        let booking = svc
            .execute(fixture::submit(listing, "2025-09-10..2025-09-12"))
            .await
            .unwrap();

        assert_eq!(booking.status, booking::Status::Confirmed);
        assert_eq!(booking.payment_status, booking::PaymentStatus::Completed);
        assert_eq!(booking.quote.total, dec!(359.74));
        assert!(booking.reference.to_string().starts_with("LR"));
        assert_eq!(listing_bookings(&store, listing).await, [booking]);
    }

    #[tokio::test]
    async fn confirmed_booking_blocks_later_ones() {
        let store = Memory::default();
        let svc = Service::new(Config::default(), store.clone());
        let listing = listing::Id::new();

        _ = svc
            .execute(fixture::submit(listing, "2025-09-10..2025-09-12"))
            .await
            .unwrap();

        // The caller doesn't know about the first booking, so only the
        // authoritative check catches it.
        let err = svc
            .execute(fixture::submit(listing, "2025-09-12..2025-09-14"))
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::DateConflict(_)));
        assert_eq!(listing_bookings(&store, listing).await.len(), 1);

        _ = svc
            .execute(fixture::submit(listing, "2025-09-13..2025-09-14"))
            .await
            .unwrap();
        _ = svc
            .execute(fixture::submit(
                listing::Id::new(),
                "2025-09-10..2025-09-12",
            ))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn rejects_known_conflicts_eagerly() {
        let svc = Service::new(Config::default(), Stalled);
        let listing = listing::Id::new();

        let mut cmd = fixture::submit(listing, "2025-09-10..2025-09-12");
        cmd.reservations = vec![Reservation {
            listing_id: listing,
            range: "2025-09-08..2025-09-10".parse().unwrap(),
            status: booking::Status::Pending,
        }];

        let err = svc.execute(cmd).await.unwrap_err();
        let ExecutionError::DateConflict(conflict) = err.as_ref() else {
            panic!("unexpected error: {}", err.as_ref());
        };
        assert_eq!(conflict.conflicts.len(), 1);
        assert!(err.as_ref().to_string().contains("2025-09-08..2025-09-10"));
    }

    #[tokio::test]
    async fn validates_span() {
        let svc = Service::new(Config::default(), Stalled);

        let err = svc
            .execute(fixture::submit(
                listing::Id::new(),
                "2025-09-01..2025-10-01",
            ))
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::RangeTooLong(e) if e.days == 31 && e.max_days == 30,
        ));

        let mut cmd =
            fixture::submit(listing::Id::new(), "2025-09-01..2025-09-02");
        cmd.range = DateRange {
            start: cmd.range.end,
            end: cmd.range.start,
        };
        let err = svc.execute(cmd).await.unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::InvalidRange(_)));
    }

    #[tokio::test]
    async fn checks_range_shape_before_conflicts() {
        let svc = Service::new(Config::default(), Stalled);
        let listing = listing::Id::new();

        let mut cmd = fixture::submit(listing, "2025-09-10..2025-09-12");
        cmd.range = DateRange {
            start: cmd.range.end,
            end: cmd.range.start,
        };
        cmd.reservations = vec![Reservation {
            listing_id: listing,
            range: "2025-09-10..2025-09-15".parse().unwrap(),
            status: booking::Status::Confirmed,
        }];

        let err = svc.execute(cmd).await.unwrap_err();
        assert!(
            matches!(err.as_ref(), ExecutionError::InvalidRange(_)),
            "unexpected error: {}",
            err.as_ref(),
        );
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_unresponsive_store() {
        let svc = Service::new(Config::default(), Stalled);

        let mut cmd =
            fixture::submit(listing::Id::new(), "2025-09-10..2025-09-12");
        cmd.timeout = Some(Duration::from_millis(50));

        let err = svc.execute(cmd).await.unwrap_err();
        let ExecutionError::SubmissionFailed(cause) = err.as_ref() else {
            panic!("unexpected error: {}", err.as_ref());
        };
        assert!(matches!(
            cause,
            SubmissionError::Timeout(d) if *d == Duration::from_millis(50),
        ));
        assert!(cause.is_transient());
    }

    #[tokio::test]
    async fn surfaces_store_side_conflicts() {
        let store = Memory::default();
        let listing = listing::Id::new();
        _ = Service::new(Config::default(), store.clone())
            .execute(fixture::submit(listing, "2025-09-10..2025-09-12"))
            .await
            .unwrap();

        let svc = Service::new(Config::default(), Racing(store.clone()));
        let err = svc
            .execute(fixture::submit(listing, "2025-09-11..2025-09-11"))
            .await
            .unwrap_err();

        let ExecutionError::SubmissionFailed(cause) = err.as_ref() else {
            panic!("unexpected error: {}", err.as_ref());
        };
        assert!(cause.is_conflict());
        assert!(!cause.is_transient());
        assert_eq!(listing_bookings(&store, listing).await.len(), 1);
    }
}

//! GraphQL [`Mutation`]s definitions.

use std::time::Duration;

use common::{Date, DateRange};
use juniper::graphql_object;
use service::{
    command::{self, cancel_booking, complete_booking, submit_booking},
    domain, Command as _,
};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Books a listing for the specified days, both `startDate` and `endDate`
    /// included.
    ///
    /// The days are checked against the `reservations` known to the client
    /// (or the stored ones, if not provided) before any write, and once again
    /// against the stored ones right before the `Booking` is persisted.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_PRICING` - the pricing amounts are negative, too large or in
    ///                       different currencies;
    /// - `INVALID_RANGE` - `startDate` is after `endDate`;
    /// - `RANGE_TOO_LONG` - the days span longer than the maximum rental
    ///                      period;
    /// - `DATE_CONFLICT` - the days overlap an existing booking;
    /// - `SUBMISSION_FAILED` - the booking store didn't accept the `Booking`.
    #[expect(clippy::too_many_arguments, reason = "GraphQL arguments")]
    #[tracing::instrument(
        skip_all,
        fields(
            end_date = %end_date,
            gql.name = "submitBooking",
            host.id = %host_id,
            listing.id = %listing_id,
            otel.name = Self::SPAN_NAME,
            start_date = %start_date,
        ),
    )]
    pub async fn submit_booking(
        listing_id: api::listing::Id,
        host_id: api::user::Id,
        start_date: Date,
        end_date: Date,
        pricing: api::listing::PricingInput,
        guest: api::booking::GuestInput,
        special_requests: Option<api::booking::SpecialRequests>,
        reservations: Option<Vec<api::listing::ReservationInput>>,
        timeout_ms: Option<i32>,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        let pricing = domain::ListingPricing::try_from(pricing)
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;
        let reservations =
            api::listing::reservations(listing_id, reservations, ctx).await?;

        ctx.service()
            .execute(command::SubmitBooking {
                listing_id: listing_id.into(),
                host_id: host_id.into(),
                range: DateRange {
                    start: start_date,
                    end: end_date,
                },
                pricing,
                guest: guest.into(),
                special_requests: special_requests.map(Into::into),
                reservations,
                timeout: timeout_ms.map(|ms| {
                    Duration::from_millis(ms.max(0).unsigned_abs().into())
                }),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Cancels the `Booking` with the specified ID, releasing its days.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BOOKING_NOT_EXISTS` - the `Booking` with the specified ID does not
    ///                          exist;
    /// - `INVALID_STATUS_TRANSITION` - the `Booking` is already cancelled or
    ///                                 completed.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "cancelBooking",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn cancel_booking(
        id: api::booking::Id,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        ctx.service()
            .execute(command::CancelBooking {
                booking_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Marks the stay of the `Booking` with the specified ID as over.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BOOKING_NOT_EXISTS` - the `Booking` with the specified ID does not
    ///                          exist;
    /// - `INVALID_STATUS_TRANSITION` - the `Booking` is not confirmed.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "completeBooking",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn complete_booking(
        id: api::booking::Id,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        ctx.service()
            .execute(command::CompleteBooking {
                booking_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

define_error! {
    enum StatusError {
        #[code = "INVALID_STATUS_TRANSITION"]
        #[status = CONFLICT]
        #[message = "`Booking` cannot move into the requested status"]
        InvalidTransition,
    }
}

impl AsError for submit_booking::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::DateConflict(e) => e.try_as_error(),
            Self::InvalidRange(e) => e.try_as_error(),
            Self::RangeTooLong(e) => e.try_as_error(),
            Self::SubmissionFailed(e) => e.try_as_error(),
            Self::Transition(_) => None,
        }
    }
}

impl AsError for submit_booking::SubmissionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum SubmissionError {
                #[code = "SUBMISSION_FAILED"]
                #[status = GATEWAY_TIMEOUT]
                #[message = "Booking store didn't respond in time"]
                Timeout,

                #[code = "SUBMISSION_FAILED"]
                #[status = SERVICE_UNAVAILABLE]
                #[message = "Booking store is unavailable"]
                Unavailable,

                #[code = "SUBMISSION_FAILED"]
                #[status = BAD_GATEWAY]
                #[message = "Booking store rejected the booking"]
                Rejected,
            }
        }

        let err = match self {
            Self::Timeout(_) => SubmissionError::Timeout,
            Self::Store(e) if e.is_conflict() => {
                return Some(api::listing::ListingError::DateConflict.into());
            }
            Self::Store(e) if e.is_transient() => SubmissionError::Unavailable,
            Self::Store(_) => SubmissionError::Rejected,
        };
        Some(Error::from(err).with_message(&self))
    }
}

impl AsError for cancel_booking::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::BookingNotExists(_) => {
                Some(api::query::BookingError::NotExists.into())
            }
            Self::InvalidTransition(e) => Some(
                Error::from(StatusError::InvalidTransition).with_message(e),
            ),
            Self::Store(e) => e.try_as_error(),
        }
    }
}

impl AsError for complete_booking::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::BookingNotExists(_) => {
                Some(api::query::BookingError::NotExists.into())
            }
            Self::InvalidTransition(e) => Some(
                Error::from(StatusError::InvalidTransition).with_message(e),
            ),
            Self::Store(e) => e.try_as_error(),
        }
    }
}

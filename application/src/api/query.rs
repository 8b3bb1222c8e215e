//! GraphQL [`Query`]s definitions.

use std::num::NonZeroU32;

use common::{Date, DateRange};
use juniper::graphql_object;
use service::{domain, query, read, Query as _};

use crate::{
    api::{self, quote::RangeError},
    define_error, AsError, Context, Error,
};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Computes the `Quote` of booking a listing for the specified days,
    /// both `startDate` and `endDate` included.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_PRICING` - the pricing amounts are negative, too large or in
    ///                       different currencies;
    /// - `INVALID_RANGE` - `startDate` is after `endDate`.
    #[tracing::instrument(
        skip_all,
        fields(
            end_date = %end_date,
            gql.name = "quote",
            otel.name = Self::SPAN_NAME,
            start_date = %start_date,
        ),
    )]
    pub async fn quote(
        pricing: api::listing::PricingInput,
        start_date: Date,
        end_date: Date,
        ctx: &Context,
    ) -> Result<api::Quote, Error> {
        let pricing = domain::ListingPricing::try_from(pricing)
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        ctx.service()
            .execute(query::ComputeQuote {
                pricing,
                range: DateRange {
                    start: start_date,
                    end: end_date,
                },
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Checks the specified days against the reservations of a listing.
    ///
    /// The stored reservations of the listing are used if `reservations`
    /// are not provided.
    #[tracing::instrument(
        skip_all,
        fields(
            end_date = %end_date,
            gql.name = "conflicts",
            listing.id = %listing_id,
            otel.name = Self::SPAN_NAME,
            start_date = %start_date,
        ),
    )]
    pub async fn conflicts(
        listing_id: api::listing::Id,
        start_date: Date,
        end_date: Date,
        reservations: Option<Vec<api::listing::ReservationInput>>,
        ctx: &Context,
    ) -> Result<api::listing::Conflicts, Error> {
        let reservations =
            api::listing::reservations(listing_id, reservations, ctx).await?;

        Ok(ctx
            .service()
            .execute(query::CheckConflict {
                listing_id: listing_id.into(),
                range: DateRange {
                    start: start_date,
                    end: end_date,
                },
                reservations,
            })
            .await
            .unwrap_or_else(|e| match e {})
            .into())
    }

    /// Checks the specified days span no longer than `maxDays`, returning
    /// their count.
    ///
    /// The configured maximum rental period is used if `maxDays` is not
    /// provided.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_MAX_DAYS` - `maxDays` is not positive;
    /// - `INVALID_RANGE` - `startDate` is after `endDate`;
    /// - `RANGE_TOO_LONG` - the days span longer than allowed.
    #[tracing::instrument(
        skip_all,
        fields(
            end_date = %end_date,
            gql.name = "validateSpan",
            max_days = ?max_days,
            otel.name = Self::SPAN_NAME,
            start_date = %start_date,
        ),
    )]
    pub async fn validate_span(
        start_date: Date,
        end_date: Date,
        max_days: Option<i32>,
        ctx: &Context,
    ) -> Result<i32, Error> {
        let max_days = max_days
            .map(|d| {
                u32::try_from(d)
                    .ok()
                    .and_then(NonZeroU32::new)
                    .ok_or_else(|| RangeError::InvalidMaxDays.into())
                    .map_err(ctx.error())
            })
            .transpose()?;

        ctx.service()
            .execute(query::ValidateSpan {
                range: DateRange {
                    start: start_date,
                    end: end_date,
                },
                max_days,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(api::scalar::count)
    }

    /// Lists the days a listing cannot be booked on, in ascending order.
    ///
    /// Includes the days of active bookings and the `blocked` days.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "unavailableDates",
            listing.id = %listing_id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn unavailable_dates(
        listing_id: api::listing::Id,
        blocked: Option<Vec<Date>>,
        ctx: &Context,
    ) -> Result<Vec<Date>, Error> {
        ctx.service()
            .execute(query::UnavailableDates {
                listing_id: listing_id.into(),
                blocked: blocked.unwrap_or_default(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Returns the `Booking` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BOOKING_NOT_EXISTS` - the `Booking` with the specified ID does not
    ///                          exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "booking",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn booking(
        id: api::booking::Id,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        ctx.service()
            .execute(query::booking::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| BookingError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Lists the `Booking`s of a listing.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "listingBookings",
            listing.id = %listing_id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn listing_bookings(
        listing_id: api::listing::Id,
        ctx: &Context,
    ) -> Result<Vec<api::Booking>, Error> {
        ctx.service()
            .execute(query::bookings::ByListing::by(listing_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|b| b.into_iter().map(Into::into).collect())
    }

    /// Lists the `Booking`s of the listings hosted by a user.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "hostBookings",
            host.id = %host_id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn host_bookings(
        host_id: api::user::Id,
        ctx: &Context,
    ) -> Result<Vec<api::Booking>, Error> {
        ctx.service()
            .execute(query::bookings::ByHost::by(read::booking::Host(
                host_id.into(),
            )))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|b| b.into_iter().map(Into::into).collect())
    }

    /// Lists the `Booking`s made by a signed-in user.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "guestBookings",
            otel.name = Self::SPAN_NAME,
            user.id = %user_id,
        ),
    )]
    pub async fn guest_bookings(
        user_id: api::user::Id,
        ctx: &Context,
    ) -> Result<Vec<api::Booking>, Error> {
        ctx.service()
            .execute(query::bookings::ByGuest::by(read::booking::Guest(
                user_id.into(),
            )))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|b| b.into_iter().map(Into::into).collect())
    }

    /// Calculates earnings of a host from its completed `Booking`s.
    ///
    /// Only `Booking`s quoted in the specified `currency` (`USD` by default)
    /// are counted.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AMOUNT_OVERFLOW` - the earnings are too large to be represented.
    #[tracing::instrument(
        skip_all,
        fields(
            currency = ?currency,
            gql.name = "hostEarnings",
            host.id = %host_id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn host_earnings(
        host_id: api::user::Id,
        currency: Option<api::quote::Currency>,
        ctx: &Context,
    ) -> Result<api::report::Earnings, Error> {
        ctx.service()
            .execute(query::report::HostEarnings {
                host_id: host_id.into(),
                currency: currency.map(Into::into).unwrap_or_default(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Counts the `Booking`s of a host by their status.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "bookingStats",
            host.id = %host_id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn booking_stats(
        host_id: api::user::Id,
        ctx: &Context,
    ) -> Result<api::report::Stats, Error> {
        ctx.service()
            .execute(query::report::BookingStats {
                host_id: host_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

define_error! {
    enum BookingError {
        #[code = "BOOKING_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Booking` with the specified ID does not exist"]
        NotExists,
    }
}

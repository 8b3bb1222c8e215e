//! Listing-related definitions: pricing and availability.

use common::{Date, DateRange, Money};
use derive_more::{Display, From, Into};
use juniper::{GraphQLInputObject, GraphQLObject, GraphQLScalar};
use service::{
    domain::{
        self,
        availability::{
            Conflicts as DomainConflicts, DateConflict, RangeTooLong, SpanError,
        },
        listing::PricingError,
    },
    query, Query as _,
};
use uuid::Uuid;

use crate::{
    api::{self, quote::RangeError},
    define_error, AsError, Context, Error,
};

/// Unique identifier of a listing.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::listing::Id)]
#[into(domain::listing::Id)]
#[graphql(name = "ListingId", transparent)]
pub struct Id(Uuid);

/// Pricing attributes of a listing.
///
/// All the amounts must be in the same currency.
#[derive(Clone, Copy, Debug, GraphQLInputObject)]
#[graphql(name = "ListingPricingInput")]
pub struct PricingInput {
    /// Price of a single day.
    pub daily_rate: Money,

    /// Flat cleaning fee, the default one is applied if omitted.
    pub cleaning_fee: Option<Money>,

    /// Refundable security deposit, derived from the daily rate if omitted
    /// or zero.
    pub security_deposit: Option<Money>,
}

impl TryFrom<PricingInput> for domain::ListingPricing {
    type Error = PricingError;

    fn try_from(input: PricingInput) -> Result<Self, Self::Error> {
        let PricingInput {
            daily_rate,
            cleaning_fee,
            security_deposit,
        } = input;
        Self::new(daily_rate, cleaning_fee, security_deposit)
    }
}

/// Existing reservation of a listing known to the client.
#[derive(Clone, Copy, Debug, GraphQLInputObject)]
#[graphql(name = "ReservationInput")]
pub struct ReservationInput {
    /// First reserved day.
    pub start_date: Date,

    /// Last reserved day.
    pub end_date: Date,

    /// Status of the reserving booking, `CONFIRMED` if omitted.
    pub status: Option<api::booking::Status>,
}

impl ReservationInput {
    /// Converts this [`ReservationInput`] into a [`domain::Reservation`] of
    /// the listing with the provided ID.
    #[must_use]
    pub fn into_reservation(self, listing_id: Id) -> domain::Reservation {
        domain::Reservation {
            listing_id: listing_id.into(),
            range: DateRange {
                start: self.start_date,
                end: self.end_date,
            },
            status: self
                .status
                .unwrap_or(api::booking::Status::Confirmed)
                .into(),
        }
    }
}

/// Resolves the reservations of the listing with the provided ID: the `known`
/// ones if provided by the client, or the stored ones otherwise.
///
/// # Errors
///
/// If the stored reservations cannot be fetched.
pub(crate) async fn reservations(
    listing_id: Id,
    known: Option<Vec<ReservationInput>>,
    ctx: &Context,
) -> Result<Vec<domain::Reservation>, Error> {
    if let Some(known) = known {
        return Ok(known
            .into_iter()
            .map(|r| r.into_reservation(listing_id))
            .collect());
    }

    ctx.service()
        .execute(query::bookings::Reservations::by(listing_id.into()))
        .await
        .map_err(AsError::into_error)
        .map_err(ctx.error())
}

/// Existing reservation of a listing.
#[derive(Clone, Copy, Debug, GraphQLObject)]
pub struct Reservation {
    /// ID of the reserved listing.
    pub listing_id: Id,

    /// First reserved day.
    pub start_date: Date,

    /// Last reserved day.
    pub end_date: Date,

    /// Status of the reserving booking.
    pub status: api::booking::Status,
}

impl From<domain::Reservation> for Reservation {
    fn from(r: domain::Reservation) -> Self {
        Self {
            listing_id: r.listing_id.into(),
            start_date: r.range.start,
            end_date: r.range.end,
            status: r.status.into(),
        }
    }
}

/// Result of checking requested days against existing reservations.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(name = "DateConflicts")]
pub struct Conflicts {
    /// Whether any of the requested days is already reserved.
    pub has_conflict: bool,

    /// Active reservations overlapping the requested days.
    pub reservations: Vec<Reservation>,
}

impl From<DomainConflicts> for Conflicts {
    fn from(conflicts: DomainConflicts) -> Self {
        Self {
            has_conflict: conflicts.has_conflict(),
            reservations: conflicts
                .reservations()
                .iter()
                .copied()
                .map(Into::into)
                .collect(),
        }
    }
}

define_error! {
    enum ListingError {
        #[code = "DATE_CONFLICT"]
        #[status = CONFLICT]
        #[message = "Selected dates conflict with existing bookings"]
        DateConflict,

        #[code = "INVALID_PRICING"]
        #[status = BAD_REQUEST]
        #[message = "Invalid listing pricing"]
        InvalidPricing,
    }
}

impl AsError for DateConflict {
    fn try_as_error(&self) -> Option<Error> {
        Some(Error::from(ListingError::DateConflict).with_message(&self))
    }
}

impl AsError for PricingError {
    fn try_as_error(&self) -> Option<Error> {
        Some(Error::from(ListingError::InvalidPricing).with_message(&self))
    }
}

impl AsError for RangeTooLong {
    fn try_as_error(&self) -> Option<Error> {
        Some(Error::from(RangeError::TooLong).with_message(&self))
    }
}

impl AsError for SpanError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::InvalidRange(e) => e.try_as_error(),
            Self::TooLong(e) => e.try_as_error(),
        }
    }
}

#[cfg(test)]
mod spec {
    use std::num::NonZeroU32;

    use common::{Currency, Date, DateRange, Money};
    use rust_decimal::Decimal;
    use service::domain::{
        availability::{self, validate_span},
        booking, ListingPricing,
    };

    use super::{Conflicts, Id, PricingInput, ReservationInput};
    use crate::AsError as _;

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    #[test]
    fn reports_conflicting_reservations() {
        let listing = Id::from(service::domain::listing::Id::new());
        let known = [ReservationInput {
            start_date: date("2025-09-10"),
            end_date: date("2025-09-12"),
            status: None,
        }
        .into_reservation(listing)];
        assert_eq!(known[0].status, booking::Status::Confirmed);

        let range = "2025-09-12..2025-09-13".parse::<DateRange>().unwrap();
        let conflicts = Conflicts::from(availability::check_conflict(
            listing.into(),
            &range,
            &known,
        ));

        assert!(conflicts.has_conflict);
        assert_eq!(conflicts.reservations.len(), 1);
        assert_eq!(conflicts.reservations[0].start_date, date("2025-09-10"));
    }

    #[test]
    fn maps_span_errors_to_codes() {
        let max = NonZeroU32::new(30).unwrap();

        let too_long = "2025-09-01..2025-10-01".parse::<DateRange>().unwrap();
        let err = validate_span(&too_long, max).unwrap_err().as_error();
        assert_eq!(err.code, "RANGE_TOO_LONG");
        assert_eq!(err.status_code, http::StatusCode::BAD_REQUEST);
        assert!(err.message.contains("30 days"), "{}", err.message);

        let inverted = DateRange {
            start: date("2025-09-12"),
            end: date("2025-09-10"),
        };
        let err = validate_span(&inverted, max).unwrap_err().as_error();
        assert_eq!(err.code, "INVALID_RANGE");
    }

    #[test]
    fn rejects_unquotable_daily_rate() {
        let err = ListingPricing::try_from(PricingInput {
            daily_rate: Money::new(Decimal::MAX, Currency::Usd),
            cleaning_fee: None,
            security_deposit: None,
        })
        .unwrap_err()
        .as_error();

        assert_eq!(err.code, "INVALID_PRICING");
        assert_eq!(err.status_code, http::StatusCode::BAD_REQUEST);
    }
}

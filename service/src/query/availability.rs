//! [`Query`]s of listing availability.

use std::{convert::Infallible, num::NonZeroU32};

use common::{
    operations::{By, Select},
    Date, DateRange,
};
use tracerr::Traced;

use crate::{
    domain::{
        availability::{self, Conflicts, SpanError},
        listing, Reservation,
    },
    infra::{store, Store},
    Service,
};

use super::Query;

/// [`Query`] checking requested days against known [`Reservation`]s of a
/// listing.
#[derive(Clone, Debug)]
pub struct CheckConflict {
    /// ID of the listing.
    pub listing_id: listing::Id,

    /// Requested days.
    pub range: DateRange,

    /// Known [`Reservation`]s.
    pub reservations: Vec<Reservation>,
}

impl<S> Query<CheckConflict> for Service<S> {
    type Ok = Conflicts;
    type Err = Infallible;

    async fn execute(&self, q: CheckConflict) -> Result<Self::Ok, Self::Err> {
        Ok(availability::check_conflict(
            q.listing_id,
            &q.range,
            &q.reservations,
        ))
    }
}

/// [`Query`] checking requested days span no longer than allowed, returning
/// their count.
#[derive(Clone, Copy, Debug)]
pub struct ValidateSpan {
    /// Requested days.
    pub range: DateRange,

    /// Maximum number of days.
    ///
    /// [`Config::max_rental_days`] is used if [`None`].
    ///
    /// [`Config::max_rental_days`]: crate::Config::max_rental_days
    pub max_days: Option<NonZeroU32>,
}

impl<S> Query<ValidateSpan> for Service<S> {
    type Ok = u32;
    type Err = Traced<SpanError>;

    async fn execute(
        &self,
        ValidateSpan { range, max_days }: ValidateSpan,
    ) -> Result<Self::Ok, Self::Err> {
        let max_days = max_days.unwrap_or(self.config().max_rental_days);
        availability::validate_span(&range, max_days).map_err(tracerr::wrap!())
    }
}

/// [`Query`] collecting the [`Date`]s a listing cannot be booked on.
#[derive(Clone, Debug)]
pub struct UnavailableDates {
    /// ID of the listing.
    pub listing_id: listing::Id,

    /// [`Date`]s blocked by the host.
    pub blocked: Vec<Date>,
}

impl<S> Query<UnavailableDates> for Service<S>
where
    S: Store<
        Select<By<Vec<Reservation>, listing::Id>>,
        Ok = Vec<Reservation>,
        Err = Traced<store::Error>,
    >,
{
    type Ok = Vec<Date>;
    type Err = Traced<store::Error>;

    async fn execute(
        &self,
        UnavailableDates {
            listing_id,
            blocked,
        }: UnavailableDates,
    ) -> Result<Self::Ok, Self::Err> {
        let reservations = self
            .store()
            .execute(Select(By::<Vec<Reservation>, _>::new(listing_id)))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(availability::unavailable_dates(
            listing_id,
            &reservations,
            blocked,
        ))
    }
}

#[cfg(test)]
mod spec {
    use crate::{
        domain::listing,
        fixture,
        infra::Memory,
        Command as _, Config, Service,
    };

    use super::UnavailableDates;

    #[tokio::test]
    async fn merges_bookings_and_blocked_dates() {
        let svc = Service::new(Config::default(), Memory::default());
        let listing = listing::Id::new();
        _ = svc
            .execute(fixture::submit(listing, "2025-09-10..2025-09-11"))
            .await
            .unwrap();

        let dates = svc
            .execute(UnavailableDates {
                listing_id: listing,
                blocked: vec![
                    "2025-09-11".parse().unwrap(),
                    "2025-09-01".parse().unwrap(),
                ],
            })
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>();

        assert_eq!(dates, ["2025-09-01", "2025-09-10", "2025-09-11"]);
    }
}

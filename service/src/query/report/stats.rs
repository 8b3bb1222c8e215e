//! [`BookingStats`] definition.

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::{booking, user, Booking},
    infra::{store, Store},
    read, Query, Service,
};

/// [`Query`] to count [`Booking`]s of a host by their status.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BookingStats {
    /// ID of the host.
    pub host_id: user::Id,
}

/// Output of the [`BookingStats`] [`Query`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Stats {
    /// Number of all [`Booking`]s.
    pub total: u32,

    /// Number of confirmed [`Booking`]s.
    pub confirmed: u32,

    /// Number of pending [`Booking`]s.
    pub pending: u32,

    /// Number of completed [`Booking`]s.
    pub completed: u32,

    /// Number of cancelled [`Booking`]s.
    pub cancelled: u32,

    /// Number of [`Booking`]s holding their dates.
    pub active: u32,
}

impl<'b> FromIterator<&'b Booking> for Stats {
    fn from_iter<I: IntoIterator<Item = &'b Booking>>(bookings: I) -> Self {
        use booking::Status as S;

        bookings.into_iter().fold(Self::default(), |mut stats, b| {
            let counter = match b.status {
                S::Confirmed => &mut stats.confirmed,
                S::Pending => &mut stats.pending,
                S::Completed => &mut stats.completed,
                S::Cancelled => &mut stats.cancelled,
            };
            *counter = counter.saturating_add(1);
            stats.total = stats.total.saturating_add(1);
            if b.status.is_active() {
                stats.active = stats.active.saturating_add(1);
            }
            stats
        })
    }
}

impl<S> Query<BookingStats> for Service<S>
where
    S: Store<
        Select<By<Vec<Booking>, read::booking::Host>>,
        Ok = Vec<Booking>,
        Err = Traced<store::Error>,
    >,
{
    type Ok = Stats;
    type Err = Traced<store::Error>;

    async fn execute(
        &self,
        BookingStats { host_id }: BookingStats,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self
            .store()
            .execute(Select(By::<Vec<Booking>, _>::new(read::booking::Host(
                host_id,
            ))))
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .collect())
    }
}

#[cfg(test)]
mod spec {
    use crate::{
        command::CancelBooking,
        domain::{listing, user},
        fixture,
        infra::Memory,
        Command as _, Config, Service,
    };

    use super::{BookingStats, Stats};

    #[tokio::test]
    async fn counts_by_status() {
        let svc = Service::new(Config::default(), Memory::default());
        let host = user::Id::new();
        let listing = listing::Id::new();

        let mut ids = vec![];
        for range in ["2025-09-01..2025-09-03", "2025-09-10..2025-09-12"] {
            let mut cmd = fixture::submit(listing, range);
            cmd.host_id = host;
            ids.push(svc.execute(cmd).await.unwrap().id);
        }
        _ = svc
            .execute(CancelBooking { booking_id: ids[0] })
            .await
            .unwrap();
        // Someone else's booking.
        _ = svc
            .execute(fixture::submit(
                listing::Id::new(),
                "2025-09-01..2025-09-03",
            ))
            .await
            .unwrap();

        let stats = svc.execute(BookingStats { host_id: host }).await.unwrap();
        assert_eq!(
            stats,
            Stats {
                total: 2,
                confirmed: 1,
                pending: 0,
                completed: 0,
                cancelled: 1,
                active: 1,
            },
        );
    }
}

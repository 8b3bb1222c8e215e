//! [`HostEarnings`] definition.

use common::{
    money::round_cents,
    operations::{By, Select},
    Currency, Money, Rate,
};
use derive_more::{Display, Error, From};
use rust_decimal::Decimal;
use tracerr::Traced;

use crate::{
    domain::{booking, user, Booking},
    infra::{store, Store},
    read, Query, Service,
};

/// [`Query`] to calculate earnings of a host from its completed
/// [`Booking`]s.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct HostEarnings {
    /// ID of the host.
    pub host_id: user::Id,

    /// [`Currency`] to report in.
    ///
    /// [`Booking`]s quoted in other currencies are not counted.
    pub currency: Currency,
}

/// Output of the [`HostEarnings`] [`Query`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Earnings {
    /// Sum of the totals of completed [`Booking`]s.
    pub total_revenue: Money,

    /// Fee taken by the platform from the revenue.
    pub platform_fee: Money,

    /// Revenue left to the host.
    pub net_earnings: Money,

    /// Number of completed [`Booking`]s.
    pub booking_count: u32,

    /// Average total of a completed [`Booking`], zero if there are none.
    pub average_booking_value: Money,
}

impl Earnings {
    /// Calculates [`Earnings`] out of the provided [`Booking`]s, taking the
    /// provided platform fee.
    ///
    /// Only completed [`Booking`]s in the provided [`Currency`] count.
    ///
    /// # Errors
    ///
    /// If the sum of the [`Booking`] totals is not representable.
    pub fn calculate<'b>(
        bookings: impl IntoIterator<Item = &'b Booking>,
        currency: Currency,
        platform_fee_rate: Rate,
    ) -> Result<Self, RevenueOverflow> {
        let (total, count) = bookings
            .into_iter()
            .filter(|b| b.status == booking::Status::Completed)
            .filter(|b| b.quote.currency == currency)
            .try_fold((Decimal::ZERO, 0_u32), |(total, count), b| {
                let total = total.checked_add(b.quote.total)?;
                Some((total, count.saturating_add(1)))
            })
            .ok_or(RevenueOverflow(currency))?;

        let fee = round_cents(platform_fee_rate.of(total));
        let average = if count == 0 {
            Decimal::ZERO
        } else {
            round_cents(total / Decimal::from(count))
        };

        Ok(Self {
            total_revenue: Money::new(total, currency),
            platform_fee: Money::new(fee, currency),
            net_earnings: Money::new(total - fee, currency),
            booking_count: count,
            average_booking_value: Money::new(average, currency),
        })
    }
}

/// Error of summing [`Booking`] totals beyond a representable amount.
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("revenue in `{_0}` is too large to be represented")]
pub struct RevenueOverflow(#[error(not(source))] pub Currency);

impl<S> Query<HostEarnings> for Service<S>
where
    S: Store<
        Select<By<Vec<Booking>, read::booking::Host>>,
        Ok = Vec<Booking>,
        Err = Traced<store::Error>,
    >,
{
    type Ok = Earnings;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        HostEarnings { host_id, currency }: HostEarnings,
    ) -> Result<Self::Ok, Self::Err> {
        let bookings = self
            .store()
            .execute(Select(By::<Vec<Booking>, _>::new(read::booking::Host(
                host_id,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> ExecutionError))?;

        Earnings::calculate(
            &bookings,
            currency,
            self.config().platform_fee_rate,
        )
        .map_err(tracerr::from_and_wrap!(=> ExecutionError))
    }
}

/// Error of [`HostEarnings`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// Revenue of the host is not representable.
    #[display("{_0}")]
    #[from]
    Overflow(RevenueOverflow),

    /// [`Store`] error.
    #[display("`Store` operation failed: {_0}")]
    #[from]
    Store(store::Error),
}

#[cfg(test)]
mod spec {
    use common::{Currency, Rate};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use crate::{
        command::CompleteBooking,
        domain::{booking, listing, user, Booking},
        fixture,
        infra::Memory,
        Command as _, Config, Service,
    };

    use super::{Earnings, HostEarnings, RevenueOverflow};

    #[test]
    fn is_zero_without_bookings() {
        let earnings = Earnings::calculate(
            &Vec::<Booking>::new(),
            Currency::Usd,
            Rate::percent(3),
        )
        .unwrap();

        assert_eq!(earnings.booking_count, 0);
        assert_eq!(earnings.total_revenue.amount, dec!(0));
        assert_eq!(earnings.average_booking_value.amount, dec!(0));
    }

    #[tokio::test]
    async fn counts_completed_bookings_only() {
        let svc = Service::new(Config::default(), Memory::default());
        let host = user::Id::new();
        let listing = listing::Id::new();

        let mut bookings = vec![];
        for range in [
            "2025-09-01..2025-09-03",
            "2025-09-10..2025-09-12",
            "2025-09-20..2025-09-20",
        ] {
            let mut cmd = fixture::submit(listing, range);
            cmd.host_id = host;
            bookings.push(svc.execute(cmd).await.unwrap());
        }
        for b in &bookings[..2] {
            _ = svc
                .execute(CompleteBooking { booking_id: b.id })
                .await
                .unwrap();
        }

        let earnings = svc
            .execute(HostEarnings {
                host_id: host,
                currency: Currency::Usd,
            })
            .await
            .unwrap();

        // Two 3-day stays at 359.74 each.
        assert_eq!(earnings.booking_count, 2);
        assert_eq!(earnings.total_revenue.amount, dec!(719.48));
        assert_eq!(earnings.platform_fee.amount, dec!(21.58));
        assert_eq!(earnings.net_earnings.amount, dec!(697.90));
        assert_eq!(earnings.average_booking_value.amount, dec!(359.74));
    }

    #[tokio::test]
    async fn reports_unrepresentable_revenue() {
        let svc = Service::new(Config::default(), Memory::default());
        let mut completed = svc
            .execute(fixture::submit(
                listing::Id::new(),
                "2025-09-01..2025-09-03",
            ))
            .await
            .unwrap();
        completed.status = booking::Status::Completed;
        completed.quote.total = Decimal::MAX;
        let bookings = [completed.clone(), completed];

        let err =
            Earnings::calculate(&bookings, Currency::Usd, Rate::percent(3))
                .unwrap_err();
        assert!(matches!(err, RevenueOverflow(Currency::Usd)));
    }
}

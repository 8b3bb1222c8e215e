//! [`Quote`] definitions.

use common::{money::round_cents, Currency, DateRange, Money, Rate};
use derive_more::{Display, Error};
use rust_decimal::Decimal;
use smart_default::SmartDefault;

use crate::domain::ListingPricing;

/// Pricing policy a [`Quote`] is computed with.
#[derive(Clone, Copy, Debug, Eq, PartialEq, SmartDefault)]
pub struct Policy {
    /// [`Rate`] of the platform service fee, taken from the discounted
    /// subtotal.
    #[default(Rate::percent(12))]
    pub service_fee_rate: Rate,

    /// [`Rate`] of taxes, taken from the discounted subtotal with the service
    /// fee.
    #[default(Rate::percent(8))]
    pub tax_rate: Rate,

    /// Discount for long stays.
    #[default(Tier { min_days: 7, rate: Rate::percent(10) })]
    pub weekly_discount: Tier,

    /// Discount for short stays.
    #[default(Tier { min_days: 3, rate: Rate::percent(5) })]
    pub short_stay_discount: Tier,

    /// Cleaning fee applied when a listing doesn't set its own.
    #[default(Decimal::new(15, 0))]
    pub default_cleaning_fee: Decimal,

    /// Lower bound of a derived security deposit.
    #[default(Decimal::new(50, 0))]
    pub min_security_deposit: Decimal,

    /// Share of the daily rate a security deposit is derived from.
    #[default(Rate::percent(50))]
    pub security_deposit_rate: Rate,
}

impl Policy {
    /// Returns the discount [`Rate`] for a stay of the provided number of
    /// days.
    ///
    /// The qualifying [`Tier`] with the highest threshold wins.
    #[must_use]
    pub fn discount_rate(&self, day_count: u32) -> Rate {
        [self.weekly_discount, self.short_stay_discount]
            .into_iter()
            .filter(|tier| day_count >= tier.min_days)
            .max_by_key(|tier| tier.min_days)
            .map_or(Rate::ZERO, |tier| tier.rate)
    }
}

/// Discount tier of a [`Policy`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Tier {
    /// Minimum number of days, inclusive, a stay needs to qualify.
    pub min_days: u32,

    /// Discount [`Rate`] of a qualifying stay.
    pub rate: Rate,
}

/// Price breakdown of a stay.
///
/// Only [`Quote::service_fee`] and [`Quote::taxes`] are rounded to cents,
/// the rest is kept exact.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Quote {
    /// Number of booked days, counting both ends.
    pub day_count: u32,

    /// Daily rate multiplied by the number of days.
    pub original_subtotal: Decimal,

    /// Discount [`Rate`] of the stay.
    pub discount_rate: Rate,

    /// Amount taken off the original subtotal.
    pub discount: Decimal,

    /// Original subtotal with the discount taken off.
    pub subtotal: Decimal,

    /// Platform service fee.
    pub service_fee: Decimal,

    /// Taxes.
    pub taxes: Decimal,

    /// Cleaning fee.
    pub cleaning_fee: Decimal,

    /// Refundable security deposit, not included into the total.
    pub security_deposit: Decimal,

    /// Amount the guest pays.
    pub total: Decimal,

    /// [`Currency`] of all the amounts.
    pub currency: Currency,
}

impl Quote {
    /// Computes a [`Quote`] of booking the provided [`DateRange`] of a listing
    /// priced with the provided [`ListingPricing`].
    ///
    /// # Errors
    ///
    /// If the [`DateRange`] ends before it starts.
    pub fn compute(
        policy: &Policy,
        pricing: &ListingPricing,
        range: &DateRange,
    ) -> Result<Self, InvalidRange> {
        let day_count = u32::try_from(range.day_count())
            .ok()
            .filter(|days| *days >= 1)
            .ok_or(InvalidRange(*range))?;

        let original_subtotal = pricing.daily_rate() * Decimal::from(day_count);
        let discount_rate = policy.discount_rate(day_count);
        let discount = discount_rate.of(original_subtotal);
        let subtotal = original_subtotal - discount;

        let service_fee = round_cents(policy.service_fee_rate.of(subtotal));
        let taxes = round_cents(policy.tax_rate.of(subtotal + service_fee));

        let cleaning_fee = pricing
            .cleaning_fee()
            .unwrap_or(policy.default_cleaning_fee);
        let security_deposit = pricing
            .security_deposit()
            .filter(|deposit| !deposit.is_zero())
            .unwrap_or_else(|| {
                policy
                    .security_deposit_rate
                    .of(pricing.daily_rate())
                    .max(policy.min_security_deposit)
            });

        Ok(Self {
            day_count,
            original_subtotal,
            discount_rate,
            discount,
            subtotal,
            service_fee,
            taxes,
            cleaning_fee,
            security_deposit,
            total: subtotal + cleaning_fee + service_fee + taxes,
            currency: pricing.currency(),
        })
    }

    /// Wraps the provided `amount` of this [`Quote`] into [`Money`].
    #[must_use]
    pub const fn money(&self, amount: Decimal) -> Money {
        Money::new(amount, self.currency)
    }
}

/// Error of a [`DateRange`] ending before it starts.
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("`{_0}` is not a valid date range: it ends before it starts")]
pub struct InvalidRange(#[error(not(source))] pub DateRange);

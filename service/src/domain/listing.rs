//! Listing definitions.

use common::{Currency, Money};
use derive_more::{Display, Error, From, FromStr, Into};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// ID of a rental listing.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Pricing attributes of a listing a quote is computed from.
///
/// All the amounts share a single [`Currency`] and are never negative.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ListingPricing {
    /// Price of a single day.
    daily_rate: Decimal,

    /// Flat cleaning fee, if the host has set one.
    cleaning_fee: Option<Decimal>,

    /// Refundable security deposit, if the host has set one.
    security_deposit: Option<Decimal>,

    /// [`Currency`] of all the amounts.
    currency: Currency,
}

impl ListingPricing {
    /// Largest amount a [`ListingPricing`] accepts.
    ///
    /// Keeps every quote of any [`DateRange`] representable as a [`Decimal`].
    ///
    /// [`DateRange`]: common::DateRange
    pub const MAX_AMOUNT: Decimal =
        // 10^12
        Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

    /// Creates a new [`ListingPricing`] out of the provided amounts.
    ///
    /// # Errors
    ///
    /// - If any of the amounts is negative.
    /// - If any of the amounts exceeds [`ListingPricing::MAX_AMOUNT`].
    /// - If the amounts are not in the same [`Currency`].
    pub fn new(
        daily_rate: Money,
        cleaning_fee: Option<Money>,
        security_deposit: Option<Money>,
    ) -> Result<Self, PricingError> {
        let currency = daily_rate.currency;
        for money in [Some(daily_rate), cleaning_fee, security_deposit]
            .into_iter()
            .flatten()
        {
            if money.currency != currency {
                return Err(PricingError::CurrencyMismatch {
                    expected: currency,
                    found: money.currency,
                });
            }
            if money.amount < Decimal::ZERO {
                return Err(PricingError::Negative(money));
            }
            if money.amount > Self::MAX_AMOUNT {
                return Err(PricingError::TooLarge(money));
            }
        }

        Ok(Self {
            daily_rate: daily_rate.amount,
            cleaning_fee: cleaning_fee.map(|m| m.amount),
            security_deposit: security_deposit.map(|m| m.amount),
            currency,
        })
    }

    /// Returns the price of a single day.
    #[must_use]
    pub const fn daily_rate(&self) -> Decimal {
        self.daily_rate
    }

    /// Returns the cleaning fee set by the host, if any.
    #[must_use]
    pub const fn cleaning_fee(&self) -> Option<Decimal> {
        self.cleaning_fee
    }

    /// Returns the security deposit set by the host, if any.
    #[must_use]
    pub const fn security_deposit(&self) -> Option<Decimal> {
        self.security_deposit
    }

    /// Returns the [`Currency`] of this [`ListingPricing`].
    #[must_use]
    pub const fn currency(&self) -> Currency {
        self.currency
    }
}

/// Error of creating a [`ListingPricing`].
#[derive(Clone, Copy, Debug, Display, Error)]
pub enum PricingError {
    /// Amount is negative.
    #[display("`{_0}` must not be negative")]
    Negative(#[error(not(source))] Money),

    /// Amount exceeds [`ListingPricing::MAX_AMOUNT`].
    #[display(
        "`{_0}` exceeds the maximum of `{}`",
        ListingPricing::MAX_AMOUNT,
    )]
    TooLarge(#[error(not(source))] Money),

    /// Amounts are in different currencies.
    #[display("expected amount in `{expected}`, found `{found}`")]
    CurrencyMismatch {
        /// [`Currency`] of the daily rate.
        expected: Currency,

        /// [`Currency`] of the offending amount.
        found: Currency,
    },
}

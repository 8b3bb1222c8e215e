//! [`Quote`]-related definitions.

use common::{Money, Rate};
use juniper::{GraphQLEnum, GraphQLObject};
use service::domain::{self, quote::InvalidRange};

use crate::{api::scalar, define_error, AsError, Error};

/// Price breakdown of a stay.
///
/// Only `serviceFee` and `taxes` are rounded to cents, the other amounts are
/// exact.
#[derive(Clone, Copy, Debug, GraphQLObject)]
#[graphql(name = "Quote")]
pub struct Quote {
    /// Number of booked days, counting both the first and the last one.
    pub day_count: i32,

    /// Daily rate multiplied by the number of days.
    pub original_subtotal: Money,

    /// Discount rate of the stay.
    pub discount_rate: Rate,

    /// Amount taken off the original subtotal.
    pub discount: Money,

    /// Original subtotal with the discount taken off.
    pub subtotal: Money,

    /// Platform service fee.
    pub service_fee: Money,

    /// Taxes.
    pub taxes: Money,

    /// Cleaning fee.
    pub cleaning_fee: Money,

    /// Refundable security deposit, not included into the `total`.
    pub security_deposit: Money,

    /// Amount the guest pays.
    pub total: Money,
}

impl From<domain::Quote> for Quote {
    fn from(quote: domain::Quote) -> Self {
        Self {
            day_count: scalar::count(quote.day_count),
            original_subtotal: quote.money(quote.original_subtotal),
            discount_rate: quote.discount_rate,
            discount: quote.money(quote.discount),
            subtotal: quote.money(quote.subtotal),
            service_fee: quote.money(quote.service_fee),
            taxes: quote.money(quote.taxes),
            cleaning_fee: quote.money(quote.cleaning_fee),
            security_deposit: quote.money(quote.security_deposit),
            total: quote.money(quote.total),
        }
    }
}

/// Currency of monetary amounts.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
pub enum Currency {
    /// US Dollar.
    Usd,

    /// Euro.
    Eur,

    /// Indian Rupee.
    Inr,
}

impl From<Currency> for common::Currency {
    fn from(currency: Currency) -> Self {
        match currency {
            Currency::Usd => Self::Usd,
            Currency::Eur => Self::Eur,
            Currency::Inr => Self::Inr,
        }
    }
}

define_error! {
    enum RangeError {
        #[code = "INVALID_RANGE"]
        #[status = BAD_REQUEST]
        #[message = "`startDate` must not be after `endDate`"]
        Invalid,

        #[code = "RANGE_TOO_LONG"]
        #[status = BAD_REQUEST]
        #[message = "Selected dates exceed the maximum rental period"]
        TooLong,

        #[code = "INVALID_MAX_DAYS"]
        #[status = BAD_REQUEST]
        #[message = "`maxDays` must be positive"]
        InvalidMaxDays,
    }
}

impl AsError for InvalidRange {
    fn try_as_error(&self) -> Option<Error> {
        Some(RangeError::Invalid.into())
    }
}

#[cfg(test)]
mod spec {
    use common::{Currency, DateRange, Money};
    use rust_decimal_macros::dec;
    use service::domain::{self, quote::Policy, ListingPricing};

    use super::Quote;

    #[test]
    fn carries_currency_into_every_amount() {
        let pricing = ListingPricing::new(
            Money::new(dec!(100), Currency::Eur),
            Some(Money::new(dec!(15), Currency::Eur)),
            None,
        )
        .unwrap();
        let range = "2025-09-10..2025-09-12".parse::<DateRange>().unwrap();
        let quote = Quote::from(
            domain::Quote::compute(&Policy::default(), &pricing, &range)
                .unwrap(),
        );

        assert_eq!(quote.day_count, 3);
        assert_eq!(quote.total, Money::new(dec!(359.74), Currency::Eur));
        assert_eq!(quote.taxes.to_string(), "25.54EUR");
        assert_eq!(quote.discount.to_string(), "15EUR");
    }
}

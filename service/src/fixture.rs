//! Fixtures shared by tests.

use common::{Currency, DateRange, Money};
use rust_decimal::Decimal;

use crate::{
    command::SubmitBooking,
    domain::{booking, listing, user, ListingPricing},
};

/// USD [`ListingPricing`] with the provided daily rate and a 15 USD cleaning
/// fee.
pub(crate) fn pricing(daily: Decimal) -> ListingPricing {
    ListingPricing::new(
        Money::new(daily, Currency::Usd),
        Some(Money::new(Decimal::new(15, 0), Currency::Usd)),
        None,
    )
    .unwrap()
}

/// Valid anonymous [`booking::Guest`].
pub(crate) fn guest() -> booking::Guest {
    booking::Guest {
        first_name: "Ada".parse().unwrap(),
        last_name: "Lovelace".parse().unwrap(),
        email: "ada@example.com".parse().unwrap(),
        phone: "+44 20 7946 0018".parse().unwrap(),
        user_id: None,
    }
}

/// [`SubmitBooking`] of the provided days of a listing priced 100 USD a day,
/// without any known reservations.
pub(crate) fn submit(listing_id: listing::Id, range: &str) -> SubmitBooking {
    SubmitBooking {
        listing_id,
        host_id: user::Id::new(),
        range: range.parse::<DateRange>().unwrap(),
        pricing: pricing(Decimal::new(100, 0)),
        guest: guest(),
        special_requests: None,
        reservations: vec![],
        timeout: None,
    }
}

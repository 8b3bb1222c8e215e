//! [`Earnings`] report definition.

use common::Money;
use juniper::GraphQLObject;
use service::query::report::earnings;

use crate::{api::scalar, define_error, AsError, Error};

/// Earnings of a host from completed bookings.
#[derive(Clone, Copy, Debug, GraphQLObject)]
#[graphql(name = "EarningsReport")]
pub struct Earnings {
    /// Sum of the totals of completed bookings.
    pub total_revenue: Money,

    /// Fee taken by the platform from the revenue.
    pub platform_fee: Money,

    /// Revenue left to the host.
    pub net_earnings: Money,

    /// Number of completed bookings.
    pub booking_count: i32,

    /// Average total of a completed booking, zero if there are none.
    pub average_booking_value: Money,
}

impl From<earnings::Earnings> for Earnings {
    fn from(output: earnings::Earnings) -> Self {
        let earnings::Earnings {
            total_revenue,
            platform_fee,
            net_earnings,
            booking_count,
            average_booking_value,
        } = output;
        Self {
            total_revenue,
            platform_fee,
            net_earnings,
            booking_count: scalar::count(booking_count),
            average_booking_value,
        }
    }
}

define_error! {
    enum EarningsError {
        #[code = "AMOUNT_OVERFLOW"]
        #[status = UNPROCESSABLE_ENTITY]
        #[message = "Earnings are too large to be represented"]
        Overflow,
    }
}

impl AsError for earnings::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Overflow(e) => {
                Some(Error::from(EarningsError::Overflow).with_message(e))
            }
            Self::Store(e) => e.try_as_error(),
        }
    }
}

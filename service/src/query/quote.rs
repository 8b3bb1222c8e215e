//! [`Query`] computing a [`Quote`].

use common::DateRange;
use tracerr::Traced;

use crate::{
    domain::{quote::InvalidRange, ListingPricing, Quote},
    Service,
};

use super::Query;

/// [`Query`] computing a [`Quote`] of booking a listing with the
/// [`Service`]'s pricing policy.
#[derive(Clone, Copy, Debug)]
pub struct ComputeQuote {
    /// [`ListingPricing`] of the listing.
    pub pricing: ListingPricing,

    /// Days to book.
    pub range: DateRange,
}

impl<S> Query<ComputeQuote> for Service<S> {
    type Ok = Quote;
    type Err = Traced<InvalidRange>;

    async fn execute(
        &self,
        ComputeQuote { pricing, range }: ComputeQuote,
    ) -> Result<Self::Ok, Self::Err> {
        Quote::compute(&self.config().pricing, &pricing, &range)
            .map_err(tracerr::wrap!())
    }
}

//! [`Query`] collection related to a single [`Booking`].

use common::operations::By;

#[cfg(doc)]
use crate::Query;
use crate::domain::{booking, Booking};

use super::StoreQuery;

/// Queries a [`Booking`] by its [`booking::Id`].
pub type ById = StoreQuery<By<Option<Booking>, booking::Id>>;

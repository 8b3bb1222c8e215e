//! [`Store`]-related implementations.

pub mod memory;
#[cfg(feature = "rest")]
pub mod rest;

use common::operations::{By, Insert, Select, Update};
use derive_more::{Display, Error as StdError, From};
use tracerr::Traced;

use crate::{
    domain::{booking, listing, Booking, Reservation},
    read,
};

pub use self::memory::Memory;
#[cfg(feature = "rest")]
pub use self::rest::Rest;

/// Booking store operation.
pub use common::Handler as Store;

/// [`Store`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// [`Memory`] error.
    Memory(memory::Error),

    #[cfg(feature = "rest")]
    /// [`Rest`] error.
    Rest(rest::Error),
}

impl Error {
    /// Indicates whether the [`Store`] refused the operation because it
    /// conflicts with an already stored [`Booking`].
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        match self {
            Self::Memory(e) => e.is_conflict(),
            #[cfg(feature = "rest")]
            Self::Rest(e) => e.is_conflict(),
        }
    }

    /// Indicates whether the operation may succeed if issued again later.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Memory(_) => false,
            #[cfg(feature = "rest")]
            Self::Rest(e) => e.is_transient(),
        }
    }
}

/// [`Store`] picked at runtime.
#[derive(Clone, Debug, From)]
pub enum Configured {
    /// [`Memory`] store.
    Memory(Memory),

    #[cfg(feature = "rest")]
    /// [`Rest`] store.
    Rest(Rest),
}

/// Implements [`Store`] operations for [`Configured`] by dispatching them to
/// the picked implementation.
macro_rules! dispatch {
    ($($op:ty => $ok:ty),* $(,)?) => {$(
        impl Store<$op> for Configured {
            type Ok = $ok;
            type Err = Traced<Error>;

            async fn execute(&self, op: $op) -> Result<Self::Ok, Self::Err> {
                match self {
                    Self::Memory(store) => store.execute(op).await,
                    #[cfg(feature = "rest")]
                    Self::Rest(store) => store.execute(op).await,
                }
            }
        }
    )*};
}

dispatch! {
    Select<By<Vec<Reservation>, listing::Id>> => Vec<Reservation>,
    Select<By<Option<Booking>, booking::Id>> => Option<Booking>,
    Select<By<Vec<Booking>, listing::Id>> => Vec<Booking>,
    Select<By<Vec<Booking>, read::booking::Host>> => Vec<Booking>,
    Select<By<Vec<Booking>, read::booking::Guest>> => Vec<Booking>,
    Insert<Booking> => Booking,
    Update<Booking> => Booking,
}

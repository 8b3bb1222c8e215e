//! Infrastructure layer.

pub mod store;

#[cfg(feature = "rest")]
pub use self::store::Rest;
pub use self::store::{Memory, Store};

//! Service contains the booking pricing and date-conflict logic.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
#[cfg(test)]
mod fixture;
pub mod infra;
pub mod query;
pub mod read;

use std::{num::NonZeroU32, time::Duration};

use common::Rate;
use smart_default::SmartDefault;

#[cfg(doc)]
use infra::Store;

pub use self::{command::Command, query::Query};

/// [`Service`] configuration.
#[derive(Clone, Copy, Debug, SmartDefault)]
pub struct Config {
    /// [`domain::quote::Policy`] quotes are computed with.
    pub pricing: domain::quote::Policy,

    /// Maximum number of days a single booking may span.
    #[default(NonZeroU32::MIN.saturating_add(29))]
    pub max_rental_days: NonZeroU32,

    /// [`Rate`] of the platform fee taken from host revenue.
    #[default(Rate::percent(3))]
    pub platform_fee_rate: Rate,

    /// Default timeout of [`Store`] operations issued while submitting a
    /// booking.
    #[default(Duration::from_secs(10))]
    pub store_timeout: Duration,
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<S> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Store`] of this [`Service`].
    store: S,
}

impl<S> Service<S> {
    /// Creates a new [`Service`] with the provided parameters.
    #[must_use]
    pub const fn new(config: Config, store: S) -> Self {
        Self { config, store }
    }

    /// Returns [`Config`] of this [`Service`].
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Store`] of this [`Service`].
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }
}

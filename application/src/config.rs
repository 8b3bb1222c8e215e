//! [`Config`]-related definitions.

use std::{num::NonZeroU32, time};

use common::Rate;
use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use rust_decimal::Decimal;
use serde::Deserialize;
use service::{domain::quote, infra::store::rest};
use smart_default::SmartDefault;

/// Application configuration.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: Server,

    /// Pricing configuration.
    #[serde(default)]
    pub pricing: Pricing,

    /// Booking configuration.
    #[serde(default)]
    pub booking: Booking,

    /// Booking store configuration.
    #[serde(default)]
    pub store: Store,

    /// Log configuration.
    #[serde(default)]
    pub log: Log,
}

impl Config {
    /// Creates a new [`Config`] by:
    /// - loading it from the provided `path` (if any);
    /// - merging it with the environment variables (if any);
    /// - using default values for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("CONF").separator("."))
            .build()?
            .try_deserialize()
    }

    /// Assembles the [`service::Config`] out of the [`Pricing`] and
    /// [`Booking`] sections.
    #[must_use]
    pub fn service(&self) -> service::Config {
        service::Config {
            pricing: self.pricing.into(),
            ..self.booking.into()
        }
    }
}

/// Server configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Server {
    /// Host to bind the server to.
    #[default("0.0.0.0".to_owned())]
    pub host: String,

    /// Port to bind the server to.
    #[default(8080)]
    pub port: u16,

    /// [CORS] configuration.
    ///
    /// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
    pub cors: Cors,
}

/// [CORS] configuration.
///
/// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Cors {
    /// List of allowed origins.
    #[default(vec!["*".to_owned()])]
    pub origins: Vec<String>,
}

/// Pricing configuration, see [`quote::Policy`] for the meaning of each rate.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct Pricing {
    /// Service fee rate.
    pub service_fee_rate: Rate,

    /// Tax rate.
    pub tax_rate: Rate,

    /// Minimum number of days a stay needs for the weekly discount.
    pub weekly_discount_threshold_days: u32,

    /// Weekly discount rate.
    pub weekly_discount_rate: Rate,

    /// Minimum number of days a stay needs for the short stay discount.
    pub short_stay_discount_threshold_days: u32,

    /// Short stay discount rate.
    pub short_stay_discount_rate: Rate,

    /// Cleaning fee of listings not setting their own.
    pub default_cleaning_fee: Decimal,

    /// Lower bound of a derived security deposit.
    pub min_security_deposit: Decimal,

    /// Share of the daily rate a security deposit is derived from.
    pub security_deposit_rate: Rate,
}

impl Default for Pricing {
    fn default() -> Self {
        quote::Policy::default().into()
    }
}

impl From<quote::Policy> for Pricing {
    fn from(policy: quote::Policy) -> Self {
        let quote::Policy {
            service_fee_rate,
            tax_rate,
            weekly_discount,
            short_stay_discount,
            default_cleaning_fee,
            min_security_deposit,
            security_deposit_rate,
        } = policy;
        Self {
            service_fee_rate,
            tax_rate,
            weekly_discount_threshold_days: weekly_discount.min_days,
            weekly_discount_rate: weekly_discount.rate,
            short_stay_discount_threshold_days: short_stay_discount.min_days,
            short_stay_discount_rate: short_stay_discount.rate,
            default_cleaning_fee,
            min_security_deposit,
            security_deposit_rate,
        }
    }
}

impl From<Pricing> for quote::Policy {
    fn from(pricing: Pricing) -> Self {
        let Pricing {
            service_fee_rate,
            tax_rate,
            weekly_discount_threshold_days,
            weekly_discount_rate,
            short_stay_discount_threshold_days,
            short_stay_discount_rate,
            default_cleaning_fee,
            min_security_deposit,
            security_deposit_rate,
        } = pricing;
        Self {
            service_fee_rate,
            tax_rate,
            weekly_discount: quote::Tier {
                min_days: weekly_discount_threshold_days,
                rate: weekly_discount_rate,
            },
            short_stay_discount: quote::Tier {
                min_days: short_stay_discount_threshold_days,
                rate: short_stay_discount_rate,
            },
            default_cleaning_fee,
            min_security_deposit,
            security_deposit_rate,
        }
    }
}

/// Booking configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Booking {
    /// Maximum number of days a single booking may span, positive.
    #[default(NonZeroU32::MIN.saturating_add(29))]
    pub max_rental_days: NonZeroU32,

    /// Rate of the platform fee taken from host revenue.
    #[default(Rate::percent(3))]
    pub platform_fee_rate: Rate,

    /// Timeout of booking store operations issued while submitting a
    /// booking.
    #[default(time::Duration::from_secs(10))]
    #[serde(with = "humantime_serde")]
    pub store_timeout: time::Duration,
}

impl From<Booking> for service::Config {
    fn from(value: Booking) -> Self {
        let Booking {
            max_rental_days,
            platform_fee_rate,
            store_timeout,
        } = value;
        Self {
            max_rental_days,
            platform_fee_rate,
            store_timeout,
            ..Self::default()
        }
    }
}

/// Booking store configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Store {
    /// Kind of the store to keep bookings in.
    pub kind: StoreKind,

    /// Base URL of the marketplace API, used by the [`StoreKind::Rest`]
    /// store.
    #[default("http://localhost:5000/api".to_owned())]
    pub base_url: String,

    /// Timeout of a single HTTP request of the [`StoreKind::Rest`] store.
    #[default(time::Duration::from_secs(10))]
    #[serde(with = "humantime_serde")]
    pub timeout: time::Duration,
}

impl From<Store> for rest::Config {
    fn from(value: Store) -> Self {
        let Store {
            kind: _,
            base_url,
            timeout,
        } = value;
        Self { base_url, timeout }
    }
}

/// Kind of a booking store.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    /// Bookings are kept in memory and lost on restart.
    #[default]
    Memory,

    /// Bookings are kept by the marketplace HTTP API.
    Rest,
}

/// Log configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Log level.
    pub level: LogLevel,
}

/// Log level.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Designates very low priority, often extremely verbose, information.
    Trace,

    /// Designates lower priority information.
    Debug,

    /// Designates useful information.
    #[default]
    Info,

    /// Designates hazardous situations.
    Warn,

    /// Designates very serious errors.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::Rate;
    use config::{Config as Source, File, FileFormat};
    use rust_decimal_macros::dec;
    use service::domain::quote;

    use super::{Config, StoreKind};

    fn parse(toml: &str) -> Config {
        Source::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn defaults_match_service_policy() {
        let conf = parse("");

        assert_eq!(conf.service().pricing, quote::Policy::default());
        assert_eq!(conf.service().max_rental_days.get(), 30);
        assert_eq!(conf.service().platform_fee_rate, Rate::percent(3));
        assert_eq!(conf.service().store_timeout, Duration::from_secs(10));
        assert_eq!(conf.store.kind, StoreKind::Memory);
        assert_eq!(conf.server.port, 8080);
    }

    #[test]
    fn overrides_sections() {
        let conf = parse(
            r#"
            [pricing]
            tax_rate = "0.1"
            weekly_discount_threshold_days = 10
            default_cleaning_fee = "20"

            [booking]
            max_rental_days = 14
            store_timeout = "3s"

            [store]
            kind = "rest"
            base_url = "https://example.com/api"
            "#,
        );
        let svc = conf.service();

        assert_eq!(svc.pricing.tax_rate, Rate::percent(10));
        assert_eq!(svc.pricing.weekly_discount.min_days, 10);
        assert_eq!(svc.pricing.weekly_discount.rate, Rate::percent(10));
        assert_eq!(svc.pricing.default_cleaning_fee, dec!(20));
        assert_eq!(svc.pricing.service_fee_rate, Rate::percent(12));
        assert_eq!(svc.max_rental_days.get(), 14);
        assert_eq!(svc.store_timeout, Duration::from_secs(3));
        assert_eq!(conf.store.kind, StoreKind::Rest);
        assert_eq!(conf.store.base_url, "https://example.com/api");
    }

    #[test]
    fn rejects_zero_max_rental_days() {
        let res = Source::builder()
            .add_source(File::from_str(
                "[booking]\nmax_rental_days = 0",
                FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize::<Config>();

        assert!(res.is_err());
    }
}

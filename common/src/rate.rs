//! [`Rate`]-related definitions.

use std::str::FromStr;

use derive_more::Display;
use rust_decimal::Decimal;

/// Fraction of an amount, from `0` (nothing) to `1` (the whole amount).
///
/// `0.12` stands for 12%.
#[derive(
    Clone, Copy, Debug, Default, Display, Eq, Hash, Ord, PartialEq, PartialOrd,
)]
pub struct Rate(Decimal);

impl Rate {
    /// [`Rate`] taking nothing.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a new [`Rate`] by checking the provided fraction lies within
    /// `0..=1`.
    #[must_use]
    pub fn new(fraction: Decimal) -> Option<Self> {
        (Decimal::ZERO..=Decimal::ONE)
            .contains(&fraction)
            .then_some(Self(fraction))
    }

    /// Creates a new [`Rate`] from whole percents, saturating at 100%.
    #[must_use]
    pub fn percent(percent: u32) -> Self {
        Self(Decimal::new(i64::from(percent.min(100)), 2))
    }

    /// Returns the fraction of this [`Rate`].
    #[must_use]
    pub const fn fraction(self) -> Decimal {
        self.0
    }

    /// Applies this [`Rate`] to the provided `amount`.
    ///
    /// The result is not rounded.
    #[must_use]
    pub fn of(self, amount: Decimal) -> Decimal {
        amount * self.0
    }
}

impl FromStr for Rate {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s)
            .ok()
            .and_then(Self::new)
            .ok_or("invalid rate value")
    }
}

impl From<Rate> for Decimal {
    fn from(rate: Rate) -> Self {
        rate.0
    }
}

#[cfg(feature = "serde")]
mod serde {
    //! Module providing integration with [`serde`] crate.

    use rust_decimal::Decimal;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    use super::Rate;

    impl Serialize for Rate {
        fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
            Serialize::serialize(&self.0, s)
        }
    }

    impl<'de> Deserialize<'de> for Rate {
        fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
            let fraction = <Decimal as Deserialize<'de>>::deserialize(d)?;
            Self::new(fraction).ok_or_else(|| {
                de::Error::custom(format!(
                    "rate must lie within 0..=1, found: {fraction}",
                ))
            })
        }
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use std::str::FromStr as _;

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Fraction of an amount in `0..=1` range, e.g. `0.05` for 5%.
    #[graphql_scalar(with = Self, parse_token(String))]
    type Rate = super::Rate;

    impl Rate {
        fn to_output<S: ScalarValue>(r: &Rate) -> Value<S> {
            Value::scalar(r.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Rate` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_str(s).map_err(|e| {
                        format!("Cannot parse `Rate` input scalar: {e}")
                    })
                })
        }
    }
}

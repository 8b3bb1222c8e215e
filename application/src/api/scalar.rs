//! GraphQL scalar definitions.

use std::{fmt, marker::PhantomData, str::FromStr};

use juniper::{
    GraphQLType, InputValue, ParseScalarResult, ParseScalarValue, ScalarToken,
    ScalarValue, Value,
};

/// Helper type to use in `#[graphql(with = ..)]` attribute.
///
/// Represents the target type as a GraphQL string scalar, spelled the way
/// [`FromStr`]/[`Display`] impls of the `As` type spell it.
///
/// Target type must implement [`TryFrom`] and [`AsRef`] for `As` type.
///
/// [`Display`]: fmt::Display
#[derive(Debug)]
pub struct Via<As>(PhantomData<As>);

impl<As> Via<As> {
    /// Converts the target type into a string scalar [`Value`].
    pub fn to_output<T, S>(value: &T) -> Value<S>
    where
        As: fmt::Display,
        T: AsRef<As>,
        S: ScalarValue,
    {
        Value::from(value.as_ref().to_string())
    }

    /// Parses the target type out of a string scalar [`InputValue`].
    ///
    /// # Errors
    ///
    /// If the input value is not a string, or it doesn't represent a valid
    /// `As` value convertible into the target type.
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    pub fn from_input<T, S>(input: &InputValue<S>) -> Result<T, String>
    where
        As: FromStr,
        As::Err: fmt::Display,
        T: TryFrom<As> + GraphQLType<S, TypeInfo = ()>,
        T::Error: fmt::Display,
        S: ScalarValue,
    {
        let name = T::name(&()).expect("named scalar");
        let Some(s) = input.as_string_value() else {
            return Err(format!(
                "Cannot parse `{name}` input scalar from non-string value: \
                 {input}",
            ));
        };
        s.parse::<As>()
            .map_err(|e| format!("Cannot parse `{name}` from \"{s}\": {e}"))?
            .try_into()
            .map_err(|e| format!("Cannot parse `{name}` input scalar: {e}"))
    }

    /// Parses the provided [`ScalarToken`] as a string.
    ///
    /// # Errors
    ///
    /// If the token is not a string.
    pub fn parse_token<S: ScalarValue>(
        value: ScalarToken<'_>,
    ) -> ParseScalarResult<S> {
        <String as ParseScalarValue<S>>::from_str(value)
    }
}

/// Converts the provided count into a GraphQL `Int`, saturating at
/// [`i32::MAX`].
#[must_use]
pub fn count(n: u32) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

//! Calendar [`Date`] and [`DateRange`] definitions.

use std::{fmt, iter, str::FromStr};

use derive_more::{Display, Error};
use time::{macros::format_description, Month};

/// Calendar date without a time zone.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Date(time::Date);

impl Date {
    /// Creates a new [`Date`] from the provided calendar components.
    ///
    /// [`None`] is returned if the components don't form a valid date.
    #[must_use]
    pub fn from_calendar_date(year: i32, month: u8, day: u8) -> Option<Self> {
        let month = Month::try_from(month).ok()?;
        time::Date::from_calendar_date(year, month, day).ok().map(Self)
    }

    /// Returns the current [`Date`] in UTC.
    #[must_use]
    pub fn today() -> Self {
        Self(time::OffsetDateTime::now_utc().date())
    }

    /// Returns the [`Date`] following this one, if representable.
    #[must_use]
    pub fn next_day(self) -> Option<Self> {
        self.0.next_day().map(Self)
    }

    /// Returns the signed number of days from this [`Date`] to the `other`
    /// one.
    #[must_use]
    pub fn days_until(self, other: Self) -> i64 {
        (other.0 - self.0).whole_days()
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.0.year(),
            u8::from(self.0.month()),
            self.0.day(),
        )
    }
}

impl FromStr for Date {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        time::Date::parse(s, format_description!("[year]-[month]-[day]"))
            .map(Self)
            .map_err(ParseError::Date)
    }
}

impl From<time::Date> for Date {
    fn from(date: time::Date) -> Self {
        Self(date)
    }
}

impl From<Date> for time::Date {
    fn from(date: Date) -> Self {
        date.0
    }
}

/// Closed range of calendar [`Date`]s, both ends inclusive.
///
/// A well-formed [`DateRange`] has `start <= end`. The fields are public, so
/// a malformed one may still be built from unvalidated input: consumers must
/// check [`DateRange::is_valid()`] before trusting it.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct DateRange {
    /// First day of this [`DateRange`].
    pub start: Date,

    /// Last day of this [`DateRange`].
    pub end: Date,
}

impl DateRange {
    /// Creates a new [`DateRange`] if `start` is not after `end`.
    #[must_use]
    pub fn new(start: Date, end: Date) -> Option<Self> {
        let range = Self { start, end };
        range.is_valid().then_some(range)
    }

    /// Creates a single-day [`DateRange`].
    #[must_use]
    pub const fn single(day: Date) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    /// Indicates whether `start` is not after `end`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.start <= self.end
    }

    /// Returns the number of days covered by this [`DateRange`], counting
    /// both ends.
    ///
    /// Zero or negative for a malformed range.
    #[must_use]
    pub fn day_count(&self) -> i64 {
        self.start.days_until(self.end) + 1
    }

    /// Indicates whether this [`DateRange`] shares at least one day with the
    /// `other` one.
    ///
    /// Ranges touching at an endpoint overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && self.end >= other.start
    }

    /// Indicates whether the provided [`Date`] lies within this
    /// [`DateRange`].
    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    /// Iterates over every [`Date`] of this [`DateRange`] in order.
    ///
    /// Yields nothing for a malformed range.
    pub fn days(&self) -> impl Iterator<Item = Date> {
        let end = self.end;
        iter::successors(self.is_valid().then_some(self.start), move |d| {
            d.next_day().filter(|next| *next <= end)
        })
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl FromStr for DateRange {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s.split_once("..").ok_or(ParseError::Separator)?;
        Self::new(start.parse()?, end.parse()?).ok_or(ParseError::Reversed)
    }
}

/// Error of parsing a [`Date`] or a [`DateRange`] from a string.
#[derive(Clone, Copy, Debug, Display, Error)]
pub enum ParseError {
    /// String is not a `YYYY-MM-DD` date.
    #[display("invalid date: {_0}")]
    Date(time::error::Parse),

    /// [`DateRange`] string misses the `..` separator.
    #[display("missing `..` separator")]
    Separator,

    /// [`DateRange`] starts after it ends.
    #[display("range starts after it ends")]
    Reversed,
}

#[cfg(feature = "serde")]
mod serde {
    //! Module providing integration with [`serde`] crate.

    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    use super::Date;

    impl Serialize for Date {
        fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
            s.collect_str(self)
        }
    }

    impl<'de> Deserialize<'de> for Date {
        fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
            let s = <std::borrow::Cow<'de, str>>::deserialize(d)?;
            // Accept full timestamps by cutting the time part off.
            let date = s.split_once('T').map_or(&*s, |(date, _)| date);
            date.parse().map_err(de::Error::custom)
        }
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use std::str::FromStr as _;

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Calendar date in `YYYY-MM-DD` format.
    #[graphql_scalar(with = Self, parse_token(String))]
    type Date = super::Date;

    impl Date {
        fn to_output<S: ScalarValue>(d: &Date) -> Value<S> {
            Value::scalar(d.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Date` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_str(s).map_err(|e| {
                        format!("Cannot parse `Date` input scalar: {e}")
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use super::{Date, DateRange};

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    fn range(s: &str) -> DateRange {
        s.parse().unwrap()
    }

    #[test]
    fn parses_and_prints() {
        assert_eq!(date("2025-09-10").to_string(), "2025-09-10");
        assert_eq!(
            Date::from_calendar_date(2025, 9, 1),
            Some(date("2025-09-01")),
        );
        assert!(Date::from_calendar_date(2025, 2, 30).is_none());
        assert!("2025-9-10x".parse::<Date>().is_err());

        assert_eq!(
            range("2025-09-10..2025-09-12").to_string(),
            "2025-09-10..2025-09-12",
        );
        assert!("2025-09-12..2025-09-10".parse::<DateRange>().is_err());
        assert!("2025-09-12".parse::<DateRange>().is_err());
    }

    #[test]
    fn counts_days_inclusively() {
        assert_eq!(range("2025-09-10..2025-09-10").day_count(), 1);
        assert_eq!(range("2025-09-10..2025-09-12").day_count(), 3);
        assert_eq!(range("2025-02-25..2025-03-03").day_count(), 7);

        let reversed = DateRange {
            start: date("2025-09-12"),
            end: date("2025-09-10"),
        };
        assert!(!reversed.is_valid());
        assert_eq!(reversed.day_count(), -1);
        assert_eq!(reversed.days().count(), 0);
        assert!(DateRange::new(reversed.start, reversed.end).is_none());
    }

    #[test]
    fn overlaps_as_closed_intervals() {
        let existing = range("2025-09-10..2025-09-12");

        assert!(range("2025-09-10..2025-09-12").overlaps(&existing));
        assert!(range("2025-09-12..2025-09-14").overlaps(&existing));
        assert!(range("2025-09-08..2025-09-10").overlaps(&existing));
        assert!(range("2025-09-01..2025-09-30").overlaps(&existing));
        assert!(!range("2025-09-13..2025-09-14").overlaps(&existing));
        assert!(!range("2025-09-01..2025-09-09").overlaps(&existing));
    }

    #[test]
    fn overlap_is_symmetric() {
        let ranges = [
            range("2025-09-01..2025-09-05"),
            range("2025-09-05..2025-09-05"),
            range("2025-09-04..2025-09-10"),
            range("2025-09-11..2025-09-20"),
        ];
        for a in &ranges {
            for b in &ranges {
                assert_eq!(a.overlaps(b), b.overlaps(a), "{a} vs {b}");
            }
        }
    }

    #[test]
    fn iterates_days() {
        let days = range("2025-09-29..2025-10-02")
            .days()
            .map(|d| d.to_string())
            .collect::<Vec<_>>();
        assert_eq!(
            days,
            ["2025-09-29", "2025-09-30", "2025-10-01", "2025-10-02"],
        );
        assert!(range("2025-09-29..2025-10-02").contains(date("2025-10-01")));
        assert!(!range("2025-09-29..2025-10-02").contains(date("2025-10-03")));
    }
}

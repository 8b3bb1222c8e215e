//! Availability reasoning over [`Reservation`]s of a listing.

use std::{collections::BTreeSet, fmt, num::NonZeroU32};

use common::{Date, DateRange};
use derive_more::{Display, Error, From};

use crate::domain::{listing, quote::InvalidRange, Reservation};

/// Active [`Reservation`]s of a listing overlapping a candidate
/// [`DateRange`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Conflicts(Vec<Reservation>);

impl Conflicts {
    /// Indicates whether any [`Reservation`] conflicts.
    #[must_use]
    pub fn has_conflict(&self) -> bool {
        !self.0.is_empty()
    }

    /// Returns the conflicting [`Reservation`]s.
    #[must_use]
    pub fn reservations(&self) -> &[Reservation] {
        &self.0
    }

    /// Turns these [`Conflicts`] into a [`DateConflict`] error, if there are
    /// any.
    ///
    /// # Errors
    ///
    /// If any [`Reservation`] conflicts with the provided [`DateRange`].
    pub fn into_result(self, range: DateRange) -> Result<(), DateConflict> {
        if self.has_conflict() {
            return Err(DateConflict {
                range,
                conflicts: self.0,
            });
        }
        Ok(())
    }
}

/// Checks the provided [`DateRange`] of a listing against its existing
/// [`Reservation`]s.
///
/// [`Reservation`]s of other listings, and inactive ones, are ignored. Ranges
/// touching at an endpoint conflict.
#[must_use]
pub fn check_conflict<'r>(
    listing_id: listing::Id,
    range: &DateRange,
    reservations: impl IntoIterator<Item = &'r Reservation>,
) -> Conflicts {
    Conflicts(
        reservations
            .into_iter()
            .filter(|r| {
                r.listing_id == listing_id
                    && r.is_active()
                    && r.range.overlaps(range)
            })
            .copied()
            .collect(),
    )
}

/// Checks that the provided [`DateRange`] is well-formed and spans no more
/// than `max_days`, returning its day count.
///
/// # Errors
///
/// - [`SpanError::InvalidRange`] if the [`DateRange`] ends before it starts.
/// - [`SpanError::TooLong`] if the [`DateRange`] spans more than `max_days`.
pub fn validate_span(
    range: &DateRange,
    max_days: NonZeroU32,
) -> Result<u32, SpanError> {
    let days = u32::try_from(range.day_count())
        .ok()
        .filter(|days| *days >= 1)
        .ok_or(InvalidRange(*range))?;
    if days > max_days.get() {
        return Err(RangeTooLong {
            range: *range,
            days,
            max_days: max_days.get(),
        }
        .into());
    }
    Ok(days)
}

/// Collects the sorted, deduplicated [`Date`]s a listing cannot be booked
/// on: every day of its active [`Reservation`]s plus the days blocked by its
/// host.
#[must_use]
pub fn unavailable_dates<'r>(
    listing_id: listing::Id,
    reservations: impl IntoIterator<Item = &'r Reservation>,
    blocked: impl IntoIterator<Item = Date>,
) -> Vec<Date> {
    reservations
        .into_iter()
        .filter(|r| r.listing_id == listing_id && r.is_active())
        .flat_map(|r| r.range.days())
        .chain(blocked)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Error of a [`DateRange`] overlapping existing [`Reservation`]s.
#[derive(Clone, Debug, Error)]
pub struct DateConflict {
    /// Requested [`DateRange`].
    pub range: DateRange,

    /// Conflicting [`Reservation`]s.
    pub conflicts: Vec<Reservation>,
}

impl fmt::Display for DateConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "selected dates `{}` conflict with existing bookings:",
            self.range,
        )?;
        for (n, r) in self.conflicts.iter().enumerate() {
            let sep = if n == 0 { " " } else { ", " };
            write!(f, "{sep}`{}`", r.range)?;
        }
        Ok(())
    }
}

/// Error of a [`DateRange`] spanning too many days.
#[derive(Clone, Copy, Debug, Display, Error)]
#[display(
    "maximum rental period is {max_days} days, but `{range}` spans {days} days"
)]
pub struct RangeTooLong {
    /// Requested [`DateRange`].
    pub range: DateRange,

    /// Number of days in the requested [`DateRange`].
    pub days: u32,

    /// Maximum allowed number of days.
    pub max_days: u32,
}

/// Error of [`validate_span()`].
#[derive(Clone, Copy, Debug, Display, Error, From)]
pub enum SpanError {
    /// [`DateRange`] ends before it starts.
    InvalidRange(InvalidRange),

    /// [`DateRange`] spans too many days.
    TooLong(RangeTooLong),
}

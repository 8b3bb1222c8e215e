//! [`Attempt`] state machine definitions.

use common::DateRange;
use derive_more::{Display, Error};

use crate::domain::{Booking, Quote};

/// Single walk of a caller through booking a listing.
///
/// ```text
/// Idle -> DatesSelected -> Validating -> Submitting -> Confirmed
///              ^               |              |
///              +---------------+              +-----> Failed
///              ^                                        |
///              +----------------------------------------+
/// ```
#[derive(Clone, Debug, Default)]
pub struct Attempt {
    /// Current [`State`] of this [`Attempt`].
    state: State,
}

/// [`State`] of an [`Attempt`].
#[derive(Clone, Debug, Default)]
pub enum State {
    /// No dates picked yet.
    #[default]
    Idle,

    /// Dates are picked, but not validated.
    DatesSelected(DateRange),

    /// Picked dates are being validated.
    Validating(DateRange),

    /// Validated dates are being booked at the computed [`Quote`].
    Submitting(DateRange, Quote),

    /// [`Booking`] is persisted.
    Confirmed(Box<Booking>),

    /// Booking store didn't accept the [`Booking`].
    Failed(DateRange),
}

impl State {
    /// Returns the [`Stage`] of this [`State`].
    #[must_use]
    pub const fn stage(&self) -> Stage {
        match self {
            Self::Idle => Stage::Idle,
            Self::DatesSelected(_) => Stage::DatesSelected,
            Self::Validating(_) => Stage::Validating,
            Self::Submitting(..) => Stage::Submitting,
            Self::Confirmed(_) => Stage::Confirmed,
            Self::Failed(_) => Stage::Failed,
        }
    }
}

/// Data-less discriminant of a [`State`].
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum Stage {
    /// [`State::Idle`].
    Idle,

    /// [`State::DatesSelected`].
    DatesSelected,

    /// [`State::Validating`].
    Validating,

    /// [`State::Submitting`].
    Submitting,

    /// [`State::Confirmed`].
    Confirmed,

    /// [`State::Failed`].
    Failed,
}

impl Attempt {
    /// Creates a new [`Idle`] [`Attempt`].
    ///
    /// [`Idle`]: State::Idle
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current [`State`] of this [`Attempt`].
    #[must_use]
    pub const fn state(&self) -> &State {
        &self.state
    }

    /// Returns the current [`Stage`] of this [`Attempt`].
    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.state.stage()
    }

    /// Picks the dates to book.
    ///
    /// Dates may be re-picked until validation starts, and after a failure.
    ///
    /// # Errors
    ///
    /// If dates are being validated or booked, or are booked already.
    pub fn select_dates(
        &mut self,
        range: DateRange,
    ) -> Result<(), TransitionError> {
        match self.state {
            State::Idle | State::DatesSelected(_) | State::Failed(_) => {
                self.state = State::DatesSelected(range);
                Ok(())
            }
            State::Validating(_)
            | State::Submitting(..)
            | State::Confirmed(_) => Err(self.illegal(Stage::DatesSelected)),
        }
    }

    /// Starts validating the picked dates, returning them.
    ///
    /// # Errors
    ///
    /// If no dates are picked.
    pub fn validate(&mut self) -> Result<DateRange, TransitionError> {
        let State::DatesSelected(range) = self.state else {
            return Err(self.illegal(Stage::Validating));
        };
        self.state = State::Validating(range);
        Ok(range)
    }

    /// Returns to the picked dates after they failed validation.
    ///
    /// # Errors
    ///
    /// If dates are not being validated.
    pub fn reject(&mut self) -> Result<(), TransitionError> {
        let State::Validating(range) = self.state else {
            return Err(self.illegal(Stage::DatesSelected));
        };
        self.state = State::DatesSelected(range);
        Ok(())
    }

    /// Starts booking the validated dates at the provided [`Quote`].
    ///
    /// # Errors
    ///
    /// If dates are not being validated.
    pub fn submit(&mut self, quote: Quote) -> Result<(), TransitionError> {
        let State::Validating(range) = self.state else {
            return Err(self.illegal(Stage::Submitting));
        };
        self.state = State::Submitting(range, quote);
        Ok(())
    }

    /// Completes this [`Attempt`] with the persisted [`Booking`].
    ///
    /// # Errors
    ///
    /// If nothing is being booked.
    pub fn confirm(&mut self, booking: Booking) -> Result<(), TransitionError> {
        let State::Submitting(..) = self.state else {
            return Err(self.illegal(Stage::Confirmed));
        };
        self.state = State::Confirmed(Box::new(booking));
        Ok(())
    }

    /// Marks the booking as not accepted by the booking store.
    ///
    /// # Errors
    ///
    /// If nothing is being booked.
    pub fn fail(&mut self) -> Result<(), TransitionError> {
        let State::Submitting(range, _) = self.state else {
            return Err(self.illegal(Stage::Failed));
        };
        self.state = State::Failed(range);
        Ok(())
    }

    /// Builds a [`TransitionError`] of moving into the provided [`Stage`].
    fn illegal(&self, to: Stage) -> TransitionError {
        TransitionError {
            from: self.stage(),
            to,
        }
    }
}

/// Error of an illegal [`Attempt`] transition.
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("booking attempt cannot move from `{from}` to `{to}`")]
pub struct TransitionError {
    /// [`Stage`] the [`Attempt`] is in.
    pub from: Stage,

    /// [`Stage`] the [`Attempt`] was asked to move into.
    pub to: Stage,
}

#[cfg(test)]
mod spec {
    use common::DateRange;
    use rust_decimal_macros::dec;

    use crate::domain::{quote::Policy, ListingPricing, Quote};

    use super::{Attempt, Stage};

    fn range() -> DateRange {
        "2025-09-10..2025-09-12".parse().unwrap()
    }

    fn quote() -> Quote {
        let pricing = ListingPricing::new(
            common::Money::new(dec!(100), common::Currency::Usd),
            None,
            None,
        )
        .unwrap();
        Quote::compute(&Policy::default(), &pricing, &range()).unwrap()
    }

    #[test]
    fn validation_failure_returns_to_dates() {
        let mut attempt = Attempt::new();
        assert_eq!(attempt.stage(), Stage::Idle);

        attempt.select_dates(range()).unwrap();
        assert_eq!(attempt.validate().unwrap(), range());
        attempt.reject().unwrap();
        assert_eq!(attempt.stage(), Stage::DatesSelected);

        let other = "2025-09-20..2025-09-21".parse().unwrap();
        attempt.select_dates(other).unwrap();
        assert_eq!(attempt.validate().unwrap(), other);
    }

    #[test]
    fn failure_permits_reentry() {
        let mut attempt = Attempt::new();
        attempt.select_dates(range()).unwrap();
        _ = attempt.validate().unwrap();
        attempt.submit(quote()).unwrap();
        attempt.fail().unwrap();
        assert_eq!(attempt.stage(), Stage::Failed);

        attempt.select_dates(range()).unwrap();
        assert_eq!(attempt.stage(), Stage::DatesSelected);
    }

    #[test]
    fn rejects_illegal_transitions() {
        let mut attempt = Attempt::new();

        let err = attempt.validate().unwrap_err();
        assert_eq!((err.from, err.to), (Stage::Idle, Stage::Validating));
        assert!(attempt.submit(quote()).is_err());
        assert!(attempt.fail().is_err());
        assert!(attempt.reject().is_err());

        attempt.select_dates(range()).unwrap();
        assert!(attempt.submit(quote()).is_err());
        _ = attempt.validate().unwrap();
        assert!(attempt.select_dates(range()).is_err());
        assert!(attempt.validate().is_err());
        assert_eq!(attempt.stage(), Stage::Validating);
    }
}

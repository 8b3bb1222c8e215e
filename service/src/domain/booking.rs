//! [`Booking`] definitions.

use std::sync::LazyLock;

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateRange, DateTimeOf};
use derive_more::{AsRef, Display, Error, From, FromStr, Into};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{listing, user, Quote};

/// Persisted booking of a listing.
#[derive(Clone, Debug, PartialEq)]
pub struct Booking {
    /// ID of this [`Booking`].
    pub id: Id,

    /// Human-facing [`Reference`] of this [`Booking`].
    pub reference: Reference,

    /// ID of the booked listing.
    pub listing_id: listing::Id,

    /// ID of the host owning the booked listing.
    pub host_id: user::Id,

    /// Booked days.
    pub range: DateRange,

    /// [`Guest`] the listing is booked for.
    pub guest: Guest,

    /// [`Quote`] the [`Booking`] was made at.
    pub quote: Quote,

    /// [`SpecialRequests`] of the [`Guest`].
    pub special_requests: Option<SpecialRequests>,

    /// [`Status`] of this [`Booking`].
    pub status: Status,

    /// [`PaymentStatus`] of this [`Booking`].
    pub payment_status: PaymentStatus,

    /// [`DateTime`] when this [`Booking`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Booking`] was cancelled.
    pub cancelled_at: Option<CancellationDateTime>,
}

impl Booking {
    /// Moves this [`Booking`] into the provided [`Status`].
    ///
    /// # Errors
    ///
    /// If the current [`Status`] cannot be left for the provided one.
    pub fn transition(
        &mut self,
        to: Status,
    ) -> Result<(), StatusTransitionError> {
        if !self.status.can_become(to) {
            return Err(StatusTransitionError {
                id: self.id,
                from: self.status,
                to,
            });
        }

        self.status = to;
        if to == Status::Cancelled {
            self.cancelled_at = Some(CancellationDateTime::now());
        }
        Ok(())
    }
}

/// ID of a [`Booking`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Human-facing code of a [`Booking`], shown to guests and hosts.
///
/// Looks like `LR<unix-millis><0..999>`, e.g. `LR1757500200000417`.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
pub struct Reference(String);

impl Reference {
    /// Generates a new [`Reference`] for a [`Booking`] created at the
    /// provided [`DateTime`].
    #[must_use]
    pub fn generate(at: CreationDateTime) -> Self {
        let salt = Uuid::new_v4().as_u128() % 1000;
        Self(format!("LR{}{salt}", at.unix_timestamp_millis()))
    }

    /// Creates a new [`Reference`] if the given `code` is not blank.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Option<Self> {
        let code = code.into();
        (!code.trim().is_empty()).then_some(Self(code))
    }
}

define_kind! {
    #[doc = "Status of a [`Booking`]."]
    #[case = "lowercase"]
    enum Status {
        #[doc = "[`Booking`] awaits confirmation."]
        Pending = 1,

        #[doc = "[`Booking`] is confirmed."]
        Confirmed = 2,

        #[doc = "[`Booking`] is cancelled."]
        Cancelled = 3,

        #[doc = "Stay of the [`Booking`] is over."]
        Completed = 4,
    }
}

impl Status {
    /// Indicates whether a [`Booking`] in this [`Status`] blocks its days for
    /// other bookings.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    /// Indicates whether a [`Booking`] may move from this [`Status`] into the
    /// provided one.
    #[must_use]
    pub const fn can_become(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Pending, Self::Confirmed | Self::Cancelled)
                | (Self::Confirmed, Self::Cancelled | Self::Completed),
        )
    }
}

define_kind! {
    #[doc = "Payment status of a [`Booking`]."]
    #[case = "lowercase"]
    enum PaymentStatus {
        #[doc = "Payment is not made yet."]
        Pending = 1,

        #[doc = "Payment is made."]
        Completed = 2,
    }
}

/// Error of an illegal [`Status`] transition of a [`Booking`].
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("`Booking(id: {id})` cannot become `{to}` being `{from}`")]
pub struct StatusTransitionError {
    /// ID of the [`Booking`].
    pub id: Id,

    /// Current [`Status`] of the [`Booking`].
    pub from: Status,

    /// Requested [`Status`].
    pub to: Status,
}

/// Contact details of a guest collected at checkout.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Guest {
    /// First [`Name`] of this [`Guest`].
    pub first_name: Name,

    /// Last [`Name`] of this [`Guest`].
    pub last_name: Name,

    /// [`Email`] of this [`Guest`].
    pub email: Email,

    /// [`Phone`] of this [`Guest`].
    pub phone: Phone,

    /// ID of the signed-in user this [`Guest`] is, if any.
    pub user_id: Option<user::Id>,
}

/// Name of a [`Guest`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 512
    }
}

impl std::str::FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

/// Email address of a [`Guest`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Email(String);

impl Email {
    /// Creates a new [`Email`] if the given `address` is valid.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Option<Self> {
        let address = address.into();
        Self::check(&address).then_some(Self(address))
    }

    /// Checks whether the given `address` is a valid [`Email`].
    fn check(address: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Email`] format: something, an `@`,
        /// something, a dot and something, without any whitespace.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^\S+@\S+\.\S+$").expect("valid regex")
        });

        REGEX.is_match(address.as_ref())
    }
}

impl std::str::FromStr for Email {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Email`")
    }
}

/// Phone number of a [`Guest`].
///
/// Formats vary too much across countries, so only blank numbers are
/// rejected.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Phone(String);

impl Phone {
    /// Creates a new [`Phone`] if the given `number` is valid.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Option<Self> {
        let number = number.into();
        Self::check(&number).then_some(Self(number))
    }

    /// Checks whether the given `number` is a valid [`Phone`].
    fn check(number: impl AsRef<str>) -> bool {
        let number = number.as_ref();
        number.trim() == number && !number.is_empty() && number.len() <= 512
    }
}

impl std::str::FromStr for Phone {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Phone`")
    }
}

/// Free-form requests of a [`Guest`] to the host.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct SpecialRequests(String);

impl SpecialRequests {
    /// Maximum number of characters in [`SpecialRequests`].
    pub const MAX_LEN: usize = 500;

    /// Creates new [`SpecialRequests`] if the given `text` is not too long.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        (text.chars().count() <= Self::MAX_LEN).then_some(Self(text))
    }
}

impl std::str::FromStr for SpecialRequests {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("`SpecialRequests` exceed 500 characters")
    }
}

/// [`DateTime`] when a [`Booking`] was created.
pub type CreationDateTime = DateTimeOf<(Booking, unit::Creation)>;

/// [`DateTime`] when a [`Booking`] was cancelled.
pub type CancellationDateTime = DateTimeOf<(Booking, unit::Cancellation)>;

#[cfg(test)]
mod spec {
    use super::{Email, Name, Phone, Reference, SpecialRequests, Status};

    #[test]
    fn allows_only_forward_transitions() {
        use Status as S;

        assert!(S::Pending.can_become(S::Confirmed));
        assert!(S::Pending.can_become(S::Cancelled));
        assert!(S::Confirmed.can_become(S::Cancelled));
        assert!(S::Confirmed.can_become(S::Completed));

        assert!(!S::Pending.can_become(S::Completed));
        assert!(!S::Confirmed.can_become(S::Pending));
        for to in S::all() {
            assert!(!S::Cancelled.can_become(to), "cancelled -> {to}");
            assert!(!S::Completed.can_become(to), "completed -> {to}");
        }
    }

    #[test]
    fn only_pending_and_confirmed_are_active() {
        let active =
            Status::all().filter(|s| s.is_active()).collect::<Vec<_>>();
        assert_eq!(active, [Status::Pending, Status::Confirmed]);
        assert_eq!(Status::Confirmed.to_string(), "confirmed");
        assert_eq!("cancelled".parse::<Status>().unwrap(), Status::Cancelled);
    }

    #[test]
    fn validates_guest_details() {
        assert!(Name::new("Ada").is_some());
        assert!(Name::new(" Ada").is_none());
        assert!(Name::new("").is_none());

        assert!(Email::new("ada@example.com").is_some());
        assert!(Email::new("ada@example").is_none());
        assert!(Email::new("ada @example.com").is_none());

        assert!(Phone::new("+1 555 010 0199").is_some());
        assert!(Phone::new("   ").is_none());
    }

    #[test]
    fn limits_special_requests() {
        assert!(SpecialRequests::new("é".repeat(500)).is_some());
        assert!(SpecialRequests::new("a".repeat(501)).is_none());
        assert!(SpecialRequests::new("").is_some());
    }

    #[test]
    fn generates_prefixed_references() {
        let reference = Reference::generate(common::DateTimeOf::now());
        let code: &str = reference.as_ref();

        assert!(code.starts_with("LR"));
        assert!(code[2..].chars().all(|c| c.is_ascii_digit()));
        assert!(Reference::new(" ").is_none());
    }
}

//! [`Booking`]-related definitions.

use common::{Date, DateTime, DateTimeOf};
use derive_more::{AsRef, Display, From, Into};
use juniper::{
    graphql_object, GraphQLEnum, GraphQLInputObject, GraphQLObject,
    GraphQLScalar,
};
use service::domain;
use uuid::Uuid;

use crate::{
    api::{self, scalar},
    Context,
};

/// A booking of a listing.
#[derive(Clone, Debug, From)]
pub struct Booking(domain::Booking);

/// A booking of a listing.
#[graphql_object(context = Context)]
impl Booking {
    /// Unique identifier of this `Booking`.
    #[must_use]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// Human-facing reference code of this `Booking`.
    #[must_use]
    pub fn reference(&self) -> &str {
        self.0.reference.as_ref()
    }

    /// ID of the booked listing.
    #[must_use]
    pub fn listing_id(&self) -> api::listing::Id {
        self.0.listing_id.into()
    }

    /// ID of the host owning the booked listing.
    #[must_use]
    pub fn host_id(&self) -> api::user::Id {
        self.0.host_id.into()
    }

    /// First booked day.
    #[must_use]
    pub fn start_date(&self) -> Date {
        self.0.range.start
    }

    /// Last booked day.
    #[must_use]
    pub fn end_date(&self) -> Date {
        self.0.range.end
    }

    /// Guest this `Booking` is made for.
    #[tracing::instrument(
        skip_all,
        fields(
            booking.id = %self.0.id,
            gql.name = "Booking.guest",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn guest(&self) -> Guest {
        self.0.guest.clone().into()
    }

    /// `Quote` this `Booking` was made at.
    #[must_use]
    pub fn quote(&self) -> api::Quote {
        self.0.quote.into()
    }

    /// Free-form requests of the guest to the host.
    #[must_use]
    pub fn special_requests(&self) -> Option<SpecialRequests> {
        self.0.special_requests.clone().map(Into::into)
    }

    /// Status of this `Booking`.
    #[must_use]
    pub fn status(&self) -> Status {
        self.0.status.into()
    }

    /// Payment status of this `Booking`.
    #[must_use]
    pub fn payment_status(&self) -> PaymentStatus {
        self.0.payment_status.into()
    }

    /// `DateTime` when this `Booking` was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }

    /// `DateTime` when this `Booking` was cancelled, if it was.
    #[must_use]
    pub fn cancelled_at(&self) -> Option<DateTime> {
        self.0.cancelled_at.map(DateTimeOf::coerce)
    }
}

/// Unique identifier of a `Booking`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::booking::Id)]
#[into(domain::booking::Id)]
#[graphql(name = "BookingId", transparent)]
pub struct Id(Uuid);

/// Status of a `Booking`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "BookingStatus")]
pub enum Status {
    /// `Booking` awaits confirmation.
    Pending,

    /// `Booking` is confirmed.
    Confirmed,

    /// `Booking` is cancelled.
    Cancelled,

    /// Stay of the `Booking` is over.
    Completed,
}

impl From<domain::booking::Status> for Status {
    fn from(status: domain::booking::Status) -> Self {
        use domain::booking::Status as S;
        match status {
            S::Pending => Self::Pending,
            S::Confirmed => Self::Confirmed,
            S::Cancelled => Self::Cancelled,
            S::Completed => Self::Completed,
        }
    }
}

impl From<Status> for domain::booking::Status {
    fn from(status: Status) -> Self {
        match status {
            Status::Pending => Self::Pending,
            Status::Confirmed => Self::Confirmed,
            Status::Cancelled => Self::Cancelled,
            Status::Completed => Self::Completed,
        }
    }
}

/// Payment status of a `Booking`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "BookingPaymentStatus")]
pub enum PaymentStatus {
    /// Payment is not made yet.
    Pending,

    /// Payment is made.
    Completed,
}

impl From<domain::booking::PaymentStatus> for PaymentStatus {
    fn from(status: domain::booking::PaymentStatus) -> Self {
        use domain::booking::PaymentStatus as S;
        match status {
            S::Pending => Self::Pending,
            S::Completed => Self::Completed,
        }
    }
}

/// Contact details of a guest.
#[derive(Clone, Debug, GraphQLObject)]
pub struct Guest {
    /// First name of this `Guest`.
    pub first_name: Name,

    /// Last name of this `Guest`.
    pub last_name: Name,

    /// Email of this `Guest`.
    pub email: Email,

    /// Phone number of this `Guest`.
    pub phone: Phone,

    /// ID of the signed-in user this `Guest` is, if any.
    pub user_id: Option<api::user::Id>,
}

impl From<domain::booking::Guest> for Guest {
    fn from(guest: domain::booking::Guest) -> Self {
        let domain::booking::Guest {
            first_name,
            last_name,
            email,
            phone,
            user_id,
        } = guest;
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phone: phone.into(),
            user_id: user_id.map(Into::into),
        }
    }
}

/// Contact details of a guest collected at checkout.
#[derive(Clone, Debug, GraphQLInputObject)]
pub struct GuestInput {
    /// First name of the guest.
    pub first_name: Name,

    /// Last name of the guest.
    pub last_name: Name,

    /// Email of the guest.
    pub email: Email,

    /// Phone number of the guest.
    pub phone: Phone,

    /// ID of the signed-in user booking the listing, if any.
    pub user_id: Option<api::user::Id>,
}

impl From<GuestInput> for domain::booking::Guest {
    fn from(input: GuestInput) -> Self {
        let GuestInput {
            first_name,
            last_name,
            email,
            phone,
            user_id,
        } = input;
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phone: phone.into(),
            user_id: user_id.map(Into::into),
        }
    }
}

/// Name of a `Guest`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "GuestName",
    with = scalar::Via::<domain::booking::Name>,
)]
pub struct Name(domain::booking::Name);

/// Email of a `Guest`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "GuestEmail",
    with = scalar::Via::<domain::booking::Email>,
)]
pub struct Email(domain::booking::Email);

/// Phone number of a `Guest`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "GuestPhone",
    with = scalar::Via::<domain::booking::Phone>,
)]
pub struct Phone(domain::booking::Phone);

/// Free-form requests of a guest to the host, up to 500 characters.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "BookingSpecialRequests",
    with = scalar::Via::<domain::booking::SpecialRequests>,
)]
pub struct SpecialRequests(domain::booking::SpecialRequests);

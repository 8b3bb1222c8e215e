//! REST [`Store`] implementation, backed by the marketplace HTTP API.

use std::time::Duration;

use common::{
    operations::{By, Insert, Select, Update},
    Currency, Date, DateRange, DateTime, Rate,
};
use derive_more::{Display, Error as StdError};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use smart_default::SmartDefault;
use tracerr::Traced;

use crate::{
    domain::{booking, listing, user, Booking, Quote, Reservation},
    infra::{store, Store},
    read,
};

/// [`Rest`] store configuration.
#[derive(Clone, Debug, SmartDefault)]
pub struct Config {
    /// Base URL of the marketplace API, e.g. `http://localhost:5000/api`.
    #[default("http://localhost:5000/api".into())]
    pub base_url: String,

    /// Timeout of a single HTTP request.
    #[default(Duration::from_secs(10))]
    pub timeout: Duration,
}

/// [`Store`] talking to the marketplace HTTP API.
#[derive(Clone, Debug)]
pub struct Rest {
    /// HTTP client.
    client: Client,

    /// Base URL without a trailing slash.
    base_url: String,
}

impl Rest {
    /// Creates a new [`Rest`] store with the provided [`Config`].
    ///
    /// # Errors
    ///
    /// If the HTTP client cannot be initialized.
    pub fn new(config: &Config) -> Result<Self, Traced<store::Error>> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(Error::Request)
            .map_err(tracerr::from_and_wrap!(=> store::Error))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Builds a full URL of the provided `path`.
    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    /// Sends the provided request, turning non-successful responses into an
    /// [`Error::Status`].
    async fn send(req: RequestBuilder) -> Result<Response, Traced<Error>> {
        let resp = req
            .send()
            .await
            .map_err(Error::Request)
            .map_err(tracerr::wrap!())?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let text = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or(text);
        Err(tracerr::new!(Error::Status { status, message }))
    }

    /// Decodes a JSON body of the provided [`Response`].
    async fn decode<T: DeserializeOwned>(
        resp: Response,
    ) -> Result<T, Traced<Error>> {
        resp.json().await.map_err(|e| {
            tracerr::new!(if e.is_decode() {
                Error::Malformed(e.to_string())
            } else {
                Error::Request(e)
            })
        })
    }

    /// Lists [`BookingRecord`]s matching the provided query parameter.
    async fn list<T: DeserializeOwned>(
        &self,
        param: &str,
        value: impl ToString,
    ) -> Result<Vec<T>, Traced<Error>> {
        let req = self
            .client
            .get(self.url("bookings"))
            .query(&[(param, value.to_string())]);
        let List { bookings } =
            Self::decode(Self::send(req).await.map_err(tracerr::wrap!())?)
                .await
                .map_err(tracerr::wrap!())?;
        Ok(bookings)
    }

    /// Lists [`Booking`]s matching the provided query parameter.
    async fn bookings(
        &self,
        param: &str,
        value: impl ToString,
    ) -> Result<Vec<Booking>, Traced<store::Error>> {
        self.list::<BookingRecord>(param, value)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> store::Error))?
            .into_iter()
            .map(Booking::try_from)
            .collect::<Result<_, _>>()
            .map_err(tracerr::from_and_wrap!(=> store::Error))
    }
}

impl Store<Select<By<Vec<Reservation>, listing::Id>>> for Rest {
    type Ok = Vec<Reservation>;
    type Err = Traced<store::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Reservation>, listing::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.list::<ReservationRecord>("listing_id", by.into_inner())
            .await
            .map_err(tracerr::map_from_and_wrap!(=> store::Error))?
            .into_iter()
            .map(Reservation::try_from)
            .collect::<Result<_, _>>()
            .map_err(tracerr::from_and_wrap!(=> store::Error))
    }
}

impl Store<Select<By<Option<Booking>, booking::Id>>> for Rest {
    type Ok = Option<Booking>;
    type Err = Traced<store::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Booking>, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let req = self
            .client
            .get(self.url(&format!("bookings/{}", by.into_inner())));
        let resp = match Self::send(req).await {
            Err(e) if e.as_ref().is_not_found() => return Ok(None),
            res => res.map_err(tracerr::map_from_and_wrap!(=> store::Error))?,
        };

        let record = Self::decode::<BookingRecord>(resp)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> store::Error))?;
        Booking::try_from(record)
            .map(Some)
            .map_err(tracerr::from_and_wrap!(=> store::Error))
    }
}

impl Store<Select<By<Vec<Booking>, listing::Id>>> for Rest {
    type Ok = Vec<Booking>;
    type Err = Traced<store::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Booking>, listing::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.bookings("listing_id", by.into_inner())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl Store<Select<By<Vec<Booking>, read::booking::Host>>> for Rest {
    type Ok = Vec<Booking>;
    type Err = Traced<store::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Booking>, read::booking::Host>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::booking::Host(host_id) = by.into_inner();
        self.bookings("host_id", host_id)
            .await
            .map_err(tracerr::wrap!())
    }
}

impl Store<Select<By<Vec<Booking>, read::booking::Guest>>> for Rest {
    type Ok = Vec<Booking>;
    type Err = Traced<store::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Booking>, read::booking::Guest>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::booking::Guest(guest_id) = by.into_inner();
        self.bookings("guest_id", guest_id)
            .await
            .map_err(tracerr::wrap!())
    }
}

impl Store<Insert<Booking>> for Rest {
    type Ok = Booking;
    type Err = Traced<store::Error>;

    async fn execute(
        &self,
        Insert(mut booking): Insert<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        let req = self
            .client
            .post(self.url("bookings"))
            .json(&BookingRecord::from(&booking));
        let resp = Self::send(req)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> store::Error))?;
        let ack = Self::decode::<Acknowledgement>(resp)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> store::Error))?;

        // The API may assign its own identifiers.
        if let Some(id) = ack.id {
            booking.id = id;
        }
        if let Some(reference) =
            ack.booking_reference.and_then(booking::Reference::new)
        {
            booking.reference = reference;
        }
        Ok(booking)
    }
}

impl Store<Update<Booking>> for Rest {
    type Ok = Booking;
    type Err = Traced<store::Error>;

    async fn execute(
        &self,
        Update(booking): Update<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        let req = if booking.status == booking::Status::Cancelled {
            self.client
                .post(self.url(&format!("bookings/{}/cancel", booking.id)))
        } else {
            self.client
                .patch(self.url(&format!("bookings/{}/status", booking.id)))
                .json(&StatusUpdate {
                    status: booking.status.to_string(),
                })
        };
        Self::send(req)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> store::Error))
            .map(drop)?;

        Ok(booking)
    }
}

/// [`Rest`] store error.
#[derive(Debug, Display, StdError)]
pub enum Error {
    /// HTTP request failed to complete.
    #[display("HTTP request failed: {_0}")]
    Request(reqwest::Error),

    /// API responded with a non-successful status.
    #[display("API responded with `{status}`: {message}")]
    Status {
        /// HTTP status of the response.
        status: StatusCode,

        /// Message of the API.
        message: String,
    },

    /// API responded with an unexpected body.
    #[display("malformed API response: {_0}")]
    Malformed(#[error(not(source))] String),
}

impl Error {
    /// Indicates whether the API refused a [`Booking`] conflicting with an
    /// already existing one.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::Status { status, .. } if *status == StatusCode::CONFLICT,
        )
    }

    /// Indicates whether the requested entity doesn't exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Status { status, .. } if *status == StatusCode::NOT_FOUND,
        )
    }

    /// Indicates whether the request may succeed if sent again later.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Request(e) => {
                e.is_timeout() || e.is_connect() || e.is_request()
            }
            Self::Status { status, .. } => {
                status.is_server_error()
                    || *status == StatusCode::TOO_MANY_REQUESTS
            }
            Self::Malformed(_) => false,
        }
    }
}

/// Error body of the API.
#[derive(Deserialize)]
struct ErrorBody {
    /// Human-readable message.
    #[serde(default)]
    message: Option<String>,
}

/// List of bookings returned by the API.
#[derive(Deserialize)]
struct List<T> {
    /// Listed records.
    #[serde(default = "Vec::new")]
    bookings: Vec<T>,
}

/// Response of the API to a created booking.
#[derive(Deserialize)]
struct Acknowledgement {
    /// ID assigned by the API.
    #[serde(default)]
    id: Option<booking::Id>,

    /// Reference assigned by the API.
    #[serde(default)]
    booking_reference: Option<String>,
}

/// Body of a booking status update.
#[derive(Serialize)]
struct StatusUpdate {
    /// New status.
    status: String,
}

/// Subset of a booking record sufficient for conflict checks.
#[derive(Deserialize)]
struct ReservationRecord {
    /// ID of the booked listing.
    listing_id: listing::Id,

    /// First booked day.
    start_date: Date,

    /// Last booked day.
    end_date: Date,

    /// Status of the booking.
    status: String,
}

impl TryFrom<ReservationRecord> for Reservation {
    type Error = Error;

    fn try_from(r: ReservationRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            listing_id: r.listing_id,
            range: range(r.start_date, r.end_date)?,
            status: parse(&r.status, "status")?,
        })
    }
}

/// Booking record of the API.
#[derive(Deserialize, Serialize)]
struct BookingRecord {
    /// ID of the booking.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<booking::Id>,

    /// Human-facing reference of the booking.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    booking_reference: Option<String>,

    /// ID of the booked listing.
    listing_id: listing::Id,

    /// ID of the listing host.
    host_id: user::Id,

    /// First booked day.
    start_date: Date,

    /// Last booked day.
    end_date: Date,

    /// Guest contact details.
    guest_info: GuestRecord,

    /// Price breakdown.
    pricing: PricingRecord,

    /// Requests of the guest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    special_requests: Option<String>,

    /// Status of the booking.
    status: String,

    /// Payment status of the booking.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    payment_status: Option<String>,

    /// RFC 3339 creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<String>,

    /// RFC 3339 cancellation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cancelled_at: Option<String>,
}

/// Guest contact details of a [`BookingRecord`].
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct GuestRecord {
    /// First name.
    first_name: String,

    /// Last name.
    last_name: String,

    /// Email address.
    email: String,

    /// Phone number.
    phone: String,

    /// ID of the signed-in guest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_id: Option<user::Id>,
}

/// Price breakdown of a [`BookingRecord`].
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct PricingRecord {
    /// Number of booked days.
    day_count: u32,

    /// Undiscounted subtotal.
    #[serde(with = "rust_decimal::serde::float")]
    original_subtotal: Decimal,

    /// Discount fraction.
    #[serde(default, with = "rust_decimal::serde::float")]
    discount_rate: Decimal,

    /// Discount amount.
    #[serde(with = "rust_decimal::serde::float")]
    discount: Decimal,

    /// Discounted subtotal.
    #[serde(with = "rust_decimal::serde::float")]
    subtotal: Decimal,

    /// Service fee.
    #[serde(with = "rust_decimal::serde::float")]
    service_fee: Decimal,

    /// Taxes.
    #[serde(with = "rust_decimal::serde::float")]
    taxes: Decimal,

    /// Cleaning fee.
    #[serde(with = "rust_decimal::serde::float")]
    cleaning_fee: Decimal,

    /// Security deposit.
    #[serde(with = "rust_decimal::serde::float")]
    security_deposit: Decimal,

    /// Total amount.
    #[serde(with = "rust_decimal::serde::float")]
    total: Decimal,

    /// Currency code, USD when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    currency: Option<String>,
}

impl From<&Booking> for BookingRecord {
    fn from(b: &Booking) -> Self {
        let q = &b.quote;
        Self {
            id: Some(b.id),
            booking_reference: Some(b.reference.to_string()),
            listing_id: b.listing_id,
            host_id: b.host_id,
            start_date: b.range.start,
            end_date: b.range.end,
            guest_info: GuestRecord {
                first_name: b.guest.first_name.to_string(),
                last_name: b.guest.last_name.to_string(),
                email: b.guest.email.to_string(),
                phone: b.guest.phone.to_string(),
                user_id: b.guest.user_id,
            },
            pricing: PricingRecord {
                day_count: q.day_count,
                original_subtotal: q.original_subtotal,
                discount_rate: q.discount_rate.into(),
                discount: q.discount,
                subtotal: q.subtotal,
                service_fee: q.service_fee,
                taxes: q.taxes,
                cleaning_fee: q.cleaning_fee,
                security_deposit: q.security_deposit,
                total: q.total,
                currency: Some(q.currency.to_string()),
            },
            special_requests: b
                .special_requests
                .as_ref()
                .map(ToString::to_string),
            status: b.status.to_string(),
            payment_status: Some(b.payment_status.to_string()),
            created_at: Some(b.created_at.to_rfc3339()),
            cancelled_at: b.cancelled_at.map(|at| at.to_rfc3339()),
        }
    }
}

impl TryFrom<BookingRecord> for Booking {
    type Error = Error;

    fn try_from(r: BookingRecord) -> Result<Self, Self::Error> {
        let id = r.id.ok_or_else(|| malformed("id", "missing"))?;
        let created_at = r
            .created_at
            .as_deref()
            .map(timestamp)
            .transpose()?
            .unwrap_or_else(DateTime::now);
        let p = r.pricing;

        Ok(Self {
            id,
            reference: r
                .booking_reference
                .and_then(booking::Reference::new)
                .unwrap_or_else(|| {
                    booking::Reference::generate(created_at.coerce())
                }),
            listing_id: r.listing_id,
            host_id: r.host_id,
            range: range(r.start_date, r.end_date)?,
            guest: booking::Guest {
                first_name: parse(
                    &r.guest_info.first_name,
                    "guest_info.firstName",
                )?,
                last_name: parse(
                    &r.guest_info.last_name,
                    "guest_info.lastName",
                )?,
                email: parse(&r.guest_info.email, "guest_info.email")?,
                phone: parse(&r.guest_info.phone, "guest_info.phone")?,
                user_id: r.guest_info.user_id,
            },
            quote: Quote {
                day_count: p.day_count,
                original_subtotal: p.original_subtotal,
                discount_rate: Rate::new(p.discount_rate)
                    .ok_or_else(|| {
                        malformed("pricing.discountRate", p.discount_rate)
                    })?,
                discount: p.discount,
                subtotal: p.subtotal,
                service_fee: p.service_fee,
                taxes: p.taxes,
                cleaning_fee: p.cleaning_fee,
                security_deposit: p.security_deposit,
                total: p.total,
                currency: p
                    .currency
                    .as_deref()
                    .map(|c| parse::<Currency>(c, "pricing.currency"))
                    .transpose()?
                    .unwrap_or_default(),
            },
            special_requests: r
                .special_requests
                .filter(|s| !s.is_empty())
                .map(|s| parse(&s, "special_requests"))
                .transpose()?,
            status: parse(&r.status, "status")?,
            payment_status: r
                .payment_status
                .as_deref()
                .map(|s| parse(s, "payment_status"))
                .transpose()?
                .unwrap_or(booking::PaymentStatus::Pending),
            created_at: created_at.coerce(),
            cancelled_at: r
                .cancelled_at
                .as_deref()
                .map(timestamp)
                .transpose()?
                .map(DateTime::coerce),
        })
    }
}

/// Builds an [`Error::Malformed`] for the provided field.
fn malformed(field: &str, reason: impl ToString) -> Error {
    Error::Malformed(format!("`{field}`: {}", reason.to_string()))
}

/// Parses the provided field value.
fn parse<T: std::str::FromStr>(value: &str, field: &str) -> Result<T, Error> {
    value
        .parse()
        .map_err(|_| malformed(field, format!("invalid value `{value}`")))
}

/// Parses the provided RFC 3339 timestamp.
fn timestamp(value: &str) -> Result<DateTime, Error> {
    DateTime::from_rfc3339(value).map_err(|e| malformed("timestamp", e))
}

/// Builds a [`DateRange`] out of the provided record dates.
fn range(start: Date, end: Date) -> Result<DateRange, Error> {
    DateRange::new(start, end)
        .ok_or_else(|| {
            malformed("end_date", format!("`{end}` is before `{start}`"))
        })
}

#[cfg(test)]
mod spec {
    use serde_json::json;

    use crate::domain::{booking, Booking, Reservation};

    use super::{BookingRecord, Error, List, ReservationRecord};

    fn record() -> serde_json::Value {
        json!({
            "id": "6f2a1c3e-9d4b-4e8a-b1f0-2c3d4e5f6a7b",
            "booking_reference": "LR1757500200000417",
            "listing_id": "0b7e4f3a-5c6d-4e7f-8a9b-0c1d2e3f4a5b",
            "host_id": "1c8f5a4b-6d7e-4f80-9b1c-2d3e4f5a6b7c",
            "start_date": "2025-09-10",
            "end_date": "2025-09-12T00:00:00.000Z",
            "guest_info": {
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": "ada@example.com",
                "phone": "+44 20 7946 0018",
                "specialRequests": "",
                "agreeToTerms": true,
            },
            "pricing": {
                "dayCount": 3,
                "originalSubtotal": 300,
                "discount": 15,
                "subtotal": 285,
                "serviceFee": 34.2,
                "taxes": 25.54,
                "cleaningFee": 15,
                "securityDeposit": 50,
                "total": 359.74,
            },
            "special_requests": "",
            "status": "confirmed",
            "payment_status": "completed",
            "created_at": "2025-09-01T12:00:00.000Z",
        })
    }

    #[test]
    fn decodes_booking_record() {
        let record = serde_json::from_value::<BookingRecord>(record()).unwrap();
        let booking = Booking::try_from(record).unwrap();

        assert_eq!(booking.range.to_string(), "2025-09-10..2025-09-12");
        assert_eq!(booking.status, booking::Status::Confirmed);
        assert_eq!(booking.payment_status, booking::PaymentStatus::Completed);
        assert_eq!(booking.quote.total.to_string(), "359.74");
        assert_eq!(booking.reference.to_string(), "LR1757500200000417");
        assert!(booking.special_requests.is_none());
        assert!(booking.cancelled_at.is_none());
    }

    #[test]
    fn reencodes_booking_record() {
        let record = serde_json::from_value::<BookingRecord>(record()).unwrap();
        let booking = Booking::try_from(record).unwrap();

        let json = serde_json::to_value(BookingRecord::from(&booking)).unwrap();
        assert_eq!(json["status"], "confirmed");
        assert_eq!(json["guest_info"]["firstName"], "Ada");
        assert_eq!(json["pricing"]["serviceFee"], 34.2);
        assert_eq!(json["pricing"]["currency"], "USD");
        assert_eq!(json["end_date"], "2025-09-12");
    }

    #[test]
    fn rejects_malformed_records() {
        let mut value = record();
        value["status"] = "archived".into();
        let record = serde_json::from_value::<BookingRecord>(value).unwrap();
        assert!(matches!(Booking::try_from(record), Err(Error::Malformed(_))));

        let mut value = self::record();
        value["start_date"] = "2025-09-13".into();
        let record = serde_json::from_value::<BookingRecord>(value).unwrap();
        assert!(matches!(Booking::try_from(record), Err(Error::Malformed(_))));
    }

    #[test]
    fn decodes_reservations_leniently() {
        let list = serde_json::from_value::<List<ReservationRecord>>(json!({
            "bookings": [record(), {
                "listing_id": "0b7e4f3a-5c6d-4e7f-8a9b-0c1d2e3f4a5b",
                "start_date": "2025-09-20",
                "end_date": "2025-09-22",
                "status": "cancelled",
            }],
        }))
        .unwrap();

        let reservations = list
            .bookings
            .into_iter()
            .map(Reservation::try_from)
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(reservations.len(), 2);
        assert!(reservations[0].is_active());
        assert!(!reservations[1].is_active());

        let empty = serde_json::from_value::<List<ReservationRecord>>(json!({}))
            .unwrap();
        assert!(empty.bookings.is_empty());
    }
}

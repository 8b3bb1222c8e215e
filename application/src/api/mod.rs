//! GraphQL API definitions.

pub mod booking;
pub mod listing;
mod mutation;
mod query;
pub mod quote;
pub mod report;
pub mod scalar;
pub mod user;

use juniper::EmptySubscription;

use crate::Context;

pub use self::{
    booking::Booking, mutation::Mutation, query::Query, quote::Quote,
};

/// GraphQL schema.
pub type Schema =
    juniper::RootNode<'static, Query, Mutation, EmptySubscription<Context>>;

#[cfg(test)]
mod spec {
    use juniper::{graphql_value, EmptySubscription, Variables};
    use service::{domain, infra::Memory};

    use super::{Mutation, Query, Schema};
    use crate::Context;

    fn context() -> Context {
        Context::new(service::Service::new(
            service::Config::default(),
            Memory::default().into(),
        ))
    }

    fn submit(
        listing_id: domain::listing::Id,
        start: &str,
        end: &str,
    ) -> String {
        format!(
            r#"mutation {{
                submitBooking(
                    listingId: "{listing_id}",
                    hostId: "{host_id}",
                    startDate: "{start}",
                    endDate: "{end}",
                    pricing: {{ dailyRate: "100USD", cleaningFee: "15USD" }},
                    guest: {{
                        firstName: "Ada",
                        lastName: "Lovelace",
                        email: "ada@example.com",
                        phone: "+44 20 7946 0000",
                    }},
                ) {{ status paymentStatus quote {{ total }} }}
            }}"#,
            host_id = domain::user::Id::new(),
        )
    }

    #[tokio::test]
    async fn computes_quote() {
        let schema = Schema::new(Query, Mutation, EmptySubscription::new());
        let ctx = context();

        let (res, errs) = juniper::execute(
            r#"{
                quote(
                    pricing: { dailyRate: "100USD", cleaningFee: "15USD" },
                    startDate: "2025-09-10",
                    endDate: "2025-09-12",
                ) { dayCount subtotal serviceFee taxes total }
            }"#,
            None,
            &schema,
            &Variables::new(),
            &ctx,
        )
        .await
        .unwrap();

        assert!(errs.is_empty(), "{errs:?}");
        assert_eq!(
            res,
            graphql_value!({"quote": {
                "dayCount": 3,
                "subtotal": "285USD",
                "serviceFee": "34.2USD",
                "taxes": "25.54USD",
                "total": "359.74USD",
            }}),
        );
    }

    #[tokio::test]
    async fn rejects_overlapping_booking() {
        let schema = Schema::new(Query, Mutation, EmptySubscription::new());
        let ctx = context();
        let listing_id = domain::listing::Id::new();

        let (res, errs) = juniper::execute(
            &submit(listing_id, "2025-09-10", "2025-09-12"),
            None,
            &schema,
            &Variables::new(),
            &ctx,
        )
        .await
        .unwrap();
        assert!(errs.is_empty(), "{errs:?}");
        assert_eq!(
            res,
            graphql_value!({"submitBooking": {
                "status": "CONFIRMED",
                "paymentStatus": "COMPLETED",
                "quote": {"total": "359.74USD"},
            }}),
        );

        let (_, errs) = juniper::execute(
            &submit(listing_id, "2025-09-12", "2025-09-13"),
            None,
            &schema,
            &Variables::new(),
            &ctx,
        )
        .await
        .unwrap();
        assert_eq!(errs.len(), 1, "{errs:?}");
        assert_eq!(
            errs[0]
                .error()
                .extensions()
                .as_object_value()
                .and_then(|ext| ext.get_field_value("code"))
                .and_then(|code| code.as_string_value()),
            Some("DATE_CONFLICT"),
        );
        assert_eq!(ctx.error_status_code(), http::StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn rejects_non_positive_max_days() {
        let schema = Schema::new(Query, Mutation, EmptySubscription::new());

        for max_days in [0, -5] {
            let ctx = context();
            let (_, errs) = juniper::execute(
                &format!(
                    r#"{{
                        validateSpan(
                            startDate: "2025-09-10",
                            endDate: "2025-09-12",
                            maxDays: {max_days},
                        )
                    }}"#,
                ),
                None,
                &schema,
                &Variables::new(),
                &ctx,
            )
            .await
            .unwrap();

            assert_eq!(errs.len(), 1, "{errs:?}");
            assert_eq!(
                errs[0]
                    .error()
                    .extensions()
                    .as_object_value()
                    .and_then(|ext| ext.get_field_value("code"))
                    .and_then(|code| code.as_string_value()),
                Some("INVALID_MAX_DAYS"),
            );
            assert_eq!(ctx.error_status_code(), http::StatusCode::BAD_REQUEST);
        }

        let (res, errs) = juniper::execute(
            r#"{
                validateSpan(
                    startDate: "2025-09-10",
                    endDate: "2025-09-12",
                    maxDays: 3,
                )
            }"#,
            None,
            &schema,
            &Variables::new(),
            &context(),
        )
        .await
        .unwrap();
        assert!(errs.is_empty(), "{errs:?}");
        assert_eq!(res, graphql_value!({"validateSpan": 3}));
    }
}

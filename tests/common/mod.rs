//! Shared harness: the full router over in-memory adapters.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{NaiveDate, Utc};
use serde_json::Value;
use tower::ServiceExt;

use gymhub::adapters::auth::MockSessionValidator;
use gymhub::adapters::email::RecordingEmailSender;
use gymhub::adapters::http::{api_router, AppState, HttpLimits};
use gymhub::adapters::media::InMemoryMediaStorage;
use gymhub::adapters::memory::InMemoryStore;
use gymhub::adapters::payment::MockPaymentGateway;
use gymhub::application::{CachedSettings, Notifier};
use gymhub::domain::booking::CapacityPolicy;
use gymhub::domain::foundation::{CommissionRate, Money};
use gymhub::domain::settings::PlatformSettings;

pub const OWNER: &str = "owner-token";
pub const MEMBER: &str = "member-token";
pub const OTHER_MEMBER: &str = "other-member-token";
pub const COACH: &str = "coach-token";
pub const ADMIN: &str = "admin-token";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
    pub emails: Arc<RecordingEmailSender>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let emails = Arc::new(RecordingEmailSender::new());
        let validator = MockSessionValidator::new()
            .with_test_user(OWNER, "meera")
            .with_test_user(MEMBER, "asha")
            .with_test_user(OTHER_MEMBER, "ravi")
            .with_test_user(COACH, "arjun")
            .with_test_user(ADMIN, "root");
        let defaults = PlatformSettings {
            commission_rate: CommissionRate::try_from_bps(1000).unwrap(),
            featured_price_per_day: Money::from_major(499),
        };

        let state = AppState {
            users: store.clone(),
            gyms: store.clone(),
            services: store.clone(),
            slots: store.clone(),
            bookings: store.clone(),
            trainers: store.clone(),
            trainer_bookings: store.clone(),
            reviews: store.clone(),
            featured: store.clone(),
            payouts: store.clone(),
            earnings: store.clone(),
            payments: Arc::new(MockPaymentGateway::new()),
            media: Arc::new(InMemoryMediaStorage::new()),
            validator: Arc::new(validator),
            settings: Arc::new(CachedSettings::new(store.clone(), defaults, Duration::ZERO)),
            notifier: Notifier::new(emails.clone()),
            policy: CapacityPolicy::new(chrono::Duration::minutes(15)),
            super_admins: vec!["root@test.example.com".to_string()],
            limits: HttpLimits {
                search_default_radius_km: 10.0,
                search_fallback_limit: 10,
                max_upload_bytes: 1024 * 1024,
            },
        };

        Self {
            router: api_router(state),
            store,
            emails,
        }
    }

    pub async fn call(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.call("GET", uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.call("POST", uri, Some(token), Some(body)).await
    }

    /// Registers a gym as `OWNER` and approves it as `ADMIN`.
    pub async fn approved_gym(&self) -> String {
        let (status, gym) = self
            .post(
                "/api/gyms",
                OWNER,
                serde_json::json!({
                    "name": "Iron Temple",
                    "description": "Strength gym",
                    "address": "12 MG Road",
                    "city": "Bengaluru",
                    "location": { "latitude": 12.97, "longitude": 77.59 }
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", gym);
        let id = gym["id"].as_str().unwrap().to_string();

        let (status, approved) = self
            .post(&format!("/api/super-admin/gyms/{}/approve", id), ADMIN, Value::Null)
            .await;
        assert_eq!(status, StatusCode::OK, "{}", approved);
        assert_eq!(approved["status"], "approved");
        id
    }

    pub async fn service(&self, gym_id: &str, body: Value) -> String {
        let (status, service) = self
            .post(&format!("/api/gyms/{}/services", gym_id), OWNER, body)
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", service);
        service["id"].as_str().unwrap().to_string()
    }

    /// Pays for a checkout response with a correctly signed confirmation.
    pub async fn pay(&self, verify_uri: &str, token: &str, checkout: &Value) -> (StatusCode, Value) {
        let order_id = checkout["order"]["id"].as_str().unwrap();
        self.post(
            verify_uri,
            token,
            serde_json::json!({
                "razorpay_order_id": order_id,
                "razorpay_payment_id": "pay_test_1",
                "razorpay_signature": MockPaymentGateway::sign(order_id, "pay_test_1"),
            }),
        )
        .await
    }
}

pub fn next_week() -> NaiveDate {
    Utc::now().date_naive() + chrono::Duration::days(7)
}

#![allow(dead_code)]

use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    test, web, App,
};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

use trip_planner_api::config::AppConfig;
use trip_planner_api::db::memory::MemoryStore;
use trip_planner_api::db::{Sequence, TripStore};
use trip_planner_api::error::StoreError;
use trip_planner_api::models::bookings::{Booking, Payment};
use trip_planner_api::models::trip::{ItineraryItem, Trip, TripStatus};
use trip_planner_api::models::user::User;
use trip_planner_api::routes;
use trip_planner_api::services::payment::SimulatedGateway;
use trip_planner_api::services::trip_planner_service::GenAiTripPlanner;
use trip_planner_api::AppState;

pub const PASSWORD: &str = "wanderlust-42";
pub const FRONTEND_ORIGIN: &str = "http://localhost:3000";

pub fn test_config() -> AppConfig {
    AppConfig::from_lookup(|key| match key {
        "MONGODB_URI" => Some("mongodb://localhost:27017".to_string()),
        "JWT_SECRET" => Some("integration-secret".to_string()),
        "BCRYPT_COST" => Some("4".to_string()),
        "CHAT_HISTORY_LIMIT" => Some("10".to_string()),
        _ => None,
    })
    .expect("test config is valid")
}

pub struct TestApp {
    pub state: web::Data<AppState>,
}

impl TestApp {
    /// App backed by an in-memory store, a seeded planner and a gateway
    /// approving every charge.
    pub fn new() -> Self {
        Self::with_success_rate(1.0)
    }

    pub fn declining() -> Self {
        Self::with_success_rate(0.0)
    }

    /// Approving app over a caller-supplied store.
    pub fn with_store(store: Arc<dyn TripStore>) -> Self {
        Self::build(store, 1.0)
    }

    fn with_success_rate(success_rate: f64) -> Self {
        Self::build(Arc::new(MemoryStore::new()), success_rate)
    }

    fn build(store: Arc<dyn TripStore>, success_rate: f64) -> Self {
        let state = AppState::new(test_config(), store)
            .with_planner(Arc::new(GenAiTripPlanner::seeded(7)))
            .with_payments(Arc::new(SimulatedGateway::seeded(success_rate, 7)));

        Self {
            state: web::Data::new(state),
        }
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new().configure(routes::configure(self.state.clone()))
    }
}

/// In-memory store with switchable faults. Every other call is forwarded.
#[derive(Default)]
pub struct FaultyStore {
    inner: MemoryStore,
    /// `ping` reports the database as unreachable.
    pub unreachable: bool,
    /// Another request refunds the payment between read and update.
    pub refund_race: bool,
}

impl FaultyStore {
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    pub fn refund_race() -> Self {
        Self {
            refund_race: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl TripStore for FaultyStore {
    async fn ping(&self) -> Result<(), StoreError> {
        if self.unreachable {
            return Err(StoreError::Backend("connection refused".to_string()));
        }
        self.inner.ping().await
    }

    async fn next_id(&self, sequence: Sequence) -> Result<i64, StoreError> {
        self.inner.next_id(sequence).await
    }

    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        self.inner.insert_user(user).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.inner.find_user_by_email(email).await
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        self.inner.find_user_by_id(id).await
    }

    async fn insert_trip(&self, trip: &Trip) -> Result<(), StoreError> {
        self.inner.insert_trip(trip).await
    }

    async fn find_trip(&self, id: i64) -> Result<Option<Trip>, StoreError> {
        self.inner.find_trip(id).await
    }

    async fn list_trips_for_user(&self, user_id: i64) -> Result<Vec<Trip>, StoreError> {
        self.inner.list_trips_for_user(user_id).await
    }

    async fn count_trips_for_user(&self, user_id: i64) -> Result<u64, StoreError> {
        self.inner.count_trips_for_user(user_id).await
    }

    async fn update_trip_status(&self, id: i64, status: TripStatus) -> Result<(), StoreError> {
        self.inner.update_trip_status(id, status).await
    }

    async fn insert_itinerary_items(&self, items: &[ItineraryItem]) -> Result<(), StoreError> {
        self.inner.insert_itinerary_items(items).await
    }

    async fn list_itinerary_items(&self, trip_id: i64) -> Result<Vec<ItineraryItem>, StoreError> {
        self.inner.list_itinerary_items(trip_id).await
    }

    async fn mark_itinerary_optimized(&self, trip_id: i64) -> Result<u64, StoreError> {
        self.inner.mark_itinerary_optimized(trip_id).await
    }

    async fn insert_booking(&self, booking: &Booking) -> Result<(), StoreError> {
        self.inner.insert_booking(booking).await
    }

    async fn find_booking(&self, id: i64) -> Result<Option<Booking>, StoreError> {
        self.inner.find_booking(id).await
    }

    async fn insert_payment(&self, payment: &Payment) -> Result<(), StoreError> {
        self.inner.insert_payment(payment).await
    }

    async fn find_payment(&self, id: i64) -> Result<Option<Payment>, StoreError> {
        self.inner.find_payment(id).await
    }

    async fn update_payment_refund(&self, id: i64, refund_id: &str) -> Result<bool, StoreError> {
        if self.refund_race {
            // The competing refund wins the conditional update.
            self.inner.update_payment_refund(id, "ref_competing").await?;
        }
        self.inner.update_payment_refund(id, refund_id).await
    }
}

pub async fn register<S, B>(app: &S, name: &str, email: &str) -> ServiceResponse<B>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({
            "name": name,
            "email": email,
            "password": PASSWORD,
        }))
        .to_request();
    test::call_service(app, req).await
}

pub async fn login<S, B>(app: &S, email: &str, password: &str) -> ServiceResponse<B>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_form([("username", email), ("password", password)])
        .to_request();
    test::call_service(app, req).await
}

/// Registers a traveler and returns a bearer token for them.
pub async fn signed_in<S, B>(app: &S, email: &str) -> String
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let resp = register(app, "Test Traveler", email).await;
    assert!(resp.status().is_success(), "register failed: {}", resp.status());

    let resp = login(app, email, PASSWORD).await;
    assert!(resp.status().is_success(), "login failed: {}", resp.status());
    let body: Value = test::read_body_json(resp).await;
    body["access_token"]
        .as_str()
        .expect("login returns a token")
        .to_string()
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

/// Generates a trip for the token's owner and returns the response body.
pub async fn generate_trip<S, B>(app: &S, token: &str, body: Value) -> Value
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/itinerary/generate")
        .insert_header(bearer(token))
        .set_json(body)
        .to_request();
    let resp = test::call_service(app, req).await;
    assert!(resp.status().is_success(), "generate failed: {}", resp.status());
    test::read_body_json(resp).await
}

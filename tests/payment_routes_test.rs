mod common;

use actix_web::{http::StatusCode, test};
use serde_json::{json, Value};

use std::sync::Arc;

use common::{bearer, generate_trip, signed_in, FaultyStore, TestApp};

async fn book<S, B>(app: &S, token: &str, trip_id: &Value) -> (StatusCode, Value)
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<B>,
        Error = actix_web::Error,
    >,
    B: actix_web::body::MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/book")
        .insert_header(bearer(token))
        .set_json(json!({ "trip_id": trip_id, "item_type": "package", "item_id": "pkg-1" }))
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    (status, test::read_body_json(resp).await)
}

async fn pay<S, B>(app: &S, token: &str, body: Value) -> (StatusCode, Value)
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<B>,
        Error = actix_web::Error,
    >,
    B: actix_web::body::MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/payment")
        .insert_header(bearer(token))
        .set_json(body)
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    (status, test::read_body_json(resp).await)
}

#[actix_rt::test]
async fn test_booking_marks_trip_booked() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;
    let token = signed_in(&app, "ada@example.com").await;
    let trip = generate_trip(&app, &token, json!({ "destination": "Paris", "duration": 2 })).await;

    let (status, body) = book(&app, &token, &trip["id"]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Booking confirmed");
    assert_eq!(body["booking_id"], 1);

    let req = test::TestRequest::get()
        .uri(&format!("/trips/{}/itinerary", trip["id"]))
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["trip"]["status"], "booked");
}

#[actix_rt::test]
async fn test_booking_unknown_or_foreign_trip() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;
    let owner = signed_in(&app, "owner@example.com").await;
    let other = signed_in(&app, "other@example.com").await;
    let trip = generate_trip(&app, &owner, json!({ "destination": "Paris", "duration": 1 })).await;

    let (status, body) = book(&app, &owner, &json!(404)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Trip not found");

    let (status, _) = book(&app, &other, &trip["id"]).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_payment_completes_and_refunds() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;
    let token = signed_in(&app, "ada@example.com").await;
    let trip = generate_trip(&app, &token, json!({ "destination": "Tokyo", "duration": 2 })).await;
    let (_, booking) = book(&app, &token, &trip["id"]).await;

    let (status, receipt) = pay(
        &app,
        &token,
        json!({ "booking_id": booking["booking_id"], "amount": 420.5, "method": "card" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(receipt["status"], "completed");
    assert_eq!(receipt["message"], "Payment processed successfully");
    assert!(receipt["transaction_id"]
        .as_str()
        .is_some_and(|t| t.starts_with("txn_")));

    let refund_uri = format!("/payment/{}/refund", receipt["payment_id"]);
    let req = test::TestRequest::post()
        .uri(&refund_uri)
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "refunded");
    assert_eq!(body["message"], "Refund of $420.5 processed successfully");
    assert!(body["refund_id"].as_str().is_some_and(|r| r.starts_with("ref_")));

    let req = test::TestRequest::post()
        .uri(&refund_uri)
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[actix_rt::test]
async fn test_declined_payment_is_recorded() {
    let test_app = TestApp::declining();
    let app = test::init_service(test_app.create_app()).await;
    let token = signed_in(&app, "ada@example.com").await;
    let trip = generate_trip(&app, &token, json!({ "destination": "London", "duration": 1 })).await;
    let (_, booking) = book(&app, &token, &trip["id"]).await;

    let (status, receipt) = pay(
        &app,
        &token,
        json!({ "booking_id": booking["booking_id"], "amount": 99.0, "method": "card" }),
    )
    .await;
    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(receipt["status"], "failed");
    assert_eq!(receipt["error"], "Payment failed - insufficient funds");
    assert!(receipt.get("transaction_id").is_none());

    let payment = test_app
        .state
        .store
        .find_payment(receipt["payment_id"].as_i64().unwrap())
        .await
        .unwrap()
        .expect("declined payment is stored");
    assert_eq!(payment.amount, 99.0);

    let req = test::TestRequest::post()
        .uri(&format!("/payment/{}/refund", payment.id))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[actix_rt::test]
async fn test_payment_validation() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;
    let token = signed_in(&app, "ada@example.com").await;
    let trip = generate_trip(&app, &token, json!({ "destination": "Paris", "duration": 1 })).await;
    let (_, booking) = book(&app, &token, &trip["id"]).await;

    let (status, body) = pay(
        &app,
        &token,
        json!({ "booking_id": 77, "amount": 10.0, "method": "card" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Booking not found");

    for payload in [
        json!({ "booking_id": booking["booking_id"], "amount": 0.0, "method": "card" }),
        json!({ "booking_id": booking["booking_id"], "amount": 10.0, "method": "" }),
    ] {
        let (status, _) = pay(&app, &token, payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let req = test::TestRequest::post()
        .uri("/payment/31/refund")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_payment_for_foreign_booking_is_404() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;
    let owner = signed_in(&app, "owner@example.com").await;
    let other = signed_in(&app, "other@example.com").await;
    let trip = generate_trip(&app, &owner, json!({ "destination": "Paris", "duration": 1 })).await;
    let (_, booking) = book(&app, &owner, &trip["id"]).await;

    let (status, _) = pay(
        &app,
        &other,
        json!({ "booking_id": booking["booking_id"], "amount": 10.0, "method": "card" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_concurrent_refund_loses_with_conflict() {
    let test_app = TestApp::with_store(Arc::new(FaultyStore::refund_race()));
    let app = test::init_service(test_app.create_app()).await;
    let token = signed_in(&app, "ada@example.com").await;
    let trip = generate_trip(&app, &token, json!({ "destination": "Paris", "duration": 1 })).await;
    let (_, booking) = book(&app, &token, &trip["id"]).await;
    let (_, receipt) = pay(
        &app,
        &token,
        json!({ "booking_id": booking["booking_id"], "amount": 50.0, "method": "card" }),
    )
    .await;

    let req = test::TestRequest::post()
        .uri(&format!("/payment/{}/refund", receipt["payment_id"]))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "Payment was already refunded");

    let payment = test_app
        .state
        .store
        .find_payment(receipt["payment_id"].as_i64().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(payment.refund_id.as_deref(), Some("ref_competing"));
}

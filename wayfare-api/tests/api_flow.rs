use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{Duration, NaiveDate, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use tower::util::ServiceExt;
use uuid::Uuid;
use wayfare_api::middleware::auth::Claims;
use wayfare_api::state::AuthSettings;
use wayfare_api::{app, AppState};
use wayfare_booking::memory::MemoryStore;
use wayfare_booking::service::CreatePackageRequest;
use wayfare_booking::{BookingService, RefundPolicy};
use wayfare_catalog::{PackageType, PricingEngine};
use wayfare_core::{Actor, Role};

const SECRET: &str = "test-secret";

fn test_app() -> (Router, Arc<BookingService>) {
    let store = Arc::new(MemoryStore::new());
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    tokio::spawn(async move { while rx.recv().await.is_some() {} });

    let service = Arc::new(BookingService::new(
        store.clone(),
        store.clone(),
        store,
        PricingEngine::default(),
        RefundPolicy::default(),
        tx,
    ));

    let state = AppState {
        service: service.clone(),
        auth: AuthSettings {
            secret: SECRET.to_string(),
            expiration: 3600,
            master_admin_email: Some("admin@example.com".to_string()),
        },
    };

    (app(state), service)
}

fn token(user_id: Uuid, role: &str) -> String {
    let claims = Claims {
        sub: user_id.to_string(),
        email: format!("{}@example.com", user_id.simple()),
        role: role.to_string(),
        exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

async fn seed_package(service: &BookingService, price: rust_decimal::Decimal, max: i32) -> Uuid {
    let agent = Actor {
        id: Uuid::new_v4(),
        email: "agent@example.com".to_string(),
        role: Role::Agent,
        is_master_admin: false,
    };
    service
        .create_package(
            &agent,
            CreatePackageRequest {
                name: "Delta Cruise".to_string(),
                destination: "Vietnam".to_string(),
                description: "Mekong delta by boat".to_string(),
                package_type: PackageType::Relaxation,
                price,
                duration_days: 4,
                start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2027, 12, 31).unwrap(),
                max_people: max,
            },
        )
        .await
        .unwrap()
        .id
}

fn booking_body(package_id: Uuid, days_out: i64, people: i32) -> String {
    booking_body_at(package_id, Utc::now() + Duration::days(days_out), people)
}

fn booking_body_at(package_id: Uuid, trip_date: chrono::DateTime<Utc>, people: i32) -> String {
    let travelers: Vec<Value> = (0..people)
        .map(|i| json!({ "first_name": format!("Traveler {i}") }))
        .collect();
    json!({
        "package_id": package_id,
        "trip_date": trip_date.to_rfc3339(),
        "number_of_people": people,
        "travelers": travelers,
        "room_type": "Double",
        "insurance": false,
    })
    .to_string()
}

async fn send_json(app: &Router, method: &str, uri: &str, bearer: Option<&str>, body: Option<String>) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = builder
        .body(body.map(Body::from).unwrap_or_else(Body::empty))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn bookings_require_authentication() {
    let (app, service) = test_app();
    let package_id = seed_package(&service, dec!(100), 5).await;

    let (status, _) = send_json(
        &app,
        "POST",
        "/v1/bookings",
        None,
        Some(booking_body(package_id, 40, 1)),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn catalog_browse_is_public() {
    let (app, service) = test_app();
    seed_package(&service, dec!(100), 5).await;

    let (status, body) = send_json(&app, "GET", "/v1/packages", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["name"], "Delta Cruise");
}

#[tokio::test]
async fn book_pay_cancel_round_trip() {
    let (app, service) = test_app();
    // 500 * 2 = 1000 total, cancelled 35 days out => 900 refund.
    let package_id = seed_package(&service, dec!(500), 10).await;
    let user_id = Uuid::new_v4();
    let bearer = token(user_id, "USER");

    let (status, body) = send_json(
        &app,
        "POST",
        "/v1/bookings",
        Some(&bearer),
        Some(booking_body(package_id, 35, 2)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["booking"]["status"], "Pending");
    assert_eq!(body["booking"]["total_price"], "1000");
    let booking_id = body["booking"]["id"].as_str().unwrap().to_string();

    let (status, body) = send_json(
        &app,
        "POST",
        &format!("/v1/bookings/{booking_id}/pay"),
        Some(&bearer),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["booking"]["status"], "Confirmed");

    let (status, body) = send_json(
        &app,
        "POST",
        &format!("/v1/bookings/{booking_id}/cancel"),
        Some(&bearer),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["refund_amount"], "900.00");

    let (status, body) = send_json(&app, "GET", "/v1/wallet", Some(&bearer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance"], "900.00");
    let kinds: Vec<&str> = body["transactions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["kind"].as_str().unwrap())
        .collect();
    assert!(kinds.contains(&"refund"));
    assert!(kinds.contains(&"payment"));
}

#[tokio::test]
async fn sold_out_date_returns_conflict_with_remaining() {
    let (app, service) = test_app();
    let package_id = seed_package(&service, dec!(100), 2).await;
    let bearer = token(Uuid::new_v4(), "USER");
    let trip = Utc::now() + Duration::days(40);

    let (status, _) = send_json(
        &app,
        "POST",
        "/v1/bookings",
        Some(&bearer),
        Some(booking_body_at(package_id, trip, 2)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send_json(
        &app,
        "POST",
        "/v1/bookings",
        Some(&bearer),
        Some(booking_body_at(package_id, trip, 1)),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CAPACITY_EXCEEDED");
    assert_eq!(body["remaining_capacity"], 0);
    assert_eq!(body["error"], "Only 0 spots left");
}

#[tokio::test]
async fn traveler_mismatch_is_a_bad_request() {
    let (app, service) = test_app();
    let package_id = seed_package(&service, dec!(100), 5).await;
    let bearer = token(Uuid::new_v4(), "USER");

    let body = json!({
        "package_id": package_id,
        "trip_date": (Utc::now() + Duration::days(30)).to_rfc3339(),
        "number_of_people": 3,
        "travelers": [{}, {}],
        "room_type": "Single",
    })
    .to_string();

    let (status, body) = send_json(&app, "POST", "/v1/bookings", Some(&bearer), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn plain_users_cannot_reach_admin_surface() {
    let (app, service) = test_app();
    let package_id = seed_package(&service, dec!(100), 5).await;
    let bearer = token(Uuid::new_v4(), "USER");

    let (status, body) = send_json(&app, "GET", "/v1/admin/bookings", Some(&bearer), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");

    let (status, _) = send_json(
        &app,
        "DELETE",
        &format!("/v1/admin/packages/{package_id}"),
        Some(&bearer),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn agents_override_status_and_see_reports() {
    let (app, service) = test_app();
    let package_id = seed_package(&service, dec!(250), 5).await;
    let user_bearer = token(Uuid::new_v4(), "USER");
    let agent_bearer = token(Uuid::new_v4(), "AGENT");

    let (_, body) = send_json(
        &app,
        "POST",
        "/v1/bookings",
        Some(&user_bearer),
        Some(booking_body(package_id, 40, 2)),
    )
    .await;
    let booking_id = body["booking"]["id"].as_str().unwrap().to_string();

    let (status, body) = send_json(
        &app,
        "PUT",
        &format!("/v1/admin/bookings/{booking_id}/status"),
        Some(&agent_bearer),
        Some(json!({ "status": "Completed" }).to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Completed");

    let (status, body) = send_json(
        &app,
        "GET",
        "/v1/admin/reports/sales",
        Some(&agent_bearer),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["day_wise"].as_array().unwrap().len(), 1);
    assert_eq!(body["day_wise"][0]["total_sales"], "500");
    assert_eq!(body["package_wise"][0]["revenue"], "500");
}

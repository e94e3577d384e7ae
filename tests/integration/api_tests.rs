//! API integration tests
//!
//! These run against a live server with its database:
//! `cargo test -- --ignored`. Tokens are signed with `JWT_SECRET`
//! (or the default development secret).

use barbershop_server::models::{user::TokenClaims, Role};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";
const DAY: &str = "2031-06-02";

fn token_for(email: &str, role: Option<Role>) -> String {
    let secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| "change-this-secret-in-production".to_string());
    let claims = TokenClaims {
        sub: format!("it-{}", email),
        email: email.to_string(),
        role,
        exp: Utc::now().timestamp() + 600,
        iat: Some(Utc::now().timestamp()),
        iss: None,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .expect("Failed to sign token")
}

fn admin_token() -> String {
    token_for("admin@example.com", Some(Role::Admin))
}

/// Create a fresh barber and service so each run books its own slots
async fn setup_shop(client: &Client) -> (String, String) {
    let token = admin_token();
    let barber: Value = client
        .post(format!("{}/admin/barbers", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "name": "Integration Barber", "role": "Barber" }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let service: Value = client
        .post(format!("{}/admin/services", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "name": "Classic Cut",
            "price": "25.00",
            "duration": "30 min",
            "category": "Hair"
        }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    (
        barber["id"].as_str().expect("No barber id").to_string(),
        service["id"].as_str().expect("No service id").to_string(),
    )
}

fn booking(barber_id: &str, service_id: &str, time: &str, email: &str) -> Value {
    json!({
        "barberId": barber_id,
        "serviceId": service_id,
        "date": DAY,
        "time": time,
        "clientName": "Ana",
        "clientEmail": email
    })
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_slot_catalog() {
    let client = Client::new();

    let body: Value = client
        .get(format!("{}/slots", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let slots = body.as_array().expect("Expected an array");
    assert_eq!(slots.first().and_then(Value::as_str), Some("09:00 AM"));
}

#[tokio::test]
#[ignore]
async fn test_availability_requires_parameters() {
    let client = Client::new();

    let response = client
        .get(format!("{}/availability?date={}", BASE_URL, DAY))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_booking_requires_token() {
    let client = Client::new();

    let response = client
        .post(format!("{}/citas", BASE_URL))
        .json(&booking("x", "y", "10:00 AM", "ana@example.com"))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_booking_for_someone_else_is_forbidden() {
    let client = Client::new();
    let (barber_id, service_id) = setup_shop(&client).await;

    let response = client
        .post(format!("{}/citas", BASE_URL))
        .bearer_auth(token_for("mallory@example.com", None))
        .json(&booking(&barber_id, &service_id, "10:00 AM", "ana@example.com"))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_booking_flow() {
    let client = Client::new();
    let (barber_id, service_id) = setup_shop(&client).await;
    let ana = token_for("ana@example.com", None);

    let response = client
        .post(format!("{}/citas", BASE_URL))
        .bearer_auth(&ana)
        .json(&booking(&barber_id, &service_id, "10:00 AM", "ana@example.com"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["id"].is_string());

    // Same slot again
    let response = client
        .post(format!("{}/citas", BASE_URL))
        .bearer_auth(token_for("bob@example.com", None))
        .json(&booking(&barber_id, &service_id, "10:00 AM", "bob@example.com"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    let booked: Value = client
        .get(format!("{}/availability?date={}&barberId={}", BASE_URL, DAY, barber_id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(booked, json!(["10:00 AM"]));

    let history: Value = client
        .get(format!("{}/citas?userId=ana@example.com", BASE_URL))
        .bearer_auth(&ana)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert!(history
        .as_array()
        .expect("Expected an array")
        .iter()
        .any(|a| a["barberId"] == barber_id.as_str()));

    let notifications: Value = client
        .get(format!("{}/notifications", BASE_URL))
        .bearer_auth(&ana)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert!(!notifications.as_array().expect("Expected an array").is_empty());
}

#[tokio::test]
#[ignore]
async fn test_block_and_unblock() {
    let client = Client::new();
    let (barber_id, _) = setup_shop(&client).await;
    let token = admin_token();

    let response = client
        .post(format!("{}/admin/blocks", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "date": DAY, "time": "03:00 PM", "barberId": barber_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let blocked: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(blocked["status"], "blocked");

    let day: Value = client
        .get(format!("{}/availability/slots?date={}&barberId={}", BASE_URL, DAY, barber_id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let slot = day["slots"]
        .as_array()
        .expect("Expected slots")
        .iter()
        .find(|s| s["time"] == "03:00 PM")
        .expect("Slot missing")
        .clone();
    assert_eq!(slot["available"], false);

    let id = blocked["id"].as_str().expect("No id");
    let response = client
        .delete(format!("{}/admin/blocks/{}", BASE_URL, id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204);

    let logs: Value = client
        .get(format!("{}/admin/audit-logs?limit=10", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert!(!logs.as_array().expect("Expected an array").is_empty());
}

#[tokio::test]
#[ignore]
async fn test_admin_endpoints_reject_clients() {
    let client = Client::new();

    let response = client
        .get(format!("{}/admin/dashboard?date={}", BASE_URL, DAY))
        .bearer_auth(token_for("ana@example.com", None))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);
}

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use delivery_manager::{db::connect_in_memory, handlers::AppState, server::create_router};
use serde_json::{json, Value};
use tower::ServiceExt;

/// Router backed by a fresh in-memory database
pub async fn test_app() -> Router {
    let pool = connect_in_memory().await.expect("in-memory database");
    create_router(AppState::new(pool))
}

/// Send one request and decode the JSON response (Null when the body is empty)
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("valid request");

    let response = app.clone().oneshot(request).await.expect("router never fails");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, value)
}

pub fn client_body(cpf: &str, email: &str) -> Value {
    json!({
        "name": "Maria Souza",
        "cpf": cpf,
        "phone": "11987654321",
        "email": email,
        "address": "Rua das Flores, 123",
    })
}

/// Create a client and return its id
pub async fn create_client(app: &Router, cpf: &str, email: &str) -> String {
    let (status, body) = send(app, Method::POST, "/clients", Some(client_body(cpf, email))).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["id"].as_str().expect("client id").to_string()
}

/// Create an order and return the whole creation response
pub async fn create_order(app: &Router, client_id: &str, shipment: Value) -> Value {
    let mut body = shipment;
    body["client_id"] = json!(client_id);
    let (status, body) = send(app, Method::POST, "/orders", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body
}

/// 10 km at 2/km, 5 kg at 3/kg, normal: final cost 35
pub fn small_shipment() -> Value {
    json!({
        "urgency": "normal",
        "distance_km": 10,
        "rate_per_km": 2,
        "weight_kg": 5,
        "rate_per_kg": 3,
    })
}

/// 10 km at 1/km, 60 kg at 1/kg, normal: base 70 plus heavy cargo fee, final 85
pub fn heavy_shipment() -> Value {
    json!({
        "urgency": "normal",
        "distance_km": 10,
        "rate_per_km": 1,
        "weight_kg": 60,
        "rate_per_kg": 1,
    })
}

pub fn error_type(body: &Value) -> &str {
    body["error"]["type"].as_str().unwrap_or_default()
}

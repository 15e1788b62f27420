//! Router-level tests for the customer endpoints, backed by the in-memory store.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use server::startup::build_app;
use server::state::AppState;
use service::customer::repository::memory::InMemoryCustomerRepository;
use service::notification::FallbackNotificationClient;

fn test_app() -> axum::Router {
    let state = AppState::new(
        Arc::new(InMemoryCustomerRepository::new()),
        Arc::new(FallbackNotificationClient),
        None,
    );
    build_app(state)
}

async fn send(app: &axum::Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(Body::from(b.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, json)
}

fn john(email: &str) -> Value {
    json!({ "firstName": "John", "lastName": "Doe", "email": email })
}

#[tokio::test]
async fn test_example_lifecycle_scenario() {
    let app = test_app();

    let (status, created) = send(&app, "POST", "/api/v1/customers", Some(john("john@example.com"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], 1);
    assert_eq!(created["email"], "john@example.com");

    let (status, err) = send(&app, "POST", "/api/v1/customers", Some(john("john@example.com"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["message"], "Email already exists: john@example.com");

    let (status, updated) = send(&app, "PUT", "/api/v1/customers/1", Some(john("john2@example.com"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["email"], "john2@example.com");

    let (status, body) = send(&app, "DELETE", "/api/v1/customers/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, err) = send(&app, "GET", "/api/v1/customers/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["message"], "Customer with id 1 not found");
}

#[tokio::test]
async fn test_error_body_shape() {
    let app = test_app();
    let (status, err) = send(&app, "GET", "/api/v1/customers/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["status"], 404);
    assert_eq!(err["error"], "Not Found");
    assert_eq!(err["path"], "/api/v1/customers/42");
    assert!(err["timestamp"].as_str().unwrap().contains('T'));
    assert!(err.get("details").is_none());
}

#[tokio::test]
async fn test_representation_fields() {
    let app = test_app();
    let body = json!({
        "firstName": "Ada",
        "lastName": "Lovelace",
        "email": "ada@example.com",
        "address": "12 St James's Square"
    });
    let (_, created) = send(&app, "POST", "/api/v1/customers", Some(body)).await;
    let (status, got) = send(&app, "GET", &format!("/api/v1/customers/{}", created["id"]), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(got["firstName"], "Ada");
    assert_eq!(got["lastName"], "Lovelace");
    assert_eq!(got["address"], "12 St James's Square");
    assert!(got.get("phone").is_none());
    assert_eq!(got["createdBy"], "system");
    assert_eq!(got["isDeleted"], false);
    assert_eq!(got["version"], 0);
    // yyyy-MM-dd HH:mm:ss
    let created_at = got["createdAt"].as_str().unwrap();
    assert_eq!(created_at.len(), 19);
    assert_eq!(&created_at[10..11], " ");
}

#[tokio::test]
async fn test_list_returns_all_customers() {
    let app = test_app();
    let (status, empty) = send(&app, "GET", "/api/v1/customers", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(empty, json!([]));

    send(&app, "POST", "/api/v1/customers", Some(john("a@example.com"))).await;
    send(&app, "POST", "/api/v1/customers", Some(john("b@example.com"))).await;
    let (_, list) = send(&app, "GET", "/api/v1/customers", None).await;
    let emails: Vec<&str> = list.as_array().unwrap().iter().map(|c| c["email"].as_str().unwrap()).collect();
    assert_eq!(emails, vec!["a@example.com", "b@example.com"]);
}

#[tokio::test]
async fn test_validation_failure_reports_details() {
    let app = test_app();
    let body = json!({ "firstName": "", "email": "nope", "phone": "1".repeat(21) });
    let (status, err) = send(&app, "POST", "/api/v1/customers", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["message"], "Validation failed");
    assert_eq!(err["path"], "/api/v1/customers");
    let details = &err["details"];
    assert_eq!(details["firstName"], "First name is required");
    assert_eq!(details["lastName"], "Last name is required");
    assert_eq!(details["email"], "Email must be a valid email address");
    assert_eq!(details["phone"], "Phone number must not exceed 20 characters");
    assert!(details.get("address").is_none());
}

#[tokio::test]
async fn test_update_conflict_leaves_record_unchanged() {
    let app = test_app();
    send(&app, "POST", "/api/v1/customers", Some(john("one@example.com"))).await;
    let (_, two) = send(&app, "POST", "/api/v1/customers", Some(john("two@example.com"))).await;

    let (status, err) = send(&app, "PUT", "/api/v1/customers/2", Some(john("one@example.com"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["message"], "Email already exists: one@example.com");

    let (_, after) = send(&app, "GET", "/api/v1/customers/2", None).await;
    assert_eq!(after, two);
}

#[tokio::test]
async fn test_update_keeping_email_succeeds() {
    let app = test_app();
    send(&app, "POST", "/api/v1/customers", Some(john("keep@example.com"))).await;
    let body = json!({ "firstName": "Johnny", "lastName": "Doe", "email": "keep@example.com", "phone": "+1 555 0100" });
    let (status, updated) = send(&app, "PUT", "/api/v1/customers/1", Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["firstName"], "Johnny");
    assert_eq!(updated["phone"], "+1 555 0100");
    assert_eq!(updated["version"], 1);
}

#[tokio::test]
async fn test_missing_ids_are_not_found() {
    let app = test_app();
    assert_eq!(send(&app, "GET", "/api/v1/customers/9", None).await.0, StatusCode::NOT_FOUND);
    assert_eq!(send(&app, "PUT", "/api/v1/customers/9", Some(john("x@example.com"))).await.0, StatusCode::NOT_FOUND);
    assert_eq!(send(&app, "DELETE", "/api/v1/customers/9", None).await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bad_ids_are_bad_requests() {
    let app = test_app();
    let (status, err) = send(&app, "GET", "/api/v1/customers/0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["message"], "Customer id must be a positive number, got 0");

    let (status, err) = send(&app, "DELETE", "/api/v1/customers/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "Bad Request");
    assert_eq!(err["path"], "/api/v1/customers/abc");
}

#[tokio::test]
async fn test_missing_and_malformed_bodies() {
    let app = test_app();
    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/customers")
        .header("content-type", "application/json")
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let err: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(err["message"], "Customer request cannot be null");

    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/customers")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_ambient_endpoints() {
    let app = test_app();
    let (status, health) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "ok");

    let (status, doc) = send(&app, "GET", "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"].get("/api/v1/customers").is_some());

    send(&app, "POST", "/api/v1/customers", Some(john("m@example.com"))).await;
    let resp = app
        .clone()
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let text = resp.into_body().collect().await.unwrap().to_bytes();
    assert!(String::from_utf8_lossy(&text).contains("customer_service_customer_operations_total"));
}

#[tokio::test]
async fn test_organisation_endpoint() {
    let app = test_app();
    let (status, err) = send(&app, "GET", "/api/v1/organisation", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["path"], "/api/v1/organisation");

    let cfg = configs::parse(
        r#"
        [organisation]
        name = "Relatia"
        website = "https://relatia.example"
        [organisation.address]
        street = "1 Main St"
        city = "Springfield"
        state = "IL"
        zip = "62701"
        [organisation.contact]
        name = "Front Desk"
        email = "desk@relatia.example"
        "#,
    )
    .unwrap();
    let state = AppState::new(
        Arc::new(InMemoryCustomerRepository::new()),
        Arc::new(FallbackNotificationClient),
        cfg.organisation,
    );
    let app = build_app(state);
    let (status, org) = send(&app, "GET", "/api/v1/organisation", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(org["name"], "Relatia");
    assert_eq!(org["address"]["city"], "Springfield");
    assert!(org.get("social").is_none());
}

use axum::{
    middleware,
    response::IntoResponse,
    routing::{delete, get, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::{metrics::encode_metrics, types::Health};

use crate::errors::fill_error_path;
use crate::openapi::ApiDoc;
use crate::state::AppState;

pub mod customers;
pub mod notifications;
pub mod organisation;

pub const CUSTOMER_API: &str = "/api/v1/customers";

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn metrics() -> impl IntoResponse {
    encode_metrics()
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

fn customer_routes() -> Router<AppState> {
    Router::new()
        .route(CUSTOMER_API, get(customers::list).post(customers::create))
        .route(&format!("{CUSTOMER_API}/:id"), get(customers::get).put(customers::update).delete(customers::delete))
}

fn notification_routes() -> Router<AppState> {
    // `:id` is the customer id, same segment name as the customer routes
    let base = format!("{CUSTOMER_API}/:id/notifications");
    Router::new()
        .route(&base, get(notifications::list).post(notifications::send))
        .route(&format!("{base}/unread"), get(notifications::unread))
        .route(&format!("{base}/count"), get(notifications::count))
        .route(&format!("{base}/:notification_id/read"), put(notifications::mark_as_read))
        .route(&format!("{base}/:notification_id"), delete(notifications::delete))
}

/// Build the full application router: customers, notifications, organisation and ambient endpoints
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let ambient = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/api-docs/openapi.json", get(openapi_json));

    let api = customer_routes()
        .merge(notification_routes())
        .route("/api/v1/organisation", get(organisation::get));

    ambient
        .merge(api)
        .with_state(state)
        .layer(middleware::from_fn(fill_error_path))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // one INFO span per request with method and path
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // status code and latency
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx at ERROR
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}

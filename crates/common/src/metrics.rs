//! Prometheus metrics (default registry) shared by the service and server crates.

use axum::http::StatusCode;
use once_cell::sync::Lazy;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

/// Customer lifecycle operations, labelled by operation and outcome
/// (`ok`, `invalid_argument`, `not_found`, `conflict`, `validation_failed`, `unexpected`).
pub static CUSTOMER_OPERATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "customer_service_customer_operations_total",
        "Customer lifecycle operations by outcome",
        &["operation", "outcome"]
    )
    .expect("register customer_operations_total")
});

/// Notification client calls answered with a fallback payload, labelled by operation.
pub static NOTIFICATION_FALLBACKS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "customer_service_notification_fallbacks_total",
        "Notification calls answered by the fallback",
        &["operation"]
    )
    .expect("register notification_fallbacks_total")
});

pub fn record_customer_operation(operation: &str, outcome: &str) {
    CUSTOMER_OPERATIONS_TOTAL.with_label_values(&[operation, outcome]).inc();
}

pub fn record_notification_fallback(operation: &str) {
    NOTIFICATION_FALLBACKS_TOTAL.with_label_values(&[operation]).inc();
}

pub fn encode_metrics() -> (StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (StatusCode::OK, String::from_utf8(buffer).unwrap_or_default())
}

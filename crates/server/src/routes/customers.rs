use axum::{extract::State, http::StatusCode, Json};
use service::customer::{CustomerRequest, CustomerResponse};

use crate::errors::{ApiError, ApiJson, ApiPath};
use crate::state::AppState;

#[utoipa::path(
    get, path = "/api/v1/customers", tag = "customers",
    responses(
        (status = 200, description = "All live customers", body = [crate::openapi::CustomerResponseDoc]),
        (status = 500, description = "Unexpected error", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<CustomerResponse>>, ApiError> {
    Ok(Json(state.customers.list().await?))
}

#[utoipa::path(
    get, path = "/api/v1/customers/{id}", tag = "customers",
    params(("id" = i64, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Customer found", body = crate::openapi::CustomerResponseDoc),
        (status = 400, description = "Invalid id", body = crate::openapi::ErrorBodyDoc),
        (status = 404, description = "No such customer", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn get(State(state): State<AppState>, ApiPath(id): ApiPath<i64>) -> Result<Json<CustomerResponse>, ApiError> {
    Ok(Json(state.customers.get(id).await?))
}

#[utoipa::path(
    post, path = "/api/v1/customers", tag = "customers",
    request_body = crate::openapi::CustomerRequestDoc,
    responses(
        (status = 201, description = "Customer created", body = crate::openapi::CustomerResponseDoc),
        (status = 400, description = "Validation failed or email already exists", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CustomerRequest>,
) -> Result<(StatusCode, Json<CustomerResponse>), ApiError> {
    let created = state.customers.create(request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put, path = "/api/v1/customers/{id}", tag = "customers",
    params(("id" = i64, Path, description = "Customer id")),
    request_body = crate::openapi::CustomerRequestDoc,
    responses(
        (status = 200, description = "Customer updated", body = crate::openapi::CustomerResponseDoc),
        (status = 400, description = "Validation failed, invalid id, or email conflict", body = crate::openapi::ErrorBodyDoc),
        (status = 404, description = "No such customer", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<CustomerRequest>,
) -> Result<Json<CustomerResponse>, ApiError> {
    Ok(Json(state.customers.update(id, request).await?))
}

#[utoipa::path(
    delete, path = "/api/v1/customers/{id}", tag = "customers",
    params(("id" = i64, Path, description = "Customer id")),
    responses(
        (status = 204, description = "Customer deleted"),
        (status = 400, description = "Invalid id", body = crate::openapi::ErrorBodyDoc),
        (status = 404, description = "No such customer", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn delete(State(state): State<AppState>, ApiPath(id): ApiPath<i64>) -> Result<StatusCode, ApiError> {
    state.customers.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

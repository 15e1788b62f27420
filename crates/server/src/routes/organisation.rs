use axum::{extract::State, Json};
use configs::OrganisationInfo;

use crate::errors::ApiError;
use crate::messages;
use crate::state::AppState;

#[utoipa::path(
    get, path = "/api/v1/organisation", tag = "organisation",
    responses(
        (status = 200, description = "Organisation profile", body = crate::openapi::OrganisationDoc),
        (status = 404, description = "No organisation configured", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn get(State(state): State<AppState>) -> Result<Json<OrganisationInfo>, ApiError> {
    match state.organisation.as_deref() {
        Some(org) => Ok(Json(org.clone())),
        None => Err(ApiError::not_found(messages::resolve(messages::ORGANISATION_MISSING, &[]))),
    }
}

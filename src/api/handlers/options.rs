use axum::response::{IntoResponse, Json};

use crate::api::models::ValidateResponse;
use crate::domain::{option_catalog, validate, MatchDraft};

pub async fn get_options() -> impl IntoResponse {
    Json(option_catalog())
}

pub async fn validate_draft(Json(draft): Json<MatchDraft>) -> impl IntoResponse {
    Json(ValidateResponse::from(validate(&draft)))
}

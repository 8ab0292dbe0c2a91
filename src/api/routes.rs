use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::api::handlers::{
    form::{get_form, reset_form, set_field, submit_form},
    options::{get_options, validate_draft},
    AppState,
};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/options", get(get_options))
        .route("/api/validate", post(validate_draft))
        .route("/api/form", get(get_form))
        .route("/api/form/fields/:field", put(set_field))
        .route("/api/form/submit", post(submit_form))
        .route("/api/form/reset", post(reset_form))
        .with_state(state)
}

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use log::{error, info};
use std::sync::Arc;
use std::time::Duration;

use super::AppState;
use crate::api::models::{FieldRejected, SetFieldRequest, SubmitRejected};
use crate::domain::Field;
use crate::form::{dispatch, FormSnapshot, PendingSubmission, SubmitError};
use crate::prediction::{PredictionError, PredictionErrorKind};

pub async fn get_form(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let form = state.form.lock().await;
    Json(form.snapshot())
}

pub async fn set_field(
    State(state): State<Arc<AppState>>,
    Path(field): Path<String>,
    Json(request): Json<SetFieldRequest>,
) -> Response {
    let field: Field = match field.parse() {
        Ok(field) => field,
        Err(message) => return (StatusCode::NOT_FOUND, message).into_response(),
    };

    let mut form = state.form.lock().await;
    match form.set_field(field, request.value) {
        Ok(()) => Json(form.snapshot()).into_response(),
        Err(error) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(FieldRejected {
                error,
                form: form.snapshot(),
            }),
        )
            .into_response(),
    }
}

pub async fn reset_form(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut form = state.form.lock().await;
    form.reset();
    Json(form.snapshot())
}

/// Submit the current draft and wait for the prediction.
///
/// The form lock is released while the predictor works, so readers see the
/// form in `awaitingResult` and a second submit is refused with 409. The call
/// runs on its own task and settles the form even if this request is dropped.
pub async fn submit_form(State(state): State<Arc<AppState>>) -> Response {
    let (pending, timeout) = {
        let mut form = state.form.lock().await;
        match form.begin_submit() {
            Ok(pending) => (pending, form.timeout()),
            Err(error) => {
                let status = match error {
                    SubmitError::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
                    SubmitError::AlreadyPending => StatusCode::CONFLICT,
                    _ => StatusCode::GONE,
                };
                return rejected(status, error.to_string(), None, form.snapshot());
            }
        }
    };

    let id = pending.id;
    let (settled, snapshot) = match tokio::spawn(settle(state.clone(), pending, timeout)).await {
        Ok(settled) => settled,
        Err(e) => {
            error!("Submission #{} task failed: {:?}", id, e);
            let failure = PredictionError::unavailable("prediction task failed");
            let mut form = state.form.lock().await;
            form.complete(id, Err(failure.clone()));
            return rejected(
                StatusCode::INTERNAL_SERVER_ERROR,
                failure.to_string(),
                Some(failure),
                form.snapshot(),
            );
        }
    };

    match settled {
        Settled::Applied(None) => Json(snapshot).into_response(),
        Settled::Applied(Some(error)) => rejected(
            status_for(&error),
            SubmitError::Prediction(error.clone()).to_string(),
            Some(error),
            snapshot,
        ),
        Settled::TornDown => {
            rejected(StatusCode::GONE, SubmitError::TornDown.to_string(), None, snapshot)
        }
        Settled::Stale => rejected(
            StatusCode::CONFLICT,
            "form was reset while the prediction was running".to_string(),
            None,
            snapshot,
        ),
    }
}

/// How a dispatched submission left the form
enum Settled {
    Applied(Option<PredictionError>),
    TornDown,
    Stale,
}

async fn settle(
    state: Arc<AppState>,
    pending: PendingSubmission,
    timeout: Duration,
) -> (Settled, FormSnapshot) {
    let outcome = dispatch(state.predictor.as_ref(), &pending, timeout).await;

    let mut form = state.form.lock().await;
    let settled = match outcome {
        None => Settled::TornDown,
        Some(outcome) => {
            let failure = outcome.as_ref().err().cloned();
            if form.complete(pending.id, outcome) {
                Settled::Applied(failure)
            } else if form.is_torn_down() {
                Settled::TornDown
            } else {
                info!("Submission #{} finished after the form moved on", pending.id);
                Settled::Stale
            }
        }
    };
    (settled, form.snapshot())
}

fn status_for(error: &PredictionError) -> StatusCode {
    match error.kind {
        PredictionErrorKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
        PredictionErrorKind::Unavailable | PredictionErrorKind::Invalid => StatusCode::BAD_GATEWAY,
    }
}

fn rejected(
    status: StatusCode,
    message: String,
    prediction_error: Option<PredictionError>,
    form: FormSnapshot,
) -> Response {
    (
        status,
        Json(SubmitRejected {
            message,
            prediction_error,
            form,
        }),
    )
        .into_response()
}

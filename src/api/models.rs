use serde::{Deserialize, Serialize};

use crate::domain::{FieldErrors, MatchConfiguration, ValidationError};
use crate::form::{FieldValue, FormSnapshot};
use crate::prediction::PredictionError;

#[derive(Deserialize)]
pub struct SetFieldRequest {
    #[serde(default = "empty_value")]
    pub value: FieldValue,
}

fn empty_value() -> FieldValue {
    FieldValue::Empty
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration: Option<MatchConfiguration>,
    pub errors: FieldErrors,
}

impl From<Result<MatchConfiguration, FieldErrors>> for ValidateResponse {
    fn from(result: Result<MatchConfiguration, FieldErrors>) -> Self {
        match result {
            Ok(configuration) => Self {
                valid: true,
                configuration: Some(configuration),
                errors: FieldErrors::default(),
            },
            Err(errors) => Self {
                valid: false,
                configuration: None,
                errors,
            },
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRejected {
    pub error: ValidationError,
    pub form: FormSnapshot,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRejected {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prediction_error: Option<PredictionError>,
    pub form: FormSnapshot,
}

//! The model service that turns a validated match configuration into a
//! predicted score. The form only ever talks to it through [`Predictor`].

pub mod remote;

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

use crate::domain::{MatchConfiguration, PredictionResult};

pub use remote::HttpPredictor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PredictionErrorKind {
    /// No answer within the configured deadline
    Timeout,
    /// The service could not be reached or failed on its side
    Unavailable,
    /// The service answered with something that is not a usable prediction
    Invalid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[error("{kind:?}: {message}")]
pub struct PredictionError {
    pub kind: PredictionErrorKind,
    pub message: String,
}

impl PredictionError {
    pub fn timeout(after: Duration) -> Self {
        Self {
            kind: PredictionErrorKind::Timeout,
            message: format!("no prediction after {}s", after.as_secs_f64()),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: PredictionErrorKind::Unavailable,
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            kind: PredictionErrorKind::Invalid,
            message: message.into(),
        }
    }
}

/// Interface for score prediction services
#[async_trait]
pub trait Predictor: Send + Sync {
    async fn predict(
        &self,
        config: &MatchConfiguration,
    ) -> Result<PredictionResult, PredictionError>;

    /// Short name used in logs
    fn name(&self) -> &str;
}

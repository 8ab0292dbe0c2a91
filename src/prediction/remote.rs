use anyhow::Result;
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::StatusCode;
use std::time::Duration;

use super::{PredictionError, Predictor};
use crate::config::PredictionSettings;
use crate::domain::{MatchConfiguration, PredictionResult};
use crate::http::JsonClient;

/// Forwards configurations to a model service over HTTP.
///
/// The service receives the configuration as JSON in the request body and
/// answers with a prediction result in the same camelCase shape.
pub struct HttpPredictor {
    client: JsonClient,
    endpoint: String,
    timeout: Duration,
}

impl HttpPredictor {
    pub fn new(settings: &PredictionSettings) -> Result<Self> {
        let client = JsonClient::new(&settings.user_agent, settings.timeout_secs)?;
        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            timeout: settings.timeout(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn map_transport_error(&self, error: reqwest::Error) -> PredictionError {
        if error.is_timeout() {
            PredictionError::timeout(self.timeout)
        } else {
            PredictionError::unavailable(format!("{}: {}", self.endpoint, error))
        }
    }

    fn map_status(status: StatusCode) -> Option<PredictionError> {
        if status.is_success() {
            None
        } else if status.is_server_error() {
            Some(PredictionError::unavailable(format!("service answered {}", status)))
        } else {
            Some(PredictionError::invalid(format!("service rejected request: {}", status)))
        }
    }
}

#[async_trait]
impl Predictor for HttpPredictor {
    async fn predict(
        &self,
        config: &MatchConfiguration,
    ) -> Result<PredictionResult, PredictionError> {
        debug!("POST {} ({} vs {})", self.endpoint, config.batting_team, config.bowling_team);

        let response = self
            .client
            .post(&self.endpoint, config)
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if let Some(error) = Self::map_status(response.status()) {
            warn!("Prediction service error: {}", error);
            return Err(error);
        }

        let result: PredictionResult = response.json().await.map_err(|e| {
            if e.is_timeout() {
                PredictionError::timeout(self.timeout)
            } else {
                PredictionError::invalid(format!("undecodable prediction: {}", e))
            }
        })?;

        result.check().map_err(PredictionError::invalid)?;
        Ok(result)
    }

    fn name(&self) -> &str {
        "http"
    }
}

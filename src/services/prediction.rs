use anyhow::{Result, bail};
use log::info;

use super::validation::load_draft;
use crate::config::settings::AppConfig;
use crate::domain::PredictionResult;
use crate::form::{FormController, SubmitError};
use crate::prediction::{HttpPredictor, Predictor};

/// One-shot submission of a draft file, as the form would do it
pub struct PredictionService {
    config: AppConfig,
}

impl PredictionService {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub async fn run(&self, source: &str) -> Result<PredictionResult> {
        let predictor = HttpPredictor::new(&self.config.prediction)?;
        info!("Using prediction service at {}", predictor.endpoint());
        self.run_with(source, &predictor).await
    }

    pub async fn run_with<P: Predictor + ?Sized>(
        &self,
        source: &str,
        predictor: &P,
    ) -> Result<PredictionResult> {
        let draft = load_draft(source)?;
        let mut form = FormController::with_draft(self.config.prediction.timeout(), draft);

        match form.submit(predictor).await {
            Ok(result) => Ok(result),
            Err(SubmitError::Rejected(errors)) => bail!("Draft is not submittable: {}", errors),
            Err(e) => Err(e.into()),
        }
    }
}

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::AppConfig;
use crate::form::FormController;
use crate::prediction::Predictor;

pub mod form;
pub mod options;

pub struct AppState {
    pub form: Mutex<FormController>,
    pub predictor: Arc<dyn Predictor>,
}

impl AppState {
    pub fn new(config: &AppConfig, predictor: Arc<dyn Predictor>) -> Self {
        let form = FormController::new(config.prediction.timeout());
        Self {
            form: Mutex::new(form),
            predictor,
        }
    }
}

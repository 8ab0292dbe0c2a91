pub mod settings;

pub use settings::{AppConfig, PredictionSettings, ServerSettings};

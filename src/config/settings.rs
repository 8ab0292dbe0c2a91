use log::warn;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct PredictionSettings {
    pub endpoint: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for PredictionSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8000/predict".to_string(),
            timeout_secs: 10,
            user_agent: "IplScorePredictor/0.1".to_string(),
        }
    }
}

impl PredictionSettings {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            endpoint: std::env::var("PREDICTION_ENDPOINT").unwrap_or(defaults.endpoint),
            timeout_secs: env_or("PREDICTION_TIMEOUT_SECS", defaults.timeout_secs, |secs| {
                *secs > 0
            }),
            user_agent: std::env::var("PREDICTION_USER_AGENT").unwrap_or(defaults.user_agent),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { port: 3000 }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub prediction: PredictionSettings,
    pub server: ServerSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            prediction: PredictionSettings::default(),
            server: ServerSettings::default(),
        }
    }
}

impl AppConfig {
    /// Defaults overridden by whatever the environment sets
    pub fn new() -> Self {
        Self {
            prediction: PredictionSettings::from_env(),
            server: ServerSettings::default(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.server.port = port;
        self
    }
}

fn env_or<T, F>(key: &str, default: T, accept: F) -> T
where
    T: FromStr + std::fmt::Display,
    F: Fn(&T) -> bool,
{
    match std::env::var(key) {
        Ok(raw) => parse_or(key, &raw, default, accept),
        Err(_) => default,
    }
}

/// Parse an override, keeping `default` when it is malformed or not accepted
fn parse_or<T, F>(key: &str, raw: &str, default: T, accept: F) -> T
where
    T: FromStr + std::fmt::Display,
    F: Fn(&T) -> bool,
{
    match raw.trim().parse::<T>() {
        Ok(value) if accept(&value) => value,
        _ => {
            warn!("Ignoring {}={:?}, using {}", key, raw, default);
            default
        }
    }
}

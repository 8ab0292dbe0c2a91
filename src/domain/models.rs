use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::vocabulary::{DayNight, MatchType, Team, TossDecision, Venue, Weather};

pub const DEFAULT_INNINGS: f64 = 1.0;
pub const DEFAULT_OVERS: f64 = 20.0;
pub const DEFAULT_WICKETS: f64 = 3.0;

pub const MIN_OVERS: f64 = 5.0;
pub const MAX_OVERS: f64 = 20.0;
pub const OVERS_STEP: f64 = 0.1;
pub const MIN_WICKETS: f64 = 0.0;
pub const MAX_WICKETS: f64 = 10.0;

/// Snap an overs value to the nearest step, so 12.300000000000001 reads 12.3
pub fn round_overs(overs: f64) -> f64 {
    let steps_per_over = (1.0 / OVERS_STEP).round();
    (overs * steps_per_over).round() / steps_per_over
}

/// Match parameters as they currently sit in the form.
///
/// Nothing here is trusted: select values are raw strings and sliders are raw
/// numbers. `validate` turns a draft into a [`MatchConfiguration`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchDraft {
    pub batting_team: Option<String>,
    pub bowling_team: Option<String>,
    pub venue: Option<String>,
    pub innings: Option<f64>,
    pub weather: Option<String>,
    pub day_night: Option<String>,
    pub match_type: Option<String>,
    pub toss_winner: Option<String>,
    pub toss_decision: Option<String>,
    pub overs: Option<f64>,
    pub wickets: Option<f64>,
}

impl Default for MatchDraft {
    fn default() -> Self {
        Self {
            batting_team: None,
            bowling_team: None,
            venue: None,
            innings: Some(DEFAULT_INNINGS),
            weather: Some(Weather::Clear.to_string()),
            day_night: Some(DayNight::Night.to_string()),
            match_type: Some(MatchType::League.to_string()),
            toss_winner: None,
            toss_decision: Some(TossDecision::Bat.to_string()),
            overs: Some(DEFAULT_OVERS),
            wickets: Some(DEFAULT_WICKETS),
        }
    }
}

/// A fully validated set of match parameters, ready for the predictor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchConfiguration {
    pub batting_team: Team,
    pub bowling_team: Team,
    pub venue: Venue,
    pub innings: u8,
    pub weather: Weather,
    pub day_night: DayNight,
    pub match_type: MatchType,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub toss_winner: Option<Team>,
    pub toss_decision: TossDecision,
    pub overs: f64,
    pub wickets: u8,
}

impl MatchConfiguration {
    /// Whether the side batting now also won the toss
    pub fn toss_advantage(&self) -> bool {
        self.toss_winner == Some(self.batting_team)
    }
}

impl From<&MatchConfiguration> for MatchDraft {
    fn from(config: &MatchConfiguration) -> Self {
        Self {
            batting_team: Some(config.batting_team.to_string()),
            bowling_team: Some(config.bowling_team.to_string()),
            venue: Some(config.venue.to_string()),
            innings: Some(f64::from(config.innings)),
            weather: Some(config.weather.to_string()),
            day_night: Some(config.day_night.to_string()),
            match_type: Some(config.match_type.to_string()),
            toss_winner: config.toss_winner.map(|team| team.to_string()),
            toss_decision: Some(config.toss_decision.to_string()),
            overs: Some(config.overs),
            wickets: Some(f64::from(config.wickets)),
        }
    }
}

/// Situational factors the model reports alongside its score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchFactors {
    pub team_strength_diff: f64,
    pub venue_advantage: f64,
    pub weather_impact: f64,
    pub toss_advantage: bool,
}

/// Prediction returned by the model service. Read-only for this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub predicted_score: f64,
    pub confidence: f64,
    pub feature_importance: BTreeMap<String, f64>,
    pub match_factors: MatchFactors,
}

impl PredictionResult {
    /// Check the shape constraints a result must satisfy before it is shown
    pub fn check(&self) -> Result<(), String> {
        if !self.predicted_score.is_finite() {
            return Err("predictedScore must be a finite number".to_string());
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(format!(
                "confidence must be between 0 and 1, got {}",
                self.confidence
            ));
        }
        if let Some((name, _)) = self
            .feature_importance
            .iter()
            .find(|(_, weight)| !weight.is_finite())
        {
            return Err(format!("featureImportance.{} must be a finite number", name));
        }

        let factors = &self.match_factors;
        let finite = [
            factors.team_strength_diff,
            factors.venue_advantage,
            factors.weather_impact,
        ]
        .iter()
        .all(|value| value.is_finite());
        if !finite {
            return Err("matchFactors must be finite numbers".to_string());
        }
        Ok(())
    }
}

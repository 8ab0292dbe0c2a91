use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;

use ipl_score_predictor::config::AppConfig;
use ipl_score_predictor::domain::{
    validate, Field, MatchConfiguration, MatchDraft, MatchFactors, PredictionResult, Team,
};
use ipl_score_predictor::form::{FieldValue, FormController, FormPhase, ResultPanel};
use ipl_score_predictor::prediction::{PredictionError, Predictor};
use ipl_score_predictor::services::PredictionService;

/// Records what it was asked and answers with a fixed score
#[derive(Default)]
struct RecordingPredictor {
    seen: Mutex<Vec<MatchConfiguration>>,
}

#[async_trait]
impl Predictor for RecordingPredictor {
    async fn predict(
        &self,
        config: &MatchConfiguration,
    ) -> Result<PredictionResult, PredictionError> {
        self.seen.lock().unwrap().push(config.clone());
        Ok(PredictionResult {
            predicted_score: 175.0,
            confidence: 0.8,
            feature_importance: BTreeMap::from([("venue".to_string(), 0.2)]),
            match_factors: MatchFactors {
                team_strength_diff: 0.0,
                venue_advantage: 0.0,
                weather_impact: 0.0,
                toss_advantage: config.toss_advantage(),
            },
        })
    }

    fn name(&self) -> &str {
        "recording"
    }
}

fn reference_draft() -> MatchDraft {
    serde_json::from_value(serde_json::json!({
        "battingTeam": "Mumbai Indians",
        "bowlingTeam": "Chennai Super Kings",
        "venue": "Wankhede Stadium",
        "innings": 1,
        "weather": "Clear",
        "dayNight": "Night",
        "matchType": "League",
        "tossWinner": "Mumbai Indians",
        "tossDecision": "Bat",
        "overs": 20,
        "wickets": 3
    }))
    .unwrap()
}

#[test]
fn test_reference_configuration_end_to_end() {
    let draft = reference_draft();
    assert!(validate(&draft).is_ok());

    let form = FormController::with_draft(AppConfig::default().prediction.timeout(), draft);
    assert!(form.field_errors().is_empty());
    assert!(form.can_submit());
}

#[test]
fn test_can_submit_false_whenever_teams_match() {
    for team in [Team::MumbaiIndians, Team::KolkataKnightRiders, Team::LucknowSuperGiants] {
        let mut draft = reference_draft();
        draft.batting_team = Some(team.to_string());
        draft.bowling_team = Some(team.to_string());
        draft.toss_winner = None;

        let form = FormController::with_draft(AppConfig::default().prediction.timeout(), draft);
        assert!(!form.can_submit(), "{} vs itself must not submit", team);
    }
}

#[tokio::test]
async fn test_full_session() {
    let predictor = RecordingPredictor::default();
    let mut form = FormController::default();

    form.set_field(Field::BattingTeam, Team::RoyalChallengersBangalore.into()).unwrap();
    form.set_field(Field::BowlingTeam, Team::SunrisersHyderabad.into()).unwrap();
    form.set_field(Field::Venue, "M. Chinnaswamy Stadium".into()).unwrap();
    form.set_field(Field::Innings, FieldValue::Number(2.0)).unwrap();
    form.set_field(Field::Weather, "Humid".into()).unwrap();
    form.set_field(Field::DayNight, "Day-Night".into()).unwrap();
    form.set_field(Field::MatchType, "Final".into()).unwrap();
    form.set_field(Field::TossWinner, Team::SunrisersHyderabad.into()).unwrap();
    form.set_field(Field::TossDecision, "Bowl".into()).unwrap();
    form.set_field(Field::Overs, "16.2".into()).unwrap();
    form.set_field(Field::Wickets, FieldValue::Number(5.0)).unwrap();
    assert!(form.can_submit());

    let result = form.submit(&predictor).await.unwrap();
    assert!(!result.match_factors.toss_advantage);

    let seen = predictor.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].innings, 2);
    assert_eq!(seen[0].overs, 16.2);
    assert_eq!(seen[0].toss_winner, Some(Team::SunrisersHyderabad));

    assert_eq!(form.phase(), &FormPhase::Editing);
    assert_eq!(form.draft(), &MatchDraft::default());
    assert!(matches!(form.result_panel(), ResultPanel::Result(_)));
}

#[tokio::test]
async fn test_prediction_service_submits_draft_file() {
    let path = std::env::temp_dir().join("ipl_score_predictor_service_draft.json");
    std::fs::write(&path, serde_json::to_string(&reference_draft()).unwrap()).unwrap();
    let source = path.to_string_lossy().into_owned();

    let predictor = RecordingPredictor::default();
    let service = PredictionService::new(AppConfig::default());
    let result = service.run_with(&source, &predictor).await.unwrap();

    assert_eq!(result.predicted_score, 175.0);
    assert!(result.match_factors.toss_advantage);
    std::fs::remove_file(path).unwrap();
}

#[tokio::test]
async fn test_prediction_service_refuses_invalid_draft() {
    let path = std::env::temp_dir().join("ipl_score_predictor_service_bad_draft.json");
    std::fs::write(&path, r#"{"battingTeam": "Gujarat Titans"}"#).unwrap();
    let source = path.to_string_lossy().into_owned();

    let predictor = RecordingPredictor::default();
    let service = PredictionService::new(AppConfig::default());
    let error = service.run_with(&source, &predictor).await.unwrap_err();

    assert!(error.to_string().contains("not submittable"));
    assert!(predictor.seen.lock().unwrap().is_empty());
    std::fs::remove_file(path).unwrap();
}

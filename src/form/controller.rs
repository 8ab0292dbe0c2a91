use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use super::snapshot::{DisplayHints, FormSnapshot, ResultPanel};
use super::teardown::{Teardown, TeardownToken};
use crate::config::PredictionSettings;
use crate::domain::{
    validate, Field, FieldErrors, MatchConfiguration, MatchDraft, PredictionResult, Rule, Team,
    ValidationError, Vocabulary,
};
use crate::prediction::{PredictionError, Predictor};

/// A value coming from a form control
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Empty,
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<Team> for FieldValue {
    fn from(team: Team) -> Self {
        FieldValue::Text(team.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum FormPhase {
    Editing,
    #[serde(rename_all = "camelCase")]
    AwaitingResult {
        submission: u64,
        since: DateTime<Utc>,
    },
}

/// Ticket for the one prediction allowed in flight
#[derive(Debug, Clone)]
pub struct PendingSubmission {
    pub id: u64,
    pub config: MatchConfiguration,
    pub token: TeardownToken,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmitError {
    #[error("form has invalid fields: {0}")]
    Rejected(FieldErrors),
    #[error("a prediction is already in flight")]
    AlreadyPending,
    #[error("form was torn down")]
    TornDown,
    #[error("prediction failed: {0}")]
    Prediction(PredictionError),
}

/// Owns the live match draft and drives it through validation and submission.
///
/// Only the canonical field values are stored. Option lists, errors and the
/// submit gate are recomputed from them on every read.
pub struct FormController {
    draft: MatchDraft,
    phase: FormPhase,
    last_result: Option<PredictionResult>,
    banner: Option<PredictionError>,
    next_submission: u64,
    timeout: Duration,
    teardown: Teardown,
}

impl Default for FormController {
    fn default() -> Self {
        Self::new(PredictionSettings::default().timeout())
    }
}

impl Drop for FormController {
    fn drop(&mut self) {
        self.teardown.trigger();
    }
}

impl FormController {
    pub fn new(timeout: Duration) -> Self {
        Self {
            draft: MatchDraft::default(),
            phase: FormPhase::Editing,
            last_result: None,
            banner: None,
            next_submission: 1,
            timeout,
            teardown: Teardown::new(),
        }
    }

    /// Start from an existing draft instead of the defaults
    pub fn with_draft(timeout: Duration, draft: MatchDraft) -> Self {
        let mut controller = Self::new(timeout);
        controller.draft = draft;
        controller
    }

    pub fn draft(&self) -> &MatchDraft {
        &self.draft
    }

    pub fn phase(&self) -> &FormPhase {
        &self.phase
    }

    pub fn is_awaiting_result(&self) -> bool {
        matches!(self.phase, FormPhase::AwaitingResult { .. })
    }

    pub fn last_result(&self) -> Option<&PredictionResult> {
        self.last_result.as_ref()
    }

    pub fn banner(&self) -> Option<&PredictionError> {
        self.banner.as_ref()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Shared handle for tearing the form down from elsewhere
    pub fn teardown_handle(&self) -> Teardown {
        self.teardown.clone()
    }

    pub fn teardown(&mut self) {
        debug!("Form torn down");
        self.teardown.trigger();
    }

    pub fn is_torn_down(&self) -> bool {
        self.teardown.is_triggered()
    }

    /// Update one field and re-derive whatever depends on it.
    ///
    /// Numeric text that does not parse is rejected and the field keeps its
    /// value. Everything else is stored as given and judged by `validate`.
    pub fn set_field(&mut self, field: Field, value: FieldValue) -> Result<(), ValidationError> {
        self.apply(field, value)?;
        self.banner = None;

        match field {
            Field::BattingTeam => {
                self.drop_bowling_team_if_taken();
                self.drop_stale_toss_winner();
            }
            Field::BowlingTeam => self.drop_stale_toss_winner(),
            _ => {}
        }

        if let Some(error) = self.field_error(field) {
            debug!("{} now invalid: {}", field, error.message);
        }
        Ok(())
    }

    pub fn field_errors(&self) -> FieldErrors {
        validate(&self.draft).err().unwrap_or_default()
    }

    pub fn field_error(&self, field: Field) -> Option<ValidationError> {
        self.field_errors().get(field).cloned()
    }

    /// All teams except the one currently batting
    pub fn derived_bowling_options(&self) -> impl Iterator<Item = Team> + '_ {
        let batting = self.batting_team();
        Team::ALL
            .iter()
            .copied()
            .filter(move |team| Some(*team) != batting)
    }

    /// The selected batting and bowling teams, whichever are set
    pub fn derived_toss_winner_options(&self) -> impl Iterator<Item = Team> + '_ {
        let batting = self.batting_team();
        let bowling = self.bowling_team().filter(|team| Some(*team) != batting);
        batting.into_iter().chain(bowling)
    }

    pub fn can_submit(&self) -> bool {
        !self.is_awaiting_result() && !self.is_torn_down() && validate(&self.draft).is_ok()
    }

    /// Validate and move to `AwaitingResult`, handing out the request ticket.
    pub fn begin_submit(&mut self) -> Result<PendingSubmission, SubmitError> {
        if self.is_torn_down() {
            return Err(SubmitError::TornDown);
        }
        if self.is_awaiting_result() {
            return Err(SubmitError::AlreadyPending);
        }

        debug!("Validating draft");
        let config = validate(&self.draft).map_err(|errors| {
            debug!("Submission blocked by {} field error(s)", errors.len());
            SubmitError::Rejected(errors)
        })?;

        let id = self.next_submission;
        self.next_submission += 1;

        debug!("Submitting #{}", id);
        self.banner = None;
        self.phase = FormPhase::AwaitingResult {
            submission: id,
            since: Utc::now(),
        };
        info!(
            "Prediction #{} requested: {} vs {} at {}",
            id, config.batting_team, config.bowling_team, config.venue
        );

        Ok(PendingSubmission {
            id,
            config,
            token: self.teardown.token(),
        })
    }

    /// Finish submission `id`. Returns false when the outcome was dropped
    /// because the form moved on or was torn down.
    pub fn complete(
        &mut self,
        id: u64,
        outcome: Result<PredictionResult, PredictionError>,
    ) -> bool {
        if self.is_torn_down() {
            debug!("Dropping outcome of #{}: form torn down", id);
            return false;
        }
        match self.phase {
            FormPhase::AwaitingResult { submission, .. } if submission == id => {}
            _ => {
                debug!("Dropping stale outcome of #{}", id);
                return false;
            }
        }

        match outcome {
            Ok(result) => {
                info!(
                    "Prediction #{}: {:.0} runs (confidence {:.0}%)",
                    id,
                    result.predicted_score,
                    result.confidence * 100.0
                );
                self.last_result = Some(result);
                self.draft = MatchDraft::default();
            }
            Err(error) => {
                warn!("Prediction #{} failed: {}", id, error);
                self.banner = Some(error);
            }
        }
        self.phase = FormPhase::Editing;
        true
    }

    /// Validate, call the predictor and apply the outcome
    pub async fn submit<P: Predictor + ?Sized>(
        &mut self,
        predictor: &P,
    ) -> Result<PredictionResult, SubmitError> {
        let pending = self.begin_submit()?;
        let outcome = dispatch(predictor, &pending, self.timeout)
            .await
            .ok_or(SubmitError::TornDown)?;

        self.complete(pending.id, outcome.clone());
        outcome.map_err(SubmitError::Prediction)
    }

    /// Throw the draft away, as when the user navigates off the page
    pub fn reset(&mut self) {
        if let FormPhase::AwaitingResult { submission, .. } = self.phase {
            debug!("Abandoning #{}", submission);
        }
        self.draft = MatchDraft::default();
        self.phase = FormPhase::Editing;
        self.last_result = None;
        self.banner = None;
    }

    pub fn result_panel(&self) -> ResultPanel {
        match (&self.phase, &self.last_result) {
            (FormPhase::AwaitingResult { .. }, _) => ResultPanel::Loading,
            (FormPhase::Editing, Some(result)) => ResultPanel::Result(result.clone()),
            (FormPhase::Editing, None) => ResultPanel::Ready,
        }
    }

    pub fn snapshot(&self) -> FormSnapshot {
        FormSnapshot {
            draft: self.draft.clone(),
            errors: self.field_errors(),
            bowling_options: self.derived_bowling_options().collect(),
            toss_winner_options: self.derived_toss_winner_options().collect(),
            phase: self.phase.clone(),
            can_submit: self.can_submit(),
            panel: self.result_panel(),
            banner: self.banner.clone(),
            hints: DisplayHints::for_draft(&self.draft),
        }
    }

    fn batting_team(&self) -> Option<Team> {
        self.draft.batting_team.as_deref().and_then(Team::parse)
    }

    fn bowling_team(&self) -> Option<Team> {
        self.draft.bowling_team.as_deref().and_then(Team::parse)
    }

    fn drop_bowling_team_if_taken(&mut self) {
        if self.batting_team().is_some() && self.batting_team() == self.bowling_team() {
            debug!("Clearing bowlingTeam: now batting");
            self.draft.bowling_team = None;
        }
    }

    fn drop_stale_toss_winner(&mut self) {
        let Some(winner) = self.draft.toss_winner.as_deref() else {
            return;
        };
        let still_playing = self
            .derived_toss_winner_options()
            .any(|team| team.as_str() == winner.trim());
        if !still_playing {
            debug!("Clearing tossWinner: {} no longer playing", winner);
            self.draft.toss_winner = None;
        }
    }

    fn apply(&mut self, field: Field, value: FieldValue) -> Result<(), ValidationError> {
        if field.is_numeric() {
            let number = to_number(field, value)?;
            if let Some(slot) = number_slot(&mut self.draft, field) {
                *slot = number;
            }
        } else if let Some(slot) = text_slot(&mut self.draft, field) {
            *slot = to_text(value);
        }
        Ok(())
    }
}

/// Run the prediction for `pending`, bounded by `timeout` and by teardown.
///
/// Returns `None` when the form was torn down before the predictor answered.
pub async fn dispatch<P: Predictor + ?Sized>(
    predictor: &P,
    pending: &PendingSubmission,
    timeout: Duration,
) -> Option<Result<PredictionResult, PredictionError>> {
    debug!("Dispatching #{} to {} predictor", pending.id, predictor.name());
    let call = tokio::time::timeout(timeout, predictor.predict(&pending.config));

    tokio::select! {
        _ = pending.token.cancelled() => {
            debug!("#{} cancelled by teardown", pending.id);
            None
        }
        outcome = call => Some(outcome.unwrap_or_else(|_| Err(PredictionError::timeout(timeout)))),
    }
}

fn to_number(field: Field, value: FieldValue) -> Result<Option<f64>, ValidationError> {
    match value {
        FieldValue::Number(number) => Ok(Some(number)),
        FieldValue::Text(text) if text.trim().is_empty() => Ok(None),
        FieldValue::Text(text) => text.trim().parse::<f64>().map(Some).map_err(|_| {
            ValidationError::new(field, Rule::NotANumber, format!("{} must be a number", field))
        }),
        FieldValue::Empty => Ok(None),
    }
}

fn to_text(value: FieldValue) -> Option<String> {
    match value {
        FieldValue::Text(text) if text.trim().is_empty() => None,
        FieldValue::Text(text) => Some(text),
        FieldValue::Number(number) => Some(number.to_string()),
        FieldValue::Empty => None,
    }
}

fn number_slot(draft: &mut MatchDraft, field: Field) -> Option<&mut Option<f64>> {
    match field {
        Field::Innings => Some(&mut draft.innings),
        Field::Overs => Some(&mut draft.overs),
        Field::Wickets => Some(&mut draft.wickets),
        _ => None,
    }
}

fn text_slot(draft: &mut MatchDraft, field: Field) -> Option<&mut Option<String>> {
    match field {
        Field::BattingTeam => Some(&mut draft.batting_team),
        Field::BowlingTeam => Some(&mut draft.bowling_team),
        Field::Venue => Some(&mut draft.venue),
        Field::Weather => Some(&mut draft.weather),
        Field::DayNight => Some(&mut draft.day_night),
        Field::MatchType => Some(&mut draft.match_type),
        Field::TossWinner => Some(&mut draft.toss_winner),
        Field::TossDecision => Some(&mut draft.toss_decision),
        _ => None,
    }
}

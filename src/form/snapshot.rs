use serde::Serialize;

use super::controller::FormPhase;
use crate::domain::{round_overs, FieldErrors, MatchDraft, PredictionResult, Team, MAX_OVERS};
use crate::prediction::PredictionError;

/// Badge colour for the wickets slider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    Default, // 0-3 down
    Warning, // 4-6 down
    Danger,  // 7+ down
}

impl Severity {
    pub fn for_wickets(wickets: f64) -> Self {
        if wickets >= 7.0 {
            Severity::Danger
        } else if wickets >= 4.0 {
            Severity::Warning
        } else {
            Severity::Default
        }
    }
}

pub fn overs_badge(overs: f64) -> String {
    let overs = round_overs(overs);
    if overs == MAX_OVERS {
        "Full Match".to_string()
    } else {
        format!("{} overs", overs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayHints {
    pub overs_badge: Option<String>,
    pub wickets_severity: Option<Severity>,
}

impl DisplayHints {
    pub fn for_draft(draft: &MatchDraft) -> Self {
        Self {
            overs_badge: draft.overs.map(overs_badge),
            wickets_severity: draft.wickets.map(Severity::for_wickets),
        }
    }
}

/// What the result side of the page should show
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "result", rename_all = "camelCase")]
pub enum ResultPanel {
    Ready,
    Loading,
    Result(PredictionResult),
}

/// Everything a renderer needs to draw the form and the result panel
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSnapshot {
    pub draft: MatchDraft,
    pub errors: FieldErrors,
    pub bowling_options: Vec<Team>,
    pub toss_winner_options: Vec<Team>,
    pub phase: FormPhase,
    pub can_submit: bool,
    pub panel: ResultPanel,
    pub banner: Option<PredictionError>,
    pub hints: DisplayHints,
}

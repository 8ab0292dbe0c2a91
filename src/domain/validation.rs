use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::models::{
    round_overs, MatchConfiguration, MatchDraft, MAX_OVERS, MAX_WICKETS, MIN_OVERS, MIN_WICKETS,
    OVERS_STEP,
};
use super::vocabulary::{DayNight, MatchType, Team, TossDecision, Venue, Vocabulary, Weather};

const STEP_TOLERANCE: f64 = 1e-6;

/// Form fields, named as they appear on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    BattingTeam,
    BowlingTeam,
    Venue,
    Innings,
    Weather,
    DayNight,
    MatchType,
    TossWinner,
    TossDecision,
    Overs,
    Wickets,
}

impl Field {
    pub const ALL: [Field; 11] = [
        Field::BattingTeam,
        Field::BowlingTeam,
        Field::Venue,
        Field::Innings,
        Field::Weather,
        Field::DayNight,
        Field::MatchType,
        Field::TossWinner,
        Field::TossDecision,
        Field::Overs,
        Field::Wickets,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::BattingTeam => "battingTeam",
            Field::BowlingTeam => "bowlingTeam",
            Field::Venue => "venue",
            Field::Innings => "innings",
            Field::Weather => "weather",
            Field::DayNight => "dayNight",
            Field::MatchType => "matchType",
            Field::TossWinner => "tossWinner",
            Field::TossDecision => "tossDecision",
            Field::Overs => "overs",
            Field::Wickets => "wickets",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Field::Innings | Field::Overs | Field::Wickets)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| format!("unknown field: {}", s))
    }
}

/// The rule a field broke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Rule {
    Required,
    UnknownOption,
    NotANumber,
    NotAnInteger,
    OutOfRange,
    Step,
    TeamsMustDiffer,
    TossWinnerNotPlaying,
}

#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub field: Field,
    pub rule: Rule,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: Field, rule: Rule, message: impl Into<String>) -> Self {
        Self {
            field,
            rule,
            message: message.into(),
        }
    }
}

/// At most one error per field, in field order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(Vec<ValidationError>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: Field) -> Option<&ValidationError> {
        self.0.iter().find(|error| error.field == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    fn push(&mut self, error: ValidationError) {
        if self.get(error.field).is_none() {
            self.0.push(error);
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|e| e.message.as_str()).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for FieldErrors {}

impl IntoIterator for FieldErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Validate a draft and build the typed configuration from it.
///
/// Every field is checked independently so the caller gets the full picture in
/// one pass. Cross-field rules only run once the fields they compare are valid.
pub fn validate(draft: &MatchDraft) -> Result<MatchConfiguration, FieldErrors> {
    let mut errors = FieldErrors::default();

    let batting_team = record(
        &mut errors,
        required_option::<Team>(Field::BattingTeam, &draft.batting_team),
    );
    let bowling_team = record(
        &mut errors,
        required_option::<Team>(Field::BowlingTeam, &draft.bowling_team),
    );
    let venue = record(&mut errors, required_option::<Venue>(Field::Venue, &draft.venue));
    let weather = record(&mut errors, required_option::<Weather>(Field::Weather, &draft.weather));
    let day_night = record(
        &mut errors,
        required_option::<DayNight>(Field::DayNight, &draft.day_night),
    );
    let match_type = record(
        &mut errors,
        required_option::<MatchType>(Field::MatchType, &draft.match_type),
    );
    let toss_decision = record(
        &mut errors,
        required_option::<TossDecision>(Field::TossDecision, &draft.toss_decision),
    );
    let toss_winner = record(
        &mut errors,
        optional_option::<Team>(Field::TossWinner, &draft.toss_winner),
    );

    let innings = record(&mut errors, check_innings(draft.innings));
    let overs = record(&mut errors, check_overs(draft.overs));
    let wickets = record(&mut errors, check_wickets(draft.wickets));

    if let (Some(batting), Some(bowling)) = (batting_team, bowling_team) {
        if batting == bowling {
            errors.push(ValidationError::new(
                Field::BowlingTeam,
                Rule::TeamsMustDiffer,
                "bowlingTeam must differ from battingTeam",
            ));
        }
    }

    if let (Some(Some(winner)), Some(batting), Some(bowling)) =
        (toss_winner, batting_team, bowling_team)
    {
        if winner != batting && winner != bowling {
            errors.push(ValidationError::new(
                Field::TossWinner,
                Rule::TossWinnerNotPlaying,
                format!("tossWinner must be either {} or {}", batting, bowling),
            ));
        }
    }

    if !errors.is_empty() {
        errors.0.sort_by_key(|error| error.field);
        return Err(errors);
    }

    match (
        batting_team,
        bowling_team,
        venue,
        innings,
        weather,
        day_night,
        match_type,
        toss_winner,
        toss_decision,
        overs,
        wickets,
    ) {
        (
            Some(batting_team),
            Some(bowling_team),
            Some(venue),
            Some(innings),
            Some(weather),
            Some(day_night),
            Some(match_type),
            Some(toss_winner),
            Some(toss_decision),
            Some(overs),
            Some(wickets),
        ) => Ok(MatchConfiguration {
            batting_team,
            bowling_team,
            venue,
            innings,
            weather,
            day_night,
            match_type,
            toss_winner,
            toss_decision,
            overs,
            wickets,
        }),
        _ => Err(errors),
    }
}

fn record<T>(errors: &mut FieldErrors, checked: Result<T, ValidationError>) -> Option<T> {
    match checked {
        Ok(value) => Some(value),
        Err(error) => {
            errors.push(error);
            None
        }
    }
}

fn required_option<V: Vocabulary>(
    field: Field,
    raw: &Option<String>,
) -> Result<V, ValidationError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Err(ValidationError::new(
            field,
            Rule::Required,
            format!("{} is required", field),
        )),
        Some(value) => parse_option(field, value),
    }
}

fn optional_option<V: Vocabulary>(
    field: Field,
    raw: &Option<String>,
) -> Result<Option<V>, ValidationError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_option(field, value).map(Some),
    }
}

fn parse_option<V: Vocabulary>(field: Field, value: &str) -> Result<V, ValidationError> {
    V::parse(value).ok_or_else(|| {
        ValidationError::new(
            field,
            Rule::UnknownOption,
            format!("{} must be one of: {}", field, V::names().join(", ")),
        )
    })
}

fn required_number(field: Field, raw: Option<f64>) -> Result<f64, ValidationError> {
    match raw {
        None => Err(ValidationError::new(
            field,
            Rule::Required,
            format!("{} is required", field),
        )),
        Some(value) if !value.is_finite() => Err(ValidationError::new(
            field,
            Rule::NotANumber,
            format!("{} must be a number", field),
        )),
        Some(value) => Ok(value),
    }
}

fn within(field: Field, value: f64, min: f64, max: f64) -> Result<f64, ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::new(
            field,
            Rule::OutOfRange,
            format!("{} must be between {} and {}", field, min, max),
        ));
    }
    Ok(value)
}

fn whole(field: Field, value: f64) -> Result<u8, ValidationError> {
    if value.fract() != 0.0 {
        return Err(ValidationError::new(
            field,
            Rule::NotAnInteger,
            format!("{} must be a whole number", field),
        ));
    }
    Ok(value as u8)
}

fn check_innings(raw: Option<f64>) -> Result<u8, ValidationError> {
    let value = required_number(Field::Innings, raw)?;
    if value.fract() != 0.0 {
        return Err(ValidationError::new(
            Field::Innings,
            Rule::NotAnInteger,
            "innings must be 1 or 2",
        ));
    }
    if value != 1.0 && value != 2.0 {
        return Err(ValidationError::new(
            Field::Innings,
            Rule::OutOfRange,
            "innings must be 1 or 2",
        ));
    }
    Ok(value as u8)
}

fn check_overs(raw: Option<f64>) -> Result<f64, ValidationError> {
    let value = required_number(Field::Overs, raw)?;
    let value = within(Field::Overs, value, MIN_OVERS, MAX_OVERS)?;

    let tenths = value / OVERS_STEP;
    if (tenths - tenths.round()).abs() > STEP_TOLERANCE {
        return Err(ValidationError::new(
            Field::Overs,
            Rule::Step,
            format!("overs must be in steps of {}", OVERS_STEP),
        ));
    }
    Ok(round_overs(value))
}

fn check_wickets(raw: Option<f64>) -> Result<u8, ValidationError> {
    let value = required_number(Field::Wickets, raw)?;
    let value = within(Field::Wickets, value, MIN_WICKETS, MAX_WICKETS)?;
    whole(Field::Wickets, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_draft() -> MatchDraft {
        MatchDraft {
            batting_team: Some("Mumbai Indians".to_string()),
            bowling_team: Some("Chennai Super Kings".to_string()),
            venue: Some("Wankhede Stadium".to_string()),
            toss_winner: Some("Mumbai Indians".to_string()),
            ..MatchDraft::default()
        }
    }

    fn rule_for(draft: &MatchDraft, field: Field) -> Option<Rule> {
        validate(draft)
            .err()
            .and_then(|errors| errors.get(field).map(|error| error.rule))
    }

    #[test]
    fn test_reference_configuration_is_valid() {
        let config = validate(&valid_draft()).unwrap();
        assert_eq!(config.batting_team, Team::MumbaiIndians);
        assert_eq!(config.bowling_team, Team::ChennaiSuperKings);
        assert_eq!(config.venue, Venue::WankhedeStadium);
        assert_eq!(config.innings, 1);
        assert_eq!(config.weather, Weather::Clear);
        assert_eq!(config.day_night, DayNight::Night);
        assert_eq!(config.match_type, MatchType::League);
        assert_eq!(config.toss_winner, Some(Team::MumbaiIndians));
        assert_eq!(config.toss_decision, TossDecision::Bat);
        assert_eq!(config.overs, 20.0);
        assert_eq!(config.wickets, 3);
        assert!(config.toss_advantage());
    }

    #[test]
    fn test_default_draft_reports_required_fields() {
        let errors = validate(&MatchDraft::default()).unwrap_err();
        assert_eq!(errors.len(), 3);
        for field in [Field::BattingTeam, Field::BowlingTeam, Field::Venue] {
            assert_eq!(errors.get(field).map(|e| e.rule), Some(Rule::Required));
        }
    }

    #[test]
    fn test_same_teams_flag_bowling_team() {
        let mut draft = valid_draft();
        draft.bowling_team = Some("Mumbai Indians".to_string());

        let errors = validate(&draft).unwrap_err();
        let error = errors.get(Field::BowlingTeam).unwrap();
        assert_eq!(error.rule, Rule::TeamsMustDiffer);
        assert_eq!(error.message, "bowlingTeam must differ from battingTeam");
        assert!(errors.get(Field::BattingTeam).is_none());
    }

    #[test]
    fn test_overs_bounds() {
        let mut draft = valid_draft();
        draft.overs = Some(4.9);
        assert_eq!(rule_for(&draft, Field::Overs), Some(Rule::OutOfRange));

        draft.overs = Some(20.1);
        assert_eq!(rule_for(&draft, Field::Overs), Some(Rule::OutOfRange));

        draft.overs = Some(20.0);
        assert!(validate(&draft).is_ok());

        draft.overs = Some(5.0);
        assert!(validate(&draft).is_ok());
    }

    #[test]
    fn test_overs_step() {
        let mut draft = valid_draft();
        draft.overs = Some(12.35);
        assert_eq!(rule_for(&draft, Field::Overs), Some(Rule::Step));

        draft.overs = Some(0.1 + 0.2 + 12.0);
        let config = validate(&draft).unwrap();
        assert_eq!(config.overs, 12.3);
    }

    #[test]
    fn test_overs_not_finite() {
        let mut draft = valid_draft();
        draft.overs = Some(f64::NAN);
        assert_eq!(rule_for(&draft, Field::Overs), Some(Rule::NotANumber));
    }

    #[test]
    fn test_wickets_bounds_and_integrality() {
        let mut draft = valid_draft();
        draft.wickets = Some(11.0);
        assert_eq!(rule_for(&draft, Field::Wickets), Some(Rule::OutOfRange));

        draft.wickets = Some(-1.0);
        assert_eq!(rule_for(&draft, Field::Wickets), Some(Rule::OutOfRange));

        draft.wickets = Some(2.5);
        assert_eq!(rule_for(&draft, Field::Wickets), Some(Rule::NotAnInteger));

        draft.wickets = Some(10.0);
        assert_eq!(validate(&draft).unwrap().wickets, 10);

        draft.wickets = Some(0.0);
        assert_eq!(validate(&draft).unwrap().wickets, 0);
    }

    #[test]
    fn test_innings_must_be_one_or_two() {
        let mut draft = valid_draft();
        draft.innings = Some(3.0);
        assert_eq!(rule_for(&draft, Field::Innings), Some(Rule::OutOfRange));

        draft.innings = Some(1.5);
        assert_eq!(rule_for(&draft, Field::Innings), Some(Rule::NotAnInteger));

        draft.innings = Some(2.0);
        assert_eq!(validate(&draft).unwrap().innings, 2);
    }

    #[test]
    fn test_toss_winner_must_be_playing() {
        let mut draft = valid_draft();
        draft.toss_winner = Some("Punjab Kings".to_string());
        assert_eq!(rule_for(&draft, Field::TossWinner), Some(Rule::TossWinnerNotPlaying));

        draft.toss_winner = Some("Chennai Super Kings".to_string());
        assert!(validate(&draft).is_ok());
    }

    #[test]
    fn test_toss_winner_may_be_absent() {
        let mut draft = valid_draft();
        draft.toss_winner = None;
        let config = validate(&draft).unwrap();
        assert_eq!(config.toss_winner, None);
        assert!(!config.toss_advantage());

        draft.toss_winner = Some("  ".to_string());
        assert!(validate(&draft).is_ok());
    }

    #[test]
    fn test_unknown_options_are_rejected() {
        let mut draft = valid_draft();
        draft.venue = Some("Lord's".to_string());
        draft.weather = Some("Snow".to_string());
        draft.day_night = Some("Dusk".to_string());

        let errors = validate(&draft).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get(Field::Venue).unwrap().rule, Rule::UnknownOption);
        assert!(errors.get(Field::Weather).unwrap().message.contains("Overcast"));
        assert_eq!(errors.get(Field::DayNight).unwrap().rule, Rule::UnknownOption);
    }

    #[test]
    fn test_cross_field_rules_wait_for_valid_inputs() {
        let mut draft = valid_draft();
        draft.batting_team = Some("Mumbai Indianz".to_string());
        draft.toss_winner = Some("Punjab Kings".to_string());

        let errors = validate(&draft).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(Field::BattingTeam).unwrap().rule, Rule::UnknownOption);
    }

    #[test]
    fn test_one_error_per_field() {
        let mut draft = valid_draft();
        draft.bowling_team = Some("Mumbai Indians".to_string());
        draft.toss_winner = Some("Delhi Capitals".to_string());

        let errors = validate(&draft).unwrap_err();
        let fields: Vec<Field> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec![Field::BowlingTeam, Field::TossWinner]);
    }

    #[test]
    fn test_field_names_round_trip() {
        for field in Field::ALL {
            assert_eq!(field.as_str().parse::<Field>(), Ok(field));
        }
        assert!("score".parse::<Field>().is_err());
    }

    #[test]
    fn test_errors_serialize_with_wire_names() {
        let mut draft = valid_draft();
        draft.overs = Some(4.0);
        let errors = validate(&draft).unwrap_err();
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json[0]["field"], "overs");
        assert_eq!(json[0]["rule"], "outOfRange");
    }
}

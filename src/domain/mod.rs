pub mod models;
pub mod validation;
pub mod vocabulary;

pub use models::*;
pub use validation::{validate, Field, FieldErrors, Rule, ValidationError};
pub use vocabulary::{
    option_catalog, DayNight, MatchType, OptionCatalog, Team, TossDecision, Venue, Vocabulary,
    Weather,
};

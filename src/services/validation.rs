use anyhow::Result;
use log::debug;
use std::io::Read;

use crate::domain::{validate, FieldErrors, MatchConfiguration, MatchDraft};
use crate::errors::{with_parse_context, with_read_context};

/// Reads a JSON match draft from a file, or from stdin when `source` is "-"
pub fn load_draft(source: &str) -> Result<MatchDraft> {
    let raw = if source == "-" {
        let mut buffer = String::new();
        with_read_context(std::io::stdin().read_to_string(&mut buffer), "stdin")?;
        buffer
    } else {
        with_read_context(std::fs::read_to_string(source), source)?
    };
    debug!("Read {} bytes from {}", raw.len(), source);
    with_parse_context(serde_json::from_str(&raw), "match draft")
}

pub struct ValidationService;

impl ValidationService {
    pub fn run(source: &str) -> Result<Result<MatchConfiguration, FieldErrors>> {
        let draft = load_draft(source)?;
        Ok(validate(&draft))
    }
}

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};

use crate::models::{CognitiveLevel, Confidence, ErrorType, ItemDifficulty, QuestionBank};

pub fn parse_datetime(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("failed to parse {field}"))
}

pub fn parse_optional_datetime(
    value: Option<String>,
    field: &str,
) -> Result<Option<DateTime<Utc>>> {
    match value {
        Some(raw) => parse_datetime(&raw, field).map(Some),
        None => Ok(None),
    }
}

pub fn parse_error_type(value: &str) -> Result<ErrorType> {
    ErrorType::parse(value).ok_or_else(|| anyhow!("unknown error type '{value}'"))
}

/// Accepts both the named levels and the legacy 1..=4 scale.
pub fn parse_confidence(value: &str) -> Result<Confidence> {
    if let Ok(level) = value.trim().parse::<i64>() {
        return Confidence::from_legacy_scale(level)
            .ok_or_else(|| anyhow!("legacy confidence {level} outside 1..=4"));
    }
    Confidence::parse(value).ok_or_else(|| anyhow!("unknown confidence '{value}'"))
}

pub fn parse_cognitive_level(value: Option<String>) -> Result<Option<CognitiveLevel>> {
    match value {
        Some(raw) => CognitiveLevel::parse(&raw)
            .map(Some)
            .ok_or_else(|| anyhow!("unknown cognitive level '{raw}'")),
        None => Ok(None),
    }
}

pub fn parse_bank(value: &str) -> Result<QuestionBank> {
    QuestionBank::parse(value).ok_or_else(|| anyhow!("unknown question bank '{value}'"))
}

pub fn parse_difficulty(value: Option<String>) -> Result<Option<ItemDifficulty>> {
    match value {
        Some(raw) => ItemDifficulty::parse(&raw)
            .map(Some)
            .ok_or_else(|| anyhow!("unknown item difficulty '{raw}'")),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_migration() {
        assert_eq!(parse_confidence("1").unwrap(), Confidence::VeryLow);
        assert_eq!(parse_confidence("4").unwrap(), Confidence::High);
        assert_eq!(parse_confidence("veryLow").unwrap(), Confidence::VeryLow);
        assert!(parse_confidence("7").is_err());
        assert!(parse_confidence("sure").is_err());
    }

    #[test]
    fn test_unknown_error_type_fails() {
        assert!(parse_error_type("careless").is_err());
        assert_eq!(parse_error_type("process").unwrap(), ErrorType::Process);
    }
}

//! Error-log data models.
//!
//! An `ErrorRecord` is one missed practice question. Records are created by the
//! logging surface, never mutated, and only read as snapshots by the pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ErrorType {
    Knowledge,
    Reasoning,
    Process,
    Time,
}

impl ErrorType {
    pub const ALL: [ErrorType; 4] = [
        ErrorType::Knowledge,
        ErrorType::Reasoning,
        ErrorType::Process,
        ErrorType::Time,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::Knowledge => "knowledge",
            ErrorType::Reasoning => "reasoning",
            ErrorType::Process => "process",
            ErrorType::Time => "time",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "knowledge" => Some(ErrorType::Knowledge),
            "reasoning" => Some(ErrorType::Reasoning),
            "process" => Some(ErrorType::Process),
            "time" => Some(ErrorType::Time),
            _ => None,
        }
    }
}

/// Four-level self-reported confidence, lowest first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum Confidence {
    VeryLow,
    Low,
    Moderate,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::VeryLow => "veryLow",
            Confidence::Low => "low",
            Confidence::Moderate => "moderate",
            Confidence::High => "high",
        }
    }

    /// Ordinal position: `VeryLow` = 0 through `High` = 3.
    pub fn ordinal(&self) -> u8 {
        match self {
            Confidence::VeryLow => 0,
            Confidence::Low => 1,
            Confidence::Moderate => 2,
            Confidence::High => 3,
        }
    }

    /// Confidence as a percentage in [0, 100].
    pub fn percent(&self) -> f64 {
        f64::from(self.ordinal()) / 3.0 * 100.0
    }

    /// Converts the legacy 1..=4 numeric scale.
    pub fn from_legacy_scale(value: i64) -> Option<Self> {
        match value {
            1 => Some(Confidence::VeryLow),
            2 => Some(Confidence::Low),
            3 => Some(Confidence::Moderate),
            4 => Some(Confidence::High),
            _ => None,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "verylow" | "very_low" | "very-low" | "guessed" => Some(Confidence::VeryLow),
            "low" => Some(Confidence::Low),
            "moderate" | "medium" => Some(Confidence::Moderate),
            "high" | "confident" => Some(Confidence::High),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum CognitiveLevel {
    FirstOrder,
    HigherOrder,
}

impl CognitiveLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CognitiveLevel::FirstOrder => "firstOrder",
            CognitiveLevel::HigherOrder => "higherOrder",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "firstorder" | "first-order" | "first_order" | "first" => {
                Some(CognitiveLevel::FirstOrder)
            }
            "higherorder" | "higher-order" | "higher_order" | "higher" => {
                Some(CognitiveLevel::HigherOrder)
            }
            _ => None,
        }
    }
}

/// Practice-question source a record was imported from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum QuestionBank {
    Nbme,
    Uworld,
    Amboss,
    Kaplan,
    Anki,
    Other,
}

impl QuestionBank {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionBank::Nbme => "nbme",
            QuestionBank::Uworld => "uworld",
            QuestionBank::Amboss => "amboss",
            QuestionBank::Kaplan => "kaplan",
            QuestionBank::Anki => "anki",
            QuestionBank::Other => "other",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            QuestionBank::Nbme => "NBME",
            QuestionBank::Uworld => "UWorld",
            QuestionBank::Amboss => "AMBOSS",
            QuestionBank::Kaplan => "Kaplan",
            QuestionBank::Anki => "Anki",
            QuestionBank::Other => "your question bank",
        }
    }

    /// How well performance on this source predicts real exam performance.
    pub fn reliability(&self) -> f64 {
        match self {
            QuestionBank::Nbme => 1.0,
            QuestionBank::Uworld => 0.95,
            QuestionBank::Amboss => 0.9,
            QuestionBank::Kaplan => 0.7,
            QuestionBank::Anki => 0.6,
            QuestionBank::Other => 0.4,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "nbme" => Some(QuestionBank::Nbme),
            "uworld" => Some(QuestionBank::Uworld),
            "amboss" => Some(QuestionBank::Amboss),
            "kaplan" => Some(QuestionBank::Kaplan),
            "anki" => Some(QuestionBank::Anki),
            "other" => Some(QuestionBank::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ItemDifficulty {
    Easy,
    Medium,
    Hard,
}

impl ItemDifficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemDifficulty::Easy => "easy",
            ItemDifficulty::Medium => "medium",
            ItemDifficulty::Hard => "hard",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(ItemDifficulty::Easy),
            "medium" => Some(ItemDifficulty::Medium),
            "hard" => Some(ItemDifficulty::Hard),
            _ => None,
        }
    }
}

/// Metadata carried over from the platform a question came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExternalSource {
    pub bank: QuestionBank,
    pub difficulty: Option<ItemDifficulty>,
    /// National percent of test takers who answered correctly, 0..=100.
    pub percent_correct: Option<f64>,
    /// When the source platform will show this item again.
    pub next_review: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorRecord {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub description: String,
    pub system: String,
    pub topic: String,
    pub error_type: ErrorType,
    pub confidence: Confidence,
    pub cognitive_level: Option<CognitiveLevel>,
    #[serde(default)]
    pub remediation: Vec<String>,
    pub source: Option<ExternalSource>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("record has no id")]
    MissingId,

    #[error("record {0} has no topic")]
    MissingTopic(String),

    #[error("record {0} has no system")]
    MissingSystem(String),

    #[error("record {id} has percent-correct {value} outside 0..=100")]
    PercentCorrectOutOfRange { id: String, value: f64 },
}

impl ErrorRecord {
    /// Checks the fields the pipeline keys on. Invalid records are excluded from
    /// aggregates rather than guessed at.
    pub fn validate(&self) -> Result<(), RecordError> {
        if self.id.trim().is_empty() {
            return Err(RecordError::MissingId);
        }
        if self.topic.trim().is_empty() {
            return Err(RecordError::MissingTopic(self.id.clone()));
        }
        if self.system.trim().is_empty() {
            return Err(RecordError::MissingSystem(self.id.clone()));
        }
        if let Some(value) = self.percent_correct() {
            if !(0.0..=100.0).contains(&value) || value.is_nan() {
                return Err(RecordError::PercentCorrectOutOfRange {
                    id: self.id.clone(),
                    value,
                });
            }
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn percent_correct(&self) -> Option<f64> {
        self.source.as_ref().and_then(|s| s.percent_correct)
    }

    pub fn matches(&self, system: &str, topic: &str) -> bool {
        self.system == system && self.topic == topic
    }
}

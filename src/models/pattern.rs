use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ErrorType;

/// Per-error-type counters. Every type is always present.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorTypeCounts {
    pub knowledge: u32,
    pub reasoning: u32,
    pub process: u32,
    pub time: u32,
}

impl ErrorTypeCounts {
    pub fn get(&self, error_type: ErrorType) -> u32 {
        match error_type {
            ErrorType::Knowledge => self.knowledge,
            ErrorType::Reasoning => self.reasoning,
            ErrorType::Process => self.process,
            ErrorType::Time => self.time,
        }
    }

    pub fn increment(&mut self, error_type: ErrorType) {
        match error_type {
            ErrorType::Knowledge => self.knowledge += 1,
            ErrorType::Reasoning => self.reasoning += 1,
            ErrorType::Process => self.process += 1,
            ErrorType::Time => self.time += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.knowledge + self.reasoning + self.process + self.time
    }

    /// Fraction of all counted errors that are of `error_type`; 0 when empty.
    pub fn share(&self, error_type: ErrorType) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        f64::from(self.get(error_type)) / f64::from(total)
    }

    /// Type whose share is at least `threshold`, if any.
    ///
    /// With `threshold > 0.5` at most one type can qualify.
    pub fn dominant_at_least(&self, threshold: f64) -> Option<ErrorType> {
        ErrorType::ALL
            .into_iter()
            .find(|t| self.total() > 0 && self.share(*t) >= threshold)
    }

    /// Type whose share is strictly above `threshold`, if any.
    pub fn dominant_above(&self, threshold: f64) -> Option<ErrorType> {
        ErrorType::ALL
            .into_iter()
            .find(|t| self.total() > 0 && self.share(*t) > threshold)
    }

    /// Most frequent type; ties go to the earlier variant. `None` when empty.
    pub fn plurality(&self) -> Option<ErrorType> {
        if self.total() == 0 {
            return None;
        }
        let mut best = ErrorType::Knowledge;
        for t in ErrorType::ALL {
            if self.get(t) > self.get(best) {
                best = t;
            }
        }
        Some(best)
    }
}

/// Aggregate error statistics for one (system, topic) pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TopicPattern {
    pub topic: String,
    pub system: String,
    pub error_count: u32,
    pub error_types: ErrorTypeCounts,
    /// Mean confidence ordinal, 0 (very low) through 3 (high).
    pub avg_confidence: f64,
    pub last_seen: DateTime<Utc>,
}

impl TopicPattern {
    pub fn key(&self) -> (&str, &str) {
        (self.system.as_str(), self.topic.as_str())
    }
}

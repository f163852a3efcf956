//! Plain-language reasons behind a priority score.
//!
//! Reasons are short phrases meant for a chip in the UI: no numbers, no scoring
//! vocabulary.

use crate::models::{ErrorType, PriorityFactors, TopicPattern};
use crate::priority::config::{PriorityConfig, ReasonThreshold};

fn tag(value: f64, threshold: &ReasonThreshold, strong: &str, moderate: &str) -> Option<String> {
    if value > threshold.strong {
        Some(strong.to_string())
    } else if value > threshold.moderate {
        Some(moderate.to_string())
    } else {
        None
    }
}

fn dominant_type_reason(error_type: ErrorType) -> &'static str {
    match error_type {
        ErrorType::Knowledge => "knowledge gap",
        ErrorType::Reasoning => "application struggles",
        ErrorType::Process | ErrorType::Time => "strategy needed",
    }
}

/// Ordered reasons: factor tags in factor order, then the dominant error type.
pub fn generate_reasons(
    factors: &PriorityFactors,
    pattern: &TopicPattern,
    config: &PriorityConfig,
) -> Vec<String> {
    let t = &config.reasons;
    let mut reasons: Vec<String> = [
        tag(factors.frequency, &t.frequency, "frequent", "recurring"),
        tag(factors.exam_weight, &t.exam_weight, "high-yield", "exam-relevant"),
        tag(factors.recency, &t.recency, "very recent", "recent"),
        tag(factors.low_confidence, &t.low_confidence, "low confidence", "shaky confidence"),
        tag(factors.time_pressure, &t.time_pressure, "time pressure", "pacing issues"),
        tag(factors.difficulty, &t.difficulty, "hard questions", "challenging questions"),
        tag(factors.performance_gap, &t.performance_gap, "below average", "behind peers"),
    ]
    .into_iter()
    .flatten()
    .collect();

    if let Some(error_type) = pattern
        .error_types
        .dominant_above(config.dominant_type_threshold)
    {
        let reason = dominant_type_reason(error_type);
        if !reasons.iter().any(|r| r == reason) {
            reasons.push(reason.to_string());
        }
    }

    if reasons.is_empty() {
        reasons.push(config.fallback_reason.clone());
    }

    reasons
}

/// First few reasons joined with " + ".
pub fn reason_chip(reasons: &[String], max: usize) -> String {
    reasons
        .iter()
        .take(max.max(1))
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" + ")
}

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::blueprint;
use crate::models::{ErrorRecord, ErrorType, PriorityFactors, QuestionBank, TopicPattern, Urgency};
use crate::priority::config::{FactorWeights, PriorityConfig};
use crate::utils::time::whole_days_since;

/// Compute all seven factors for one pattern.
///
/// `topic_errors` are the records belonging to the pattern; `max_count` is the
/// largest error count across every pattern in the same pass.
pub fn compute_factors(
    pattern: &TopicPattern,
    topic_errors: &[&ErrorRecord],
    max_count: u32,
    now: DateTime<Utc>,
    config: &PriorityConfig,
) -> PriorityFactors {
    let (difficulty, performance_gap) = score_external_performance(topic_errors);

    PriorityFactors {
        frequency: score_frequency(pattern.error_count, max_count),
        exam_weight: blueprint::exam_weight(&pattern.system, config.neutral_exam_weight)
            .clamp(0.0, 1.0),
        recency: score_recency(pattern.last_seen, now, config),
        low_confidence: score_low_confidence(topic_errors),
        time_pressure: pattern.error_types.share(ErrorType::Time),
        difficulty,
        performance_gap,
    }
}

/// Weighted sum of factors scaled to [0, 100].
pub fn composite_score(factors: &PriorityFactors, weights: &FactorWeights) -> f64 {
    let raw: f64 = factors
        .as_array()
        .iter()
        .zip(weights.as_array())
        .map(|(factor, weight)| factor * weight)
        .sum();
    (raw * 100.0).clamp(0.0, 100.0)
}

/// Log-scaled count relative to the busiest topic.
/// 1 of 10 ≈ 0.29, 5 of 10 ≈ 0.75, 10 of 10 = 1.0
fn score_frequency(count: u32, max_count: u32) -> f64 {
    if max_count == 0 || count == 0 {
        return 0.0;
    }
    let value = (f64::from(count) + 1.0).ln() / (f64::from(max_count) + 1.0).ln();
    value.clamp(0.0, 1.0)
}

/// Exponential decay from the most recent error.
fn score_recency(last_seen: DateTime<Utc>, now: DateTime<Utc>, config: &PriorityConfig) -> f64 {
    let days = whole_days_since(last_seen, now);
    if days == 0 {
        return 1.0;
    }
    if days >= config.recency_horizon_days {
        return config.recency_floor.clamp(0.0, 1.0);
    }
    (-config.recency_decay_rate * days as f64)
        .exp()
        .max(config.recency_floor)
        .clamp(0.0, 1.0)
}

/// Mean of `1 - confidence%` over the topic's errors.
fn score_low_confidence(topic_errors: &[&ErrorRecord]) -> f64 {
    if topic_errors.is_empty() {
        return 0.0;
    }
    let total: f64 = topic_errors
        .iter()
        .map(|e| 1.0 - e.confidence.percent() / 100.0)
        .sum();
    (total / topic_errors.len() as f64).clamp(0.0, 1.0)
}

/// Returns (difficulty, performance gap) from national percent-correct data.
/// Both are 0 when no record carries it.
fn score_external_performance(topic_errors: &[&ErrorRecord]) -> (f64, f64) {
    let mut sum = 0.0;
    let mut count = 0usize;

    for error in topic_errors {
        if let Some(percent) = error.percent_correct() {
            sum += (percent / 100.0).clamp(0.0, 1.0);
            count += 1;
        }
    }

    if count == 0 {
        return (0.0, 0.0);
    }

    let mean_correct = sum / count as f64;
    (1.0 - mean_correct, mean_correct)
}

/// Mean reliability of the distinct question banks behind this topic's errors,
/// or `None` when no record carries source metadata.
pub fn source_quality_multiplier(topic_errors: &[&ErrorRecord]) -> Option<f64> {
    let banks: BTreeSet<QuestionBank> = topic_errors
        .iter()
        .filter_map(|e| e.source.as_ref().map(|s| s.bank))
        .collect();

    if banks.is_empty() {
        return None;
    }

    let total: f64 = banks.iter().map(QuestionBank::reliability).sum();
    Some(total / banks.len() as f64)
}

pub fn urgency_for_score(score: f64, config: &PriorityConfig) -> Urgency {
    if score >= config.urgent_threshold {
        Urgency::Urgent
    } else if score >= config.high_threshold {
        Urgency::High
    } else if score >= config.moderate_threshold {
        Urgency::Moderate
    } else {
        Urgency::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Confidence, ErrorTypeCounts, ExternalSource};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 20, 18, 0, 0).unwrap()
    }

    fn error(confidence: Confidence, source: Option<ExternalSource>) -> ErrorRecord {
        ErrorRecord {
            id: "x".into(),
            timestamp: now(),
            description: String::new(),
            system: "renal".into(),
            topic: "RTA".into(),
            error_type: ErrorType::Knowledge,
            confidence,
            cognitive_level: None,
            remediation: vec![],
            source,
        }
    }

    fn source(bank: QuestionBank, percent_correct: Option<f64>) -> Option<ExternalSource> {
        Some(ExternalSource {
            bank,
            difficulty: None,
            percent_correct,
            next_review: None,
        })
    }

    #[test]
    fn test_frequency_log_scaling() {
        assert_eq!(score_frequency(0, 10), 0.0);
        assert_eq!(score_frequency(3, 0), 0.0);
        assert_eq!(score_frequency(10, 10), 1.0);
        let one = score_frequency(1, 10);
        assert!(one > 0.25 && one < 0.35);
        assert!(score_frequency(5, 10) > one);
    }

    #[test]
    fn test_recency_decay_and_floor() {
        let config = PriorityConfig::default();
        assert_eq!(score_recency(now(), now(), &config), 1.0);
        assert_eq!(score_recency(now() - Duration::hours(20), now(), &config), 1.0);

        let three = score_recency(now() - Duration::days(3), now(), &config);
        assert!((three - (-0.3f64).exp()).abs() < 1e-12);

        assert_eq!(score_recency(now() - Duration::days(26), now(), &config), 0.1);
        assert_eq!(score_recency(now() - Duration::days(45), now(), &config), 0.1);
    }

    #[test]
    fn test_low_confidence_mean() {
        let a = error(Confidence::VeryLow, None);
        let b = error(Confidence::High, None);
        assert_eq!(score_low_confidence(&[&a, &b]), 0.5);
        assert_eq!(score_low_confidence(&[]), 0.0);
    }

    #[test]
    fn test_external_performance() {
        let a = error(Confidence::Low, source(QuestionBank::Uworld, Some(80.0)));
        let b = error(Confidence::Low, source(QuestionBank::Uworld, Some(60.0)));
        let c = error(Confidence::Low, None);
        let (difficulty, gap) = score_external_performance(&[&a, &b, &c]);
        assert!((difficulty - 0.3).abs() < 1e-9);
        assert!((gap - 0.7).abs() < 1e-9);
        assert_eq!(score_external_performance(&[&c]), (0.0, 0.0));
    }

    #[test]
    fn test_source_multiplier_uses_distinct_banks() {
        let a = error(Confidence::Low, source(QuestionBank::Nbme, None));
        let b = error(Confidence::Low, source(QuestionBank::Nbme, None));
        let c = error(Confidence::Low, source(QuestionBank::Other, None));
        let multiplier = source_quality_multiplier(&[&a, &b, &c]).unwrap();
        assert!((multiplier - 0.7).abs() < 1e-9);
        assert_eq!(source_quality_multiplier(&[&error(Confidence::Low, None)]), None);
    }

    #[test]
    fn test_urgency_boundaries() {
        let config = PriorityConfig::default();
        assert_eq!(urgency_for_score(80.0, &config), Urgency::Urgent);
        assert_eq!(urgency_for_score(79.99, &config), Urgency::High);
        assert_eq!(urgency_for_score(60.0, &config), Urgency::High);
        assert_eq!(urgency_for_score(40.0, &config), Urgency::Moderate);
        assert_eq!(urgency_for_score(39.9, &config), Urgency::Low);
    }

    #[test]
    fn test_factors_with_no_matching_errors() {
        let pattern = TopicPattern {
            topic: "Unknown".into(),
            system: "Nowhere".into(),
            error_count: 0,
            error_types: ErrorTypeCounts::default(),
            avg_confidence: 0.0,
            last_seen: now(),
        };
        let config = PriorityConfig::default();
        let factors = compute_factors(&pattern, &[], 0, now(), &config);
        assert_eq!(factors.frequency, 0.0);
        assert_eq!(factors.exam_weight, 0.5);
        assert_eq!(factors.low_confidence, 0.0);
        assert_eq!(factors.difficulty, 0.0);
        let score = composite_score(&factors, &config.weights);
        assert!((0.0..=100.0).contains(&score));
    }
}

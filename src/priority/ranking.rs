use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::log_warn;
use crate::models::{ErrorRecord, PriorityScore, TopicPattern};
use crate::priority::config::PriorityConfig;
use crate::priority::reasons::{generate_reasons, reason_chip};
use crate::priority::scoring::{
    composite_score, compute_factors, source_quality_multiplier, urgency_for_score,
};

const ENABLE_LOGS: bool = true;

/// Index valid records by (system, topic) so each pattern sees only its own errors.
fn group_by_topic(errors: &[ErrorRecord]) -> HashMap<(&str, &str), Vec<&ErrorRecord>> {
    let mut groups: HashMap<(&str, &str), Vec<&ErrorRecord>> = HashMap::new();
    for error in errors {
        if let Err(err) = error.validate() {
            log_warn!("Excluding malformed error record from scoring: {err}");
            continue;
        }
        groups
            .entry((error.system.as_str(), error.topic.as_str()))
            .or_default()
            .push(error);
    }
    groups
}

fn score_pattern(
    pattern: &TopicPattern,
    topic_errors: &[&ErrorRecord],
    max_count: u32,
    now: DateTime<Utc>,
    config: &PriorityConfig,
) -> PriorityScore {
    let factors = compute_factors(pattern, topic_errors, max_count, now, config);

    let mut score = composite_score(&factors, &config.weights);
    if let Some(multiplier) = source_quality_multiplier(topic_errors) {
        score = (score * multiplier).clamp(0.0, 100.0);
    }

    let reasons = generate_reasons(&factors, pattern, config);
    let chip = reason_chip(&reasons, config.max_chip_reasons);

    PriorityScore {
        topic: pattern.topic.clone(),
        system: pattern.system.clone(),
        score,
        rank: 0,
        urgency: urgency_for_score(score, config),
        reasons,
        reason_chip: chip,
        factors,
    }
}

/// Score a single pattern against the full error list. Rank is left at 0.
pub fn calculate_priority(
    pattern: &TopicPattern,
    errors: &[ErrorRecord],
    max_count: u32,
    now: DateTime<Utc>,
    config: &PriorityConfig,
) -> PriorityScore {
    let topic_errors: Vec<&ErrorRecord> = errors
        .iter()
        .filter(|e| e.matches(&pattern.system, &pattern.topic) && e.is_valid())
        .collect();
    score_pattern(pattern, &topic_errors, max_count, now, config)
}

/// Score every pattern and rank them, highest score first.
///
/// Equal scores keep the order of `patterns`.
pub fn calculate_all_priorities(
    patterns: &[TopicPattern],
    errors: &[ErrorRecord],
    now: DateTime<Utc>,
    config: &PriorityConfig,
) -> Vec<PriorityScore> {
    let groups = group_by_topic(errors);
    let max_count = patterns.iter().map(|p| p.error_count).max().unwrap_or(0);

    let mut scores: Vec<PriorityScore> = patterns
        .iter()
        .map(|pattern| {
            let topic_errors = groups
                .get(&pattern.key())
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            score_pattern(pattern, topic_errors, max_count, now, config)
        })
        .collect();

    scores.sort_by(|a, b| b.score.total_cmp(&a.score));
    for (position, score) in scores.iter_mut().enumerate() {
        score.rank = position + 1;
    }

    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::aggregate_patterns;
    use crate::models::{Confidence, ErrorType, ExternalSource, QuestionBank, Urgency};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap()
    }

    fn error(id: &str, system: &str, topic: &str, days_ago: i64, confidence: Confidence) -> ErrorRecord {
        ErrorRecord {
            id: id.into(),
            timestamp: now() - Duration::days(days_ago),
            description: String::new(),
            system: system.into(),
            topic: topic.into(),
            error_type: ErrorType::Knowledge,
            confidence,
            cognitive_level: None,
            remediation: vec![],
            source: None,
        }
    }

    #[test]
    fn test_empty_inputs() {
        let config = PriorityConfig::default();
        assert!(calculate_all_priorities(&[], &[], now(), &config).is_empty());
    }

    #[test]
    fn test_ranks_are_dense_and_sorted() {
        let errors = vec![
            error("1", "renal", "A", 0, Confidence::Low),
            error("2", "renal", "A", 1, Confidence::Low),
            error("3", "renal", "A", 2, Confidence::Low),
            error("4", "skin", "B", 20, Confidence::High),
            error("5", "cardiovascular", "C", 5, Confidence::Moderate),
        ];
        let patterns = aggregate_patterns(&errors);
        let scores = calculate_all_priorities(&patterns, &errors, now(), &PriorityConfig::default());

        let ranks: Vec<usize> = scores.iter().map(|s| s.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        assert!(scores.windows(2).all(|w| w[0].score >= w[1].score));
        assert_eq!(scores[0].topic, "A");
    }

    #[test]
    fn test_source_multiplier_downweights_score() {
        let plain = vec![error("1", "renal", "A", 0, Confidence::Low)];
        let mut sourced = plain.clone();
        sourced[0].source = Some(ExternalSource {
            bank: QuestionBank::Other,
            difficulty: None,
            percent_correct: None,
            next_review: None,
        });

        let config = PriorityConfig::default();
        let a = calculate_all_priorities(&aggregate_patterns(&plain), &plain, now(), &config);
        let b = calculate_all_priorities(&aggregate_patterns(&sourced), &sourced, now(), &config);
        assert!((b[0].score - a[0].score * 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_single_pattern_matches_batch() {
        let errors = vec![
            error("1", "renal", "A", 0, Confidence::Low),
            error("2", "renal", "B", 3, Confidence::High),
        ];
        let patterns = aggregate_patterns(&errors);
        let config = PriorityConfig::default();
        let batch = calculate_all_priorities(&patterns, &errors, now(), &config);
        let single = calculate_priority(&patterns[1], &errors, 1, now(), &config);
        let ranked = batch.iter().find(|s| s.topic == single.topic).unwrap();
        assert_eq!(ranked.score, single.score);
        assert_eq!(ranked.reason_chip, single.reason_chip);
    }

    #[test]
    fn test_heavy_topic_reaches_urgent() {
        let mut errors = Vec::new();
        for i in 0..12 {
            let mut e = error(&i.to_string(), "general-principles", "Enzyme kinetics", 0, Confidence::VeryLow);
            e.error_type = ErrorType::Time;
            e.source = Some(ExternalSource {
                bank: QuestionBank::Nbme,
                difficulty: None,
                percent_correct: Some(85.0),
                next_review: None,
            });
            errors.push(e);
        }
        let patterns = aggregate_patterns(&errors);
        let scores = calculate_all_priorities(&patterns, &errors, now(), &PriorityConfig::default());
        assert_eq!(scores[0].urgency, Urgency::Urgent);
        assert!(scores[0].score <= 100.0);
    }
}

//! Groups raw error records into per-topic patterns.

use std::collections::HashMap;

use crate::log_warn;
use crate::models::{ErrorRecord, ErrorTypeCounts, TopicPattern};

const ENABLE_LOGS: bool = true;

struct PatternAccumulator {
    pattern: TopicPattern,
    confidence_sum: f64,
}

/// Builds one pattern per distinct (system, topic), most frequent first.
///
/// Invalid records are left out of every count. Ties keep first-seen order.
pub fn aggregate_patterns(errors: &[ErrorRecord]) -> Vec<TopicPattern> {
    let mut index: HashMap<(&str, &str), usize> = HashMap::new();
    let mut accumulators: Vec<PatternAccumulator> = Vec::new();

    for error in errors {
        if let Err(err) = error.validate() {
            log_warn!("Excluding malformed error record from patterns: {err}");
            continue;
        }

        let key = (error.system.as_str(), error.topic.as_str());
        let slot = *index.entry(key).or_insert_with(|| {
            accumulators.push(PatternAccumulator {
                pattern: TopicPattern {
                    topic: error.topic.clone(),
                    system: error.system.clone(),
                    error_count: 0,
                    error_types: ErrorTypeCounts::default(),
                    avg_confidence: 0.0,
                    last_seen: error.timestamp,
                },
                confidence_sum: 0.0,
            });
            accumulators.len() - 1
        });

        let acc = &mut accumulators[slot];
        acc.pattern.error_count += 1;
        acc.pattern.error_types.increment(error.error_type);
        acc.confidence_sum += f64::from(error.confidence.ordinal());
        if error.timestamp > acc.pattern.last_seen {
            acc.pattern.last_seen = error.timestamp;
        }
    }

    let mut patterns: Vec<TopicPattern> = accumulators
        .into_iter()
        .map(|acc| {
            let mut pattern = acc.pattern;
            pattern.avg_confidence = acc.confidence_sum / f64::from(pattern.error_count);
            pattern
        })
        .collect();

    patterns.sort_by(|a, b| b.error_count.cmp(&a.error_count));
    patterns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Confidence, ErrorType};
    use chrono::{Duration, TimeZone, Utc};

    fn error(id: &str, system: &str, topic: &str, t: ErrorType, c: Confidence, day: i64) -> ErrorRecord {
        ErrorRecord {
            id: id.into(),
            timestamp: Utc.with_ymd_and_hms(2025, 2, 1, 8, 0, 0).unwrap() + Duration::days(day),
            description: String::new(),
            system: system.into(),
            topic: topic.into(),
            error_type: t,
            confidence: c,
            cognitive_level: None,
            remediation: vec![],
            source: None,
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate_patterns(&[]).is_empty());
    }

    #[test]
    fn test_groups_and_sorts_by_count() {
        let errors = vec![
            error("1", "Renal", "Aldosterone", ErrorType::Knowledge, Confidence::High, 0),
            error("2", "Cardiovascular", "Preload", ErrorType::Knowledge, Confidence::Low, 1),
            error("3", "Cardiovascular", "Preload", ErrorType::Time, Confidence::VeryLow, 3),
        ];
        let patterns = aggregate_patterns(&errors);

        assert_eq!(patterns.len(), 2);
        assert_eq!(patterns[0].topic, "Preload");
        assert_eq!(patterns[0].error_count, 2);
        assert_eq!(patterns[0].error_types.knowledge, 1);
        assert_eq!(patterns[0].error_types.time, 1);
        assert_eq!(patterns[0].avg_confidence, 0.5);
        assert_eq!(patterns[0].last_seen, errors[2].timestamp);
        assert_eq!(patterns[1].avg_confidence, 3.0);
    }

    #[test]
    fn test_same_topic_in_different_systems_stays_separate() {
        let errors = vec![
            error("1", "Renal", "Acidosis", ErrorType::Reasoning, Confidence::Low, 0),
            error("2", "Respiratory", "Acidosis", ErrorType::Reasoning, Confidence::Low, 0),
        ];
        assert_eq!(aggregate_patterns(&errors).len(), 2);
    }

    #[test]
    fn test_malformed_records_excluded() {
        let errors = vec![
            error("1", "Renal", "", ErrorType::Knowledge, Confidence::Low, 0),
            error("2", "", "Aldosterone", ErrorType::Knowledge, Confidence::Low, 0),
            error("3", "Renal", "Aldosterone", ErrorType::Process, Confidence::Low, 0),
        ];
        let patterns = aggregate_patterns(&errors);
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].error_count, 1);
        assert_eq!(patterns[0].error_types.total(), 1);
    }
}

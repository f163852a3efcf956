use std::collections::BTreeSet;

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use studyplan_lib::models::{
    Confidence, ErrorRecord, ErrorType, ErrorTypeCounts, ExternalSource, PriorityFactors,
    PriorityScore, QuestionBank, TopicPattern, Urgency,
};
use studyplan_lib::{
    aggregate_patterns, calculate_all_priorities, generate_study_plan, PriorityConfig,
    SchedulerConfig,
};

const SYSTEMS: [&str; 4] = ["cardiovascular", "Renal", "neuro", "Unlisted System"];
const BANKS: [QuestionBank; 6] = [
    QuestionBank::Nbme,
    QuestionBank::Uworld,
    QuestionBank::Amboss,
    QuestionBank::Kaplan,
    QuestionBank::Anki,
    QuestionBank::Other,
];

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 7, 1, 12, 0, 0).unwrap()
}

fn arb_record() -> impl Strategy<Value = ErrorRecord> {
    (
        0usize..SYSTEMS.len(),
        0u8..6,
        0usize..4,
        0u8..4,
        0i64..60,
        proptest::option::of((0usize..BANKS.len(), proptest::option::of(0.0f64..=100.0))),
    )
        .prop_map(|(system, topic, kind, confidence, days_ago, source)| ErrorRecord {
            id: format!("{system}-{topic}-{days_ago}"),
            timestamp: now() - Duration::days(days_ago),
            description: String::new(),
            system: SYSTEMS[system].into(),
            topic: format!("Topic {topic}"),
            error_type: ErrorType::ALL[kind],
            confidence: Confidence::from_legacy_scale(i64::from(confidence) + 1)
                .unwrap_or(Confidence::Moderate),
            cognitive_level: None,
            remediation: vec![],
            source: source.map(|(bank, percent_correct)| ExternalSource {
                bank: BANKS[bank],
                difficulty: None,
                percent_correct,
                next_review: None,
            }),
        })
}

fn arb_errors() -> impl Strategy<Value = Vec<ErrorRecord>> {
    prop::collection::vec(arb_record(), 0..60)
}

fn priority(topic: &str, rank: usize, urgency: Urgency) -> PriorityScore {
    PriorityScore {
        topic: topic.into(),
        system: "renal".into(),
        score: 0.0,
        rank,
        urgency,
        reasons: vec![],
        reason_chip: String::new(),
        factors: PriorityFactors::default(),
    }
}

fn balanced_pattern(topic: &str) -> TopicPattern {
    let counts = ErrorTypeCounts {
        knowledge: 1,
        reasoning: 1,
        process: 1,
        time: 1,
    };
    TopicPattern {
        topic: topic.into(),
        system: "renal".into(),
        error_count: counts.total(),
        error_types: counts,
        avg_confidence: 1.5,
        last_seen: now(),
    }
}

fn days_for(urgency: Urgency) -> BTreeSet<u32> {
    let plan = generate_study_plan(
        &[priority("A", 1, urgency)],
        &[balanced_pattern("A")],
        &[],
        None,
        now(),
        &SchedulerConfig::default(),
        &mut StdRng::seed_from_u64(1),
    );
    plan.blocks.iter().map(|b| b.day).collect()
}

#[test]
fn test_template_days_without_dominant_type() {
    assert_eq!(days_for(Urgency::Urgent), BTreeSet::from([1, 2, 3, 5, 7, 10, 14]));
    assert_eq!(days_for(Urgency::High), BTreeSet::from([1, 3, 7, 14]));
    assert_eq!(days_for(Urgency::Moderate), BTreeSet::from([1, 4, 10]));
    assert_eq!(days_for(Urgency::Low), BTreeSet::from([1, 7]));
}

fn repeated(
    system: &str,
    topic: &str,
    count: u32,
    days_ago: i64,
    kind: usize,
    confidence: u8,
) -> Vec<ErrorRecord> {
    (0..count)
        .map(|i| ErrorRecord {
            id: format!("{topic}-{i}"),
            timestamp: now() - Duration::days(days_ago),
            description: String::new(),
            system: system.into(),
            topic: topic.into(),
            error_type: ErrorType::ALL[kind],
            confidence: Confidence::from_legacy_scale(i64::from(confidence) + 1)
                .unwrap_or(Confidence::Moderate),
            cognitive_level: None,
            remediation: vec![],
            source: None,
        })
        .collect()
}

proptest! {
    #[test]
    fn prop_more_recent_heavier_topic_scores_higher(
        n in 1u32..10,
        k in 1u32..10,
        days_a in 0i64..40,
        gap in 1i64..40,
        kind in 0usize..4,
        confidence in 0u8..4,
        heavy_first in any::<bool>(),
    ) {
        let heavy = repeated("cardiovascular", "Heavy", n + k, days_a, kind, confidence);
        let light = repeated("skin", "Light", n, days_a + gap, kind, confidence);
        let errors: Vec<ErrorRecord> = if heavy_first {
            heavy.into_iter().chain(light).collect()
        } else {
            light.into_iter().chain(heavy).collect()
        };

        let patterns = aggregate_patterns(&errors);
        let priorities = calculate_all_priorities(&patterns, &errors, now(), &PriorityConfig::default());
        let find = |topic: &str| priorities.iter().find(|p| p.topic == topic).cloned();
        let (Some(a), Some(b)) = (find("Heavy"), find("Light")) else {
            return Err(TestCaseError::fail("both topics should be scored"));
        };

        prop_assert!(a.score > b.score, "{} <= {}", a.score, b.score);
        prop_assert!(a.rank < b.rank);
    }

    #[test]
    fn prop_pattern_counts_add_up(errors in arb_errors()) {
        let patterns = aggregate_patterns(&errors);
        let total: u32 = patterns.iter().map(|p| p.error_count).sum();
        prop_assert_eq!(total as usize, errors.len());
        for pattern in &patterns {
            prop_assert_eq!(pattern.error_types.total(), pattern.error_count);
            prop_assert!(pattern.avg_confidence >= 0.0 && pattern.avg_confidence <= 3.0);
        }
        for pair in patterns.windows(2) {
            prop_assert!(pair[0].error_count >= pair[1].error_count);
        }
    }

    #[test]
    fn prop_priorities_are_well_formed(errors in arb_errors()) {
        let config = PriorityConfig::default();
        let patterns = aggregate_patterns(&errors);
        let priorities = calculate_all_priorities(&patterns, &errors, now(), &config);
        prop_assert_eq!(priorities.len(), patterns.len());

        let ranks: BTreeSet<usize> = priorities.iter().map(|p| p.rank).collect();
        prop_assert_eq!(ranks, (1..=priorities.len()).collect::<BTreeSet<_>>());

        for p in &priorities {
            prop_assert!(p.score >= 0.0 && p.score <= 100.0);
            for factor in p.factors.as_array() {
                prop_assert!((0.0..=1.0).contains(&factor));
            }
            prop_assert!(!p.reasons.is_empty());
            prop_assert!(!p.reason_chip.chars().any(|c| c.is_ascii_digit()));
            prop_assert!(!p.reason_chip.to_lowercase().contains("score"));
        }

        for pair in priorities.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
            prop_assert!(pair[0].urgency >= pair[1].urgency);
        }
    }

    #[test]
    fn prop_plan_respects_topic_limit(errors in arb_errors(), exam_in in proptest::option::of(-10i64..200), seed in any::<u64>()) {
        let config = SchedulerConfig::default();
        let patterns = aggregate_patterns(&errors);
        let priorities = calculate_all_priorities(&patterns, &errors, now(), &PriorityConfig::default());
        let exam = exam_in.map(|days| (now() + Duration::days(days)).date_naive());

        let plan = generate_study_plan(
            &priorities,
            &patterns,
            &errors,
            exam,
            now(),
            &config,
            &mut StdRng::seed_from_u64(seed),
        );

        prop_assert!(plan.topic_count() <= studyplan_lib::scheduler::topic_limit(plan.days_until_exam, &config));
        for block in &plan.blocks {
            prop_assert!(!block.why_scheduled.trim().is_empty());
            prop_assert!(block.day >= 1 && block.day <= config.plan_days);
            prop_assert!(block.duration_minutes > 0);
        }
        for pair in plan.blocks.windows(2) {
            prop_assert!(pair[0].day <= pair[1].day);
        }
    }
}

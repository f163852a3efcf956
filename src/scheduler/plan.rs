use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;

use crate::models::{ErrorRecord, PriorityScore, StudyBlock, StudyPlan, TopicPattern};
use crate::scheduler::adapt::{adapt_to_error_type, align_with_external_review, strategy_for};
use crate::scheduler::config::SchedulerConfig;
use crate::scheduler::interleave::interleave_blocks;
use crate::scheduler::templates::template_for;
use crate::utils::time::calendar_days_until;
use crate::{log_debug, log_info, log_warn};

const ENABLE_LOGS: bool = true;

/// Parse a user-entered exam date. Accepts `YYYY-MM-DD` or an RFC 3339 timestamp;
/// anything else is logged and treated as no date.
pub fn parse_exam_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(timestamp.with_timezone(&Utc).date_naive());
    }
    log_warn!("Ignoring unparseable exam date '{trimmed}'");
    None
}

/// How many topics fit in the plan given the time left before the exam.
pub fn topic_limit(days_until_exam: Option<i64>, config: &SchedulerConfig) -> usize {
    match days_until_exam {
        Some(days) if days < 0 => config.topics_default,
        Some(days) if days <= config.exam_final_days => config.topics_final,
        Some(days) if days <= config.exam_near_days => config.topics_near,
        Some(days) if days <= config.exam_far_days => config.topics_far,
        _ => config.topics_default,
    }
}

fn why_scheduled(priority: &PriorityScore) -> String {
    if priority.reason_chip.trim().is_empty() {
        format!("{} priority", priority.urgency.as_str())
    } else {
        priority.reason_chip.clone()
    }
}

fn blocks_for_topic(
    priority: &PriorityScore,
    pattern: &TopicPattern,
    topic_errors: &[&ErrorRecord],
    today: NaiveDate,
    config: &SchedulerConfig,
) -> Vec<StudyBlock> {
    let sessions = adapt_to_error_type(template_for(priority.urgency), &pattern.error_types, config);
    let sessions = align_with_external_review(sessions, topic_errors, today, config);
    let strategy = strategy_for(&pattern.error_types, config);
    let why = why_scheduled(priority);

    sessions
        .into_iter()
        .map(|session| StudyBlock {
            day: session.day.clamp(1, config.plan_days.max(1)),
            topic: priority.topic.clone(),
            system: priority.system.clone(),
            activity: session.activity,
            duration_minutes: session.duration_minutes,
            priority_rank: priority.rank,
            reasoning: session.rationale,
            urgency: priority.urgency,
            strategy,
            why_scheduled: why.clone(),
        })
        .collect()
}

/// Turn ranked priorities into a multi-day plan.
///
/// `rng` only decides the order of same-rank blocks within a day; pass a seeded
/// generator for reproducible output.
pub fn generate_study_plan<R: Rng + ?Sized>(
    priorities: &[PriorityScore],
    patterns: &[TopicPattern],
    errors: &[ErrorRecord],
    exam_date: Option<NaiveDate>,
    now: DateTime<Utc>,
    config: &SchedulerConfig,
    rng: &mut R,
) -> StudyPlan {
    let today = now.date_naive();
    let days_until_exam = exam_date.map(|date| calendar_days_until(date, today));
    let limit = topic_limit(days_until_exam, config);

    let pattern_index: HashMap<(&str, &str), &TopicPattern> =
        patterns.iter().map(|p| (p.key(), p)).collect();

    let mut errors_by_topic: HashMap<(&str, &str), Vec<&ErrorRecord>> = HashMap::new();
    for error in errors.iter().filter(|e| e.is_valid()) {
        errors_by_topic
            .entry((error.system.as_str(), error.topic.as_str()))
            .or_default()
            .push(error);
    }

    let mut ranked: Vec<&PriorityScore> = priorities.iter().collect();
    ranked.sort_by_key(|p| p.rank);

    let mut blocks = Vec::new();
    for priority in ranked.into_iter().take(limit) {
        let key = (priority.system.as_str(), priority.topic.as_str());
        let Some(pattern) = pattern_index.get(&key) else {
            log_debug!(
                "No pattern for prioritized topic '{}' in '{}', skipping",
                priority.topic,
                priority.system
            );
            continue;
        };
        let topic_errors = errors_by_topic.get(&key).map(Vec::as_slice).unwrap_or(&[]);
        blocks.extend(blocks_for_topic(priority, pattern, topic_errors, today, config));
    }

    let blocks = interleave_blocks(blocks, rng);
    log_info!(
        "Generated study plan with {} blocks (topic limit {})",
        blocks.len(),
        limit
    );

    StudyPlan {
        generated_at: now,
        week_start: today,
        exam_date,
        days_until_exam,
        blocks,
    }
}

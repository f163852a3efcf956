//! Template adjustments driven by the topic's error diagnosis and by review dates
//! coming from the source platform.

use chrono::NaiveDate;

use crate::models::{ActivityType, ErrorRecord, ErrorType, ErrorTypeCounts, QuestionBank, StrategyTag};
use crate::scheduler::config::SchedulerConfig;
use crate::scheduler::templates::SessionTemplate;
use crate::utils::time::calendar_days_until;

fn coaching_message(error_type: ErrorType) -> &'static str {
    match error_type {
        ErrorType::Time => {
            "Strategy coaching: timed question blocks to build pacing, wider spacing between sessions"
        }
        _ => "Strategy coaching: work each stem systematically before committing to an answer",
    }
}

/// Remediation strategy for a topic: the dominant type's, else the plurality type's.
pub fn strategy_for(counts: &ErrorTypeCounts, config: &SchedulerConfig) -> StrategyTag {
    counts
        .dominant_at_least(config.dominant_type_threshold)
        .or_else(|| counts.plurality())
        .map(StrategyTag::for_error_type)
        .unwrap_or(StrategyTag::KnowledgeReview)
}

/// Adjust the interval template when one error type dominates.
pub fn adapt_to_error_type(
    sessions: Vec<SessionTemplate>,
    counts: &ErrorTypeCounts,
    config: &SchedulerConfig,
) -> Vec<SessionTemplate> {
    let Some(dominant) = counts.dominant_at_least(config.dominant_type_threshold) else {
        return sessions;
    };

    match dominant {
        ErrorType::Knowledge => sessions
            .into_iter()
            .enumerate()
            .map(|(i, mut s)| {
                if i < 2 {
                    s.activity = ActivityType::Review;
                }
                s
            })
            .collect(),
        ErrorType::Reasoning => sessions
            .into_iter()
            .map(|mut s| {
                if s.activity == ActivityType::Review {
                    s.activity = ActivityType::Practice;
                }
                s
            })
            .collect(),
        ErrorType::Process | ErrorType::Time => sessions
            .into_iter()
            .step_by(2)
            .map(|mut s| {
                s.duration_minutes =
                    s.duration_minutes.saturating_add(config.coaching_extra_minutes);
                s.rationale = coaching_message(dominant).to_string();
                s
            })
            .collect(),
    }
}

/// The source-platform review that should shape this topic's plan: the soonest
/// upcoming one, else the most recent one inside the post-review window.
fn nearest_external_review(
    topic_errors: &[&ErrorRecord],
    today: NaiveDate,
    config: &SchedulerConfig,
) -> Option<(i64, QuestionBank)> {
    topic_errors
        .iter()
        .filter_map(|e| {
            let source = e.source.as_ref()?;
            let next = source.next_review?;
            let days = calendar_days_until(next.date_naive(), today);
            let oldest = config.post_review_window_days.saturating_neg();
            (days >= oldest).then_some((days, source.bank))
        })
        .min_by_key(|(days, _)| (*days < 0, days.abs()))
}

fn day_phrase(days: i64) -> String {
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{days} days")
    }
}

/// Re-time sessions around the source platform's own review of this material.
pub fn align_with_external_review(
    mut sessions: Vec<SessionTemplate>,
    topic_errors: &[&ErrorRecord],
    today: NaiveDate,
    config: &SchedulerConfig,
) -> Vec<SessionTemplate> {
    if sessions.is_empty() {
        return sessions;
    }
    let Some((days, bank)) = nearest_external_review(topic_errors, today, config) else {
        return sessions;
    };
    let platform = bank.display_name();

    if days == 0 {
        sessions[0].rationale =
            format!("Urgent: your {platform} review is due today, reinforce this first");
        return sessions;
    }
    if days < 0 {
        sessions[0].rationale =
            format!("Post-review reinforcement: consolidate after your recent {platform} review");
        return sessions;
    }

    // Review lands on plan day `days + 1`; aim for the day before it.
    let review_day = days + 1;
    if review_day > i64::from(config.plan_days) {
        return sessions;
    }
    let target = days.max(1) as u32;
    let lead = review_day - i64::from(target);
    let rationale = format!(
        "Timed {} before your {platform} review to reinforce it right before it is tested",
        day_phrase(lead)
    );

    if let Some(existing) = sessions.iter_mut().find(|s| s.day == target) {
        existing.rationale = rationale;
        return sessions;
    }

    let closest = sessions
        .iter()
        .enumerate()
        .min_by_key(|(_, s)| (i64::from(s.day) - i64::from(target)).abs())
        .map(|(i, _)| i)
        .unwrap_or(0);
    sessions[closest].day = target;
    sessions[closest].rationale = rationale;
    sessions.sort_by_key(|s| s.day);
    sessions
}

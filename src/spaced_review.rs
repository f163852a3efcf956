//! Single-record review date, positioned around the source platform's own review
//! when one is known.

use chrono::{DateTime, Duration, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::models::{Confidence, ErrorRecord, ErrorType, SpacedReview};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ReviewConfig {
    pub very_low_hours: i64,
    pub low_hours: i64,
    pub moderate_hours: i64,
    pub high_hours: i64,
    /// Interval multiplier for knowledge errors.
    pub knowledge_factor: f64,
    /// Interval multiplier for time-pressure errors.
    pub time_factor: f64,
    /// How far ahead of the platform's review to schedule ours.
    pub lead_hours: i64,
}

/// One year; longer intervals are treated as misconfiguration.
const MAX_INTERVAL_HOURS: i64 = 24 * 365;
const MAX_FACTOR: f64 = 10.0;

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            very_low_hours: 24,
            low_hours: 48,
            moderate_hours: 84,
            high_hours: 168,
            knowledge_factor: 0.8,
            time_factor: 1.2,
            lead_hours: 24,
        }
    }
}

impl ReviewConfig {
    /// Out-of-range fields reset to their defaults.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        for (name, value, default) in [
            ("veryLowHours", &mut self.very_low_hours, defaults.very_low_hours),
            ("lowHours", &mut self.low_hours, defaults.low_hours),
            ("moderateHours", &mut self.moderate_hours, defaults.moderate_hours),
            ("highHours", &mut self.high_hours, defaults.high_hours),
        ] {
            if !(1..=MAX_INTERVAL_HOURS).contains(&*value) {
                warn!("{name} {value} outside 1..={MAX_INTERVAL_HOURS}; using {default}");
                *value = default;
            }
        }
        if !(0..=MAX_INTERVAL_HOURS).contains(&self.lead_hours) {
            warn!(
                "leadHours {} outside 0..={MAX_INTERVAL_HOURS}; using {}",
                self.lead_hours, defaults.lead_hours
            );
            self.lead_hours = defaults.lead_hours;
        }
        for (name, value, default) in [
            ("knowledgeFactor", &mut self.knowledge_factor, defaults.knowledge_factor),
            ("timeFactor", &mut self.time_factor, defaults.time_factor),
        ] {
            if !(value.is_finite() && *value > 0.0 && *value <= MAX_FACTOR) {
                warn!("{name} {value} outside (0, {MAX_FACTOR}]; using {default}");
                *value = default;
            }
        }

        self
    }

    fn base_hours(&self, confidence: Confidence) -> i64 {
        match confidence {
            Confidence::VeryLow => self.very_low_hours,
            Confidence::Low => self.low_hours,
            Confidence::Moderate => self.moderate_hours,
            Confidence::High => self.high_hours,
        }
    }
}

fn confidence_phrase(confidence: Confidence) -> &'static str {
    match confidence {
        Confidence::VeryLow => "very low confidence",
        Confidence::Low => "low confidence",
        Confidence::Moderate => "moderate confidence",
        Confidence::High => "high confidence",
    }
}

fn describe_hours(hours: i64) -> String {
    if hours % 24 == 0 {
        let days = hours / 24;
        if days == 1 {
            "1 day".to_string()
        } else {
            format!("{days} days")
        }
    } else {
        format!("{hours} hours")
    }
}

fn external_review(
    record: &ErrorRecord,
    now: DateTime<Utc>,
    config: &ReviewConfig,
) -> Option<SpacedReview> {
    let source = record.source.as_ref()?;
    let next = source.next_review?;
    if next < now {
        return None;
    }

    let platform = source.bank.display_name();
    let days_out = (next - now).num_days();
    let target = Duration::try_hours(config.lead_hours)
        .and_then(|lead| next.checked_sub_signed(lead))
        .unwrap_or(now);

    let (review_at, reason) = if target <= now {
        (
            now,
            format!("Your {platform} review is less than a day away, so review this now"),
        )
    } else {
        (
            target,
            format!(
                "Scheduled {} before your {platform} review, which is {} away",
                describe_hours(config.lead_hours),
                describe_hours(days_out.max(1) * 24)
            ),
        )
    };

    Some(SpacedReview {
        record_id: record.id.clone(),
        review_at,
        reason,
        externally_driven: true,
    })
}

/// Ideal next review for `record`. Never earlier than `now`.
pub fn calculate_spaced_review(
    record: &ErrorRecord,
    now: DateTime<Utc>,
    config: &ReviewConfig,
) -> SpacedReview {
    if let Some(review) = external_review(record, now, config) {
        return review;
    }

    let base = config.base_hours(record.confidence);
    let (hours, adjustment) = match record.error_type {
        ErrorType::Knowledge => (
            (base as f64 * config.knowledge_factor).round() as i64,
            ", shortened because it is a knowledge gap",
        ),
        ErrorType::Time => (
            (base as f64 * config.time_factor).round() as i64,
            ", extended because the miss was about pacing",
        ),
        ErrorType::Reasoning | ErrorType::Process => (base, ""),
    };

    let review_at = Duration::try_hours(hours)
        .and_then(|interval| record.timestamp.checked_add_signed(interval))
        .map_or(now, |due| due.max(now));
    let reason = format!(
        "Review after {} for {}{}",
        describe_hours(hours),
        confidence_phrase(record.confidence),
        adjustment
    );

    SpacedReview {
        record_id: record.id.clone(),
        review_at,
        reason,
        externally_driven: false,
    }
}

use chrono::{DateTime, Duration, Utc};

use crate::analytics::config::AnalyticsConfig;
use crate::blueprint::{self, BlueprintSystem};
use crate::models::{
    CognitiveBreakdown, CognitiveLevel, ErrorRecord, ErrorTypeCounts, SystemBreakdown, Trend,
};
use crate::{log_debug, log_warn};

const ENABLE_LOGS: bool = true;

/// Compare the recent window against the one before it.
///
/// With no previous-window errors, any recent error counts as worsening.
pub fn classify_trend(recent: u32, previous: u32, config: &AnalyticsConfig) -> Trend {
    if previous == 0 {
        return if recent > 0 {
            Trend::Worsening
        } else {
            Trend::Stable
        };
    }

    let change = (f64::from(recent) - f64::from(previous)) / f64::from(previous);
    if change < -config.trend_change_threshold {
        Trend::Improving
    } else if change > config.trend_change_threshold {
        Trend::Worsening
    } else {
        Trend::Stable
    }
}

fn percent(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    f64::from(part) / f64::from(whole) * 100.0
}

fn breakdown_for(
    system: &BlueprintSystem,
    errors: &[&ErrorRecord],
    now: DateTime<Utc>,
    config: &AnalyticsConfig,
) -> SystemBreakdown {
    // A window reaching past the representable range starts at the earliest instant.
    let window = Duration::try_days(config.trend_window_days.max(0));
    let recent_start = window
        .and_then(|w| now.checked_sub_signed(w))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    let previous_start = window
        .and_then(|w| recent_start.checked_sub_signed(w))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);

    let mut cognitive = CognitiveBreakdown::default();
    let mut error_types = ErrorTypeCounts::default();
    let mut recent_count = 0;
    let mut previous_count = 0;

    for error in errors {
        error_types.increment(error.error_type);

        match error.cognitive_level {
            Some(CognitiveLevel::FirstOrder) => cognitive.first_order += 1,
            Some(CognitiveLevel::HigherOrder) => cognitive.higher_order += 1,
            None => cognitive.unclassified += 1,
        }

        if error.timestamp > recent_start && error.timestamp <= now {
            recent_count += 1;
        } else if error.timestamp > previous_start && error.timestamp <= recent_start {
            previous_count += 1;
        }
    }

    let classified = cognitive.first_order + cognitive.higher_order;
    cognitive.first_order_percent = percent(cognitive.first_order, classified);
    cognitive.higher_order_percent = percent(cognitive.higher_order, classified);

    SystemBreakdown {
        system_id: system.id.to_string(),
        name: system.name.to_string(),
        total_errors: errors.len() as u32,
        exam_weight_multiplier: system.multiplier(),
        exam_weight_percent: system.percent,
        cognitive,
        error_types,
        trend: classify_trend(recent_count, previous_count, config),
        recent_count,
        previous_count,
    }
}

/// One breakdown per catalog system, in catalog order, including empty systems.
pub fn all_system_breakdowns(
    errors: &[ErrorRecord],
    now: DateTime<Utc>,
    config: &AnalyticsConfig,
) -> Vec<SystemBreakdown> {
    let mut buckets: Vec<Vec<&ErrorRecord>> = vec![Vec::new(); blueprint::SYSTEMS.len()];

    for error in errors {
        if let Err(err) = error.validate() {
            log_warn!("Excluding malformed error record from analytics: {err}");
            continue;
        }
        let Some(system) = blueprint::resolve_system(&error.system) else {
            log_debug!("System '{}' is not in the blueprint catalog", error.system);
            continue;
        };
        if let Some(slot) = blueprint::SYSTEMS.iter().position(|s| s.id == system.id) {
            buckets[slot].push(error);
        }
    }

    blueprint::SYSTEMS
        .iter()
        .zip(buckets)
        .map(|(system, bucket)| breakdown_for(system, &bucket, now, config))
        .collect()
}

/// Systems with at least one error, most errors first.
pub fn analyze_systems(
    errors: &[ErrorRecord],
    now: DateTime<Utc>,
    config: &AnalyticsConfig,
) -> Vec<SystemBreakdown> {
    let mut breakdowns: Vec<SystemBreakdown> = all_system_breakdowns(errors, now, config)
        .into_iter()
        .filter(|b| b.total_errors > 0)
        .collect();
    breakdowns.sort_by(|a, b| b.total_errors.cmp(&a.total_errors));
    breakdowns
}

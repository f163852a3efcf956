use log::warn;
use serde::{Deserialize, Serialize};

const MAX_PLAN_DAYS: u32 = 365;
const MAX_EXTRA_MINUTES: u32 = 120;
const MAX_WINDOW_DAYS: i64 = 365;

/// Configuration for plan generation with tunable thresholds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SchedulerConfig {
    /// Share of a topic's errors one type needs before the template is adapted.
    pub dominant_type_threshold: f64,

    /// Extra minutes per session for process/time-dominant topics.
    pub coaching_extra_minutes: u32,

    /// Topic limits by days until the exam: beyond `exam_far_days` (or no date)
    /// uses `topics_default`; the limit grows as the exam gets closer.
    pub exam_far_days: i64,
    pub exam_near_days: i64,
    pub exam_final_days: i64,
    pub topics_default: usize,
    pub topics_far: usize,
    pub topics_near: usize,
    pub topics_final: usize,

    /// How far back a passed external review still shapes the plan.
    pub post_review_window_days: i64,

    /// Last day offset a plan covers.
    pub plan_days: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            dominant_type_threshold: 0.6,
            coaching_extra_minutes: 5,
            exam_far_days: 90,
            exam_near_days: 30,
            exam_final_days: 7,
            topics_default: 8,
            topics_far: 10,
            topics_near: 12,
            topics_final: 15,
            post_review_window_days: 7,
            plan_days: 14,
        }
    }
}

impl SchedulerConfig {
    /// Out-of-range fields reset to their defaults.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if !(1..=MAX_PLAN_DAYS).contains(&self.plan_days) {
            warn!(
                "planDays {} outside 1..={MAX_PLAN_DAYS}; using {}",
                self.plan_days, defaults.plan_days
            );
            self.plan_days = defaults.plan_days;
        }
        if self.coaching_extra_minutes > MAX_EXTRA_MINUTES {
            warn!(
                "coachingExtraMinutes {} above {MAX_EXTRA_MINUTES}; using {}",
                self.coaching_extra_minutes, defaults.coaching_extra_minutes
            );
            self.coaching_extra_minutes = defaults.coaching_extra_minutes;
        }
        if !(0..=MAX_WINDOW_DAYS).contains(&self.post_review_window_days) {
            warn!(
                "postReviewWindowDays {} outside 0..={MAX_WINDOW_DAYS}; using {}",
                self.post_review_window_days, defaults.post_review_window_days
            );
            self.post_review_window_days = defaults.post_review_window_days;
        }
        if !(self.dominant_type_threshold.is_finite()
            && (0.0..=1.0).contains(&self.dominant_type_threshold))
        {
            warn!(
                "dominantTypeThreshold {} outside 0..=1; using {}",
                self.dominant_type_threshold, defaults.dominant_type_threshold
            );
            self.dominant_type_threshold = defaults.dominant_type_threshold;
        }
        if !(self.exam_final_days <= self.exam_near_days && self.exam_near_days <= self.exam_far_days)
        {
            warn!("Exam proximity boundaries are out of order; using defaults");
            self.exam_final_days = defaults.exam_final_days;
            self.exam_near_days = defaults.exam_near_days;
            self.exam_far_days = defaults.exam_far_days;
        }

        self
    }
}

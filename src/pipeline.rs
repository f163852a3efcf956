//! End-to-end pass: records → patterns → priorities → plan.

use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use serde::Serialize;

use crate::insights::aggregate_patterns;
use crate::models::{ErrorRecord, PriorityScore, StudyPlan, TopicPattern};
use crate::priority::calculate_all_priorities;
use crate::scheduler::generate_study_plan;
use crate::settings::UserSettings;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineOutput {
    pub patterns: Vec<TopicPattern>,
    pub priorities: Vec<PriorityScore>,
    pub plan: StudyPlan,
}

pub fn run_pipeline<R: Rng + ?Sized>(
    errors: &[ErrorRecord],
    exam_date: Option<NaiveDate>,
    now: DateTime<Utc>,
    settings: &UserSettings,
    rng: &mut R,
) -> PipelineOutput {
    let patterns = aggregate_patterns(errors);
    let priorities = calculate_all_priorities(&patterns, errors, now, &settings.priority);
    let plan = generate_study_plan(
        &priorities,
        &patterns,
        errors,
        exam_date,
        now,
        &settings.scheduler,
        rng,
    );

    PipelineOutput {
        patterns,
        priorities,
        plan,
    }
}

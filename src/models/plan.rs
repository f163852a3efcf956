use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{ErrorType, Urgency};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Retrieval,
    Review,
    Practice,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Retrieval => "retrieval",
            ActivityType::Review => "review",
            ActivityType::Practice => "practice",
        }
    }
}

/// Remediation technique matched to the error diagnosis.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyTag {
    KnowledgeReview,
    PracticeProblems,
    StrategyCoaching,
}

impl StrategyTag {
    pub fn for_error_type(error_type: ErrorType) -> Self {
        match error_type {
            ErrorType::Knowledge => StrategyTag::KnowledgeReview,
            ErrorType::Reasoning => StrategyTag::PracticeProblems,
            ErrorType::Process | ErrorType::Time => StrategyTag::StrategyCoaching,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyTag::KnowledgeReview => "knowledge-review",
            StrategyTag::PracticeProblems => "practice-problems",
            StrategyTag::StrategyCoaching => "strategy-coaching",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StudyBlock {
    /// Day offset from plan start, 1..=14.
    pub day: u32,
    pub topic: String,
    pub system: String,
    pub activity: ActivityType,
    pub duration_minutes: u32,
    pub priority_rank: usize,
    pub reasoning: String,
    pub urgency: Urgency,
    pub strategy: StrategyTag,
    pub why_scheduled: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlan {
    pub generated_at: DateTime<Utc>,
    pub week_start: NaiveDate,
    pub exam_date: Option<NaiveDate>,
    pub days_until_exam: Option<i64>,
    pub blocks: Vec<StudyBlock>,
}

impl StudyPlan {
    pub fn blocks_for_day(&self, day: u32) -> impl Iterator<Item = &StudyBlock> {
        self.blocks.iter().filter(move |b| b.day == day)
    }

    pub fn total_minutes(&self) -> u32 {
        self.blocks.iter().map(|b| b.duration_minutes).sum()
    }

    pub fn topic_count(&self) -> usize {
        let mut keys: Vec<(&str, &str)> = self
            .blocks
            .iter()
            .map(|b| (b.system.as_str(), b.topic.as_str()))
            .collect();
        keys.sort_unstable();
        keys.dedup();
        keys.len()
    }
}

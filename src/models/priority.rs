use serde::{Deserialize, Serialize};

/// Seven normalized sub-scores, each in [0, 1].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PriorityFactors {
    pub frequency: f64,
    pub exam_weight: f64,
    pub recency: f64,
    pub low_confidence: f64,
    pub time_pressure: f64,
    pub difficulty: f64,
    pub performance_gap: f64,
}

impl PriorityFactors {
    pub fn as_array(&self) -> [f64; 7] {
        [
            self.frequency,
            self.exam_weight,
            self.recency,
            self.low_confidence,
            self.time_pressure,
            self.difficulty,
            self.performance_gap,
        ]
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Moderate,
    High,
    Urgent,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Low => "low",
            Urgency::Moderate => "moderate",
            Urgency::High => "high",
            Urgency::Urgent => "urgent",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PriorityScore {
    pub topic: String,
    pub system: String,
    /// Composite score in [0, 100] after the source-quality multiplier.
    pub score: f64,
    /// 1-based position after sorting; 0 until ranked.
    pub rank: usize,
    pub urgency: Urgency,
    pub reasons: Vec<String>,
    pub reason_chip: String,
    pub factors: PriorityFactors,
}

use serde::{Deserialize, Serialize};

/// Composite score weights. Defaults sum to 1.0.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct FactorWeights {
    pub frequency: f64,
    pub exam_weight: f64,
    pub recency: f64,
    pub low_confidence: f64,
    pub time_pressure: f64,
    pub difficulty: f64,
    pub performance_gap: f64,
}

impl Default for FactorWeights {
    fn default() -> Self {
        Self {
            frequency: 0.25,
            exam_weight: 0.20,
            recency: 0.15,
            low_confidence: 0.15,
            time_pressure: 0.10,
            difficulty: 0.10,
            performance_gap: 0.05,
        }
    }
}

impl FactorWeights {
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

    pub fn sum(&self) -> f64 {
        self.as_array().iter().sum()
    }
}

/// Strong / moderate cutoffs for one factor's plain-language reason.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReasonThreshold {
    pub strong: f64,
    pub moderate: f64,
}

impl ReasonThreshold {
    const fn new(strong: f64, moderate: f64) -> Self {
        Self { strong, moderate }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ReasonThresholds {
    pub frequency: ReasonThreshold,
    pub exam_weight: ReasonThreshold,
    pub recency: ReasonThreshold,
    pub low_confidence: ReasonThreshold,
    pub time_pressure: ReasonThreshold,
    pub difficulty: ReasonThreshold,
    pub performance_gap: ReasonThreshold,
}

impl Default for ReasonThresholds {
    fn default() -> Self {
        Self {
            frequency: ReasonThreshold::new(0.7, 0.4),
            exam_weight: ReasonThreshold::new(0.7, 0.5),
            recency: ReasonThreshold::new(0.8, 0.5),
            low_confidence: ReasonThreshold::new(0.6, 0.3),
            time_pressure: ReasonThreshold::new(0.5, 0.25),
            difficulty: ReasonThreshold::new(0.6, 0.4),
            performance_gap: ReasonThreshold::new(0.7, 0.5),
        }
    }
}

/// Configuration for priority scoring with tunable thresholds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PriorityConfig {
    pub weights: FactorWeights,

    /// Urgency cutoffs on the 0..=100 score.
    pub urgent_threshold: f64,
    pub high_threshold: f64,
    pub moderate_threshold: f64,

    /// A type must exceed this share of a topic's errors to add a type reason.
    pub dominant_type_threshold: f64,

    /// Exam weight for systems missing from the blueprint catalog.
    pub neutral_exam_weight: f64,

    /// Recency: `e^(-decay_rate * days)`, never below `recency_floor`,
    /// and exactly the floor from `recency_horizon_days` on.
    pub recency_decay_rate: f64,
    pub recency_floor: f64,
    pub recency_horizon_days: i64,

    pub reasons: ReasonThresholds,

    /// Chip shown when no factor is notable.
    pub fallback_reason: String,
    pub max_chip_reasons: usize,
}

impl Default for PriorityConfig {
    fn default() -> Self {
        Self {
            weights: FactorWeights::default(),
            urgent_threshold: 80.0,
            high_threshold: 60.0,
            moderate_threshold: 40.0,
            dominant_type_threshold: 0.6,
            neutral_exam_weight: 0.5,
            recency_decay_rate: 0.1,
            recency_floor: 0.1,
            recency_horizon_days: 30,
            reasons: ReasonThresholds::default(),
            fallback_reason: "steady review".into(),
            max_chip_reasons: 3,
        }
    }
}

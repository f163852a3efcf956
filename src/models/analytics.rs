use serde::{Deserialize, Serialize};

use super::ErrorTypeCounts;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Stable,
    Worsening,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Improving => "improving",
            Trend::Stable => "stable",
            Trend::Worsening => "worsening",
        }
    }
}

/// First-order vs higher-order split. Percentages use only classified errors.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CognitiveBreakdown {
    pub first_order: u32,
    pub higher_order: u32,
    pub unclassified: u32,
    pub first_order_percent: f64,
    pub higher_order_percent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SystemBreakdown {
    pub system_id: String,
    pub name: String,
    pub total_errors: u32,
    pub exam_weight_multiplier: f64,
    pub exam_weight_percent: f64,
    pub cognitive: CognitiveBreakdown,
    pub error_types: ErrorTypeCounts,
    pub trend: Trend,
    pub recent_count: u32,
    pub previous_count: u32,
}

use log::warn;
use serde::{Deserialize, Serialize};

const MAX_WINDOW_DAYS: i64 = 3650;

/// Trend windows for per-system analytics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalyticsConfig {
    /// Length of the recent and the previous window, in days.
    pub trend_window_days: i64,

    /// Relative change that counts as improving or worsening.
    pub trend_change_threshold: f64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            trend_window_days: 7,
            trend_change_threshold: 0.10,
        }
    }
}

impl AnalyticsConfig {
    /// Out-of-range fields reset to their defaults.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if !(1..=MAX_WINDOW_DAYS).contains(&self.trend_window_days) {
            warn!(
                "trendWindowDays {} outside 1..={MAX_WINDOW_DAYS}; using {}",
                self.trend_window_days, defaults.trend_window_days
            );
            self.trend_window_days = defaults.trend_window_days;
        }
        if !(self.trend_change_threshold.is_finite() && self.trend_change_threshold >= 0.0) {
            warn!(
                "trendChangeThreshold {} must be a non-negative number; using {}",
                self.trend_change_threshold, defaults.trend_change_threshold
            );
            self.trend_change_threshold = defaults.trend_change_threshold;
        }

        self
    }
}

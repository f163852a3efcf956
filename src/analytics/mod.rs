pub mod config;
pub mod systems;

pub use config::AnalyticsConfig;
pub use systems::{all_system_breakdowns, analyze_systems, classify_trend};

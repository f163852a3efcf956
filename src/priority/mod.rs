pub mod config;
pub mod ranking;
pub mod reasons;
pub mod scoring;

pub use config::{FactorWeights, PriorityConfig};
pub use ranking::{calculate_all_priorities, calculate_priority};

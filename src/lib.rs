pub mod analytics;
pub mod blueprint;
mod cli;
pub mod db;
pub mod insights;
pub mod models;
pub mod pipeline;
pub mod priority;
pub mod scheduler;
pub mod settings;
pub mod spaced_review;
mod utils;

use clap::Parser;

pub use analytics::{all_system_breakdowns, analyze_systems, AnalyticsConfig};
pub use db::Database;
pub use insights::aggregate_patterns;
pub use models::{
    ErrorRecord, PriorityScore, StudyBlock, StudyPlan, SystemBreakdown, TopicPattern,
};
pub use pipeline::{run_pipeline, PipelineOutput};
pub use priority::{calculate_all_priorities, calculate_priority, PriorityConfig};
pub use scheduler::{generate_study_plan, parse_exam_date, SchedulerConfig};
pub use settings::{SettingsStore, UserSettings};
pub use spaced_review::{calculate_spaced_review, ReviewConfig};

/// Command-line entry point.
pub fn run() -> anyhow::Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = cli::Cli::parse();
    log::debug!("studyplan starting with data dir {}", cli.data_dir.display());

    cli::execute(cli)
}

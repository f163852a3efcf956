pub mod adapt;
pub mod config;
pub mod interleave;
pub mod plan;
pub mod templates;

pub use config::SchedulerConfig;
pub use plan::{generate_study_plan, parse_exam_date, topic_limit};

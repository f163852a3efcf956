pub mod analytics;
pub mod error_record;
pub mod pattern;
pub mod plan;
pub mod priority;
pub mod review;

pub use analytics::{CognitiveBreakdown, SystemBreakdown, Trend};
pub use error_record::{
    CognitiveLevel, Confidence, ErrorRecord, ErrorType, ExternalSource, ItemDifficulty,
    QuestionBank, RecordError,
};
pub use pattern::{ErrorTypeCounts, TopicPattern};
pub use plan::{ActivityType, StrategyTag, StudyBlock, StudyPlan};
pub use priority::{PriorityFactors, PriorityScore, Urgency};
pub use review::SpacedReview;

//! Interval templates per urgency tier.
//!
//! Higher urgency means more, earlier, and longer exposures.

use crate::models::{ActivityType, Urgency};

#[derive(Debug, Clone, PartialEq)]
pub struct SessionTemplate {
    pub day: u32,
    pub activity: ActivityType,
    pub duration_minutes: u32,
    pub rationale: String,
}

fn session(day: u32, activity: ActivityType, duration_minutes: u32, rationale: &str) -> SessionTemplate {
    SessionTemplate {
        day,
        activity,
        duration_minutes,
        rationale: rationale.to_string(),
    }
}

pub fn template_for(urgency: Urgency) -> Vec<SessionTemplate> {
    use ActivityType::{Practice, Retrieval, Review};

    match urgency {
        Urgency::Urgent => vec![
            session(1, Retrieval, 30, "Immediate retrieval: find out what you can recall unaided"),
            session(2, Review, 25, "24h reinforcement: critical for consolidation"),
            session(3, Practice, 25, "Apply the concept while it is still fresh"),
            session(5, Retrieval, 20, "Short-gap retrieval strengthens the memory trace"),
            session(7, Review, 20, "One-week consolidation check"),
            session(10, Practice, 15, "Spaced practice to test transfer to new questions"),
            session(14, Retrieval, 15, "Two-week retention check"),
        ],
        Urgency::High => vec![
            session(1, Retrieval, 25, "Immediate retrieval to surface gaps"),
            session(3, Practice, 20, "Early practice before forgetting sets in"),
            session(7, Review, 20, "One-week consolidation check"),
            session(14, Retrieval, 15, "Two-week retention check"),
        ],
        Urgency::Moderate => vec![
            session(1, Review, 20, "Refresh the core concept"),
            session(4, Retrieval, 20, "Spaced retrieval after a few days"),
            session(10, Practice, 15, "Practice questions to confirm retention"),
        ],
        Urgency::Low => vec![
            session(1, Review, 15, "Quick refresher"),
            session(7, Retrieval, 15, "One-week retrieval check"),
        ],
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ideal next review for a single error record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpacedReview {
    pub record_id: String,
    pub review_at: DateTime<Utc>,
    pub reason: String,
    /// True when the date was positioned around the source platform's own review.
    pub externally_driven: bool,
}

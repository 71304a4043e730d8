//! Review history model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::ReviewStatus;

/// Append-only record of a submitted review decision.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ReviewEvent {
    /// Event ID.
    pub id: i64,

    /// Requirement the decision was recorded on.
    pub requirement_id: i64,

    /// Review level number.
    pub level: i64,

    /// Status: `approved`, `rejected`, or `pending` for a chain reset.
    pub status: String,

    /// Reviewer opinion (optional).
    pub opinion: Option<String>,

    /// Reviewer user ID (optional for resets).
    pub reviewer_id: Option<String>,

    /// Reviewer display name at the time of the decision.
    pub reviewer_name: Option<String>,

    /// When the decision was recorded (Unix).
    pub reviewed_at: i64,
}

impl ReviewEvent {
    /// Parse the status string into an enum.
    pub fn status_enum(&self) -> ReviewStatus {
        ReviewStatus::from(self.status.as_str())
    }
}

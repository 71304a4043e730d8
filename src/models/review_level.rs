//! Review level model for the multi-level approval chain.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::User;

/// Status of a single review level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl From<&str> for ReviewStatus {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "approved" => Self::Approved,
            "rejected" => Self::Rejected,
            _ => Self::Pending,
        }
    }
}

impl std::fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

/// A decision a reviewer can submit.
///
/// There is no `pending` decision; a level only returns to pending
/// through a chain reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDecision {
    Approved,
    Rejected,
}

impl From<ReviewDecision> for ReviewStatus {
    fn from(decision: ReviewDecision) -> Self {
        match decision {
            ReviewDecision::Approved => Self::Approved,
            ReviewDecision::Rejected => Self::Rejected,
        }
    }
}

impl std::fmt::Display for ReviewDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        ReviewStatus::from(*self).fmt(f)
    }
}

/// One stage of a requirement's sequential review chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewLevel {
    /// 1-based level number, unique within the chain.
    pub level: u32,

    /// Assigned reviewer; `None` means unassigned.
    #[serde(default)]
    pub reviewer: Option<User>,

    /// Current status of this level.
    #[serde(default)]
    pub status: ReviewStatus,

    /// Free-text opinion recorded with the decision.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opinion: Option<String>,

    /// When the decision was recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl ReviewLevel {
    /// Create a pending level with an optional reviewer.
    pub fn pending(level: u32, reviewer: Option<User>) -> Self {
        Self {
            level,
            reviewer,
            status: ReviewStatus::Pending,
            opinion: None,
            reviewed_at: None,
        }
    }

    pub fn is_approved(&self) -> bool {
        self.status == ReviewStatus::Approved
    }

    pub fn is_rejected(&self) -> bool {
        self.status == ReviewStatus::Rejected
    }
}

/// Review configuration attached to a scheduled requirement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledReview {
    #[serde(default)]
    pub review_levels: Vec<ReviewLevel>,
}

impl ScheduledReview {
    pub fn new(review_levels: Vec<ReviewLevel>) -> Self {
        Self { review_levels }
    }
}

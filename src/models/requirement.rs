//! Requirement model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{ReviewLevel, ScheduledReview};

/// Priority of a requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl From<&str> for Priority {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "low" => Self::Low,
            "high" => Self::High,
            "urgent" => Self::Urgent,
            _ => Self::Medium,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::Urgent => write!(f, "urgent"),
        }
    }
}

/// Lifecycle state of a requirement in the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementStatus {
    #[default]
    Open,
    Scheduled,
    InProgress,
    Done,
    Closed,
}

impl From<&str> for RequirementStatus {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "scheduled" => Self::Scheduled,
            "in_progress" => Self::InProgress,
            "done" => Self::Done,
            "closed" => Self::Closed,
            _ => Self::Open,
        }
    }
}

impl std::fmt::Display for RequirementStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Scheduled => write!(f, "scheduled"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Done => write!(f, "done"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// A requirement in the pool.
///
/// Note: `review_levels` is stored as a JSON string in SQLite (NULL when no
/// review has been configured) and parsed on demand.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Requirement {
    /// Local requirement ID.
    pub id: i64,

    /// Short title.
    pub title: String,

    /// Description (Markdown).
    pub description: Option<String>,

    /// Priority: `low`, `medium`, `high`, `urgent`.
    pub priority: String,

    /// Lifecycle status: `open`, `scheduled`, `in_progress`, `done`, `closed`.
    pub status: String,

    /// Target version / release this requirement is planned for.
    pub version: Option<String>,

    /// Assignee user ID.
    pub assignee: Option<String>,

    /// JSON array of review levels.
    pub review_levels: Option<String>,

    /// Creation timestamp (Unix).
    pub created_at: i64,

    /// Last update timestamp (Unix).
    pub updated_at: i64,
}

impl Requirement {
    /// Parse the priority string into an enum.
    pub fn priority_enum(&self) -> Priority {
        Priority::from(self.priority.as_str())
    }

    /// Parse the status string into an enum.
    pub fn status_enum(&self) -> RequirementStatus {
        RequirementStatus::from(self.status.as_str())
    }

    /// Parse the configured review chain.
    ///
    /// A missing or malformed column means the review is not configured.
    /// Malformed covers unparsable JSON as well as a chain with a level 0 or
    /// a level number listed twice.
    pub fn scheduled_review(&self) -> Option<ScheduledReview> {
        let raw = self.review_levels.as_deref()?;
        let levels = match serde_json::from_str::<Vec<ReviewLevel>>(raw) {
            Ok(levels) => levels,
            Err(e) => {
                log::warn!(
                    "[review] Ignoring malformed review levels on requirement {}: {}",
                    self.id,
                    e
                );
                return None;
            }
        };

        if let Err(e) = crate::review::validate_review_chain(&levels) {
            log::warn!(
                "[review] Ignoring invalid review chain on requirement {}: {}",
                self.id,
                e
            );
            return None;
        }

        Some(ScheduledReview::new(levels))
    }

    /// Review levels, empty when no review is configured.
    pub fn review_levels_vec(&self) -> Vec<ReviewLevel> {
        self.scheduled_review()
            .map(|review| review.review_levels)
            .unwrap_or_default()
    }
}

/// Input for creating a requirement.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRequirement {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: RequirementStatus,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub assignee: Option<String>,
}

/// Partial update of a requirement. Only `Some` fields are written.
///
/// Clearable columns use a nested option: `Some(None)` clears the value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub status: Option<RequirementStatus>,
    #[serde(default, with = "double_option")]
    pub version: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    pub assignee: Option<Option<String>>,
}

impl RequirementUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.status.is_none()
            && self.version.is_none()
            && self.assignee.is_none()
    }
}

/// Distinguishes an absent field from an explicit `null`.
mod double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

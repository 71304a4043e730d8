//! Status display mapping.
//!
//! Every status string resolves to exactly one label/style pair. Anything
//! unrecognized falls back to the "unknown" pair so a stray value coming out
//! of storage never breaks rendering.

use serde::Serialize;

use crate::models::{OverallStatus, ReviewStatus};

/// Visual tone of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusStyle {
    Neutral,
    Progress,
    Success,
    Danger,
    Unknown,
}

impl StatusStyle {
    /// CSS class applied to the badge.
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Neutral => "badge badge-pending",
            Self::Progress => "badge badge-progress",
            Self::Success => "badge badge-approved",
            Self::Danger => "badge badge-rejected",
            Self::Unknown => "badge badge-unknown",
        }
    }
}

/// Label and style for one status value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusDisplay {
    pub label: String,
    pub style: StatusStyle,
    pub class_name: &'static str,
}

impl StatusDisplay {
    fn new(label: impl Into<String>, style: StatusStyle) -> Self {
        Self {
            label: label.into(),
            style,
            class_name: style.css_class(),
        }
    }

    fn unknown() -> Self {
        Self::new("Unknown", StatusStyle::Unknown)
    }
}

impl OverallStatus {
    pub fn display(&self) -> StatusDisplay {
        match self {
            Self::Pending => StatusDisplay::new("Pending review", StatusStyle::Neutral),
            Self::LevelApproved(k) => {
                StatusDisplay::new(format!("Level {} approved", k), StatusStyle::Progress)
            }
            Self::LevelRejected(k) => {
                StatusDisplay::new(format!("Level {} rejected", k), StatusStyle::Danger)
            }
            Self::Approved => StatusDisplay::new("Approved", StatusStyle::Success),
        }
    }
}

impl ReviewStatus {
    pub fn display(&self) -> StatusDisplay {
        match self {
            Self::Pending => StatusDisplay::new("Pending", StatusStyle::Neutral),
            Self::Approved => StatusDisplay::new("Approved", StatusStyle::Success),
            Self::Rejected => StatusDisplay::new("Rejected", StatusStyle::Danger),
        }
    }
}

/// Resolve an overall or per-level status string.
///
/// `pending` and `approved` read the same at both granularities, so the
/// overall mapping handles them; `rejected` only exists per level.
pub fn display_for(status: &str) -> StatusDisplay {
    if let Ok(overall) = status.parse::<OverallStatus>() {
        return overall.display();
    }
    if status.trim().eq_ignore_ascii_case("rejected") {
        return ReviewStatus::Rejected.display();
    }
    StatusDisplay::unknown()
}

//! Filtering, sorting and grouping of the requirement list.
//!
//! The pool holds tens of requirements, so views are computed in memory
//! over the loaded rows rather than in SQL.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{OverallStatus, Priority, Requirement, RequirementStatus};
use crate::review;

/// Criteria for narrowing the requirement list. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequirementFilter {
    /// Case-insensitive substring of title or description.
    pub search: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<RequirementStatus>,
    pub version: Option<String>,
    pub overall_status: Option<OverallStatus>,
    /// Matches requirements where any level is assigned to this user.
    pub reviewer_id: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    UpdatedAt,
    CreatedAt,
    Title,
    Priority,
    OverallStatus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequirementSort {
    pub field: SortField,
    pub direction: SortDirection,
}

/// Requirements sharing one overall review status.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementGroup {
    pub overall_status: OverallStatus,
    pub requirements: Vec<Requirement>,
}

impl RequirementFilter {
    pub fn matches(&self, requirement: &Requirement) -> bool {
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            let in_title = requirement.title.to_lowercase().contains(&needle);
            let in_description = requirement
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle));
            if !in_title && !in_description {
                return false;
            }
        }

        if self.priority.is_some_and(|p| p != requirement.priority_enum()) {
            return false;
        }
        if self.status.is_some_and(|s| s != requirement.status_enum()) {
            return false;
        }
        if let Some(version) = &self.version {
            if requirement.version.as_ref() != Some(version) {
                return false;
            }
        }

        if self.overall_status.is_none() && self.reviewer_id.is_none() {
            return true;
        }

        let levels = requirement.review_levels_vec();
        if let Some(wanted) = self.overall_status {
            if review::derive_overall_status(&levels) != wanted {
                return false;
            }
        }
        if let Some(reviewer_id) = &self.reviewer_id {
            let assigned = levels
                .iter()
                .filter_map(|l| l.reviewer.as_ref())
                .any(|u| &u.id == reviewer_id);
            if !assigned {
                return false;
            }
        }

        true
    }
}

/// Position of a status in the review pipeline, for ordering.
fn status_rank(status: OverallStatus) -> (u8, u32) {
    match status {
        OverallStatus::Pending => (0, 0),
        OverallStatus::LevelApproved(k) => (1, k),
        OverallStatus::LevelRejected(k) => (2, k),
        OverallStatus::Approved => (3, 0),
    }
}

fn overall_of(requirement: &Requirement) -> OverallStatus {
    review::derive_overall_status(&requirement.review_levels_vec())
}

/// Filter then sort. Ties keep their incoming order.
pub fn apply_view(
    requirements: Vec<Requirement>,
    filter: &RequirementFilter,
    sort: RequirementSort,
) -> Vec<Requirement> {
    let mut visible: Vec<Requirement> = requirements
        .into_iter()
        .filter(|r| filter.matches(r))
        .collect();

    let compare = |a: &Requirement, b: &Requirement| -> Ordering {
        match sort.field {
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            SortField::Priority => a.priority_enum().cmp(&b.priority_enum()),
            SortField::OverallStatus => {
                status_rank(overall_of(a)).cmp(&status_rank(overall_of(b)))
            }
        }
    };

    visible.sort_by(|a, b| match sort.direction {
        SortDirection::Asc => compare(a, b),
        SortDirection::Desc => compare(b, a),
    });

    visible
}

/// Bucket requirements by overall review status, in pipeline order.
pub fn group_by_overall_status(requirements: Vec<Requirement>) -> Vec<RequirementGroup> {
    let mut groups: BTreeMap<(u8, u32), RequirementGroup> = BTreeMap::new();

    for requirement in requirements {
        let overall_status = overall_of(&requirement);
        groups
            .entry(status_rank(overall_status))
            .or_insert_with(|| RequirementGroup {
                overall_status,
                requirements: Vec::new(),
            })
            .requirements
            .push(requirement);
    }

    groups.into_values().collect()
}

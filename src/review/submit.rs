//! Applying a reviewer's decision to a review chain.

use chrono::{DateTime, Utc};

use super::ReviewError;
use crate::models::{ReviewDecision, ReviewLevel, User};

/// Record a decision on one level of a review chain.
///
/// Returns a new chain identical to `levels` except for the entry matching
/// `level`, which receives the decision, opinion, reviewer and timestamp.
/// The input is left untouched so callers can keep it as the fallback when
/// persisting the new chain fails.
///
/// A blank opinion is stored as `None`.
///
/// # Errors
/// [`ReviewError::LevelNotFound`] when no entry carries `level`.
pub fn submit_review(
    levels: &[ReviewLevel],
    level: u32,
    decision: ReviewDecision,
    opinion: Option<&str>,
    reviewer: &User,
    reviewed_at: DateTime<Utc>,
) -> Result<Vec<ReviewLevel>, ReviewError> {
    if !levels.iter().any(|l| l.level == level) {
        return Err(ReviewError::LevelNotFound { level });
    }

    let opinion = opinion
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string);

    Ok(levels
        .iter()
        .map(|entry| {
            if entry.level != level {
                return entry.clone();
            }
            ReviewLevel {
                level: entry.level,
                reviewer: Some(reviewer.clone()),
                status: decision.into(),
                opinion: opinion.clone(),
                reviewed_at: Some(reviewed_at),
            }
        })
        .collect())
}

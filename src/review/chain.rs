//! Review chain configuration and gating.

use std::collections::HashSet;

use super::ReviewError;
use crate::models::{ReviewLevel, ReviewStatus, User};

/// Build a fresh chain with one pending level per reviewer slot.
///
/// Levels are numbered `1..=N` in slot order; `None` leaves a level
/// unassigned.
pub fn build_review_chain(reviewers: Vec<Option<User>>) -> Vec<ReviewLevel> {
    reviewers
        .into_iter()
        .zip(1u32..)
        .map(|(reviewer, level)| ReviewLevel::pending(level, reviewer))
        .collect()
}

/// Check that level numbers start at 1 and are unique.
pub fn validate_review_chain(levels: &[ReviewLevel]) -> Result<(), ReviewError> {
    let mut seen = HashSet::with_capacity(levels.len());
    for entry in levels {
        if entry.level == 0 {
            return Err(ReviewError::InvalidLevel);
        }
        if !seen.insert(entry.level) {
            return Err(ReviewError::DuplicateLevel { level: entry.level });
        }
    }
    Ok(())
}

/// Copy of the chain with every level back to pending. Reviewers stay assigned.
pub fn reset_review_chain(levels: &[ReviewLevel]) -> Vec<ReviewLevel> {
    levels
        .iter()
        .map(|entry| ReviewLevel::pending(entry.level, entry.reviewer.clone()))
        .collect()
}

/// Status of level `k`; a level number with no entry counts as pending.
pub(crate) fn status_at(levels: &[ReviewLevel], k: u32) -> ReviewStatus {
    levels
        .iter()
        .find(|entry| entry.level == k)
        .map(|entry| entry.status)
        .unwrap_or(ReviewStatus::Pending)
}

/// Whether every level numbered below `level` is approved.
///
/// Gaps in the numbering count as pending, matching the overall status.
/// Used for display gating only; `submit_review` does not enforce it.
pub fn is_level_unlocked(levels: &[ReviewLevel], level: u32) -> bool {
    (1..level).all(|k| status_at(levels, k) == ReviewStatus::Approved)
}

/// Lowest configured level that is pending and unlocked.
///
/// `None` once the chain is fully approved, blocked by a rejection, or
/// blocked by a level number that has no entry.
pub fn next_actionable_level(levels: &[ReviewLevel]) -> Option<u32> {
    let highest = levels.iter().map(|entry| entry.level).max()?;

    for k in 1..=highest {
        match status_at(levels, k) {
            ReviewStatus::Approved => continue,
            ReviewStatus::Rejected => return None,
            ReviewStatus::Pending => {
                return levels.iter().any(|entry| entry.level == k).then_some(k);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_status(level: u32, status: ReviewStatus) -> ReviewLevel {
        ReviewLevel {
            status,
            ..ReviewLevel::pending(level, None)
        }
    }

    #[test]
    fn test_build_numbers_levels_from_one() {
        let chain = build_review_chain(vec![Some(User::new("a", "Alice")), None]);
        assert_eq!(chain.len(), 2);
        assert_eq!(chain[0].level, 1);
        assert_eq!(chain[1].level, 2);
        assert!(chain[1].reviewer.is_none());
        assert!(chain.iter().all(|l| l.status == ReviewStatus::Pending));
        assert!(validate_review_chain(&chain).is_ok());
    }

    #[test]
    fn test_validate_rejects_duplicates_and_zero() {
        let dup = vec![ReviewLevel::pending(1, None), ReviewLevel::pending(1, None)];
        assert_eq!(
            validate_review_chain(&dup),
            Err(ReviewError::DuplicateLevel { level: 1 })
        );

        let zero = vec![ReviewLevel::pending(0, None)];
        assert_eq!(validate_review_chain(&zero), Err(ReviewError::InvalidLevel));
    }

    #[test]
    fn test_reset_keeps_reviewers() {
        let alice = User::new("a", "Alice");
        let mut approved = ReviewLevel::pending(1, Some(alice.clone()));
        approved.status = ReviewStatus::Approved;
        approved.opinion = Some("ok".to_string());

        let reset = reset_review_chain(&[approved]);
        assert_eq!(reset[0], ReviewLevel::pending(1, Some(alice)));
    }

    #[test]
    fn test_gating() {
        let levels = vec![
            with_status(1, ReviewStatus::Approved),
            with_status(2, ReviewStatus::Pending),
            with_status(3, ReviewStatus::Pending),
        ];
        assert!(is_level_unlocked(&levels, 1));
        assert!(is_level_unlocked(&levels, 2));
        assert!(!is_level_unlocked(&levels, 3));
        assert_eq!(next_actionable_level(&levels), Some(2));
    }

    #[test]
    fn test_next_actionable_stops_at_rejection_and_completion() {
        let rejected = vec![
            with_status(1, ReviewStatus::Rejected),
            with_status(2, ReviewStatus::Pending),
        ];
        assert_eq!(next_actionable_level(&rejected), None);

        let done = vec![
            with_status(2, ReviewStatus::Approved),
            with_status(1, ReviewStatus::Approved),
        ];
        assert_eq!(next_actionable_level(&done), None);
        assert_eq!(next_actionable_level(&[]), None);
    }

    #[test]
    fn test_gap_in_numbering_blocks_later_levels() {
        let levels = vec![
            with_status(1, ReviewStatus::Approved),
            with_status(3, ReviewStatus::Pending),
        ];
        assert_eq!(
            crate::review::derive_overall_status(&levels),
            crate::models::OverallStatus::LevelApproved(1)
        );
        assert!(is_level_unlocked(&levels, 2));
        assert!(!is_level_unlocked(&levels, 3));
        assert_eq!(next_actionable_level(&levels), None);
    }
}

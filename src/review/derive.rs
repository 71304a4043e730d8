//! Overall status derivation.

use super::chain::status_at;
use crate::models::{OverallStatus, ReviewLevel, ReviewStatus, ScheduledReview};

/// Shortest chain that can reach `approved`.
///
/// A chain with only level 1 approved reads as `level1_approved`, so level 2
/// is always required even when it is not configured.
const MIN_REQUIRED_LEVELS: u32 = 2;

/// Derive the aggregate status of a review chain.
///
/// Levels are walked in ascending order starting at 1; a level number with
/// no entry counts as pending. The first non-approved level decides the
/// result: a rejection yields `level{k}_rejected`, a pending level yields
/// `level{k-1}_approved` (or `pending` for level 1). When every required
/// level is approved the result is `approved`.
///
/// Rejections recorded above a pending level are ignored, so `[approved,
/// pending, rejected]` reads as `level1_approved` rather than
/// `level3_rejected`. For two levels this is the same as "first rejected
/// level wins"; in longer chains an open level below a rejection takes
/// precedence.
pub fn derive_overall_status(levels: &[ReviewLevel]) -> OverallStatus {
    let Some(highest) = levels.iter().map(|l| l.level).max() else {
        return OverallStatus::Pending;
    };
    let required = highest.max(MIN_REQUIRED_LEVELS);

    for k in 1..=required {
        match status_at(levels, k) {
            ReviewStatus::Approved => continue,
            ReviewStatus::Rejected => return OverallStatus::LevelRejected(k),
            ReviewStatus::Pending if k == 1 => return OverallStatus::Pending,
            ReviewStatus::Pending => return OverallStatus::LevelApproved(k - 1),
        }
    }

    OverallStatus::Approved
}

/// Derive the aggregate status of an optional review configuration.
pub fn derive_for_review(review: Option<&ScheduledReview>) -> OverallStatus {
    review
        .map(|r| derive_overall_status(&r.review_levels))
        .unwrap_or(OverallStatus::Pending)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(statuses: &[(u32, ReviewStatus)]) -> Vec<ReviewLevel> {
        statuses
            .iter()
            .map(|(level, status)| ReviewLevel {
                status: *status,
                ..ReviewLevel::pending(*level, None)
            })
            .collect()
    }

    use crate::models::ReviewStatus::{Approved as A, Pending as P, Rejected as R};

    #[test]
    fn test_no_levels_is_pending() {
        assert_eq!(derive_overall_status(&[]), OverallStatus::Pending);
        assert_eq!(derive_for_review(None), OverallStatus::Pending);
        assert_eq!(
            derive_for_review(Some(&ScheduledReview::default())),
            OverallStatus::Pending
        );
    }

    #[test]
    fn test_level1_rejected_wins_regardless_of_level2() {
        for l2 in [A, P, R] {
            assert_eq!(
                derive_overall_status(&chain(&[(1, R), (2, l2)])),
                OverallStatus::LevelRejected(1)
            );
        }
        assert_eq!(
            derive_overall_status(&chain(&[(1, R)])),
            OverallStatus::LevelRejected(1)
        );
    }

    #[test]
    fn test_two_level_table() {
        assert_eq!(
            derive_overall_status(&chain(&[(1, A), (2, R)])),
            OverallStatus::LevelRejected(2)
        );
        assert_eq!(
            derive_overall_status(&chain(&[(1, A), (2, A)])),
            OverallStatus::Approved
        );
        assert_eq!(
            derive_overall_status(&chain(&[(1, A), (2, P)])),
            OverallStatus::LevelApproved(1)
        );
        assert_eq!(
            derive_overall_status(&chain(&[(1, A)])),
            OverallStatus::LevelApproved(1)
        );
        assert_eq!(
            derive_overall_status(&chain(&[(1, P), (2, P)])),
            OverallStatus::Pending
        );
        assert_eq!(
            derive_overall_status(&chain(&[(1, P), (2, R)])),
            OverallStatus::Pending
        );
        assert_eq!(
            derive_overall_status(&chain(&[(2, A)])),
            OverallStatus::Pending
        );
    }

    #[test]
    fn test_order_of_entries_does_not_matter() {
        assert_eq!(
            derive_overall_status(&chain(&[(2, R), (1, A)])),
            OverallStatus::LevelRejected(2)
        );
    }

    #[test]
    fn test_longer_chains() {
        assert_eq!(
            derive_overall_status(&chain(&[(1, A), (2, A), (3, P), (4, P)])),
            OverallStatus::LevelApproved(2)
        );
        assert_eq!(
            derive_overall_status(&chain(&[(1, A), (2, A), (3, R), (4, P)])),
            OverallStatus::LevelRejected(3)
        );
        assert_eq!(
            derive_overall_status(&chain(&[(1, A), (2, A), (3, A), (4, A)])),
            OverallStatus::Approved
        );
        assert_eq!(
            derive_overall_status(&chain(&[(1, A), (2, P), (3, R)])),
            OverallStatus::LevelApproved(1)
        );
    }

    #[test]
    fn test_gap_in_numbering_counts_as_pending() {
        assert_eq!(
            derive_overall_status(&chain(&[(1, A), (3, A)])),
            OverallStatus::LevelApproved(1)
        );
    }
}

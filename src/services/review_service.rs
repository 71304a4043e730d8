//! Review persistence service.
//!
//! Loads a requirement's review chain, applies the pure review logic and
//! writes the new chain together with a history event in one transaction.
//! If any step fails the transaction is dropped and the stored chain is left
//! exactly as it was.

use chrono::Utc;
use serde::Serialize;
use sqlx::{Sqlite, Transaction};

use crate::db::pool::DbPool;
use crate::db::requirements;
use crate::db::review_events::{self, NewReviewEvent};
use crate::error::AppError;
use crate::models::{OverallStatus, ReviewDecision, ReviewLevel, ReviewStatus, User};
use crate::review;

/// A reviewer's decision on one level.
#[derive(Debug, Clone)]
pub struct ReviewSubmission {
    pub level: u32,
    pub decision: ReviewDecision,
    pub opinion: Option<String>,
}

/// Review chain state after an operation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewOutcome {
    pub requirement_id: i64,
    pub review_levels: Vec<ReviewLevel>,
    pub overall_status: OverallStatus,
    /// Lowest level currently open for review.
    pub next_level: Option<u32>,
}

impl ReviewOutcome {
    pub fn from_levels(requirement_id: i64, review_levels: Vec<ReviewLevel>) -> Self {
        let overall_status = review::derive_overall_status(&review_levels);
        let next_level = review::next_actionable_level(&review_levels);
        Self {
            requirement_id,
            review_levels,
            overall_status,
            next_level,
        }
    }
}

/// Record a reviewer's decision on a requirement.
///
/// # Errors
/// - `NotFound("Requirement")` when the requirement does not exist
/// - `NotFound("ReviewLevel")` when no review is configured or the level is missing
/// - `Database` when the write fails; nothing is persisted in that case
pub async fn submit_requirement_review(
    pool: &DbPool,
    requirement_id: i64,
    submission: &ReviewSubmission,
    reviewer: &User,
) -> Result<ReviewOutcome, AppError> {
    let mut tx = pool.begin().await?;

    let requirement = requirements::get_requirement(&mut *tx, requirement_id)
        .await?
        .ok_or_else(|| AppError::not_found_with_id("Requirement", requirement_id.to_string()))?;

    let Some(scheduled) = requirement.scheduled_review() else {
        return Err(AppError::not_found_with_id(
            "ReviewLevel",
            submission.level.to_string(),
        ));
    };

    let reviewed_at = Utc::now();
    let levels = review::submit_review(
        &scheduled.review_levels,
        submission.level,
        submission.decision,
        submission.opinion.as_deref(),
        reviewer,
        reviewed_at,
    )?;

    let stored_opinion = levels
        .iter()
        .find(|l| l.level == submission.level)
        .and_then(|l| l.opinion.as_deref());

    requirements::save_review_levels(&mut *tx, requirement_id, Some(&levels)).await?;
    review_events::insert_review_event(
        &mut *tx,
        &NewReviewEvent {
            requirement_id,
            level: submission.level,
            status: submission.decision.into(),
            opinion: stored_opinion,
            reviewer: Some(reviewer),
            reviewed_at: reviewed_at.timestamp(),
        },
    )
    .await?;

    tx.commit().await?;

    let outcome = ReviewOutcome::from_levels(requirement_id, levels);
    log::info!(
        "[review] Requirement {} level {} {} by {} -> {}",
        requirement_id,
        submission.level,
        submission.decision,
        reviewer.id,
        outcome.overall_status
    );

    Ok(outcome)
}

/// Replace a requirement's review chain with fresh pending levels.
///
/// An empty reviewer list removes the review configuration entirely. Each
/// level of the old chain that had a decision gets a `pending` history event
/// attributed to `actor`, the same as a reset.
pub async fn configure_review_chain(
    pool: &DbPool,
    requirement_id: i64,
    reviewers: Vec<Option<User>>,
    actor: &User,
) -> Result<ReviewOutcome, AppError> {
    let levels = review::build_review_chain(reviewers);
    review::validate_review_chain(&levels)?;

    let mut tx = pool.begin().await?;

    let requirement = requirements::get_requirement(&mut *tx, requirement_id)
        .await?
        .ok_or_else(|| AppError::not_found_with_id("Requirement", requirement_id.to_string()))?;

    let stored = (!levels.is_empty()).then_some(levels.as_slice());
    requirements::save_review_levels(&mut *tx, requirement_id, stored).await?;
    record_discarded_decisions(&mut tx, requirement_id, &requirement.review_levels_vec(), actor)
        .await?;

    tx.commit().await?;

    log::info!(
        "[review] Configured {} review level(s) on requirement {}",
        levels.len(),
        requirement_id
    );

    Ok(ReviewOutcome::from_levels(requirement_id, levels))
}

/// Put every level of a requirement's chain back to pending.
///
/// Each level that had a decision gets a `pending` history event attributed
/// to `actor`.
pub async fn reset_review(
    pool: &DbPool,
    requirement_id: i64,
    actor: &User,
) -> Result<ReviewOutcome, AppError> {
    let mut tx = pool.begin().await?;

    let requirement = requirements::get_requirement(&mut *tx, requirement_id)
        .await?
        .ok_or_else(|| AppError::not_found_with_id("Requirement", requirement_id.to_string()))?;

    let Some(scheduled) = requirement.scheduled_review() else {
        return Err(AppError::not_found_with_id(
            "ReviewLevel",
            requirement_id.to_string(),
        ));
    };

    let levels = review::reset_review_chain(&scheduled.review_levels);
    requirements::save_review_levels(&mut *tx, requirement_id, Some(&levels)).await?;
    record_discarded_decisions(&mut tx, requirement_id, &scheduled.review_levels, actor).await?;

    tx.commit().await?;

    log::info!(
        "[review] Reset review chain on requirement {} by {}",
        requirement_id,
        actor.id
    );

    Ok(ReviewOutcome::from_levels(requirement_id, levels))
}

/// Write a `pending` event for every level of `previous` that had a decision.
async fn record_discarded_decisions(
    tx: &mut Transaction<'_, Sqlite>,
    requirement_id: i64,
    previous: &[ReviewLevel],
    actor: &User,
) -> Result<(), AppError> {
    let now = Utc::now().timestamp();
    for level in previous.iter().filter(|l| l.status != ReviewStatus::Pending) {
        review_events::insert_review_event(
            &mut **tx,
            &NewReviewEvent {
                requirement_id,
                level: level.level,
                status: ReviewStatus::Pending,
                opinion: None,
                reviewer: Some(actor),
                reviewed_at: now,
            },
        )
        .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewRequirement;
    use tempfile::tempdir;

    async fn setup_test_db() -> DbPool {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        std::mem::forget(dir);
        crate::db::initialize(&db_path).await.unwrap()
    }

    async fn requirement_with_chain(pool: &DbPool, levels: usize) -> i64 {
        let requirement = requirements::insert_requirement(
            pool,
            &NewRequirement {
                title: "Release notes page".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        configure_review_chain(pool, requirement.id, vec![None; levels], &User::new("u-admin", "Admin"))
            .await
            .unwrap();
        requirement.id
    }

    fn approve(level: u32, opinion: &str) -> ReviewSubmission {
        ReviewSubmission {
            level,
            decision: ReviewDecision::Approved,
            opinion: Some(opinion.to_string()),
        }
    }

    #[tokio::test]
    async fn test_submit_persists_chain_and_history() {
        let pool = setup_test_db().await;
        let id = requirement_with_chain(&pool, 2).await;
        let alice = User::new("u-a", "Alice");

        let outcome = submit_requirement_review(&pool, id, &approve(1, "looks good"), &alice)
            .await
            .unwrap();
        assert_eq!(outcome.overall_status, OverallStatus::LevelApproved(1));
        assert_eq!(outcome.next_level, Some(2));

        let stored = requirements::get_requirement(&pool, id)
            .await
            .unwrap()
            .unwrap()
            .review_levels_vec();
        assert_eq!(stored, outcome.review_levels);
        assert_eq!(stored[0].reviewer.as_ref(), Some(&alice));

        let history = review_events::list_review_events(&pool, id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].opinion.as_deref(), Some("looks good"));
        assert_eq!(history[0].reviewer_id.as_deref(), Some("u-a"));
    }

    #[tokio::test]
    async fn test_unknown_level_leaves_state_intact() {
        let pool = setup_test_db().await;
        let id = requirement_with_chain(&pool, 2).await;

        let before = requirements::get_requirement(&pool, id).await.unwrap().unwrap();
        let err = submit_requirement_review(&pool, id, &approve(5, "?"), &User::new("u", "U"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        let after = requirements::get_requirement(&pool, id).await.unwrap().unwrap();
        assert_eq!(before.review_levels, after.review_levels);
        assert!(review_events::list_review_events(&pool, id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_submit_without_configured_review() {
        let pool = setup_test_db().await;
        let requirement = requirements::insert_requirement(
            &pool,
            &NewRequirement {
                title: "Unscheduled".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let err = submit_requirement_review(
            &pool,
            requirement.id,
            &approve(1, "ok"),
            &User::new("u", "U"),
        )
        .await
        .unwrap_err();
        match err {
            AppError::NotFound { resource, .. } => assert_eq!(resource, "ReviewLevel"),
            other => panic!("unexpected error: {other:?}"),
        }

        let err = submit_requirement_review(&pool, 999, &approve(1, "ok"), &User::new("u", "U"))
            .await
            .unwrap_err();
        match err {
            AppError::NotFound { resource, .. } => assert_eq!(resource, "Requirement"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_reset_and_clear_configuration() {
        let pool = setup_test_db().await;
        let id = requirement_with_chain(&pool, 2).await;
        let alice = User::new("u-a", "Alice");

        submit_requirement_review(&pool, id, &approve(1, "ok"), &alice)
            .await
            .unwrap();
        let outcome = reset_review(&pool, id, &alice).await.unwrap();
        assert_eq!(outcome.overall_status, OverallStatus::Pending);
        assert_eq!(outcome.next_level, Some(1));

        let history = review_events::list_review_events(&pool, id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].status_enum(), ReviewStatus::Pending);

        let cleared = configure_review_chain(&pool, id, Vec::new(), &alice).await.unwrap();
        assert_eq!(cleared.overall_status, OverallStatus::Pending);
        let stored = requirements::get_requirement(&pool, id).await.unwrap().unwrap();
        assert!(stored.review_levels.is_none());
    }

    #[tokio::test]
    async fn test_reconfigure_records_discarded_decisions() {
        let pool = setup_test_db().await;
        let id = requirement_with_chain(&pool, 2).await;
        let alice = User::new("u-a", "Alice");
        let bob = User::new("u-b", "Bob");

        submit_requirement_review(&pool, id, &approve(1, "ok"), &alice)
            .await
            .unwrap();
        let outcome = configure_review_chain(&pool, id, vec![Some(bob.clone()); 3], &bob)
            .await
            .unwrap();
        assert_eq!(outcome.review_levels.len(), 3);
        assert_eq!(outcome.overall_status, OverallStatus::Pending);

        let history = review_events::list_review_events(&pool, id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].level, 1);
        assert_eq!(history[1].status_enum(), ReviewStatus::Pending);
        assert_eq!(history[1].reviewer_id.as_deref(), Some("u-b"));

        let err = configure_review_chain(&pool, 999, vec![None], &bob)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_duplicate_stored_levels_are_not_reviewable() {
        let pool = setup_test_db().await;
        let id = requirement_with_chain(&pool, 2).await;
        let duplicated = r#"[{"level":1,"status":"pending"},{"level":1,"status":"approved"},{"level":2,"status":"pending"}]"#;
        sqlx::query("UPDATE requirements SET review_levels = ? WHERE id = ?")
            .bind(duplicated)
            .bind(id)
            .execute(&pool)
            .await
            .unwrap();

        let err = submit_requirement_review(&pool, id, &approve(1, "ok"), &User::new("u", "U"))
            .await
            .unwrap_err();
        match err {
            AppError::NotFound { resource, .. } => assert_eq!(resource, "ReviewLevel"),
            other => panic!("unexpected error: {other:?}"),
        }

        let stored = requirements::get_requirement(&pool, id).await.unwrap().unwrap();
        assert_eq!(stored.review_levels.as_deref(), Some(duplicated));
        assert!(review_events::list_review_events(&pool, id)
            .await
            .unwrap()
            .is_empty());
    }
}

//! Review commands.
//!
//! Submitting decisions on a single requirement or a selection, reading the
//! review history and resetting a chain. The reviewer is always the current
//! user from the identity provider, never taken from the request.

use serde::Deserialize;
use tauri::State;

use crate::db::pool::DbPool;
use crate::db::{requirements, review_events};
use crate::error::AppError;
use crate::models::{ReviewDecision, ReviewEvent};
use crate::services::batch::{self, BatchReport};
use crate::services::identity::CurrentIdentity;
use crate::services::review_service::{self, ReviewOutcome, ReviewSubmission};

/// Longest accepted review opinion.
const MAX_OPINION_LEN: usize = 2000;

/// Input for submit_review command.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReviewInput {
    /// Requirement ID (local database ID).
    pub requirement_id: i64,
    /// Review level, starting at 1.
    pub level: u32,
    /// `approved` or `rejected`.
    pub status: ReviewDecision,
    #[serde(default)]
    pub opinion: Option<String>,
}

/// Input for batch_submit_review command.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReviewInput {
    pub requirement_ids: Vec<i64>,
    pub level: u32,
    pub status: ReviewDecision,
    #[serde(default)]
    pub opinion: Option<String>,
}

fn submission(
    level: u32,
    decision: ReviewDecision,
    opinion: Option<String>,
) -> Result<ReviewSubmission, AppError> {
    if level == 0 {
        return Err(AppError::invalid_input_field(
            "Review levels are numbered from 1",
            "level",
        ));
    }
    if opinion
        .as_deref()
        .is_some_and(|o| o.chars().count() > MAX_OPINION_LEN)
    {
        return Err(AppError::invalid_input_field(
            format!("Opinion must be at most {} characters", MAX_OPINION_LEN),
            "opinion",
        ));
    }

    Ok(ReviewSubmission {
        level,
        decision,
        opinion,
    })
}

/// Submit a review decision on one level of a requirement.
///
/// # Arguments
/// * `input` - Requirement, level, decision and optional opinion
///
/// # Returns
/// The updated chain and its derived overall status
///
/// # Errors
/// `NotFound` when the requirement or the level does not exist. The stored
/// chain is unchanged on any error.
#[tauri::command]
pub async fn submit_review(
    pool: State<'_, DbPool>,
    identity: State<'_, CurrentIdentity>,
    input: SubmitReviewInput,
) -> Result<ReviewOutcome, AppError> {
    let reviewer = identity.current_user()?;
    let submission = submission(input.level, input.status, input.opinion)?;

    review_service::submit_requirement_review(
        pool.inner(),
        input.requirement_id,
        &submission,
        &reviewer,
    )
    .await
}

/// Apply one review decision to several requirements.
///
/// Each requirement is updated on its own; failures are reported per item
/// and do not roll back the others.
#[tauri::command]
pub async fn batch_submit_review(
    pool: State<'_, DbPool>,
    identity: State<'_, CurrentIdentity>,
    input: BatchReviewInput,
) -> Result<BatchReport, AppError> {
    if input.requirement_ids.is_empty() {
        return Err(AppError::invalid_input_field(
            "Select at least one requirement",
            "requirementIds",
        ));
    }

    let reviewer = identity.current_user()?;
    let submission = submission(input.level, input.status, input.opinion)?;

    Ok(batch::batch_submit_review(pool.inner(), &input.requirement_ids, &submission, &reviewer).await)
}

/// Current review state of a requirement.
#[tauri::command]
pub async fn get_review_status(
    pool: State<'_, DbPool>,
    requirement_id: i64,
) -> Result<ReviewOutcome, AppError> {
    let requirement = requirements::get_requirement(pool.inner(), requirement_id)
        .await?
        .ok_or_else(|| AppError::not_found_with_id("Requirement", requirement_id.to_string()))?;

    Ok(ReviewOutcome::from_levels(
        requirement_id,
        requirement.review_levels_vec(),
    ))
}

/// Review history of a requirement, oldest first.
#[tauri::command]
pub async fn get_review_history(
    pool: State<'_, DbPool>,
    requirement_id: i64,
) -> Result<Vec<ReviewEvent>, AppError> {
    if requirements::get_requirement(pool.inner(), requirement_id)
        .await?
        .is_none()
    {
        return Err(AppError::not_found_with_id(
            "Requirement",
            requirement_id.to_string(),
        ));
    }

    review_events::list_review_events(pool.inner(), requirement_id).await
}

/// Put every level back to pending, attributed to the current user.
#[tauri::command]
pub async fn reset_review(
    pool: State<'_, DbPool>,
    identity: State<'_, CurrentIdentity>,
    requirement_id: i64,
) -> Result<ReviewOutcome, AppError> {
    let actor = identity.current_user()?;
    review_service::reset_review(pool.inner(), requirement_id, &actor).await
}

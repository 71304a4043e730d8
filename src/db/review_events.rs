//! Database queries for the review history.

use sqlx::Sqlite;

use super::pool::DbPool;
use crate::error::AppError;
use crate::models::{ReviewEvent, ReviewStatus, User};

/// Input for recording a review event.
#[derive(Debug, Clone)]
pub struct NewReviewEvent<'a> {
    pub requirement_id: i64,
    pub level: u32,
    pub status: ReviewStatus,
    pub opinion: Option<&'a str>,
    pub reviewer: Option<&'a User>,
    pub reviewed_at: i64,
}

/// Append an event to the review history.
pub async fn insert_review_event<'e, E>(executor: E, event: &NewReviewEvent<'_>) -> Result<i64, AppError>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO review_events (requirement_id, level, status, opinion, reviewer_id, reviewer_name, reviewed_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(event.requirement_id)
    .bind(i64::from(event.level))
    .bind(event.status.to_string())
    .bind(event.opinion)
    .bind(event.reviewer.map(|u| u.id.as_str()))
    .bind(event.reviewer.map(|u| u.name.as_str()))
    .bind(event.reviewed_at)
    .fetch_one(executor)
    .await?;

    Ok(id)
}

/// Review history of a requirement, oldest first.
pub async fn list_review_events(
    pool: &DbPool,
    requirement_id: i64,
) -> Result<Vec<ReviewEvent>, AppError> {
    let events = sqlx::query_as::<_, ReviewEvent>(
        r#"
        SELECT id, requirement_id, level, status, opinion, reviewer_id, reviewer_name, reviewed_at
        FROM review_events
        WHERE requirement_id = ?
        ORDER BY reviewed_at ASC, id ASC
        "#,
    )
    .bind(requirement_id)
    .fetch_all(pool)
    .await?;

    Ok(events)
}

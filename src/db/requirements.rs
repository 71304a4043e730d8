//! Database queries for requirements.

use sqlx::{QueryBuilder, Sqlite};

use super::pool::DbPool;
use crate::error::AppError;
use crate::models::{NewRequirement, Requirement, RequirementUpdate, ReviewLevel};

const REQUIREMENT_COLUMNS: &str = "id, title, description, priority, status, version, assignee, review_levels, created_at, updated_at";

/// Insert a new requirement without a review chain.
pub async fn insert_requirement(
    pool: &DbPool,
    input: &NewRequirement,
) -> Result<Requirement, AppError> {
    let now = super::now();
    let sql = format!(
        r#"
        INSERT INTO requirements (title, description, priority, status, version, assignee, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING {REQUIREMENT_COLUMNS}
        "#
    );

    let requirement = sqlx::query_as::<_, Requirement>(&sql)
        .bind(input.title.trim())
        .bind(&input.description)
        .bind(input.priority.to_string())
        .bind(input.status.to_string())
        .bind(&input.version)
        .bind(&input.assignee)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await?;

    Ok(requirement)
}

/// Look up a requirement by ID.
///
/// Accepts a pool or a transaction connection.
pub async fn get_requirement<'e, E>(executor: E, id: i64) -> Result<Option<Requirement>, AppError>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let sql = format!("SELECT {REQUIREMENT_COLUMNS} FROM requirements WHERE id = ?");
    let requirement = sqlx::query_as::<_, Requirement>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;

    Ok(requirement)
}

/// List all requirements, most recently updated first.
pub async fn list_requirements(pool: &DbPool) -> Result<Vec<Requirement>, AppError> {
    let sql = format!(
        "SELECT {REQUIREMENT_COLUMNS} FROM requirements ORDER BY updated_at DESC, id DESC"
    );
    let requirements = sqlx::query_as::<_, Requirement>(&sql)
        .fetch_all(pool)
        .await?;

    Ok(requirements)
}

/// Apply a partial update and return the updated requirement.
///
/// `updated_at` is always bumped, so an empty update acts as a touch.
pub async fn update_requirement(
    pool: &DbPool,
    id: i64,
    update: &RequirementUpdate,
) -> Result<Requirement, AppError> {
    let mut builder = QueryBuilder::<Sqlite>::new("UPDATE requirements SET ");
    let mut fields = builder.separated(", ");

    fields.push("updated_at = ").push_bind_unseparated(super::now());
    if let Some(title) = &update.title {
        fields.push("title = ").push_bind_unseparated(title.trim().to_string());
    }
    if let Some(description) = &update.description {
        fields.push("description = ").push_bind_unseparated(description.clone());
    }
    if let Some(priority) = update.priority {
        fields.push("priority = ").push_bind_unseparated(priority.to_string());
    }
    if let Some(status) = update.status {
        fields.push("status = ").push_bind_unseparated(status.to_string());
    }
    if let Some(version) = &update.version {
        fields.push("version = ").push_bind_unseparated(version.clone());
    }
    if let Some(assignee) = &update.assignee {
        fields.push("assignee = ").push_bind_unseparated(assignee.clone());
    }

    builder.push(" WHERE id = ").push_bind(id);

    let result = builder.build().execute(pool).await?;
    if result.rows_affected() == 0 {
        return Err(AppError::not_found_with_id("Requirement", id.to_string()));
    }

    get_requirement(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found_with_id("Requirement", id.to_string()))
}

/// Replace the stored review chain. `None` removes the review configuration.
pub async fn save_review_levels<'e, E>(
    executor: E,
    id: i64,
    levels: Option<&[ReviewLevel]>,
) -> Result<(), AppError>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let json = levels.map(|l| serde_json::to_string(l)).transpose()?;

    let result = sqlx::query("UPDATE requirements SET review_levels = ?, updated_at = ? WHERE id = ?")
        .bind(json)
        .bind(super::now())
        .bind(id)
        .execute(executor)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found_with_id("Requirement", id.to_string()));
    }

    Ok(())
}

/// Delete a requirement and, through the cascade, its review history.
pub async fn delete_requirement(pool: &DbPool, id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM requirements WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found_with_id("Requirement", id.to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Priority, RequirementStatus};
    use tempfile::tempdir;

    async fn setup_test_db() -> DbPool {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        // Keep the dir alive by leaking it (for test purposes)
        std::mem::forget(dir);

        crate::db::initialize(&db_path).await.unwrap()
    }

    fn new_requirement(title: &str) -> NewRequirement {
        NewRequirement {
            title: title.to_string(),
            priority: Priority::High,
            version: Some("v1.2".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let pool = setup_test_db().await;

        let created = insert_requirement(&pool, &new_requirement("  Login via SSO "))
            .await
            .unwrap();
        assert_eq!(created.title, "Login via SSO");
        assert_eq!(created.priority, "high");
        assert_eq!(created.status, "open");
        assert!(created.review_levels.is_none());

        let fetched = get_requirement(&pool, created.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.version.as_deref(), Some("v1.2"));

        assert!(get_requirement(&pool, 999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_partial_update() {
        let pool = setup_test_db().await;
        let created = insert_requirement(&pool, &new_requirement("Audit log"))
            .await
            .unwrap();

        let update = RequirementUpdate {
            status: Some(RequirementStatus::Scheduled),
            version: Some(None),
            ..Default::default()
        };
        let updated = update_requirement(&pool, created.id, &update).await.unwrap();

        assert_eq!(updated.title, "Audit log");
        assert_eq!(updated.status, "scheduled");
        assert_eq!(updated.priority, "high");
        assert!(updated.version.is_none());
    }

    #[tokio::test]
    async fn test_update_missing_requirement() {
        let pool = setup_test_db().await;
        let err = update_requirement(&pool, 42, &RequirementUpdate::default())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_save_and_clear_review_levels() {
        let pool = setup_test_db().await;
        let created = insert_requirement(&pool, &new_requirement("Dark mode"))
            .await
            .unwrap();

        let levels = vec![ReviewLevel::pending(1, None), ReviewLevel::pending(2, None)];
        save_review_levels(&pool, created.id, Some(&levels))
            .await
            .unwrap();

        let fetched = get_requirement(&pool, created.id).await.unwrap().unwrap();
        assert_eq!(fetched.review_levels_vec(), levels);

        save_review_levels(&pool, created.id, None).await.unwrap();
        let fetched = get_requirement(&pool, created.id).await.unwrap().unwrap();
        assert!(fetched.scheduled_review().is_none());

        let err = save_review_levels(&pool, 999, Some(&levels)).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_list_and_delete() {
        let pool = setup_test_db().await;
        let first = insert_requirement(&pool, &new_requirement("First"))
            .await
            .unwrap();
        insert_requirement(&pool, &new_requirement("Second"))
            .await
            .unwrap();

        assert_eq!(list_requirements(&pool).await.unwrap().len(), 2);

        delete_requirement(&pool, first.id).await.unwrap();
        let remaining = list_requirements(&pool).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].title, "Second");

        assert!(delete_requirement(&pool, first.id).await.unwrap_err().is_not_found());
    }
}

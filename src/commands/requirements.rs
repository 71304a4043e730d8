//! Requirement commands.
//!
//! CRUD over the requirement pool plus review chain configuration. List and
//! detail responses carry the derived overall status and its display pair so
//! the frontend never derives anything itself.

use serde::{Deserialize, Serialize};

use tauri::{AppHandle, Runtime, State};

use super::settings::ViewPreferences;
use crate::db::pool::DbPool;
use crate::db::requirements as store;
use crate::error::AppError;
use crate::models::{NewRequirement, OverallStatus, Requirement, RequirementUpdate, ReviewLevel, User};
use crate::review::{self, StatusDisplay};
use crate::services::identity::CurrentIdentity;
use crate::services::preference_store::{load_preference, Preference};
use crate::services::requirement_view::{self, RequirementFilter, RequirementSort};
use crate::services::review_service::{self, ReviewOutcome};

/// Longest accepted requirement title.
const MAX_TITLE_LEN: usize = 200;

/// Requirement list item with derived review state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementListItem {
    pub id: i64,
    pub title: String,
    pub priority: String,
    pub status: String,
    pub version: Option<String>,
    pub assignee: Option<String>,
    pub review_levels: Vec<ReviewLevel>,
    pub overall_status: OverallStatus,
    pub overall_display: StatusDisplay,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<Requirement> for RequirementListItem {
    fn from(requirement: Requirement) -> Self {
        let review_levels = requirement.review_levels_vec();
        let overall_status = review::derive_overall_status(&review_levels);

        Self {
            id: requirement.id,
            title: requirement.title,
            priority: requirement.priority,
            status: requirement.status,
            version: requirement.version,
            assignee: requirement.assignee,
            review_levels,
            overall_status,
            overall_display: overall_status.display(),
            created_at: requirement.created_at,
            updated_at: requirement.updated_at,
        }
    }
}

/// One level of the review chain as shown on the detail page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewLevelView {
    #[serde(flatten)]
    pub level: ReviewLevel,
    pub display: StatusDisplay,
    /// Every lower level is approved.
    pub unlocked: bool,
}

/// Full requirement detail.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementDetail {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub priority: String,
    pub status: String,
    pub version: Option<String>,
    pub assignee: Option<String>,
    /// Whether a review chain is configured.
    pub review_configured: bool,
    pub review_levels: Vec<ReviewLevelView>,
    pub overall_status: OverallStatus,
    pub overall_display: StatusDisplay,
    pub next_level: Option<u32>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<Requirement> for RequirementDetail {
    fn from(requirement: Requirement) -> Self {
        let scheduled = requirement.scheduled_review();
        let review_configured = scheduled.is_some();
        let overall_status = review::derive_for_review(scheduled.as_ref());
        let levels = scheduled.map(|s| s.review_levels).unwrap_or_default();
        let next_level = review::next_actionable_level(&levels);

        let review_levels = levels
            .iter()
            .map(|level| ReviewLevelView {
                display: level.status.display(),
                unlocked: review::is_level_unlocked(&levels, level.level),
                level: level.clone(),
            })
            .collect();

        Self {
            id: requirement.id,
            title: requirement.title,
            description: requirement.description,
            priority: requirement.priority,
            status: requirement.status,
            version: requirement.version,
            assignee: requirement.assignee,
            review_configured,
            review_levels,
            overall_status,
            overall_display: overall_status.display(),
            next_level,
            created_at: requirement.created_at,
            updated_at: requirement.updated_at,
        }
    }
}

/// Filter and sort for `list_requirements`.
///
/// When both are absent the saved list view is used.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRequirementsInput {
    #[serde(default)]
    pub filter: Option<RequirementFilter>,
    #[serde(default)]
    pub sort: Option<RequirementSort>,
}

/// Requirements bucketed by overall status.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementGroupView {
    pub overall_status: OverallStatus,
    pub display: StatusDisplay,
    pub requirements: Vec<RequirementListItem>,
}

/// Input for configure_review_chain command.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigureReviewInput {
    pub requirement_id: i64,
    /// Reviewer per level, level 1 first. Empty clears the review.
    pub reviewers: Vec<Option<User>>,
}

fn validate_title(title: &str) -> Result<(), AppError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input_field("Title must not be empty", "title"));
    }
    if trimmed.chars().count() > MAX_TITLE_LEN {
        return Err(AppError::invalid_input_field(
            format!("Title must be at most {} characters", MAX_TITLE_LEN),
            "title",
        ));
    }
    Ok(())
}

/// Create a requirement.
///
/// # Arguments
/// * `input` - Title and optional fields
///
/// # Returns
/// The stored requirement, without a review chain
#[tauri::command]
pub async fn create_requirement(
    pool: State<'_, DbPool>,
    input: NewRequirement,
) -> Result<RequirementDetail, AppError> {
    validate_title(&input.title)?;

    let requirement = store::insert_requirement(pool.inner(), &input).await?;
    log::info!(
        "[requirements] Created requirement {} \"{}\"",
        requirement.id,
        requirement.title
    );

    Ok(requirement.into())
}

/// Get a single requirement with its review chain.
#[tauri::command]
pub async fn get_requirement_detail(
    pool: State<'_, DbPool>,
    requirement_id: i64,
) -> Result<RequirementDetail, AppError> {
    let requirement = store::get_requirement(pool.inner(), requirement_id)
        .await?
        .ok_or_else(|| AppError::not_found_with_id("Requirement", requirement_id.to_string()))?;

    Ok(requirement.into())
}

fn resolve_view<R: Runtime>(
    app: &AppHandle<R>,
    input: ListRequirementsInput,
) -> (RequirementFilter, RequirementSort) {
    if input.filter.is_none() && input.sort.is_none() {
        let saved = load_preference::<ViewPreferences, R>(app).value;
        return (saved.filter, saved.sort);
    }
    (input.filter.unwrap_or_default(), input.sort.unwrap_or_default())
}

/// List requirements.
///
/// # Arguments
/// * `input` - Optional filter and sort; the saved view applies when omitted
///
/// # Returns
/// Matching requirements in view order
#[tauri::command]
pub async fn list_requirements<R: Runtime>(
    app: AppHandle<R>,
    pool: State<'_, DbPool>,
    input: Option<ListRequirementsInput>,
) -> Result<Vec<RequirementListItem>, AppError> {
    let (filter, sort) = resolve_view(&app, input.unwrap_or_default());
    if let Err(reason) = (ViewPreferences {
        filter: filter.clone(),
        sort,
    })
    .validate()
    {
        return Err(AppError::invalid_input_field(reason, "filter"));
    }

    let all = store::list_requirements(pool.inner()).await?;
    let visible = requirement_view::apply_view(all, &filter, sort);

    Ok(visible.into_iter().map(RequirementListItem::from).collect())
}

/// List requirements grouped by overall review status, in pipeline order.
#[tauri::command]
pub async fn get_requirement_groups(
    pool: State<'_, DbPool>,
    filter: Option<RequirementFilter>,
) -> Result<Vec<RequirementGroupView>, AppError> {
    let filter = filter.unwrap_or_default();
    let all = store::list_requirements(pool.inner()).await?;
    let visible = requirement_view::apply_view(all, &filter, RequirementSort::default());

    let groups = requirement_view::group_by_overall_status(visible)
        .into_iter()
        .map(|group| RequirementGroupView {
            overall_status: group.overall_status,
            display: group.overall_status.display(),
            requirements: group
                .requirements
                .into_iter()
                .map(RequirementListItem::from)
                .collect(),
        })
        .collect();

    Ok(groups)
}

/// Update requirement fields. Absent fields are left untouched.
#[tauri::command]
pub async fn update_requirement(
    pool: State<'_, DbPool>,
    requirement_id: i64,
    update: RequirementUpdate,
) -> Result<RequirementDetail, AppError> {
    if let Some(title) = &update.title {
        validate_title(title)?;
    }

    let requirement = store::update_requirement(pool.inner(), requirement_id, &update).await?;
    Ok(requirement.into())
}

/// Delete a requirement along with its review history.
#[tauri::command]
pub async fn delete_requirement(
    pool: State<'_, DbPool>,
    requirement_id: i64,
) -> Result<(), AppError> {
    store::delete_requirement(pool.inner(), requirement_id).await?;
    log::info!("[requirements] Deleted requirement {}", requirement_id);
    Ok(())
}

/// Set up (or replace) the review chain of a requirement.
///
/// Every level starts pending. Decisions on the old chain are discarded and
/// recorded in the history as reset by the current user.
#[tauri::command]
pub async fn configure_review_chain(
    pool: State<'_, DbPool>,
    identity: State<'_, CurrentIdentity>,
    input: ConfigureReviewInput,
) -> Result<ReviewOutcome, AppError> {
    let actor = identity.current_user()?;
    review_service::configure_review_chain(
        pool.inner(),
        input.requirement_id,
        input.reviewers,
        &actor,
    )
    .await
}

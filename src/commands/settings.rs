//! Settings commands for persisted UI preferences.
//!
//! Column visibility, the saved list view and the signed-in user live in the
//! preference store (tauri-plugin-store).
//!
//! Reads always succeed: invalid or missing values come back as defaults
//! with a `defaulted` source so the UI can tell the user.

use serde::{Deserialize, Serialize};
use tauri::{AppHandle, Runtime};

use crate::error::AppError;
use crate::models::User;
use crate::services::identity::SignedInUser;
use crate::services::preference_store::{load_preference, save_preference, Loaded, Preference};
use crate::services::requirement_view::{RequirementFilter, RequirementSort};

/// Key for column visibility in the store.
const COLUMNS_KEY: &str = "requirement_columns";

/// Key for the saved list view in the store.
const VIEW_KEY: &str = "requirement_view";

/// Longest accepted saved search string.
const MAX_SEARCH_LEN: usize = 200;

/// A column of the requirement table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementColumn {
    Title,
    Priority,
    Status,
    Version,
    Assignee,
    ReviewStatus,
    Level1Reviewer,
    Level2Reviewer,
    CreatedAt,
    UpdatedAt,
}

/// Visible columns, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnPreferences {
    pub visible: Vec<RequirementColumn>,
}

impl Default for ColumnPreferences {
    fn default() -> Self {
        Self {
            visible: vec![
                RequirementColumn::Title,
                RequirementColumn::Priority,
                RequirementColumn::Status,
                RequirementColumn::Version,
                RequirementColumn::ReviewStatus,
                RequirementColumn::UpdatedAt,
            ],
        }
    }
}

impl Preference for ColumnPreferences {
    const KEY: &'static str = COLUMNS_KEY;

    fn validate(&self) -> Result<(), String> {
        if !self.visible.contains(&RequirementColumn::Title) {
            return Err("the title column cannot be hidden".to_string());
        }
        let mut seen = std::collections::HashSet::new();
        if let Some(dup) = self.visible.iter().find(|c| !seen.insert(**c)) {
            return Err(format!("column {:?} listed twice", dup));
        }
        Ok(())
    }
}

/// Saved filter and sort for the requirement list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewPreferences {
    pub filter: RequirementFilter,
    pub sort: RequirementSort,
}

impl Preference for ViewPreferences {
    const KEY: &'static str = VIEW_KEY;

    fn validate(&self) -> Result<(), String> {
        if let Some(search) = &self.filter.search {
            if search.chars().count() > MAX_SEARCH_LEN {
                return Err(format!("search must be at most {} characters", MAX_SEARCH_LEN));
            }
        }
        if self.filter.version.as_deref().is_some_and(|v| v.trim().is_empty()) {
            return Err("version filter must not be blank".to_string());
        }
        Ok(())
    }
}

/// Get the visible requirement columns.
///
/// # Returns
/// Saved columns, or the defaults with the reason they were used
#[tauri::command]
pub async fn get_column_preferences<R: Runtime>(
    app: AppHandle<R>,
) -> Result<Loaded<ColumnPreferences>, AppError> {
    Ok(load_preference(&app))
}

/// Save the visible requirement columns.
///
/// # Arguments
/// * `preferences` - Columns in display order; must include the title
#[tauri::command]
pub async fn update_column_preferences<R: Runtime>(
    app: AppHandle<R>,
    preferences: ColumnPreferences,
) -> Result<(), AppError> {
    save_preference(&app, &preferences)
}

/// Get the saved requirement list view.
#[tauri::command]
pub async fn get_view_preferences<R: Runtime>(
    app: AppHandle<R>,
) -> Result<Loaded<ViewPreferences>, AppError> {
    Ok(load_preference(&app))
}

/// Save the requirement list view.
#[tauri::command]
pub async fn update_view_preferences<R: Runtime>(
    app: AppHandle<R>,
    preferences: ViewPreferences,
) -> Result<(), AppError> {
    save_preference(&app, &preferences)
}

/// Get the signed-in user, if any.
#[tauri::command]
pub async fn get_current_user<R: Runtime>(app: AppHandle<R>) -> Result<Option<User>, AppError> {
    Ok(load_preference::<SignedInUser, R>(&app).value.0)
}

/// Sign a user in for review attribution, or sign out with `None`.
#[tauri::command]
pub async fn set_current_user<R: Runtime>(
    app: AppHandle<R>,
    user: Option<User>,
) -> Result<(), AppError> {
    save_preference(&app, &SignedInUser(user))
}

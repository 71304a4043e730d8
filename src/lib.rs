//! Reqpool - Local-first requirement pool with multi-level review.
//!
//! This is the main library for the Tauri backend: SQLite storage, the review
//! chain logic and the IPC commands the frontend calls.

pub mod commands;
pub mod db;
pub mod error;
pub mod models;
pub mod review;
pub mod services;

use std::path::Path;

use tauri::{AppHandle, Manager, Runtime};

use crate::error::AppError;
use crate::services::identity::{CurrentIdentity, IdentityProvider, StoreIdentity};
use crate::services::preference_store::PreferencesPath;

/// Open the database inside `app_data_dir` and register the managed state
/// the commands read: the pool, the preference store location and the
/// current identity.
///
/// Migrations run before this returns. A missing or corrupt preference file
/// is not an error; defaults apply until the next save.
pub async fn setup_state<R: Runtime>(
    app: &AppHandle<R>,
    app_data_dir: &Path,
    identity: impl IdentityProvider + 'static,
) -> Result<(), AppError> {
    let db_path = db::get_db_path(app_data_dir);
    let pool = db::initialize(&db_path).await?;
    log::info!("[db] Database ready at {}", db_path.display());

    app.manage(pool);
    app.manage(PreferencesPath::in_dir(app_data_dir));
    app.manage(CurrentIdentity::new(identity));

    Ok(())
}

/// Builder with the store plugin and every command registered.
///
/// State is not managed here; call [`setup_state`] from the setup hook.
pub fn builder<R: Runtime>() -> tauri::Builder<R> {
    tauri::Builder::<R>::new()
        .plugin(tauri_plugin_store::Builder::new().build())
        .invoke_handler(tauri::generate_handler![
            commands::requirements::create_requirement,
            commands::requirements::get_requirement_detail,
            commands::requirements::list_requirements,
            commands::requirements::get_requirement_groups,
            commands::requirements::update_requirement,
            commands::requirements::delete_requirement,
            commands::requirements::configure_review_chain,
            commands::review::submit_review,
            commands::review::batch_submit_review,
            commands::review::get_review_status,
            commands::review::get_review_history,
            commands::review::reset_review,
            commands::settings::get_column_preferences,
            commands::settings::update_column_preferences,
            commands::settings::get_view_preferences,
            commands::settings::update_view_preferences,
            commands::settings::get_current_user,
            commands::settings::set_current_user,
        ])
}

/// Run the desktop app.
///
/// The host binary passes `tauri::generate_context!()`, so the config and
/// icons stay with the binary. Reviews are attributed to the user saved
/// through `set_current_user`.
pub fn run(context: tauri::Context<tauri::Wry>) {
    builder::<tauri::Wry>()
        .setup(|app| {
            let app_data_dir = app.path().app_data_dir()?;
            let handle = app.handle().clone();

            // Run async initialization in a blocking context
            tauri::async_runtime::block_on(setup_state(
                &handle,
                &app_data_dir,
                StoreIdentity::new(handle.clone()),
            ))?;

            Ok(())
        })
        .run(context)
        .expect("error while running tauri application");
}

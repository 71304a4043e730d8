//! Tauri IPC command handlers.
//!
//! Each handler reads managed state (the
//! database pool and the current identity) or the preference store and
//! returns serializable results or an [`AppError`](crate::error::AppError).
//! Commands are organized by functionality:
//! - `requirements`: requirement CRUD, listing and review chain setup
//! - `review`: review submission, batch review and history
//! - `settings`: persisted column and list view preferences, signed-in user

pub mod requirements;
pub mod review;
pub mod settings;

pub use requirements::{
    configure_review_chain, create_requirement, delete_requirement, get_requirement_detail,
    get_requirement_groups, list_requirements, update_requirement, ConfigureReviewInput,
    ListRequirementsInput, RequirementDetail, RequirementGroupView, RequirementListItem,
    ReviewLevelView,
};
pub use review::{
    batch_submit_review, get_review_history, get_review_status, reset_review, submit_review,
    BatchReviewInput, SubmitReviewInput,
};
pub use settings::{
    get_column_preferences, get_current_user, get_view_preferences, set_current_user,
    update_column_preferences, update_view_preferences, ColumnPreferences, RequirementColumn, ViewPreferences,
};

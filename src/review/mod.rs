//! Review chain logic.
//!
//! Pure functions over a requirement's review levels: deriving the overall
//! status, applying a reviewer's decision, gating, chain configuration and
//! the display mapping. Nothing here touches the database; persistence lives
//! in `services::review_service`.

pub mod chain;
pub mod derive;
pub mod display;
pub mod submit;

use thiserror::Error;

pub use chain::{
    build_review_chain, is_level_unlocked, next_actionable_level, reset_review_chain,
    validate_review_chain,
};
pub use derive::{derive_for_review, derive_overall_status};
pub use display::{display_for, StatusDisplay, StatusStyle};
pub use submit::submit_review;

/// Errors produced by review chain operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewError {
    #[error("No review level {level} is configured")]
    LevelNotFound { level: u32 },

    #[error("Review level {level} is configured more than once")]
    DuplicateLevel { level: u32 },

    #[error("Review levels are numbered from 1")]
    InvalidLevel,
}

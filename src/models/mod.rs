//! Data models for the application.
//!
//! These models represent the core entities stored in the local SQLite database
//! and exchanged with the frontend.
//!
//! Stored rows derive FromRow for SQLx queries; everything serializes camelCase.

pub mod overall_status;
pub mod requirement;
pub mod review_event;
pub mod review_level;
pub mod user;

// Re-exports for convenient access
pub use overall_status::{OverallStatus, ParseOverallStatusError};
pub use requirement::{NewRequirement, Priority, Requirement, RequirementStatus, RequirementUpdate};
pub use review_event::ReviewEvent;
pub use review_level::{ReviewDecision, ReviewLevel, ReviewStatus, ScheduledReview};
pub use user::User;

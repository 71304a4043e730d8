//! Business logic services.
//!
//! This module contains the review workflow on top of the database layer,
//! batch operations, in-memory list views and typed preferences on the
//! store plugin.
//!
//! Services are independent of the command layer and take explicit state.

pub mod batch;
pub mod identity;
pub mod preference_store;
pub mod requirement_view;
pub mod review_service;

pub use batch::{batch_submit_review, BatchFailure, BatchReport};
pub use identity::{CurrentIdentity, IdentityProvider, SignedInUser, StaticIdentity, StoreIdentity};
pub use preference_store::{Loaded, Preference, PreferenceSource, PreferencesPath};
pub use requirement_view::{RequirementFilter, RequirementSort, SortDirection, SortField};
pub use review_service::{ReviewOutcome, ReviewSubmission};

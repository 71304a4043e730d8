//! Reviewer identity model.

use serde::{Deserialize, Serialize};

/// A user as supplied by the identity provider.
///
/// Users are not stored in their own table; they are embedded in review
/// levels and copied into review history rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Stable user identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Avatar image URL (optional).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            avatar_url: None,
        }
    }
}

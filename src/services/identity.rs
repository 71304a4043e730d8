//! Current-user identity used for reviewer attribution.

use serde::{Deserialize, Serialize};
use tauri::{AppHandle, Runtime};

use super::preference_store::{load_preference, Preference};
use crate::error::AppError;
use crate::models::User;

/// Source of the user performing an action.
pub trait IdentityProvider: Send + Sync {
    /// The signed-in user.
    ///
    /// # Errors
    /// Returns an error when nobody is signed in.
    fn current_user(&self) -> Result<User, AppError>;
}

fn no_user() -> AppError {
    AppError::invalid_input("No signed-in user to attribute the review to")
}

/// Identity fixed at startup, or absent.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    user: Option<User>,
}

impl StaticIdentity {
    pub fn new(user: User) -> Self {
        Self { user: Some(user) }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> Result<User, AppError> {
        self.user.clone().ok_or_else(no_user)
    }
}

/// The signed-in user as persisted in the preference store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedInUser(pub Option<User>);

impl Preference for SignedInUser {
    const KEY: &'static str = "current_user";

    fn validate(&self) -> Result<(), String> {
        match &self.0 {
            Some(user) if user.id.trim().is_empty() => Err("user id must not be blank".to_string()),
            Some(user) if user.name.trim().is_empty() => {
                Err("user name must not be blank".to_string())
            }
            _ => Ok(()),
        }
    }
}

/// Identity read from the preference store on every call.
pub struct StoreIdentity<R: Runtime> {
    app: AppHandle<R>,
}

impl<R: Runtime> StoreIdentity<R> {
    pub fn new(app: AppHandle<R>) -> Self {
        Self { app }
    }
}

impl<R: Runtime> IdentityProvider for StoreIdentity<R> {
    fn current_user(&self) -> Result<User, AppError> {
        load_preference::<SignedInUser, R>(&self.app)
            .value
            .0
            .ok_or_else(no_user)
    }
}

/// Managed identity state shared by the review commands.
pub struct CurrentIdentity(Box<dyn IdentityProvider>);

impl CurrentIdentity {
    pub fn new(provider: impl IdentityProvider + 'static) -> Self {
        Self(Box::new(provider))
    }

    pub fn current_user(&self) -> Result<User, AppError> {
        self.0.current_user()
    }
}

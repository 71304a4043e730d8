//! Typed preferences on top of tauri-plugin-store.
//!
//! Preferences live in one store file in the app data directory, keyed by
//! string. Typed values are validated on every load; anything missing,
//! unparsable or invalid falls back to the type's default and the caller is
//! told why, so loading never fails.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tauri::{AppHandle, Manager, Runtime};
use tauri_plugin_store::{Store, StoreExt};

use crate::error::AppError;

/// Store filename inside the app data directory.
pub const PREFERENCES_STORE: &str = "preferences.json";

/// Location of the preference store file, managed at startup.
#[derive(Debug, Clone)]
pub struct PreferencesPath(PathBuf);

impl PreferencesPath {
    pub fn in_dir(app_data_dir: &Path) -> Self {
        Self(app_data_dir.join(PREFERENCES_STORE))
    }
}

/// A typed preference stored under a fixed key.
pub trait Preference: Serialize + DeserializeOwned + Default {
    /// Key in the store.
    const KEY: &'static str;

    /// Check the value against the recognized options.
    fn validate(&self) -> Result<(), String>;
}

/// Where a loaded preference came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PreferenceSource {
    Stored,
    Defaulted { reason: String },
}

/// A preference value together with its source.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Loaded<T> {
    pub value: T,
    pub source: PreferenceSource,
}

impl<T: Default> Loaded<T> {
    fn defaulted(reason: impl Into<String>) -> Self {
        Self {
            value: T::default(),
            source: PreferenceSource::Defaulted {
                reason: reason.into(),
            },
        }
    }
}

impl<T> Loaded<T> {
    pub fn is_defaulted(&self) -> bool {
        matches!(self.source, PreferenceSource::Defaulted { .. })
    }
}

/// Open the app's preference store.
///
/// Uses the managed [`PreferencesPath`] when present, otherwise the plugin
/// resolves [`PREFERENCES_STORE`] against the app data directory. A missing
/// or corrupt file opens as an empty store.
pub fn open_store<R: Runtime>(app: &AppHandle<R>) -> Result<Arc<Store<R>>, AppError> {
    let path = app
        .try_state::<PreferencesPath>()
        .map(|p| p.0.clone())
        .unwrap_or_else(|| PathBuf::from(PREFERENCES_STORE));

    Ok(app.store(path)?)
}

/// Load and validate a typed preference, falling back to its default.
pub fn load<T: Preference, R: Runtime>(store: &Store<R>) -> Loaded<T> {
    let Some(raw) = store.get(T::KEY) else {
        return Loaded::defaulted("not set");
    };

    let parsed = serde_json::from_value::<T>(raw.clone())
        .map_err(|e| e.to_string())
        .and_then(|value| value.validate().map(|()| value));

    match parsed {
        Ok(value) => Loaded {
            value,
            source: PreferenceSource::Stored,
        },
        Err(reason) => {
            log::warn!(
                "[preferences] Invalid value for {}, using defaults: {}",
                T::KEY,
                reason
            );
            Loaded::defaulted(reason)
        }
    }
}

/// Validate, store and persist a typed preference.
pub fn save<T: Preference, R: Runtime>(store: &Store<R>, value: &T) -> Result<(), AppError> {
    value
        .validate()
        .map_err(|reason| AppError::invalid_input_field(reason, T::KEY))?;

    store.set(T::KEY, serde_json::to_value(value)?);
    store.save()?;
    log::debug!("[preferences] Saved {}", T::KEY);
    Ok(())
}

/// Load a preference from the app's store. An unopenable store yields defaults.
pub fn load_preference<T: Preference, R: Runtime>(app: &AppHandle<R>) -> Loaded<T> {
    match open_store(app) {
        Ok(store) => load(&store),
        Err(e) => {
            log::warn!("[preferences] {}, using defaults for {}", e, T::KEY);
            Loaded::defaulted(e.to_string())
        }
    }
}

/// Save a preference to the app's store.
pub fn save_preference<T: Preference, R: Runtime>(
    app: &AppHandle<R>,
    value: &T,
) -> Result<(), AppError> {
    let store = open_store(app)?;
    save(&store, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tauri::test::{mock_builder, mock_context, noop_assets, MockRuntime};
    use tempfile::tempdir;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct PageSize {
        rows: u32,
    }

    impl Preference for PageSize {
        const KEY: &'static str = "page_size";

        fn validate(&self) -> Result<(), String> {
            if (1..=200).contains(&self.rows) {
                Ok(())
            } else {
                Err(format!("rows must be between 1 and 200, got {}", self.rows))
            }
        }
    }

    fn mock_app(dir: &Path) -> tauri::App<MockRuntime> {
        let app = mock_builder()
            .plugin(tauri_plugin_store::Builder::new().build())
            .build(mock_context(noop_assets()))
            .unwrap();
        app.manage(PreferencesPath::in_dir(dir));
        app
    }

    #[test]
    fn test_missing_file_defaults() {
        let dir = tempdir().unwrap();
        let app = mock_app(dir.path());

        let loaded = load_preference::<PageSize, _>(app.handle());
        assert_eq!(loaded.value, PageSize::default());
        assert_eq!(
            loaded.source,
            PreferenceSource::Defaulted {
                reason: "not set".to_string()
            }
        );
    }

    #[test]
    fn test_save_and_reopen() {
        let dir = tempdir().unwrap();

        let app = mock_app(dir.path());
        save_preference(app.handle(), &PageSize { rows: 50 }).unwrap();
        drop(app);

        let raw = std::fs::read_to_string(dir.path().join(PREFERENCES_STORE)).unwrap();
        assert!(raw.contains("page_size"));

        let reopened = mock_app(dir.path());
        let loaded = load_preference::<PageSize, _>(reopened.handle());
        assert_eq!(loaded.value, PageSize { rows: 50 });
        assert!(!loaded.is_defaulted());
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let dir = tempdir().unwrap();
        let app = mock_app(dir.path());
        let store = open_store(app.handle()).unwrap();

        store.set("page_size", serde_json::json!({ "rows": 0 }));
        assert!(load::<PageSize, _>(&store).is_defaulted());

        store.set("page_size", serde_json::json!("fifty"));
        assert!(load::<PageSize, _>(&store).is_defaulted());

        let err = save(&store, &PageSize { rows: 500 }).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput { .. }));
    }

    #[test]
    fn test_corrupt_file_is_treated_as_empty() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(PREFERENCES_STORE), "{ not json").unwrap();

        let app = mock_app(dir.path());
        assert!(load_preference::<PageSize, _>(app.handle()).is_defaulted());

        save_preference(app.handle(), &PageSize { rows: 10 }).unwrap();
        drop(app);

        let reopened = mock_app(dir.path());
        assert!(!load_preference::<PageSize, _>(reopened.handle()).is_defaulted());
    }
}

/// API settings and their storage backends
///
/// The extension keeps settings in chrome.storage.sync, the PWA in
/// window.localStorage. The two are never migrated into each other.
use crate::error::StorageError;
use crate::extension;
use serde::{Deserialize, Serialize};

pub const API_URL_KEY: &str = "apiUrl";
pub const API_TOKEN_KEY: &str = "apiToken";

/// Pre-filled on the options page when nothing is stored yet
pub const DEFAULT_API_URL: &str = "https://api.nickbell.dev";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub api_url: String,
    #[serde(default)]
    pub api_token: String,
}

impl Settings {
    /// Build settings from raw form input: trims both fields and drops
    /// trailing slashes from the URL
    pub fn new(api_url: &str, api_token: &str) -> Self {
        Settings {
            api_url: normalize_api_url(api_url),
            api_token: api_token.trim().to_string(),
        }
    }

    pub fn normalized(&self) -> Self {
        Settings::new(&self.api_url, &self.api_token)
    }

    /// Both fields present
    pub fn is_complete(&self) -> bool {
        !self.api_url.is_empty() && !self.api_token.is_empty()
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }
}

pub fn normalize_api_url(api_url: &str) -> String {
    api_url.trim().trim_end_matches('/').to_string()
}

/// Persistence for [`Settings`]
#[allow(async_fn_in_trait)]
pub trait SettingsStore {
    /// Missing fields come back as empty strings
    async fn load(&self) -> Result<Settings, StorageError>;

    async fn save(&self, settings: &Settings) -> Result<(), StorageError>;

    async fn has_settings(&self) -> Result<bool, StorageError> {
        Ok(self.load().await?.is_complete())
    }
}

/// chrome.storage.sync, shared across the user's signed-in browsers
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncStorage;

impl SettingsStore for SyncStorage {
    async fn load(&self) -> Result<Settings, StorageError> {
        let items = extension::sync_get(&[API_URL_KEY, API_TOKEN_KEY])
            .await
            .map_err(StorageError::Backend)?;

        if items.is_null() || items.is_undefined() {
            return Ok(Settings::default());
        }

        serde_wasm_bindgen::from_value(items)
            .map_err(|e| StorageError::Backend(format!("Failed to parse settings: {:?}", e)))
    }

    async fn save(&self, settings: &Settings) -> Result<(), StorageError> {
        let items = serde_wasm_bindgen::to_value(&settings.normalized())
            .map_err(|e| StorageError::Backend(format!("Failed to serialize settings: {:?}", e)))?;

        extension::sync_set(items).await.map_err(StorageError::Backend)
    }
}

/// window.localStorage, used by the PWA
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .ok_or(StorageError::Unavailable)?
            .local_storage()
            .map_err(|e| StorageError::Backend(format!("{:?}", e)))?
            .ok_or(StorageError::Unavailable)
    }
}

impl SettingsStore for LocalStorage {
    async fn load(&self) -> Result<Settings, StorageError> {
        let storage = Self::storage()?;
        let read = |key: &str| {
            storage
                .get_item(key)
                .map(Option::unwrap_or_default)
                .map_err(|e| StorageError::Backend(format!("{:?}", e)))
        };

        Ok(Settings {
            api_url: read(API_URL_KEY)?,
            api_token: read(API_TOKEN_KEY)?,
        })
    }

    async fn save(&self, settings: &Settings) -> Result<(), StorageError> {
        let storage = Self::storage()?;
        let settings = settings.normalized();

        for (key, value) in [(API_URL_KEY, &settings.api_url), (API_TOKEN_KEY, &settings.api_token)] {
            storage
                .set_item(key, value)
                .map_err(|e| StorageError::Backend(format!("{:?}", e)))?;
        }

        Ok(())
    }
}

//! Repository and service traits for settings.

use async_trait::async_trait;

use crate::errors::Result;
use crate::settings::{EngineSettings, EngineSettingsUpdate};

/// Repository trait for the key/value settings store.
#[async_trait]
pub trait SettingsRepositoryTrait: Send + Sync {
    /// All stored (key, value) pairs.
    fn get_all_settings(&self) -> Result<Vec<(String, String)>>;

    /// Get a single setting value by key.
    fn get_setting(&self, setting_key: &str) -> Result<String>;

    /// Insert or replace a single setting.
    async fn update_setting(&self, setting_key: &str, setting_value: &str) -> Result<()>;
}

#[async_trait]
pub trait SettingsServiceTrait: Send + Sync {
    fn get_engine_settings(&self) -> Result<EngineSettings>;

    async fn update_engine_settings(&self, update: &EngineSettingsUpdate) -> Result<EngineSettings>;

    /// Get a single setting value by key. Returns None if not found.
    fn get_setting_value(&self, key: &str) -> Result<Option<String>>;
}

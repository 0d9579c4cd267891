use async_trait::async_trait;
use log::{debug, warn};
use std::str::FromStr;
use std::sync::Arc;

use super::settings_model::*;
use super::SettingsRepositoryTrait;
use super::SettingsServiceTrait;
use crate::errors::{DatabaseError, Error, Result};

pub struct SettingsService {
    settings_repository: Arc<dyn SettingsRepositoryTrait>,
}

impl SettingsService {
    pub fn new(settings_repository: Arc<dyn SettingsRepositoryTrait>) -> Self {
        SettingsService {
            settings_repository,
        }
    }

    /// Parses `value`, falling back to `default` (with a warning) when it does not parse.
    fn parse_or_default<T, E>(key: &str, value: &str, default: T) -> T
    where
        T: FromStr<Err = E>,
        E: std::fmt::Display,
    {
        match value.parse::<T>() {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(
                    "Ignoring invalid value '{}' for setting {}: {}. Using default.",
                    value, key, e
                );
                default
            }
        }
    }

    /// Builds engine settings from raw rows. Unknown keys are ignored.
    pub fn engine_settings_from_pairs(pairs: &[(String, String)]) -> EngineSettings {
        let mut settings = EngineSettings::default();
        for (key, value) in pairs {
            match key.as_str() {
                FD_INTEREST_MODE_KEY => {
                    settings.fd_interest_mode =
                        Self::parse_or_default(key, value, settings.fd_interest_mode);
                }
                RD_COMPOUNDING_KEY => {
                    settings.rd_compounding =
                        Self::parse_or_default(key, value, settings.rd_compounding);
                }
                DAY_COUNT_BASIS_KEY => {
                    let basis: u32 = Self::parse_or_default(key, value, settings.day_count_basis);
                    if basis == 0 {
                        warn!("Ignoring zero {}. Using default.", DAY_COUNT_BASIS_KEY);
                    } else {
                        settings.day_count_basis = basis;
                    }
                }
                PRICE_REFRESH_DELAY_MS_KEY => {
                    settings.price_refresh_delay_ms =
                        Self::parse_or_default(key, value, settings.price_refresh_delay_ms);
                }
                _ => {}
            }
        }
        settings
    }
}

#[async_trait]
impl SettingsServiceTrait for SettingsService {
    fn get_engine_settings(&self) -> Result<EngineSettings> {
        let pairs = self.settings_repository.get_all_settings()?;
        Ok(Self::engine_settings_from_pairs(&pairs))
    }

    async fn update_engine_settings(&self, update: &EngineSettingsUpdate) -> Result<EngineSettings> {
        if update.day_count_basis == Some(0) {
            return Err(Error::InvalidConfigValue(format!(
                "{} must be greater than zero",
                DAY_COUNT_BASIS_KEY
            )));
        }

        if let Some(mode) = update.fd_interest_mode {
            self.settings_repository
                .update_setting(FD_INTEREST_MODE_KEY, mode.as_str())
                .await?;
        }
        if let Some(compounding) = update.rd_compounding {
            self.settings_repository
                .update_setting(RD_COMPOUNDING_KEY, compounding.as_str())
                .await?;
        }
        if let Some(basis) = update.day_count_basis {
            self.settings_repository
                .update_setting(DAY_COUNT_BASIS_KEY, &basis.to_string())
                .await?;
        }
        if let Some(delay) = update.price_refresh_delay_ms {
            self.settings_repository
                .update_setting(PRICE_REFRESH_DELAY_MS_KEY, &delay.to_string())
                .await?;
        }

        let settings = self.get_engine_settings()?;
        debug!("Engine settings updated: {:?}", settings);
        Ok(settings)
    }

    fn get_setting_value(&self, key: &str) -> Result<Option<String>> {
        match self.settings_repository.get_setting(key) {
            Ok(value) => Ok(Some(value)),
            Err(Error::Database(DatabaseError::NotFound(_))) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

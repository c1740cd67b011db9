use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use svein_engine::room::MIN_PLAYERS;
use thiserror::Error;

/// Room limits and the defaults applied when a host leaves a value out
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppSettings {
    /// Seats in a room when the host does not say
    pub default_max_players: usize,
    /// Rounds in a game when the host does not say
    pub default_total_rounds: u32,
    /// Largest room a host may ask for
    pub max_players_limit: usize,
    /// Longest game a host may ask for
    pub max_total_rounds: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_max_players: 4,
            default_total_rounds: 10,
            max_players_limit: 8,
            max_total_rounds: 13,
        }
    }
}

impl AppSettings {
    /// Validate settings values
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.max_players_limit < MIN_PLAYERS {
            return Err(SettingsError::InvalidValue(format!(
                "max_players_limit must be at least {}",
                MIN_PLAYERS
            )));
        }

        if self.default_max_players < MIN_PLAYERS
            || self.default_max_players > self.max_players_limit
        {
            return Err(SettingsError::InvalidValue(format!(
                "default_max_players must be between {} and {}",
                MIN_PLAYERS, self.max_players_limit
            )));
        }

        if self.max_total_rounds == 0 {
            return Err(SettingsError::InvalidValue(
                "max_total_rounds must be greater than 0".to_string(),
            ));
        }

        if self.default_total_rounds == 0 || self.default_total_rounds > self.max_total_rounds {
            return Err(SettingsError::InvalidValue(format!(
                "default_total_rounds must be between 1 and {}",
                self.max_total_rounds
            )));
        }

        Ok(())
    }
}

/// In-memory settings store with validation
#[derive(Debug)]
pub struct SettingsStore {
    settings: RwLock<AppSettings>,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self {
            settings: RwLock::new(AppSettings::default()),
        }
    }

    pub fn with_settings(settings: AppSettings) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self {
            settings: RwLock::new(settings),
        })
    }

    /// Get current settings
    pub fn get(&self) -> Result<AppSettings, SettingsError> {
        self.settings
            .read()
            .map(|guard| guard.clone())
            .map_err(|_| SettingsError::StoragePoisoned)
    }

    /// Update settings with validation
    pub fn update(&self, new_settings: AppSettings) -> Result<AppSettings, SettingsError> {
        new_settings.validate()?;

        let mut guard = self
            .settings
            .write()
            .map_err(|_| SettingsError::StoragePoisoned)?;
        *guard = new_settings.clone();
        tracing::info!(settings = ?new_settings, "settings updated");
        Ok(new_settings)
    }

    /// Reset to default settings
    pub fn reset(&self) -> Result<AppSettings, SettingsError> {
        self.update(AppSettings::default())
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
    #[error("Settings storage poisoned")]
    StoragePoisoned,
}

// groupshelf Settings Engine
// Loads and updates the shared popup settings record. Updates are written as
// a merge-patch of the changed field only, so the two features never
// overwrite each other's preference.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::warn;

use crate::store::StoreAdapter;
use crate::types::errors::SettingsError;
use crate::types::settings::{FeatureKind, PopupSettings, ViewMode, SETTINGS_KEY};

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&mut self) -> PopupSettings;
    fn get_settings(&self) -> &PopupSettings;
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), SettingsError>;
    fn set_view_mode(&mut self, feature: FeatureKind, mode: ViewMode) -> Result<(), SettingsError>;
    fn reset(&mut self) -> Result<(), SettingsError>;
}

/// Settings engine persisting through a [`StoreAdapter`].
pub struct SettingsEngine<S: StoreAdapter> {
    store: Arc<S>,
    settings: PopupSettings,
}

impl<S: StoreAdapter> SettingsEngine<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            settings: PopupSettings::default(),
        }
    }
}

impl<S: StoreAdapter> SettingsEngineTrait for SettingsEngine<S> {
    /// Loads the settings record.
    ///
    /// A missing, unreadable or malformed record yields defaults.
    fn load(&mut self) -> PopupSettings {
        self.settings = match self.store.read(SETTINGS_KEY) {
            Ok(Some(record)) => serde_json::from_value(record).unwrap_or_else(|e| {
                warn!(error = %e, "malformed settings record, using defaults");
                PopupSettings::default()
            }),
            Ok(None) => PopupSettings::default(),
            Err(e) => {
                warn!(error = %e, "settings read failed, using defaults");
                PopupSettings::default()
            }
        };
        self.settings
    }

    fn get_settings(&self) -> &PopupSettings {
        &self.settings
    }

    /// Updates one field by its stored name, e.g. `"tabViewMode"`.
    ///
    /// The value is validated against the settings type before anything is
    /// written.
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), SettingsError> {
        if key.is_empty() {
            return Err(SettingsError::InvalidKey("Key cannot be empty".to_string()));
        }

        let mut json_value = serde_json::to_value(self.settings)
            .map_err(|e| SettingsError::InvalidValue(e.to_string()))?;
        match json_value.as_object_mut() {
            Some(map) if map.contains_key(key) => {
                map.insert(key.to_string(), value.clone());
            }
            _ => {
                return Err(SettingsError::InvalidKey(format!(
                    "Key '{}' not found in settings",
                    key
                )))
            }
        }

        let updated: PopupSettings = serde_json::from_value(json_value).map_err(|e| {
            SettingsError::InvalidValue(format!("Invalid value for key '{}': {}", key, e))
        })?;

        let mut patch = Map::new();
        patch.insert(key.to_string(), value);
        self.store.write_setting(patch)?;
        self.settings = updated;
        Ok(())
    }

    fn set_view_mode(&mut self, feature: FeatureKind, mode: ViewMode) -> Result<(), SettingsError> {
        let value = serde_json::to_value(mode)
            .map_err(|e| SettingsError::InvalidValue(e.to_string()))?;
        self.set_value(feature.view_mode_key(), value)
    }

    /// Restores both view modes to their defaults and persists them.
    fn reset(&mut self) -> Result<(), SettingsError> {
        let defaults = PopupSettings::default();
        let patch = match serde_json::to_value(defaults) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        self.store.write_setting(patch)?;
        self.settings = defaults;
        Ok(())
    }
}

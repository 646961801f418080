use std::{fs, path::Path};

use tracing::{debug, instrument};

use super::Config;
use crate::{PrefsError, Result};

impl Config {
    /// Loads the settings file at `path`.
    ///
    /// A missing file yields the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file exists but cannot be read
    /// - The TOML content is invalid
    /// - A setting has an invalid value
    #[instrument]
    pub fn load(path: &Path) -> Result<Config> {
        if !path.exists() {
            debug!("No settings file, using defaults");
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| PrefsError::io(e, path))?;
        let config: Config =
            toml::from_str(&content).map_err(|e| PrefsError::toml_parse(e, Some(path)))?;

        config.validate()?;
        Ok(config)
    }

    /// Parses settings from a TOML string.
    ///
    /// # Errors
    /// Returns an error if the TOML is invalid or a setting has an invalid value.
    pub fn from_toml_str(content: &str) -> Result<Config> {
        let config: Config =
            toml::from_str(content).map_err(|e| PrefsError::toml_parse(e, None))?;

        config.validate()?;
        Ok(config)
    }

    /// Checks values serde cannot express constraints for.
    ///
    /// # Errors
    /// Returns `PrefsError::InvalidSetting` for an empty or absolute preference path.
    pub fn validate(&self) -> Result<()> {
        let path = self.preferences.path.trim();

        if path.is_empty() {
            return Err(PrefsError::InvalidSetting {
                field: "preferences.path".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        if Path::new(path).is_absolute() {
            return Err(PrefsError::InvalidSetting {
                field: "preferences.path".to_string(),
                reason: format!("'{path}' must be relative to the workspace root"),
            });
        }

        Ok(())
    }
}

//! Application settings.
//!
//! Settings are read from `config.toml` in the prefsync configuration
//! directory. Every field has a default, so a missing file or a partial file
//! is valid.

mod general;
mod loading;
mod paths;
mod preferences;

#[cfg(test)]
mod tests;

pub use general::{GeneralConfig, LogFormat, LogLevel};
pub use paths::ConfigPaths;
pub use preferences::PreferencesConfig;

use serde::{Deserialize, Serialize};

/// Main configuration structure for prefsync.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Logging and other process-wide settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Where the preference document lives and how it is watched.
    #[serde(default)]
    pub preferences: PreferencesConfig,
}

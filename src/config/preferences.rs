use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const DEFAULT_PREFERENCE_PATH: &str = ".prefsync/settings.json";
const DEFAULT_DEBOUNCE_MS: u64 = 200;

/// Location of the preference document and file watching behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PreferencesConfig {
    /// Workspace root; the current directory when unset.
    pub workspace_root: Option<PathBuf>,

    /// Path of the preference document relative to the workspace root.
    pub path: String,

    /// Quiet period after the last file event before a reload is requested.
    pub debounce_ms: u64,
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            workspace_root: None,
            path: DEFAULT_PREFERENCE_PATH.to_string(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

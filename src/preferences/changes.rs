use std::time::Instant;

use serde_json::Value;

/// What happened to a preference between two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// The preference did not exist before.
    Added,
    /// The preference no longer exists.
    Removed,
    /// The preference exists on both sides with different values.
    Modified,
}

/// A single preference change produced by a reconciliation pass.
///
/// Exactly one of `old_value` / `new_value` is `None` for additions and
/// removals. Both are present, and never equal, for modifications.
#[derive(Debug, Clone, PartialEq)]
pub struct PreferenceChange {
    /// Name of the preference (e.g. "editor.lineNumbers").
    pub key: String,
    /// The value before the pass, if the preference existed.
    pub old_value: Option<Value>,
    /// The value after the pass, if the preference still exists.
    pub new_value: Option<Value>,
    /// When the pass that produced this change computed it.
    pub timestamp: Instant,
}

/// Errors raised when reading the payload of a [`PreferenceChange`].
#[derive(Debug, thiserror::Error)]
pub enum ChangeError {
    /// The value does not deserialize into the requested type.
    #[error("Type mismatch at {key}: Expected {expected_type}, got {actual_value:?}")]
    TypeMismatch {
        /// The preference whose value was read.
        key: String,
        /// The requested type name.
        expected_type: &'static str,
        /// The value that was found, `None` for removals.
        actual_value: Option<Value>,
    },
}

impl PreferenceChange {
    /// A preference that appeared.
    pub fn added(key: impl Into<String>, new_value: Value, timestamp: Instant) -> Self {
        Self {
            key: key.into(),
            old_value: None,
            new_value: Some(new_value),
            timestamp,
        }
    }

    /// A preference that disappeared.
    pub fn removed(key: impl Into<String>, old_value: Value, timestamp: Instant) -> Self {
        Self {
            key: key.into(),
            old_value: Some(old_value),
            new_value: None,
            timestamp,
        }
    }

    /// A preference whose value changed.
    pub fn modified(
        key: impl Into<String>,
        old_value: Value,
        new_value: Value,
        timestamp: Instant,
    ) -> Self {
        Self {
            key: key.into(),
            old_value: Some(old_value),
            new_value: Some(new_value),
            timestamp,
        }
    }

    /// Classifies the change from which sides are present.
    pub fn kind(&self) -> ChangeKind {
        match (&self.old_value, &self.new_value) {
            (None, _) => ChangeKind::Added,
            (Some(_), None) => ChangeKind::Removed,
            (Some(_), Some(_)) => ChangeKind::Modified,
        }
    }

    /// Extracts the new value as a specific type.
    ///
    /// # Errors
    ///
    /// Returns `ChangeError::TypeMismatch` if the preference was removed or the
    /// value cannot be deserialized into `T`.
    pub fn extract<T>(&self) -> Result<T, ChangeError>
    where
        T: serde::de::DeserializeOwned,
    {
        let mismatch = || ChangeError::TypeMismatch {
            key: self.key.clone(),
            expected_type: std::any::type_name::<T>(),
            actual_value: self.new_value.clone(),
        };

        let value = self.new_value.clone().ok_or_else(mismatch)?;
        serde_json::from_value(value).map_err(|_| mismatch())
    }

    /// Attempts to extract the new value as a string.
    pub fn as_string(&self) -> Option<String> {
        match &self.new_value {
            Some(Value::String(s)) => Some(s.clone()),
            _ => None,
        }
    }

    /// Extracts the new value as a string with a fallback default.
    pub fn as_string_or(&self, default: &str) -> String {
        self.as_string().unwrap_or_else(|| default.to_string())
    }
}

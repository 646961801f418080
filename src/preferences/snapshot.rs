use std::sync::{Arc, PoisonError, RwLock};

use super::{PreferenceMap, PreferenceValue};

/// An immutable, fully parsed preference document.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    source: String,
    values: PreferenceMap,
}

impl Snapshot {
    /// Wraps a parsed mapping together with the identifier it was read from.
    pub fn new(source: impl Into<String>, values: PreferenceMap) -> Self {
        Self {
            source: source.into(),
            values,
        }
    }

    /// Identifier of the document this snapshot was loaded from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The parsed preferences, in document order.
    pub fn values(&self) -> &PreferenceMap {
        &self.values
    }

    /// Whether `name` is set.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// The value of `name`, if set.
    pub fn get(&self, name: &str) -> Option<&PreferenceValue> {
        self.values.get(name)
    }
}

/// Holds the current [`Snapshot`].
///
/// The snapshot is replaced as a whole, never mutated in place, so readers
/// always observe either the previous or the next document.
#[derive(Debug, Default)]
pub(super) struct SnapshotStore {
    current: RwLock<Option<Arc<Snapshot>>>,
}

impl SnapshotStore {
    /// Returns the current snapshot, handling poisoned locks gracefully.
    pub(super) fn current(&self) -> Option<Arc<Snapshot>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Installs `next` and returns the snapshot it replaced.
    pub(super) fn replace(&self, next: Snapshot) -> Option<Arc<Snapshot>> {
        let mut current = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        current.replace(Arc::new(next))
    }
}

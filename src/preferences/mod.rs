//! Preference reconciliation with change notification.
//!
//! Loads a preference document from a [`BackingStore`], keeps the parsed
//! result as an immutable [`Snapshot`], reloads it whenever the change source
//! reports that the document changed, and publishes one [`PreferenceChange`]
//! per added, removed or modified preference.

mod broadcast;
mod changes;
mod diff;
mod loader;
mod path_ops;
mod service;
mod snapshot;
mod source;

#[cfg(test)]
mod tests;

pub use broadcast::{Notifier, Subscription, SubscriptionId};
pub use changes::{ChangeError, ChangeKind, PreferenceChange};
pub use diff::diff;
pub use loader::{DocumentFormat, LoadError, Loader, parse_document};
pub use service::{PreferenceService, ReconcileState};
pub use snapshot::Snapshot;
pub use source::{BackingStore, ChangeEvent, FileStat, ResolvedContent, StoreError};

/// A preference value: string, number, boolean, null, object or array.
pub type PreferenceValue = serde_json::Value;

/// Preference name to value, iterated in document order.
pub type PreferenceMap = serde_json::Map<String, PreferenceValue>;

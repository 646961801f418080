//! prefsync - Workspace preference reconciliation with change notification.
//!
//! prefsync keeps an in-memory copy of a workspace preference document,
//! reloads it whenever the document changes on disk, and tells subscribers
//! exactly which preferences were added, removed or modified.
//!
//! - Lock-protected snapshots that are replaced whole, never mutated
//! - Key-level diffing with deep value comparison
//! - Handler and stream subscriptions with wildcard patterns
//! - Local file system store and debounced file watcher
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::{sync::Arc, time::Duration};
//!
//! use prefsync::{
//!     preferences::PreferenceService,
//!     workspace::{FileWatcher, LocalStore},
//! };
//!
//! # async fn example() -> prefsync::Result<()> {
//! let store = Arc::new(LocalStore::new("."));
//! let document = store.document_path(".prefsync/settings.json");
//! let (_watcher, changes) = FileWatcher::watch_file(&document, Duration::from_millis(200))?;
//!
//! let prefs = PreferenceService::new(store, changes, ".prefsync/settings.json");
//! prefs.subscribe(|change| println!("{} changed", change.key));
//!
//! prefs.settled().await;
//! println!("line numbers: {:?}", prefs.get("lineNumbers"));
//! # Ok(())
//! # }
//! ```

/// Application settings and their file locations.
pub mod config;

/// Core error types and result aliases.
pub mod core;

/// Preference snapshots, diffing, notification and reconciliation.
pub mod preferences;

/// Local file system store and watcher.
pub mod workspace;

/// Command-line interface.
pub mod cli;

/// Logging setup.
pub mod tracing_config;

/// Re-exported core types for convenience.
pub use crate::core::{PrefsError, Result};

//! Local file system collaborators for the preference engine.
//!
//! [`LocalStore`] reads preference documents from disk and [`FileWatcher`]
//! turns file system notifications into [`ChangeEvent`](crate::preferences::ChangeEvent)s.
//! Both use the plain path string as the resource identifier, so the
//! identifiers they produce for the same file compare equal.

mod file_watcher;
mod local_store;

pub use file_watcher::{ChangeStream, FileWatcher};
pub use local_store::LocalStore;

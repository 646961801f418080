use std::collections::HashSet;

use async_trait::async_trait;

/// Metadata about a resource in the backing store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStat {
    /// Canonical identifier of the resource.
    pub uri: String,
    /// Last modification time in milliseconds since the epoch, if known.
    pub last_modification: Option<u64>,
    /// Whether the resource is a directory.
    pub is_directory: bool,
}

/// Content read from the backing store together with its metadata.
#[derive(Debug, Clone)]
pub struct ResolvedContent {
    /// Metadata of the resource that was read.
    pub stat: FileStat,
    /// Full text content of the resource.
    pub content: String,
}

/// Errors reported by a [`BackingStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The resource does not exist.
    #[error("resource not found: {0}")]
    NotFound(String),

    /// The resource exists but may not be read.
    #[error("permission denied on '{0}'")]
    PermissionDenied(String),

    /// Any other I/O failure.
    #[error("I/O error on '{uri}': {details}")]
    Io {
        /// Resource being read
        uri: String,
        /// Error details from the store
        details: String,
    },

    /// The workspace root could not be determined.
    #[error("workspace root unavailable: {0}")]
    RootUnavailable(String),
}

/// Read-only access to the store that holds the preference document.
#[async_trait]
pub trait BackingStore: Send + Sync {
    /// Reads the full content of the resource identified by `uri`.
    async fn resolve_content(&self, uri: &str) -> Result<ResolvedContent, StoreError>;

    /// Returns the root all relative preference paths are resolved against.
    async fn workspace_root(&self) -> Result<FileStat, StoreError>;
}

/// A notification that one or more resources changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Identifiers of the resources that changed.
    pub changed_paths: HashSet<String>,
}

impl ChangeEvent {
    /// Creates an event for the given identifiers.
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            changed_paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `uri` is one of the changed identifiers.
    pub fn affects(&self, uri: &str) -> bool {
        self.changed_paths.contains(uri)
    }
}

use std::{
    io::{self, ErrorKind},
    path::{Component, Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, instrument};

use crate::preferences::{BackingStore, FileStat, ResolvedContent, StoreError};

/// A [`BackingStore`] over a directory on the local file system.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    /// Creates a store rooted at `root`.
    ///
    /// The root is canonicalized when it exists so identifiers match the
    /// absolute paths reported by the file watcher.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let root = root.canonicalize().unwrap_or(root);

        Self { root }
    }

    /// The workspace root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of `relative` under the root.
    ///
    /// `.` segments and repeated separators are dropped, so the path matches
    /// the identifier the loader resolves for the same document.
    pub fn document_path(&self, relative: &str) -> PathBuf {
        let relative: PathBuf = Path::new(relative)
            .components()
            .filter(|component| !matches!(component, Component::CurDir))
            .collect();

        self.root.join(relative)
    }

    /// Identifier used for `path`.
    pub fn uri_for(path: &Path) -> String {
        path.to_string_lossy().into_owned()
    }
}

#[async_trait]
impl BackingStore for LocalStore {
    #[instrument(skip(self))]
    async fn resolve_content(&self, uri: &str) -> Result<ResolvedContent, StoreError> {
        let path = Path::new(uri);

        let content = fs::read_to_string(path)
            .await
            .map_err(|e| store_error(uri, e))?;
        let metadata = fs::metadata(path).await.ok();

        debug!(bytes = content.len(), "Read preference document");

        Ok(ResolvedContent {
            stat: FileStat {
                uri: uri.to_string(),
                last_modification: metadata.as_ref().and_then(modified_millis),
                is_directory: false,
            },
            content,
        })
    }

    async fn workspace_root(&self) -> Result<FileStat, StoreError> {
        let uri = Self::uri_for(&self.root);

        let metadata = fs::metadata(&self.root)
            .await
            .map_err(|e| StoreError::RootUnavailable(format!("{uri}: {e}")))?;

        if !metadata.is_dir() {
            return Err(StoreError::RootUnavailable(format!(
                "{uri} is not a directory"
            )));
        }

        Ok(FileStat {
            uri,
            last_modification: modified_millis(&metadata),
            is_directory: true,
        })
    }
}

fn store_error(uri: &str, error: io::Error) -> StoreError {
    match error.kind() {
        ErrorKind::NotFound => StoreError::NotFound(uri.to_string()),
        ErrorKind::PermissionDenied => StoreError::PermissionDenied(uri.to_string()),
        _ => StoreError::Io {
            uri: uri.to_string(),
            details: error.to_string(),
        },
    }
}

fn modified_millis(metadata: &std::fs::Metadata) -> Option<u64> {
    let modified: SystemTime = metadata.modified().ok()?;
    let since_epoch = modified.duration_since(UNIX_EPOCH).ok()?;
    u64::try_from(since_epoch.as_millis()).ok()
}

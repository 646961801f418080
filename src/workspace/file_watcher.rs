use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    time::Duration,
};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher, recommended_watcher};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::{debug, warn};

use super::LocalStore;
use crate::{PrefsError, Result, preferences::ChangeEvent};

/// Stream of debounced change events produced by a [`FileWatcher`].
pub type ChangeStream = UnboundedReceiverStream<ChangeEvent>;

/// File system watcher that reports changes around a preference document.
///
/// Watches the directory containing the document rather than the file
/// itself, so the document being created, deleted or atomically replaced
/// is still noticed. Bursts of notifications are collapsed: once no event
/// has arrived for the debounce period, all paths seen during the burst are
/// emitted as one [`ChangeEvent`].
///
/// Watching stops when the `FileWatcher` is dropped; the stream then ends.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    watched: PathBuf,
}

impl FileWatcher {
    /// Starts watching for changes that may affect `file`.
    ///
    /// If the file's directory does not exist yet, the closest existing
    /// ancestor is watched recursively instead.
    ///
    /// # Errors
    /// Returns `PrefsError::WatchError` if no ancestor exists or the
    /// underlying watcher cannot be initialized.
    ///
    /// # Panics
    /// Panics if called outside of a Tokio runtime.
    pub fn watch_file(file: &Path, debounce: Duration) -> Result<(Self, ChangeStream)> {
        let (raw_tx, raw_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let watch_error = |path: &Path, details: String| PrefsError::WatchError {
            path: path.to_path_buf(),
            details,
        };

        let (target, mode) = watch_target(file)
            .ok_or_else(|| watch_error(file, "no existing parent directory".to_string()))?;

        let mut watcher = recommended_watcher(move |res: notify::Result<Event>| {
            let event = match res {
                Ok(event) => event,
                Err(e) => {
                    warn!(error = %e, "File watcher error");
                    return;
                }
            };

            if !matches!(
                event.kind,
                EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
            ) {
                return;
            }

            for path in event.paths {
                let _ = raw_tx.send(path);
            }
        })
        .map_err(|e| watch_error(&target, e.to_string()))?;

        watcher
            .watch(&target, mode)
            .map_err(|e| watch_error(&target, e.to_string()))?;

        debug!(path = %target.display(), ?mode, "Watching for preference changes");
        tokio::spawn(debounce_loop(raw_rx, event_tx, debounce));

        Ok((
            Self {
                _watcher: watcher,
                watched: target,
            },
            UnboundedReceiverStream::new(event_rx),
        ))
    }

    /// The directory being watched.
    pub fn watched(&self) -> &Path {
        &self.watched
    }
}

fn watch_target(file: &Path) -> Option<(PathBuf, RecursiveMode)> {
    let parent = file.parent()?;
    if parent.is_dir() {
        return Some((parent.to_path_buf(), RecursiveMode::NonRecursive));
    }

    parent
        .ancestors()
        .find(|ancestor| ancestor.is_dir())
        .map(|ancestor| (ancestor.to_path_buf(), RecursiveMode::Recursive))
}

async fn debounce_loop(
    mut raw_rx: UnboundedReceiver<PathBuf>,
    event_tx: UnboundedSender<ChangeEvent>,
    debounce: Duration,
) {
    let mut pending: HashSet<String> = HashSet::new();

    let debounce_sleep = tokio::time::sleep(debounce);
    tokio::pin!(debounce_sleep);

    loop {
        tokio::select! {
            path = raw_rx.recv() => {
                let Some(path) = path else {
                    break;
                };

                pending.insert(LocalStore::uri_for(&path));
                debounce_sleep.as_mut().reset(tokio::time::Instant::now() + debounce);
            }

            _ = &mut debounce_sleep, if !pending.is_empty() => {
                let event = ChangeEvent {
                    changed_paths: std::mem::take(&mut pending),
                };

                if event_tx.send(event).is_err() {
                    return;
                }
            }
        }
    }

    if !pending.is_empty() {
        let _ = event_tx.send(ChangeEvent {
            changed_paths: pending,
        });
    }

    debug!("File watcher stopped");
}

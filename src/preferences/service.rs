use std::sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicU64, Ordering},
};

use futures::{Stream, StreamExt};
use serde::de::DeserializeOwned;
use tokio::{
    sync::{Notify, watch},
    task::JoinHandle,
};
use tracing::{debug, info, instrument, warn};

use super::{
    BackingStore, ChangeEvent, LoadError, Loader, Notifier, PreferenceChange, PreferenceValue,
    Snapshot, Subscription, SubscriptionId, diff, snapshot::SnapshotStore,
};

/// Lifecycle of the preference service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileState {
    /// No document has been loaded successfully yet.
    Uninitialized,
    /// A reconciliation pass is running.
    Loading,
    /// The current snapshot reflects the last successful pass.
    Ready,
}

#[derive(Debug, Clone, Copy, Default)]
struct Progress {
    completed: u64,
    stopped: bool,
}

/// Keeps an in-memory copy of the preference document in sync with its
/// backing store and reports every added, removed or modified preference.
///
/// Reconciliation passes run on a background task, one at a time. Requests
/// that arrive while a pass is running are collapsed into a single follow-up
/// pass. Within a pass all changes are published before the new snapshot is
/// installed, so a handler that reads [`get`](Self::get) still sees the old
/// value.
///
/// Reads never fail: until a document has been loaded every preference is
/// reported as absent, and a failed load keeps serving the previous snapshot.
#[derive(Clone)]
pub struct PreferenceService {
    inner: Arc<ServiceInner>,
    tasks: Arc<TaskSet>,
}

struct ServiceInner {
    loader: Loader,
    snapshots: SnapshotStore,
    notifier: Notifier,
    wake: Notify,
    requested: AtomicU64,
    progress: watch::Sender<Progress>,
    state: watch::Sender<ReconcileState>,
    last_error: Mutex<Option<Arc<LoadError>>>,
}

#[derive(Default)]
struct TaskSet {
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl PreferenceService {
    /// Creates the service and starts the initial load.
    ///
    /// # Arguments
    /// * `store` - Where the preference document is read from
    /// * `changes` - Stream of change notifications, followed for the lifetime of the service
    /// * `preference_path` - Location of the document relative to the workspace root
    ///
    /// # Panics
    /// Panics if called outside of a Tokio runtime.
    pub fn new<S>(store: Arc<dyn BackingStore>, changes: S, preference_path: &str) -> Self
    where
        S: Stream<Item = ChangeEvent> + Send + 'static,
    {
        Self::with_notifier(store, changes, preference_path, Notifier::new())
    }

    /// Like [`new`](Self::new), publishing through an existing notifier.
    ///
    /// Handlers registered on `notifier` beforehand are guaranteed to see the
    /// changes of the initial load.
    ///
    /// # Panics
    /// Panics if called outside of a Tokio runtime.
    pub fn with_notifier<S>(
        store: Arc<dyn BackingStore>,
        changes: S,
        preference_path: &str,
        notifier: Notifier,
    ) -> Self
    where
        S: Stream<Item = ChangeEvent> + Send + 'static,
    {
        let (progress, _) = watch::channel(Progress::default());
        let (state, _) = watch::channel(ReconcileState::Uninitialized);

        let inner = Arc::new(ServiceInner {
            loader: Loader::new(store, preference_path),
            snapshots: SnapshotStore::default(),
            notifier,
            wake: Notify::new(),
            requested: AtomicU64::new(0),
            progress,
            state,
            last_error: Mutex::new(None),
        });

        let tasks = TaskSet::default();
        tasks.push(tokio::spawn(reconcile_loop(Arc::clone(&inner))));
        tasks.push(tokio::spawn(follow_changes(Arc::clone(&inner), changes)));

        inner.request_pass();

        Self {
            inner,
            tasks: Arc::new(tasks),
        }
    }

    /// Whether `name` is set in the current snapshot.
    pub fn has(&self, name: &str) -> bool {
        self.inner
            .snapshots
            .current()
            .is_some_and(|snapshot| snapshot.contains(name))
    }

    /// The current value of `name`, or `None` if unset or not loaded yet.
    pub fn get(&self, name: &str) -> Option<PreferenceValue> {
        self.inner
            .snapshots
            .current()
            .and_then(|snapshot| snapshot.get(name).cloned())
    }

    /// The current value of `name` converted to `T`.
    ///
    /// Returns `None` when the preference is unset or its value does not
    /// deserialize into `T`.
    pub fn get_as<T>(&self, name: &str) -> Option<T>
    where
        T: DeserializeOwned,
    {
        let value = self.get(name)?;
        match serde_json::from_value(value) {
            Ok(typed) => Some(typed),
            Err(e) => {
                debug!(name, error = %e, "Preference value has unexpected type");
                None
            }
        }
    }

    /// Names of all preferences in the current snapshot, in document order.
    pub fn keys(&self) -> Vec<String> {
        self.inner
            .snapshots
            .current()
            .map(|snapshot| snapshot.values().keys().cloned().collect())
            .unwrap_or_default()
    }

    /// The current snapshot, if one has been loaded.
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.inner.snapshots.current()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ReconcileState {
        *self.inner.state.borrow()
    }

    /// Receiver that observes lifecycle transitions.
    pub fn watch_state(&self) -> watch::Receiver<ReconcileState> {
        self.inner.state.subscribe()
    }

    /// The error of the most recent pass, cleared by the next successful one.
    pub fn last_error(&self) -> Option<Arc<LoadError>> {
        self.inner.last_error().clone()
    }

    /// Resolved identifier of the preference document.
    ///
    /// # Errors
    /// Returns `LoadError::ReadFailed` if the workspace root is unavailable.
    pub async fn source_uri(&self) -> Result<String, LoadError> {
        self.inner.loader.source_uri().await.map(str::to_string)
    }

    /// The notifier changes are published through.
    pub fn notifier(&self) -> &Notifier {
        &self.inner.notifier
    }

    /// Registers a handler for every preference change.
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&PreferenceChange) + Send + Sync + 'static,
    {
        self.inner.notifier.subscribe(handler)
    }

    /// Removes a handler registered with [`subscribe`](Self::subscribe).
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner.notifier.unsubscribe(id);
    }

    /// Streams changes of preferences whose name matches `pattern`.
    pub fn subscribe_stream(&self, pattern: &str) -> Subscription {
        self.inner.notifier.subscribe_stream(pattern)
    }

    /// Requests a pass and waits for one that started after the request.
    pub async fn refresh(&self) {
        let target = self.inner.request_pass();
        self.wait_for(target).await;
    }

    /// Waits until every pass requested so far has completed.
    pub async fn settled(&self) {
        let target = self.inner.requested.load(Ordering::SeqCst);
        self.wait_for(target).await;
    }

    /// Stops following the change source and reconciling.
    ///
    /// Reads keep serving the last snapshot. Pending and future
    /// [`refresh`](Self::refresh) calls return immediately.
    pub fn shutdown(&self) {
        self.tasks.abort_all();
        self.inner.progress.send_modify(|progress| progress.stopped = true);
        debug!("Preference service stopped");
    }

    async fn wait_for(&self, target: u64) {
        let mut progress = self.inner.progress.subscribe();
        let _ = progress
            .wait_for(|progress| progress.stopped || progress.completed >= target)
            .await;
    }
}

impl ServiceInner {
    /// Records a pass request and wakes the reconcile loop.
    ///
    /// Wake-ups that arrive while a pass runs leave a single permit behind,
    /// which yields exactly one follow-up pass.
    fn request_pass(&self) -> u64 {
        let ticket = self.requested.fetch_add(1, Ordering::SeqCst) + 1;
        self.wake.notify_one();
        ticket
    }

    fn last_error(&self) -> std::sync::MutexGuard<'_, Option<Arc<LoadError>>> {
        self.last_error.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[instrument(skip(self))]
    async fn reconcile(&self) {
        self.state.send_replace(ReconcileState::Loading);

        match self.loader.load().await {
            Ok(next) => {
                let previous = self.snapshots.current();
                let changes = diff::diff(previous.as_deref().map(Snapshot::values), next.values());

                for change in &changes {
                    self.notifier.publish(change);
                }

                self.snapshots.replace(next);
                *self.last_error() = None;
                self.state.send_replace(ReconcileState::Ready);

                info!(changes = changes.len(), "Preferences reconciled");
            }
            Err(e) => {
                match &e {
                    LoadError::NotFound { uri } => {
                        info!(uri = %uri, "Preference document not found, keeping current preferences");
                    }
                    _ => warn!(error = %e, "Failed to load preferences, keeping current preferences"),
                }

                *self.last_error() = Some(Arc::new(e));

                let state = if self.snapshots.current().is_some() {
                    ReconcileState::Ready
                } else {
                    ReconcileState::Uninitialized
                };
                self.state.send_replace(state);
            }
        }
    }
}

async fn reconcile_loop(inner: Arc<ServiceInner>) {
    loop {
        inner.wake.notified().await;

        let covered = inner.requested.load(Ordering::SeqCst);
        inner.reconcile().await;

        inner.progress.send_modify(|progress| {
            progress.completed = progress.completed.max(covered);
        });
    }
}

async fn follow_changes<S>(inner: Arc<ServiceInner>, changes: S)
where
    S: Stream<Item = ChangeEvent> + Send + 'static,
{
    tokio::pin!(changes);

    while let Some(event) = changes.next().await {
        let uri = match inner.loader.source_uri().await {
            Ok(uri) => uri,
            Err(e) => {
                warn!(error = %e, "Cannot resolve preference source, ignoring change event");
                continue;
            }
        };

        if event.affects(uri) {
            debug!(uri = %uri, "Preference document changed");
            inner.request_pass();
        }
    }

    debug!("Change source closed");
}

impl TaskSet {
    fn push(&self, handle: JoinHandle<()>) {
        self.handles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(handle);
    }

    fn abort_all(&self) {
        for handle in self
            .handles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
        {
            handle.abort();
        }
    }
}

impl Drop for TaskSet {
    fn drop(&mut self) {
        self.abort_all();
    }
}

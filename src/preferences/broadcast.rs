use std::{
    panic::{self, AssertUnwindSafe},
    pin::Pin,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError, Weak,
        atomic::{AtomicUsize, Ordering},
    },
    task::{Context, Poll},
};

use futures::Stream;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{debug, error};

use super::{PreferenceChange, path_ops::key_matches};

/// Identifies a handler registered with a [`Notifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(usize);

type Handler = Arc<dyn Fn(&PreferenceChange) + Send + Sync>;

/// Publish/subscribe channel for preference changes.
///
/// Handlers run synchronously on the publishing task, in the order they
/// subscribed. A handler that panics is logged and skipped; the remaining
/// handlers still see the change and the publisher is unaffected. Publishing
/// with no subscribers is a no-op.
#[derive(Clone, Default)]
pub struct Notifier {
    inner: Arc<NotifierInner>,
}

#[derive(Default)]
struct NotifierInner {
    next_id: AtomicUsize,
    handlers: Mutex<Vec<(SubscriptionId, Handler)>>,
}

impl Notifier {
    /// Creates a notifier with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler invoked for every published change.
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&PreferenceChange) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        self.handlers().push((id, Arc::new(handler)));
        id
    }

    /// Removes a handler. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.handlers().retain(|(handler_id, _)| *handler_id != id);
    }

    /// Subscribes to changes whose key matches `pattern` as an async stream.
    ///
    /// Pattern matching supports wildcards like "editor.*" or "*". The
    /// subscription is removed when the returned handle is dropped.
    pub fn subscribe_stream(&self, pattern: &str) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let pattern = pattern.to_string();

        let id = self.subscribe(move |change| {
            if key_matches(&change.key, &pattern) {
                let _ = tx.send(change.clone());
            }
        });

        Subscription {
            id,
            notifier: Arc::downgrade(&self.inner),
            receiver: rx,
        }
    }

    /// Delivers `change` to every current subscriber.
    pub fn publish(&self, change: &PreferenceChange) {
        let handlers: Vec<Handler> = self
            .handlers()
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();

        if handlers.is_empty() {
            debug!(key = %change.key, "No subscribers for preference change");
            return;
        }

        for handler in handlers {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| handler(change)));
            if outcome.is_err() {
                error!(key = %change.key, "Preference change handler panicked");
            }
        }
    }

    /// Number of registered handlers.
    pub fn subscriber_count(&self) -> usize {
        self.handlers().len()
    }

    fn handlers(&self) -> MutexGuard<'_, Vec<(SubscriptionId, Handler)>> {
        self.inner.handlers()
    }
}

impl NotifierInner {
    fn handlers(&self) -> MutexGuard<'_, Vec<(SubscriptionId, Handler)>> {
        self.handlers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A stream subscription that automatically cleans up when dropped.
pub struct Subscription {
    id: SubscriptionId,
    notifier: Weak<NotifierInner>,
    receiver: UnboundedReceiver<PreferenceChange>,
}

impl Subscription {
    /// Waits for the next matching change.
    ///
    /// Returns `None` once every handle to the notifier is dropped and all
    /// buffered changes have been consumed.
    pub async fn recv(&mut self) -> Option<PreferenceChange> {
        self.receiver.recv().await
    }

    /// Returns a buffered change without waiting.
    pub fn try_recv(&mut self) -> Option<PreferenceChange> {
        self.receiver.try_recv().ok()
    }
}

impl Stream for Subscription {
    type Item = PreferenceChange;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.notifier.upgrade() {
            inner.handlers().retain(|(handler_id, _)| *handler_id != self.id);
        }
    }
}

//! Keyed async tasks that report back with an action.
//!
//! A key names a slot: at most one task runs per key, and spawning into an
//! occupied slot aborts the occupant. A fresh listing fetch therefore
//! replaces the one still in flight, and `cancel_all` on logout leaves no
//! request behind.
//!
//! ```ignore
//! tasks.spawn("listings", async move {
//!     match fetch_listings(&api, 7, 1, 10).await {
//!         Ok(listings) => ListingAction::DidLoad { generation, restaurant_id: 7, page: 1, listings }.into(),
//!         Err(err) => ListingAction::DidFail { generation, reason: err.to_string() }.into(),
//!     }
//! });
//! tasks.debounce("search", Duration::from_millis(300), search_future);
//! ```

use std::borrow::Cow;
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::AbortHandle;

use crate::Action;

/// Slot name for a task.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct TaskKey(Cow<'static, str>);

impl TaskKey {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for TaskKey {
    fn from(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }
}

impl From<String> for TaskKey {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

/// Registry of running tasks, one per [`TaskKey`].
///
/// Each task resolves to an action that is sent on `action_tx`. An aborted
/// task sends nothing. Dropping the manager aborts everything it tracks.
pub struct TaskManager<A> {
    running: HashMap<TaskKey, AbortHandle>,
    action_tx: mpsc::UnboundedSender<A>,
}

impl<A: Action> TaskManager<A> {
    pub fn new(action_tx: mpsc::UnboundedSender<A>) -> Self {
        Self {
            running: HashMap::new(),
            action_tx,
        }
    }

    /// Run `future` under `key`, aborting whatever ran there before.
    pub fn spawn<F>(&mut self, key: impl Into<TaskKey>, future: F) -> &mut Self
    where
        F: Future<Output = A> + Send + 'static,
    {
        let key = key.into();
        self.cancel(&key);
        self.running.retain(|_, handle| !handle.is_finished());

        let tx = self.action_tx.clone();
        let handle = tokio::spawn(async move {
            let _ = tx.send(future.await);
        });
        self.running.insert(key, handle.abort_handle());
        self
    }

    /// Like [`Self::spawn`], after `delay`. Respawning the key restarts the wait.
    pub fn debounce<F>(&mut self, key: impl Into<TaskKey>, delay: Duration, future: F) -> &mut Self
    where
        F: Future<Output = A> + Send + 'static,
    {
        self.spawn(key, async move {
            tokio::time::sleep(delay).await;
            future.await
        })
    }

    pub fn cancel(&mut self, key: &TaskKey) {
        if let Some(handle) = self.running.remove(key) {
            handle.abort();
        }
    }

    pub fn cancel_all(&mut self) {
        if self.running.is_empty() {
            return;
        }
        tracing::debug!(count = self.running.len(), "Cancelling in-flight tasks");
        self.running.drain().for_each(|(_, handle)| handle.abort());
    }

    pub fn is_running(&self, key: &TaskKey) -> bool {
        self.running
            .get(key)
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Whether any tracked task has yet to finish.
    pub fn has_running(&self) -> bool {
        self.running.values().any(|handle| !handle.is_finished())
    }

    /// Tracked tasks, including finished ones not yet pruned.
    pub fn len(&self) -> usize {
        self.running.len()
    }

    pub fn is_empty(&self) -> bool {
        self.running.is_empty()
    }

    pub fn running_keys(&self) -> impl Iterator<Item = &TaskKey> {
        self.running.keys()
    }
}

impl<A> Drop for TaskManager<A> {
    fn drop(&mut self) {
        self.running.drain().for_each(|(_, handle)| handle.abort());
    }
}

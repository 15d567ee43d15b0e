//! Keyed, cancellable deferred tasks.
//!
//! Each key owns at most one pending task. Scheduling a key again aborts the
//! previous task for that key; dropping the set aborts everything still
//! pending. Tasks report back by sending an event, so all state changes still
//! happen on the event loop.

use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::time::Duration;

use tokio::task::JoinHandle;

pub struct DeferredTasks<K> {
    handles: HashMap<K, JoinHandle<()>>,
}

impl<K> DeferredTasks<K>
where
    K: Eq + Hash + Copy + Debug,
{
    pub fn new() -> Self {
        Self {
            handles: HashMap::new(),
        }
    }

    /// Run `task` after `after` has elapsed, replacing any pending task for `key`.
    pub fn schedule<F>(&mut self, key: K, after: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.spawn(key, async move {
            tokio::time::sleep(after).await;
            task.await;
        });
    }

    /// Run `task` immediately, replacing any pending task for `key`.
    pub fn spawn<F>(&mut self, key: K, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if let Some(previous) = self.handles.insert(key, tokio::spawn(task)) {
            if !previous.is_finished() {
                previous.abort();
                tracing::debug!(key = ?key, "Superseded pending task");
            }
        }
    }

    /// Abort the pending task for `key`. Returns true if one was still running.
    pub fn cancel(&mut self, key: K) -> bool {
        match self.handles.remove(&key) {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                tracing::debug!(key = ?key, "Cancelled pending task");
                true
            }
            _ => false,
        }
    }

    /// Abort every pending task.
    pub fn cancel_all(&mut self) {
        for (key, handle) in self.handles.drain() {
            if !handle.is_finished() {
                handle.abort();
                tracing::debug!(key = ?key, "Cancelled pending task on teardown");
            }
        }
    }

    pub fn is_pending(&self, key: K) -> bool {
        self.handles
            .get(&key)
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl<K> Default for DeferredTasks<K>
where
    K: Eq + Hash + Copy + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Drop for DeferredTasks<K> {
    fn drop(&mut self) {
        for (_, handle) in self.handles.drain() {
            handle.abort();
        }
    }
}

//! Where submitted topic preferences go.
//!
//! Preferences live only for the session; the bundled store just waits out a
//! simulated write delay and keeps the last saved selection in memory.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::catalog::Topic;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Failed to save topic preferences: {0}")]
    Failed(String),
}

/// An asynchronous sink for submitted topic selections.
#[async_trait]
pub trait TopicStore: Send + Sync {
    async fn save(&self, topics: &[Topic]) -> Result<(), StoreError>;
}

/// In-memory store with a fixed write latency. Never fails.
pub struct SimulatedStore {
    delay: Duration,
    saved: Mutex<Option<Vec<Topic>>>,
}

impl SimulatedStore {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            saved: Mutex::new(None),
        }
    }

    /// Most recently saved selection.
    pub async fn last_saved(&self) -> Option<Vec<Topic>> {
        self.saved.lock().await.clone()
    }
}

#[async_trait]
impl TopicStore for SimulatedStore {
    async fn save(&self, topics: &[Topic]) -> Result<(), StoreError> {
        tokio::time::sleep(self.delay).await;
        *self.saved.lock().await = Some(topics.to_vec());
        tracing::debug!(count = topics.len(), "Stored topic preferences in memory");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_simulated_store_delays_and_records() {
        let store = SimulatedStore::new(Duration::from_millis(1500));
        let start = tokio::time::Instant::now();
        let topics = vec![Topic::from("Philosophy")];

        store.save(&topics).await.unwrap();

        assert!(start.elapsed() >= Duration::from_millis(1500));
        assert_eq!(store.last_saved().await, Some(topics));
    }

    #[tokio::test]
    async fn test_nothing_saved_initially() {
        let store = SimulatedStore::new(Duration::ZERO);
        assert_eq!(store.last_saved().await, None);
    }
}

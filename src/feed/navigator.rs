//! Which article is on screen, and how the user moves between them.
//!
//! The navigator is a plain owned struct. Every operation runs to completion
//! synchronously and emits exactly one `FeedEvent` when it changes state.

use std::sync::Arc;

use tokio::sync::mpsc;

use super::types::{Article, FeedError};
use crate::notify::Notifier;

// ============================================================================
// Random Index Provider
// ============================================================================

/// Source of uniformly distributed indices for "Knowledge Roulette".
pub trait RandomIndex: Send {
    /// Return an index in `[0, len)`. `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;
}

/// `fastrand`-backed provider used by the application.
pub struct FastRandIndex {
    rng: fastrand::Rng,
}

impl FastRandIndex {
    pub fn new() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }

    /// Deterministic provider for reproducible sessions.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }
}

impl Default for FastRandIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomIndex for FastRandIndex {
    fn pick(&mut self, len: usize) -> usize {
        self.rng.usize(..len)
    }
}

// ============================================================================
// Notifications
// ============================================================================

/// One notification per navigator transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    /// A new article list replaced the old one. `count` may be zero.
    Loaded { count: usize },
    /// Moved forward to `index`.
    Advanced { index: usize },
    /// Advanced past the last article and wrapped to the first.
    Restarted,
    /// Random jump landed on `index`.
    Jumped { index: usize },
    /// Direct selection of `index`.
    Selected { index: usize },
}

/// Result of `advance()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Next(usize),
    Wrapped,
}

// ============================================================================
// FeedNavigator
// ============================================================================

/// Ordered article list plus the currently displayed position.
///
/// Invariant: `current < articles.len()` whenever `articles` is non-empty.
pub struct FeedNavigator {
    articles: Arc<Vec<Article>>,
    current: usize,
    random: Box<dyn RandomIndex>,
    notifier: Notifier<FeedEvent>,
}

impl FeedNavigator {
    pub fn new(random: Box<dyn RandomIndex>) -> Self {
        Self {
            articles: Arc::new(Vec::new()),
            current: 0,
            random,
            notifier: Notifier::new(),
        }
    }

    /// Replace the article list wholesale and return to the first article.
    pub fn load(&mut self, articles: Vec<Article>) {
        let count = articles.len();
        self.articles = Arc::new(articles);
        self.current = 0;
        tracing::debug!(count, "Feed loaded");
        self.notifier.emit(FeedEvent::Loaded { count });
    }

    /// Move to the next article, wrapping to the first after the last.
    pub fn advance(&mut self) -> Result<Advance, FeedError> {
        let len = self.non_empty_len()?;

        if self.current + 1 < len {
            self.current += 1;
            tracing::debug!(index = self.current, "Advanced");
            self.notifier.emit(FeedEvent::Advanced {
                index: self.current,
            });
            Ok(Advance::Next(self.current))
        } else {
            self.current = 0;
            tracing::debug!(len, "Reached end of feed, restarting");
            self.notifier.emit(FeedEvent::Restarted);
            Ok(Advance::Wrapped)
        }
    }

    /// Jump to a uniformly chosen article.
    pub fn jump_random(&mut self) -> Result<usize, FeedError> {
        let len = self.non_empty_len()?;
        // Keep the index in range whatever the provider returns
        let index = self.random.pick(len) % len;
        self.current = index;
        tracing::debug!(index, "Random jump");
        self.notifier.emit(FeedEvent::Jumped { index });
        Ok(index)
    }

    /// Select a specific article, e.g. from the History tab.
    pub fn jump_to(&mut self, index: usize) -> Result<(), FeedError> {
        let len = self.non_empty_len()?;
        if index >= len {
            return Err(FeedError::IndexOutOfRange { index, len });
        }
        self.current = index;
        self.notifier.emit(FeedEvent::Selected { index });
        Ok(())
    }

    /// The article on screen, or `None` before the first load.
    pub fn current_article(&self) -> Option<&Article> {
        self.articles.get(self.current)
    }

    /// Current position, or `None` while the feed is empty.
    pub fn index(&self) -> Option<usize> {
        if self.articles.is_empty() {
            None
        } else {
            Some(self.current)
        }
    }

    pub fn count(&self) -> usize {
        self.articles.len()
    }

    /// Shared handle to the loaded articles.
    pub fn articles(&self) -> Arc<Vec<Article>> {
        Arc::clone(&self.articles)
    }

    /// Receive every navigator notification emitted from now on.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<FeedEvent> {
        self.notifier.subscribe()
    }

    /// Replay all navigator notifications from the start of the session.
    pub fn history(&self) -> impl Iterator<Item = &FeedEvent> {
        self.notifier.history()
    }

    fn non_empty_len(&self) -> Result<usize, FeedError> {
        match self.articles.len() {
            0 => Err(FeedError::EmptyFeed),
            len => Ok(len),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

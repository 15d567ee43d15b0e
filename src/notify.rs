//! State-change notification fan-out.
//!
//! Each state machine owns a `Notifier`. Every transition is appended to an
//! in-memory journal and forwarded to all live subscribers. Subscribers use
//! unbounded channels, so a slow consumer never causes a notification to be
//! dropped or merged with another one.
use tokio::sync::mpsc;

/// Journal plus subscriber list for one state machine.
#[derive(Debug)]
pub struct Notifier<E> {
    journal: Vec<E>,
    subscribers: Vec<mpsc::UnboundedSender<E>>,
}

impl<E: Clone> Notifier<E> {
    pub fn new() -> Self {
        Self {
            journal: Vec::new(),
            subscribers: Vec::new(),
        }
    }

    /// Record a notification and deliver it to every subscriber.
    ///
    /// Subscribers whose receiver was dropped are pruned here.
    pub fn emit(&mut self, event: E) {
        self.subscribers
            .retain(|tx| tx.send(event.clone()).is_ok());
        self.journal.push(event);
    }

    /// Receive every notification emitted from now on.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<E> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    /// Replay the journal from the beginning.
    ///
    /// The iterator is lazy and can be requested again at any time to start over.
    pub fn history(&self) -> std::slice::Iter<'_, E> {
        self.journal.iter()
    }
}

impl<E: Clone> Default for Notifier<E> {
    fn default() -> Self {
        Self::new()
    }
}

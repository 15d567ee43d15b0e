//! Topic preference picker: live filter, bounded multi-select, and the
//! submit → saved → auto-close → clear workflow.
//!
//! The selector never sleeps or spawns. Operations that start a delayed
//! transition hand back a [`Scheduled`] (or a [`SubmitTicket`] for the save),
//! and the caller feeds the outcome back through [`TopicSelector::fire`] or
//! [`TopicSelector::complete_save`]. Each of those carries the generation that
//! created it; any later user action that supersedes the pending transition
//! advances the generation, so a late timer is ignored instead of acting on
//! newer state.

use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::catalog::{Topic, TopicCatalog};
use crate::notify::Notifier;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopicError {
    /// Submit with nothing selected.
    #[error("Select at least one topic first")]
    EmptySelection,

    /// Toggle would exceed the selection cap. The selection is unchanged.
    #[error("You can select up to {max} topics")]
    SelectionLimitReached { max: usize },

    /// A save is in flight.
    #[error("Still saving your preferences")]
    Busy,

    /// Submit while the picker is not showing its selection form.
    #[error("Topic picker is not open")]
    NotOpen,

    #[error("Unknown topic '{0}'")]
    UnknownTopic(String),
}

impl TopicError {
    /// True for signals that are worth showing but are not failures.
    pub fn is_informational(&self) -> bool {
        matches!(self, Self::SelectionLimitReached { .. })
    }
}

// ============================================================================
// State
// ============================================================================

/// Lifecycle stage of the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Modal hidden.
    #[default]
    Idle,
    /// Modal visible, accepting input.
    Open,
    /// Save in flight.
    Submitting,
    /// Save finished; confirmation visible until the settle timer fires.
    Submitted,
}

impl Phase {
    pub fn is_visible(self) -> bool {
        self != Self::Idle
    }
}

/// Tunables for the selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorConfig {
    /// Maximum number of simultaneously selected topics.
    pub max_selected: usize,
    /// How long the confirmation stays visible before the modal closes.
    pub settle: Duration,
    /// Delay between the modal closing and the selection being cleared.
    pub clear_delay: Duration,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            max_selected: 5,
            settle: Duration::from_millis(2000),
            clear_delay: Duration::from_millis(300),
        }
    }
}

/// Outcome of a successful toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggled {
    Added,
    Removed,
}

/// Which delayed transition a timer drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Deferred {
    /// `Submitted -> Idle`.
    Settle,
    /// Clear selection and query after the modal has closed.
    Clear,
}

/// A delayed transition the caller must schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduled {
    pub task: Deferred,
    pub generation: u64,
    pub after: Duration,
}

/// A pending save started by [`TopicSelector::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitTicket {
    pub generation: u64,
    pub topics: Vec<Topic>,
}

/// One notification per selector transition or signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicEvent {
    Opened,
    /// Modal hidden. `submitted` is true when closing after a successful save.
    Closed { submitted: bool },
    QueryChanged { query: String },
    Added(Topic),
    Removed(Topic),
    LimitReached(Topic),
    SubmitStarted { count: usize },
    Submitted,
    SaveFailed { reason: String },
    /// Selection and query cleared after a completed submission.
    Cleared,
    /// Selection and query cleared by an explicit reset.
    Reset,
}

// ============================================================================
// TopicSelector
// ============================================================================

pub struct TopicSelector {
    catalog: TopicCatalog,
    config: SelectorConfig,
    phase: Phase,
    query: String,
    /// Insertion-ordered, never longer than `config.max_selected`.
    selected: Vec<Topic>,
    /// Advanced whenever pending deferred work becomes obsolete.
    generation: u64,
    /// A post-submission clear is owed.
    clear_pending: bool,
    notifier: Notifier<TopicEvent>,
}

impl TopicSelector {
    pub fn new(catalog: TopicCatalog, config: SelectorConfig) -> Self {
        Self {
            catalog,
            config,
            phase: Phase::Idle,
            query: String::new(),
            selected: Vec::new(),
            generation: 0,
            clear_pending: false,
            notifier: Notifier::new(),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn selected(&self) -> &[Topic] {
        &self.selected
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Catalog topics matching the current query, in catalog order.
    pub fn filtered(&self) -> Vec<Topic> {
        self.catalog.filter(&self.query)
    }

    pub fn catalog(&self) -> &TopicCatalog {
        &self.catalog
    }

    pub fn max_selected(&self) -> usize {
        self.config.max_selected
    }

    pub fn is_selected(&self, topic: &str) -> bool {
        self.selected.iter().any(|t| &**t == topic)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    // ========================================================================
    // User operations
    // ========================================================================

    /// Show the picker. No-op if it is already visible.
    ///
    /// A clear still owed from the previous submission is applied right away
    /// so the reopened picker starts empty.
    pub fn open(&mut self) {
        if self.phase != Phase::Idle {
            return;
        }
        self.bump_generation();
        if self.clear_pending {
            self.apply_clear();
        }
        self.phase = Phase::Open;
        tracing::debug!("Topic picker opened");
        self.notifier.emit(TopicEvent::Opened);
    }

    /// Hide the picker.
    ///
    /// Closing during the confirmation skips the rest of the settle window and
    /// returns the clear that follows it.
    pub fn close(&mut self) -> Result<Option<Scheduled>, TopicError> {
        match self.phase {
            Phase::Submitting => Err(TopicError::Busy),
            Phase::Idle => Ok(None),
            Phase::Open => {
                self.bump_generation();
                self.phase = Phase::Idle;
                self.notifier.emit(TopicEvent::Closed { submitted: false });
                Ok(None)
            }
            Phase::Submitted => {
                self.bump_generation();
                Ok(Some(self.close_submitted()))
            }
        }
    }

    /// Replace the search query.
    pub fn set_query(&mut self, text: &str) -> Result<(), TopicError> {
        self.ensure_editable()?;
        if self.query != text {
            self.query = text.to_string();
            self.notifier.emit(TopicEvent::QueryChanged {
                query: self.query.clone(),
            });
        }
        Ok(())
    }

    /// Select or deselect a catalog topic.
    pub fn toggle(&mut self, topic: &str) -> Result<Toggled, TopicError> {
        self.ensure_editable()?;
        let topic = self
            .catalog
            .get(topic)
            .cloned()
            .ok_or_else(|| TopicError::UnknownTopic(topic.to_string()))?;

        if let Some(pos) = self.selected.iter().position(|t| *t == topic) {
            self.selected.remove(pos);
            self.notifier.emit(TopicEvent::Removed(topic));
            return Ok(Toggled::Removed);
        }

        if self.selected.len() >= self.config.max_selected {
            tracing::debug!(topic = %topic, max = self.config.max_selected, "Selection limit reached");
            self.notifier.emit(TopicEvent::LimitReached(topic));
            return Err(TopicError::SelectionLimitReached {
                max: self.config.max_selected,
            });
        }

        self.selected.push(Topic::clone(&topic));
        self.notifier.emit(TopicEvent::Added(topic));
        Ok(Toggled::Added)
    }

    /// Start saving the current selection.
    pub fn submit(&mut self) -> Result<SubmitTicket, TopicError> {
        match self.phase {
            Phase::Submitting => return Err(TopicError::Busy),
            Phase::Open => {}
            Phase::Idle | Phase::Submitted => return Err(TopicError::NotOpen),
        }
        if self.selected.is_empty() {
            return Err(TopicError::EmptySelection);
        }

        self.bump_generation();
        self.phase = Phase::Submitting;
        let count = self.selected.len();
        tracing::info!(count, generation = self.generation, "Submitting topic preferences");
        self.notifier.emit(TopicEvent::SubmitStarted { count });

        Ok(SubmitTicket {
            generation: self.generation,
            topics: self.selected.clone(),
        })
    }

    /// Clear selection and query without touching the phase.
    pub fn reset(&mut self) -> Result<(), TopicError> {
        if self.phase == Phase::Submitting {
            return Err(TopicError::Busy);
        }
        self.selected.clear();
        self.query.clear();
        self.clear_pending = false;
        self.notifier.emit(TopicEvent::Reset);
        Ok(())
    }

    /// Invalidate every outstanding ticket and timer, e.g. on teardown.
    pub fn cancel_pending(&mut self) {
        self.bump_generation();
    }

    // ========================================================================
    // Deferred completions
    // ========================================================================

    /// Feed back the outcome of a save started by `submit`.
    ///
    /// Returns the settle timer to schedule on success.
    pub fn complete_save(
        &mut self,
        generation: u64,
        result: Result<(), String>,
    ) -> Option<Scheduled> {
        if self.phase != Phase::Submitting || generation != self.generation {
            tracing::debug!(
                generation,
                current = self.generation,
                phase = ?self.phase,
                "Discarding stale save result"
            );
            return None;
        }

        match result {
            Ok(()) => {
                self.phase = Phase::Submitted;
                tracing::info!(count = self.selected.len(), "Topic preferences saved");
                self.notifier.emit(TopicEvent::Submitted);
                Some(Scheduled {
                    task: Deferred::Settle,
                    generation: self.generation,
                    after: self.config.settle,
                })
            }
            Err(reason) => {
                self.phase = Phase::Open;
                tracing::warn!(reason = %reason, "Saving topic preferences failed");
                self.notifier.emit(TopicEvent::SaveFailed { reason });
                None
            }
        }
    }

    /// Apply a timer firing. Returns the next timer to schedule, if any.
    pub fn fire(&mut self, task: Deferred, generation: u64) -> Option<Scheduled> {
        if generation != self.generation {
            tracing::debug!(
                task = ?task,
                generation,
                current = self.generation,
                "Ignoring stale timer"
            );
            return None;
        }

        match task {
            Deferred::Settle if self.phase == Phase::Submitted => Some(self.close_submitted()),
            Deferred::Clear if self.clear_pending => {
                self.apply_clear();
                None
            }
            _ => None,
        }
    }

    /// Receive every selector notification emitted from now on.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<TopicEvent> {
        self.notifier.subscribe()
    }

    /// Replay all selector notifications from the start of the session.
    pub fn history(&self) -> impl Iterator<Item = &TopicEvent> {
        self.notifier.history()
    }

    // ========================================================================
    // Internal Helpers
    // ========================================================================

    /// Selection and query only change while the form is showing.
    fn ensure_editable(&self) -> Result<(), TopicError> {
        match self.phase {
            Phase::Open => Ok(()),
            Phase::Submitting => Err(TopicError::Busy),
            Phase::Idle | Phase::Submitted => Err(TopicError::NotOpen),
        }
    }

    fn close_submitted(&mut self) -> Scheduled {
        self.phase = Phase::Idle;
        self.clear_pending = true;
        self.notifier.emit(TopicEvent::Closed { submitted: true });
        Scheduled {
            task: Deferred::Clear,
            generation: self.generation,
            after: self.config.clear_delay,
        }
    }

    fn apply_clear(&mut self) {
        self.selected.clear();
        self.query.clear();
        self.clear_pending = false;
        self.notifier.emit(TopicEvent::Cleared);
    }

    fn bump_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DEFAULT_TOPICS;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn selector() -> TopicSelector {
        TopicSelector::new(TopicCatalog::default(), SelectorConfig::default())
    }

    fn names(topics: &[Topic]) -> Vec<&str> {
        topics.iter().map(|t| &**t).collect()
    }

    fn open_with(topics: &[&str]) -> TopicSelector {
        let mut s = selector();
        s.open();
        for t in topics {
            s.toggle(t).unwrap();
        }
        s
    }

    #[test]
    fn test_starts_idle_and_empty() {
        let s = selector();
        assert_eq!(s.phase(), Phase::Idle);
        assert!(s.selected().is_empty());
        assert_eq!(s.query(), "");
        assert_eq!(s.filtered().len(), 15);
    }

    #[test]
    fn test_open_close_preserves_state() {
        let mut s = open_with(&["Philosophy"]);
        s.set_query("phil").unwrap();
        assert_eq!(s.close(), Ok(None));
        assert_eq!(s.phase(), Phase::Idle);
        assert_eq!(names(s.selected()), vec!["Philosophy"]);
        assert_eq!(s.query(), "phil");

        s.open();
        assert_eq!(s.phase(), Phase::Open);
        assert_eq!(names(s.selected()), vec!["Philosophy"]);
    }

    #[test]
    fn test_open_twice_is_noop() {
        let mut s = selector();
        s.open();
        s.open();
        assert_eq!(
            s.history().filter(|e| **e == TopicEvent::Opened).count(),
            1
        );
    }

    #[test]
    fn test_toggle_preserves_insertion_order() {
        let mut s = open_with(&["Mythology", "Economics", "Philosophy"]);
        assert_eq!(
            names(s.selected()),
            vec!["Mythology", "Economics", "Philosophy"]
        );

        assert_eq!(s.toggle("Economics"), Ok(Toggled::Removed));
        assert_eq!(names(s.selected()), vec!["Mythology", "Philosophy"]);

        assert_eq!(s.toggle("Economics"), Ok(Toggled::Added));
        assert_eq!(
            names(s.selected()),
            vec!["Mythology", "Philosophy", "Economics"]
        );
    }

    #[test]
    fn test_toggle_unknown_topic() {
        let mut s = open_with(&[]);
        assert_eq!(
            s.toggle("Cooking"),
            Err(TopicError::UnknownTopic("Cooking".to_string()))
        );
    }

    #[test]
    fn test_sixth_topic_rejected() {
        let mut s = open_with(&DEFAULT_TOPICS[..5]);
        let before = s.selected().to_vec();

        let err = s.toggle(DEFAULT_TOPICS[5]).unwrap_err();
        assert_eq!(err, TopicError::SelectionLimitReached { max: 5 });
        assert!(err.is_informational());
        assert_eq!(s.selected(), before.as_slice());
        assert_eq!(
            s.history().last(),
            Some(&TopicEvent::LimitReached(Topic::from(DEFAULT_TOPICS[5])))
        );
    }

    #[test]
    fn test_deselect_allowed_at_cap() {
        let mut s = open_with(&DEFAULT_TOPICS[..5]);
        assert_eq!(s.toggle(DEFAULT_TOPICS[0]), Ok(Toggled::Removed));
        assert_eq!(s.selected().len(), 4);
    }

    #[test]
    fn test_custom_cap() {
        let config = SelectorConfig {
            max_selected: 1,
            ..SelectorConfig::default()
        };
        let mut s = TopicSelector::new(TopicCatalog::default(), config);
        s.open();
        s.toggle("Philosophy").unwrap();
        assert_eq!(
            s.toggle("Economics"),
            Err(TopicError::SelectionLimitReached { max: 1 })
        );
    }

    #[test]
    fn test_submit_empty_selection_keeps_phase() {
        let mut s = open_with(&[]);
        assert_eq!(s.submit(), Err(TopicError::EmptySelection));
        assert_eq!(s.phase(), Phase::Open);
    }

    #[test]
    fn test_submit_when_closed() {
        let mut s = selector();
        assert_eq!(s.submit(), Err(TopicError::NotOpen));
        assert_eq!(s.phase(), Phase::Idle);
    }

    #[test]
    fn test_second_submit_is_busy() {
        let mut s = open_with(&["Philosophy"]);
        let ticket = s.submit().unwrap();
        assert_eq!(names(&ticket.topics), vec!["Philosophy"]);
        assert_eq!(s.submit(), Err(TopicError::Busy));
        assert_eq!(s.phase(), Phase::Submitting);
    }

    #[test]
    fn test_operations_rejected_while_submitting() {
        let mut s = open_with(&["Philosophy"]);
        s.submit().unwrap();
        assert_eq!(s.close(), Err(TopicError::Busy));
        assert_eq!(s.reset(), Err(TopicError::Busy));
        assert_eq!(s.toggle("Economics"), Err(TopicError::Busy));
        assert_eq!(s.set_query("x"), Err(TopicError::Busy));
        assert_eq!(s.phase(), Phase::Submitting);
        assert_eq!(names(s.selected()), vec!["Philosophy"]);
    }

    #[test]
    fn test_edits_rejected_unless_open() {
        let mut s = selector();
        assert_eq!(s.toggle("Philosophy"), Err(TopicError::NotOpen));
        assert_eq!(s.set_query("phil"), Err(TopicError::NotOpen));
        assert!(s.selected().is_empty());
        assert_eq!(s.query(), "");

        s.open();
        s.toggle("Philosophy").unwrap();
        let ticket = s.submit().unwrap();
        s.complete_save(ticket.generation, Ok(())).unwrap();
        assert_eq!(s.phase(), Phase::Submitted);

        // The confirmation shows exactly what was saved
        assert_eq!(s.toggle("Economics"), Err(TopicError::NotOpen));
        assert_eq!(s.toggle("Philosophy"), Err(TopicError::NotOpen));
        assert_eq!(s.set_query("zzz"), Err(TopicError::NotOpen));
        assert_eq!(names(s.selected()), vec!["Philosophy"]);
        assert_eq!(s.query(), "");
        assert_eq!(s.phase(), Phase::Submitted);
    }

    #[test]
    fn test_full_submission_flow() {
        let catalog = TopicCatalog::new(["Ancient Civilizations", "Quantum Physics"]).unwrap();
        let mut s = TopicSelector::new(catalog, SelectorConfig::default());
        s.open();
        s.toggle("Ancient Civilizations").unwrap();
        s.toggle("Quantum Physics").unwrap();
        assert_eq!(
            names(s.selected()),
            vec!["Ancient Civilizations", "Quantum Physics"]
        );

        let ticket = s.submit().unwrap();
        assert_eq!(s.phase(), Phase::Submitting);

        let settle = s.complete_save(ticket.generation, Ok(())).unwrap();
        assert_eq!(s.phase(), Phase::Submitted);
        assert_eq!(settle.task, Deferred::Settle);
        assert_eq!(settle.after, Duration::from_millis(2000));

        let clear = s.fire(settle.task, settle.generation).unwrap();
        assert_eq!(s.phase(), Phase::Idle);
        // Modal closes before the selection clears
        assert_eq!(s.selected().len(), 2);
        assert_eq!(clear.task, Deferred::Clear);

        assert_eq!(s.fire(clear.task, clear.generation), None);
        assert!(s.selected().is_empty());
        assert_eq!(s.query(), "");

        let tail: Vec<TopicEvent> = s.history().skip(3).cloned().collect();
        assert_eq!(
            tail,
            vec![
                TopicEvent::SubmitStarted { count: 2 },
                TopicEvent::Submitted,
                TopicEvent::Closed { submitted: true },
                TopicEvent::Cleared,
            ]
        );
    }

    #[test]
    fn test_save_failure_returns_to_open() {
        let mut s = open_with(&["Philosophy"]);
        let ticket = s.submit().unwrap();
        assert_eq!(
            s.complete_save(ticket.generation, Err("disk full".to_string())),
            None
        );
        assert_eq!(s.phase(), Phase::Open);
        assert_eq!(names(s.selected()), vec!["Philosophy"]);
        assert_eq!(
            s.history().last(),
            Some(&TopicEvent::SaveFailed {
                reason: "disk full".to_string()
            })
        );
    }

    #[test]
    fn test_stale_save_result_ignored() {
        let mut s = open_with(&["Philosophy"]);
        let ticket = s.submit().unwrap();
        s.cancel_pending();
        assert_eq!(s.complete_save(ticket.generation, Ok(())), None);
        assert_eq!(s.phase(), Phase::Submitting);
    }

    #[test]
    fn test_close_during_submitted_schedules_clear() {
        let mut s = open_with(&["Philosophy"]);
        let ticket = s.submit().unwrap();
        let settle = s.complete_save(ticket.generation, Ok(())).unwrap();

        let clear = s.close().unwrap().unwrap();
        assert_eq!(s.phase(), Phase::Idle);
        assert_eq!(clear.task, Deferred::Clear);

        // The original settle timer is now stale
        assert_eq!(s.fire(settle.task, settle.generation), None);
        assert_eq!(s.phase(), Phase::Idle);

        s.fire(clear.task, clear.generation);
        assert!(s.selected().is_empty());
    }

    #[test]
    fn test_reopen_before_clear_applies_it_and_stales_timer() {
        let mut s = open_with(&["Philosophy"]);
        s.set_query("ph").unwrap();
        let ticket = s.submit().unwrap();
        let settle = s.complete_save(ticket.generation, Ok(())).unwrap();
        let clear = s.fire(settle.task, settle.generation).unwrap();

        s.open();
        assert_eq!(s.phase(), Phase::Open);
        assert!(s.selected().is_empty());
        assert_eq!(s.query(), "");

        s.toggle("Economics").unwrap();
        // Late clear must not wipe the fresh selection
        assert_eq!(s.fire(clear.task, clear.generation), None);
        assert_eq!(names(s.selected()), vec!["Economics"]);
    }

    #[test]
    fn test_reset_keeps_phase() {
        let mut s = open_with(&["Philosophy", "Economics"]);
        s.set_query("eco").unwrap();
        s.reset().unwrap();
        assert_eq!(s.phase(), Phase::Open);
        assert!(s.selected().is_empty());
        assert_eq!(s.query(), "");

        s.close().unwrap();
        s.reset().unwrap();
        assert_eq!(s.phase(), Phase::Idle);
    }

    #[test]
    fn test_set_query_filters() {
        let mut s = open_with(&[]);
        s.set_query("ar").unwrap();
        assert_eq!(
            names(&s.filtered()),
            vec!["Renaissance Art", "Marine Biology", "Architecture"]
        );
        s.set_query("").unwrap();
        assert_eq!(s.filtered(), s.catalog().topics().to_vec());
    }

    #[test]
    fn test_unchanged_query_emits_nothing() {
        let mut s = open_with(&[]);
        s.set_query("a").unwrap();
        s.set_query("a").unwrap();
        assert_eq!(
            s.history()
                .filter(|e| matches!(e, TopicEvent::QueryChanged { .. }))
                .count(),
            1
        );
    }

    proptest! {
        #[test]
        fn prop_selection_never_exceeds_cap(ops in proptest::collection::vec(0usize..15, 0..60)) {
            let mut s = open_with(&[]);
            for i in ops {
                let _ = s.toggle(DEFAULT_TOPICS[i]);
                prop_assert!(s.selected().len() <= s.max_selected());
            }
        }

        #[test]
        fn prop_double_toggle_is_identity(
            initial in proptest::collection::vec(0usize..15, 0..4),
            pick in 0usize..15,
        ) {
            let mut s = open_with(&[]);
            for i in initial {
                let _ = s.toggle(DEFAULT_TOPICS[i]);
            }
            let topic = DEFAULT_TOPICS[pick];
            prop_assume!(!s.is_selected(topic));
            prop_assume!(s.selected().len() < s.max_selected());

            let before = s.selected().to_vec();
            s.toggle(topic).unwrap();
            s.toggle(topic).unwrap();
            prop_assert_eq!(s.selected(), before.as_slice());
        }

        #[test]
        fn prop_empty_submit_never_changes_phase(open in any::<bool>()) {
            let mut s = selector();
            if open {
                s.open();
            }
            let phase = s.phase();
            prop_assert!(s.submit().is_err());
            prop_assert_eq!(s.phase(), phase);
        }
    }
}

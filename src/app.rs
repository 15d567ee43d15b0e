//! Central application state.
//!
//! `App` owns both state machines plus everything the terminal adds around
//! them: tabs, followed categories, the reading list, viewing history and the
//! status line. Background work (article load, preference save, topic timers)
//! runs in [`DeferredTasks`] and reports back over the `AppEvent` channel.

use crate::config::Config;
use crate::feed::{Article, ArticleSource, FastRandIndex, FeedError, FeedEvent, FeedNavigator};
use crate::keybindings::KeybindingRegistry;
use crate::timers::DeferredTasks;
use crate::topics::{
    Deferred, Phase, Scheduled, SubmitTicket, TopicError, TopicEvent, TopicSelector, TopicStore,
};
use crate::typewriter::Typewriter;
use anyhow::Result;
use std::borrow::Cow;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// Viewing history length.
pub const MAX_HISTORY: usize = 50;

/// Longest accepted topic search query.
pub const MAX_QUERY_LENGTH: usize = 64;

// ============================================================================
// Tabs
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    ForYou,
    Following,
    History,
    Random,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::ForYou, Tab::Following, Tab::History, Tab::Random];

    pub fn title(self) -> &'static str {
        match self {
            Self::ForYou => "For You",
            Self::Following => "Following",
            Self::History => "History",
            Self::Random => "Random",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::ForYou => Self::Following,
            Self::Following => Self::History,
            Self::History => Self::Random,
            Self::Random => Self::ForYou,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::ForYou => Self::Random,
            Self::Following => Self::ForYou,
            Self::History => Self::Following,
            Self::Random => Self::History,
        }
    }

    /// Tabs that show the article card rather than a list.
    pub fn shows_card(self) -> bool {
        matches!(self, Self::ForYou | Self::Random)
    }
}

// ============================================================================
// Background Work
// ============================================================================

/// Identifies a background task slot. One task per slot at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKey {
    Load,
    Save,
    Topic(Deferred),
}

/// Events from background tasks.
#[derive(Debug)]
pub enum AppEvent {
    /// The article source resolved.
    ///
    /// Fields:
    /// - `generation`: The load generation when the task was spawned
    /// - `result`: The articles, or the source error as text
    ArticlesLoaded {
        generation: u64,
        result: Result<Vec<Article>, String>,
    },
    /// The topic store finished saving a submitted selection.
    SaveFinished {
        generation: u64,
        result: Result<(), String>,
    },
    /// A topic selector timer elapsed.
    TopicTimer { task: Deferred, generation: u64 },
}

/// A state-machine notification waiting to be shown.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    Feed(FeedEvent),
    Topic(TopicEvent),
}

// ============================================================================
// Application State
// ============================================================================

/// Central application state
pub struct App {
    /// Keybinding registry with config overrides applied.
    pub keybindings: KeybindingRegistry,

    pub feed: FeedNavigator,
    pub topics: TopicSelector,

    source: Arc<dyn ArticleSource>,
    store: Arc<dyn TopicStore>,
    tasks: DeferredTasks<TaskKey>,
    event_tx: mpsc::Sender<AppEvent>,
    feed_events: mpsc::UnboundedReceiver<FeedEvent>,
    topic_events: mpsc::UnboundedReceiver<TopicEvent>,

    /// Generation counter for article loads.
    ///
    /// Incremented each time a load is spawned; an `ArticlesLoaded` carrying
    /// any other generation is discarded.
    load_generation: u64,
    /// An article load is in flight.
    pub loading: bool,

    // UI State
    pub tab: Tab,
    /// Followed categories in the order they were followed.
    pub following: Vec<Arc<str>>,
    pub following_selected: usize,
    /// Bookmarked articles, oldest first.
    pub reading_list: Vec<Article>,
    /// Recently viewed articles, newest first.
    pub viewed: VecDeque<Article>,
    pub history_selected: usize,
    /// Highlighted row in the topic picker's filtered list.
    pub topic_cursor: usize,

    pub typewriter: Typewriter,
    typewriter_interval: Option<Duration>,

    // Status message with expiry. Cow avoids allocation for static literals.
    pub status_message: Option<(Cow<'static, str>, Instant)>,
    status_ttl: Duration,

    /// Dirty flag to skip unnecessary frame renders
    pub needs_redraw: bool,

    /// Whether the help overlay is currently displayed.
    pub show_help: bool,
    /// Scroll offset in the help screen for long keybinding lists.
    pub help_scroll_offset: usize,
}

impl App {
    pub fn new(
        config: &Config,
        source: Arc<dyn ArticleSource>,
        store: Arc<dyn TopicStore>,
        event_tx: mpsc::Sender<AppEvent>,
    ) -> Result<Self> {
        let random = match config.random_seed {
            Some(seed) => FastRandIndex::seeded(seed),
            None => FastRandIndex::new(),
        };
        let mut feed = FeedNavigator::new(Box::new(random));
        let mut topics = TopicSelector::new(config.catalog()?, config.selector_config());
        let feed_events = feed.subscribe();
        let topic_events = topics.subscribe();

        let mut keybindings = KeybindingRegistry::new();
        for warning in keybindings.apply_overrides(&config.keybindings) {
            tracing::warn!(warning = %warning, "Ignoring keybinding override");
        }

        Ok(Self {
            keybindings,
            feed,
            topics,
            source,
            store,
            tasks: DeferredTasks::new(),
            event_tx,
            feed_events,
            topic_events,
            load_generation: 0,
            loading: false,
            tab: Tab::ForYou,
            following: Vec::new(),
            following_selected: 0,
            reading_list: Vec::new(),
            viewed: VecDeque::with_capacity(MAX_HISTORY),
            history_selected: 0,
            topic_cursor: 0,
            typewriter: Typewriter::default(),
            typewriter_interval: config.typewriter_interval(),
            status_message: None,
            status_ttl: config.status_ttl(),
            needs_redraw: true,
            show_help: false,
            help_scroll_offset: 0,
        })
    }

    // ========================================================================
    // Background tasks
    // ========================================================================

    /// Start (or restart) loading articles from the configured source.
    ///
    /// Any load already in flight is aborted and its result, should it still
    /// arrive, is discarded by generation.
    pub fn spawn_feed_load(&mut self) {
        self.load_generation = self.load_generation.wrapping_add(1);
        let generation = self.load_generation;
        self.loading = true;

        let source = Arc::clone(&self.source);
        let tx = self.event_tx.clone();
        tracing::info!(source = source.name(), generation, "Loading articles");

        self.tasks.spawn(TaskKey::Load, async move {
            let result = source.fetch().await.map_err(|e| e.to_string());
            if let Err(e) = tx.send(AppEvent::ArticlesLoaded { generation, result }).await {
                tracing::warn!(error = %e, "Failed to send loaded articles (receiver dropped)");
            }
        });
    }

    /// Apply the outcome of a load started by `spawn_feed_load`.
    pub fn finish_load(&mut self, generation: u64, result: Result<Vec<Article>, String>) {
        if generation != self.load_generation {
            tracing::debug!(
                generation,
                current = self.load_generation,
                "Discarding stale article load"
            );
            return;
        }
        self.loading = false;

        match result {
            Ok(articles) => {
                tracing::info!(count = articles.len(), "Articles loaded");
                self.feed.load(articles);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Article load failed");
                self.set_status(format!("Failed to load articles: {}", e));
            }
        }
    }

    /// Submit the topic selection and start saving it in the background.
    pub fn submit_topics(&mut self) {
        let SubmitTicket { generation, topics } = match self.topics.submit() {
            Ok(ticket) => ticket,
            Err(e) => {
                self.report_topic_error(&e);
                return;
            }
        };

        let store = Arc::clone(&self.store);
        let tx = self.event_tx.clone();
        self.tasks.spawn(TaskKey::Save, async move {
            let result = store.save(&topics).await.map_err(|e| e.to_string());
            if let Err(e) = tx.send(AppEvent::SaveFinished { generation, result }).await {
                tracing::warn!(error = %e, "Failed to send save result (receiver dropped)");
            }
        });
    }

    pub fn finish_save(&mut self, generation: u64, result: Result<(), String>) {
        if let Some(next) = self.topics.complete_save(generation, result) {
            self.schedule(next);
        }
    }

    pub fn fire_topic_timer(&mut self, task: Deferred, generation: u64) {
        if let Some(next) = self.topics.fire(task, generation) {
            self.schedule(next);
        }
    }

    fn schedule(&mut self, scheduled: Scheduled) {
        let Scheduled {
            task,
            generation,
            after,
        } = scheduled;
        let tx = self.event_tx.clone();
        tracing::debug!(task = ?task, generation, after_ms = after.as_millis() as u64, "Scheduling topic timer");

        self.tasks.schedule(TaskKey::Topic(task), after, async move {
            if tx
                .send(AppEvent::TopicTimer { task, generation })
                .await
                .is_err()
            {
                tracing::debug!(task = ?task, "Topic timer fired after shutdown");
            }
        });
    }

    pub fn is_pending(&self, key: TaskKey) -> bool {
        self.tasks.is_pending(key)
    }

    /// Abort all background work and invalidate anything already queued.
    pub fn shutdown(&mut self) {
        self.tasks.cancel_all();
        self.topics.cancel_pending();
        self.load_generation = self.load_generation.wrapping_add(1);
        self.loading = false;
        tracing::debug!("Cancelled background work");
    }

    /// Next undisplayed notification from either state machine.
    pub fn next_notification(&mut self) -> Option<Notification> {
        if let Ok(event) = self.feed_events.try_recv() {
            return Some(Notification::Feed(event));
        }
        self.topic_events.try_recv().ok().map(Notification::Topic)
    }

    // ========================================================================
    // Feed actions
    // ========================================================================

    pub fn advance(&mut self) {
        if let Err(e) = self.feed.advance() {
            self.report_feed_error(&e);
        }
    }

    /// Knowledge Roulette: jump to a random article.
    pub fn random_article(&mut self) {
        match self.feed.jump_random() {
            Ok(_) => self.set_status("Knowledge Roulette activated!"),
            Err(e) => self.report_feed_error(&e),
        }
    }

    pub fn switch_tab(&mut self, tab: Tab) {
        if self.tab == tab {
            return;
        }
        self.tab = tab;
        if tab == Tab::Random {
            self.random_article();
        }
    }

    pub fn report_feed_error(&mut self, err: &FeedError) {
        match err {
            FeedError::EmptyFeed if self.loading => self.set_status("Loading knowledge…"),
            FeedError::EmptyFeed => self.set_status("No articles to show"),
            other => self.set_status(other.to_string()),
        }
    }

    /// Follow the `nth` category (0-based) of the article on screen.
    pub fn follow_category(&mut self, nth: usize) {
        let Some(article) = self.feed.current_article() else {
            self.report_feed_error(&FeedError::EmptyFeed);
            return;
        };
        let categories = article.categories.clone();

        let Some(category) = categories.get(nth) else {
            self.set_status(format!(
                "This article has only {} categories",
                categories.len()
            ));
            return;
        };

        if self.following.contains(category) {
            self.set_status(format!("Already following \"{}\"", category));
            return;
        }

        tracing::debug!(category = %category, "Following category");
        self.following.push(Arc::clone(category));
        self.set_status(format!("Now following \"{}\"", category));
    }

    /// Add the article on screen to the reading list.
    pub fn bookmark(&mut self) {
        let Some(article) = self.feed.current_article().cloned() else {
            self.report_feed_error(&FeedError::EmptyFeed);
            return;
        };

        if self.reading_list.iter().any(|a| a.id == article.id) {
            self.set_status(format!(
                "\"{}\" is already in your reading list",
                article.title
            ));
            return;
        }

        self.set_status(format!(
            "Added \"{}\" to your reading list",
            article.title
        ));
        self.reading_list.push(article);
    }

    /// Put the article on screen at the top of the viewing history.
    pub fn record_view(&mut self) {
        let Some(article) = self.feed.current_article().cloned() else {
            return;
        };
        self.viewed.retain(|a| a.id != article.id);
        self.viewed.push_front(article);
        self.viewed.truncate(MAX_HISTORY);
    }

    /// Jump to the highlighted History entry and show it.
    pub fn open_history_entry(&mut self) {
        let Some(id) = self
            .viewed
            .get(self.history_selected)
            .map(|a| Arc::clone(&a.id))
        else {
            return;
        };

        match self.feed.articles().iter().position(|a| a.id == id) {
            Some(index) => self.show_article(index),
            None => self.set_status("That article is no longer in the feed"),
        }
    }

    /// Jump to the first loaded article in the highlighted followed category.
    pub fn open_following_entry(&mut self) {
        let Some(category) = self.following.get(self.following_selected).cloned() else {
            return;
        };

        match self
            .feed
            .articles()
            .iter()
            .position(|a| a.categories.contains(&category))
        {
            Some(index) => self.show_article(index),
            None => self.set_status(format!("No loaded articles in \"{}\"", category)),
        }
    }

    fn show_article(&mut self, index: usize) {
        match self.feed.jump_to(index) {
            Ok(()) => {
                self.tab = Tab::ForYou;
                self.history_selected = 0;
            }
            Err(e) => self.report_feed_error(&e),
        }
    }

    /// Move the list highlight on the Following/History tabs.
    pub fn nav_down(&mut self) {
        let (selected, len) = match self.tab {
            Tab::Following => (&mut self.following_selected, self.following.len()),
            Tab::History => (&mut self.history_selected, self.viewed.len()),
            Tab::ForYou | Tab::Random => return,
        };
        if *selected + 1 < len {
            *selected += 1;
        }
    }

    pub fn nav_up(&mut self) {
        match self.tab {
            Tab::Following => self.following_selected = self.following_selected.saturating_sub(1),
            Tab::History => self.history_selected = self.history_selected.saturating_sub(1),
            Tab::ForYou | Tab::Random => {}
        }
    }

    // ========================================================================
    // Topic picker actions
    // ========================================================================

    pub fn open_topics(&mut self) {
        if self.topics.phase() != Phase::Idle {
            return;
        }
        self.topics.open();
        // open() applied any owed clear itself
        self.tasks.cancel(TaskKey::Topic(Deferred::Clear));
        self.topic_cursor = 0;
    }

    pub fn close_topics(&mut self) {
        match self.topics.close() {
            Ok(Some(clear)) => {
                self.tasks.cancel(TaskKey::Topic(Deferred::Settle));
                self.schedule(clear);
            }
            Ok(None) => {}
            Err(e) => self.report_topic_error(&e),
        }
    }

    pub fn toggle_topic_at_cursor(&mut self) {
        let filtered = self.topics.filtered();
        let Some(topic) = filtered.get(self.topic_cursor) else {
            return;
        };
        if let Err(e) = self.topics.toggle(topic) {
            self.report_topic_error(&e);
        }
    }

    pub fn push_query_char(&mut self, c: char) {
        if self.topics.query().chars().count() >= MAX_QUERY_LENGTH {
            self.set_status(format!(
                "Search is limited to {} characters",
                MAX_QUERY_LENGTH
            ));
            return;
        }
        let mut query = self.topics.query().to_string();
        query.push(c);
        self.set_topic_query(&query);
    }

    pub fn pop_query_char(&mut self) {
        let mut query = self.topics.query().to_string();
        if query.pop().is_some() {
            self.set_topic_query(&query);
        }
    }

    fn set_topic_query(&mut self, query: &str) {
        match self.topics.set_query(query) {
            Ok(()) => {
                let len = self.topics.filtered().len();
                self.topic_cursor = self.topic_cursor.min(len.saturating_sub(1));
            }
            Err(e) => self.report_topic_error(&e),
        }
    }

    pub fn topic_cursor_down(&mut self) {
        if self.topic_cursor + 1 < self.topics.filtered().len() {
            self.topic_cursor += 1;
        }
    }

    pub fn topic_cursor_up(&mut self) {
        self.topic_cursor = self.topic_cursor.saturating_sub(1);
    }

    pub fn reset_topics(&mut self) {
        match self.topics.reset() {
            Ok(()) => {
                self.tasks.cancel(TaskKey::Topic(Deferred::Clear));
                self.topic_cursor = 0;
            }
            Err(e) => self.report_topic_error(&e),
        }
    }

    /// Show a selector error on the status line.
    ///
    /// Informational errors are skipped here; their notification carries the
    /// message instead.
    pub fn report_topic_error(&mut self, err: &TopicError) {
        if err.is_informational() {
            return;
        }
        tracing::debug!(error = %err, "Topic operation rejected");
        self.set_status(err.to_string());
    }

    // ========================================================================
    // Typewriter
    // ========================================================================

    /// Restart the excerpt reveal for the article on screen.
    pub fn restart_typewriter(&mut self) {
        let text = self
            .feed
            .current_article()
            .map(|a| Arc::clone(&a.excerpt))
            .unwrap_or_else(|| Arc::from(""));
        self.typewriter.restart(text);
        if self.typewriter_interval.is_none() {
            self.typewriter.finish();
        }
    }

    /// Reveal one more character. Returns true if anything changed.
    pub fn tick_typewriter(&mut self) -> bool {
        self.typewriter_interval.is_some() && self.typewriter.step()
    }

    pub fn typewriter_interval(&self) -> Option<Duration> {
        self.typewriter_interval
    }

    // ========================================================================
    // Status line
    // ========================================================================

    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear status message if older than the configured lifetime.
    /// Returns true if a message was actually cleared
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed() >= self.status_ttl {
                self.status_message = None;
                return true;
            }
        }
        false
    }

    pub fn status_text(&self) -> Option<&str> {
        self.status_message.as_ref().map(|(msg, _)| msg.as_ref())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{sample_articles, test_article, SampleSource};
    use crate::topics::SimulatedStore;
    use pretty_assertions::assert_eq;
    use tokio::time::{self, Duration};

    fn test_app_with(config: Config) -> (App, mpsc::Receiver<AppEvent>) {
        let (tx, rx) = mpsc::channel(32);
        let source = Arc::new(SampleSource::new(config.load_delay()));
        let store = Arc::new(SimulatedStore::new(config.save_delay()));
        let app = App::new(&config, source, store, tx).unwrap();
        (app, rx)
    }

    fn test_app() -> (App, mpsc::Receiver<AppEvent>) {
        test_app_with(Config::default())
    }

    fn loaded_app() -> (App, mpsc::Receiver<AppEvent>) {
        let (mut app, rx) = test_app();
        app.feed.load(sample_articles());
        (app, rx)
    }

    fn status(app: &App) -> &str {
        app.status_text().unwrap_or_default()
    }

    #[test]
    fn test_tab_cycle() {
        let mut tab = Tab::ForYou;
        for _ in 0..Tab::ALL.len() {
            tab = tab.next();
        }
        assert_eq!(tab, Tab::ForYou);
        assert_eq!(Tab::ForYou.prev(), Tab::Random);
        assert!(Tab::Random.shows_card());
        assert!(!Tab::History.shows_card());
    }

    #[tokio::test]
    async fn test_invalid_keybinding_override_is_not_fatal() {
        let mut config = Config::default();
        config
            .keybindings
            .insert("not_an_action".to_string(), "z".to_string());
        let (app, _rx) = test_app_with(config);
        assert_eq!(app.tab, Tab::ForYou);
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_expires_after_ttl() {
        let (mut app, _rx) = test_app();
        app.set_status("Test message");

        time::advance(Duration::from_millis(1000)).await;
        assert!(!app.clear_expired_status());
        assert_eq!(status(&app), "Test message");

        time::advance(Duration::from_millis(600)).await;
        assert!(app.clear_expired_status());
        assert!(app.status_message.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_feed_load_arrives_after_delay() {
        let (mut app, mut rx) = test_app();
        let start = Instant::now();
        app.spawn_feed_load();
        assert!(app.loading);
        assert!(app.is_pending(TaskKey::Load));

        let Some(AppEvent::ArticlesLoaded { generation, result }) = rx.recv().await else {
            panic!("expected ArticlesLoaded");
        };
        assert!(start.elapsed() >= Duration::from_millis(800));

        app.finish_load(generation, result);
        assert!(!app.loading);
        assert_eq!(app.feed.count(), 3);
        assert_eq!(app.feed.index(), Some(0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reload_discards_superseded_load() {
        let (mut app, mut rx) = test_app();
        app.spawn_feed_load();
        app.spawn_feed_load();

        let Some(AppEvent::ArticlesLoaded { generation, result }) = rx.recv().await else {
            panic!("expected ArticlesLoaded");
        };
        assert_eq!(generation, 2);
        app.finish_load(generation, result);
        assert_eq!(app.feed.count(), 3);

        // A late result from the first load changes nothing
        app.finish_load(1, Ok(Vec::new()));
        assert_eq!(app.feed.count(), 3);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_load_failure_reported() {
        let (mut app, _rx) = test_app();
        app.spawn_feed_load();
        app.finish_load(1, Err("disk on fire".to_string()));
        assert!(!app.loading);
        assert_eq!(app.feed.count(), 0);
        assert_eq!(status(&app), "Failed to load articles: disk on fire");
    }

    #[tokio::test]
    async fn test_empty_feed_messages() {
        let (mut app, _rx) = test_app();
        app.advance();
        assert_eq!(status(&app), "No articles to show");

        app.spawn_feed_load();
        app.random_article();
        assert_eq!(status(&app), "Loading knowledge…");
    }

    #[tokio::test]
    async fn test_random_tab_jumps() {
        let (mut app, _rx) = loaded_app();
        app.switch_tab(Tab::Random);
        assert_eq!(app.tab, Tab::Random);
        assert_eq!(status(&app), "Knowledge Roulette activated!");
        assert!(matches!(
            app.feed.history().last(),
            Some(FeedEvent::Jumped { .. })
        ));
    }

    #[tokio::test]
    async fn test_follow_category_dedups() {
        let (mut app, _rx) = loaded_app();
        app.follow_category(0);
        assert_eq!(status(&app), "Now following \"Technology\"");
        app.follow_category(2);
        app.follow_category(0);
        assert_eq!(status(&app), "Already following \"Technology\"");

        let names: Vec<&str> = app.following.iter().map(|c| &**c).collect();
        assert_eq!(names, vec!["Technology", "Science"]);
    }

    #[tokio::test]
    async fn test_follow_missing_category() {
        let (mut app, _rx) = loaded_app();
        app.follow_category(7);
        assert_eq!(status(&app), "This article has only 3 categories");
        assert!(app.following.is_empty());
    }

    #[tokio::test]
    async fn test_bookmark_dedups() {
        let (mut app, _rx) = loaded_app();
        app.bookmark();
        assert_eq!(
            status(&app),
            "Added \"The History of Computing\" to your reading list"
        );
        app.bookmark();
        assert_eq!(app.reading_list.len(), 1);
        assert!(status(&app).contains("already in your reading list"));
    }

    #[tokio::test]
    async fn test_history_newest_first_and_capped() {
        let (mut app, _rx) = test_app();
        let articles: Vec<Article> = (0..60)
            .map(|i| test_article(&i.to_string(), &format!("Article {}", i)))
            .collect();
        app.feed.load(articles);
        app.record_view();
        for _ in 0..59 {
            app.advance();
            app.record_view();
        }
        assert_eq!(app.viewed.len(), MAX_HISTORY);
        assert_eq!(&*app.viewed[0].id, "59");

        // Viewing again moves the entry to the front instead of duplicating it
        app.feed.jump_to(30).unwrap();
        app.record_view();
        assert_eq!(app.viewed.len(), MAX_HISTORY);
        assert_eq!(&*app.viewed[0].id, "30");
    }

    #[tokio::test]
    async fn test_open_history_entry_jumps() {
        let (mut app, _rx) = loaded_app();
        app.record_view();
        app.advance();
        app.record_view();
        app.tab = Tab::History;
        app.nav_down();
        assert_eq!(app.history_selected, 1);

        app.open_history_entry();
        assert_eq!(app.tab, Tab::ForYou);
        assert_eq!(app.feed.index(), Some(0));
    }

    #[tokio::test]
    async fn test_open_following_entry_finds_category() {
        let (mut app, _rx) = loaded_app();
        app.feed.jump_to(2).unwrap();
        app.follow_category(0);
        app.feed.jump_to(0).unwrap();

        app.tab = Tab::Following;
        app.open_following_entry();
        assert_eq!(app.feed.index(), Some(2));
        assert_eq!(app.tab, Tab::ForYou);
    }

    #[tokio::test]
    async fn test_nav_clamps_to_list() {
        let (mut app, _rx) = loaded_app();
        app.follow_category(0);
        app.tab = Tab::Following;
        app.nav_down();
        assert_eq!(app.following_selected, 0);
        app.nav_up();
        assert_eq!(app.following_selected, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_flow_timing() {
        let (mut app, mut rx) = test_app();
        app.open_topics();
        app.topics.toggle("Philosophy").unwrap();
        app.topics.toggle("Economics").unwrap();

        let start = Instant::now();
        app.submit_topics();
        assert_eq!(app.topics.phase(), Phase::Submitting);

        let Some(AppEvent::SaveFinished { generation, result }) = rx.recv().await else {
            panic!("expected SaveFinished");
        };
        assert!(start.elapsed() >= Duration::from_millis(1500));
        app.finish_save(generation, result);
        assert_eq!(app.topics.phase(), Phase::Submitted);
        assert!(app.is_pending(TaskKey::Topic(Deferred::Settle)));

        let Some(AppEvent::TopicTimer { task, generation }) = rx.recv().await else {
            panic!("expected settle timer");
        };
        assert_eq!(task, Deferred::Settle);
        assert!(start.elapsed() >= Duration::from_millis(3500));
        app.fire_topic_timer(task, generation);
        assert_eq!(app.topics.phase(), Phase::Idle);
        assert_eq!(app.topics.selected().len(), 2);

        let Some(AppEvent::TopicTimer { task, generation }) = rx.recv().await else {
            panic!("expected clear timer");
        };
        assert_eq!(task, Deferred::Clear);
        assert!(start.elapsed() >= Duration::from_millis(3800));
        app.fire_topic_timer(task, generation);
        assert!(app.topics.selected().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_while_submitted_skips_settle() {
        let (mut app, mut rx) = test_app();
        app.open_topics();
        app.topics.toggle("Philosophy").unwrap();
        app.submit_topics();
        let Some(AppEvent::SaveFinished { generation, result }) = rx.recv().await else {
            panic!("expected SaveFinished");
        };
        app.finish_save(generation, result);

        app.close_topics();
        assert_eq!(app.topics.phase(), Phase::Idle);
        assert!(!app.is_pending(TaskKey::Topic(Deferred::Settle)));

        let Some(AppEvent::TopicTimer { task, generation }) = rx.recv().await else {
            panic!("expected clear timer");
        };
        assert_eq!(task, Deferred::Clear);
        app.fire_topic_timer(task, generation);
        assert!(app.topics.selected().is_empty());
    }

    #[tokio::test]
    async fn test_close_while_submitting_is_busy() {
        let (mut app, _rx) = test_app();
        app.open_topics();
        app.topics.toggle("Philosophy").unwrap();
        app.submit_topics();
        app.close_topics();
        assert_eq!(app.topics.phase(), Phase::Submitting);
        assert_eq!(status(&app), "Still saving your preferences");
    }

    #[tokio::test]
    async fn test_empty_submit_reports_error() {
        let (mut app, _rx) = test_app();
        app.open_topics();
        app.submit_topics();
        assert_eq!(app.topics.phase(), Phase::Open);
        assert_eq!(status(&app), "Select at least one topic first");
        assert!(!app.is_pending(TaskKey::Save));
    }

    #[tokio::test]
    async fn test_limit_error_left_to_notification() {
        let config = Config {
            max_selected: 1,
            ..Config::default()
        };
        let (mut app, _rx) = test_app_with(config);
        app.open_topics();
        app.toggle_topic_at_cursor();
        app.topic_cursor_down();
        app.toggle_topic_at_cursor();
        assert_eq!(app.topics.selected().len(), 1);
        assert!(app.status_message.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_pending_save() {
        let (mut app, mut rx) = test_app();
        app.open_topics();
        app.topics.toggle("Philosophy").unwrap();
        app.submit_topics();
        assert!(app.is_pending(TaskKey::Save));

        app.shutdown();
        assert!(!app.is_pending(TaskKey::Save));
        time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_query_editing_clamps_cursor() {
        let (mut app, _rx) = test_app();
        app.open_topics();
        for _ in 0..20 {
            app.topic_cursor_down();
        }
        assert_eq!(app.topic_cursor, 14);

        for c in "ar".chars() {
            app.push_query_char(c);
        }
        assert_eq!(app.topics.query(), "ar");
        // Renaissance Art, Marine Biology, Architecture
        assert_eq!(app.topic_cursor, 2);

        app.pop_query_char();
        app.pop_query_char();
        app.pop_query_char();
        assert_eq!(app.topics.query(), "");
    }

    #[tokio::test]
    async fn test_query_length_limit() {
        let (mut app, _rx) = test_app();
        app.open_topics();
        for _ in 0..MAX_QUERY_LENGTH + 5 {
            app.push_query_char('a');
        }
        assert_eq!(app.topics.query().len(), MAX_QUERY_LENGTH);
        assert!(status(&app).contains("limited"));
    }

    #[tokio::test]
    async fn test_typewriter_disabled_shows_full_excerpt() {
        let config = Config {
            typewriter_ms: 0,
            ..Config::default()
        };
        let (mut app, _rx) = test_app_with(config);
        app.feed.load(sample_articles());
        app.restart_typewriter();
        assert!(app.typewriter.is_complete());
        assert!(!app.tick_typewriter());
    }

    #[tokio::test]
    async fn test_typewriter_reveals_excerpt() {
        let (mut app, _rx) = loaded_app();
        app.restart_typewriter();
        assert_eq!(app.typewriter.visible(), "");
        assert!(app.tick_typewriter());
        assert_eq!(app.typewriter.visible(), "F");
    }

    #[tokio::test]
    async fn test_notifications_drain_in_order() {
        let (mut app, _rx) = loaded_app();
        app.advance();
        app.open_topics();

        let mut seen = Vec::new();
        while let Some(n) = app.next_notification() {
            seen.push(n);
        }
        assert_eq!(
            seen,
            vec![
                Notification::Feed(FeedEvent::Loaded { count: 3 }),
                Notification::Feed(FeedEvent::Advanced { index: 1 }),
                Notification::Topic(TopicEvent::Opened),
            ]
        );
    }
}

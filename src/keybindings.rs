//! Keybinding registry: maps actions to key events with config overrides.
//!
//! Bindings are data, not match arms, so users can remap any action from
//! config.toml. Lookups are context-aware with a fallback to `Global`.
use crossterm::event::{KeyCode, KeyModifiers};
use std::collections::HashMap;

// ============================================================================
// Action Enum
// ============================================================================

/// All user-facing actions that can be triggered by keybindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    Advance,
    RandomArticle,
    NextTab,
    PrevTab,
    Follow,
    Bookmark,
    Share,
    Edit,
    References,
    OpenTopics,
    Reload,
    ShowHelp,
    Back,
    NavUp,
    NavDown,
    Select,
    ToggleTopic,
    SubmitTopics,
    ResetTopics,
    CloseTopics,
}

impl Action {
    /// Human-readable description for the help screen.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Quit => "Quit application",
            Self::Advance => "Next article",
            Self::RandomArticle => "Knowledge Roulette",
            Self::NextTab => "Next tab",
            Self::PrevTab => "Previous tab",
            Self::Follow => "Follow main category",
            Self::Bookmark => "Save to reading list",
            Self::Share => "Share article",
            Self::Edit => "Edit article",
            Self::References => "Show references",
            Self::OpenTopics => "Choose topics",
            Self::Reload => "Reload articles",
            Self::ShowHelp => "Show help",
            Self::Back => "Go back / dismiss",
            Self::NavUp => "Move up",
            Self::NavDown => "Move down",
            Self::Select => "Open selected article",
            Self::ToggleTopic => "Select / deselect topic",
            Self::SubmitTopics => "Save topic preferences",
            Self::ResetTopics => "Clear selection and search",
            Self::CloseTopics => "Close topic picker",
        }
    }
}

// ============================================================================
// Context Enum
// ============================================================================

/// Dispatch context. Determines which bindings are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    Global,
    /// The article card on the For You and Random tabs.
    Card,
    /// Following and History lists.
    List,
    TopicPicker,
}

// ============================================================================
// Key Specification
// ============================================================================

/// A key event: code + modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySpec {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeySpec {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub const fn char(c: char) -> Self {
        Self::plain(KeyCode::Char(c))
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }
}

/// Parse a key string from config into a KeySpec.
///
/// Supported formats:
/// - Single char: "q", "j", "/"
/// - Named keys: "Enter", "Esc", "Tab", "Up", "Down", "Backspace", "Space"
/// - Modifier combos: "Ctrl+s"
/// - Function keys: "F1" through "F12"
fn parse_key_string(s: &str) -> Option<KeySpec> {
    let s = s.trim();

    if let Some(rest) = s.strip_prefix("Ctrl+") {
        let mut chars = rest.trim().chars();
        return match (chars.next(), chars.next()) {
            (Some(c), None) => Some(KeySpec::ctrl(c)),
            _ => None,
        };
    }

    // Named keys (case-insensitive)
    match s.to_lowercase().as_str() {
        "enter" | "return" => return Some(KeySpec::plain(KeyCode::Enter)),
        "esc" | "escape" => return Some(KeySpec::plain(KeyCode::Esc)),
        "tab" => return Some(KeySpec::plain(KeyCode::Tab)),
        "up" => return Some(KeySpec::plain(KeyCode::Up)),
        "down" => return Some(KeySpec::plain(KeyCode::Down)),
        "left" => return Some(KeySpec::plain(KeyCode::Left)),
        "right" => return Some(KeySpec::plain(KeyCode::Right)),
        "backspace" => return Some(KeySpec::plain(KeyCode::Backspace)),
        "space" => return Some(KeySpec::char(' ')),
        _ => {}
    }

    if let Some(n) = s
        .strip_prefix(['F', 'f'])
        .and_then(|rest| rest.parse::<u8>().ok())
    {
        return (1..=12).contains(&n).then(|| KeySpec::plain(KeyCode::F(n)));
    }

    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(KeySpec::char(c)),
        _ => None,
    }
}

/// Format a KeySpec as a human-readable string for the help screen.
fn format_key(key: &KeySpec) -> String {
    let modifier = if key.modifiers.contains(KeyModifiers::CONTROL) {
        "Ctrl+"
    } else {
        ""
    };

    let key_name = match key.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => "?".to_string(),
    };

    format!("{}{}", modifier, key_name)
}

// ============================================================================
// Keybinding Registry
// ============================================================================

/// Registry of keybindings, supporting default bindings and config overrides.
///
/// The same key can map to different actions in different contexts.
pub struct KeybindingRegistry {
    /// Primary lookup: (Context, KeySpec) -> Action
    lookup: HashMap<(Context, KeySpec), Action>,
    /// All bindings in registration order, for the help screen
    bindings: Vec<(Context, KeySpec, Action)>,
}

impl KeybindingRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            lookup: HashMap::new(),
            bindings: Vec::new(),
        };
        registry.register_defaults();
        registry
    }

    fn bind(&mut self, context: Context, key: KeySpec, action: Action) {
        self.lookup.insert((context, key), action);
        self.bindings.push((context, key, action));
    }

    fn register_defaults(&mut self) {
        use Context::{Card, Global, List, TopicPicker};

        // === Global ===
        self.bind(Global, KeySpec::char('q'), Action::Quit);
        self.bind(Global, KeySpec::plain(KeyCode::Tab), Action::NextTab);
        self.bind(Global, KeySpec::char('l'), Action::NextTab);
        self.bind(Global, KeySpec::plain(KeyCode::Right), Action::NextTab);
        self.bind(Global, KeySpec::char('h'), Action::PrevTab);
        self.bind(Global, KeySpec::plain(KeyCode::Left), Action::PrevTab);
        self.bind(Global, KeySpec::char('t'), Action::OpenTopics);
        self.bind(Global, KeySpec::char('R'), Action::Reload);
        self.bind(Global, KeySpec::char('?'), Action::ShowHelp);
        self.bind(Global, KeySpec::plain(KeyCode::Esc), Action::Back);

        // === Article card ===
        self.bind(Card, KeySpec::char('j'), Action::Advance);
        self.bind(Card, KeySpec::plain(KeyCode::Down), Action::Advance);
        self.bind(Card, KeySpec::char(' '), Action::Advance);
        self.bind(Card, KeySpec::plain(KeyCode::Enter), Action::Advance);
        self.bind(Card, KeySpec::char('x'), Action::RandomArticle);
        self.bind(Card, KeySpec::char('f'), Action::Follow);
        self.bind(Card, KeySpec::char('b'), Action::Bookmark);
        self.bind(Card, KeySpec::char('s'), Action::Share);
        self.bind(Card, KeySpec::char('e'), Action::Edit);
        self.bind(Card, KeySpec::char('c'), Action::References);

        // === Following / History lists ===
        self.bind(List, KeySpec::char('j'), Action::NavDown);
        self.bind(List, KeySpec::plain(KeyCode::Down), Action::NavDown);
        self.bind(List, KeySpec::char('k'), Action::NavUp);
        self.bind(List, KeySpec::plain(KeyCode::Up), Action::NavUp);
        self.bind(List, KeySpec::plain(KeyCode::Enter), Action::Select);

        // === Topic picker ===
        // Plain characters type into the search box, so picker actions use
        // navigation keys and Ctrl combos only.
        self.bind(TopicPicker, KeySpec::plain(KeyCode::Down), Action::NavDown);
        self.bind(TopicPicker, KeySpec::plain(KeyCode::Up), Action::NavUp);
        self.bind(TopicPicker, KeySpec::plain(KeyCode::Enter), Action::ToggleTopic);
        self.bind(TopicPicker, KeySpec::ctrl('s'), Action::SubmitTopics);
        self.bind(TopicPicker, KeySpec::ctrl('r'), Action::ResetTopics);
        self.bind(TopicPicker, KeySpec::plain(KeyCode::Esc), Action::CloseTopics);
        self.bind(TopicPicker, KeySpec::ctrl('c'), Action::Quit);
    }

    /// Apply user overrides from config keybindings map.
    ///
    /// Keys in the map are action names (e.g., "quit", "advance").
    /// Values are key strings (e.g., "q", "Ctrl+d", "F5").
    ///
    /// Returns a list of warnings for unrecognized action names or unparseable keys.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> Vec<String> {
        let mut warnings = Vec::new();

        for (action_name, key_str) in overrides {
            let Some(action) = parse_action_name(action_name) else {
                warnings.push(format!("Unknown action '{}', ignoring", action_name));
                continue;
            };

            let Some(key) = parse_key_string(key_str) else {
                warnings.push(format!(
                    "Cannot parse key '{}' for action '{}', ignoring",
                    key_str, action_name
                ));
                continue;
            };

            let mut contexts: Vec<Context> = self
                .bindings
                .iter()
                .filter(|(_, _, a)| *a == action)
                .map(|(c, _, _)| *c)
                .collect();
            contexts.dedup();

            self.lookup.retain(|_, a| *a != action);
            self.bindings.retain(|(_, _, a)| *a != action);

            for ctx in contexts {
                self.bind(ctx, key, action);
            }

            tracing::info!(
                action = %action_name,
                key = %key_str,
                "Applied keybinding override"
            );
        }

        warnings
    }

    /// Look up the action for a given key in a given context.
    ///
    /// Tries the specific context first, then falls back to Global.
    pub fn action_for_key(
        &self,
        code: KeyCode,
        modifiers: KeyModifiers,
        context: Context,
    ) -> Option<Action> {
        let key = KeySpec::new(code, modifiers);

        if let Some(&action) = self.lookup.get(&(context, key)) {
            return Some(action);
        }

        // The picker captures typing, so it never falls through to Global
        if context != Context::Global && context != Context::TopicPicker {
            if let Some(&action) = self.lookup.get(&(Context::Global, key)) {
                return Some(action);
            }
        }

        None
    }

    /// Get all bindings for the help screen.
    ///
    /// Returns (context, key_display_string, action, description) tuples.
    pub fn all_bindings(&self) -> Vec<(Context, String, Action, &'static str)> {
        self.bindings
            .iter()
            .map(|(ctx, key, action)| (*ctx, format_key(key), *action, action.describe()))
            .collect()
    }
}

impl Default for KeybindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse an action name string (from config) into an Action enum.
fn parse_action_name(name: &str) -> Option<Action> {
    match name.to_lowercase().as_str() {
        "quit" => Some(Action::Quit),
        "advance" | "next" | "next_article" => Some(Action::Advance),
        "random" | "random_article" | "roulette" => Some(Action::RandomArticle),
        "next_tab" | "nexttab" => Some(Action::NextTab),
        "prev_tab" | "prevtab" => Some(Action::PrevTab),
        "follow" => Some(Action::Follow),
        "bookmark" | "save" => Some(Action::Bookmark),
        "share" => Some(Action::Share),
        "edit" => Some(Action::Edit),
        "references" | "refs" => Some(Action::References),
        "open_topics" | "opentopics" | "topics" => Some(Action::OpenTopics),
        "reload" => Some(Action::Reload),
        "show_help" | "showhelp" | "help" => Some(Action::ShowHelp),
        "back" => Some(Action::Back),
        "nav_up" | "navup" | "up" => Some(Action::NavUp),
        "nav_down" | "navdown" | "down" => Some(Action::NavDown),
        "select" => Some(Action::Select),
        "toggle_topic" | "toggletopic" => Some(Action::ToggleTopic),
        "submit_topics" | "submittopics" | "submit" => Some(Action::SubmitTopics),
        "reset_topics" | "resettopics" | "reset" => Some(Action::ResetTopics),
        "close_topics" | "closetopics" => Some(Action::CloseTopics),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================

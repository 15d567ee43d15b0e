//! Input handling for the TUI.
//!
//! Keys are resolved through the keybinding registry and dispatched to `App`.
//! Overlays capture input first: help, then the topic picker.

use crate::app::{App, Tab};
use crate::keybindings::{Action as KbAction, Context as KbContext};
use crate::topics::Phase;
use crossterm::event::{KeyCode, KeyModifiers};

use super::events::drain_notifications;
use super::Action;

/// Main input dispatch function.
///
/// Notifications emitted by the resulting transition are applied before
/// returning, so the status line always reflects the key just pressed.
pub fn handle_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    let action = dispatch(app, code, modifiers);
    drain_notifications(app);
    action
}

fn dispatch(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    if app.show_help {
        return handle_help_input(app, code);
    }

    if app.topics.phase().is_visible() {
        return handle_picker_input(app, code, modifiers);
    }

    let context = if app.tab.shows_card() {
        KbContext::Card
    } else {
        KbContext::List
    };

    // Digits follow the n-th category shown on the card
    if context == KbContext::Card && modifiers.is_empty() {
        if let Some(n) = digit(code) {
            app.follow_category(n - 1);
            return Action::Continue;
        }
    }

    match app.keybindings.action_for_key(code, modifiers, context) {
        Some(KbAction::Quit) => return Action::Quit,
        Some(KbAction::Advance) => app.advance(),
        Some(KbAction::RandomArticle) => app.random_article(),
        Some(KbAction::NextTab) => app.switch_tab(app.tab.next()),
        Some(KbAction::PrevTab) => app.switch_tab(app.tab.prev()),
        Some(KbAction::Follow) => app.follow_category(0),
        Some(KbAction::Bookmark) => app.bookmark(),
        Some(KbAction::Share) => app.set_status("Share functionality coming soon!"),
        Some(KbAction::Edit) => app.set_status("Edit functionality coming soon!"),
        Some(KbAction::References) => app.set_status("References panel coming soon!"),
        Some(KbAction::OpenTopics) => app.open_topics(),
        Some(KbAction::Reload) => {
            app.spawn_feed_load();
            app.set_status("Loading knowledge…");
        }
        Some(KbAction::ShowHelp) => {
            app.show_help = true;
            app.help_scroll_offset = 0;
        }
        Some(KbAction::Back) => {
            if app.tab != Tab::ForYou {
                app.switch_tab(Tab::ForYou);
            } else {
                app.status_message = None;
            }
        }
        Some(KbAction::NavDown) => app.nav_down(),
        Some(KbAction::NavUp) => app.nav_up(),
        Some(KbAction::Select) => match app.tab {
            Tab::History => app.open_history_entry(),
            Tab::Following => app.open_following_entry(),
            Tab::ForYou | Tab::Random => {}
        },
        // Picker-only actions
        Some(
            KbAction::ToggleTopic
            | KbAction::SubmitTopics
            | KbAction::ResetTopics
            | KbAction::CloseTopics,
        )
        | None => {}
    }

    Action::Continue
}

fn digit(code: KeyCode) -> Option<usize> {
    match code {
        KeyCode::Char(c @ '1'..='9') => c.to_digit(10).map(|d| d as usize),
        _ => None,
    }
}

/// Handle input while the help overlay is visible.
///
/// Captures all keys: j/k/Up/Down scroll, Esc/q/? dismiss.
fn handle_help_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            app.show_help = false;
            app.help_scroll_offset = 0;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_sub(1);
        }
        _ => {}
    }
    Action::Continue
}

/// Handle input while the topic picker is open.
///
/// Bound keys act on the picker; any other printable character goes to the
/// search box. Edits are dropped while a save is running or confirmed.
fn handle_picker_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    let editable = app.topics.phase() == Phase::Open;
    match app
        .keybindings
        .action_for_key(code, modifiers, KbContext::TopicPicker)
    {
        Some(KbAction::Quit) => return Action::Quit,
        Some(KbAction::CloseTopics) => app.close_topics(),
        Some(KbAction::NavDown) => app.topic_cursor_down(),
        Some(KbAction::NavUp) => app.topic_cursor_up(),
        Some(KbAction::ToggleTopic) if editable => app.toggle_topic_at_cursor(),
        Some(KbAction::SubmitTopics) => app.submit_topics(),
        Some(KbAction::ResetTopics) => app.reset_topics(),
        Some(_) => {}
        None if !editable => {}
        None => match code {
            KeyCode::Char(c) if !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
                app.push_query_char(c)
            }
            KeyCode::Backspace => app.pop_query_char(),
            _ => {}
        },
    }
    Action::Continue
}

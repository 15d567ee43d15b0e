//! Application event handling.
//!
//! Background task completions are fed back into the state machines here,
//! and the notifications those machines emit are turned into status-line
//! text, history entries and typewriter restarts.

use crate::app::{App, AppEvent, Notification};
use crate::feed::FeedEvent;
use crate::topics::TopicEvent;

/// Handle an event from a background task.
pub fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::ArticlesLoaded { generation, result } => app.finish_load(generation, result),
        AppEvent::SaveFinished { generation, result } => app.finish_save(generation, result),
        AppEvent::TopicTimer { task, generation } => app.fire_topic_timer(task, generation),
    }
    drain_notifications(app);
}

/// Apply every pending state-machine notification.
///
/// Returns true if anything was applied.
pub fn drain_notifications(app: &mut App) -> bool {
    let mut applied = false;
    while let Some(notification) = app.next_notification() {
        applied = true;
        match notification {
            Notification::Feed(event) => apply_feed_event(app, event),
            Notification::Topic(event) => apply_topic_event(app, event),
        }
    }
    if applied {
        app.needs_redraw = true;
    }
    applied
}

fn apply_feed_event(app: &mut App, event: FeedEvent) {
    match event {
        FeedEvent::Loaded { count: 0 } => {
            app.restart_typewriter();
            app.set_status("No articles to show");
        }
        FeedEvent::Loaded { .. } => {
            app.record_view();
            app.restart_typewriter();
            app.set_status("Articles loaded successfully!");
        }
        FeedEvent::Restarted => {
            app.record_view();
            app.restart_typewriter();
            app.set_status("You've seen all articles! Starting over.");
        }
        FeedEvent::Advanced { .. } | FeedEvent::Jumped { .. } | FeedEvent::Selected { .. } => {
            app.record_view();
            app.restart_typewriter();
        }
    }
}

fn apply_topic_event(app: &mut App, event: TopicEvent) {
    match event {
        TopicEvent::LimitReached(topic) => {
            let max = app.topics.max_selected();
            app.set_status(format!(
                "You can select up to {} topics, \"{}\" was not added",
                max, topic
            ));
        }
        TopicEvent::SubmitStarted { count } => {
            let noun = if count == 1 { "topic" } else { "topics" };
            app.set_status(format!("Saving {} {}…", count, noun));
        }
        TopicEvent::Submitted => {
            app.set_status("Preferences saved! Your feed will be personalized.");
        }
        TopicEvent::SaveFailed { reason } => {
            app.set_status(format!("Could not save preferences: {}", reason));
        }
        TopicEvent::Reset => app.set_status("Selection cleared"),
        TopicEvent::Opened
        | TopicEvent::Closed { .. }
        | TopicEvent::QueryChanged { .. }
        | TopicEvent::Added(_)
        | TopicEvent::Removed(_)
        | TopicEvent::Cleared => {}
    }
}

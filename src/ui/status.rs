use crate::app::{App, Tab};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};
use std::borrow::Cow;

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    // Status bar needs at least 1 char width to be meaningful
    if area.width < 1 || area.height < 1 {
        return;
    }

    // Static hints cost nothing; a live message is borrowed
    let text: Cow<'_, str> = if let Some(msg) = app.status_text() {
        Cow::Borrowed(msg)
    } else if app.topics.phase().is_visible() {
        Cow::Borrowed("Type to search | ENTER toggle | Ctrl+S save | ESC close")
    } else if app.loading && app.feed.count() == 0 {
        Cow::Borrowed("Loading knowledge…")
    } else {
        match app.tab {
            Tab::ForYou | Tab::Random => Cow::Borrowed(
                "[j]next [x]roulette [f]ollow [b]ookmark [t]opics [Tab]switch [?]help [q]uit",
            ),
            Tab::Following | Tab::History => {
                Cow::Borrowed("[j/k]move [Enter]open [Tab]switch [Esc]back [?]help [q]uit")
            }
        }
    };

    let style = Style::default().bg(Color::DarkGray).fg(Color::White);

    let paragraph = Paragraph::new(text).style(style);
    f.render_widget(paragraph, area);
}

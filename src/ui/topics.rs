//! Topic picker overlay.
//!
//! A centered modal with a search box, the filtered catalog and a selection
//! counter. While a save is in flight or just finished, a banner replaces
//! the key hints.

use crate::app::App;
use crate::topics::Phase;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::render::centered_rect;

/// Render the picker on top of the current view.
pub fn render(f: &mut Frame, app: &App) {
    let overlay = centered_rect(60, 70, f.area());
    if overlay.width < 20 || overlay.height < 8 {
        return;
    }

    f.render_widget(Clear, overlay);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta))
        .title(" Choose Your Interests ");
    let inner = block.inner(overlay);
    f.render_widget(block, overlay);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    let phase = app.topics.phase();
    let editable = phase == Phase::Open;

    // Search box
    let cursor = if editable { "_" } else { "" };
    let search = Paragraph::new(format!("{}{}", app.topics.query(), cursor)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(if editable {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::DarkGray)
            })
            .title("Search"),
    );
    f.render_widget(search, chunks[0]);

    // Filtered catalog
    let filtered = app.topics.filtered();
    if filtered.is_empty() {
        let none = Paragraph::new("No topics match your search")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(none, chunks[1]);
    } else {
        let items: Vec<ListItem> = filtered
            .iter()
            .map(|topic| {
                let (mark, style) = if app.topics.is_selected(topic) {
                    (
                        "✓ ",
                        Style::default()
                            .fg(Color::Green)
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    ("  ", Style::default())
                };
                ListItem::new(Line::from(vec![
                    Span::styled(mark, style),
                    Span::styled(topic.to_string(), style),
                ]))
            })
            .collect();

        let list = List::new(items)
            .highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White));
        let mut state = ListState::default();
        if editable {
            state.select(Some(app.topic_cursor.min(filtered.len() - 1)));
        }
        f.render_stateful_widget(list, chunks[1], &mut state);
    }

    // Selection counter
    let counter = format!(
        "{}/{} selected",
        app.topics.selected().len(),
        app.topics.max_selected()
    );
    f.render_widget(
        Paragraph::new(counter).style(Style::default().fg(Color::Gray)),
        chunks[2],
    );

    // Hints, or the save banner
    let footer = match phase {
        Phase::Submitting => Paragraph::new("Saving…").style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Phase::Submitted => Paragraph::new("Preferences saved!").style(
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Phase::Open | Phase::Idle => {
            Paragraph::new("[Enter] toggle [Ctrl+s] save [Ctrl+r] reset [Esc] close")
                .style(Style::default().fg(Color::DarkGray))
        }
    };
    f.render_widget(footer, chunks[3]);
}

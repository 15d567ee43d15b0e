use crate::app::App;
use crate::util::truncate_to_width;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

/// Render the Following tab: followed categories with loaded article counts
pub fn render_following(f: &mut Frame, app: &App, area: Rect) {
    if app.following.is_empty() {
        render_empty(
            f,
            area,
            "Following",
            "Not following any categories yet. Press f on a card to follow one.",
        );
        return;
    }

    let articles = app.feed.articles();
    let max_name = area.width.saturating_sub(20) as usize;

    let items: Vec<ListItem> = app
        .following
        .iter()
        .enumerate()
        .map(|(i, category)| {
            let count = articles
                .iter()
                .filter(|a| a.categories.contains(category))
                .count();
            let noun = if count == 1 { "article" } else { "articles" };

            let name_style = if i == app.following_selected {
                Style::default().bg(Color::DarkGray).fg(Color::White)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };

            ListItem::new(Line::from(vec![
                Span::styled(truncate_to_width(category, max_name), name_style),
                Span::styled(
                    format!("  {} {}", count, noun),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let title = format!("Following ({})", app.following.len());
    f.render_widget(List::new(items).block(bordered(title)), area);
}

/// Render the History tab: recently viewed articles, newest first
pub fn render_history(f: &mut Frame, app: &App, area: Rect) {
    if app.viewed.is_empty() {
        render_empty(f, area, "History", "Nothing viewed yet.");
        return;
    }

    let max_title = area.width.saturating_sub(22) as usize;

    let items: Vec<ListItem> = app
        .viewed
        .iter()
        .enumerate()
        .map(|(i, article)| {
            let title_style = if i == app.history_selected {
                Style::default().bg(Color::DarkGray).fg(Color::White)
            } else {
                Style::default()
            };

            let mut spans = vec![Span::styled(
                truncate_to_width(&article.title, max_title),
                title_style,
            )];
            if let Some(category) = article.primary_category() {
                spans.push(Span::styled(
                    format!("  {}", category),
                    Style::default().fg(Color::Magenta),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let title = format!("History ({})", app.viewed.len());
    f.render_widget(List::new(items).block(bordered(title)), area);
}

fn bordered(title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title)
}

fn render_empty(f: &mut Frame, area: Rect, title: &'static str, message: &'static str) {
    let paragraph = Paragraph::new(vec![Line::from(""), Line::from(message)])
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(paragraph, area);
}

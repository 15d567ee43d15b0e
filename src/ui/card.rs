use crate::app::App;
use crate::feed::{Article, MAX_QUALITY};
use crate::util::{group_thousands, truncate_to_width};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Render the article card for the For You and Random tabs
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let Some(article) = app.feed.current_article() else {
        render_placeholder(f, app, area);
        return;
    };

    let position = format!(
        " {}/{} ",
        app.feed.index().map_or(0, |i| i + 1),
        app.feed.count()
    );
    let saved = app.reading_list.iter().any(|a| a.id == article.id);

    // Room inside the borders for the title line
    let inner_width = area.width.saturating_sub(4) as usize;
    let title = if saved {
        format!("✓ {}", article.title)
    } else {
        article.title.to_string()
    };

    let mut lines = vec![
        category_line(article),
        Line::from(""),
        Line::from(Span::styled(
            truncate_to_width(&title, inner_width),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    let mut excerpt = vec![Span::raw(app.typewriter.visible().to_string())];
    if !app.typewriter.is_complete() {
        excerpt.push(Span::styled("▌", Style::default().fg(Color::Cyan)));
    }
    lines.push(Line::from(excerpt));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        metadata_line(article),
        Style::default().fg(Color::Gray),
    )));
    lines.push(Line::from(vec![
        Span::styled(star_line(article), Style::default().fg(Color::Yellow)),
        Span::styled(
            format!(" {:.1}", article.quality),
            Style::default().fg(Color::Gray),
        ),
    ]));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "[j] next  [x] roulette  [f] follow  [b] save  [1-9] follow category",
        Style::default().fg(Color::DarkGray),
    )));

    let card = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(app.tab.title())
                .title_bottom(Line::from(position).alignment(Alignment::Right)),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(card, area);
}

fn render_placeholder(f: &mut Frame, app: &App, area: Rect) {
    let text = if app.loading {
        "Loading knowledge…"
    } else {
        "No articles to show. Press R to reload."
    };

    let paragraph = Paragraph::new(vec![Line::from(""), Line::from(text)])
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL).title(app.tab.title()));
    f.render_widget(paragraph, area);
}

/// Numbered category tags, matching the digit keys that follow them.
fn category_line(article: &Article) -> Line<'static> {
    let mut spans = Vec::with_capacity(article.categories.len() * 2);
    for (i, category) in article.categories.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(
            format!("[{}] {}", i + 1, category),
            Style::default().fg(Color::Magenta),
        ));
    }
    Line::from(spans)
}

fn metadata_line(article: &Article) -> String {
    format!(
        "{} scholars · {} min read · {} edits · {} citations",
        group_thousands(article.view_count),
        article.reading_time,
        group_thousands(article.edit_count),
        article.citations
    )
}

/// Filled stars for the whole-number part of the rating, hollow for the rest.
fn star_line(article: &Article) -> String {
    let filled = usize::from(article.stars());
    let total = MAX_QUALITY as usize;
    let mut stars = "★".repeat(filled);
    stars.push_str(&"☆".repeat(total.saturating_sub(filled)));
    stars
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::test_article;

    #[test]
    fn test_star_line() {
        let mut article = test_article("1", "T");
        article.quality = 4.8;
        assert_eq!(star_line(&article), "★★★★☆");
        article.quality = 0.0;
        assert_eq!(star_line(&article), "☆☆☆☆☆");
        article.quality = 5.0;
        assert_eq!(star_line(&article), "★★★★★");
    }

    #[test]
    fn test_metadata_line() {
        let article = test_article("1", "T");
        assert_eq!(
            metadata_line(&article),
            "1,200 scholars · 3 min read · 40 edits · 12 citations"
        );
    }

    #[test]
    fn test_category_line_numbers_tags() {
        let article = test_article("1", "T");
        let text: String = category_line(&article)
            .spans
            .iter()
            .map(|s| s.content.as_ref())
            .collect();
        assert_eq!(text, "[1] Science  [2] History");
    }
}

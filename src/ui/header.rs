use crate::app::App;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Renders the title block with the search field
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let border_style = if app.searching {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let title_block = Block::default()
        .title("Movie Finder")
        .borders(Borders::ALL)
        .border_style(border_style);

    let mut spans = vec![
        Span::styled("Search: ", Style::default().fg(Color::Gray)),
        Span::styled(
            app.search_term.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
    ];

    if app.searching {
        spans.push(Span::styled("█", Style::default().fg(Color::Yellow)));
    }

    if app.placeholder_key {
        spans.push(Span::styled(
            "   (placeholder API key, set TMDB_API_KEY)",
            Style::default().fg(Color::Red),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(title_block);

    frame.render_widget(header, area);
}

use crate::app::App;
use crate::app::container::MovieCard;
use crate::ui::loading::spinner_frame;
use crate::ui::main_content::rating_badge;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use ratatui_image::{Resize, StatefulImage, protocol::StatefulProtocol};

/// Renders the selected card in full
pub fn render_movie_detail(frame: &mut Frame, app: &mut App, area: Rect) {
    let Some(card) = app.selected_card().cloned() else {
        frame.render_widget(Block::default().borders(Borders::ALL), area);
        return;
    };

    let outer_block = Block::default()
        .title(card.title.clone())
        .borders(Borders::ALL)
        .style(Style::default());

    let inner_area = outer_block.inner(area);
    frame.render_widget(outer_block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(55), // Poster
            Constraint::Length(2),      // Title and badge
            Constraint::Min(3),         // Overview
        ])
        .split(inner_area);

    render_poster_section(frame, chunks[0], app, &card);
    render_title_section(frame, chunks[1], &card);
    render_overview_section(frame, chunks[2], &card);
}

fn render_poster_section(frame: &mut Frame, area: Rect, app: &mut App, card: &MovieCard) {
    let poster_block = Block::default().borders(Borders::ALL).title("Poster");

    if app.loading_poster {
        let loading_text = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("{} Downloading poster...", spinner_frame()),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
        ];

        let loading_paragraph = Paragraph::new(loading_text)
            .alignment(Alignment::Center)
            .block(poster_block);

        frame.render_widget(loading_paragraph, area);
    } else if let Some(protocol) = &mut app.poster_protocol {
        let image = StatefulImage::<StatefulProtocol>::default().resize(Resize::Fit(None));

        let inner_area = poster_block.inner(area);
        frame.render_widget(poster_block, area);
        frame.render_stateful_widget(image, inner_area, protocol);
    } else {
        // No picker, no poster path, or the download failed
        let placeholder = match &card.poster_url {
            Some(url) => Line::from(Span::styled(url.clone(), Style::default().fg(Color::Gray))),
            None => Line::from(Span::styled(
                "No poster available",
                Style::default().fg(Color::Gray),
            )),
        };

        let placeholder_paragraph = Paragraph::new(vec![Line::from(""), placeholder])
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(poster_block);

        frame.render_widget(placeholder_paragraph, area);
    }
}

fn render_title_section(frame: &mut Frame, area: Rect, card: &MovieCard) {
    let title_info = Line::from(vec![
        Span::styled(
            card.title.clone(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        rating_badge(card),
        Span::styled(
            format!(" {}", card.rating_class.label()),
            Style::default().fg(card.rating_class.color()),
        ),
    ]);

    frame.render_widget(Paragraph::new(title_info), area);
}

fn render_overview_section(frame: &mut Frame, area: Rect, card: &MovieCard) {
    let content = vec![
        Line::from(Span::styled(
            "Overview:",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            card.overview.clone(),
            Style::default().fg(Color::White),
        )),
    ];

    let content_paragraph = Paragraph::new(content).wrap(Wrap { trim: true });

    frame.render_widget(content_paragraph, area);
}

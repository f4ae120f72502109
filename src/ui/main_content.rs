use crate::app::App;
use crate::app::container::{ContainerContent, MovieCard};
use crate::ui::movie_detail::render_movie_detail;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};
use tui_big_text::{BigText, PixelSize};

/// Renders the container: welcome banner, empty state, or the cards
pub fn render_main_content(frame: &mut Frame, app: &mut App, area: Rect) {
    match app.container.content() {
        ContainerContent::Welcome => render_welcome(frame, area),
        ContainerContent::NoMovies => render_no_movies(frame, area),
        ContainerContent::Cards(_) => {
            let chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
                .split(area);

            render_card_list(frame, app, chunks[0]);
            render_movie_detail(frame, app, chunks[1]);
        }
    }
}

fn render_welcome(frame: &mut Frame, area: Rect) {
    let block = Block::default().borders(Borders::ALL);
    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(8), // Big text
            Constraint::Min(1),
        ])
        .split(inner_area);

    let big_text = BigText::builder()
        .pixel_size(PixelSize::Quadrant)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .lines(vec!["MOVIE".into(), "FINDER".into()])
        .alignment(Alignment::Center)
        .build();
    frame.render_widget(big_text, chunks[1]);

    let hint = Paragraph::new(Line::from(Span::styled(
        "Press (/) and type a title to search",
        Style::default().fg(Color::Gray),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(hint, chunks[2]);
}

fn render_no_movies(frame: &mut Frame, area: Rect) {
    let empty_block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default());

    let empty_text = vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            "No movies found",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
    ];

    let empty_paragraph = Paragraph::new(empty_text)
        .block(empty_block)
        .alignment(Alignment::Center);

    frame.render_widget(empty_paragraph, area);
}

/// The rating badge: the score on a background of its category color
pub fn rating_badge(card: &MovieCard) -> Span<'static> {
    Span::styled(
        format!(" {} ", card.rating_text),
        Style::default()
            .fg(Color::Black)
            .bg(card.rating_class.color())
            .add_modifier(Modifier::BOLD),
    )
}

fn card_item(card: &MovieCard) -> ListItem<'static> {
    let overview = if card.overview.is_empty() {
        "No overview".to_string()
    } else {
        card.overview.clone()
    };

    let content = vec![
        Line::from(vec![
            Span::styled(
                card.title.clone(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            rating_badge(card),
        ]),
        Line::from(Span::styled(
            format!("  {}", overview),
            Style::default().fg(Color::Gray),
        )),
    ];

    ListItem::new(content)
}

fn render_card_list(frame: &mut Frame, app: &mut App, area: Rect) {
    let cards = app.container.cards();
    let title = format!("Movies ({} - Use ↑↓ or j/k to scroll)", cards.len());
    let items: Vec<ListItem> = cards.iter().map(card_item).collect();

    let list = List::new(items)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

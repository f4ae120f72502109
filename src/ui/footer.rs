use crate::app::App;
use crate::ui::loading::searching_line;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Returns the appropriate instruction text based on app state
fn get_instruction_text(app: &App) -> &'static str {
    if app.searching {
        "(Enter) to search, (Esc) to stop typing"
    } else if app.container.cards().is_empty() {
        "(/) to search, (r) to reload, (q) to quit"
    } else {
        "(↑↓/jk) scroll, (/) new search, (r) reload, (q) quit"
    }
}

fn status_line(app: &App) -> Line<'static> {
    if let Some(pending) = &app.pending {
        return searching_line(&pending.term);
    }

    match &app.status {
        Some(status) => {
            let color = if status.is_error { Color::Red } else { Color::Gray };
            Line::from(Span::styled(
                format!("{} (at {})", status.message, status.at.format("%H:%M:%S")),
                Style::default().fg(color),
            ))
        }
        None => Line::from(""),
    }
}

/// Renders the footer with status and instructions at the bottom of the screen
pub fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let bottom_block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default());

    let lines = vec![status_line(app), Line::from(get_instruction_text(app))];
    let bottom = Paragraph::new(lines).block(bottom_block);

    frame.render_widget(bottom, area);
}

use chrono::Utc;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Current frame of the spinner, advancing every 100ms
pub fn spinner_frame() -> char {
    let spinner_idx = (Utc::now().timestamp_millis() / 100) as usize % SPINNER_CHARS.len();
    SPINNER_CHARS[spinner_idx]
}

/// Status line shown while a search is in flight
pub fn searching_line(term: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("{} Searching for \"{}\"...", spinner_frame(), term),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ))
}

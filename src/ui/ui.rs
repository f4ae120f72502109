use crate::app::App;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use super::footer::render_footer;
use super::header::render_header;
use super::main_content::render_main_content;

/// Main UI rendering function that orchestrates all UI components
pub fn ui(frame: &mut Frame, app: &mut App) {
    // Create the main layout: header with search field, container, footer
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Container
            Constraint::Length(4), // Footer
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_main_content(frame, app, chunks[1]);
    render_footer(frame, app, chunks[2]);
}

// Dashboard screen implementation

use crate::ui::components::Footer;
use crate::ui::state::AppState;
use crate::ui::widgets::{EnhancedProgress, ProgressState};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table, Widget},
};

mod sections;

pub struct Dashboard;

impl Dashboard {
    pub fn render(frame: &mut Frame, state: &mut AppState) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(40), // Queue
                Constraint::Length(5),      // Settings
                Constraint::Length(4),      // Progress + status
                Constraint::Min(3),         // Transcript
                Constraint::Length(1),      // Footer
            ])
            .split(area);

        Self::render_queue(frame, chunks[0], state);
        Self::render_settings(frame, chunks[1], state);
        Self::render_progress(frame, chunks[2], state);
        Self::render_transcript(frame, chunks[3], state);

        let footer = if state.prompt.is_some() {
            Footer::prompt()
        } else {
            Footer::dashboard_with_stats(
                state.queue.len(),
                state.dashboard.marked.len(),
                state.queue.is_busy(),
            )
        };
        footer.render(chunks[4], frame.buffer_mut());
    }
}

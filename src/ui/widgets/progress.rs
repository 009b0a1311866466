// Conversion progress bar with different visual states

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressState {
    Idle,
    Running,
    Done,
    Failed,
}

pub struct EnhancedProgress {
    percent: f64,
    state: ProgressState,
}

impl EnhancedProgress {
    pub fn new(percent: f64, state: ProgressState) -> Self {
        Self {
            percent: percent.clamp(0.0, 100.0),
            state,
        }
    }
}

impl Widget for EnhancedProgress {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let label = format!(" {:.2}%", self.percent);
        let bar_width = area.width.saturating_sub(label.len() as u16);
        let filled_width = (bar_width as f64 * self.percent / 100.0).round() as u16;

        let (filled_symbol, unfilled_symbol, filled_fg, unfilled_fg) = match self.state {
            ProgressState::Running => ("█", "░", Color::Green, Color::DarkGray),
            ProgressState::Done => ("█", " ", Color::White, Color::Black),
            ProgressState::Failed => ("█", "░", Color::Red, Color::DarkGray),
            ProgressState::Idle => ("░", "░", Color::DarkGray, Color::DarkGray),
        };

        for x in 0..bar_width {
            let (symbol, fg) = if x < filled_width {
                (filled_symbol, filled_fg)
            } else {
                (unfilled_symbol, unfilled_fg)
            };
            buf.set_string(area.x + x, area.y, symbol, Style::default().fg(fg));
        }

        buf.set_string(
            area.x + bar_width,
            area.y,
            label,
            Style::default().fg(Color::White),
        );
    }
}

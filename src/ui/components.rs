// Reusable UI components

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

pub struct Footer {
    content: Line<'static>,
}

impl Footer {
    fn from_controls(prefix: String, controls: &[(&'static str, &'static str)]) -> Self {
        let mut spans = vec![Span::raw(prefix)];

        for (i, (hotkey, desc)) in controls.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(*hotkey, Style::default().fg(Color::Yellow)));
            spans.push(Span::raw(*desc));
        }

        Self {
            content: Line::from(spans),
        }
    }

    pub fn dashboard_with_stats(queued: usize, marked: usize, converting: bool) -> Self {
        let mut stats_text = format!("Videos in Queue: {}", queued);
        if marked > 0 {
            stats_text.push_str(&format!(", Marked: {}", marked));
        }
        if converting {
            stats_text.push_str(", Converting");
        }
        stats_text.push_str("  |  ");

        Self::from_controls(
            stats_text,
            &[
                ("[S]", "tart"),
                ("[A]", "dd"),
                ("[D]", "elete"),
                ("[Space]", " Mark"),
                ("[O]", "utput"),
                ("[F]", "Fmpeg"),
                ("[G]", "PU"),
                ("[Q]", "uit"),
            ],
        )
    }

    pub fn prompt() -> Self {
        Self::from_controls(
            "CONTROLS: ".to_string(),
            &[("[Enter]", " Confirm"), ("[Esc]", " Cancel")],
        )
    }
}

impl Widget for Footer {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.content)
            .style(Style::default().bg(Color::DarkGray))
            .render(area, buf);
    }
}

/// Rect of at most `width` x `height` centered in `area`
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));

    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}

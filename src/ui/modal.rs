// Error/info message box and path prompt

use crate::ui::components::centered_rect;
use crate::ui::state::{MessageModalState, ModalKind, PathPrompt};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

pub struct MessageModal;

impl MessageModal {
    pub fn render(frame: &mut Frame, state: &MessageModalState) {
        let area = frame.area();
        let (title, color) = match state.kind {
            ModalKind::Error => (" Error ", Color::Red),
            ModalKind::Info => (" Info ", Color::Cyan),
        };

        // Failure reports carry the whole ffmpeg transcript; show its tail
        let max_lines = area.height.saturating_sub(8).max(1) as usize;
        let lines: Vec<&str> = state.message.lines().collect();
        let skip = lines.len().saturating_sub(max_lines);
        let body: Vec<Line> = lines[skip..]
            .iter()
            .map(|l| Line::from(l.to_string()))
            .collect();

        let height = (body.len() as u16).saturating_add(4);
        let modal_area = centered_rect(area, area.width.saturating_sub(8).min(100), height);

        frame.render_widget(Clear, modal_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(title)
            .title_alignment(Alignment::Center)
            .style(Style::default().bg(Color::Black));

        let inner = block.inner(modal_area);
        frame.render_widget(block, modal_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(inner);

        frame.render_widget(
            Paragraph::new(body)
                .wrap(Wrap { trim: false })
                .style(Style::default().fg(Color::White)),
            chunks[0],
        );
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(
                    "[Enter]",
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::raw(" OK"),
            ]))
            .alignment(Alignment::Center),
            chunks[1],
        );
    }
}

pub struct PromptModal;

impl PromptModal {
    pub fn render(frame: &mut Frame, prompt: &PathPrompt) {
        let modal_area = centered_rect(frame.area(), 80, 3);

        frame.render_widget(Clear, modal_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(prompt.kind.title())
            .style(Style::default().bg(Color::Black));

        let inner = block.inner(modal_area);
        frame.render_widget(block, modal_area);

        // Keep the end of long paths (and the cursor) in view
        let visible = inner.width.saturating_sub(1) as usize;
        let chars: Vec<char> = prompt.buffer.chars().collect();
        let start = chars.len().saturating_sub(visible);
        let shown: String = chars[start..].iter().collect();

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::raw(shown),
                Span::styled("_", Style::default().fg(Color::Yellow)),
            ])),
            inner,
        );
    }
}

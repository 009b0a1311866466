use super::*;
use crate::engine::Encoder;

fn or_unset(value: &str) -> Span<'static> {
    if value.is_empty() {
        Span::styled("(not set)", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(value.to_string())
    }
}

impl Dashboard {
    pub(super) fn render_queue(frame: &mut Frame, area: Rect, state: &mut AppState) {
        let title = format!("Queue ({})", state.queue.len());
        let block = Block::default().borders(Borders::ALL).title(title);

        let inner = block.inner(area);
        let rows_visible = inner
            .height
            .saturating_sub(2) // header plus margin
            .max(1) as usize;

        frame.render_widget(block, area);

        let header = Row::new(vec!["#", "MARK", "STATUS", "FILE"])
            .style(Style::default().add_modifier(Modifier::BOLD))
            .bottom_margin(1);
        let widths = [
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(11),
            Constraint::Min(20),
        ];

        let entry_count = state.queue.len();
        if entry_count == 0 {
            let table = Table::new(Vec::<Row>::new(), widths)
                .header(header)
                .column_spacing(2);
            frame.render_widget(table, inner);
            return;
        }

        // Keep selection valid and clamp offset so selection stays in view
        let mut selected = state.dashboard.table_state.selected().unwrap_or(0);
        if selected >= entry_count {
            selected = entry_count - 1;
            state.dashboard.table_state.select(Some(selected));
        }
        let mut offset = state.dashboard.table_state.offset().min(selected);
        if selected >= offset + rows_visible {
            offset = selected + 1 - rows_visible;
        }
        *state.dashboard.table_state.offset_mut() = offset;

        let running = state.queue.running_entry();
        let rows: Vec<Row> = state
            .queue
            .entries()
            .iter()
            .enumerate()
            .map(|(idx, entry)| {
                let mark = if state.dashboard.marked.contains(&idx) {
                    "[x]"
                } else {
                    "[ ]"
                };
                let (status, status_style) = if Some(entry.id) == running {
                    ("Converting", Style::default().fg(Color::Green).bold())
                } else {
                    ("Queued", Style::default().fg(Color::DarkGray))
                };

                Row::new(vec![
                    Line::from(format!("{}", idx + 1)),
                    Line::from(mark),
                    Line::from(Span::styled(status, status_style)),
                    Line::from(entry.input_path.display().to_string()),
                ])
            })
            .collect();

        let table = Table::new(rows, widths)
            .header(header)
            .column_spacing(1)
            .row_highlight_style(Style::default().reversed())
            .highlight_symbol(">> ");

        frame.render_stateful_widget(table, inner, &mut state.dashboard.table_state);
    }

    pub(super) fn render_settings(frame: &mut Frame, area: Rect, state: &AppState) {
        let block = Block::default().borders(Borders::ALL).title("Settings");
        let label = Style::default().fg(Color::Cyan);

        let encoder = match Encoder::for_vendor(state.gpu.vendor) {
            Some(encoder) => Span::raw(format!(
                "{} ({})",
                encoder.ffmpeg_name(),
                encoder.display_name()
            )),
            None => Span::styled(
                "unsupported GPU type",
                Style::default().fg(Color::Red),
            ),
        };

        let lines = vec![
            Line::from(vec![
                Span::styled("Output directory: ", label),
                or_unset(&state.config.last_output_dir),
            ]),
            Line::from(vec![
                Span::styled("FFmpeg:           ", label),
                or_unset(&state.config.last_ffmpeg_path),
            ]),
            Line::from(vec![
                Span::styled("Detected GPU:     ", label),
                Span::raw(state.gpu.label()),
                Span::raw("  ->  "),
                encoder,
            ]),
        ];

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    pub(super) fn render_progress(frame: &mut Frame, area: Rect, state: &AppState) {
        let block = Block::default().borders(Borders::ALL).title("Progress");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(inner);

        let percent = state.dashboard.progress.percent();
        let progress_state = if state.queue.is_busy() {
            ProgressState::Running
        } else if state.dashboard.last_failed {
            ProgressState::Failed
        } else if percent >= 100.0 {
            ProgressState::Done
        } else {
            ProgressState::Idle
        };

        EnhancedProgress::new(percent, progress_state).render(rows[0], frame.buffer_mut());

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                state.dashboard.status.clone(),
                Style::default().add_modifier(Modifier::ITALIC),
            ))),
            rows[1],
        );
    }

    pub(super) fn render_transcript(frame: &mut Frame, area: Rect, state: &AppState) {
        let block = Block::default().borders(Borders::ALL).title("FFmpeg Output");
        let inner = block.inner(area);

        // Follow the tail
        let transcript = state.dashboard.progress.transcript();
        let visible = inner.height as usize;
        let lines: Vec<Line> = transcript
            .iter()
            .skip(transcript.len().saturating_sub(visible))
            .map(|l| Line::from(l.as_str()))
            .collect();

        frame.render_widget(
            Paragraph::new(lines)
                .block(block)
                .style(Style::default().fg(Color::Gray)),
            area,
        );
    }
}

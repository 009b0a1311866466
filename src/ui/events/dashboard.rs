use super::*;
use crate::ui::state::PromptKind;

pub(super) fn handle_dashboard_key(key: KeyEvent, state: &mut AppState) {
    match key.code {
        // Navigate queue
        KeyCode::Up => state.select_previous(),
        KeyCode::Down => state.select_next(),
        // Mark row for removal
        KeyCode::Char(' ') => state.toggle_mark(),
        // Add file or folder
        KeyCode::Char('a') | KeyCode::Char('A') => state.open_prompt(PromptKind::AddInput),
        // Remove marked (or highlighted) entries
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Delete => state.remove_marked(),
        KeyCode::Char('o') | KeyCode::Char('O') => state.open_prompt(PromptKind::OutputDir),
        KeyCode::Char('f') | KeyCode::Char('F') => state.open_prompt(PromptKind::FfmpegPath),
        // Re-run GPU detection
        KeyCode::Char('g') | KeyCode::Char('G') => {
            state.redetect_gpu();
            let label = state.gpu.label();
            state.set_status(format!("Detected GPU: {}", label));
        }
        // Start draining the queue
        KeyCode::Char('s') | KeyCode::Char('S') => state.start_conversion(),
        _ => {}
    }
}

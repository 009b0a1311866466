use super::*;

pub(super) fn handle_prompt_key(key: KeyEvent, state: &mut AppState) {
    match key.code {
        KeyCode::Enter => state.submit_prompt(),
        KeyCode::Esc => state.cancel_prompt(),
        KeyCode::Backspace => {
            if let Some(prompt) = state.prompt.as_mut() {
                prompt.buffer.pop();
            }
        }
        // Ctrl+U clears the line
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(prompt) = state.prompt.as_mut() {
                prompt.buffer.clear();
            }
        }
        KeyCode::Char(c) => {
            if let Some(prompt) = state.prompt.as_mut() {
                prompt.buffer.push(c);
            }
        }
        _ => {}
    }
}

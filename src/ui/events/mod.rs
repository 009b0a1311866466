// Event handling and main UI loop

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};

use crate::config::ConfigStore;
use crate::ui::{
    Dashboard, QuitModal,
    modal::{MessageModal, PromptModal},
    state::AppState,
};

mod dashboard;
mod prompt;
mod workers;

/// Worker messages handled per frame; the rest wait for the next tick
const MAX_WORKER_MESSAGES_PER_FRAME: usize = 64;

// Event types sent from dedicated event thread to main loop
enum UiEvent {
    Input(Event), // Keyboard or other terminal events
    Tick,         // Periodic redraw and worker polling
}

/// Spawn a dedicated thread for event polling.
fn spawn_event_thread(tx: mpsc::Sender<UiEvent>) {
    let tick_rate = Duration::from_millis(50);

    thread::spawn(move || {
        let mut last_tick = Instant::now();
        loop {
            let timeout = tick_rate
                .checked_sub(last_tick.elapsed())
                .unwrap_or(Duration::from_secs(0));

            if event::poll(timeout).unwrap_or(false) {
                if let Ok(evt) = event::read() {
                    if tx.send(UiEvent::Input(evt)).is_err() {
                        break; // Main thread dropped the receiver
                    }
                }
            }

            if last_tick.elapsed() >= tick_rate {
                if tx.send(UiEvent::Tick).is_err() {
                    break;
                }
                last_tick = Instant::now();
            }
        }
    });
}

pub fn run_ui(store: ConfigStore) -> io::Result<()> {
    let mut app_state = AppState::new(store);

    // Detect before taking over the terminal; nvidia-smi can take a moment
    app_state.redetect_gpu();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (event_tx, event_rx) = mpsc::channel();
    spawn_event_thread(event_tx);

    let result = run_app(&mut terminal, &mut app_state, event_rx);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    state: &mut AppState,
    event_rx: Receiver<UiEvent>,
) -> io::Result<()> {
    loop {
        let mut pending_inputs: Vec<Event> = Vec::new();

        // Always block for at least one event, then drain the queue
        match event_rx.recv() {
            Ok(UiEvent::Input(ev)) => pending_inputs.push(ev),
            Ok(UiEvent::Tick) => {}
            Err(_) => return Ok(()), // Channel closed, exit
        }
        while let Ok(evt) = event_rx.try_recv() {
            if let UiEvent::Input(ev) = evt {
                pending_inputs.push(ev);
            }
        }

        // Process input events first so user commands are never stuck behind a tick backlog
        for input in pending_inputs {
            if let Event::Key(key) = input {
                if handle_key(key, state) {
                    return Ok(());
                }
            }
        }

        workers::poll_worker_messages(state, MAX_WORKER_MESSAGES_PER_FRAME);

        terminal.draw(|frame| {
            Dashboard::render(frame, state);

            if let Some(ref prompt) = state.prompt {
                PromptModal::render(frame, prompt);
            }
            if let Some(modal) = state.modals.front() {
                MessageModal::render(frame, modal);
            }
            if let Some(ref quit) = state.quit_confirmation {
                QuitModal::render(frame, quit);
            }
        })?;
    }
}

fn should_quit(key: &KeyEvent) -> bool {
    // Quit on 'q' or Ctrl+C
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

/// Returns true when the app should exit
fn handle_key(key: KeyEvent, state: &mut AppState) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }

    // Quit confirmation sits on top of everything
    if state.quit_confirmation.is_some() {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => return true,
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                state.quit_confirmation = None;
            }
            _ => {}
        }
        return false;
    }

    // Message boxes block until dismissed
    if !state.modals.is_empty() {
        if matches!(
            key.code,
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')
        ) {
            state.dismiss_modal();
        }
        return false;
    }

    // Text entry swallows global shortcuts
    if state.prompt.is_some() {
        prompt::handle_prompt_key(key, state);
        return false;
    }

    if should_quit(&key) {
        return state.request_quit();
    }

    dashboard::handle_dashboard_key(key, state);
    false
}

// Terminal UI using Ratatui

pub mod components;
pub mod dashboard;
pub mod events;
pub mod modal;
pub mod quit_modal;
pub mod state;
pub mod widgets;

pub use dashboard::Dashboard;
pub use events::run_ui;
pub use modal::{MessageModal, PromptModal};
pub use quit_modal::QuitModal;
pub use state::AppState;

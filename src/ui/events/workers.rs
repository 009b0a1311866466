use super::*;
use crate::engine::WorkerMessage;

/// Apply up to `limit` pending worker messages to the dashboard
pub(super) fn poll_worker_messages(state: &mut AppState, limit: usize) {
    let messages: Vec<WorkerMessage> = state.queue.receiver().try_iter().take(limit).collect();

    for msg in messages {
        state.on_worker_message(msg);
    }
}

use crate::session::HistoryEntry;

pub fn render_history_json(history: &[HistoryEntry]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(history)
}

//! Output formatting for CLI commands

use serde::Serialize;

/// Format output as JSON or plain lines based on --json flag
pub fn format_output<T: Serialize>(data: &T, json: bool, plain: impl FnOnce(&T) -> String) -> String {
    if json {
        serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string())
    } else {
        plain(data)
    }
}

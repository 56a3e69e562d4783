//! Configuration data model.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::defaults::{DEFAULT_HISTORY_FILE_NAME, DEFAULT_MAX_HISTORY_LINES, DEFAULT_PROMPT};

/// Top-level configuration, one field per TOML table.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub history: HistoryConfig,
    pub display: DisplayConfig,
}

/// `[history]` table.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct HistoryConfig {
    /// History file; a leading `~/` is expanded after loading.
    pub file: PathBuf,
    /// Entries kept when loading and saving.
    pub max_lines: usize,
    /// Write history back on quit.
    pub persist: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from(format!("~/{DEFAULT_HISTORY_FILE_NAME}")),
            max_lines: DEFAULT_MAX_HISTORY_LINES,
            persist: true,
        }
    }
}

/// `[display]` table.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct DisplayConfig {
    pub color: bool,
    pub prompt: String,
    /// Show a random example statement in the empty input line.
    pub placeholder: bool,
    /// Render the internal-state panel under the editor.
    pub debug: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color: true,
            prompt: DEFAULT_PROMPT.to_string(),
            placeholder: true,
            debug: false,
        }
    }
}

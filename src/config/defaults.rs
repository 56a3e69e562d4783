//! Default configuration constants.

/// Default prompt shown before the input line.
pub(super) const DEFAULT_PROMPT: &str = "⧐  ";
/// Default number of history entries kept on disk.
pub(super) const DEFAULT_MAX_HISTORY_LINES: usize = 1000;
/// History file name under the home directory.
pub(super) const DEFAULT_HISTORY_FILE_NAME: &str = ".quill_history";
/// Directory under the platform config root holding `quill.toml` and logs.
pub const CONFIG_DIR_NAME: &str = "quill";
/// Config file name, both local and global.
pub(super) const CONFIG_FILE_NAME: &str = "quill.toml";
/// Log file name under the config directory.
pub(super) const LOG_FILE_NAME: &str = "quill.log";

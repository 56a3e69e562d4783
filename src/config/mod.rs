//! Configuration loading from TOML files and environment variables.
//!
//! Config is loaded in this order of precedence (highest wins):
//! 1. CLI flags (applied by the binary after loading)
//! 2. Environment variables (`QUILL_HISTORY_FILE`, `QUILL_MAX_HISTORY_LINES`,
//!    `QUILL_PROMPT`, `QUILL_DEBUG`, `NO_COLOR`)
//! 3. TOML file specified via `--config`
//! 4. `./quill.toml` in the current directory
//! 5. `$XDG_CONFIG_HOME/quill/quill.toml` (or `~/.config/quill/quill.toml`)
//! 6. Built-in defaults

use std::path::{Path, PathBuf};

mod defaults;
mod env;
mod loader;
mod sources;
mod types;

pub use defaults::CONFIG_DIR_NAME;
pub use loader::load_config;
pub use sources::ConfigSource;
pub use types::{Config, DisplayConfig, HistoryConfig};

/// Root directory for per-user config files.
pub fn config_root_dir() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("XDG_CONFIG_HOME") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    dirs::home_dir()
        .map(|home| home.join(".config"))
        .or_else(dirs::config_dir)
}

/// Default log file, `<config dir>/quill/quill.log`.
pub fn default_log_path() -> Option<PathBuf> {
    config_root_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(defaults::LOG_FILE_NAME))
}

/// Expand a leading `~/` (or a bare `~`) against `home`.
pub fn expand_home(path: &Path, home: Option<PathBuf>) -> PathBuf {
    let Some(home) = home else {
        return path.to_path_buf();
    };
    match path.strip_prefix("~") {
        Ok(rest) => home.join(rest),
        Err(_) => path.to_path_buf(),
    }
}

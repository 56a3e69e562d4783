//! Process startup helpers: file logging, the welcome banner and the user name.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::build_info;
use crate::config;
use crate::session::help::welcome_lines;
use crate::session::{SpanStyle, StyledLine};

/// Environment variable holding the log filter; logging is off when unset.
pub const LOG_ENV: &str = "QUILL_LOG";

/// Install a file-backed `tracing` subscriber when `QUILL_LOG` is set.
///
/// The terminal belongs to the editor, so logs never go to stderr. Returns
/// the log file path when logging was enabled.
pub fn init_logging(log_file: Option<&Path>) -> io::Result<Option<PathBuf>> {
    let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) else {
        return Ok(None);
    };
    let Some(path) = log_file
        .map(Path::to_path_buf)
        .or_else(config::default_log_path)
    else {
        return Ok(None);
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    // A subscriber may already be installed (tests); keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(Some(path))
}

/// Name used in the welcome banner.
pub fn current_user_name<F>(env_lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    ["USER", "USERNAME"]
        .into_iter()
        .filter_map(|name| env_lookup(name))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .unwrap_or_else(|| "there".to_string())
}

/// Banner printed once above the editor.
pub fn startup_lines(user: &str) -> Vec<StyledLine> {
    let mut lines = welcome_lines(user);
    lines.push(StyledLine::single(
        build_info::startup_metadata_line(),
        SpanStyle::Faint,
    ));
    lines
}

//! CLI argument parsing via clap.

use std::path::PathBuf;

use clap::Parser;

/// Interactive front end for the quill expression language.
#[derive(Debug, Parser)]
#[command(
    name = "quill",
    version = quill::build_info::VERSION,
    long_version = quill::build_info::LONG_VERSION
)]
pub struct Args {
    /// Program to evaluate once. Without it, starts the interactive editor.
    pub source: Option<String>,

    /// Path to config file (default: ./quill.toml or ~/.config/quill/quill.toml).
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Override the history file location.
    #[arg(long = "history-file", value_name = "PATH")]
    pub history_file: Option<PathBuf>,

    /// Override how many history entries are kept.
    #[arg(long = "max-history-lines", value_name = "N")]
    pub max_history_lines: Option<usize>,

    /// Disable color output.
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Write logs here when QUILL_LOG is set (default: ~/.config/quill/quill.log).
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::Args;
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn no_arguments_means_interactive() {
        let args = Args::parse_from(["quill"]);
        assert!(args.source.is_none());
        assert!(!args.no_color);
        assert!(args.max_history_lines.is_none());
    }

    #[test]
    fn positional_source_and_overrides_parse() {
        let args = Args::parse_from([
            "quill",
            "--history-file",
            "/tmp/h",
            "--max-history-lines",
            "10",
            "--no-color",
            "1 + 1",
        ]);
        assert_eq!(args.source.as_deref(), Some("1 + 1"));
        assert_eq!(args.history_file, Some(PathBuf::from("/tmp/h")));
        assert_eq!(args.max_history_lines, Some(10));
        assert!(args.no_color);
    }

    #[test]
    fn max_history_lines_must_be_a_number() {
        assert!(Args::try_parse_from(["quill", "--max-history-lines", "many"]).is_err());
    }
}

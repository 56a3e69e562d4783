//! CLI entry point for quill.

mod cli;

use std::io::{self, IsTerminal};

use clap::Parser;
use quill::app::{
    current_user_name, init_logging, run_exec_mode, run_line_mode, run_repl_mode, startup_lines,
};
use quill::config::{expand_home, load_config, Config};
use tracing::info;

#[tokio::main]
async fn main() {
    let args = cli::Args::parse();

    match init_logging(args.log_file.as_deref()) {
        Ok(Some(path)) => info!(path = %path.display(), "logging enabled"),
        Ok(None) => {}
        Err(e) => eprintln!("warning: logging disabled: {e}"),
    }

    let mut config = match load_config(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };
    apply_cli_overrides(&mut config, &args);

    let code = if let Some(source) = args.source.as_deref() {
        run_exec_mode(source, config.display.color && io::stdout().is_terminal())
    } else if !io::stdin().is_terminal() || !io::stderr().is_terminal() {
        let color = config.display.color && io::stdout().is_terminal();
        match run_line_mode(io::stdin().lock(), &mut io::stdout().lock(), color) {
            Ok(code) => code,
            Err(e) => {
                eprintln!("error: {e}");
                1
            }
        }
    } else {
        let user = current_user_name(|name| std::env::var(name).ok());
        match run_repl_mode(&config, startup_lines(&user)) {
            Ok(code) => code,
            Err(e) => {
                eprintln!("error: {e}");
                1
            }
        }
    };

    // Exit directly: dropping the runtime would wait on an abandoned
    // evaluation still sleeping or blocked on the blocking pool.
    std::process::exit(code);
}

/// CLI flags win over every other config source.
fn apply_cli_overrides(config: &mut Config, args: &cli::Args) {
    if let Some(path) = &args.history_file {
        config.history.file = expand_home(path, dirs::home_dir());
    }
    if let Some(max) = args.max_history_lines {
        config.history.max_lines = max;
    }
    if args.no_color {
        config.display.color = false;
    }
}

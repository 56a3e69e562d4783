//! Application orchestration for the `quill` binary.
//!
//! `main.rs` parses arguments and loads config, then hands off to one of the
//! modes here: the interactive editor, a one-shot evaluation, or line-by-line
//! evaluation of piped input.

pub mod exec_mode;
pub mod repl_mode;
pub mod startup;

pub use exec_mode::{run_exec_mode, run_line_mode};
pub use repl_mode::{initial_session, run_repl_mode};
pub use startup::{current_user_name, init_logging, startup_lines};

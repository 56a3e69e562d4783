//! Non-interactive evaluation: a single `SOURCE` argument, or one program per
//! line when stdin is not a terminal.

use std::io::{self, BufRead, Write};

use tracing::info;

use crate::lang::Interpreter;
use crate::runtime::{pipe, Runtime};
use crate::session::{outcome_lines, StyledLine};
use crate::tui::write_styled_line;

/// Runtime whose `stdin()` always sees end of input.
fn detached_interpreter() -> Interpreter {
    let (writer, reader) = pipe();
    drop(writer);
    Interpreter::new(reader)
}

/// Evaluate `source` once and print its outcome. Returns `true` on success.
fn evaluate_and_print<R, W>(runtime: &R, source: &str, out: &mut W, color: bool) -> io::Result<bool>
where
    R: Runtime,
    W: Write,
{
    let result = runtime.run(source);
    let lines: Vec<StyledLine> = outcome_lines(&result);
    for line in &lines {
        write_styled_line(out, line, color, "\n")?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(result.succeeded)
}

/// `quill SOURCE`: exit code 0 on success, 1 on any failure.
pub fn run_exec_mode(source: &str, color: bool) -> i32 {
    let runtime = detached_interpreter();
    let mut stdout = io::stdout().lock();
    match evaluate_and_print(&runtime, source, &mut stdout, color) {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(err) => {
            eprintln!("error: {err}");
            1
        }
    }
}

/// Evaluate each non-empty line of `input` against one shared environment.
///
/// Exit code is 1 if any line failed.
pub fn run_line_mode<I, W>(input: I, out: &mut W, color: bool) -> io::Result<i32>
where
    I: BufRead,
    W: Write,
{
    let runtime = detached_interpreter();
    let mut code = 0;
    let mut evaluated = 0usize;
    for line in input.lines() {
        let line = line?;
        let source = line.trim();
        if source.is_empty() {
            continue;
        }
        evaluated += 1;
        if !evaluate_and_print(&runtime, source, out, color)? {
            code = 1;
        }
    }
    info!(evaluated, "line mode finished");
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_lines(input: &str) -> (i32, String) {
        let mut out = Vec::new();
        let code = run_line_mode(input.as_bytes(), &mut out, false).expect("line mode");
        (code, String::from_utf8(out).expect("utf8"))
    }

    #[test]
    fn lines_share_one_environment() {
        let (code, out) = run_lines("x = 20\n\nx + 1\n");
        assert_eq!(code, 0);
        assert_eq!(out, "21\n");
    }

    #[test]
    fn echo_output_comes_before_the_result() {
        let (_, out) = run_lines("echo(\"hi\"); 2\n");
        assert_eq!(out, "hi\n2\n");
    }

    #[test]
    fn any_failure_sets_exit_code() {
        let (code, out) = run_lines("missing\n1\n");
        assert_eq!(code, 1);
        assert!(out.starts_with("ERROR: identifier not found: missing\n"));
        assert!(out.ends_with("1\n"));
    }

    #[test]
    fn stdin_reads_nothing_when_detached() {
        let (code, out) = run_lines("stdin()\n");
        assert_eq!(code, 0);
        assert_eq!(out, "");
    }

    #[tokio::test]
    async fn stdin_is_safe_to_call_from_an_async_caller() {
        let (code, out) = run_lines("name = stdin()\nstdin()\n");
        assert_eq!(code, 0);
        assert_eq!(out, "");
    }

    #[test]
    fn syntax_errors_are_listed() {
        let (code, out) = run_lines("x = )\n");
        assert_eq!(code, 1);
        assert!(out.starts_with("encountered 1 syntax errors:\n  1) "));
    }
}

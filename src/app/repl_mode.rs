//! Interactive REPL mode orchestration.
//!
//! This module owns the terminal event loop: it paints the session view,
//! feeds key presses and finished evaluations into [`Session::update`], and
//! carries out the effects the session asks for. It must run inside a Tokio
//! runtime because evaluations are spawned on the blocking pool.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event};
use tracing::{info, warn};

use crate::config::Config;
use crate::eval::EvaluationSession;
use crate::lang::Interpreter;
use crate::runtime::{pipe, EvaluationResult, Runtime, RuntimeValue};
use crate::session::help::placeholder;
use crate::session::{Effect, HistoryStore, Msg, Session, SessionOptions, StyledLine};
use crate::tui::{key_from_event, settings, RawModeGuard, TerminalPainter};

/// Build the initial session from configuration and the on-disk history.
pub fn initial_session(config: &Config) -> Session {
    let history = match HistoryStore::load(&config.history.file, config.history.max_lines) {
        Ok(history) => history,
        Err(err) => {
            warn!(path = %config.history.file.display(), error = %err, "history not loaded");
            HistoryStore::default()
        }
    };
    let options = SessionOptions {
        prompt: config.display.prompt.clone(),
        placeholder: config
            .display
            .placeholder
            .then(|| placeholder(&mut rand::thread_rng())),
        debug: config.display.debug,
    };
    Session::new(options, history)
}

/// Run the interactive editor until the user quits. Returns the exit code.
pub fn run_repl_mode(config: &Config, banner: Vec<StyledLine>) -> io::Result<i32> {
    let (writer, reader) = pipe();
    let runtime = Arc::new(Interpreter::new(reader));
    let mut eval = EvaluationSession::new(Arc::clone(&runtime), writer);
    let mut session = initial_session(config);

    let guard = RawModeGuard::acquire()?;
    let mut painter = TerminalPainter::new(io::stderr(), config.display.color);
    painter.print_transcript(&banner)?;
    info!(entries = session.history().len(), "interactive session started");

    let mut pending: VecDeque<Msg> = VecDeque::new();
    loop {
        if let Some((id, result)) = eval.poll() {
            pending.push_back(Msg::EvalDone { id, result });
        }

        let mut quit = false;
        while let Some(msg) = pending.pop_front() {
            let (next, effects) = session.update(msg, runtime.as_ref());
            session = next;
            quit |= apply_effects(effects, &mut painter, &mut eval, &mut pending)?;
        }
        if quit {
            break;
        }

        painter.paint(&session.view())?;

        if !event::poll(Duration::from_millis(settings::REPL_EVENT_POLL_MS))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) => {
                if let Some(key) = key_from_event(&key) {
                    pending.push_back(Msg::Key(key));
                }
            }
            Event::Resize(_, _) => painter.invalidate(),
            _ => {}
        }
    }

    painter.finish()?;
    drop(guard);
    if eval.cancel().is_some() {
        info!("abandoned running evaluation on quit");
    }

    if config.history.persist {
        save_history(config, session.history());
    }
    Ok(0)
}

/// Carry out session effects. Returns `true` when the session asked to quit.
fn apply_effects<R, W>(
    effects: Vec<Effect>,
    painter: &mut TerminalPainter<W>,
    eval: &mut EvaluationSession<R>,
    pending: &mut VecDeque<Msg>,
) -> io::Result<bool>
where
    R: Runtime,
    W: Write,
{
    let mut quit = false;
    for effect in effects {
        match effect {
            Effect::Print(lines) => painter.print_transcript(&lines)?,
            Effect::StartEvaluation { id, source } => {
                if let Err(err) = eval.start(id, source) {
                    warn!(eval_id = id, error = %err, "evaluation not started");
                    pending.push_back(Msg::EvalDone {
                        id,
                        result: EvaluationResult::failure(RuntimeValue::Error(err.to_string())),
                    });
                }
            }
            Effect::CancelEvaluation(id) => {
                if eval.cancel() != Some(id) {
                    warn!(eval_id = id, "cancel requested for an evaluation that is not running");
                }
            }
            Effect::Relay(bytes) => {
                if let Err(err) = eval.relay(&bytes) {
                    warn!(error = %err, "keystrokes not relayed");
                }
            }
            Effect::ClearScreen => painter.clear_screen()?,
            Effect::Quit => quit = true,
        }
    }
    Ok(quit)
}

fn save_history(config: &Config, history: &HistoryStore) {
    let path = &config.history.file;
    match HistoryStore::save(path, config.history.max_lines, history.entries()) {
        Ok(()) => info!(path = %path.display(), entries = history.len(), "history saved"),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "history not saved");
            eprintln!("Cannot write to history file ({}): {err}", path.display());
        }
    }
}

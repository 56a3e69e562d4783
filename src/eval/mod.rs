//! Cancellable background evaluation and stdin relay.
//!
//! One [`EvaluationSession`] slot runs at most one program at a time on a
//! blocking worker thread. The UI loop never waits on it: it calls
//! [`EvaluationSession::poll`] between terminal events and forwards keystrokes
//! through [`EvaluationSession::relay`] while the program is running.

use std::io::Write;
use std::sync::Arc;

use tokio::sync::{oneshot, watch};
use tracing::{debug, info, warn};

use crate::error::EvalError;
use crate::runtime::{EvaluationResult, RelayWriter, Runtime, RuntimeValue};

/// Identifier assigned by the session to each submitted evaluation.
pub type EvalId = u64;

/// Lifecycle of the slot, tagged with the most recent evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalState {
    Idle,
    Running(EvalId),
    Completed(EvalId),
    Cancelled(EvalId),
}

/// Bookkeeping for the in-flight evaluation.
struct ActiveEval {
    /// Session-assigned identifier.
    id: EvalId,
    /// Flipped to `true` on cancel; checked by the worker before delivering.
    cancel_tx: watch::Sender<bool>,
    /// Single-slot completion channel.
    done_rx: oneshot::Receiver<EvaluationResult>,
}

/// Owns the runtime handle, the relay writer and the in-flight evaluation.
pub struct EvaluationSession<R: Runtime> {
    runtime: Arc<R>,
    relay: RelayWriter,
    active: Option<ActiveEval>,
    state: EvalState,
}

impl<R: Runtime> EvaluationSession<R> {
    pub fn new(runtime: Arc<R>, relay: RelayWriter) -> Self {
        Self {
            runtime,
            relay,
            active: None,
            state: EvalState::Idle,
        }
    }

    pub fn runtime(&self) -> &Arc<R> {
        &self.runtime
    }

    pub fn state(&self) -> EvalState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Hand `source` to the runtime on a blocking worker and return at once.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(&mut self, id: EvalId, source: String) -> Result<(), EvalError> {
        if self.active.is_some() {
            return Err(EvalError::AlreadyRunning);
        }
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let (done_tx, done_rx) = oneshot::channel();
        let runtime = Arc::clone(&self.runtime);

        tokio::task::spawn_blocking(move || {
            let result = runtime.run(&source);
            if *cancel_rx.borrow() {
                debug!(eval_id = id, "discarding result of cancelled evaluation");
                return;
            }
            let _ = done_tx.send(result);
        });

        info!(eval_id = id, "evaluation started");
        self.active = Some(ActiveEval {
            id,
            cancel_tx,
            done_rx,
        });
        self.state = EvalState::Running(id);
        Ok(())
    }

    /// Signal cancellation. The worker keeps running but its result is dropped.
    pub fn cancel(&mut self) -> Option<EvalId> {
        let active = self.active.take()?;
        let _ = active.cancel_tx.send(true);
        info!(eval_id = active.id, "evaluation cancelled");
        self.state = EvalState::Cancelled(active.id);
        Some(active.id)
    }

    /// Forward raw bytes to the runtime's stdin. Ignored unless running.
    pub fn relay(&mut self, bytes: &[u8]) -> Result<(), EvalError> {
        if self.active.is_none() || bytes.is_empty() {
            return Ok(());
        }
        self.relay.write_all(bytes)?;
        Ok(())
    }

    /// Non-blocking check for a finished evaluation.
    pub fn poll(&mut self) -> Option<(EvalId, EvaluationResult)> {
        let active = self.active.as_mut()?;
        let result = match active.done_rx.try_recv() {
            Ok(result) => result,
            Err(oneshot::error::TryRecvError::Empty) => return None,
            Err(oneshot::error::TryRecvError::Closed) => aborted(active.id),
        };
        Some(self.finish(result))
    }

    /// Wait for the in-flight evaluation to finish.
    pub async fn wait(&mut self) -> Option<(EvalId, EvaluationResult)> {
        let active = self.active.as_mut()?;
        let id = active.id;
        let result = (&mut active.done_rx)
            .await
            .unwrap_or_else(|_| aborted(id));
        Some(self.finish(result))
    }

    fn finish(&mut self, result: EvaluationResult) -> (EvalId, EvaluationResult) {
        let id = self.active.take().map(|a| a.id).unwrap_or_default();
        debug!(eval_id = id, succeeded = result.succeeded, "evaluation completed");
        self.state = EvalState::Completed(id);
        (id, result)
    }
}

/// The worker went away without sending (it panicked).
fn aborted(id: EvalId) -> EvaluationResult {
    warn!(eval_id = id, "evaluation worker exited without a result");
    EvaluationResult::failure(RuntimeValue::Error("evaluation aborted".to_string()))
}

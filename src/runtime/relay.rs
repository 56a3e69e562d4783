//! In-process pipe that carries relayed keystrokes to the runtime's stdin.
//!
//! The terminal owns the real stdin while the session is running, so the
//! runtime reads program input from a [`RelayReader`] instead. The session
//! writes keystrokes into the paired [`RelayWriter`] while an evaluation is in
//! flight. The channel is a plain `std::sync::mpsc` one so the reader can block
//! on any thread, including one that is driving the async runtime.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::mpsc;

/// Create a connected writer/reader pair.
pub fn pipe() -> (RelayWriter, RelayReader) {
    let (tx, rx) = mpsc::channel();
    (
        RelayWriter { tx },
        RelayReader {
            rx,
            pending: VecDeque::new(),
        },
    )
}

/// Write half, owned by the evaluation slot.
#[derive(Debug, Clone)]
pub struct RelayWriter {
    tx: mpsc::Sender<Vec<u8>>,
}

impl Write for RelayWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.tx
            .send(buf.to_vec())
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "relay reader dropped"))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Read half, owned by the runtime.
#[derive(Debug)]
pub struct RelayReader {
    rx: mpsc::Receiver<Vec<u8>>,
    pending: VecDeque<u8>,
}

impl RelayReader {
    /// Block until a full line arrives and return it without the newline.
    ///
    /// Returns the trailing partial line (or `None` when nothing is left) once
    /// every writer is gone.
    pub fn read_line(&mut self) -> Option<String> {
        loop {
            if let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
                let line: Vec<u8> = self.pending.drain(..=pos).collect();
                return Some(decode_line(&line[..line.len() - 1]));
            }
            match self.rx.recv() {
                Ok(chunk) => self.pending.extend(chunk),
                Err(mpsc::RecvError) => {
                    if self.pending.is_empty() {
                        return None;
                    }
                    let rest: Vec<u8> = self.pending.drain(..).collect();
                    return Some(decode_line(&rest));
                }
            }
        }
    }
}

fn decode_line(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    text.trim_end_matches('\r').to_string()
}

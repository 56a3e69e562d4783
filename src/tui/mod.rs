//! Terminal adapter for the session.
//!
//! Everything here is crossterm-specific: decoding key events into
//! [`Key`](crate::session::Key)s, laying out and painting
//! [`View`](crate::session::View)s, and owning raw mode.

pub mod keymap;
mod layout;
pub mod settings;
pub mod terminal;

pub use keymap::key_from_event;
pub use terminal::{plain_text, write_styled_line, RawModeGuard, TerminalPainter};

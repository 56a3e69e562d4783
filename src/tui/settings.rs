//! Centralized, hardcoded UI settings for the terminal interface.
//!
//! This is the single place to tweak colors and event-loop timing.

use crossterm::style::Color;

// ---------------------------------------------------------------------------
// Event loop
// ---------------------------------------------------------------------------

/// How long the editor waits for a terminal event before polling the
/// evaluation slot again.
pub const REPL_EVENT_POLL_MS: u64 = 80;

/// Width assumed when the terminal size cannot be read.
pub const FALLBACK_COLUMNS: usize = 80;

pub const NEWLINE_RAW: &str = "\r\n";

// ---------------------------------------------------------------------------
// Colors
// ---------------------------------------------------------------------------

pub const COLOR_PROMPT: Color = Color::Cyan;
pub const COLOR_PLACEHOLDER: Color = Color::DarkGrey;
pub const COLOR_ERROR: Color = Color::Red;
pub const COLOR_FAINT: Color = Color::DarkGrey;
pub const COLOR_CODE: Color = Color::Yellow;

pub const COLOR_SEARCH_PROMPT: Color = Color::Magenta;
pub const COLOR_SEARCH_TEXT: Color = Color::White;

pub const COLOR_SUGGESTION_FUNCTION: Color = Color::Blue;
pub const COLOR_SUGGESTION_IDENTIFIER: Color = Color::Green;
pub const COLOR_SUGGESTION_PROPERTY: Color = Color::DarkYellow;
pub const COLOR_SUGGESTION_SELECTED: Color = Color::White;
pub const COLOR_SUGGESTION_SELECTED_BG: Color = Color::Rgb {
    r: 40,
    g: 48,
    b: 64,
};
pub const COLOR_SUGGESTION_MARKER: Color = Color::DarkYellow;
pub const COLOR_SUGGESTION_COMMENT: Color = Color::DarkGrey;

pub const COLOR_DEBUG: Color = Color::DarkMagenta;

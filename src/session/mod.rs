//! Interactive session core: editing, history, search, completion and the
//! mode state machine that ties them together.

mod controller;
pub mod help;
mod history;
mod input_line;
mod keys;
mod search;
pub mod suggest;
pub mod view;

pub use controller::{outcome_lines, Effect, Mode, Msg, Session, SessionOptions};
pub use history::HistoryStore;
pub use input_line::InputLine;
pub use keys::Key;
pub use search::SearchState;
pub use suggest::{CandidateKind, SuggestionCandidate, Suggestions};
pub use view::{CursorPos, Span, SpanStyle, StyledLine, View};

//! Render tree produced by the session and painted by the terminal adapter.

/// Closed set of styles; the terminal maps each to colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanStyle {
    Plain,
    Prompt,
    Placeholder,
    Error,
    Faint,
    Code,
    SearchPrompt,
    SearchText,
    FunctionSuggestion,
    IdentifierSuggestion,
    PropertySuggestion,
    Selected,
    SelectedPrefix,
    Comment,
    Debug,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: SpanStyle,
}

impl Span {
    pub fn new(text: impl Into<String>, style: SpanStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, SpanStyle::Plain)
    }
}

/// One rendered row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledLine {
    pub spans: Vec<Span>,
}

impl StyledLine {
    pub fn new(spans: Vec<Span>) -> Self {
        Self { spans }
    }

    pub fn single(text: impl Into<String>, style: SpanStyle) -> Self {
        Self::new(vec![Span::new(text, style)])
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::single(text, SpanStyle::Plain)
    }

    /// Concatenated text without styling.
    pub fn text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }
}

/// Cursor position within [`View::lines`], in characters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CursorPos {
    pub row: usize,
    pub column: usize,
}

/// The editor surface: everything below the transcript.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct View {
    pub lines: Vec<StyledLine>,
    pub cursor: Option<CursorPos>,
}

impl View {
    /// Plain text rows, for tests and non-color output.
    pub fn plain_lines(&self) -> Vec<String> {
        self.lines.iter().map(StyledLine::text).collect()
    }
}

/// Debug panel rows, sorted by key.
pub(crate) fn debug_panel(entries: &[(&str, String)]) -> Vec<StyledLine> {
    let mut sorted: Vec<&(&str, String)> = entries.iter().collect();
    sorted.sort_by_key(|(key, _)| *key);
    let mut lines = vec![StyledLine::single("debug:", SpanStyle::Debug)];
    lines.extend(
        sorted
            .into_iter()
            .map(|(key, value)| StyledLine::single(format!("  {key}: {value}"), SpanStyle::Debug)),
    );
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_panel_sorts_keys() {
        let lines = debug_panel(&[("b", "2".into()), ("a", "1".into())]);
        let text: Vec<String> = lines.iter().map(StyledLine::text).collect();
        assert_eq!(text, vec!["debug:", "  a: 1", "  b: 2"]);
    }

    #[test]
    fn line_text_concatenates_spans() {
        let line = StyledLine::new(vec![
            Span::new("⧐  ", SpanStyle::Prompt),
            Span::plain("1 + 1"),
        ]);
        assert_eq!(line.text(), "⧐  1 + 1");
    }
}

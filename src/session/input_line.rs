//! Single-line editable buffer with a char-indexed cursor.

use crate::textutil::{byte_index_at_char, char_at, char_count};

/// Editable input text plus placeholder and focus state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputLine {
    value: String,
    cursor: usize,
    placeholder: Option<String>,
    focused: bool,
}

impl InputLine {
    pub fn new() -> Self {
        Self {
            focused: true,
            ..Self::default()
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Replace the text and move the cursor to the end.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = char_count(&self.value);
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    pub fn set_placeholder(&mut self, placeholder: Option<String>) {
        self.placeholder = placeholder;
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn insert_char(&mut self, ch: char) {
        let byte_idx = byte_index_at_char(&self.value, self.cursor);
        self.value.insert(byte_idx, ch);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.delete_range(self.cursor - 1, self.cursor);
        self.cursor -= 1;
    }

    pub fn delete(&mut self) {
        if self.cursor < char_count(&self.value) {
            self.delete_range(self.cursor, self.cursor + 1);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(char_count(&self.value));
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = char_count(&self.value);
    }

    /// Ctrl-K.
    pub fn kill_to_end(&mut self) {
        self.delete_range(self.cursor, char_count(&self.value));
    }

    /// Ctrl-U.
    pub fn kill_to_start(&mut self) {
        self.delete_range(0, self.cursor);
        self.cursor = 0;
    }

    /// Ctrl-W: delete trailing whitespace then the word before the cursor.
    pub fn kill_previous_word(&mut self) {
        let start = previous_word_start(&self.value, self.cursor);
        self.delete_range(start, self.cursor);
        self.cursor = start;
    }

    fn delete_range(&mut self, start_char: usize, end_char: usize) {
        if start_char >= end_char {
            return;
        }
        let start = byte_index_at_char(&self.value, start_char);
        let end = byte_index_at_char(&self.value, end_char);
        self.value.replace_range(start..end, "");
    }
}

fn previous_word_start(buffer: &str, cursor: usize) -> usize {
    let mut idx = cursor;
    while idx > 0 && char_at(buffer, idx - 1).is_whitespace() {
        idx -= 1;
    }
    while idx > 0 && !char_at(buffer, idx - 1).is_whitespace() {
        idx -= 1;
    }
    idx
}

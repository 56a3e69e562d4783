//! UTF-8-safe text helpers shared by the editor and the renderer.
//!
//! The input line tracks its cursor in characters, never bytes, so every
//! splice goes through these conversions.

/// Truncate by characters and append `suffix` when truncation occurs.
pub fn truncate_with_suffix_by_chars(text: &str, max_chars: usize, suffix: &str) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let prefix: String = text.chars().take(max_chars).collect();
    format!("{prefix}{suffix}")
}

/// Convert a char index to a byte index, preserving UTF-8 boundaries.
pub(crate) fn byte_index_at_char(s: &str, char_idx: usize) -> usize {
    if char_idx == 0 {
        return 0;
    }
    s.char_indices()
        .nth(char_idx)
        .map(|(idx, _)| idx)
        .unwrap_or(s.len())
}

/// Return the char value at index, or NUL when out of range.
pub(crate) fn char_at(s: &str, char_idx: usize) -> char {
    s.chars().nth(char_idx).unwrap_or('\0')
}

/// Return total char count for a UTF-8 string.
pub(crate) fn char_count(s: &str) -> usize {
    s.chars().count()
}

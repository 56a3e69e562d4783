//! Terminal row/column layout helpers for the editor surface.

use crossterm::terminal;

use crate::session::{StyledLine, View};
use crate::tui::settings;

/// Computed layout for a painted [`View`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ViewLayout {
    /// Total terminal rows consumed by the view.
    pub(crate) total_rows: usize,
    /// Row index where the cursor should be placed.
    pub(crate) cursor_row: usize,
    /// Column index where the cursor should be placed.
    pub(crate) cursor_col: usize,
}

/// Read terminal width or fall back to 80 columns.
pub(crate) fn terminal_columns() -> usize {
    terminal::size()
        .ok()
        .map(|(cols, _)| cols as usize)
        .filter(|cols| *cols > 0)
        .unwrap_or(settings::FALLBACK_COLUMNS)
}

/// Rows consumed by `text` once soft-wrapped at `cols`.
pub(crate) fn wrapped_rows(text: &str, cols: usize) -> usize {
    let mut row = 0usize;
    let mut col = 0usize;
    advance_text(text, cols, &mut row, &mut col);
    row + 1
}

/// Compute where every row of `view` lands and where the cursor goes.
///
/// Without a cursor the layout parks it at the end of the last row.
pub(crate) fn compute_view_layout(view: &View, cols: usize) -> ViewLayout {
    let texts: Vec<String> = view.lines.iter().map(StyledLine::text).collect();
    let total_rows = texts
        .iter()
        .map(|text| wrapped_rows(text, cols))
        .sum::<usize>()
        .max(1);

    let Some(cursor) = view.cursor else {
        return ViewLayout {
            total_rows,
            cursor_row: total_rows - 1,
            cursor_col: texts.last().map_or(0, |last| end_column(last, cols)),
        };
    };

    let mut row: usize = texts
        .iter()
        .take(cursor.row)
        .map(|text| wrapped_rows(text, cols))
        .sum();
    let mut col = 0usize;
    let line: Vec<char> = texts
        .get(cursor.row)
        .map(|text| text.chars().collect())
        .unwrap_or_default();
    for _ in 0..cursor.column.min(line.len()) {
        advance_char(cols, &mut row, &mut col);
    }
    ViewLayout {
        total_rows,
        cursor_row: row,
        cursor_col: col,
    }
}

fn end_column(text: &str, cols: usize) -> usize {
    let mut row = 0usize;
    let mut col = 0usize;
    advance_text(text, cols, &mut row, &mut col);
    col
}

fn advance_text(text: &str, cols: usize, row: &mut usize, col: &mut usize) {
    for ch in text.chars() {
        if ch == '\n' {
            *row += 1;
            *col = 0;
        } else {
            advance_char(cols, row, col);
        }
    }
}

/// Advance by one printable cell, wrapping to the next row when needed.
fn advance_char(cols: usize, row: &mut usize, col: &mut usize) {
    if cols == 0 {
        return;
    }
    if *col + 1 >= cols {
        *row += 1;
        *col = 0;
    } else {
        *col += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::CursorPos;

    fn view(lines: &[&str], cursor: Option<CursorPos>) -> View {
        View {
            lines: lines.iter().map(|line| StyledLine::plain(*line)).collect(),
            cursor,
        }
    }

    #[test]
    fn wrapped_rows_counts_soft_wraps() {
        assert_eq!(wrapped_rows("", 10), 1);
        assert_eq!(wrapped_rows("abcd", 10), 1);
        assert_eq!(wrapped_rows("abcdefghijkl", 10), 2);
    }

    #[test]
    fn cursor_lands_on_its_row_and_column() {
        let layout = compute_view_layout(
            &view(&["> abc", "   one", "   two"], Some(CursorPos { row: 0, column: 4 })),
            80,
        );
        assert_eq!(layout.total_rows, 3);
        assert_eq!(layout.cursor_row, 0);
        assert_eq!(layout.cursor_col, 4);
    }

    #[test]
    fn cursor_accounts_for_wrapped_rows_above() {
        let layout = compute_view_layout(
            &view(&["0123456789abc", " search: x"], Some(CursorPos { row: 1, column: 10 })),
            10,
        );
        assert_eq!(layout.total_rows, 4);
        assert_eq!(layout.cursor_row, 3);
        assert_eq!(layout.cursor_col, 0);
    }

    #[test]
    fn missing_cursor_parks_on_last_row() {
        let layout = compute_view_layout(&view(&["> sleep(1)", ""], None), 80);
        assert_eq!(layout.total_rows, 2);
        assert_eq!(layout.cursor_row, 1);
        assert_eq!(layout.cursor_col, 0);
    }
}

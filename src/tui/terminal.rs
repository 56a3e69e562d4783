//! Painting session views and transcript lines onto a terminal.
//!
//! The editor surface is redrawn in place: move up to the first painted row,
//! clear everything below, then print the new frame and park the cursor.
//! Transcript lines are printed above the surface and never repainted.

use std::io::{self, Write};

use crossterm::cursor::{Hide, MoveTo, MoveToColumn, MoveUp, Show};
use crossterm::style::{Print, PrintStyledContent, StyledContent, Stylize};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::QueueableCommand;

use crate::session::{SpanStyle, StyledLine, View};
use crate::tui::layout::{compute_view_layout, terminal_columns};
use crate::tui::settings;

/// Incremental painter for the editor surface.
pub struct TerminalPainter<W: Write> {
    out: W,
    color: bool,
    /// Row (relative to the first painted row) where the cursor was left.
    cursor_row: usize,
    /// Last painted frame, used to skip redundant repaints.
    last_view: Option<View>,
}

impl<W: Write> TerminalPainter<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self {
            out,
            color,
            cursor_row: 0,
            last_view: None,
        }
    }

    /// Redraw the editor surface unless `view` matches the previous frame.
    pub fn paint(&mut self, view: &View) -> io::Result<()> {
        if self.last_view.as_ref() == Some(view) {
            return Ok(());
        }
        self.clear_surface()?;

        for (idx, line) in view.lines.iter().enumerate() {
            if idx > 0 {
                self.out.queue(Print(settings::NEWLINE_RAW))?;
            }
            write_styled_line(&mut self.out, line, self.color, settings::NEWLINE_RAW)?;
        }

        let layout = compute_view_layout(view, terminal_columns());
        let bottom_row = layout.total_rows.saturating_sub(1);
        let up = bottom_row.saturating_sub(layout.cursor_row);
        if up > 0 {
            self.out.queue(MoveUp(up as u16))?;
        }
        self.out.queue(MoveToColumn(layout.cursor_col as u16))?;
        if view.cursor.is_some() {
            self.out.queue(Show)?;
        } else {
            self.out.queue(Hide)?;
        }
        self.out.flush()?;

        self.cursor_row = layout.cursor_row;
        self.last_view = Some(view.clone());
        Ok(())
    }

    /// Print finished lines above the editor; the surface is redrawn below
    /// them on the next [`paint`](Self::paint).
    pub fn print_transcript(&mut self, lines: &[StyledLine]) -> io::Result<()> {
        self.clear_surface()?;
        for line in lines {
            write_styled_line(&mut self.out, line, self.color, settings::NEWLINE_RAW)?;
            self.out.queue(Print(settings::NEWLINE_RAW))?;
        }
        self.out.flush()?;
        self.invalidate();
        Ok(())
    }

    /// Wipe the whole screen and start painting from the top-left corner.
    pub fn clear_screen(&mut self) -> io::Result<()> {
        self.out.queue(Clear(ClearType::All))?;
        self.out.queue(MoveTo(0, 0))?;
        self.out.flush()?;
        self.invalidate();
        Ok(())
    }

    /// Remove the editor surface and restore the cursor before exiting.
    pub fn finish(&mut self) -> io::Result<()> {
        self.clear_surface()?;
        self.out.queue(Show)?;
        self.out.flush()?;
        self.invalidate();
        Ok(())
    }

    /// Forget the painted surface; the next paint starts at the cursor.
    pub fn invalidate(&mut self) {
        self.cursor_row = 0;
        self.last_view = None;
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }

    fn clear_surface(&mut self) -> io::Result<()> {
        if self.cursor_row > 0 {
            self.out.queue(MoveUp(self.cursor_row as u16))?;
        }
        self.out.queue(MoveToColumn(0))?;
        self.out.queue(Clear(ClearType::FromCursorDown))?;
        Ok(())
    }
}

/// Queue one styled line; embedded newlines become `newline`.
pub fn write_styled_line<W: Write>(
    out: &mut W,
    line: &StyledLine,
    color: bool,
    newline: &str,
) -> io::Result<()> {
    for span in &line.spans {
        for (idx, part) in span.text.split('\n').enumerate() {
            if idx > 0 {
                out.queue(Print(newline))?;
            }
            if part.is_empty() {
                continue;
            }
            if color {
                out.queue(PrintStyledContent(styled(part, span.style)))?;
            } else {
                out.queue(Print(part))?;
            }
        }
    }
    Ok(())
}

fn styled(text: &str, style: SpanStyle) -> StyledContent<&str> {
    match style {
        SpanStyle::Plain => text.stylize(),
        SpanStyle::Prompt => text.with(settings::COLOR_PROMPT).bold(),
        SpanStyle::Placeholder => text.with(settings::COLOR_PLACEHOLDER).italic(),
        SpanStyle::Error => text.with(settings::COLOR_ERROR),
        SpanStyle::Faint => text.with(settings::COLOR_FAINT),
        SpanStyle::Code => text.with(settings::COLOR_CODE),
        SpanStyle::SearchPrompt => text.with(settings::COLOR_SEARCH_PROMPT).bold(),
        SpanStyle::SearchText => text.with(settings::COLOR_SEARCH_TEXT),
        SpanStyle::FunctionSuggestion => text.with(settings::COLOR_SUGGESTION_FUNCTION),
        SpanStyle::IdentifierSuggestion => text.with(settings::COLOR_SUGGESTION_IDENTIFIER),
        SpanStyle::PropertySuggestion => text.with(settings::COLOR_SUGGESTION_PROPERTY),
        SpanStyle::Selected => text
            .with(settings::COLOR_SUGGESTION_SELECTED)
            .on(settings::COLOR_SUGGESTION_SELECTED_BG)
            .bold(),
        SpanStyle::SelectedPrefix => text.with(settings::COLOR_SUGGESTION_MARKER),
        SpanStyle::Comment => text.with(settings::COLOR_SUGGESTION_COMMENT).italic(),
        SpanStyle::Debug => text.with(settings::COLOR_DEBUG),
    }
}

/// Render lines as plain text joined by `\n`, for non-interactive output.
pub fn plain_text(lines: &[StyledLine]) -> String {
    lines
        .iter()
        .map(StyledLine::text)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Raw mode lifetime guard so terminal state is restored on any return path.
pub struct RawModeGuard;

impl RawModeGuard {
    /// Enable terminal raw mode and return a guard that disables it on drop.
    pub fn acquire() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

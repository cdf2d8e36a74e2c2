// SPDX-License-Identifier: MIT
//
// Surface — clearing the screen and drawing the bordered page panel.
//
// The viewer draws one full-screen panel per page: a rounded border
// around the rendered rows, with two columns of inner padding on each
// side. Everything for one draw is accumulated into a single byte
// buffer and written with one flush, so a slow terminal never shows a
// half-painted frame.
//
// Size is queried fresh for every render — never cached across input
// events, because the terminal may have been resized between them.

use std::io::{self, Write};

use crate::ansi;
use crate::terminal::{self, Size};
use crate::text::{Line, Style};

/// Columns eaten by the panel: two border cells plus two columns of
/// padding on each side.
const H_OVERHEAD: u16 = 6;

/// Rows eaten around the content: top and bottom border, plus one row
/// reserved below the panel so the raw-mode cursor never corrupts the
/// last line.
const V_OVERHEAD: u16 = 3;

/// Narrowest inner width the panel will report, matching the floor the
/// layout algorithm is written against.
const MIN_INNER_WIDTH: usize = 10;

/// The content area available inside the panel at a terminal size.
///
/// Returns `(width, height)` in cells. Width never drops below
/// [`MIN_INNER_WIDTH`]; height bottoms out at zero.
#[must_use]
pub fn content_area(size: Size) -> (usize, usize) {
    let width = usize::from(size.cols.saturating_sub(H_OVERHEAD)).max(MIN_INNER_WIDTH);
    let height = usize::from(size.rows.saturating_sub(V_OVERHEAD));
    (width, height)
}

/// The render target: screen clear, size query, bordered panel draw.
#[derive(Debug, Default)]
pub struct Surface;

impl Surface {
    /// Create a surface over stdout.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// The current terminal size, queried fresh; 80×24 off-TTY.
    #[must_use]
    pub fn size(&self) -> Size {
        terminal::size().unwrap_or(Size::FALLBACK)
    }

    /// Clear the screen and home the cursor.
    ///
    /// # Errors
    ///
    /// Propagates stdout write failures.
    pub fn clear(&self) -> io::Result<()> {
        let mut buf = Vec::with_capacity(16);
        ansi::clear_screen(&mut buf)?;
        ansi::cursor_to(&mut buf, 0, 0)?;
        self.write_all(&buf)
    }

    /// Draw `rows` inside a full-width rounded border.
    ///
    /// Rows are padded (or cut) to the current inner width, so callers
    /// that already rendered to [`content_area`] pass through
    /// unchanged. The panel is drawn at the current cursor position —
    /// call [`clear`](Self::clear) first for a full-screen page.
    ///
    /// # Errors
    ///
    /// Propagates stdout write failures.
    pub fn draw_panel(&self, rows: &[Line], border: Style) -> io::Result<()> {
        let size = self.size();
        let (inner_width, _) = content_area(size);
        let mut buf = Vec::with_capacity(4096);

        let horizontal = "─".repeat(inner_width + 4);
        let top = Line::styled(format!("╭{horizontal}╮"), border);
        let bottom = Line::styled(format!("╰{horizontal}╯"), border);
        let edge = Line::styled("│", border);

        top.write_ansi(&mut buf)?;
        buf.extend_from_slice(b"\r\n");

        for row in rows {
            let mut body = if row.width() > inner_width {
                row.truncate_cells(inner_width)
            } else {
                row.clone()
            };
            body.pad_to(inner_width);

            edge.write_ansi(&mut buf)?;
            buf.extend_from_slice(b"  ");
            body.write_ansi(&mut buf)?;
            buf.extend_from_slice(b"  ");
            edge.write_ansi(&mut buf)?;
            buf.extend_from_slice(b"\r\n");
        }

        bottom.write_ansi(&mut buf)?;
        buf.extend_from_slice(b"\r\n");

        self.write_all(&buf)
    }

    /// Print a one-line styled message followed by a newline.
    ///
    /// Used for inline diagnostics (missing splash asset, empty deck)
    /// outside the panel path.
    ///
    /// # Errors
    ///
    /// Propagates stdout write failures.
    pub fn print_line(&self, line: &Line) -> io::Result<()> {
        let mut buf = Vec::with_capacity(128);
        line.write_ansi(&mut buf)?;
        buf.extend_from_slice(b"\r\n");
        self.write_all(&buf)
    }

    /// One write, one flush.
    fn write_all(&self, bytes: &[u8]) -> io::Result<()> {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        lock.write_all(bytes)?;
        lock.flush()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

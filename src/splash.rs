// SPDX-License-Identifier: MIT
//
// Splash — the title card shown once before the first page.
//
// The art ships embedded in the binary and is drawn through the same
// panel path as every page, centered both ways, with a dim footer
// inviting Enter. Arrow keys wiggle without effect here; only Enter
// (or the usual session-enders) moves on.

use std::io;

use primer_page::layout;
use primer_term::reader::{Event, KeyReader, ReaderOptions};
use primer_term::surface::{self, Surface};
use primer_term::terminal;
use primer_term::text::{Attr, Color, Line, Style};

const ART: &str = include_str!("splash.txt");

/// Show the splash and wait for Enter.
///
/// An unusable art asset degrades to an inline message and continues
/// straight to navigation — the splash is decoration, never a wall.
///
/// # Errors
///
/// Propagates terminal I/O failures.
pub fn show(surface: &Surface) -> io::Result<()> {
    let art = art_rows(ART);
    if art.is_empty() {
        let msg = Line::styled("Splash screen unavailable.", Style::fg(Color::Red));
        return surface.print_line(&msg);
    }

    let rows = with_footer(art, terminal::is_tty());
    draw(surface, &rows)?;

    let opts = ReaderOptions {
        stop_on_enter: true,
        poll_resize: true,
    };
    let Some(mut reader) = KeyReader::open(opts)? else {
        return Ok(());
    };

    loop {
        match reader.next()? {
            Event::End => return Ok(()),
            Event::Resize => draw(surface, &rows)?,
            Event::Key(_) => {}
        }
    }
}

fn draw(surface: &Surface, rows: &[Line]) -> io::Result<()> {
    surface.clear()?;
    let (width, height) = surface::content_area(surface.size());
    let centered = layout::center_block(rows.to_vec(), width, height);
    surface.draw_panel(&centered, Style::fg(Color::BrightBlack))
}

/// The art as bold rows, stripped of blank edges.
fn art_rows(art: &str) -> Vec<Line> {
    let lines: Vec<&str> = art.lines().map(str::trim_end).collect();
    let start = lines
        .iter()
        .position(|l| !l.is_empty())
        .unwrap_or(lines.len());
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(start, |p| p + 1);

    lines[start..end]
        .iter()
        .map(|l| Line::styled(*l, Style::attrs(Attr::BOLD)))
        .collect()
}

/// Append the interactive footer below the art.
fn with_footer(mut rows: Vec<Line>, interactive: bool) -> Vec<Line> {
    if interactive {
        rows.push(Line::new());
        rows.push(Line::styled(
            "Press Enter to continue...",
            Style::attrs(Attr::DIM),
        ));
    }
    rows
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn embedded_art_is_usable() {
        let rows = art_rows(ART);
        assert!(!rows.is_empty());
        assert!(rows.iter().all(|r| r.spans().len() <= 1));
    }

    #[test]
    fn art_rows_are_bold() {
        let rows = art_rows("hello");
        assert!(rows[0].spans()[0].style.attrs.contains(Attr::BOLD));
    }

    #[test]
    fn blank_edges_are_stripped() {
        let rows = art_rows("\n\nart\n\n");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].plain(), "art");
    }

    #[test]
    fn whitespace_only_art_is_empty() {
        assert!(art_rows("  \n\t\n").is_empty());
    }

    #[test]
    fn footer_only_when_interactive() {
        let base = art_rows("x");
        let interactive = with_footer(base.clone(), true);
        let piped = with_footer(base.clone(), false);
        assert_eq!(piped.len(), base.len());
        assert_eq!(interactive.len(), base.len() + 2);
        let footer = interactive.last().map(Line::plain).unwrap_or_default();
        assert!(footer.contains("Enter"));
    }
}

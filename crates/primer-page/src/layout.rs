// SPDX-License-Identifier: MIT
//
// Layout — horizontal and vertical centering in a cell budget.
//
// The one algorithm every page variant shares. Horizontal centering
// splits padding floor-left, remainder-right; vertical centering does
// the same with blank rows. Content that does not fit is truncated —
// rows are cut to the width, blocks are cut to the first `height`
// rows. There is no scrolling in a slideshow; a page either fits or
// loses its tail.
//
// All functions are pure and total for every non-negative input,
// including zero-sized viewports.

use primer_term::text::Line;

/// Center one row within `width` display cells.
///
/// Over-wide rows are truncated to fit (lossy: style is dropped on a
/// truncated row). Otherwise the row is padded with spaces, the left
/// share being `floor((width - content) / 2)`. The result is always
/// exactly `width` cells wide.
#[must_use]
pub fn center_line(row: &Line, width: usize) -> Line {
    let content_width = row.width();
    if content_width > width {
        let mut cut = row.truncate_cells(width);
        // A dropped wide glyph can leave the cut a cell short.
        cut.pad_to(width);
        return cut;
    }

    let pad_total = width - content_width;
    let left = pad_total / 2;

    let mut centered = Line::from_plain(" ".repeat(left));
    centered.append(row.clone());
    centered.pad_to(width);
    centered
}

/// Vertically center rows within `height`, then center each row
/// within `width`.
///
/// Exactly `height` rows come back: a short block gains
/// `floor(deficit / 2)` blank rows on top and the remainder below; a
/// tall block keeps only its first `height` rows.
#[must_use]
pub fn center_block(rows: Vec<Line>, width: usize, height: usize) -> Vec<Line> {
    vcenter(rows, height)
        .iter()
        .map(|row| center_line(row, width))
        .collect()
}

/// Vertically center rows within `height`, keeping each row
/// left-aligned but padded (or cut) to `width`.
///
/// Used for document pages, whose renderer already placed text within
/// the width; only the block as a whole is centered.
#[must_use]
pub fn vcenter_block(rows: Vec<Line>, width: usize, height: usize) -> Vec<Line> {
    vcenter(rows, height)
        .into_iter()
        .map(|row| {
            let mut row = if row.width() > width {
                row.truncate_cells(width)
            } else {
                row
            };
            row.pad_to(width);
            row
        })
        .collect()
}

/// Distribute vertical deficit as blank rows, or truncate overflow.
fn vcenter(mut rows: Vec<Line>, height: usize) -> Vec<Line> {
    if rows.len() > height {
        rows.truncate(height);
        return rows;
    }

    let deficit = height - rows.len();
    let top = deficit / 2;
    let bottom = deficit - top;

    let mut out = Vec::with_capacity(height);
    out.extend((0..top).map(|_| Line::new()));
    out.append(&mut rows);
    out.extend((0..bottom).map(|_| Line::new()));
    out
}

// ─── Tests ───────────────────────────────────────────────────────────────────

// SPDX-License-Identifier: MIT
//
// Page — the three slide layouts behind one render capability.
//
// A deck is a sequence of pages; each page turns a viewport size into
// exactly `height` rows of exactly `width` cells. The navigation loop
// never knows which variant it is holding — it asks for rows and
// draws them. Rendering is pure, so a resize simply renders the same
// page again at the new size.

use primer_term::text::{Attr, Line, Style, Color};

use crate::document;
use crate::layout;
use crate::markup;

/// Style for code blocks on composite pages.
const CODE_STYLE: Style = Style {
    fg: Color::Default,
    attrs: Attr::DIM,
};

/// Border style for the prompt mini-panel.
const PROMPT_BORDER: Style = Style {
    fg: Color::Cyan,
    attrs: Attr::empty(),
};

/// One content block of a composite page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Verbatim code: raw lines, dimmed, never wrapped.
    Code { source: String },
    /// A one-line instruction in a small titled box.
    Prompt { text: String },
    /// Markup-styled lines, one row each.
    Lines(Vec<String>),
}

impl Block {
    /// Render this block into rows at most `width` cells wide.
    #[must_use]
    pub fn render(&self, width: usize) -> Vec<Line> {
        match self {
            Self::Code { source } => source
                .split('\n')
                .map(|raw| Line::styled(raw, CODE_STYLE))
                .collect(),
            Self::Prompt { text } => prompt_box(text, width),
            Self::Lines(lines) => lines.iter().map(|l| markup::parse(l)).collect(),
        }
    }
}

/// The prompt mini-panel: a rounded cyan box with a titled top edge.
fn prompt_box(text: &str, width: usize) -> Vec<Line> {
    let body = markup::parse(text);
    // Inner width fits the text but never exceeds the viewport.
    let inner = body
        .width()
        .max("Prompt".len())
        .min(width.saturating_sub(4).max(1));

    let body = {
        let mut row = if body.width() > inner {
            body.truncate_cells(inner)
        } else {
            body
        };
        row.pad_to(inner);
        row
    };

    let title = " Prompt ";
    let dashes_after = (inner + 2).saturating_sub(title.len() + 1);
    let mut top = Line::styled(
        format!("╭─{title}{}╮", "─".repeat(dashes_after)),
        PROMPT_BORDER,
    );
    if top.width() > width {
        // Viewport too narrow for the title: fall back to a plain edge.
        top = Line::styled(format!("╭{}╮", "─".repeat(inner + 2)), PROMPT_BORDER);
    }
    let bottom = Line::styled(format!("╰{}╯", "─".repeat(inner + 2)), PROMPT_BORDER);
    let edge = Line::styled("│", PROMPT_BORDER);

    let mut middle = edge.clone();
    middle.push(" ", Style::PLAIN);
    middle.append(body);
    middle.push(" ", Style::PLAIN);
    middle.append(edge);

    vec![top, middle, bottom]
}

/// One slide of a deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    /// Standalone markup lines, centered both ways.
    Lines(Vec<String>),
    /// Markdown-style prose, wrapped at the width, block-centered.
    Document { source: String },
    /// A stack of blocks, optionally block-centered.
    Composite { blocks: Vec<Block>, center: bool },
}

impl Page {
    /// Render this page into exactly `height` rows of `width` cells.
    #[must_use]
    pub fn render(&self, width: usize, height: usize) -> Vec<Line> {
        match self {
            Self::Lines(lines) => {
                let rows = lines.iter().map(|l| markup::parse(l)).collect();
                layout::center_block(rows, width, height)
            }
            Self::Document { source } => {
                layout::vcenter_block(document::render(source, width), width, height)
            }
            Self::Composite { blocks, center } => {
                let mut rows = Vec::new();
                for (idx, block) in blocks.iter().enumerate() {
                    if idx > 0 {
                        rows.push(Line::new());
                    }
                    rows.extend(block.render(width));
                }
                if *center {
                    layout::vcenter_block(rows, width, height)
                } else {
                    top_align(rows, width, height)
                }
            }
        }
    }
}

/// Cut or pad rows to `height`, each row cut or padded to `width`.
fn top_align(mut rows: Vec<Line>, width: usize, height: usize) -> Vec<Line> {
    rows.truncate(height);
    while rows.len() < height {
        rows.push(Line::new());
    }
    rows.into_iter()
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

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn exact_grid(rows: &[Line], width: usize, height: usize) {
        assert_eq!(rows.len(), height);
        for row in rows {
            assert_eq!(row.width(), width);
        }
    }

    #[test]
    fn lines_page_centers_both_ways() {
        let page = Page::Lines(vec!["ab".into()]);
        let rows = page.render(6, 3);
        exact_grid(&rows, 6, 3);
        assert_eq!(rows[1].plain(), "  ab  ");
        assert_eq!(rows[0].plain(), "      ");
    }

    #[test]
    fn lines_page_parses_markup() {
        let page = Page::Lines(vec!["[bold]T[/bold]".into()]);
        let rows = page.render(3, 1);
        let span = rows[0]
            .spans()
            .iter()
            .find(|s| s.text == "T")
            .expect("content span");
        assert!(span.style.attrs.contains(Attr::BOLD));
    }

    #[test]
    fn document_page_is_left_aligned_and_vcentered() {
        let page = Page::Document { source: "hi".into() };
        let rows = page.render(6, 3);
        exact_grid(&rows, 6, 3);
        assert_eq!(rows[1].plain(), "hi    ");
    }

    #[test]
    fn document_page_rewraps_with_width() {
        let page = Page::Document {
            source: "words that wrap at different widths".into(),
        };
        assert_ne!(page.render(30, 10), page.render(12, 10));
    }

    #[test]
    fn composite_page_stacks_blocks_with_separator() {
        let page = Page::Composite {
            blocks: vec![
                Block::Lines(vec!["a".into()]),
                Block::Lines(vec!["b".into()]),
            ],
            center: false,
        };
        let rows = page.render(4, 5);
        exact_grid(&rows, 4, 5);
        assert_eq!(rows[0].plain(), "a   ");
        assert_eq!(rows[1].plain(), "    ");
        assert_eq!(rows[2].plain(), "b   ");
    }

    #[test]
    fn composite_page_centering_toggle() {
        let blocks = vec![Block::Lines(vec!["x".into()])];
        let top = Page::Composite {
            blocks: blocks.clone(),
            center: false,
        }
        .render(3, 5);
        let centered = Page::Composite {
            blocks,
            center: true,
        }
        .render(3, 5);
        assert_eq!(top[0].plain(), "x  ");
        assert_eq!(centered[0].plain(), "   ");
        assert_eq!(centered[2].plain(), "x  ");
    }

    #[test]
    fn code_block_lines_are_dim_and_raw() {
        let block = Block::Code {
            source: "let x = [1];\nprint(x)".into(),
        };
        let rows = block.render(40);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].plain(), "let x = [1];");
        assert!(rows[0].spans()[0].style.attrs.contains(Attr::DIM));
    }

    #[test]
    fn prompt_block_has_titled_border() {
        let block = Block::Prompt {
            text: "type q to quit".into(),
        };
        let rows = block.render(40);
        assert_eq!(rows.len(), 3);
        assert!(rows[0].plain().contains("Prompt"));
        assert!(rows[1].plain().contains("type q to quit"));
        assert_eq!(rows[0].spans()[0].style.fg, Color::Cyan);
        // Box edges line up.
        assert_eq!(rows[0].width(), rows[2].width());
        assert_eq!(rows[1].width(), rows[2].width());
    }

    #[test]
    fn prompt_block_truncates_in_narrow_viewport() {
        let block = Block::Prompt {
            text: "a rather long prompt line".into(),
        };
        let rows = block.render(12);
        assert!(rows.iter().all(|r| r.width() <= 12));
    }

    #[test]
    fn page_render_exact_grid_for_all_variants() {
        let pages = [
            Page::Lines(vec!["one".into(), "two".into()]),
            Page::Document {
                source: "# H\n\nbody text".into(),
            },
            Page::Composite {
                blocks: vec![
                    Block::Prompt { text: "go".into() },
                    Block::Code { source: "x".into() },
                ],
                center: true,
            },
        ];
        for page in &pages {
            for (w, h) in [(74, 21), (20, 5), (10, 1)] {
                exact_grid(&page.render(w, h), w, h);
            }
        }
    }

    #[test]
    fn render_is_pure() {
        let page = Page::Document {
            source: "same input,same rows".into(),
        };
        assert_eq!(page.render(30, 8), page.render(30, 8));
    }
}

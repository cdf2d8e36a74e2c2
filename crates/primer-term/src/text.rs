// SPDX-License-Identifier: MIT
//
// Styled text — the unit a page renders into.
//
// A `Line` is a sequence of styled spans making up one visual row.
// Widths are measured in display cells, not chars: CJK glyphs and
// most emoji occupy two cells, zero-width combining marks occupy
// none. Centering math that counted chars instead would drift one
// cell per wide glyph, which is exactly the kind of off-by-one that
// only shows up in someone else's terminal.
//
// Truncation is grapheme-aware (a wide glyph or combining cluster is
// never split) but lossy with respect to style: a truncated row keeps
// its plain text only. Rows that overflow the viewport are already a
// degraded case; preserving split styling across the cut is not worth
// the bookkeeping.

use std::io::{self, Write};

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::ansi;

// ─── Attributes ──────────────────────────────────────────────────────────────

bitflags::bitflags! {
    /// Text attributes stored as a compact bitfield.
    ///
    /// These map directly to SGR (Select Graphic Rendition) parameters
    /// in the ANSI escape sequence standard. Combine with bitwise OR:
    ///
    /// ```
    /// use primer_term::text::Attr;
    ///
    /// let style = Attr::BOLD | Attr::UNDERLINE;
    /// assert!(style.contains(Attr::BOLD));
    /// assert!(!style.contains(Attr::DIM));
    /// ```
    #[derive(Default)]
    pub struct Attr: u8 {
        /// SGR 1 — increased intensity.
        const BOLD      = 1 << 0;
        /// SGR 2 — decreased intensity (faint).
        const DIM       = 1 << 1;
        /// SGR 3 — italic or oblique.
        const ITALIC    = 1 << 2;
        /// SGR 4 — underline.
        const UNDERLINE = 1 << 3;
        /// SGR 5 — slow blink.
        const BLINK     = 1 << 4;
        /// SGR 7 — swap foreground and background.
        const REVERSE   = 1 << 5;
        /// SGR 9 — crossed-out text.
        const STRIKE    = 1 << 6;
    }
}

impl Attr {
    /// Look up an attribute by its markup name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "bold" => Some(Self::BOLD),
            "dim" => Some(Self::DIM),
            "italic" => Some(Self::ITALIC),
            "underline" => Some(Self::UNDERLINE),
            "blink" => Some(Self::BLINK),
            "reverse" => Some(Self::REVERSE),
            "strike" => Some(Self::STRIKE),
            _ => None,
        }
    }
}

// ─── Color ───────────────────────────────────────────────────────────────────

/// The sixteen named ANSI foreground colors plus the terminal default.
///
/// The viewer never needs truecolor: content styling is authored with
/// named colors in markup tags, and named colors respect the user's
/// terminal palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Color {
    /// The terminal's configured default foreground.
    #[default]
    Default,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
}

impl Color {
    /// The SGR foreground code for this color.
    #[must_use]
    pub const fn sgr_fg(self) -> u8 {
        match self {
            Self::Default => 39,
            Self::Black => 30,
            Self::Red => 31,
            Self::Green => 32,
            Self::Yellow => 33,
            Self::Blue => 34,
            Self::Magenta => 35,
            Self::Cyan => 36,
            Self::White => 37,
            Self::BrightBlack => 90,
            Self::BrightRed => 91,
            Self::BrightGreen => 92,
            Self::BrightYellow => 93,
            Self::BrightBlue => 94,
            Self::BrightMagenta => 95,
            Self::BrightCyan => 96,
            Self::BrightWhite => 97,
        }
    }

    /// Look up a color by its markup name (`"red"`, `"bright_cyan"`, …).
    ///
    /// `"grey"`/`"gray"` alias to bright black, matching common
    /// markup usage in content files.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "black" => Some(Self::Black),
            "red" => Some(Self::Red),
            "green" => Some(Self::Green),
            "yellow" => Some(Self::Yellow),
            "blue" => Some(Self::Blue),
            "magenta" => Some(Self::Magenta),
            "cyan" => Some(Self::Cyan),
            "white" => Some(Self::White),
            "grey" | "gray" | "bright_black" => Some(Self::BrightBlack),
            "bright_red" => Some(Self::BrightRed),
            "bright_green" => Some(Self::BrightGreen),
            "bright_yellow" => Some(Self::BrightYellow),
            "bright_blue" => Some(Self::BrightBlue),
            "bright_magenta" => Some(Self::BrightMagenta),
            "bright_cyan" => Some(Self::BrightCyan),
            "bright_white" => Some(Self::BrightWhite),
            _ => None,
        }
    }
}

// ─── Style ───────────────────────────────────────────────────────────────────

/// A foreground color plus attribute flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Style {
    /// Foreground color.
    pub fg: Color,
    /// Attribute flags.
    pub attrs: Attr,
}

impl Style {
    /// No color, no attributes.
    pub const PLAIN: Self = Self {
        fg: Color::Default,
        attrs: Attr::empty(),
    };

    /// A style with only a foreground color.
    #[must_use]
    pub const fn fg(color: Color) -> Self {
        Self {
            fg: color,
            attrs: Attr::empty(),
        }
    }

    /// A style with only attribute flags.
    #[must_use]
    pub const fn attrs(attrs: Attr) -> Self {
        Self {
            fg: Color::Default,
            attrs,
        }
    }

    /// Whether this style changes nothing about the output.
    #[must_use]
    pub fn is_plain(self) -> bool {
        self.fg == Color::Default && self.attrs.is_empty()
    }

    /// Layer `over` on top of this style.
    ///
    /// The inner style's color wins when it sets one; attribute flags
    /// are unioned. Used for nested markup tags.
    #[must_use]
    pub fn merge(self, over: Self) -> Self {
        Self {
            fg: if over.fg == Color::Default {
                self.fg
            } else {
                over.fg
            },
            attrs: self.attrs | over.attrs,
        }
    }
}

// ─── Span / Line ─────────────────────────────────────────────────────────────

/// A run of text with one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// The text content (no escape bytes).
    pub text: String,
    /// The style applied to the whole run.
    pub style: Style,
}

/// One visual row: an ordered sequence of styled spans.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Line {
    spans: Vec<Span>,
}

impl Line {
    /// An empty line.
    #[must_use]
    pub const fn new() -> Self {
        Self { spans: Vec::new() }
    }

    /// A line holding unstyled text.
    #[must_use]
    pub fn from_plain(text: impl Into<String>) -> Self {
        let mut line = Self::new();
        line.push(&text.into(), Style::PLAIN);
        line
    }

    /// A line holding one styled run.
    #[must_use]
    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        let mut line = Self::new();
        line.push(&text.into(), style);
        line
    }

    /// The spans making up this line.
    #[must_use]
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Append a styled run, merging into the previous span when the
    /// style matches (keeps span counts small under markup parsing).
    pub fn push(&mut self, text: &str, style: Style) {
        if text.is_empty() {
            return;
        }
        if let Some(last) = self.spans.last_mut() {
            if last.style == style {
                last.text.push_str(text);
                return;
            }
        }
        self.spans.push(Span {
            text: text.to_owned(),
            style,
        });
    }

    /// Append all spans of another line.
    pub fn append(&mut self, other: Self) {
        for span in other.spans {
            self.push(&span.text, span.style);
        }
    }

    /// Display-cell width of the whole line.
    ///
    /// Wide glyphs count as 2 cells, zero-width combining marks as 0.
    #[must_use]
    pub fn width(&self) -> usize {
        self.spans
            .iter()
            .map(|span| UnicodeWidthStr::width(span.text.as_str()))
            .sum()
    }

    /// The plain text with all styling dropped.
    #[must_use]
    pub fn plain(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }

    /// Whether the line holds no text at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spans.iter().all(|span| span.text.is_empty())
    }

    /// A copy cut down to at most `max_cells` display cells.
    ///
    /// Grapheme clusters are never split; a wide glyph that would
    /// straddle the limit is dropped entirely. The result is plain —
    /// style is not preserved across truncation.
    #[must_use]
    pub fn truncate_cells(&self, max_cells: usize) -> Self {
        let plain = self.plain();
        let mut used = 0;
        let mut end = 0;
        for (offset, grapheme) in plain.grapheme_indices(true) {
            let w = UnicodeWidthStr::width(grapheme);
            if used + w > max_cells {
                break;
            }
            used += w;
            end = offset + grapheme.len();
        }
        Self::from_plain(&plain[..end])
    }

    /// Pad with trailing spaces up to `width` display cells.
    ///
    /// Lines already at or beyond `width` are left untouched.
    pub fn pad_to(&mut self, width: usize) {
        let current = self.width();
        if current < width {
            self.push(&" ".repeat(width - current), Style::PLAIN);
        }
    }

    /// Write the line as ANSI-styled bytes (no trailing newline).
    ///
    /// Each styled run is bracketed with its SGR codes and a reset so
    /// styles never leak between spans or rows.
    pub fn write_ansi(&self, w: &mut impl Write) -> io::Result<()> {
        for span in &self.spans {
            if span.style.is_plain() {
                w.write_all(span.text.as_bytes())?;
            } else {
                ansi::fg(w, span.style.fg)?;
                ansi::style(w, span.style.attrs)?;
                w.write_all(span.text.as_bytes())?;
                ansi::reset(w)?;
            }
        }
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

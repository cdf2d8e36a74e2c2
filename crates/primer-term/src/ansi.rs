// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Pure functions that write escape sequences to any `impl Write`. No
// state, no decisions about when to emit — callers batch these into an
// output buffer and flush once. This module just knows the byte-level
// encoding of every terminal command the viewer needs.
//
// All functions return `io::Result` propagated from the underlying
// writer. In practice they never fail when writing to a `Vec`-backed
// buffer.

use std::io::{self, Write};

use crate::text::{Attr, Color};

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Move the cursor to `(x, y)` using the CUP (Cursor Position) sequence.
///
/// Our coordinates are 0-indexed; ANSI CUP is 1-indexed.
#[inline]
pub fn cursor_to(w: &mut impl Write, x: u16, y: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", y + 1, x + 1)
}

/// Hide the cursor (DECTCEM reset).
#[inline]
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

/// Show the cursor (DECTCEM set).
#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

// ─── Screen ──────────────────────────────────────────────────────────────────

/// Clear the entire screen (ED 2).
#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[2J")
}

/// Reset all SGR attributes to terminal defaults (SGR 0).
#[inline]
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[0m")
}

// ─── Foreground Color ────────────────────────────────────────────────────────

/// Set the foreground (text) color.
///
/// The sixteen named colors use the compact SGR codes (30–37, 90–97);
/// [`Color::Default`] emits SGR 39.
pub fn fg(w: &mut impl Write, color: Color) -> io::Result<()> {
    write!(w, "\x1b[{}m", color.sgr_fg())
}

// ─── Attributes ──────────────────────────────────────────────────────────────

/// Emit SGR codes for every set attribute flag.
///
/// Emits nothing for an empty flag set. Does not reset previously
/// active attributes — callers bracket styled runs with [`reset`].
pub fn style(w: &mut impl Write, attrs: Attr) -> io::Result<()> {
    const CODES: [(Attr, u8); 7] = [
        (Attr::BOLD, 1),
        (Attr::DIM, 2),
        (Attr::ITALIC, 3),
        (Attr::UNDERLINE, 4),
        (Attr::BLINK, 5),
        (Attr::REVERSE, 7),
        (Attr::STRIKE, 9),
    ];

    for (flag, code) in CODES {
        if attrs.contains(flag) {
            write!(w, "\x1b[{code}m")?;
        }
    }
    Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────────────

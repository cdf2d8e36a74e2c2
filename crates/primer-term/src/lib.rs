// SPDX-License-Identifier: MIT
//
// primer-term — Terminal layer for the primer slideshow viewer.
//
// Raw-mode input with escape-sequence tokenizing, a styled-text
// primitive measured in display cells, and a bordered panel surface.
// The whole layer talks to the terminal directly through ANSI escape
// sequences and termios — no TUI framework in between. A slideshow
// draws one full page at a time, so the layer stays deliberately
// small: clear, draw a panel, read a token, restore the terminal on
// every exit path.

pub mod ansi;
pub mod reader;
pub mod surface;
pub mod terminal;
pub mod text;

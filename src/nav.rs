// SPDX-License-Identifier: MIT
//
// Navigation — the page-position state machine and the session loop.
//
// `Nav` is a pure transition function over key tokens, so the whole
// keyboard behavior of the viewer is testable without a terminal. The
// loop around it owns the side effects: clearing, rendering, drawing,
// and pulling events from the reader.

use std::io;
use std::panic::{self, AssertUnwindSafe};

use primer_page::deck::Deck;
use primer_page::layout;
use primer_page::page::Page;
use primer_term::reader::{Event, KeyReader, ReaderOptions, Token};
use primer_term::surface::{self, Surface};
use primer_term::text::{Color, Line, Style};

/// Panel border for every page.
const BORDER: Style = Style {
    fg: Color::BrightBlack,
    attrs: primer_term::text::Attr::empty(),
};

/// What a key token did to the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Position unchanged, nothing to draw.
    Stay,
    /// Position changed; the caller re-renders.
    Redraw,
    /// The session is over.
    Quit,
}

/// Current position within a non-empty deck.
///
/// Invariant: `current < total`, with `total >= 1`.
#[derive(Debug, Clone, Copy)]
pub struct Nav {
    current: usize,
    total: usize,
}

impl Nav {
    /// Start at the first page of `total` pages.
    #[must_use]
    pub const fn new(total: usize) -> Self {
        Self { current: 0, total }
    }

    #[must_use]
    pub const fn current(&self) -> usize {
        self.current
    }

    /// Apply one key token.
    ///
    /// `q`/`Q` quit; Left steps back (pinned at the first page);
    /// Right and Enter step forward, and past the last page they end
    /// the show. Every other token is ignored.
    pub fn apply(&mut self, token: &Token) -> Step {
        match token {
            Token::Char('q' | 'Q') => Step::Quit,
            Token::Left => {
                if self.current == 0 {
                    Step::Stay
                } else {
                    self.current -= 1;
                    Step::Redraw
                }
            }
            Token::Right | Token::Enter => {
                if self.current + 1 >= self.total {
                    Step::Quit
                } else {
                    self.current += 1;
                    Step::Redraw
                }
            }
            _ => Step::Stay,
        }
    }
}

/// Present the deck until the viewer quits or input ends.
///
/// An empty deck prints a visible message and returns without ever
/// touching raw mode. Resize events re-render the current page at the
/// new size; the position never moves on a resize.
///
/// # Errors
///
/// Propagates terminal I/O failures.
pub fn run(deck: &Deck, surface: &Surface) -> io::Result<()> {
    if deck.is_empty() {
        let msg = Line::styled("No content pages found.", Style::fg(Color::Red));
        return surface.print_line(&msg);
    }

    let mut nav = Nav::new(deck.len());
    draw(deck, nav.current(), surface)?;

    let opts = ReaderOptions {
        stop_on_enter: false,
        poll_resize: true,
    };
    let Some(mut reader) = KeyReader::open(opts)? else {
        // Not a terminal: the first page was drawn, nothing to wait on.
        return Ok(());
    };

    loop {
        match reader.next()? {
            Event::End => return Ok(()),
            Event::Resize => draw(deck, nav.current(), surface)?,
            Event::Key(token) => match nav.apply(&token) {
                Step::Quit => return Ok(()),
                Step::Redraw => draw(deck, nav.current(), surface)?,
                Step::Stay => {}
            },
        }
    }
}

/// Render one page at the fresh terminal size and draw the panel.
fn draw(deck: &Deck, index: usize, surface: &Surface) -> io::Result<()> {
    surface.clear()?;
    let (width, height) = surface::content_area(surface.size());
    let rows = deck
        .get(index)
        .map_or_else(Vec::new, |page| render_guarded(page, width, height));
    surface.draw_panel(&rows, BORDER)
}

/// Render a page, substituting a visible error block if it panics.
///
/// Page rendering is pure and total, but content comes from outside;
/// a fault in one page must not take the terminal down with it.
fn render_guarded(page: &Page, width: usize, height: usize) -> Vec<Line> {
    panic::catch_unwind(AssertUnwindSafe(|| page.render(width, height))).unwrap_or_else(|_| {
        let msg = Line::styled("This page failed to render.", Style::fg(Color::Red));
        layout::center_block(vec![msg], width, height)
    })
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn starts_at_first_page() {
        assert_eq!(Nav::new(3).current(), 0);
    }

    #[test]
    fn quit_keys_quit_from_anywhere() {
        let mut nav = Nav::new(3);
        assert_eq!(nav.apply(&Token::Char('q')), Step::Quit);
        assert_eq!(nav.apply(&Token::Char('Q')), Step::Quit);
        nav.apply(&Token::Right);
        assert_eq!(nav.apply(&Token::Char('q')), Step::Quit);
    }

    #[test]
    fn left_at_first_page_stays() {
        let mut nav = Nav::new(3);
        assert_eq!(nav.apply(&Token::Left), Step::Stay);
        assert_eq!(nav.current(), 0);
    }

    #[test]
    fn left_steps_back() {
        let mut nav = Nav::new(3);
        nav.apply(&Token::Right);
        nav.apply(&Token::Right);
        assert_eq!(nav.apply(&Token::Left), Step::Redraw);
        assert_eq!(nav.current(), 1);
    }

    #[test]
    fn right_steps_forward() {
        let mut nav = Nav::new(3);
        assert_eq!(nav.apply(&Token::Right), Step::Redraw);
        assert_eq!(nav.current(), 1);
    }

    #[test]
    fn enter_advances_like_right() {
        let mut nav = Nav::new(3);
        assert_eq!(nav.apply(&Token::Enter), Step::Redraw);
        assert_eq!(nav.current(), 1);
    }

    #[test]
    fn advancing_past_last_page_quits() {
        let mut nav = Nav::new(2);
        nav.apply(&Token::Right);
        assert_eq!(nav.apply(&Token::Right), Step::Quit);
        assert_eq!(nav.apply(&Token::Enter), Step::Quit);
    }

    #[test]
    fn single_page_deck_quits_on_advance() {
        let mut nav = Nav::new(1);
        assert_eq!(nav.apply(&Token::Right), Step::Quit);
        assert_eq!(nav.current(), 0);
    }

    #[test]
    fn unhandled_tokens_stay() {
        let mut nav = Nav::new(3);
        for token in [
            Token::Char('x'),
            Token::Up,
            Token::Down,
            Token::Other,
        ] {
            assert_eq!(nav.apply(&token), Step::Stay, "{token:?}");
            assert_eq!(nav.current(), 0);
        }
    }

    #[test]
    fn position_stays_in_bounds_under_any_sequence() {
        let tokens = [
            Token::Right,
            Token::Right,
            Token::Left,
            Token::Enter,
            Token::Other,
            Token::Right,
            Token::Left,
            Token::Left,
            Token::Left,
        ];
        let total = 3;
        let mut nav = Nav::new(total);
        for token in &tokens {
            if nav.apply(token) == Step::Quit {
                break;
            }
            assert!(nav.current() < total);
        }
    }

    #[test]
    fn empty_deck_ends_cleanly_without_raw_mode() {
        let deck = Deck::new();
        let surface = Surface::new();
        assert!(run(&deck, &surface).is_ok());
    }

    // Three pages, the walkthrough a viewer actually does: forward to
    // the end, one step back, then off the end.
    #[test]
    fn three_page_walkthrough() {
        let mut nav = Nav::new(3);
        assert_eq!(nav.apply(&Token::Right), Step::Redraw);
        assert_eq!(nav.apply(&Token::Right), Step::Redraw);
        assert_eq!(nav.current(), 2);
        assert_eq!(nav.apply(&Token::Left), Step::Redraw);
        assert_eq!(nav.current(), 1);
        assert_eq!(nav.apply(&Token::Right), Step::Redraw);
        assert_eq!(nav.apply(&Token::Right), Step::Quit);
    }
}

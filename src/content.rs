// SPDX-License-Identifier: MIT
//
// Content provider — where the deck comes from.
//
// With no arguments the viewer presents its embedded tour: a title
// card, document pages split from a bundled markdown file, and one
// composite page mixing a code block with a prompt box. Given a path,
// it loads that markdown instead; a `splash:` line at the very top of
// the file opts the deck into the splash screen.

use std::fs;
use std::io;

use primer_page::deck::{self, Deck};
use primer_page::page::{Block, Page};

const COURSE: &str = include_str!("course.md");

/// The embedded demonstration deck.
#[must_use]
pub fn demo_deck() -> Deck {
    let mut deck = Deck::new();
    deck.push(title_page());
    for source in deck::split_pages(COURSE) {
        deck.push(Page::Document { source });
    }
    deck.push(finale_page());
    deck
}

/// Load a deck from a markdown file.
///
/// # Errors
///
/// Returns the underlying error when the file cannot be read.
pub fn load_file(path: &str) -> io::Result<Deck> {
    Ok(deck_from_source(&fs::read_to_string(path)?))
}

/// Build a deck from raw markdown, honoring the `splash:` front line.
fn deck_from_source(source: &str) -> Deck {
    let (body, show_splash) = match source.split_once('\n') {
        Some((first, rest)) if first.trim() == "splash:" => (rest, true),
        _ if source.trim() == "splash:" => ("", true),
        _ => (source, false),
    };

    let mut deck = Deck::from_markdown(body);
    deck.show_splash = show_splash;
    deck
}

fn title_page() -> Page {
    Page::Lines(vec![
        "[bold yellow]primer[/bold yellow]".to_owned(),
        String::new(),
        "a tiny slideshow for the terminal".to_owned(),
        String::new(),
        "[dim]arrows to move, q to quit[/dim]".to_owned(),
    ])
}

fn finale_page() -> Page {
    Page::Composite {
        blocks: vec![
            Block::Lines(vec![
                "[bold]Composite pages[/bold]".to_owned(),
                String::new(),
                "stack styled lines, code, and prompts:".to_owned(),
            ]),
            Block::Code {
                source: "let deck = Deck::from_markdown(source);\nnav::run(&deck, &surface)?;".to_owned(),
            },
            Block::Prompt {
                text: "press Enter or q to finish".to_owned(),
            },
        ],
        center: true,
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

// SPDX-License-Identifier: MIT
//
// primer — an interactive slideshow viewer for the terminal.
//
// Wiring of the two crates:
//
//   primer-term → raw mode, key tokens, the bordered panel surface
//   primer-page → markup, layout, the Page variants, the deck
//
// A session is a straight line: build the deck (embedded tour or a
// markdown file from the argument), hide the cursor, splash if the
// deck asks for one, then hand the deck to the navigation loop. Every
// exit path shows the cursor again; raw-mode restore rides on RAII
// inside the key reader, and a panic hook covers the rest.

use std::env;
use std::io::{self, Write};
use std::process::ExitCode;

mod content;
mod nav;
mod splash;

use primer_page::deck::Deck;
use primer_term::surface::Surface;
use primer_term::{ansi, terminal};

fn main() -> ExitCode {
    terminal::install_panic_hook();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("primer: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> io::Result<()> {
    let deck = match env::args().nth(1) {
        Some(path) => content::load_file(&path)?,
        None => content::demo_deck(),
    };

    let interactive = terminal::stdout_is_tty();
    if interactive {
        set_cursor_visible(false)?;
    }

    let result = session(&deck);

    if interactive {
        // Best effort: never mask the session's own outcome.
        let _ = set_cursor_visible(true);
    }
    result
}

fn session(deck: &Deck) -> io::Result<()> {
    let surface = Surface::new();
    surface.clear()?;

    if deck.show_splash {
        splash::show(&surface)?;
    }
    nav::run(deck, &surface)
}

fn set_cursor_visible(visible: bool) -> io::Result<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    if visible {
        ansi::cursor_show(&mut lock)?;
    } else {
        ansi::cursor_hide(&mut lock)?;
    }
    lock.flush()
}

// SPDX-License-Identifier: MIT
//
// Deck — an ordered sequence of pages.

use crate::page::Page;

/// The slideshow: pages in presentation order.
#[derive(Debug, Clone, Default)]
pub struct Deck {
    pages: Vec<Page>,
    /// Whether the splash screen runs before the first page.
    pub show_splash: bool,
}

impl Deck {
    /// An empty deck with the splash enabled.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pages: Vec::new(),
            show_splash: true,
        }
    }

    /// A deck of document pages split out of one markdown source.
    #[must_use]
    pub fn from_markdown(source: &str) -> Self {
        let mut deck = Self::new();
        for page in split_pages(source) {
            deck.push(Page::Document { source: page });
        }
        deck
    }

    pub fn push(&mut self, page: Page) {
        self.pages.push(page);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }
}

/// Split markdown source into page sources on `---` divider lines.
///
/// A divider is a line that is exactly `---` after trimming. Each
/// page drops its leading and trailing blank lines; pages left empty
/// are discarded, so a trailing divider does not create a blank slide.
#[must_use]
pub fn split_pages(source: &str) -> Vec<String> {
    let mut pages = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in source.split('\n') {
        if line.trim() == "---" {
            flush(&mut pages, &mut current);
        } else {
            current.push(line);
        }
    }
    flush(&mut pages, &mut current);

    pages
}

fn flush(pages: &mut Vec<String>, current: &mut Vec<&str>) {
    let start = current
        .iter()
        .position(|l| !l.trim().is_empty())
        .unwrap_or(current.len());
    let end = current
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .map_or(start, |p| p + 1);

    if start < end {
        pages.push(current[start..end].join("\n"));
    }
    current.clear();
}

// ─── Tests ───────────────────────────────────────────────────────────────────

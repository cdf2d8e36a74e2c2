// SPDX-License-Identifier: MIT
//
// Inline style markup — `[bold yellow]text[/bold yellow]`.
//
// Content authors style lines with bracketed tags: a tag opens a style
// scope, `[/...]` closes the innermost one, and `[/]` is a shorthand
// close. Tag words are attribute names (bold, dim, underline, …) and
// color names; nested scopes merge, inner color winning.
//
// The parser is total. A bracket group containing anything that is not
// a known style word stays in the output as literal text, so prose
// like "press [Enter]" survives untouched. Malformed input can reduce
// styling but never fails and never loses characters.

use primer_term::text::{Attr, Color, Line, Style};

/// Parse one markup string into a styled line.
#[must_use]
pub fn parse(source: &str) -> Line {
    let mut line = Line::new();
    // Innermost-last stack of merged styles; the base scope is plain.
    let mut stack: Vec<Style> = vec![Style::PLAIN];
    let mut rest = source;

    while let Some(open) = rest.find('[') {
        let current = *stack.last().unwrap_or(&Style::PLAIN);
        line.push(&rest[..open], current);
        let after = &rest[open + 1..];

        let Some(close) = after.find(']') else {
            // Unterminated bracket: everything left is literal.
            line.push(&rest[open..], current);
            return line;
        };

        let tag = &after[..close];
        let consumed = open + 1 + close + 1;

        if let Some(_names) = tag.strip_prefix('/') {
            // Closing tag. With only the base scope left there is
            // nothing to close — keep it literal.
            if stack.len() > 1 {
                stack.pop();
            } else {
                line.push(&rest[open..consumed], current);
            }
        } else if let Some(style) = parse_tag(tag) {
            stack.push(current.merge(style));
        } else {
            line.push(&rest[open..consumed], current);
        }

        rest = &rest[consumed..];
    }

    line.push(rest, *stack.last().unwrap_or(&Style::PLAIN));
    line
}

/// Parse a tag body (`"bold yellow"`) into a style.
///
/// Returns `None` when any word is neither an attribute nor a color —
/// the caller then treats the whole bracket group as literal text.
fn parse_tag(tag: &str) -> Option<Style> {
    if tag.trim().is_empty() {
        return None;
    }

    let mut style = Style::PLAIN;
    for word in tag.split_whitespace() {
        if let Some(attr) = Attr::from_name(word) {
            style.attrs |= attr;
        } else if let Some(color) = Color::from_name(word) {
            style.fg = color;
        } else {
            return None;
        }
    }
    Some(style)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn plain_text_passes_through() {
        let line = parse("hello world");
        assert_eq!(line.plain(), "hello world");
        assert_eq!(line.spans().len(), 1);
        assert_eq!(line.spans()[0].style, Style::PLAIN);
    }

    #[test]
    fn single_color_tag() {
        let line = parse("[red]danger[/red]");
        assert_eq!(line.plain(), "danger");
        assert_eq!(line.spans()[0].style.fg, Color::Red);
    }

    #[test]
    fn attr_and_color_in_one_tag() {
        let line = parse("[bold yellow]title[/bold yellow]");
        let style = line.spans()[0].style;
        assert_eq!(style.fg, Color::Yellow);
        assert!(style.attrs.contains(Attr::BOLD));
    }

    #[test]
    fn shorthand_close() {
        let line = parse("[dim]note[/]");
        assert_eq!(line.plain(), "note");
        assert!(line.spans()[0].style.attrs.contains(Attr::DIM));
    }

    #[test]
    fn text_around_tags_keeps_outer_style() {
        let line = parse("a[bold]b[/bold]c");
        assert_eq!(line.plain(), "abc");
        assert_eq!(line.spans().len(), 3);
        assert_eq!(line.spans()[0].style, Style::PLAIN);
        assert!(line.spans()[1].style.attrs.contains(Attr::BOLD));
        assert_eq!(line.spans()[2].style, Style::PLAIN);
    }

    #[test]
    fn nested_tags_merge() {
        let line = parse("[yellow]a[bold]b[/bold]c[/yellow]");
        assert_eq!(line.plain(), "abc");
        let mid = line.spans()[1].style;
        assert_eq!(mid.fg, Color::Yellow);
        assert!(mid.attrs.contains(Attr::BOLD));
        // After the inner close, only the color remains.
        assert_eq!(line.spans()[2].style, Style::fg(Color::Yellow));
    }

    #[test]
    fn nested_color_inner_wins_then_restores() {
        let line = parse("[yellow]a[red]b[/red]c[/yellow]");
        assert_eq!(line.spans()[1].style.fg, Color::Red);
        assert_eq!(line.spans()[2].style.fg, Color::Yellow);
    }

    #[test]
    fn unknown_tag_stays_literal() {
        let line = parse("press [Enter] to continue");
        assert_eq!(line.plain(), "press [Enter] to continue");
    }

    #[test]
    fn unterminated_bracket_stays_literal() {
        let line = parse("array[3");
        assert_eq!(line.plain(), "array[3");
    }

    #[test]
    fn stray_close_without_open_stays_literal() {
        let line = parse("oops[/bold]done");
        assert_eq!(line.plain(), "oops[/bold]done");
    }

    #[test]
    fn empty_tag_stays_literal() {
        let line = parse("a[]b");
        assert_eq!(line.plain(), "a[]b");
    }

    #[test]
    fn empty_input_is_empty_line() {
        assert!(parse("").is_empty());
    }

    #[test]
    fn adjacent_same_style_runs_merge() {
        let line = parse("[bold]a[/bold][bold]b[/bold]");
        assert_eq!(line.plain(), "ab");
        assert_eq!(line.spans().len(), 1);
    }

    #[test]
    fn bright_color_names() {
        let line = parse("[bright_cyan]x[/]");
        assert_eq!(line.spans()[0].style.fg, Color::BrightCyan);
    }

    #[test]
    fn parse_is_deterministic() {
        let a = parse("[bold yellow]same[/] input");
        let b = parse("[bold yellow]same[/] input");
        assert_eq!(a, b);
    }
}

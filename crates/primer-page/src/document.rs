// SPDX-License-Identifier: MIT
//
// Document rendering — markdown-like source to styled, wrapped rows.
//
// A document page is authored as a markdown subset: headings, bullet
// lists, fenced code blocks, and paragraphs that reflow at the
// viewport width. Inline markup tags survive the reflow and come out
// as styling — except inside code regions, which are sacred: fenced
// blocks and backtick spans pass through byte-for-byte.
//
// Before reflow, a punctuation-spacing pass inserts the space that
// content authors keep forgetting after commas and periods. The pass
// is conservative: it knows about decimals, dotted identifiers, URL
// schemes, markdown link/image syntax, and code regions, and it is
// idempotent — normalizing twice equals normalizing once.

use std::sync::LazyLock;

use regex::Regex;

use primer_term::text::{Attr, Color, Line, Style};

use crate::markup;

/// Style for fenced code block lines.
const CODE_BLOCK_STYLE: Style = Style {
    fg: Color::BrightGreen,
    attrs: Attr::empty(),
};

/// Style for inline backtick spans.
const CODE_INLINE_STYLE: Style = Style {
    fg: Color::BrightMagenta,
    attrs: Attr::empty(),
};

/// Punctuation that wants a following space.
const PUNCT: [char; 11] = [
    ',', '.', ':', ';', '!', '?', ')', ']', '}', '，', '。',
];

/// Detects an inline markup tag pair somewhere in a chunk.
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[[a-zA-Z][^\]]*?\].*?\[/[^\]]*?\]").expect("markup tag pattern")
});

// ─── Punctuation spacing ─────────────────────────────────────────────────────

/// Insert a single space after punctuation where one is missing.
///
/// Exemptions, in the order they are checked:
/// - fenced code blocks (``` or ~~~, closed only by a matching fence)
///   and inline code spans (backtick runs of equal length) pass
///   through unchanged;
/// - `!` before `[` (markdown image) and `]` before `(` (markdown
///   link) stay glued;
/// - a `.` between two alphanumerics (decimals, `example.com`);
/// - a `:` right after a URL scheme token when followed by `/`.
///
/// Idempotent: the inserted space satisfies the "already followed by
/// whitespace" check on a second run.
#[must_use]
pub fn normalize_punctuation(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut out = Vec::new();
    let mut fence: Option<&'static str> = None;

    for line in normalized.split('\n') {
        let stripped = line.trim_start();
        let marker = if stripped.starts_with("```") {
            Some("```")
        } else if stripped.starts_with("~~~") {
            Some("~~~")
        } else {
            None
        };

        if let Some(marker) = marker {
            match fence {
                None => fence = Some(marker),
                // Only a matching fence closes the block.
                Some(open) if open == marker => fence = None,
                Some(_) => {}
            }
            out.push(line.to_owned());
            continue;
        }

        if fence.is_some() {
            out.push(line.to_owned());
        } else {
            out.push(space_line(line));
        }
    }

    out.join("\n")
}

/// Apply the spacing pass to one line, skipping inline code spans.
fn space_line(line: &str) -> String {
    let chars: Vec<char> = line.chars().collect();
    let mut out = String::with_capacity(line.len() + 8);
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '`' {
            let start = i;
            while i < chars.len() && chars[i] == '`' {
                i += 1;
            }
            let ticks = i - start;
            if let Some(close) = find_tick_run(&chars, i, ticks) {
                // The whole span, delimiters included, is untouched.
                out.extend(&chars[start..close + ticks]);
                i = close + ticks;
            } else {
                // No closing run: the rest of the line is normal text.
                out.push_str(&space_segment(&chars[start..]));
                i = chars.len();
            }
        } else {
            let end = chars[i..]
                .iter()
                .position(|&c| c == '`')
                .map_or(chars.len(), |p| i + p);
            out.push_str(&space_segment(&chars[i..end]));
            i = end;
        }
    }

    out
}

/// Find the start of the next run of exactly-reachable `ticks`
/// consecutive backticks at or after `from`.
fn find_tick_run(chars: &[char], from: usize, ticks: usize) -> Option<usize> {
    if ticks == 0 || chars.len() < ticks {
        return None;
    }
    (from..=chars.len() - ticks)
        .find(|&j| chars[j..j + ticks].iter().all(|&c| c == '`'))
}

/// The spacing pass over one code-free segment.
fn space_segment(seg: &[char]) -> String {
    let mut out = String::with_capacity(seg.len() + 8);
    let mut i = 0;

    while i < seg.len() {
        let ch = seg[i];
        let next = seg.get(i + 1).copied();

        // Markdown image opener: `![` stays glued.
        if ch == '!' && next == Some('[') {
            out.push(ch);
            i += 1;
            continue;
        }

        if PUNCT.contains(&ch) {
            // Markdown link destination opener: `](` stays glued.
            if ch == ']' && next == Some('(') {
                out.push(ch);
                i += 1;
                continue;
            }

            match next {
                None => {
                    out.push(ch);
                }
                Some(n) if n.is_whitespace() => {
                    out.push(ch);
                }
                Some(n) => {
                    let prev = if i > 0 { Some(seg[i - 1]) } else { None };
                    let decimal_or_domain = ch == '.'
                        && prev.is_some_and(char::is_alphanumeric)
                        && n.is_alphanumeric();
                    let url_scheme = ch == ':' && n == '/' && scheme_before(seg, i);

                    out.push(ch);
                    if !decimal_or_domain && !url_scheme {
                        out.push(' ');
                    }
                }
            }
            i += 1;
            continue;
        }

        out.push(ch);
        i += 1;
    }

    out
}

/// Whether the token immediately before `colon` is a URL scheme.
fn scheme_before(seg: &[char], colon: usize) -> bool {
    let mut j = colon;
    while j > 0 {
        let c = seg[j - 1];
        if c.is_alphanumeric() || matches!(c, '+' | '-' | '.') {
            j -= 1;
        } else {
            break;
        }
    }
    let scheme: String = seg[j..colon].iter().collect();
    matches!(scheme.as_str(), "http" | "https" | "ftp")
}

// ─── Rendering ───────────────────────────────────────────────────────────────

/// Render document source into styled rows wrapped at `width`.
///
/// Pure and total: any source and any width (zero included) produce a
/// row list; callers apply vertical centering.
#[must_use]
pub fn render(source: &str, width: usize) -> Vec<Line> {
    let normalized = normalize_punctuation(source);
    let lines: Vec<&str> = normalized.split('\n').collect();

    let mut blocks: Vec<Vec<Line>> = Vec::new();
    let mut para: Vec<String> = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        let stripped = line.trim_start();

        // Fenced code block: raw lines, no wrap, no markup.
        if let Some(marker) = fence_marker(stripped) {
            flush_para(&mut blocks, &mut para, width);
            i += 1;
            let mut code = Vec::new();
            while i < lines.len() {
                let inner = lines[i].trim_start();
                if fence_marker(inner) == Some(marker) {
                    i += 1;
                    break;
                }
                code.push(Line::styled(lines[i], CODE_BLOCK_STYLE));
                i += 1;
            }
            blocks.push(code);
            continue;
        }

        if stripped.is_empty() {
            flush_para(&mut blocks, &mut para, width);
            i += 1;
            continue;
        }

        if let Some((level, text)) = heading(stripped) {
            flush_para(&mut blocks, &mut para, width);
            let base = if level == 1 {
                Style::attrs(Attr::BOLD | Attr::UNDERLINE)
            } else {
                Style::attrs(Attr::BOLD)
            };
            let styled = apply_base(&parse_inline(text), base);
            blocks.push(wrap(&styled, width, &Line::new(), 0));
            i += 1;
            continue;
        }

        if let Some(item) = bullet(stripped) {
            flush_para(&mut blocks, &mut para, width);
            let mut list = Vec::new();
            let mut rest = Some(item);
            while let Some(item) = rest {
                let prefix = Line::from_plain("• ");
                list.extend(wrap(&parse_inline(item), width, &prefix, 2));
                i += 1;
                rest = lines
                    .get(i)
                    .and_then(|next| bullet(next.trim_start()));
            }
            blocks.push(list);
            continue;
        }

        para.push(line.trim_end().to_owned());
        i += 1;
    }

    flush_para(&mut blocks, &mut para, width);

    // Join blocks with a single blank row between them.
    let mut rows = Vec::new();
    for (idx, block) in blocks.into_iter().enumerate() {
        if idx > 0 {
            rows.push(Line::new());
        }
        rows.extend(block);
    }
    rows
}

/// The fence marker opening or closing at this line, if any.
fn fence_marker(stripped: &str) -> Option<&'static str> {
    if stripped.starts_with("```") {
        Some("```")
    } else if stripped.starts_with("~~~") {
        Some("~~~")
    } else {
        None
    }
}

/// Heading level and text for `# `-style lines.
fn heading(stripped: &str) -> Option<(usize, &str)> {
    let level = stripped.chars().take_while(|&c| c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    stripped[level..]
        .strip_prefix(' ')
        .map(|text| (level, text))
}

/// The item text of a `- ` or `* ` bullet line.
fn bullet(stripped: &str) -> Option<&str> {
    stripped
        .strip_prefix("- ")
        .or_else(|| stripped.strip_prefix("* "))
}

/// Commit the pending paragraph (source lines joined by spaces).
fn flush_para(blocks: &mut Vec<Vec<Line>>, para: &mut Vec<String>, width: usize) {
    if para.is_empty() {
        return;
    }
    let text = para.join(" ");
    para.clear();
    blocks.push(wrap(&parse_inline(&text), width, &Line::new(), 0));
}

/// Parse paragraph text into a styled line.
///
/// Inline code spans (backtick runs) become code-styled text with the
/// delimiters stripped; markup tags are interpreted only in the
/// chunks between them, and only when the tag-pair probe matches.
fn parse_inline(text: &str) -> Line {
    let chars: Vec<char> = text.chars().collect();
    let mut line = Line::new();
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '`' {
            let start = i;
            while i < chars.len() && chars[i] == '`' {
                i += 1;
            }
            let ticks = i - start;
            if let Some(close) = find_tick_run(&chars, i, ticks) {
                let content: String = chars[i..close].iter().collect();
                line.push(&content, CODE_INLINE_STYLE);
                i = close + ticks;
            } else {
                let rest: String = chars[start..].iter().collect();
                push_prose(&mut line, &rest);
                i = chars.len();
            }
        } else {
            let end = chars[i..]
                .iter()
                .position(|&c| c == '`')
                .map_or(chars.len(), |p| i + p);
            let chunk: String = chars[i..end].iter().collect();
            push_prose(&mut line, &chunk);
            i = end;
        }
    }

    line
}

/// Append a prose chunk, interpreting markup when the probe matches.
fn push_prose(line: &mut Line, chunk: &str) {
    if TAG_RE.is_match(chunk) {
        line.append(markup::parse(chunk));
    } else {
        line.push(chunk, Style::PLAIN);
    }
}

/// Layer a base style under every span of a line.
fn apply_base(line: &Line, base: Style) -> Line {
    let mut out = Line::new();
    for span in line.spans() {
        out.push(&span.text, base.merge(span.style));
    }
    out
}

// ─── Word wrap ───────────────────────────────────────────────────────────────

/// Wrap a styled line at `width` display cells.
///
/// `prefix` starts the first row (the bullet marker); continuation
/// rows are indented by `indent` spaces. A word wider than a whole
/// row is hard-split at the cell boundary (losing its style — the
/// same accepted loss as horizontal truncation).
fn wrap(line: &Line, width: usize, prefix: &Line, indent: usize) -> Vec<Line> {
    let width = width.max(1);
    let indent = indent.min(width - 1);

    let words = split_words(line);
    let mut out = Vec::new();
    let mut current = prefix.clone();
    let mut has_word = false;

    for word in words {
        let mut word = word;
        loop {
            let sep = usize::from(has_word);
            let used = current.width();
            if used + sep + word.width() <= width {
                if has_word {
                    current.push(" ", Style::PLAIN);
                }
                current.append(word);
                has_word = true;
                break;
            }

            let avail = width.saturating_sub(used + sep);
            if !has_word && avail > 0 && word.width() > width.saturating_sub(current.width()) {
                // Overlong word at the start of a row: hard split.
                let mut head = word.truncate_cells(avail);
                if head.is_empty() {
                    // A glyph wider than the whole row: place it
                    // anyway and let the horizontal cut handle it.
                    let plain = word.plain();
                    let first = plain.chars().next().map_or(0, char::len_utf8);
                    head = Line::from_plain(&plain[..first]);
                }
                let taken = head.plain().len();
                let tail = Line::from_plain(&word.plain()[taken..]);
                current.append(head);
                out.push(current);
                current = Line::from_plain(" ".repeat(indent));
                has_word = false;
                word = tail;
                if word.is_empty() {
                    break;
                }
                continue;
            }

            // Row full: commit and start a continuation row.
            out.push(current);
            current = Line::from_plain(" ".repeat(indent));
            has_word = false;
        }
    }

    if has_word || out.is_empty() {
        out.push(current);
    }
    out
}

/// Split a styled line into space-separated styled words.
fn split_words(line: &Line) -> Vec<Line> {
    let mut words = Vec::new();
    let mut word = Line::new();

    for span in line.spans() {
        for ch in span.text.chars() {
            if ch == ' ' {
                if !word.is_empty() {
                    words.push(std::mem::take(&mut word));
                }
            } else {
                word.push(ch.encode_utf8(&mut [0; 4]), span.style);
            }
        }
    }
    if !word.is_empty() {
        words.push(word);
    }
    words
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use unicode_width::UnicodeWidthStr;

    // ── Punctuation spacing ────────────────────────────────────────

    #[test]
    fn inserts_space_after_comma() {
        assert_eq!(normalize_punctuation("a,b"), "a, b");
    }

    #[test]
    fn inserts_space_after_sentence_period() {
        assert_eq!(normalize_punctuation("done.Next"), "done. Next");
    }

    #[test]
    fn leaves_existing_space_alone() {
        assert_eq!(normalize_punctuation("a, b"), "a, b");
    }

    #[test]
    fn leaves_end_of_text_alone() {
        assert_eq!(normalize_punctuation("done."), "done.");
    }

    #[test]
    fn preserves_decimals() {
        assert_eq!(normalize_punctuation("pi is 3.14 here"), "pi is 3.14 here");
    }

    #[test]
    fn preserves_dotted_identifiers() {
        assert_eq!(normalize_punctuation("see example.com now"), "see example.com now");
    }

    #[test]
    fn preserves_url_schemes() {
        assert_eq!(
            normalize_punctuation("go to https://x.dev today"),
            "go to https://x.dev today"
        );
        assert_eq!(
            normalize_punctuation("ftp://host/file"),
            "ftp://host/file"
        );
    }

    #[test]
    fn non_scheme_colon_before_slash_gets_space() {
        assert_eq!(normalize_punctuation("note:/tmp"), "note: /tmp");
    }

    #[test]
    fn preserves_markdown_links() {
        assert_eq!(
            normalize_punctuation("[text](https://x.dev)"),
            "[text](https://x.dev)"
        );
    }

    #[test]
    fn preserves_markdown_images() {
        assert_eq!(normalize_punctuation("![alt](img.png)"), "![alt](img.png)");
    }

    #[test]
    fn bang_not_before_bracket_gets_space() {
        assert_eq!(normalize_punctuation("wow!yes"), "wow! yes");
    }

    #[test]
    fn fullwidth_punctuation_gets_space() {
        assert_eq!(normalize_punctuation("один，два"), "один， два");
    }

    #[test]
    fn fenced_block_is_untouched() {
        let src = "before,x\n```\necho a,b\n```\nafter,y";
        assert_eq!(
            normalize_punctuation(src),
            "before, x\n```\necho a,b\n```\nafter, y"
        );
    }

    #[test]
    fn tilde_fence_is_untouched() {
        let src = "~~~\na,b\n~~~";
        assert_eq!(normalize_punctuation(src), src);
    }

    #[test]
    fn mismatched_fence_does_not_close() {
        // A ~~~ inside a ``` block is content, not a closer.
        let src = "```\na,b\n~~~\nc,d\n```";
        assert_eq!(normalize_punctuation(src), src);
    }

    #[test]
    fn inline_code_span_is_untouched() {
        assert_eq!(
            normalize_punctuation("run `a,b` now,ok"),
            "run `a,b` now, ok"
        );
    }

    #[test]
    fn double_backtick_span_is_untouched() {
        assert_eq!(
            normalize_punctuation("``x,`y`` and z,w"),
            "``x,`y`` and z, w"
        );
    }

    #[test]
    fn unclosed_backtick_run_is_normal_text() {
        assert_eq!(normalize_punctuation("`a,b"), "`a, b");
    }

    #[test]
    fn normalization_is_idempotent() {
        let inputs = [
            "a,b.c:d;e!f?g",
            "see 3.14 and example.com,ok",
            "https://x.dev: details",
            "```\nraw,raw\n```\ntext,text",
            "inline `code,span` outside,too",
        ];
        for src in inputs {
            let once = normalize_punctuation(src);
            let twice = normalize_punctuation(&once);
            assert_eq!(once, twice, "input: {src}");
        }
    }

    // ── Rendering ──────────────────────────────────────────────────

    fn plain_rows(src: &str, width: usize) -> Vec<String> {
        render(src, width).iter().map(Line::plain).collect()
    }

    #[test]
    fn sentence_with_url_scheme_survives_intact() {
        let src = "Hello, world. See http://x.com: details";
        let rows = plain_rows(src, 80);
        assert_eq!(rows, vec!["Hello, world. See http://x.com: details"]);
    }

    #[test]
    fn paragraph_wraps_at_width() {
        let rows = plain_rows("one two three four", 9);
        assert_eq!(rows, vec!["one two", "three", "four"]);
    }

    #[test]
    fn paragraph_source_lines_reflow_together() {
        let rows = plain_rows("alpha beta\ngamma", 40);
        assert_eq!(rows, vec!["alpha beta gamma"]);
    }

    #[test]
    fn rewrap_differs_after_width_change() {
        let src = "a paragraph that is long enough to wrap differently";
        assert_ne!(render(src, 74), render(src, 34));
    }

    #[test]
    fn blank_line_separates_paragraphs() {
        let rows = plain_rows("one\n\ntwo", 20);
        assert_eq!(rows, vec!["one", "", "two"]);
    }

    #[test]
    fn heading_is_bold() {
        let rows = render("# Title", 40);
        assert_eq!(rows.len(), 1);
        let style = rows[0].spans()[0].style;
        assert!(style.attrs.contains(Attr::BOLD));
        assert!(style.attrs.contains(Attr::UNDERLINE));
    }

    #[test]
    fn subheading_is_bold_without_underline() {
        let rows = render("## Section", 40);
        let style = rows[0].spans()[0].style;
        assert!(style.attrs.contains(Attr::BOLD));
        assert!(!style.attrs.contains(Attr::UNDERLINE));
    }

    #[test]
    fn hashes_without_space_are_prose() {
        let rows = plain_rows("#hashtag", 40);
        assert_eq!(rows, vec!["#hashtag"]);
    }

    #[test]
    fn bullets_get_marker_and_hanging_indent() {
        let rows = plain_rows("- first point that wraps around\n- second", 14);
        assert_eq!(rows[0], "• first point");
        assert_eq!(rows[1], "  that wraps");
        assert_eq!(rows[2], "  around");
        assert_eq!(rows[3], "• second");
    }

    #[test]
    fn code_block_lines_are_raw_and_unwrapped() {
        let src = "intro\n```\n$ ls -la /very/long/path/that/keeps/going\n```";
        let rows = render(src, 10);
        let code = rows
            .iter()
            .find(|r| r.plain().starts_with("$ ls"))
            .expect("code row");
        // Not wrapped at width 10; styled as code.
        assert_eq!(code.plain(), "$ ls -la /very/long/path/that/keeps/going");
        assert_eq!(code.spans()[0].style, CODE_BLOCK_STYLE);
    }

    #[test]
    fn fence_markers_are_dropped() {
        let rows = plain_rows("```\ncode\n```", 20);
        assert_eq!(rows, vec!["code"]);
    }

    #[test]
    fn markup_in_code_block_stays_literal() {
        let rows = plain_rows("```\n[bold]not a tag[/bold]\n```", 40);
        assert_eq!(rows, vec!["[bold]not a tag[/bold]"]);
    }

    #[test]
    fn inline_code_strips_backticks_and_styles() {
        let rows = render("run `ls` now", 40);
        let code_span = rows[0]
            .spans()
            .iter()
            .find(|s| s.text == "ls")
            .expect("code span");
        assert_eq!(code_span.style, CODE_INLINE_STYLE);
    }

    #[test]
    fn markup_tags_style_paragraph_text() {
        let rows = render("see [yellow]this[/yellow] part", 40);
        let tagged = rows[0]
            .spans()
            .iter()
            .find(|s| s.text.contains("this"))
            .expect("styled span");
        assert_eq!(tagged.style.fg, Color::Yellow);
    }

    #[test]
    fn markup_not_interpreted_inside_inline_code() {
        let rows = plain_rows("x `[bold]y[/bold]` z", 60);
        assert_eq!(rows, vec!["x [bold]y[/bold] z"]);
    }

    #[test]
    fn lone_brackets_stay_literal_in_prose() {
        let rows = plain_rows("press [Enter] to continue", 60);
        assert_eq!(rows, vec!["press [Enter] to continue"]);
    }

    #[test]
    fn overlong_word_is_hard_split() {
        let rows = plain_rows("abcdefghij", 4);
        assert_eq!(rows, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn render_is_deterministic() {
        let src = "# T\n\npara one,two\n\n- a\n- b";
        assert_eq!(render(src, 30), render(src, 30));
    }

    #[test]
    fn empty_source_renders_no_rows() {
        assert!(render("", 40).is_empty());
    }

    #[test]
    fn zero_width_does_not_panic() {
        let _ = render("some text here", 0);
    }

    // ── Word width accounting ──────────────────────────────────────

    #[test]
    fn wrap_counts_display_cells_not_chars() {
        // Each CJK glyph is 2 cells: three glyphs fit a 6-cell row.
        let rows = plain_rows("日本 語語 語", 5);
        assert!(rows.iter().all(|r| UnicodeWidthStr::width(r.as_str()) <= 5));
    }
}

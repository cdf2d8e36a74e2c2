// SPDX-License-Identifier: MIT
//
// Raw key input — token decoding and the blocking read loop.
//
// Safety: `unsafe` is required for poll(2), read(2) on the stdin fd,
// and sigaction(SIGWINCH). Each unsafe block is minimal.
#![allow(unsafe_code)]
//
// Turns raw stdin bytes into discrete key tokens. Two pieces:
//
//   TokenDecoder — a pure incremental decoder. Feed it bytes, get
//   tokens. It buffers an in-flight escape sequence across feeds and
//   resolves a dangling ESC on `flush()` after a timeout.
//
//   KeyReader — owns the raw-mode guard and drives the decoder from
//   the stdin fd. One blocking poll per token; escape sequences are
//   assembled with a very short per-byte timeout so a bare ESC (or a
//   garbled sequence from a slow link) never stalls the loop.
//
// # Escape sequence termination
//
// A sequence ends at the first alphabetic byte or `~` after the
// introducer — the typical terminator of cursor and function-key
// sequences. `ESC O` (SS3) is special-cased: `O` is alphabetic but
// introduces exactly one more byte. Anything the decoder does not
// recognize comes out as `Token::Other`, which navigation ignores.
//
// # Resize without a second thread
//
// SIGWINCH sets an atomic flag and nothing else. In resize-polling
// mode the blocking wait is bounded (~130 ms); on each timeout the
// flag is checked, cleared, and surfaced as `Event::Resize` so the
// caller re-renders from the loop — never from signal context.

use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::terminal::{RawMode, is_tty};

// ─── Tuning ──────────────────────────────────────────────────────────────────

/// Per-byte wait while assembling an escape sequence (milliseconds).
/// Locally generated sequences arrive back to back; this only pauses
/// on a bare ESC or a sequence torn apart by a slow link.
const ESC_BYTE_TIMEOUT_MS: i32 = 1;

/// Bounded wait between resize-flag checks (milliseconds).
const RESIZE_POLL_MS: i32 = 130;

/// An escape sequence longer than this without a terminator is
/// garbage; emit it as one unrecognized token and move on.
const MAX_SEQUENCE_LEN: usize = 24;

// ─── Token ───────────────────────────────────────────────────────────────────

/// One decoded unit of keyboard input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A printable character (ASCII or decoded UTF-8).
    Char(char),
    /// Carriage return or line feed, normalized.
    Enter,
    /// Left arrow (`ESC [ D` or `ESC O D`).
    Left,
    /// Right arrow (`ESC [ C` or `ESC O C`).
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Ctrl-C byte (0x03) — cooperative cancellation.
    Interrupt,
    /// Anything else: unrecognized escape sequence, control byte,
    /// or invalid encoding. Dropped silently by navigation.
    Other,
}

// ─── TokenDecoder ────────────────────────────────────────────────────────────

/// Pure incremental token decoder.
///
/// Feed raw bytes via [`advance`](TokenDecoder::advance) and collect
/// tokens. Bytes forming an incomplete escape sequence are buffered
/// and combined with future feeds; call [`flush`](TokenDecoder::flush)
/// after a timeout to resolve them.
#[derive(Debug, Default)]
pub struct TokenDecoder {
    /// Accumulated raw bytes waiting to be decoded.
    buf: Vec<u8>,
}

impl TokenDecoder {
    /// Create a decoder with an empty buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Feed bytes and return every token that can be decoded.
    pub fn advance(&mut self, data: &[u8]) -> Vec<Token> {
        self.buf.extend_from_slice(data);
        let mut tokens = Vec::new();
        let mut pos = 0;

        while pos < self.buf.len() {
            match decode_one(&self.buf[pos..]) {
                Some((token, consumed)) => {
                    tokens.push(token);
                    pos += consumed;
                }
                None => break,
            }
        }

        if pos > 0 {
            self.buf.drain(..pos);
        }
        tokens
    }

    /// Are there buffered bytes that might complete with more data?
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.buf.is_empty()
    }

    /// Resolve buffered bytes after a timeout.
    ///
    /// A dangling partial sequence (bare ESC, torn UTF-8) becomes a
    /// single unrecognized token.
    pub fn flush(&mut self) -> Vec<Token> {
        if self.buf.is_empty() {
            return Vec::new();
        }
        self.buf.clear();
        vec![Token::Other]
    }
}

/// Decode a single token from the front of `buf`.
///
/// Returns `None` when the bytes form an incomplete sequence.
fn decode_one(buf: &[u8]) -> Option<(Token, usize)> {
    match buf[0] {
        0x1B => decode_escape(buf),
        0x03 => Some((Token::Interrupt, 1)),
        0x0A | 0x0D => Some((Token::Enter, 1)),
        b @ 0x20..=0x7E => Some((Token::Char(b as char), 1)),
        0xC0..=0xFF => decode_utf8(buf),
        // Remaining control bytes and bare continuation bytes.
        _ => Some((Token::Other, 1)),
    }
}

/// Decode an escape sequence starting at `buf[0] == ESC`.
fn decode_escape(buf: &[u8]) -> Option<(Token, usize)> {
    debug_assert_eq!(buf[0], 0x1B);

    if buf.len() < 2 {
        return None;
    }

    // SS3: ESC O <byte>. `O` would otherwise read as a terminator.
    if buf[1] == b'O' {
        if buf.len() < 3 {
            return None;
        }
        return Some((arrow_token(buf[2]), 3));
    }

    // Scan for the first terminator byte: alphabetic or `~`.
    let is_csi = buf[1] == b'[';
    let mut end = 1;
    while end < buf.len() {
        let b = buf[end];
        if b.is_ascii_alphabetic() || b == b'~' {
            let token = if is_csi { arrow_token(b) } else { Token::Other };
            return Some((token, end + 1));
        }
        end += 1;
        if end >= MAX_SEQUENCE_LEN {
            return Some((Token::Other, end));
        }
    }

    None
}

/// Map a CSI/SS3 final byte to an arrow token.
const fn arrow_token(final_byte: u8) -> Token {
    match final_byte {
        b'A' => Token::Up,
        b'B' => Token::Down,
        b'C' => Token::Right,
        b'D' => Token::Left,
        _ => Token::Other,
    }
}

/// Decode a UTF-8 multi-byte character.
fn decode_utf8(buf: &[u8]) -> Option<(Token, usize)> {
    let expected = match buf[0] {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        // Invalid lead byte.
        _ => return Some((Token::Other, 1)),
    };

    if buf.len() < expected {
        return None;
    }

    // Continuation bytes must match 0b10xxxxxx.
    for &b in &buf[1..expected] {
        if b & 0xC0 != 0x80 {
            return Some((Token::Other, 1));
        }
    }

    match std::str::from_utf8(&buf[..expected]) {
        Ok(s) => s
            .chars()
            .next()
            .map_or(Some((Token::Other, expected)), |ch| {
                Some((Token::Char(ch), expected))
            }),
        Err(_) => Some((Token::Other, 1)),
    }
}

// ─── SIGWINCH ────────────────────────────────────────────────────────────────

/// Set by the SIGWINCH handler; cleared by the reader between bounded
/// waits. Single writer (the handler), single reader (the poll loop).
static RESIZE_PENDING: AtomicBool = AtomicBool::new(false);

/// Install the SIGWINCH handler.
///
/// The handler only stores to an atomic — one of the few operations
/// that is async-signal-safe. All rendering happens on the main loop's
/// own cadence when it observes the flag.
#[cfg(unix)]
fn install_resize_handler() {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = sigwinch_handler as *const () as usize;
        sa.sa_flags = libc::SA_RESTART;
        libc::sigemptyset(&raw mut sa.sa_mask);
        libc::sigaction(libc::SIGWINCH, &raw const sa, std::ptr::null_mut());
    }
}

#[cfg(unix)]
extern "C" fn sigwinch_handler(_sig: libc::c_int) {
    RESIZE_PENDING.store(true, Ordering::Relaxed);
}

#[cfg(not(unix))]
fn install_resize_handler() {}

/// Consume the pending-resize flag.
fn take_resize_pending() -> bool {
    RESIZE_PENDING.swap(false, Ordering::Relaxed)
}

// ─── KeyReader ───────────────────────────────────────────────────────────────

/// Behavior switches for [`KeyReader::open`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ReaderOptions {
    /// Enter ends the stream instead of yielding a token. Used for
    /// "press Enter to continue" screens.
    pub stop_on_enter: bool,
    /// Wait with a bounded timeout and surface terminal resizes as
    /// [`Event::Resize`].
    pub poll_resize: bool,
}

/// What the reader produced for one wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A decoded key token.
    Key(Token),
    /// The terminal was resized since the last event.
    Resize,
    /// The stream ended: EOF, Ctrl-C, or Enter in `stop_on_enter`
    /// mode. The caller stops pulling.
    End,
}

/// Blocking key reader over raw-mode stdin.
///
/// Holds the [`RawMode`] guard for its whole lifetime, so dropping the
/// reader restores the terminal no matter how the reading phase ended.
pub struct KeyReader {
    /// Keeps the terminal in raw mode while the reader lives.
    _raw: RawMode,
    decoder: TokenDecoder,
    /// Tokens decoded ahead of the caller (one read can yield several).
    queue: VecDeque<Token>,
    opts: ReaderOptions,
}

impl KeyReader {
    /// Acquire the terminal and start reading.
    ///
    /// Returns `Ok(None)` when stdin is not an interactive terminal —
    /// the stream is immediately empty, with no blocking and no error.
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode cannot be entered on a real TTY.
    pub fn open(opts: ReaderOptions) -> io::Result<Option<Self>> {
        if !is_tty() {
            return Ok(None);
        }
        let raw = RawMode::enter()?;
        if opts.poll_resize {
            install_resize_handler();
        }
        Ok(Some(Self {
            _raw: raw,
            decoder: TokenDecoder::new(),
            queue: VecDeque::new(),
            opts,
        }))
    }

    /// Block until the next event.
    ///
    /// # Errors
    ///
    /// Returns an error only for unexpected poll/read failures; EOF
    /// and cancellation are reported as [`Event::End`].
    #[cfg(unix)]
    pub fn next(&mut self) -> io::Result<Event> {
        loop {
            if let Some(token) = self.queue.pop_front() {
                match token {
                    Token::Interrupt => return Ok(Event::End),
                    Token::Enter if self.opts.stop_on_enter => return Ok(Event::End),
                    other => return Ok(Event::Key(other)),
                }
            }

            let timeout = if self.opts.poll_resize {
                RESIZE_POLL_MS
            } else {
                -1 // Block indefinitely.
            };

            if wait_readable(timeout)? {
                let Some(byte) = read_stdin_byte()? else {
                    return Ok(Event::End);
                };
                let tokens = self.assemble(byte)?;
                self.queue.extend(tokens);
            } else if self.opts.poll_resize && take_resize_pending() {
                return Ok(Event::Resize);
            }
        }
    }

    #[cfg(not(unix))]
    pub fn next(&mut self) -> io::Result<Event> {
        Ok(Event::End)
    }

    /// Feed one byte to the decoder and, if it opens an escape
    /// sequence, keep pulling bytes with the short per-byte timeout
    /// until the sequence completes or the timeout resolves it.
    #[cfg(unix)]
    fn assemble(&mut self, first: u8) -> io::Result<Vec<Token>> {
        let mut tokens = self.decoder.advance(&[first]);

        while tokens.is_empty() && self.decoder.has_pending() {
            if wait_readable(ESC_BYTE_TIMEOUT_MS)? {
                match read_stdin_byte()? {
                    Some(byte) => tokens = self.decoder.advance(&[byte]),
                    None => {
                        tokens = self.decoder.flush();
                        break;
                    }
                }
            } else {
                tokens = self.decoder.flush();
                break;
            }
        }

        Ok(tokens)
    }
}

// ─── fd plumbing ─────────────────────────────────────────────────────────────

/// Poll stdin for readability. `timeout_ms < 0` blocks indefinitely.
///
/// A wait interrupted by a signal (SIGWINCH lands here) reports "not
/// readable" so the caller falls through to the resize-flag check.
#[cfg(unix)]
fn wait_readable(timeout_ms: i32) -> io::Result<bool> {
    let mut pfd = libc::pollfd {
        fd: libc::STDIN_FILENO,
        events: libc::POLLIN,
        revents: 0,
    };

    let ready = unsafe { libc::poll(&raw mut pfd, 1, timeout_ms) };
    if ready < 0 {
        let err = io::Error::last_os_error();
        if err.kind() == io::ErrorKind::Interrupted {
            return Ok(false);
        }
        return Err(err);
    }
    Ok(ready > 0)
}

/// Read one byte from stdin. `None` means EOF.
#[cfg(unix)]
fn read_stdin_byte() -> io::Result<Option<u8>> {
    let mut byte = 0u8;
    loop {
        let n = unsafe {
            libc::read(
                libc::STDIN_FILENO,
                (&raw mut byte).cast::<libc::c_void>(),
                1,
            )
        };
        if n < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                continue;
            }
            return Err(err);
        }
        return Ok(if n == 0 { None } else { Some(byte) });
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

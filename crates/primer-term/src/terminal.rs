// SPDX-License-Identifier: MIT
//
// Terminal control — raw mode, size query, and RAII cleanup.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr), ioctl (TIOCGWINSZ), and isatty. These are the standard
// POSIX interfaces for terminal control — there is no safe alternative.
// Each unsafe block is minimal and documented.
#![allow(unsafe_code)]
//
// The viewer reads keys one at a time with no echo, so it owns the
// terminal's input state for the whole reading phase. `RawMode` is a
// scoped acquisition: the original termios is captured on enter and
// restored on drop — normal completion, error unwind, or early return,
// it makes no difference.
//
// The panic hook deserves special mention: it bypasses Rust's stdout
// lock entirely, writing a pre-built restore sequence directly to fd 1.
// This prevents deadlock if the panic happened while holding the stdout
// lock (mid-draw). One raw write, cursor back, then the original panic
// handler prints its message to a working terminal.

use std::io;
use std::sync::{Mutex, Once};

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    /// Number of columns (width in character cells).
    pub cols: u16,
    /// Number of rows (height in character cells).
    pub rows: u16,
}

impl Size {
    /// The fallback used when the terminal size cannot be determined
    /// (piped stdin, tests, exotic platforms).
    pub const FALLBACK: Self = Self { cols: 80, rows: 24 };
}

// ─── Terminal Queries ───────────────────────────────────────────────────────

/// Query the current terminal size via `ioctl(TIOCGWINSZ)`.
///
/// Returns `None` if stdout is not a terminal or the query fails.
#[cfg(unix)]
#[must_use]
pub fn size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };

    if result == 0 && ws.ws_col > 0 && ws.ws_row > 0 {
        Some(Size {
            cols: ws.ws_col,
            rows: ws.ws_row,
        })
    } else {
        None
    }
}

#[cfg(not(unix))]
#[must_use]
pub fn size() -> Option<Size> {
    None
}

/// Check whether stdin is connected to a terminal (TTY).
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

/// Check whether stdout is connected to a terminal (TTY).
///
/// Cursor hiding is gated on this: hiding the cursor in a pipe would
/// leave escape bytes in redirected output.
#[cfg(unix)]
#[must_use]
pub fn stdout_is_tty() -> bool {
    unsafe { libc::isatty(libc::STDOUT_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn stdout_is_tty() -> bool {
    false
}

// ─── Panic-Safe Terminal Restore ────────────────────────────────────────────

/// Global backup of original termios for panic recovery.
///
/// The [`RawMode`] guard owns its own copy, but the panic hook can't
/// access it. This global backup — behind a [`Mutex`], not `static mut`
/// — lets the hook restore cooked mode without the guard.
#[cfg(unix)]
static TERMIOS_BACKUP: Mutex<Option<libc::termios>> = Mutex::new(None);

/// Restore termios from the global backup. Best-effort, ignores errors.
#[cfg(unix)]
fn restore_termios_from_backup() {
    if let Ok(guard) = TERMIOS_BACKUP.lock() {
        if let Some(ref original) = *guard {
            unsafe {
                let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSADRAIN, original);
            }
        }
    }
}

/// Terminal restore sequence for emergency use: reset SGR attributes,
/// show the cursor. The viewer never enters the alternate screen, so
/// there is nothing else to undo.
const EMERGENCY_RESTORE: &[u8] = b"\x1b[0m\x1b[?25h";

/// Panic hook guard — ensures the hook is installed at most once per process.
static PANIC_HOOK_INSTALLED: Once = Once::new();

/// Install a panic hook that restores the terminal before printing the error.
///
/// Without this, a panic in raw mode leaves the user's terminal broken:
/// no echo, no line editing, an invisible cursor, and no way to read
/// the error message. The hook writes [`EMERGENCY_RESTORE`] directly to
/// fd 1 (bypassing Rust's stdout lock to avoid deadlock), restores
/// termios from the global backup, then delegates to the original panic
/// handler so the error prints to a working terminal.
///
/// [`RawMode::enter`] installs the hook itself; binaries call this at
/// startup so the hook also covers panics before raw mode is entered.
/// Idempotent.
pub fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            emergency_restore();

            #[cfg(unix)]
            restore_termios_from_backup();

            original(info);
        }));
    });
}

/// Write the restore sequence directly to stdout's file descriptor.
fn emergency_restore() {
    #[cfg(unix)]
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            EMERGENCY_RESTORE.as_ptr().cast::<libc::c_void>(),
            EMERGENCY_RESTORE.len(),
        );
    }

    #[cfg(not(unix))]
    {
        use std::io::Write;
        let _ = io::stdout().write_all(EMERGENCY_RESTORE);
        let _ = io::stdout().flush();
    }
}

// ─── RawMode ────────────────────────────────────────────────────────────────

/// Scoped raw-mode acquisition with guaranteed restore.
///
/// Entering puts stdin into character-at-a-time, no-echo mode for the
/// lifetime of the guard; dropping it restores the prior mode on every
/// exit path. When stdin is not a TTY the guard is an inert no-op, so
/// callers never need to branch on interactivity here.
///
/// # Example
///
/// ```no_run
/// use primer_term::terminal::RawMode;
///
/// let _raw = RawMode::enter()?;
/// // ... read keys one byte at a time ...
/// // Cooked mode is restored when `_raw` drops.
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct RawMode {
    /// Original termios saved before entering raw mode. `None` when
    /// stdin was not a TTY (nothing to restore).
    #[cfg(unix)]
    original: Option<libc::termios>,
}

impl RawMode {
    /// Enter raw mode. No-op (but still a valid guard) off-TTY.
    ///
    /// Disables echo, canonical line buffering, signal generation and
    /// extended input processing; leaves output post-processing alone
    /// so ordinary `\n`-terminated draws still work. `VMIN=1 VTIME=0`
    /// makes `read()` block until at least one byte is available.
    ///
    /// With ISIG off, Ctrl-C arrives as byte 0x03 and is handled as a
    /// cooperative cancellation by the key reader rather than a signal.
    ///
    /// # Errors
    ///
    /// Returns an error if termios get/set fails on a real TTY.
    #[cfg(unix)]
    pub fn enter() -> io::Result<Self> {
        if !is_tty() {
            return Ok(Self { original: None });
        }

        install_panic_hook();

        unsafe {
            let mut termios: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(libc::STDIN_FILENO, &raw mut termios) != 0 {
                return Err(io::Error::last_os_error());
            }

            let original = termios;

            // Also save to the global backup for the panic hook.
            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = Some(original);
            }

            termios.c_iflag &=
                !(libc::BRKINT | libc::ICRNL | libc::INPCK | libc::ISTRIP | libc::IXON);
            termios.c_lflag &= !(libc::ECHO | libc::ICANON | libc::ISIG | libc::IEXTEN);

            // VMIN=1, VTIME=0: read() blocks until at least 1 byte.
            termios.c_cc[libc::VMIN] = 1;
            termios.c_cc[libc::VTIME] = 0;

            if libc::tcsetattr(libc::STDIN_FILENO, libc::TCSADRAIN, &raw const termios) != 0 {
                return Err(io::Error::last_os_error());
            }

            Ok(Self {
                original: Some(original),
            })
        }
    }

    /// Non-unix: raw mode is unavailable; the guard is inert.
    #[cfg(not(unix))]
    pub fn enter() -> io::Result<Self> {
        install_panic_hook();
        Ok(Self {})
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        #[cfg(unix)]
        if let Some(ref original) = self.original {
            // Best-effort: a failed restore must not disturb the unwind.
            unsafe {
                let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSADRAIN, original);
            }
            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = None;
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

//! Terminal mode setup and teardown.
//!
//! Entering puts the terminal into raw mode, hides the cursor and enables
//! mouse reporting; restoring undoes all of it and reinstates the saved
//! termios attributes. Restoration is idempotent and also runs on drop, so
//! a panic anywhere in the engine still leaves the terminal usable.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use super::ansi;

/// Set by the SIGWINCH handler, consumed by the render flow.
static RESIZED: AtomicBool = AtomicBool::new(false);

/// Check-and-clear the pending resize flag.
pub fn take_resize() -> bool {
    RESIZED.swap(false, Ordering::SeqCst)
}

/// Current terminal size in cells, with the conventional 80x20 fallback.
pub fn terminal_size() -> (u16, u16) {
    #[cfg(unix)]
    unsafe {
        let mut ws: libc::winsize = std::mem::zeroed();
        if libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) == 0
            && ws.ws_col > 0
            && ws.ws_row > 0
        {
            return (ws.ws_col, ws.ws_row);
        }
    }
    (80, 20)
}

#[cfg(unix)]
extern "C" fn on_sigwinch(_: libc::c_int) {
    RESIZED.store(true, Ordering::SeqCst);
}

/// Saved original terminal settings for restore.
#[cfg(unix)]
static mut ORIGINAL_TERMIOS: Option<libc::termios> = None;

/// Raw-mode guard. Create with [`TermDriver::enter`]; the terminal is
/// restored by [`TermDriver::restore`] or on drop, whichever comes first.
pub struct TermDriver {
    restored: bool,
}

impl TermDriver {
    /// Enter raw mode, hide the cursor, enable mouse reporting and install
    /// the resize signal handler.
    pub fn enter() -> io::Result<Self> {
        Self::enable_raw_mode()?;
        #[cfg(unix)]
        unsafe {
            libc::signal(libc::SIGWINCH, on_sigwinch as libc::sighandler_t);
        }
        let mut out = io::stdout().lock();
        ansi::cursor_hide(&mut out)?;
        ansi::mouse_on(&mut out)?;
        ansi::clear_screen(&mut out)?;
        ansi::cursor_to(&mut out, 0, 0)?;
        out.flush()?;
        Ok(Self { restored: false })
    }

    /// Restore the terminal: reset rendition, show cursor, disable mouse
    /// reporting, reinstate termios. Safe to call more than once; only the
    /// first call does anything.
    pub fn restore(&mut self) -> io::Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        let mut out = io::stdout().lock();
        ansi::reset(&mut out)?;
        ansi::mouse_off(&mut out)?;
        ansi::clear_screen(&mut out)?;
        ansi::cursor_to(&mut out, 0, 0)?;
        ansi::cursor_show(&mut out)?;
        out.flush()?;
        Self::disable_raw_mode()
    }

    fn enable_raw_mode() -> io::Result<()> {
        #[cfg(unix)]
        unsafe {
            let fd = libc::STDIN_FILENO;
            // Not a TTY (piped input, tests): skip raw mode, keep rendering.
            if libc::isatty(fd) == 0 {
                return Ok(());
            }
            let mut termios: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(fd, &mut termios) != 0 {
                return Err(io::Error::last_os_error());
            }
            ORIGINAL_TERMIOS = Some(termios);

            termios.c_iflag &= !(libc::IGNBRK
                | libc::BRKINT
                | libc::PARMRK
                | libc::ISTRIP
                | libc::INLCR
                | libc::IGNCR
                | libc::ICRNL
                | libc::IXON);
            termios.c_oflag &= !libc::OPOST;
            termios.c_lflag &=
                !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);
            termios.c_cflag &= !(libc::CSIZE | libc::PARENB);
            termios.c_cflag |= libc::CS8;
            termios.c_cc[libc::VMIN] = 1;
            termios.c_cc[libc::VTIME] = 0;

            if libc::tcsetattr(fd, libc::TCSAFLUSH, &termios) != 0 {
                return Err(io::Error::last_os_error());
            }
        }
        Ok(())
    }

    fn disable_raw_mode() -> io::Result<()> {
        #[cfg(unix)]
        unsafe {
            if let Some(original) = ORIGINAL_TERMIOS {
                if libc::tcsetattr(libc::STDIN_FILENO, libc::TCSADRAIN, &original) != 0 {
                    return Err(io::Error::last_os_error());
                }
            }
        }
        Ok(())
    }
}

impl Drop for TermDriver {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

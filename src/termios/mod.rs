//! Terminal attributes
//!
//! [`TerminalAttributes`] owns one control block and keeps it in sync with
//! the kernel's view of a terminal descriptor on request. Reads and writes of
//! individual fields never touch the kernel; only [`TerminalAttributes::load_from`],
//! [`TerminalAttributes::store_to`] and [`TerminalAttributes::flush`] do.

mod block;
mod sys;

use std::os::fd::{AsFd, AsRawFd};

use nix::sys::termios::BaudRate;
use tracing::debug;

pub use block::{ControlBlock, Flags, LineEncoding, Speed, NCCS};

use crate::error::{Error, Result};

/// When a [`TerminalAttributes::store_to`] takes effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetWhen {
    /// TCSANOW - immediately
    Now,
    /// TCSADRAIN - after pending output has been transmitted
    Drain,
    /// TCSAFLUSH - after output drains, discarding unread input
    Flush,
    /// TCSASOFT - leave the hardware settings (speed, size, parity) alone
    #[cfg(any(target_os = "macos", target_os = "ios"))]
    Soft,
}

impl SetWhen {
    /// The `optional_actions` value passed to tcsetattr
    pub fn as_raw(self) -> libc::c_int {
        match self {
            SetWhen::Now => libc::TCSANOW,
            SetWhen::Drain => libc::TCSADRAIN,
            SetWhen::Flush => libc::TCSAFLUSH,
            #[cfg(any(target_os = "macos", target_os = "ios"))]
            SetWhen::Soft => libc::TCSASOFT,
        }
    }
}

/// Which pending queue a [`TerminalAttributes::flush`] discards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushQueue {
    /// TCIFLUSH - data received but not read
    Input,
    /// TCOFLUSH - data written but not transmitted
    Output,
    /// TCIOFLUSH - both
    Both,
}

impl FlushQueue {
    /// The `queue_selector` value passed to tcflush
    pub fn as_raw(self) -> libc::c_int {
        match self {
            FlushQueue::Input => libc::TCIFLUSH,
            FlushQueue::Output => libc::TCOFLUSH,
            FlushQueue::Both => libc::TCIOFLUSH,
        }
    }
}

/// Named slots of the control-character array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialChar {
    /// VEOF - end of file (^D)
    Eof,
    /// VEOL - additional end of line
    Eol,
    /// VEOL2 - second additional end of line
    Eol2,
    /// VERASE - erase previous character
    Erase,
    /// VWERASE - erase previous word
    WordErase,
    /// VKILL - erase the line
    Kill,
    /// VREPRINT - reprint unread input
    Reprint,
    /// VINTR - send SIGINT
    Interrupt,
    /// VQUIT - send SIGQUIT
    Quit,
    /// VSUSP - send SIGTSTP
    Suspend,
    /// VDSUSP - delayed SIGTSTP, delivered when the character is read
    #[cfg(any(target_os = "macos", target_os = "ios"))]
    DelayedSuspend,
    /// VSTART - restart output stopped by VSTOP
    Start,
    /// VSTOP - stop output
    Stop,
    /// VLNEXT - quote the next character
    LiteralNext,
    /// VDISCARD - toggle discarding of pending output
    Discard,
    /// VMIN - minimum bytes for a non-canonical read
    Min,
    /// VTIME - non-canonical read timeout in deciseconds
    Time,
    /// VSTATUS - print status (SIGINFO)
    #[cfg(any(target_os = "macos", target_os = "ios"))]
    Status,
}

impl SpecialChar {
    /// Position in the control-character array
    pub fn index(self) -> usize {
        match self {
            SpecialChar::Eof => libc::VEOF,
            SpecialChar::Eol => libc::VEOL,
            SpecialChar::Eol2 => libc::VEOL2,
            SpecialChar::Erase => libc::VERASE,
            SpecialChar::WordErase => libc::VWERASE,
            SpecialChar::Kill => libc::VKILL,
            SpecialChar::Reprint => libc::VREPRINT,
            SpecialChar::Interrupt => libc::VINTR,
            SpecialChar::Quit => libc::VQUIT,
            SpecialChar::Suspend => libc::VSUSP,
            #[cfg(any(target_os = "macos", target_os = "ios"))]
            SpecialChar::DelayedSuspend => libc::VDSUSP,
            SpecialChar::Start => libc::VSTART,
            SpecialChar::Stop => libc::VSTOP,
            SpecialChar::LiteralNext => libc::VLNEXT,
            SpecialChar::Discard => libc::VDISCARD,
            SpecialChar::Min => libc::VMIN,
            SpecialChar::Time => libc::VTIME,
            #[cfg(any(target_os = "macos", target_os = "ios"))]
            SpecialChar::Status => libc::VSTATUS,
        }
    }

    /// Every slot defined on this platform
    pub fn all() -> &'static [SpecialChar] {
        &[
            SpecialChar::Eof,
            SpecialChar::Eol,
            SpecialChar::Eol2,
            SpecialChar::Erase,
            SpecialChar::WordErase,
            SpecialChar::Kill,
            SpecialChar::Reprint,
            SpecialChar::Interrupt,
            SpecialChar::Quit,
            SpecialChar::Suspend,
            #[cfg(any(target_os = "macos", target_os = "ios"))]
            SpecialChar::DelayedSuspend,
            SpecialChar::Start,
            SpecialChar::Stop,
            SpecialChar::LiteralNext,
            SpecialChar::Discard,
            SpecialChar::Min,
            SpecialChar::Time,
            #[cfg(any(target_os = "macos", target_os = "ios"))]
            SpecialChar::Status,
        ]
    }
}

/// One terminal configuration
///
/// Created all-zero, optionally loaded from a descriptor, edited in place,
/// and optionally stored back. The descriptor is only borrowed for the
/// duration of each call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TerminalAttributes {
    block: ControlBlock,
}

impl TerminalAttributes {
    /// Create a zero-initialized configuration
    pub fn new() -> Self {
        Self {
            block: ControlBlock::zeroed(),
        }
    }

    /// Create a configuration from the current settings of `fd`
    pub fn from_fd<Fd: AsFd>(fd: Fd) -> Result<Self> {
        let mut attrs = Self::new();
        attrs.load_from(fd)?;
        Ok(attrs)
    }

    /// Wrap an existing control block, e.g. one restored from a snapshot
    pub fn from_block(block: ControlBlock) -> Self {
        Self { block }
    }

    /// The underlying control block
    pub fn control_block(&self) -> &ControlBlock {
        &self.block
    }

    // ========================================================================
    // Kernel synchronization
    // ========================================================================

    /// Replace this configuration with the live settings of `fd`
    ///
    /// On error the configuration is left exactly as it was.
    pub fn load_from<Fd: AsFd>(&mut self, fd: Fd) -> Result<()> {
        let fd = fd.as_fd();
        match sys::get_attr(fd) {
            Ok(block) => {
                debug!(fd = fd.as_raw_fd(), "loaded terminal attributes");
                self.block = block;
                Ok(())
            },
            Err(e) => {
                debug!(fd = fd.as_raw_fd(), error = %e, "tcgetattr failed");
                Err(e)
            },
        }
    }

    /// Apply this configuration to `fd`
    ///
    /// With [`SetWhen::Drain`] or [`SetWhen::Flush`] this blocks until pending
    /// output has been transmitted.
    pub fn store_to<Fd: AsFd>(&self, fd: Fd, when: SetWhen) -> Result<()> {
        let fd = fd.as_fd();
        sys::set_attr(fd, when.as_raw(), &self.block).inspect_err(|e| {
            debug!(fd = fd.as_raw_fd(), ?when, error = %e, "tcsetattr failed");
        })?;
        debug!(fd = fd.as_raw_fd(), ?when, "stored terminal attributes");
        Ok(())
    }

    /// Discard pending data on `fd`; returns the selector that was used
    ///
    /// Only acts on the kernel queues, never on this configuration.
    pub fn flush<Fd: AsFd>(&self, fd: Fd, queue: FlushQueue) -> Result<FlushQueue> {
        let fd = fd.as_fd();
        sys::flush(fd, queue.as_raw())?;
        debug!(fd = fd.as_raw_fd(), ?queue, "flushed terminal queue");
        Ok(queue)
    }

    // ========================================================================
    // Speed
    // ========================================================================

    /// Decoded input speed code
    pub fn input_speed(&self) -> Speed {
        sys::input_speed(&self.block)
    }

    /// Decoded output speed code
    pub fn output_speed(&self) -> Speed {
        sys::output_speed(&self.block)
    }

    /// Set input and output speed to `rate`
    ///
    /// Encoding is left to cfsetspeed(3). On Linux this also rewrites the
    /// baud bits of the control flags.
    pub fn set_speed(&mut self, rate: BaudRate) -> Result<()> {
        sys::encode_speed(&mut self.block, rate as Speed)
    }

    // ========================================================================
    // Control characters
    // ========================================================================

    /// Byte at `index` in the control-character array
    pub fn control_char(&self, index: usize) -> Result<u8> {
        check_index(index)?;
        Ok(self.block.control_chars[index])
    }

    /// Store `value` at `index` in the control-character array
    pub fn set_control_char(&mut self, index: usize, value: u8) -> Result<()> {
        check_index(index)?;
        self.block.control_chars[index] = value;
        Ok(())
    }

    /// Byte bound to a named control function
    pub fn special_char(&self, which: SpecialChar) -> u8 {
        self.block.control_chars[which.index()]
    }

    /// Bind `value` to a named control function
    pub fn set_special_char(&mut self, which: SpecialChar, value: u8) {
        self.block.control_chars[which.index()] = value;
    }

    /// The whole control-character array
    pub fn control_chars(&self) -> &[u8; NCCS] {
        &self.block.control_chars
    }

    // ========================================================================
    // Flag groups
    // ========================================================================
    //
    // Values are stored verbatim. Composing valid masks from the exported
    // constants is up to the caller.

    /// Input mode flags (c_iflag)
    pub fn input_flags(&self) -> Flags {
        self.block.input_flags
    }

    pub fn set_input_flags(&mut self, flags: Flags) {
        self.block.input_flags = flags;
    }

    /// Output mode flags (c_oflag)
    pub fn output_flags(&self) -> Flags {
        self.block.output_flags
    }

    pub fn set_output_flags(&mut self, flags: Flags) {
        self.block.output_flags = flags;
    }

    /// Control mode flags (c_cflag)
    pub fn control_flags(&self) -> Flags {
        self.block.control_flags
    }

    pub fn set_control_flags(&mut self, flags: Flags) {
        self.block.control_flags = flags;
    }

    /// Local mode flags (c_lflag)
    pub fn local_flags(&self) -> Flags {
        self.block.local_flags
    }

    pub fn set_local_flags(&mut self, flags: Flags) {
        self.block.local_flags = flags;
    }
}

fn check_index(index: usize) -> Result<()> {
    if index >= NCCS {
        return Err(Error::IndexOutOfRange { index, nccs: NCCS });
    }
    Ok(())
}

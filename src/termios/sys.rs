//! Raw termios calls
//!
//! The only place that knows the layout of `libc::termios`. Everything above
//! this module works on [`ControlBlock`].
//!
//! # References
//!
//! - termios(3): https://man7.org/linux/man-pages/man3/termios.3.html
//! - tty_ioctl(4): https://man7.org/linux/man-pages/man4/tty_ioctl.4.html

use std::mem::{self, MaybeUninit};
use std::os::fd::{AsRawFd, BorrowedFd};

use nix::errno::Errno;

use super::block::{ControlBlock, LineEncoding, Speed};
use crate::error::{Error, Result};

/// Build the platform struct from a block
pub(crate) fn to_raw(block: &ControlBlock) -> libc::termios {
    // SAFETY: termios is plain old data and all-zero is a valid value
    let mut raw: libc::termios = unsafe { mem::zeroed() };
    raw.c_iflag = block.input_flags;
    raw.c_oflag = block.output_flags;
    raw.c_cflag = block.control_flags;
    raw.c_lflag = block.local_flags;
    raw.c_cc = block.control_chars;
    #[cfg(target_os = "linux")]
    {
        raw.c_line = block.encoding.line;
    }
    raw.c_ispeed = block.encoding.input_speed;
    raw.c_ospeed = block.encoding.output_speed;
    raw
}

/// Copy every field of the platform struct into a block
pub(crate) fn from_raw(raw: &libc::termios) -> ControlBlock {
    #[cfg(target_os = "linux")]
    let line = raw.c_line;
    #[cfg(not(target_os = "linux"))]
    let line = 0;

    ControlBlock {
        input_flags: raw.c_iflag,
        output_flags: raw.c_oflag,
        control_flags: raw.c_cflag,
        local_flags: raw.c_lflag,
        control_chars: raw.c_cc,
        encoding: LineEncoding {
            line,
            input_speed: raw.c_ispeed,
            output_speed: raw.c_ospeed,
        },
    }
}

/// tcgetattr(3)
pub(crate) fn get_attr(fd: BorrowedFd<'_>) -> Result<ControlBlock> {
    let mut raw = MaybeUninit::<libc::termios>::uninit();

    // SAFETY: tcgetattr fills the whole struct on success
    let res = unsafe { libc::tcgetattr(fd.as_raw_fd(), raw.as_mut_ptr()) };
    Errno::result(res).map_err(|e| Error::syscall("tcgetattr", e))?;

    // SAFETY: initialized by the successful call above
    let raw = unsafe { raw.assume_init() };
    Ok(from_raw(&raw))
}

/// tcsetattr(3)
pub(crate) fn set_attr(fd: BorrowedFd<'_>, action: libc::c_int, block: &ControlBlock) -> Result<()> {
    let raw = to_raw(block);

    // SAFETY: raw is a fully initialized termios that outlives the call
    let res = unsafe { libc::tcsetattr(fd.as_raw_fd(), action, &raw) };
    Errno::result(res).map_err(|e| Error::syscall("tcsetattr", e))?;
    Ok(())
}

/// tcflush(3)
pub(crate) fn flush(fd: BorrowedFd<'_>, queue: libc::c_int) -> Result<()> {
    // SAFETY: tcflush only takes the descriptor and selector
    let res = unsafe { libc::tcflush(fd.as_raw_fd(), queue) };
    Errno::result(res).map_err(|e| Error::syscall("tcflush", e))?;
    Ok(())
}

/// cfsetspeed(3): set input and output speed. The block is only replaced if
/// the encoding succeeds.
pub(crate) fn encode_speed(block: &mut ControlBlock, speed: Speed) -> Result<()> {
    let mut raw = to_raw(block);

    // SAFETY: raw is a valid termios owned by this frame
    let res = unsafe { libc::cfsetspeed(&mut raw, speed) };
    Errno::result(res).map_err(|e| Error::syscall("cfsetspeed", e))?;

    *block = from_raw(&raw);
    Ok(())
}

/// cfgetispeed(3)
pub(crate) fn input_speed(block: &ControlBlock) -> Speed {
    let raw = to_raw(block);
    // SAFETY: reads from a valid termios
    unsafe { libc::cfgetispeed(&raw) }
}

/// cfgetospeed(3)
pub(crate) fn output_speed(block: &ControlBlock) -> Speed {
    let raw = to_raw(block);
    // SAFETY: reads from a valid termios
    unsafe { libc::cfgetospeed(&raw) }
}

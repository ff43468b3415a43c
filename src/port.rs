//! Serial port handle
//!
//! Opens a character device, configures its line and keeps the
//! [`TerminalAttributes`] alongside the open file so they can be edited and
//! re-applied later.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, RawFd};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use nix::fcntl::{fcntl, FcntlArg, OFlag};
use nix::sys::termios::BaudRate;
use tracing::{debug, info};

use crate::config::PortConfig;
use crate::error::{Error, Result};
use crate::line::LineMode;
use crate::termios::{FlushQueue, SetWhen, TerminalAttributes};

/// Read timeout applied by [`SerialPort::open`], in deciseconds
pub const DEFAULT_READ_TIMEOUT: u8 = 5;

/// An open terminal device together with its attributes
#[derive(Debug)]
pub struct SerialPort {
    /// The device
    file: File,
    /// Path the device was opened from
    path: PathBuf,
    /// Device settings as read back after opening, plus any local edits
    attrs: TerminalAttributes,
}

impl SerialPort {
    /// Open `path` and configure it for `rate` and `mode`
    ///
    /// Flow control is switched off, the receiver is enabled and reads time
    /// out after half a second. The device may keep only part of the request
    /// (pseudo-terminals force 8 data bits without parity), so
    /// [`attributes`](Self::attributes) reports what it actually holds.
    pub fn open(path: impl AsRef<Path>, rate: BaudRate, mode: LineMode) -> Result<Self> {
        Self::open_with(path.as_ref(), rate, mode, DEFAULT_READ_TIMEOUT, false)
    }

    /// Open the port described by `config`
    pub fn from_config(config: &PortConfig) -> Result<Self> {
        Self::open_with(
            &config.path,
            config.baud_rate()?,
            config.line_mode()?,
            config.read_timeout,
            config.flow_control,
        )
    }

    fn open_with(
        path: &Path,
        rate: BaudRate,
        mode: LineMode,
        read_timeout: u8,
        flow_control: bool,
    ) -> Result<Self> {
        let file = open_device(path)?;

        let mut attrs = TerminalAttributes::from_fd(&file)?;
        attrs.set_flow_control(flow_control);
        attrs.apply_mode(mode);
        attrs.set_speed(rate)?;
        attrs.set_read_timeout(read_timeout);
        attrs.enable_receiver();
        attrs.store_to(&file, SetWhen::Now)?;
        attrs.load_from(&file)?;

        info!(path = %path.display(), ?rate, %mode, "opened serial port");

        Ok(Self {
            file,
            path: path.to_path_buf(),
            attrs,
        })
    }

    /// Path the port was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn attributes(&self) -> &TerminalAttributes {
        &self.attrs
    }

    /// Edit the attributes; call [`SerialPort::update`] to apply them
    pub fn attributes_mut(&mut self) -> &mut TerminalAttributes {
        &mut self.attrs
    }

    /// Apply the current attributes immediately
    pub fn update(&self) -> Result<()> {
        self.attrs.store_to(&self.file, SetWhen::Now)
    }

    /// Discard local edits and reload the device's settings
    pub fn reload(&mut self) -> Result<()> {
        self.attrs.load_from(&self.file)
    }

    /// Drop received but unread data
    pub fn flush_input(&self) -> Result<()> {
        self.attrs.flush(&self.file, FlushQueue::Input).map(|_| ())
    }

    /// Drop written but untransmitted data
    pub fn flush_output(&self) -> Result<()> {
        self.attrs.flush(&self.file, FlushQueue::Output).map(|_| ())
    }

    /// Drop pending data in both directions
    pub fn flush_all(&self) -> Result<()> {
        self.attrs.flush(&self.file, FlushQueue::Both).map(|_| ())
    }
}

/// Open without becoming the controlling terminal and without waiting for
/// carrier, then switch back to blocking I/O so VTIME timeouts apply.
fn open_device(path: &Path) -> Result<File> {
    let open_err = |source: io::Error| Error::Open {
        path: path.to_path_buf(),
        source,
    };

    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .custom_flags(libc::O_NOCTTY | libc::O_NONBLOCK)
        .open(path)
        .map_err(open_err)?;

    let fd = file.as_raw_fd();
    let flags = fcntl(fd, FcntlArg::F_GETFL).map_err(|e| Error::syscall("fcntl", e))?;
    let flags = OFlag::from_bits_truncate(flags) & !OFlag::O_NONBLOCK;
    fcntl(fd, FcntlArg::F_SETFL(flags)).map_err(|e| Error::syscall("fcntl", e))?;

    debug!(path = %path.display(), fd, "opened terminal device");
    Ok(file)
}

impl Read for SerialPort {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

impl Write for SerialPort {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl AsFd for SerialPort {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.file.as_fd()
    }
}

impl AsRawFd for SerialPort {
    fn as_raw_fd(&self) -> RawFd {
        self.file.as_raw_fd()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_device() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ttyNOPE");

        match SerialPort::open(&path, BaudRate::B9600, LineMode::default()) {
            Err(Error::Open { path: p, source }) => {
                assert_eq!(p, path);
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            },
            other => panic!("expected Open error, got {:?}", other),
        }
    }

    #[test]
    fn test_open_regular_file_is_not_a_tty() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = SerialPort::open(file.path(), BaudRate::B9600, LineMode::default()).unwrap_err();
        assert_eq!(err.errno(), Some(nix::errno::Errno::ENOTTY));
    }
}

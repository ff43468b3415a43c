//! Error types for terminal attribute operations

use std::io;
use std::path::PathBuf;

use nix::errno::Errno;
use thiserror::Error;

/// Terminal attribute error type
#[derive(Error, Debug)]
pub enum Error {
    /// An OS call on the descriptor failed; `errno` is the value the kernel reported.
    #[error("{call} failed")]
    SystemCall {
        call: &'static str,
        #[source]
        errno: Errno,
    },

    /// Control-character index outside `[0, NCCS)`
    #[error("control character index {index} out of range (NCCS = {nccs})")]
    IndexOutOfRange { index: usize, nccs: usize },

    /// Line mode string that is not `<data bits><parity><stop bits>`
    #[error("invalid line mode {0:?}, expected something like \"8N1\"")]
    InvalidMode(String),

    /// Bits-per-second value with no matching speed code
    #[error("unsupported line speed: {0} bps")]
    UnsupportedSpeed(u32),

    /// Failed to open a terminal device
    #[error("Failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Configuration could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn syscall(call: &'static str, errno: Errno) -> Self {
        Error::SystemCall { call, errno }
    }

    /// The OS error code carried by a [`Error::SystemCall`].
    pub fn errno(&self) -> Option<Errno> {
        match self {
            Error::SystemCall { errno, .. } => Some(*errno),
            _ => None,
        }
    }
}

/// Result type for terminal attribute operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errno_only_on_system_call() {
        let err = Error::syscall("tcgetattr", Errno::ENOTTY);
        assert_eq!(err.errno(), Some(Errno::ENOTTY));

        let err = Error::IndexOutOfRange { index: 40, nccs: 32 };
        assert_eq!(err.errno(), None);
    }

    #[test]
    fn test_index_error_message_reports_both_values() {
        let err = Error::IndexOutOfRange { index: 99, nccs: 20 };
        let msg = err.to_string();
        assert!(msg.contains("99"));
        assert!(msg.contains("20"));
    }

    #[test]
    fn test_system_call_message_names_call() {
        let err = Error::syscall("tcsetattr", Errno::EINVAL);
        assert!(err.to_string().starts_with("tcsetattr failed"));
    }

    #[test]
    fn test_system_call_errno_reported_once() {
        let err = Error::syscall("tcflush", Errno::ENOTTY);
        assert_eq!(err.to_string(), "tcflush failed");

        let source = std::error::Error::source(&err).expect("errno as source");
        assert_eq!(source.downcast_ref::<Errno>(), Some(&Errno::ENOTTY));
        assert!(!err.to_string().contains(&source.to_string()));
    }
}

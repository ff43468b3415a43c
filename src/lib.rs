//! Stty - terminal line-discipline settings
//!
//! Typed access to the termios control block of a terminal device:
//!
//! - `termios`: [`TerminalAttributes`], kernel sync, flags, speed, control characters
//! - `constants`: name → value table of the platform's termios constants
//! - `line`: serial line helpers (data bits, parity, stop bits, timeouts)
//! - `port`: [`SerialPort`], an open device plus its attributes
//! - `config`: [`PortConfig`], TOML description of a port
//!
//! Reference: https://pubs.opengroup.org/onlinepubs/9699919799/basedefs/termios.h.html

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "ios")))]
compile_error!("stty supports Linux and Apple targets only");

pub mod config;
pub mod constants;
mod error;
pub mod line;
pub mod port;
pub mod termios;

pub use config::PortConfig;
pub use error::{Error, Result};
pub use line::{DataBits, LineMode, Parity, StopBits};
pub use nix::sys::termios::BaudRate;
pub use port::SerialPort;
pub use termios::{FlushQueue, SetWhen, SpecialChar, TerminalAttributes, NCCS};

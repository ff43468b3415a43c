//! Serial port configuration
//!
//! A port can be described in a small TOML file:
//!
//! ```toml
//! path = "/dev/ttyUSB0"
//! speed = 115200
//! mode = "8N1"
//! read_timeout = 5
//! flow_control = false
//! ```
//!
//! Everything except `path` has a default.

use std::fs;
use std::path::{Path, PathBuf};

use nix::sys::termios::BaudRate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::line::{self, LineMode};

/// Settings applied when a [`crate::SerialPort`] is opened
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortConfig {
    /// Device to open
    pub path: PathBuf,
    /// Line speed in bits per second
    pub speed: u32,
    /// Data bits, parity and stop bits, e.g. "8N1"
    pub mode: String,
    /// Read timeout in deciseconds
    pub read_timeout: u8,
    /// XON/XOFF flow control
    pub flow_control: bool,
}

impl Default for PortConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            speed: 9600,
            mode: "8N1".to_string(),
            read_timeout: 5,
            flow_control: false,
        }
    }
}

impl PortConfig {
    /// Config for `path` with every other setting at its default
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Read a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    /// Parse TOML text and check that speed and mode are usable
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        if config.path.as_os_str().is_empty() {
            return Err(Error::Config("missing device path".to_string()));
        }
        config.baud_rate()?;
        config.line_mode()?;
        Ok(config)
    }

    pub fn baud_rate(&self) -> Result<BaudRate> {
        line::baud_rate(self.speed)
    }

    pub fn line_mode(&self) -> Result<LineMode> {
        self.mode.parse()
    }
}

//! Portable control block
//!
//! Holds the same logical fields as the platform `struct termios` without
//! depending on its memory layout. Conversion to and from the raw struct lives
//! in `sys`.

use serde::{Deserialize, Serialize};

/// Width of a flag-group word on this platform
pub type Flags = libc::tcflag_t;

/// Encoded line speed as returned by `cfgetispeed`/`cfgetospeed`
pub type Speed = libc::speed_t;

/// Length of the control-character array
pub const NCCS: usize = libc::NCCS;

/// Line discipline and speed fields
///
/// Opaque on purpose: on Linux the speed is also folded into the control
/// flags, so these fields are only meaningful through `cfget*speed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LineEncoding {
    pub(crate) line: u8,
    pub(crate) input_speed: Speed,
    pub(crate) output_speed: Speed,
}

/// In-memory terminal configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ControlBlock {
    pub(crate) input_flags: Flags,
    pub(crate) output_flags: Flags,
    pub(crate) control_flags: Flags,
    pub(crate) local_flags: Flags,
    pub(crate) control_chars: [u8; NCCS],
    pub(crate) encoding: LineEncoding,
}

impl ControlBlock {
    /// All-zero block
    pub fn zeroed() -> Self {
        Self::default()
    }

    /// Render as JSON, e.g. for logging a configuration before changing it
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parse a block previously written by [`ControlBlock::to_json`]
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

//! Serial line settings
//!
//! Typed helpers for the settings a serial connection is usually described
//! by: data bits, parity, stop bits ("8N1"), speed in bits per second, flow
//! control and read timeouts. They only edit a [`TerminalAttributes`]; nothing
//! reaches the device until the attributes are stored.

use std::fmt;
use std::str::FromStr;

use nix::sys::termios::BaudRate;

use crate::error::{Error, Result};
use crate::termios::{Flags, SpecialChar, TerminalAttributes};

/// Character size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataBits {
    Five,
    Six,
    Seven,
    Eight,
}

impl DataBits {
    /// The CS5..CS8 value for this size
    pub fn flag(self) -> Flags {
        match self {
            DataBits::Five => libc::CS5,
            DataBits::Six => libc::CS6,
            DataBits::Seven => libc::CS7,
            DataBits::Eight => libc::CS8,
        }
    }

    fn count(self) -> u8 {
        match self {
            DataBits::Five => 5,
            DataBits::Six => 6,
            DataBits::Seven => 7,
            DataBits::Eight => 8,
        }
    }
}

/// Parity checking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Stop bits per character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopBits {
    One,
    Two,
}

/// Data bits, parity and stop bits, written like `8N1`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineMode {
    pub data_bits: DataBits,
    pub parity: Parity,
    pub stop_bits: StopBits,
}

impl LineMode {
    pub fn new(data_bits: DataBits, parity: Parity, stop_bits: StopBits) -> Self {
        Self {
            data_bits,
            parity,
            stop_bits,
        }
    }
}

impl Default for LineMode {
    fn default() -> Self {
        Self::new(DataBits::Eight, Parity::None, StopBits::One)
    }
}

impl FromStr for LineMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidMode(s.to_string());

        let bytes = s.as_bytes();
        if bytes.len() != 3 {
            return Err(invalid());
        }

        let data_bits = match bytes[0] {
            b'5' => DataBits::Five,
            b'6' => DataBits::Six,
            b'7' => DataBits::Seven,
            b'8' => DataBits::Eight,
            _ => return Err(invalid()),
        };
        let parity = match bytes[1].to_ascii_uppercase() {
            b'N' => Parity::None,
            b'E' => Parity::Even,
            b'O' => Parity::Odd,
            _ => return Err(invalid()),
        };
        let stop_bits = match bytes[2] {
            b'1' => StopBits::One,
            b'2' => StopBits::Two,
            _ => return Err(invalid()),
        };

        Ok(Self::new(data_bits, parity, stop_bits))
    }
}

impl fmt::Display for LineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parity = match self.parity {
            Parity::None => 'N',
            Parity::Even => 'E',
            Parity::Odd => 'O',
        };
        let stop = match self.stop_bits {
            StopBits::One => 1,
            StopBits::Two => 2,
        };
        write!(f, "{}{}{}", self.data_bits.count(), parity, stop)
    }
}

/// Speed code for a rate in bits per second
pub fn baud_rate(bps: u32) -> Result<BaudRate> {
    let rate = match bps {
        0 => BaudRate::B0,
        50 => BaudRate::B50,
        75 => BaudRate::B75,
        110 => BaudRate::B110,
        134 => BaudRate::B134,
        150 => BaudRate::B150,
        200 => BaudRate::B200,
        300 => BaudRate::B300,
        600 => BaudRate::B600,
        1200 => BaudRate::B1200,
        1800 => BaudRate::B1800,
        2400 => BaudRate::B2400,
        4800 => BaudRate::B4800,
        9600 => BaudRate::B9600,
        19200 => BaudRate::B19200,
        38400 => BaudRate::B38400,
        57600 => BaudRate::B57600,
        115200 => BaudRate::B115200,
        230400 => BaudRate::B230400,
        _ => return Err(Error::UnsupportedSpeed(bps)),
    };
    Ok(rate)
}

impl TerminalAttributes {
    /// Replace the character size bits
    pub fn set_data_bits(&mut self, bits: DataBits) {
        let flags = self.control_flags() & !libc::CSIZE;
        self.set_control_flags(flags | bits.flag());
    }

    pub fn set_parity(&mut self, parity: Parity) {
        let flags = self.control_flags();
        let flags = match parity {
            Parity::None => flags & !libc::PARENB,
            Parity::Even => (flags | libc::PARENB) & !libc::PARODD,
            Parity::Odd => flags | libc::PARENB | libc::PARODD,
        };
        self.set_control_flags(flags);
    }

    pub fn set_stop_bits(&mut self, stop_bits: StopBits) {
        let flags = self.control_flags();
        let flags = match stop_bits {
            StopBits::One => flags & !libc::CSTOPB,
            StopBits::Two => flags | libc::CSTOPB,
        };
        self.set_control_flags(flags);
    }

    /// Data bits, parity and stop bits together
    pub fn apply_mode(&mut self, mode: LineMode) {
        self.set_data_bits(mode.data_bits);
        self.set_parity(mode.parity);
        self.set_stop_bits(mode.stop_bits);
    }

    /// XON/XOFF software flow control (IXON, IXOFF, IXANY)
    pub fn set_flow_control(&mut self, enabled: bool) {
        let mask = libc::IXON | libc::IXOFF | libc::IXANY;
        let flags = self.input_flags();
        self.set_input_flags(if enabled { flags | mask } else { flags & !mask });
    }

    /// Ignore modem control lines and turn on the receiver (CLOCAL, CREAD)
    pub fn enable_receiver(&mut self) {
        let flags = self.control_flags();
        self.set_control_flags(flags | libc::CLOCAL | libc::CREAD);
    }

    /// Reads return after `deciseconds` even if nothing arrived (VMIN = 0)
    pub fn set_read_timeout(&mut self, deciseconds: u8) {
        self.set_special_char(SpecialChar::Time, deciseconds);
        self.set_special_char(SpecialChar::Min, 0);
    }

    /// Non-canonical reads that return immediately with whatever is queued
    pub fn set_nonblocking_reads(&mut self) {
        self.clear_canonical();
        self.set_special_char(SpecialChar::Time, 0);
        self.set_special_char(SpecialChar::Min, 0);
    }

    /// Non-canonical reads that wait for at least one byte
    pub fn set_blocking_reads(&mut self) {
        self.clear_canonical();
        self.set_special_char(SpecialChar::Time, 0);
        self.set_special_char(SpecialChar::Min, 1);
    }

    fn clear_canonical(&mut self) {
        let flags = self.local_flags();
        self.set_local_flags(flags & !libc::ICANON);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mode() {
        let mode: LineMode = "8N1".parse().unwrap();
        assert_eq!(mode, LineMode::default());

        let mode: LineMode = "7e2".parse().unwrap();
        assert_eq!(mode.data_bits, DataBits::Seven);
        assert_eq!(mode.parity, Parity::Even);
        assert_eq!(mode.stop_bits, StopBits::Two);

        let mode: LineMode = "5O1".parse().unwrap();
        assert_eq!(mode.data_bits, DataBits::Five);
        assert_eq!(mode.parity, Parity::Odd);
    }

    #[test]
    fn test_parse_mode_rejects_garbage() {
        for bad in ["", "8N", "9N1", "8X1", "8N3", "8N1 ", "N81"] {
            match bad.parse::<LineMode>() {
                Err(Error::InvalidMode(s)) => assert_eq!(s, bad),
                other => panic!("{:?} parsed as {:?}", bad, other),
            }
        }
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(LineMode::default().to_string(), "8N1");
        let mode = LineMode::new(DataBits::Seven, Parity::Odd, StopBits::Two);
        assert_eq!(mode.to_string(), "7O2");
    }

    #[test]
    fn test_data_bits_replace_size() {
        let mut attrs = TerminalAttributes::new();
        attrs.set_control_flags(libc::CS7 | libc::HUPCL);
        attrs.set_data_bits(DataBits::Eight);
        assert_eq!(attrs.control_flags() & libc::CSIZE, libc::CS8);
        assert_ne!(attrs.control_flags() & libc::HUPCL, 0);

        attrs.set_data_bits(DataBits::Five);
        assert_eq!(attrs.control_flags() & libc::CSIZE, libc::CS5);
    }

    #[test]
    fn test_parity() {
        let mut attrs = TerminalAttributes::new();

        attrs.set_parity(Parity::Odd);
        assert_ne!(attrs.control_flags() & libc::PARENB, 0);
        assert_ne!(attrs.control_flags() & libc::PARODD, 0);

        attrs.set_parity(Parity::Even);
        assert_ne!(attrs.control_flags() & libc::PARENB, 0);
        assert_eq!(attrs.control_flags() & libc::PARODD, 0);

        attrs.set_parity(Parity::None);
        assert_eq!(attrs.control_flags() & libc::PARENB, 0);
    }

    #[test]
    fn test_stop_bits() {
        let mut attrs = TerminalAttributes::new();
        attrs.set_stop_bits(StopBits::Two);
        assert_ne!(attrs.control_flags() & libc::CSTOPB, 0);
        attrs.set_stop_bits(StopBits::One);
        assert_eq!(attrs.control_flags() & libc::CSTOPB, 0);
    }

    #[test]
    fn test_apply_mode() {
        let mut attrs = TerminalAttributes::new();
        attrs.apply_mode("7E2".parse().unwrap());
        let cflag = attrs.control_flags();
        assert_eq!(cflag & libc::CSIZE, libc::CS7);
        assert_eq!(cflag & (libc::PARENB | libc::PARODD), libc::PARENB);
        assert_ne!(cflag & libc::CSTOPB, 0);
    }

    #[test]
    fn test_flow_control() {
        let mut attrs = TerminalAttributes::new();
        attrs.set_input_flags(libc::ICRNL);

        attrs.set_flow_control(true);
        let all = libc::IXON | libc::IXOFF | libc::IXANY;
        assert_eq!(attrs.input_flags(), libc::ICRNL | all);

        attrs.set_flow_control(false);
        assert_eq!(attrs.input_flags(), libc::ICRNL);
    }

    #[test]
    fn test_enable_receiver() {
        let mut attrs = TerminalAttributes::new();
        attrs.enable_receiver();
        assert_eq!(attrs.control_flags(), libc::CLOCAL | libc::CREAD);
    }

    #[test]
    fn test_read_modes() {
        let mut attrs = TerminalAttributes::new();
        attrs.set_local_flags(libc::ICANON | libc::ECHO);

        attrs.set_read_timeout(5);
        assert_eq!(attrs.special_char(SpecialChar::Time), 5);
        assert_eq!(attrs.special_char(SpecialChar::Min), 0);
        // timeouts alone leave canonical mode alone
        assert_ne!(attrs.local_flags() & libc::ICANON, 0);

        attrs.set_blocking_reads();
        assert_eq!(attrs.local_flags(), libc::ECHO);
        assert_eq!(attrs.special_char(SpecialChar::Time), 0);
        assert_eq!(attrs.special_char(SpecialChar::Min), 1);

        attrs.set_nonblocking_reads();
        assert_eq!(attrs.special_char(SpecialChar::Min), 0);
    }

    #[test]
    fn test_baud_rate() {
        assert_eq!(baud_rate(9600).unwrap(), BaudRate::B9600);
        assert_eq!(baud_rate(115200).unwrap(), BaudRate::B115200);
        assert!(matches!(baud_rate(9601), Err(Error::UnsupportedSpeed(9601))));
    }
}

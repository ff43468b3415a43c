//! Exported termios constants
//!
//! A read-only table from symbolic names to the integer values of this
//! platform. Callers compose flag words from these with bitwise operations and
//! pass them to the `set_*_flags` accessors. Constants the platform does not
//! define are left out of the table rather than given a placeholder value.

/// Which part of the interface a constant belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstantGroup {
    /// tcsetattr timing selectors
    SetWhen,
    /// c_iflag bits
    InputFlag,
    /// c_oflag bits
    OutputFlag,
    /// c_cflag bits
    ControlFlag,
    /// c_lflag bits
    LocalFlag,
    /// Line speed codes
    Speed,
    /// tcflush queue selectors
    FlushQueue,
    /// c_cc indices and NCCS
    ControlChar,
}

/// One named value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constant {
    pub name: &'static str,
    pub group: ConstantGroup,
    pub value: i64,
}

macro_rules! constant_table {
    ($( $(#[$meta:meta])* $group:ident => $name:ident ),* $(,)?) => {
        static CONSTANTS: &[Constant] = &[
            $(
                $(#[$meta])*
                Constant {
                    name: stringify!($name),
                    group: ConstantGroup::$group,
                    value: libc::$name as i64,
                },
            )*
        ];
    };
}

constant_table! {
    SetWhen => TCSANOW,
    SetWhen => TCSADRAIN,
    SetWhen => TCSAFLUSH,
    #[cfg(any(target_os = "macos", target_os = "ios"))]
    SetWhen => TCSASOFT,

    InputFlag => IGNBRK,
    InputFlag => BRKINT,
    InputFlag => IGNPAR,
    InputFlag => PARMRK,
    InputFlag => INPCK,
    InputFlag => ISTRIP,
    InputFlag => INLCR,
    InputFlag => IGNCR,
    InputFlag => ICRNL,
    InputFlag => IXON,
    InputFlag => IXOFF,
    InputFlag => IXANY,
    InputFlag => IMAXBEL,
    #[cfg(target_os = "linux")]
    InputFlag => IUCLC,

    OutputFlag => OPOST,
    OutputFlag => ONLCR,
    #[cfg(any(target_os = "macos", target_os = "ios"))]
    OutputFlag => OXTABS,
    #[cfg(any(target_os = "macos", target_os = "ios"))]
    OutputFlag => ONOEOT,
    OutputFlag => OCRNL,
    #[cfg(target_os = "linux")]
    OutputFlag => OLCUC,
    OutputFlag => ONOCR,
    OutputFlag => ONLRET,

    ControlFlag => CSIZE,
    ControlFlag => CS5,
    ControlFlag => CS6,
    ControlFlag => CS7,
    ControlFlag => CS8,
    ControlFlag => CSTOPB,
    ControlFlag => CREAD,
    ControlFlag => PARENB,
    ControlFlag => PARODD,
    ControlFlag => HUPCL,
    ControlFlag => CLOCAL,
    #[cfg(any(target_os = "macos", target_os = "ios"))]
    ControlFlag => CCTS_OFLOW,
    ControlFlag => CRTSCTS,
    #[cfg(any(target_os = "macos", target_os = "ios"))]
    ControlFlag => CRTS_IFLOW,
    #[cfg(any(target_os = "macos", target_os = "ios"))]
    ControlFlag => MDMBUF,

    LocalFlag => ECHOKE,
    LocalFlag => ECHOE,
    LocalFlag => ECHO,
    LocalFlag => ECHONL,
    LocalFlag => ECHOPRT,
    LocalFlag => ECHOCTL,
    LocalFlag => ISIG,
    LocalFlag => ICANON,
    #[cfg(any(target_os = "macos", target_os = "ios"))]
    LocalFlag => ALTWERASE,
    LocalFlag => IEXTEN,
    LocalFlag => EXTPROC,
    LocalFlag => TOSTOP,
    LocalFlag => FLUSHO,
    #[cfg(any(target_os = "macos", target_os = "ios"))]
    LocalFlag => NOKERNINFO,
    LocalFlag => PENDIN,
    LocalFlag => NOFLSH,

    Speed => B0,
    Speed => B50,
    Speed => B75,
    Speed => B110,
    Speed => B134,
    Speed => B150,
    Speed => B200,
    Speed => B300,
    Speed => B600,
    Speed => B1200,
    Speed => B1800,
    Speed => B2400,
    Speed => B4800,
    Speed => B9600,
    Speed => B19200,
    Speed => B38400,
    #[cfg(any(target_os = "macos", target_os = "ios"))]
    Speed => EXTA,
    #[cfg(any(target_os = "macos", target_os = "ios"))]
    Speed => EXTB,

    FlushQueue => TCIFLUSH,
    FlushQueue => TCOFLUSH,
    FlushQueue => TCIOFLUSH,

    ControlChar => VEOF,
    ControlChar => VEOL,
    ControlChar => VEOL2,
    ControlChar => VERASE,
    ControlChar => VWERASE,
    ControlChar => VKILL,
    ControlChar => VREPRINT,
    ControlChar => VINTR,
    ControlChar => VQUIT,
    ControlChar => VSUSP,
    #[cfg(any(target_os = "macos", target_os = "ios"))]
    ControlChar => VDSUSP,
    ControlChar => VSTART,
    ControlChar => VSTOP,
    ControlChar => VLNEXT,
    ControlChar => VDISCARD,
    ControlChar => VMIN,
    ControlChar => VTIME,
    #[cfg(any(target_os = "macos", target_os = "ios"))]
    ControlChar => VSTATUS,
    ControlChar => NCCS,
}

/// Every constant available on this platform, in declaration order
pub fn constants() -> &'static [Constant] {
    CONSTANTS
}

/// Value of the constant called `name`
pub fn lookup(name: &str) -> Option<i64> {
    constants().iter().find(|c| c.name == name).map(|c| c.value)
}

/// Constants belonging to `group`
pub fn group(group: ConstantGroup) -> impl Iterator<Item = &'static Constant> {
    constants().iter().filter(move |c| c.group == group)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_lookup_known() {
        assert_eq!(lookup("ECHO"), Some(libc::ECHO as i64));
        assert_eq!(lookup("TCSANOW"), Some(libc::TCSANOW as i64));
        assert_eq!(lookup("NCCS"), Some(libc::NCCS as i64));
        assert_eq!(lookup("B9600"), Some(libc::B9600 as i64));
    }

    #[test]
    fn test_lookup_unknown() {
        assert_eq!(lookup("ECHOFOO"), None);
        assert_eq!(lookup("echo"), None);
    }

    #[test]
    fn test_table_is_static() {
        let first = constants();
        assert!(!first.is_empty());
        assert!(std::ptr::eq(first, constants()));
        assert_eq!(first[0].name, "TCSANOW");
    }

    #[test]
    fn test_names_unique() {
        let mut seen = HashSet::new();
        for c in constants() {
            assert!(seen.insert(c.name), "duplicate constant {}", c.name);
        }
    }

    #[test]
    fn test_groups() {
        let flush: Vec<_> = group(ConstantGroup::FlushQueue).map(|c| c.name).collect();
        assert_eq!(flush, ["TCIFLUSH", "TCOFLUSH", "TCIOFLUSH"]);

        assert!(group(ConstantGroup::Speed).count() >= 16);
        assert!(group(ConstantGroup::LocalFlag).any(|c| c.name == "ICANON"));
    }

    #[test]
    fn test_control_char_indices_in_range() {
        let nccs = lookup("NCCS").unwrap();
        for c in group(ConstantGroup::ControlChar).filter(|c| c.name != "NCCS") {
            assert!(c.value >= 0 && c.value < nccs, "{} = {} outside c_cc", c.name, c.value);
        }
    }

    #[test]
    fn test_single_bit_local_flags() {
        for c in group(ConstantGroup::LocalFlag) {
            assert_eq!(c.value.count_ones(), 1, "{} is not a single bit", c.name);
        }
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_bsd_only_constants_absent() {
        assert_eq!(lookup("TCSASOFT"), None);
        assert_eq!(lookup("VSTATUS"), None);
        assert_eq!(lookup("NOKERNINFO"), None);
    }
}

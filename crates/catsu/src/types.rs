//! Value types for the FT-991A CAT protocol.
//!
//! The mode and display colour lookup tables live here as constant arrays.
//! Names parse case-insensitively; an unknown name is
//! [`Error::InvalidArgument`].

use std::fmt;
use std::str::FromStr;

use catsu_core::{Error, Result};

/// One of the radio's two tunable frequency registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vfo {
    A,
    B,
}

impl Vfo {
    /// The frequency command for this VFO: `FA` or `FB`.
    pub fn frequency_command(self) -> &'static str {
        match self {
            Vfo::A => "FA",
            Vfo::B => "FB",
        }
    }
}

impl fmt::Display for Vfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Vfo::A => write!(f, "A"),
            Vfo::B => write!(f, "B"),
        }
    }
}

impl FromStr for Vfo {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "A" | "a" => Ok(Vfo::A),
            "B" | "b" => Ok(Vfo::B),
            _ => Err(Error::InvalidArgument(format!(
                "VFO {s:?} is not valid, expected A or B"
            ))),
        }
    }
}

/// Operating mode, as set with `MD0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatingMode {
    Lsb,
    Usb,
    CwU,
    Fm,
    Am,
    RttyLsb,
    CwL,
    DataLsb,
    RttyUsb,
    DataFm,
    FmN,
    DataUsb,
    AmN,
    C4fm,
}

/// Mode name and CAT code for every [`OperatingMode`].
static MODE_TABLE: [(OperatingMode, &str, char); 14] = [
    (OperatingMode::Lsb, "LSB", '1'),
    (OperatingMode::Usb, "USB", '2'),
    (OperatingMode::CwU, "CW-U", '3'),
    (OperatingMode::Fm, "FM", '4'),
    (OperatingMode::Am, "AM", '5'),
    (OperatingMode::RttyLsb, "RTTY-LSB", '6'),
    (OperatingMode::CwL, "CW-L", '7'),
    (OperatingMode::DataLsb, "DATA-LSB", '8'),
    (OperatingMode::RttyUsb, "RTTY-USB", '9'),
    (OperatingMode::DataFm, "DATA-FM", 'A'),
    (OperatingMode::FmN, "FM-N", 'B'),
    (OperatingMode::DataUsb, "DATA-USB", 'C'),
    (OperatingMode::AmN, "AM-N", 'D'),
    (OperatingMode::C4fm, "C4FM", 'E'),
];

impl OperatingMode {
    /// Every mode, in CAT code order.
    pub fn all() -> impl Iterator<Item = OperatingMode> {
        MODE_TABLE.iter().map(|&(mode, _, _)| mode)
    }

    fn entry(self) -> &'static (OperatingMode, &'static str, char) {
        // Table rows are in declaration order.
        &MODE_TABLE[self as usize]
    }

    /// The mode's display name (`"CW-U"`, `"DATA-USB"`, ...).
    pub fn name(self) -> &'static str {
        self.entry().1
    }

    /// The single-character CAT code (`'1'`..`'9'`, `'A'`..`'E'`).
    pub fn code(self) -> char {
        self.entry().2
    }

    /// Look up a mode by its CAT code.
    pub fn from_code(code: char) -> Option<OperatingMode> {
        MODE_TABLE
            .iter()
            .find(|(_, _, c)| *c == code.to_ascii_uppercase())
            .map(|&(mode, _, _)| mode)
    }
}

impl fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OperatingMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        MODE_TABLE
            .iter()
            .find(|(_, name, _)| name.eq_ignore_ascii_case(s))
            .map(|&(mode, _, _)| mode)
            .ok_or_else(|| Error::InvalidArgument(format!("unknown operating mode {s:?}")))
    }
}

/// Display colour scheme, menu item 006.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayColour {
    Blue,
    Gray,
    Green,
    Orange,
    Purple,
    Red,
    SkyBlue,
}

static COLOUR_TABLE: [(DisplayColour, &str, char); 7] = [
    (DisplayColour::Blue, "BLUE", '0'),
    (DisplayColour::Gray, "GRAY", '1'),
    (DisplayColour::Green, "GREEN", '2'),
    (DisplayColour::Orange, "ORANGE", '3'),
    (DisplayColour::Purple, "PURPLE", '4'),
    (DisplayColour::Red, "RED", '5'),
    (DisplayColour::SkyBlue, "SKY BLUE", '6'),
];

impl DisplayColour {
    pub fn all() -> impl Iterator<Item = DisplayColour> {
        COLOUR_TABLE.iter().map(|&(colour, _, _)| colour)
    }

    fn entry(self) -> &'static (DisplayColour, &'static str, char) {
        &COLOUR_TABLE[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.entry().1
    }

    /// The single-digit menu value (`'0'`..`'6'`).
    pub fn code(self) -> char {
        self.entry().2
    }
}

impl fmt::Display for DisplayColour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DisplayColour {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        COLOUR_TABLE
            .iter()
            .find(|(_, name, _)| name.eq_ignore_ascii_case(s))
            .map(|&(colour, _, _)| colour)
            .ok_or_else(|| Error::InvalidArgument(format!("unknown display colour {s:?}")))
    }
}

/// The radio clock as read with `DT0`, `DT1` and `DT2`.
///
/// Fields are kept as the radio sent them, sub-command digit removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimeRecord {
    /// `YYYYMMDD`
    pub date: String,
    /// `HHMMSS`
    pub time: String,
    /// UTC offset, `+HHMM` or `-HHMM`
    pub timezone: String,
}

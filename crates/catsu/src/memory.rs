//! Memory channel records, as returned by the `MR` command.
//!
//! The `MR` reply parameter is 25 characters of fixed-width fields:
//!
//! ```text
//! 001 014250000 + 0000 0 0 2 1 0 00 0
//! |   |         | |    | | | | | |  +- simplex / shift (0-2)
//! |   |         | |    | | | | | +---- reserved, always 00
//! |   |         | |    | | | | +------ CTCSS/DCS mode (0-4)
//! |   |         | |    | | | +-------- 0 = VFO, 1 = memory
//! |   |         | |    | | +---------- mode code
//! |   |         | |    | +------------ TX clarifier on/off
//! |   |         | |    +-------------- RX clarifier on/off
//! |   |         | +------------------- clarifier offset, Hz
//! |   |         +--------------------- clarifier direction
//! |   +------------------------------- frequency, Hz
//! +----------------------------------- channel number
//! ```

use std::ops::Range;

use catsu_core::{Error, Result};

use crate::types::OperatingMode;

/// Length of the `MR` reply parameter.
pub const MEMORY_RECORD_LEN: usize = 25;

const CHANNEL: Range<usize> = 0..3;
const FREQUENCY: Range<usize> = 3..12;
const CLARIFIER_SIGN: Range<usize> = 12..13;
const CLARIFIER_OFFSET: Range<usize> = 13..17;
const RX_CLARIFIER: Range<usize> = 17..18;
const TX_CLARIFIER: Range<usize> = 18..19;
const MODE: Range<usize> = 19..20;
const VFO_OR_MEMORY: Range<usize> = 20..21;
const CTCSS_MODE: Range<usize> = 21..22;
const RESERVED: Range<usize> = 22..24;
const SHIFT: Range<usize> = 24..25;

/// Decoded view of one memory channel.
///
/// Fields hold the characters the radio sent; the accessor methods convert
/// them to numbers and enums.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryChannelRecord {
    /// Channel number, 3 digits.
    pub channel: String,
    /// Stored frequency, 9 digits, Hz.
    pub frequency: String,
    /// Clarifier direction, `+` or `-`.
    pub clarifier_sign: String,
    /// Clarifier offset magnitude, 4 digits, Hz.
    pub clarifier_offset: String,
    /// RX clarifier, `0` off, `1` on.
    pub rx_clarifier: String,
    /// TX clarifier, `0` off, `1` on.
    pub tx_clarifier: String,
    /// Mode code (see [`OperatingMode::code`]).
    pub mode: String,
    /// `0` VFO, `1` memory.
    pub vfo_or_memory: String,
    /// CTCSS/DCS mode: `0` off, `1` ENC/DEC, `2` ENC, `3` DCS ENC/DEC, `4` DCS ENC.
    pub ctcss_mode: String,
    pub reserved: String,
    /// `0` simplex, `1` plus shift, `2` minus shift.
    pub shift: String,
}

impl MemoryChannelRecord {
    /// Decode a 25-character `MR` parameter.
    ///
    /// Every numeric field must be all digits and the clarifier direction
    /// must be `+` or `-`; anything else is [`Error::Parse`].
    pub fn decode(parameter: &str) -> Result<Self> {
        if parameter.len() != MEMORY_RECORD_LEN || !parameter.is_ascii() {
            return Err(Error::Parse(format!(
                "memory record {parameter:?} is not {MEMORY_RECORD_LEN} ASCII characters"
            )));
        }

        let field = |range: Range<usize>| parameter[range].to_string();
        let record = MemoryChannelRecord {
            channel: field(CHANNEL),
            frequency: field(FREQUENCY),
            clarifier_sign: field(CLARIFIER_SIGN),
            clarifier_offset: field(CLARIFIER_OFFSET),
            rx_clarifier: field(RX_CLARIFIER),
            tx_clarifier: field(TX_CLARIFIER),
            mode: field(MODE),
            vfo_or_memory: field(VFO_OR_MEMORY),
            ctcss_mode: field(CTCSS_MODE),
            reserved: field(RESERVED),
            shift: field(SHIFT),
        };

        let numeric = [
            ("channel", &record.channel),
            ("frequency", &record.frequency),
            ("clarifier offset", &record.clarifier_offset),
            ("RX clarifier", &record.rx_clarifier),
            ("TX clarifier", &record.tx_clarifier),
            ("VFO/memory", &record.vfo_or_memory),
            ("CTCSS mode", &record.ctcss_mode),
            ("shift", &record.shift),
        ];
        for (name, value) in numeric {
            if !value.bytes().all(|b| b.is_ascii_digit()) {
                return Err(Error::Parse(format!(
                    "memory record {name} field {value:?} is not numeric"
                )));
            }
        }
        if record.clarifier_sign != "+" && record.clarifier_sign != "-" {
            return Err(Error::Parse(format!(
                "memory record clarifier direction {:?} is not + or -",
                record.clarifier_sign
            )));
        }

        Ok(record)
    }

    pub fn channel_number(&self) -> u16 {
        self.channel.parse().unwrap_or_default()
    }

    pub fn frequency_hz(&self) -> u64 {
        self.frequency.parse().unwrap_or_default()
    }

    /// Signed clarifier offset in Hz.
    pub fn clarifier_offset_hz(&self) -> i32 {
        let magnitude: i32 = self.clarifier_offset.parse().unwrap_or_default();
        if self.clarifier_sign == "-" {
            -magnitude
        } else {
            magnitude
        }
    }

    pub fn rx_clarifier_on(&self) -> bool {
        self.rx_clarifier == "1"
    }

    pub fn tx_clarifier_on(&self) -> bool {
        self.tx_clarifier == "1"
    }

    /// The stored mode, or `None` for a code outside the mode table.
    pub fn operating_mode(&self) -> Option<OperatingMode> {
        self.mode.chars().next().and_then(OperatingMode::from_code)
    }

    pub fn is_memory(&self) -> bool {
        self.vfo_or_memory == "1"
    }
}

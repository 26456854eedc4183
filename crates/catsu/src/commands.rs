//! FT-991A CAT command builders and response parsers.
//!
//! All functions are pure: they produce or consume byte vectors and string
//! slices without performing any I/O. Builders that take caller input
//! validate it and return [`Error::InvalidArgument`] before a single byte is
//! produced.
//!
//! Frequencies are always 9 ASCII digits in hertz, zero-padded on the left.
//! Memory channel numbers are 3 digits. Mode codes are single characters
//! (`1`-`E`).

use chrono::{DateTime, Utc};

use catsu_core::{Error, Result};

use crate::protocol::{encode_command, ParsedResponse, TERMINATOR};
use crate::types::{DisplayColour, OperatingMode, Vfo};

/// Largest frequency that fits the 9-digit field.
pub const MAX_FREQUENCY_HZ: u64 = 999_999_999;

/// Length of an `FA`/`FB` reply: 2-char command, 9 digits, terminator.
pub const FREQUENCY_REPLY_LEN: usize = 12;

/// First and last memory channel.
pub const MIN_MEMORY_CHANNEL: u16 = 1;
pub const MAX_MEMORY_CHANNEL: u16 = 117;

/// Menu number of the display colour setting.
const MENU_DISPLAY_COLOUR: &str = "006";

// ---------------------------------------------------------------
// Frequency
// ---------------------------------------------------------------

/// Build a "read VFO frequency" command (`FA;` or `FB;`).
pub fn cmd_read_frequency(vfo: Vfo) -> Vec<u8> {
    encode_command(vfo.frequency_command(), "")
}

/// Build a "set VFO frequency" command (`FA{hz:09};` or `FB{hz:09};`).
///
/// Frequencies that do not fit in nine digits are rejected rather than
/// truncated.
pub fn cmd_set_frequency(vfo: Vfo, freq_hz: u64) -> Result<Vec<u8>> {
    if freq_hz > MAX_FREQUENCY_HZ {
        return Err(Error::InvalidArgument(format!(
            "frequency {freq_hz} Hz does not fit in 9 digits"
        )));
    }
    Ok(encode_command(
        vfo.frequency_command(),
        &format!("{freq_hz:09}"),
    ))
}

/// Parse the fixed-width reply to `FA;` / `FB;`, e.g. `FA014250000;`.
pub fn parse_frequency_reply(vfo: Vfo, reply: &[u8]) -> Result<u64> {
    let malformed = || {
        Error::Parse(format!(
            "malformed VFO-{vfo} frequency reply {:?}",
            String::from_utf8_lossy(reply)
        ))
    };

    if reply.len() != FREQUENCY_REPLY_LEN
        || reply.last() != Some(&TERMINATOR)
        || !reply.starts_with(vfo.frequency_command().as_bytes())
    {
        return Err(malformed());
    }
    let digits = &reply[2..FREQUENCY_REPLY_LEN - 1];
    if !digits.iter().all(u8::is_ascii_digit) {
        return Err(malformed());
    }
    std::str::from_utf8(digits)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .ok_or_else(malformed)
}

/// Convert a human-readable frequency to hertz.
///
/// Accepted forms:
/// - `"145.5M"`: megahertz, decimal point allowed
/// - `"14313K"`: kilohertz, decimal point allowed
/// - `"7127000"`: hertz, integer only
///
/// Digits beyond 1 Hz resolution are truncated, not rounded. The scaling is
/// done on the digit string, so `"7.1M"` is exactly 7 100 000 Hz.
pub fn parse_human_frequency(text: &str) -> Result<u64> {
    let text = text.trim();
    let (number, decimals) = if let Some(khz) = text.strip_suffix('K') {
        (khz, 3)
    } else if let Some(mhz) = text.strip_suffix('M') {
        (mhz, 6)
    } else {
        (text, 0)
    };

    if let Some(magnitude) = number.strip_prefix('-') {
        if is_decimal(magnitude, decimals > 0) {
            return Err(Error::InvalidArgument(format!(
                "frequency {text:?} is negative"
            )));
        }
    }
    if !is_decimal(number, decimals > 0) {
        return Err(Error::Parse(format!(
            "{text:?} is not a valid frequency"
        )));
    }

    let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
    let mut digits = String::with_capacity(whole.len() + decimals);
    digits.push_str(whole);
    digits.extend(
        fraction
            .chars()
            .chain(std::iter::repeat('0'))
            .take(decimals),
    );

    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(0);
    }
    if digits.len() > 9 {
        return Err(Error::InvalidArgument(format!(
            "frequency {text:?} does not fit in 9 digits"
        )));
    }
    digits
        .parse::<u64>()
        .map_err(|e| Error::Parse(format!("{text:?} is not a valid frequency ({e})")))
}

/// Digits with at most one decimal point, and at least one digit.
fn is_decimal(s: &str, allow_point: bool) -> bool {
    let (whole, fraction) = match s.split_once('.') {
        Some(parts) if allow_point => parts,
        Some(_) => return false,
        None => (s, ""),
    };
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    !(whole.is_empty() && fraction.is_empty()) && all_digits(whole) && all_digits(fraction)
}

// ---------------------------------------------------------------
// Memory channels
// ---------------------------------------------------------------

/// Check a memory channel number against the radio's 1-117 range.
pub fn validate_memory_channel(channel: u16) -> Result<()> {
    if (MIN_MEMORY_CHANNEL..=MAX_MEMORY_CHANNEL).contains(&channel) {
        Ok(())
    } else {
        Err(Error::InvalidArgument(format!(
            "memory channel {channel} is outside {MIN_MEMORY_CHANNEL}-{MAX_MEMORY_CHANNEL}"
        )))
    }
}

/// Build a "read current memory channel" command (`MC;`).
pub fn cmd_read_memory_channel_number() -> Vec<u8> {
    encode_command("MC", "")
}

/// Build a "select memory channel" command (`MC{n:03};`).
pub fn cmd_set_memory_channel(channel: u16) -> Result<Vec<u8>> {
    validate_memory_channel(channel)?;
    Ok(encode_command("MC", &format!("{channel:03}")))
}

/// Parse the parameter of an `MC` reply into a channel number.
pub fn parse_memory_channel_number(parameter: &str) -> Result<u16> {
    if parameter.is_empty() || !parameter.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::Parse(format!(
            "memory channel {parameter:?} is not a number"
        )));
    }
    parameter
        .parse()
        .map_err(|e| Error::Parse(format!("memory channel {parameter:?}: {e}")))
}

/// Build a "read memory channel" command (`MR{n:03};`).
pub fn cmd_read_memory_channel(channel: u16) -> Result<Vec<u8>> {
    validate_memory_channel(channel)?;
    Ok(encode_command("MR", &format!("{channel:03}")))
}

/// Build a "VFO-A to memory" command (`AM;`).
///
/// Stores the VFO-A frequency and settings in the selected memory channel.
pub fn cmd_vfo_a_to_memory() -> Vec<u8> {
    encode_command("AM", "")
}

// ---------------------------------------------------------------
// Mode and menu
// ---------------------------------------------------------------

/// Build a "read operating mode" command (`MD0;`).
pub fn cmd_read_mode() -> Vec<u8> {
    encode_command("MD", "0")
}

/// Build a "set operating mode" command (`MD0{code};`).
pub fn cmd_set_mode(mode: OperatingMode) -> Vec<u8> {
    encode_command("MD", &format!("0{}", mode.code()))
}

/// Parse the parameter of an `MD` reply (`0{code}`).
pub fn parse_mode_response(parameter: &str) -> Result<OperatingMode> {
    let code = strip_sub_command(parameter, '0')?;
    let mut chars = code.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => OperatingMode::from_code(c)
            .ok_or_else(|| Error::Parse(format!("unknown mode code {c:?}"))),
        _ => Err(Error::Parse(format!(
            "mode reply {parameter:?} is not a single mode code"
        ))),
    }
}

/// Build a "set display colour" command (`EX006{code};`).
pub fn cmd_set_display_colour(colour: DisplayColour) -> Vec<u8> {
    encode_command(
        "EX",
        &format!("{MENU_DISPLAY_COLOUR}{}", colour.code()),
    )
}

// ---------------------------------------------------------------
// Clock
// ---------------------------------------------------------------

/// `DT` sub-commands.
const DT_DATE: char = '0';
const DT_TIME: char = '1';
const DT_TIMEZONE: char = '2';

pub fn cmd_read_date() -> Vec<u8> {
    encode_command("DT", "0")
}

pub fn cmd_read_time() -> Vec<u8> {
    encode_command("DT", "1")
}

pub fn cmd_read_timezone() -> Vec<u8> {
    encode_command("DT", "2")
}

/// Build a "set date" command (`DT0{YYYYMMDD};`).
pub fn cmd_set_date(now: &DateTime<Utc>) -> Vec<u8> {
    encode_command("DT", &format!("{DT_DATE}{}", now.format("%Y%m%d")))
}

/// Build a "set time" command (`DT1{HHMMSS};`).
pub fn cmd_set_time(now: &DateTime<Utc>) -> Vec<u8> {
    encode_command("DT", &format!("{DT_TIME}{}", now.format("%H%M%S")))
}

/// Build a "set timezone to UTC" command (`DT2+0000;`).
pub fn cmd_set_timezone_utc() -> Vec<u8> {
    encode_command("DT", &format!("{DT_TIMEZONE}+0000"))
}

/// Parse the parameter of a `DT0` reply into the `YYYYMMDD` date.
pub fn parse_date_response(parameter: &str) -> Result<String> {
    strip_sub_command(parameter, DT_DATE).map(str::to_string)
}

/// Parse the parameter of a `DT1` reply into the `HHMMSS` time.
pub fn parse_time_response(parameter: &str) -> Result<String> {
    strip_sub_command(parameter, DT_TIME).map(str::to_string)
}

/// Parse the parameter of a `DT2` reply into the `+HHMM` UTC offset.
pub fn parse_timezone_response(parameter: &str) -> Result<String> {
    strip_sub_command(parameter, DT_TIMEZONE).map(str::to_string)
}

// ---------------------------------------------------------------
// Reply helpers
// ---------------------------------------------------------------

/// Remove the one-character sub-command the radio echoes at the start of
/// the parameter.
pub fn strip_sub_command(parameter: &str, sub: char) -> Result<&str> {
    parameter.strip_prefix(sub).ok_or_else(|| {
        Error::Parse(format!(
            "reply parameter {parameter:?} does not start with sub-command {sub:?}"
        ))
    })
}

/// Check that a reply echoes the command that was sent.
pub fn expect_command(response: &ParsedResponse, command: &str) -> Result<()> {
    if response.command == command {
        Ok(())
    } else {
        Err(Error::Parse(format!(
            "expected a {command} reply, got {:?}",
            response.command
        )))
    }
}

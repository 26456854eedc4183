//! FT-991A CAT text-protocol encoder/decoder.
//!
//! The CAT protocol uses semicolon-terminated ASCII frames over a serial
//! link. There is no binary preamble, no addressing and no checksum.
//!
//! # Frame format
//!
//! ```text
//! <command><parameter>;
//! ```
//!
//! - `command`: two uppercase ASCII letters (`FA`, `MC`, `MR`, `DT`, ...).
//!   Some commands carry a sub-command digit or menu number that is sent
//!   as the start of the parameter (`MD0`, `DT1`, `EX006`).
//! - `parameter`: zero or more ASCII characters, fixed width per command.
//! - Terminator: `;` (0x3B).
//!
//! Replies echo the two-letter command. A command the radio cannot execute
//! is answered with `?;`.

use bytes::{BufMut, BytesMut};

use catsu_core::{Error, Result};

/// CAT command/response terminator byte.
pub const TERMINATOR: u8 = b';';

/// Error response from the radio: `?;`.
pub const ERROR_RESPONSE: &[u8] = b"?;";

/// Width of the command code at the start of every reply.
pub const COMMAND_LEN: usize = 2;

/// A reply split into its command code and parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResponse {
    /// Two-character command code (e.g. `"FA"`, `"MR"`, `"DT"`).
    pub command: String,
    /// Everything after the command code, excluding the terminator.
    pub parameter: String,
}

/// Result of attempting to decode a CAT reply from a byte buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeResult {
    /// A complete reply was decoded. `consumed` counts the bytes used from
    /// the input, terminator included.
    Response {
        response: ParsedResponse,
        consumed: usize,
    },

    /// The radio returned `?;`. Carries the number of bytes consumed.
    Error(usize),

    /// A terminated frame that is not plain ASCII (line noise, wrong baud
    /// rate). Carries the number of bytes consumed.
    Malformed(usize),

    /// The buffer does not yet contain a terminator.
    Incomplete,
}

/// Encode a CAT command into raw bytes ready for transmission.
///
/// # Example
///
/// ```
/// use catsu::protocol::encode_command;
///
/// assert_eq!(encode_command("FA", ""), b"FA;");
/// assert_eq!(encode_command("FA", "014250000"), b"FA014250000;");
/// ```
pub fn encode_command(prefix: &str, params: &str) -> Vec<u8> {
    let mut buf = BytesMut::with_capacity(prefix.len() + params.len() + 1);
    buf.put_slice(prefix.as_bytes());
    buf.put_slice(params.as_bytes());
    buf.put_u8(TERMINATOR);
    buf.to_vec()
}

/// Check that a raw command ends with the terminator.
///
/// Returns [`Error::ProtocolFormat`] otherwise.
pub fn ensure_terminated(cmd: &[u8]) -> Result<()> {
    if cmd.last() == Some(&TERMINATOR) {
        Ok(())
    } else {
        Err(Error::ProtocolFormat(format!(
            "command {:?} does not end with ';'",
            String::from_utf8_lossy(cmd)
        )))
    }
}

/// Attempt to decode one CAT reply from a byte buffer.
///
/// Scans `buf` for the terminator and splits the bytes before it into a
/// two-character command code and the parameter.
///
/// # Example
///
/// ```
/// use catsu::protocol::{decode_response, DecodeResult};
///
/// match decode_response(b"FA014250000;") {
///     DecodeResult::Response { response, consumed } => {
///         assert_eq!(response.command, "FA");
///         assert_eq!(response.parameter, "014250000");
///         assert_eq!(consumed, 12);
///     }
///     other => panic!("expected Response, got {other:?}"),
/// }
/// ```
pub fn decode_response(buf: &[u8]) -> DecodeResult {
    let term_pos = match buf.iter().position(|&b| b == TERMINATOR) {
        Some(pos) => pos,
        None => return DecodeResult::Incomplete,
    };

    let consumed = term_pos + 1;
    let body = &buf[..term_pos];

    if body == b"?" {
        return DecodeResult::Error(consumed);
    }

    // Replies are plain ASCII.
    let body_str = match std::str::from_utf8(body) {
        Ok(s) if s.is_ascii() => s,
        _ => return DecodeResult::Malformed(consumed),
    };

    let split = COMMAND_LEN.min(body_str.len());
    DecodeResult::Response {
        response: ParsedResponse {
            command: body_str[..split].to_string(),
            parameter: body_str[split..].to_string(),
        },
        consumed,
    }
}

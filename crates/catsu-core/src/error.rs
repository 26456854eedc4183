//! Error types for catsu.
//!
//! All fallible operations across the workspace return [`Result<T>`], which
//! uses [`Error`] as the error type. Argument validation, reply decoding,
//! command framing, and serial transport failures are all captured here.

/// The error type for all catsu operations.
///
/// Argument and framing errors are raised before any I/O is attempted.
/// Transport-category errors ([`Error::is_transport`]) come from the serial
/// link itself.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A caller-supplied value violates a documented constraint (bad VFO
    /// letter, channel out of range, unknown mode or colour name, frequency
    /// wider than nine digits).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A human-readable frequency or a reply from the radio could not be
    /// decoded into the expected shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// A raw command was not terminated with `;`.
    #[error("protocol format error: {0}")]
    ProtocolFormat(String),

    /// The radio answered `?;`, rejecting the command.
    #[error("command rejected by radio: {0}")]
    Rejected(String),

    /// A transport-level error (port unavailable, oversized reply).
    #[error("transport error: {0}")]
    Transport(String),

    /// Timed out waiting for a byte from the radio.
    ///
    /// This typically indicates the radio is powered off, the baud rate is
    /// wrong, or the reply never reached its terminator.
    #[error("timeout waiting for response")]
    Timeout,

    /// No connection to the radio is open.
    #[error("not connected")]
    NotConnected,

    /// The connection to the radio was lost unexpectedly.
    #[error("connection lost")]
    ConnectionLost,

    /// An underlying I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error originated in the serial link rather than in
    /// argument validation or reply decoding.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Transport(_)
                | Error::Timeout
                | Error::NotConnected
                | Error::ConnectionLost
                | Error::Io(_)
        )
    }
}

/// A convenience `Result` alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_invalid_argument() {
        let e = Error::InvalidArgument("VFO C is not valid, expected A or B".into());
        assert_eq!(
            e.to_string(),
            "invalid argument: VFO C is not valid, expected A or B"
        );
    }

    #[test]
    fn error_display_parse() {
        let e = Error::Parse("'14.2.1M' is not a number".into());
        assert_eq!(e.to_string(), "parse error: '14.2.1M' is not a number");
    }

    #[test]
    fn error_display_protocol_format() {
        let e = Error::ProtocolFormat("missing terminator".into());
        assert_eq!(e.to_string(), "protocol format error: missing terminator");
    }

    #[test]
    fn error_display_rejected() {
        let e = Error::Rejected("MR005;".into());
        assert_eq!(e.to_string(), "command rejected by radio: MR005;");
    }

    #[test]
    fn error_display_transport() {
        let e = Error::Transport("port busy".into());
        assert_eq!(e.to_string(), "transport error: port busy");
    }

    #[test]
    fn error_display_timeout() {
        assert_eq!(Error::Timeout.to_string(), "timeout waiting for response");
    }

    #[test]
    fn error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe broken");
        let e: Error = io_err.into();
        assert!(matches!(e, Error::Io(_)));
        assert!(e.to_string().contains("pipe broken"));
    }

    #[test]
    fn transport_category() {
        assert!(Error::Transport("x".into()).is_transport());
        assert!(Error::Timeout.is_transport());
        assert!(Error::NotConnected.is_transport());
        assert!(Error::ConnectionLost.is_transport());
        assert!(Error::Io(std::io::Error::other("x")).is_transport());

        assert!(!Error::InvalidArgument("x".into()).is_transport());
        assert!(!Error::Parse("x".into()).is_transport());
        assert!(!Error::ProtocolFormat("x".into()).is_transport());
        assert!(!Error::Rejected("x".into()).is_transport());
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}
        assert_send::<Error>();
        assert_sync::<Error>();
    }
}

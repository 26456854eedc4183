//! Ft991a -- the CAT client for the Yaesu FT-991A.
//!
//! Ties the protocol codec ([`protocol`], [`commands`]) to a [`Connector`].
//! Every operation opens a fresh connection, writes one command, optionally
//! reads the reply, and closes the connection again before returning,
//! whether or not the exchange succeeded. Input is validated before the
//! connection is opened.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use catsu_core::error::{Error, Result};
use catsu_core::transport::{ConnectionConfig, Connector, Transport};

use crate::commands;
use crate::memory::{MemoryChannelRecord, MEMORY_RECORD_LEN};
use crate::protocol::{self, DecodeResult, ParsedResponse, TERMINATOR};
use crate::types::{DateTimeRecord, DisplayColour, OperatingMode, Vfo};

/// What to read back after writing a command.
#[derive(Debug, Clone, Copy)]
enum Reply {
    /// Set commands: the FT-991A does not answer them.
    None,
    /// Exactly this many bytes.
    Exact(usize),
    /// Byte by byte up to and including the terminator.
    Frame,
}

/// A Yaesu FT-991A controlled over CAT.
///
/// Constructed via [`Ft991aBuilder`](crate::builder::Ft991aBuilder) or
/// [`Ft991a::new`]. Construction performs no I/O.
///
/// A client can be shared between tasks; operations are serialised so
/// frames from two callers never interleave on the serial line. An
/// operation that needs more than one command, such as
/// [`read_memory_channel`](Self::read_memory_channel), holds the line for
/// all of them.
pub struct Ft991a {
    config: ConnectionConfig,
    connector: Arc<dyn Connector>,
    read_timeout: Duration,
    max_response_len: usize,
    /// Held for the whole open-write-read-close cycle.
    io_lock: Mutex<()>,
}

impl Ft991a {
    /// Default timeout for each byte of a reply.
    pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(500);

    /// Default cap on the length of a reply, terminator included.
    pub const DEFAULT_MAX_RESPONSE_LEN: usize = 128;

    /// A client for the radio on `port` at `baud_rate`, using the serial
    /// transport and default timeouts.
    pub fn new(port: &str, baud_rate: u32) -> Self {
        Ft991a::with_connector(
            ConnectionConfig::new(port, baud_rate),
            Arc::new(catsu_transport::SerialConnector::new()),
            Self::DEFAULT_READ_TIMEOUT,
            Self::DEFAULT_MAX_RESPONSE_LEN,
        )
    }

    pub(crate) fn with_connector(
        config: ConnectionConfig,
        connector: Arc<dyn Connector>,
        read_timeout: Duration,
        max_response_len: usize,
    ) -> Self {
        Ft991a {
            config,
            connector,
            read_timeout,
            max_response_len,
            io_lock: Mutex::new(()),
        }
    }

    /// The port and baud rate this client connects with.
    pub fn connection_config(&self) -> &ConnectionConfig {
        &self.config
    }

    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    pub fn max_response_len(&self) -> usize {
        self.max_response_len
    }

    // ---------------------------------------------------------------
    // Connection cycle
    // ---------------------------------------------------------------

    /// Take the line, then run one connection cycle.
    async fn transact(&self, cmd: &[u8], reply: Reply) -> Result<Vec<u8>> {
        let _guard = self.io_lock.lock().await;
        self.cycle(cmd, reply).await
    }

    /// Open a connection, write `cmd`, read `reply`, and close.
    ///
    /// The caller must hold `io_lock`. The connection is closed on every
    /// path. A close failure is reported only if the exchange itself
    /// succeeded.
    async fn cycle(&self, cmd: &[u8], reply: Reply) -> Result<Vec<u8>> {
        let mut transport = self.connector.connect(&self.config).await?;
        let result = self.exchange(transport.as_mut(), cmd, reply).await;

        if let Err(close_err) = transport.close().await {
            if result.is_ok() {
                return Err(close_err);
            }
            warn!(port = %self.config.port, error = %close_err, "failed to close port after error");
        }
        result
    }

    async fn exchange(
        &self,
        transport: &mut dyn Transport,
        cmd: &[u8],
        reply: Reply,
    ) -> Result<Vec<u8>> {
        transport.send(cmd).await?;
        match reply {
            Reply::None => Ok(Vec::new()),
            Reply::Exact(len) => self.read_exact(transport, len).await,
            Reply::Frame => self.read_frame(transport).await,
        }
    }

    /// Read exactly `len` bytes.
    ///
    /// If the radio stops after sending `?;` the command was rejected.
    async fn read_exact(&self, transport: &mut dyn Transport, len: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        let mut filled = 0;
        while filled < len {
            match transport.receive(&mut buf[filled..], self.read_timeout).await {
                Ok(0) => return Err(Error::ConnectionLost),
                Ok(n) => filled += n,
                Err(Error::Timeout) if &buf[..filled] == protocol::ERROR_RESPONSE => {
                    return Err(Error::Rejected(String::from_utf8_lossy(&buf[..filled]).into()));
                }
                Err(e) => return Err(e),
            }
        }
        Ok(buf)
    }

    /// Read one byte at a time until the terminator.
    ///
    /// Reply length varies by command, so this is the general read. Each
    /// byte must arrive within the read timeout and the whole reply must fit
    /// in the maximum response length.
    async fn read_frame(&self, transport: &mut dyn Transport) -> Result<Vec<u8>> {
        let mut frame = Vec::with_capacity(32);
        let mut byte = [0u8; 1];
        loop {
            let n = transport.receive(&mut byte, self.read_timeout).await?;
            if n == 0 {
                return Err(Error::ConnectionLost);
            }
            frame.push(byte[0]);
            if byte[0] == TERMINATOR {
                return Ok(frame);
            }
            if frame.len() >= self.max_response_len {
                return Err(Error::Transport(format!(
                    "no terminator within {} bytes of reply",
                    self.max_response_len
                )));
            }
        }
    }

    /// Send a command that gets no reply.
    async fn execute_set_command(&self, cmd: &[u8]) -> Result<()> {
        protocol::ensure_terminated(cmd)?;
        self.transact(cmd, Reply::None).await?;
        Ok(())
    }

    /// Send a command and decode its reply.
    async fn execute_command(&self, cmd: &[u8]) -> Result<ParsedResponse> {
        protocol::ensure_terminated(cmd)?;
        let frame = self.transact(cmd, Reply::Frame).await?;
        decode_reply(cmd, &frame)
    }

    // ---------------------------------------------------------------
    // Raw commands
    // ---------------------------------------------------------------

    /// Send a raw command such as `"FA014250000;"`. No reply is read.
    ///
    /// Fails with [`Error::ProtocolFormat`] before opening the port if `cmd`
    /// does not end with `;`.
    pub async fn send_command(&self, cmd: &str) -> Result<()> {
        debug!(cmd, "sending raw command");
        self.execute_set_command(cmd.as_bytes()).await
    }

    /// Send a raw command and read its reply up to the terminator.
    pub async fn read_command(&self, cmd: &str) -> Result<ParsedResponse> {
        debug!(cmd, "sending raw query");
        self.execute_command(cmd.as_bytes()).await
    }

    // ---------------------------------------------------------------
    // Frequency
    // ---------------------------------------------------------------

    /// Read a VFO frequency in hertz.
    pub async fn read_vfo_frequency(&self, vfo: Vfo) -> Result<u64> {
        debug!(vfo = %vfo, "reading frequency");
        let cmd = commands::cmd_read_frequency(vfo);
        let reply = self
            .transact(&cmd, Reply::Exact(commands::FREQUENCY_REPLY_LEN))
            .await?;
        commands::parse_frequency_reply(vfo, &reply)
    }

    pub async fn read_vfo_a(&self) -> Result<u64> {
        self.read_vfo_frequency(Vfo::A).await
    }

    pub async fn read_vfo_b(&self) -> Result<u64> {
        self.read_vfo_frequency(Vfo::B).await
    }

    /// Set a VFO frequency in hertz (at most 999 999 999).
    pub async fn set_frequency_hz(&self, vfo: Vfo, freq_hz: u64) -> Result<()> {
        let cmd = commands::cmd_set_frequency(vfo, freq_hz)?;
        debug!(vfo = %vfo, freq_hz, "setting frequency");
        self.execute_set_command(&cmd).await
    }

    /// Set a VFO frequency from text like `"145.5M"`, `"14313K"` or
    /// `"7127000"`. See [`commands::parse_human_frequency`].
    pub async fn set_frequency_human_readable(&self, vfo: Vfo, text: &str) -> Result<()> {
        let freq_hz = commands::parse_human_frequency(text)?;
        self.set_frequency_hz(vfo, freq_hz).await
    }

    // ---------------------------------------------------------------
    // Memory channels
    // ---------------------------------------------------------------

    /// Read the number of the selected memory channel.
    pub async fn get_current_memory_channel(&self) -> Result<u16> {
        let response = self
            .execute_command(&commands::cmd_read_memory_channel_number())
            .await?;
        commands::expect_command(&response, "MC")?;
        commands::parse_memory_channel_number(&response.parameter)
    }

    /// Select memory channel 1-117.
    pub async fn set_current_memory_channel(&self, channel: u16) -> Result<()> {
        let cmd = commands::cmd_set_memory_channel(channel)?;
        debug!(channel, "selecting memory channel");
        self.execute_set_command(&cmd).await
    }

    /// Store VFO-A in the selected memory channel.
    pub async fn vfo_a_to_memory_channel(&self) -> Result<()> {
        debug!("storing VFO-A to memory");
        self.execute_set_command(&commands::cmd_vfo_a_to_memory())
            .await
    }

    /// Read the contents of memory channel 1-117.
    ///
    /// The channel is selected first; `MR` does not select it by itself.
    /// Returns `Ok(None)` if the channel has not been programmed (the radio
    /// rejects the read, or the reply is shorter than a full record).
    /// A full-length record that does not decode is [`Error::Parse`].
    pub async fn read_memory_channel(&self, channel: u16) -> Result<Option<MemoryChannelRecord>> {
        let select = commands::cmd_set_memory_channel(channel)?;
        let cmd = commands::cmd_read_memory_channel(channel)?;

        debug!(channel, "reading memory channel");
        let frame = {
            let _guard = self.io_lock.lock().await;
            self.cycle(&select, Reply::None).await?;
            self.cycle(&cmd, Reply::Frame).await?
        };
        let response = match decode_reply(&cmd, &frame) {
            Ok(response) => response,
            Err(Error::Rejected(_)) => {
                debug!(channel, "memory channel not programmed");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        commands::expect_command(&response, "MR")?;

        if response.parameter.len() < MEMORY_RECORD_LEN {
            debug!(
                channel,
                parameter = %response.parameter,
                "short memory record, channel not programmed"
            );
            return Ok(None);
        }
        MemoryChannelRecord::decode(&response.parameter).map(Some)
    }

    // ---------------------------------------------------------------
    // Mode and menu
    // ---------------------------------------------------------------

    pub async fn set_operating_mode(&self, mode: OperatingMode) -> Result<()> {
        debug!(mode = %mode, "setting mode");
        self.execute_set_command(&commands::cmd_set_mode(mode))
            .await
    }

    pub async fn read_operating_mode(&self) -> Result<OperatingMode> {
        let response = self.execute_command(&commands::cmd_read_mode()).await?;
        commands::expect_command(&response, "MD")?;
        commands::parse_mode_response(&response.parameter)
    }

    pub async fn set_display_colour(&self, colour: DisplayColour) -> Result<()> {
        debug!(colour = %colour, "setting display colour");
        self.execute_set_command(&commands::cmd_set_display_colour(colour))
            .await
    }

    // ---------------------------------------------------------------
    // Clock
    // ---------------------------------------------------------------

    /// Read the radio's date, time and UTC offset.
    ///
    /// The radio may report the value its clock was last set to rather
    /// than the true current time.
    pub async fn read_date_and_time(&self) -> Result<DateTimeRecord> {
        let date = self.execute_command(&commands::cmd_read_date()).await?;
        commands::expect_command(&date, "DT")?;
        let time = self.execute_command(&commands::cmd_read_time()).await?;
        commands::expect_command(&time, "DT")?;
        let timezone = self.execute_command(&commands::cmd_read_timezone()).await?;
        commands::expect_command(&timezone, "DT")?;

        Ok(DateTimeRecord {
            date: commands::parse_date_response(&date.parameter)?,
            time: commands::parse_time_response(&time.parameter)?,
            timezone: commands::parse_timezone_response(&timezone.parameter)?,
        })
    }

    /// Set the radio clock to the current UTC time, timezone `+0000`.
    ///
    /// Date, time and timezone are three separate commands. If one fails
    /// the ones before it have already taken effect.
    pub async fn set_date_and_time(&self) -> Result<()> {
        self.set_date_and_time_to(Utc::now()).await
    }

    /// Set the radio clock to `now`, timezone `+0000`. Not atomic, as
    /// [`set_date_and_time`](Self::set_date_and_time).
    pub async fn set_date_and_time_to(&self, now: DateTime<Utc>) -> Result<()> {
        debug!(now = %now, "setting radio clock");
        self.execute_set_command(&commands::cmd_set_date(&now))
            .await?;
        self.execute_set_command(&commands::cmd_set_time(&now))
            .await?;
        self.execute_set_command(&commands::cmd_set_timezone_utc())
            .await
    }
}

/// Decode a reply frame to `cmd`.
///
/// `?;` is [`Error::Rejected`]; a frame that is not plain ASCII is
/// [`Error::Parse`].
fn decode_reply(cmd: &[u8], frame: &[u8]) -> Result<ParsedResponse> {
    match protocol::decode_response(frame) {
        DecodeResult::Response { response, .. } => Ok(response),
        DecodeResult::Error(_) => Err(Error::Rejected(
            String::from_utf8_lossy(cmd).into_owned(),
        )),
        DecodeResult::Malformed(_) => Err(Error::Parse(format!(
            "reply {:?} to {:?} is not ASCII",
            String::from_utf8_lossy(frame),
            String::from_utf8_lossy(cmd)
        ))),
        DecodeResult::Incomplete => Err(Error::Parse(format!(
            "unterminated reply {:?}",
            String::from_utf8_lossy(frame)
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catsu_test_harness::MockConnector;
    use chrono::TimeZone;

    fn make_test_radio(mock: &MockConnector) -> Ft991a {
        Ft991a::with_connector(
            ConnectionConfig::new("/dev/ttyUSB0", 38_400),
            Arc::new(mock.clone()),
            Duration::from_millis(50),
            Ft991a::DEFAULT_MAX_RESPONSE_LEN,
        )
    }

    /// Every connection opened was closed again.
    fn assert_all_closed(mock: &MockConnector) {
        assert_eq!(mock.connect_count(), mock.close_count());
    }

    // -----------------------------------------------------------------
    // send_command / read_command
    // -----------------------------------------------------------------

    #[tokio::test]
    async fn test_send_command() {
        let mock = MockConnector::new();
        mock.expect_send(b"FA014250000;");

        let radio = make_test_radio(&mock);
        radio.send_command("FA014250000;").await.unwrap();

        assert_eq!(mock.sent_commands(), vec!["FA014250000;"]);
        assert_eq!(mock.connect_count(), 1);
        assert_all_closed(&mock);
        assert_eq!(
            mock.last_config(),
            Some(ConnectionConfig::new("/dev/ttyUSB0", 38_400))
        );
    }

    #[tokio::test]
    async fn test_send_command_without_terminator() {
        let mock = MockConnector::new();
        let radio = make_test_radio(&mock);

        let err = radio.send_command("FA014250000").await.unwrap_err();
        assert!(matches!(err, Error::ProtocolFormat(_)));
        assert!(mock.sent_data().is_empty());
        assert_eq!(mock.connect_count(), 0);
    }

    #[tokio::test]
    async fn test_read_command_splits_reply() {
        let mock = MockConnector::new();
        mock.expect(b"MC;", b"MC042;");

        let radio = make_test_radio(&mock);
        let response = radio.read_command("MC;").await.unwrap();
        assert_eq!(response.command, "MC");
        assert_eq!(response.parameter, "042");
        assert_all_closed(&mock);
    }

    #[tokio::test]
    async fn test_read_command_without_terminator_is_rejected_before_io() {
        let mock = MockConnector::new();
        let radio = make_test_radio(&mock);

        let err = radio.read_command("MC").await.unwrap_err();
        assert!(matches!(err, Error::ProtocolFormat(_)));
        assert_eq!(mock.connect_count(), 0);
    }

    #[tokio::test]
    async fn test_read_command_terminator_never_arrives() {
        let mock = MockConnector::new();
        mock.expect(b"MC;", b"MC04");

        let radio = make_test_radio(&mock);
        let err = radio.read_command("MC;").await.unwrap_err();
        assert!(matches!(err, Error::Timeout));
        assert!(err.is_transport());
        assert_all_closed(&mock);
    }

    #[tokio::test]
    async fn test_read_command_reply_over_cap() {
        let mock = MockConnector::new();
        mock.expect(b"MC;", &[b'0'; 512]);

        let radio = make_test_radio(&mock);
        let err = radio.read_command("MC;").await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
        assert_all_closed(&mock);
    }

    #[tokio::test]
    async fn test_read_command_rejected() {
        let mock = MockConnector::new();
        mock.expect(b"ZZ;", b"?;");

        let radio = make_test_radio(&mock);
        let err = radio.read_command("ZZ;").await.unwrap_err();
        assert!(matches!(err, Error::Rejected(_)));
        assert!(!err.is_transport());
    }

    #[tokio::test]
    async fn test_read_command_line_noise_is_parse_error() {
        let mock = MockConnector::new();
        mock.expect(b"FA;", b"FA\xFF;");

        let radio = make_test_radio(&mock);
        let err = radio.read_command("FA;").await.unwrap_err();
        assert!(matches!(err, Error::Parse(_)), "got {err:?}");
        assert_all_closed(&mock);
    }

    #[tokio::test]
    async fn test_connect_failure_is_transport_error() {
        let mock = MockConnector::new();
        mock.fail_next_connect();

        let radio = make_test_radio(&mock);
        let err = radio.send_command("AM;").await.unwrap_err();
        assert!(err.is_transport());
        assert!(mock.sent_data().is_empty());
    }

    #[tokio::test]
    async fn test_write_failure_still_closes() {
        let mock = MockConnector::new();
        mock.expect_send(b"AM;");
        mock.fail_next_send();

        let radio = make_test_radio(&mock);
        let err = radio.vfo_a_to_memory_channel().await.unwrap_err();
        assert!(matches!(err, Error::ConnectionLost));
        assert_eq!(mock.connect_count(), 1);
        assert_all_closed(&mock);
    }

    #[tokio::test]
    async fn test_each_operation_opens_its_own_connection() {
        let mock = MockConnector::new();
        mock.expect_send(b"AM;");
        mock.expect_send(b"AM;");
        mock.expect(b"FA;", b"FA007074000;");

        let radio = make_test_radio(&mock);
        radio.vfo_a_to_memory_channel().await.unwrap();
        radio.vfo_a_to_memory_channel().await.unwrap();
        radio.read_vfo_a().await.unwrap();

        assert_eq!(mock.connect_count(), 3);
        assert_all_closed(&mock);
    }

    // -----------------------------------------------------------------
    // Frequency
    // -----------------------------------------------------------------

    #[tokio::test]
    async fn test_read_vfo_a() {
        let mock = MockConnector::new();
        mock.expect(b"FA;", b"FA014250000;");

        let radio = make_test_radio(&mock);
        assert_eq!(radio.read_vfo_a().await.unwrap(), 14_250_000);
        assert_all_closed(&mock);
    }

    #[tokio::test]
    async fn test_read_vfo_b() {
        let mock = MockConnector::new();
        mock.expect(b"FB;", b"FB145500000;");

        let radio = make_test_radio(&mock);
        assert_eq!(radio.read_vfo_b().await.unwrap(), 145_500_000);
    }

    #[tokio::test]
    async fn test_read_vfo_frequency_rejected() {
        let mock = MockConnector::new();
        mock.expect(b"FB;", b"?;");

        let radio = make_test_radio(&mock);
        let err = radio.read_vfo_frequency(Vfo::B).await.unwrap_err();
        assert!(matches!(err, Error::Rejected(_)));
    }

    #[tokio::test]
    async fn test_read_vfo_frequency_short_reply_times_out() {
        let mock = MockConnector::new();
        mock.expect(b"FA;", b"FA01425");

        let radio = make_test_radio(&mock);
        let err = radio.read_vfo_a().await.unwrap_err();
        assert!(matches!(err, Error::Timeout));
    }

    #[tokio::test]
    async fn test_read_vfo_frequency_garbled_reply() {
        let mock = MockConnector::new();
        mock.expect(b"FA;", b"FA01425X000;");

        let radio = make_test_radio(&mock);
        let err = radio.read_vfo_a().await.unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[tokio::test]
    async fn test_set_frequency_hz_pads_to_nine_digits() {
        let cases = [
            (Vfo::A, 0, "FA000000000;"),
            (Vfo::A, 7_074_000, "FA007074000;"),
            (Vfo::B, 14_250_000, "FB014250000;"),
            (Vfo::B, 999_999_999, "FB999999999;"),
        ];
        for (vfo, hz, expected) in cases {
            let mock = MockConnector::new();
            mock.expect_send(expected.as_bytes());

            let radio = make_test_radio(&mock);
            radio.set_frequency_hz(vfo, hz).await.unwrap();
            assert_eq!(mock.sent_commands(), vec![expected]);
        }
    }

    #[tokio::test]
    async fn test_set_frequency_hz_too_wide() {
        let mock = MockConnector::new();
        let radio = make_test_radio(&mock);

        let err = radio
            .set_frequency_hz(Vfo::A, 1_000_000_000)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(mock.sent_data().is_empty());
        assert_eq!(mock.connect_count(), 0);
    }

    #[tokio::test]
    async fn test_set_frequency_human_readable_matches_hz() {
        let cases = [
            ("14313K", 14_313_000),
            ("145.5M", 145_500_000),
            ("7127000", 7_127_000),
        ];
        for (text, hz) in cases {
            let expected = commands::cmd_set_frequency(Vfo::A, hz).unwrap();
            let mock = MockConnector::new();
            mock.expect_send(&expected);

            let radio = make_test_radio(&mock);
            radio
                .set_frequency_human_readable(Vfo::A, text)
                .await
                .unwrap();
            assert_eq!(mock.sent_data(), vec![expected]);
        }
    }

    #[tokio::test]
    async fn test_set_frequency_human_readable_bad_text() {
        let mock = MockConnector::new();
        let radio = make_test_radio(&mock);

        let err = radio
            .set_frequency_human_readable(Vfo::B, "fourteen")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
        assert_eq!(mock.connect_count(), 0);
    }

    // -----------------------------------------------------------------
    // Memory channels
    // -----------------------------------------------------------------

    #[tokio::test]
    async fn test_get_current_memory_channel() {
        let mock = MockConnector::new();
        mock.expect(b"MC;", b"MC017;");

        let radio = make_test_radio(&mock);
        assert_eq!(radio.get_current_memory_channel().await.unwrap(), 17);
    }

    #[tokio::test]
    async fn test_get_current_memory_channel_wrong_reply() {
        let mock = MockConnector::new();
        mock.expect(b"MC;", b"FA014250000;");

        let radio = make_test_radio(&mock);
        let err = radio.get_current_memory_channel().await.unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[tokio::test]
    async fn test_set_current_memory_channel_bounds() {
        let mock = MockConnector::new();
        mock.expect_send(b"MC001;");
        mock.expect_send(b"MC117;");

        let radio = make_test_radio(&mock);
        for channel in [0, 118] {
            let err = radio.set_current_memory_channel(channel).await.unwrap_err();
            assert!(matches!(err, Error::InvalidArgument(_)));
        }
        assert_eq!(mock.connect_count(), 0);

        radio.set_current_memory_channel(1).await.unwrap();
        radio.set_current_memory_channel(117).await.unwrap();
        assert_eq!(mock.sent_commands(), vec!["MC001;", "MC117;"]);
    }

    #[tokio::test]
    async fn test_vfo_a_to_memory_channel() {
        let mock = MockConnector::new();
        mock.expect_send(b"AM;");

        let radio = make_test_radio(&mock);
        radio.vfo_a_to_memory_channel().await.unwrap();
        assert_eq!(mock.sent_commands(), vec!["AM;"]);
    }

    #[tokio::test]
    async fn test_read_memory_channel() {
        let mock = MockConnector::new();
        mock.expect_send(b"MC001;");
        mock.expect(b"MR001;", b"MR001014250000+000000210000;");

        let radio = make_test_radio(&mock);
        let record = radio.read_memory_channel(1).await.unwrap().unwrap();
        assert_eq!(record.channel, "001");
        assert_eq!(record.frequency_hz(), 14_250_000);
        assert_eq!(record.clarifier_sign, "+");
        assert_eq!(record.operating_mode(), Some(OperatingMode::Usb));
        assert_eq!(mock.sent_commands(), vec!["MC001;", "MR001;"]);
        assert_eq!(mock.connect_count(), 2);
        assert_all_closed(&mock);
    }

    #[tokio::test]
    async fn test_read_memory_channel_unprogrammed() {
        let mock = MockConnector::new();
        mock.expect_send(b"MC042;");
        mock.expect(b"MR042;", b"?;");

        let radio = make_test_radio(&mock);
        assert_eq!(radio.read_memory_channel(42).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_read_memory_channel_short_record_is_absent() {
        let mock = MockConnector::new();
        mock.expect_send(b"MC002;");
        mock.expect(b"MR002;", b"MR00200700;");

        let radio = make_test_radio(&mock);
        assert_eq!(radio.read_memory_channel(2).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_read_memory_channel_garbled_record_is_error() {
        let mock = MockConnector::new();
        mock.expect_send(b"MC003;");
        mock.expect(b"MR003;", b"MR003XXXXXXXXX+000000210000;");

        let radio = make_test_radio(&mock);
        let err = radio.read_memory_channel(3).await.unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[tokio::test]
    async fn test_read_memory_channel_non_ascii_record_is_error() {
        let mock = MockConnector::new();
        mock.expect_send(b"MC001;");
        mock.expect(b"MR001;", b"MR001\xFF14250000+000000210000;");

        let radio = make_test_radio(&mock);
        let err = radio.read_memory_channel(1).await.unwrap_err();
        assert!(matches!(err, Error::Parse(_)), "got {err:?}");
        assert_eq!(mock.remaining_expectations(), 0);
    }

    #[tokio::test]
    async fn test_read_memory_channel_holds_line_for_select_and_read() {
        let mock = MockConnector::new();
        mock.expect_send(b"MC001;");
        mock.expect(b"MR001;", b"MR001014250000+000000210000;");
        mock.expect_send(b"MC005;");

        let radio = make_test_radio(&mock);
        let (record, selected) = tokio::join!(
            radio.read_memory_channel(1),
            radio.set_current_memory_channel(5)
        );
        assert_eq!(record.unwrap().unwrap().channel_number(), 1);
        selected.unwrap();
        assert_eq!(mock.sent_commands(), vec!["MC001;", "MR001;", "MC005;"]);
        assert_all_closed(&mock);
    }

    #[tokio::test]
    async fn test_read_memory_channel_select_failure_skips_read() {
        let mock = MockConnector::new();
        mock.expect_send(b"MC001;");
        mock.fail_next_send();

        let radio = make_test_radio(&mock);
        let err = radio.read_memory_channel(1).await.unwrap_err();
        assert!(matches!(err, Error::ConnectionLost));
        assert_eq!(mock.connect_count(), 1);
        assert_all_closed(&mock);
    }

    #[tokio::test]
    async fn test_read_memory_channel_transport_failure_propagates() {
        let mock = MockConnector::new();
        mock.expect_send(b"MC004;");
        mock.expect(b"MR004;", b"MR004014");

        let radio = make_test_radio(&mock);
        let err = radio.read_memory_channel(4).await.unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_read_memory_channel_out_of_range() {
        let mock = MockConnector::new();
        let radio = make_test_radio(&mock);

        let err = radio.read_memory_channel(118).await.unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert_eq!(mock.connect_count(), 0);
    }

    // -----------------------------------------------------------------
    // Mode and menu
    // -----------------------------------------------------------------

    #[tokio::test]
    async fn test_set_operating_mode() {
        let mock = MockConnector::new();
        mock.expect_send(b"MD04;");

        let radio = make_test_radio(&mock);
        let mode: OperatingMode = "FM".parse().unwrap();
        radio.set_operating_mode(mode).await.unwrap();
        assert_eq!(mock.sent_commands(), vec!["MD04;"]);
    }

    #[tokio::test]
    async fn test_unknown_mode_sends_nothing() {
        let mock = MockConnector::new();
        let radio = make_test_radio(&mock);

        let result = async {
            let mode: OperatingMode = "SSB".parse()?;
            radio.set_operating_mode(mode).await
        }
        .await;
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
        assert_eq!(mock.connect_count(), 0);
    }

    #[tokio::test]
    async fn test_read_operating_mode() {
        let mock = MockConnector::new();
        mock.expect(b"MD0;", b"MD0C;");

        let radio = make_test_radio(&mock);
        assert_eq!(
            radio.read_operating_mode().await.unwrap(),
            OperatingMode::DataUsb
        );
    }

    #[tokio::test]
    async fn test_set_display_colour() {
        let mock = MockConnector::new();
        mock.expect_send(b"EX0066;");

        let radio = make_test_radio(&mock);
        radio
            .set_display_colour(DisplayColour::SkyBlue)
            .await
            .unwrap();
        assert_eq!(mock.sent_commands(), vec!["EX0066;"]);
    }

    // -----------------------------------------------------------------
    // Clock
    // -----------------------------------------------------------------

    #[tokio::test]
    async fn test_read_date_and_time() {
        let mock = MockConnector::new();
        mock.expect(b"DT0;", b"DT020261018;");
        mock.expect(b"DT1;", b"DT1213045;");
        mock.expect(b"DT2;", b"DT2+0000;");

        let radio = make_test_radio(&mock);
        let clock = radio.read_date_and_time().await.unwrap();
        assert_eq!(
            clock,
            DateTimeRecord {
                date: "20261018".into(),
                time: "213045".into(),
                timezone: "+0000".into(),
            }
        );
        assert_eq!(mock.connect_count(), 3);
        assert_all_closed(&mock);
    }

    #[tokio::test]
    async fn test_set_date_and_time_to() {
        let mock = MockConnector::new();
        mock.expect_send(b"DT020261018;");
        mock.expect_send(b"DT1070809;");
        mock.expect_send(b"DT2+0000;");

        let radio = make_test_radio(&mock);
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 7, 8, 9).unwrap();
        radio.set_date_and_time_to(now).await.unwrap();
        assert_eq!(
            mock.sent_commands(),
            vec!["DT020261018;", "DT1070809;", "DT2+0000;"]
        );
    }

    #[tokio::test]
    async fn test_set_date_and_time_is_not_atomic() {
        let mock = MockConnector::new();
        // Only the date command is scripted, so the time command fails.
        mock.expect_send(b"DT020261018;");

        let radio = make_test_radio(&mock);
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 7, 8, 9).unwrap();
        let err = radio.set_date_and_time_to(now).await.unwrap_err();
        assert!(err.is_transport());

        // The date went out; the timezone was never sent.
        assert_eq!(mock.sent_commands(), vec!["DT020261018;", "DT1070809;"]);
        assert_eq!(mock.connect_count(), 2);
        assert_all_closed(&mock);
    }

    #[tokio::test]
    async fn test_set_date_and_time_connect_failure_sends_nothing() {
        let mock = MockConnector::new();
        mock.fail_next_connect();

        let radio = make_test_radio(&mock);
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 7, 8, 9).unwrap();
        assert!(radio.set_date_and_time_to(now).await.is_err());
        assert!(mock.sent_data().is_empty());
    }

    #[tokio::test]
    async fn test_set_date_and_time_uses_current_utc() {
        let mock = MockConnector::new();
        let radio = make_test_radio(&mock);

        let before = Utc::now().date_naive();
        // Nothing is scripted: the first write is logged and then fails.
        assert!(radio.set_date_and_time().await.is_err());
        let after = Utc::now().date_naive();

        let sent = mock.sent_commands();
        assert_eq!(sent.len(), 1);
        let candidates = [
            format!("DT0{};", before.format("%Y%m%d")),
            format!("DT0{};", after.format("%Y%m%d")),
        ];
        assert!(candidates.contains(&sent[0]), "unexpected {:?}", sent[0]);
    }
}

//! # WIFI access point client
//!
//! Joining a network is a best-effort sequence of AT, AT+CWMODE and AT+CWJAP. The outcome is not returned
//! as error, but can be queried by `is_associated()`.
//!
//! ## Example
//!
//! ````
//! # use esp_at_http::example::{ExampleSerial, ExampleTimer};
//! # use esp_at_http::wifi::{Adapter, WifiAdapter};
//! #
//! let mut adapter: Adapter<_, _, _, 1_000, 256, 256> =
//!     Adapter::new(ExampleSerial::default(), ExampleTimer::default(), ExampleTimer::default());
//!
//! // Joining the target WIFI access point
//! adapter.join("test_wifi", "secret").unwrap();
//! assert!(adapter.is_associated());
//!
//! // Leaving it again
//! adapter.disconnect().unwrap();
//! assert!(!adapter.is_associated());
//! ````
use crate::commands::{
    AccessPointConnectCommand, AccessPointDisconnectCommand, AttentionCommand, ExpectedTokens, WifiModeCommand,
};
use crate::config::{Config, RequestStrategy};
use crate::responses::Outcome;
use crate::serial::SerialTransport;
use atat::AtatCmd;
use core::fmt::Debug;
use embedded_io::ErrorKind;
use fugit::TimerDurationU32;
use fugit_timer::Timer;

/// Buffer size for rendering a single AT command
const COMMAND_BUFFER_SIZE: usize = 256;

/// Wifi network adapter trait
pub trait WifiAdapter {
    /// Error for failures of the serial link, the timer or invalid arguments
    type Error: Debug;

    /// Joins the given WIFI access point. Success is signaled by `is_associated()`.
    fn join(&mut self, ssid: &str, key: &str) -> Result<(), Self::Error>;

    /// Returns true if the last join succeeded and no disconnect happened since then
    fn is_associated(&self) -> bool;

    /// Leaves the current access point
    fn disconnect(&mut self) -> Result<(), Self::Error>;
}

/// Central client for network communication
///
/// TX_SIZE: Max. size of the HTTP request text in bytes.
///
/// RX_SIZE: Size of the buffer collecting a single command response. If a response is longer, the oldest
/// bytes get discarded.
///
/// Two timer instances are used: the clock just for `now()` and the delay just for pausing
/// (`start()` + `wait()`). So a timer whose `now()` restarts on `start()` works for both roles.
pub struct Adapter<
    S: SerialTransport,
    C: Timer<TIMER_HZ>,
    D: Timer<TIMER_HZ>,
    const TIMER_HZ: u32,
    const TX_SIZE: usize,
    const RX_SIZE: usize,
> {
    /// Serial link to the modem
    pub(crate) serial: S,

    /// Timer used for timeout measurement, never started
    pub(crate) clock: C,

    /// Timer used for pauses
    pub(crate) delay: D,

    /// Current configuration
    pub(crate) config: Config,

    /// Network state
    pub(crate) session: Session,
}

/// Network state shared by join and request handling
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct Session {
    /// True if the last join got an IP and no disconnect or new join happened since then
    associated: bool,
}

impl Session {
    pub(crate) fn set_associated(&mut self, associated: bool) {
        self.associated = associated;
    }

    pub(crate) fn is_associated(&self) -> bool {
        self.associated
    }
}

/// Failures which are not signaled by the modem itself
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// Reading from or writing to the serial link failed
    Serial(ErrorKind),

    /// Upstream timer error
    TimerError,

    /// Given SSID is longer then the max. size of 32 chars
    InvalidSsidLength,

    /// Given passphrase is longer then the max. size of 64 chars
    InvalidPassphraseLength,

    /// Given host is longer then the max. size of 64 chars
    InvalidHostLength,

    /// Port zero is not a valid remote port
    InvalidPort,

    /// Request text does not fit in TX_SIZE
    RequestTooLong,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::Serial(e) => defmt::write!(f, "Error::Serial({})", e),
            Error::TimerError => defmt::write!(f, "Error::TimerError"),
            Error::InvalidSsidLength => defmt::write!(f, "Error::InvalidSsidLength"),
            Error::InvalidPassphraseLength => defmt::write!(f, "Error::InvalidPassphraseLength"),
            Error::InvalidHostLength => defmt::write!(f, "Error::InvalidHostLength"),
            Error::InvalidPort => defmt::write!(f, "Error::InvalidPort"),
            Error::RequestTooLong => defmt::write!(f, "Error::RequestTooLong"),
        }
    }
}

/// Maps any serial error to its kind
pub(crate) fn serial_error<E: embedded_io::Error>(error: E) -> Error {
    Error::Serial(error.kind())
}

impl<
        S: SerialTransport,
        C: Timer<TIMER_HZ>,
        D: Timer<TIMER_HZ>,
        const TIMER_HZ: u32,
        const TX_SIZE: usize,
        const RX_SIZE: usize,
    >
    WifiAdapter for Adapter<S, C, D, TIMER_HZ, TX_SIZE, RX_SIZE>
{
    type Error = Error;

    /// Joins the given WIFI access point
    ///
    /// The outcomes of AT and AT+CWMODE are just checked in strict mode. The adapter is associated
    /// only if AT+CWJAP is answered by `WIFI GOT IP` in time.
    fn join(&mut self, ssid: &str, key: &str) -> Result<(), Error> {
        self.session.set_associated(false);
        let connect_command = AccessPointConnectCommand::new(ssid, key)?;

        let settings = self.config.serial;
        self.serial.configure(&settings).map_err(serial_error)?;

        let outcome = self.command(&AttentionCommand, self.config.timeouts.attention_ms)?;
        if !self.is_join_step_accepted(outcome) {
            return Ok(());
        }

        let outcome = self.command(&WifiModeCommand::station_mode(), self.config.timeouts.mode_ms)?;
        if !self.is_join_step_accepted(outcome) {
            return Ok(());
        }

        let outcome = self.command(&connect_command, self.config.timeouts.join_ms)?;
        self.session.set_associated(outcome == Outcome::MatchedFirst);

        debug!("Joined access point: {}", self.session.is_associated());
        Ok(())
    }

    fn is_associated(&self) -> bool {
        self.session.is_associated()
    }

    /// Sends AT+CWQAP. The adapter is unassociated afterwards, independent of the modem response.
    fn disconnect(&mut self) -> Result<(), Error> {
        let result = self.command(&AccessPointDisconnectCommand, self.config.timeouts.disconnect_ms);
        self.session.set_associated(false);

        let outcome = result?;
        debug!("Left access point: {:?}", outcome);
        Ok(())
    }
}

impl<
        S: SerialTransport,
        C: Timer<TIMER_HZ>,
        D: Timer<TIMER_HZ>,
        const TIMER_HZ: u32,
        const TX_SIZE: usize,
        const RX_SIZE: usize,
    >
    Adapter<S, C, D, TIMER_HZ, TX_SIZE, RX_SIZE>
{
    /// Creates a new network adapter with default configuration
    pub fn new(serial: S, clock: C, delay: D) -> Self {
        Self::with_config(serial, clock, delay, Config::default())
    }

    /// Creates a new network adapter with the given configuration
    pub fn with_config(serial: S, clock: C, delay: D, config: Config) -> Self {
        Self {
            serial,
            clock,
            delay,
            config,
            session: Session::default(),
        }
    }

    /// Returns the current configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Selects how HTTP requests are sequenced
    pub fn set_request_strategy(&mut self, strategy: RequestStrategy) {
        self.config.strategy = strategy;
    }

    /// Sets the base pause in ms of [RequestStrategy::FixedPacing]
    pub fn set_http_wait_base_ms(&mut self, milliseconds: u32) {
        self.config.http_wait_base_ms = milliseconds;
    }

    /// Sets the max. number of attempts of [RequestStrategy::Retrying]
    pub fn set_retry_attempts(&mut self, attempts: usize) {
        self.config.retry_attempts = attempts;
    }

    /// Enables/Disables the check of the AT and AT+CWMODE responses when joining
    pub fn set_strict_join(&mut self, strict: bool) {
        self.config.strict_join = strict;
    }

    /// Returns true if joining may continue after the given outcome
    fn is_join_step_accepted(&self, outcome: Outcome) -> bool {
        if outcome == Outcome::MatchedFirst {
            return true;
        }

        warn!("Join step not acknowledged: {:?}", outcome);
        !self.config.strict_join
    }

    /// Sends a command and waits for one of its expected tokens
    pub(crate) fn command<Cmd: AtatCmd + ExpectedTokens>(&mut self, command: &Cmd, timeout_ms: u32) -> Result<Outcome, Error> {
        self.send_command(command)?;
        self.await_response(Cmd::TOKENS, timeout_ms)
    }

    /// Writes the encoded command including the line terminator
    pub(crate) fn send_command<Cmd: AtatCmd>(&mut self, command: &Cmd) -> Result<(), Error> {
        let mut buffer = [0x0; COMMAND_BUFFER_SIZE];
        let length = command.write(&mut buffer);

        trace!("Sending command of {} bytes", length);
        self.write_frame(&buffer[..length], b"")
    }

    /// Writes raw data followed by the line terminator
    pub(crate) fn send_data(&mut self, data: &[u8]) -> Result<(), Error> {
        trace!("Sending {} bytes of data", data.len());
        self.write_frame(data, b"\r\n")
    }

    fn write_frame(&mut self, data: &[u8], terminator: &[u8]) -> Result<(), Error> {
        self.serial.write_all(data).map_err(serial_error)?;
        if !terminator.is_empty() {
            self.serial.write_all(terminator).map_err(serial_error)?;
        }

        self.serial.flush().map_err(serial_error)
    }

    /// Blocks for the given duration
    pub(crate) fn pause(&mut self, milliseconds: u32) -> Result<(), Error> {
        self.delay
            .start(TimerDurationU32::<TIMER_HZ>::millis(milliseconds))
            .map_err(|_| Error::TimerError)?;
        nb::block!(self.delay.wait()).map_err(|_| Error::TimerError)
    }
}

//! # Single-shot HTTP requests
//!
//! Each request opens a TCP connection, transmits the request text and closes the connection again.
//! Responses of the remote server are not evaluated.
//!
//! The sequencing is selected by [RequestStrategy]:
//! * [RequestStrategy::Retrying] waits for the modem responses and retries failed transmissions
//! * [RequestStrategy::FixedPacing] just pauses between the commands
//!
//! ## Example
//!
//! ````
//! # use esp_at_http::example::{ExampleSerial, ExampleTimer};
//! # use esp_at_http::http::{HttpMethod, Request};
//! # use esp_at_http::wifi::{Adapter, WifiAdapter};
//! #
//! let mut adapter: Adapter<_, _, _, 1_000, 256, 256> =
//!     Adapter::new(ExampleSerial::default(), ExampleTimer::default(), ExampleTimer::default());
//! adapter.join("test_wifi", "secret").unwrap();
//!
//! let request = Request::new(HttpMethod::Get, "example.com", 80, "/update?key=abc").with_first_parameter("field1", 21);
//! assert_eq!(
//!     "GET /update?key=abc&field1=21 HTTP/1.1\r\nHost: example.com\r\n",
//!     request.encode::<128>().unwrap().as_str()
//! );
//!
//! adapter.execute(&request).unwrap();
//! ````
use crate::commands::{CloseSocketCommand, ConnectCommand, TransmissionPrepareCommand};
use crate::config::RequestStrategy;
use crate::responses::{Outcome, Tokens};
use crate::serial::SerialTransport;
use crate::wifi::{Adapter, Error};
use core::fmt::{Display, Formatter, Write};
use core::str::FromStr;
use fugit_timer::Timer;
use heapless::String;

/// Standard HTTP methods
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Head,
    Delete,
    Patch,
    Options,
    Connect,
    Trace,
}

impl HttpMethod {
    /// Method keyword as sent on the wire
    pub const fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Head => "HEAD",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Connect => "CONNECT",
            HttpMethod::Trace => "TRACE",
        }
    }
}

impl Display for HttpMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Given text is not one of the standard method keywords
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UnknownMethod;

impl FromStr for HttpMethod {
    type Err = UnknownMethod;

    /// Parses the upper case method keyword
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "HEAD" => Ok(HttpMethod::Head),
            "DELETE" => Ok(HttpMethod::Delete),
            "PATCH" => Ok(HttpMethod::Patch),
            "OPTIONS" => Ok(HttpMethod::Options),
            "CONNECT" => Ok(HttpMethod::Connect),
            "TRACE" => Ok(HttpMethod::Trace),
            _ => Err(UnknownMethod),
        }
    }
}

/// Value of a query parameter
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ParameterValue<'a> {
    /// Signed integer, rendered in decimal
    Integer(i64),

    /// Floating point number, rendered without trailing zeros
    Float(f64),

    /// Text, sent as given without URL encoding
    Text(&'a str),
}

impl Display for ParameterValue<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            ParameterValue::Integer(value) => write!(f, "{}", value),
            ParameterValue::Float(value) => write!(f, "{}", value),
            ParameterValue::Text(value) => f.write_str(value),
        }
    }
}

impl From<i32> for ParameterValue<'_> {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<i64> for ParameterValue<'_> {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<u32> for ParameterValue<'_> {
    fn from(value: u32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<f64> for ParameterValue<'_> {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl<'a> From<&'a str> for ParameterValue<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(value)
    }
}

/// Query parameter appended as `&name=value`. Parameters with an empty name are skipped.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Parameter<'a> {
    /// Parameter name, an empty one suppresses the parameter
    pub name: &'a str,

    pub value: ParameterValue<'a>,
}

/// A single HTTP request
///
/// The path is sent as given, so it needs to contain the `?` already if parameters are used.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Request<'a> {
    pub method: HttpMethod,

    /// Remote host name or IP address, used for both CIPSTART and the Host header. Max. 64 chars.
    pub host: &'a str,

    /// Remote TCP port, must not be zero
    pub port: u16,

    /// Request path, including query string if any
    pub path: &'a str,

    /// Optional query parameters appended to the path in order
    pub parameters: [Option<Parameter<'a>>; 2],
}

impl<'a> Request<'a> {
    pub fn new(method: HttpMethod, host: &'a str, port: u16, path: &'a str) -> Self {
        Self {
            method,
            host,
            port,
            path,
            parameters: [None, None],
        }
    }

    pub fn with_first_parameter(mut self, name: &'a str, value: impl Into<ParameterValue<'a>>) -> Self {
        self.parameters[0] = Some(Parameter {
            name,
            value: value.into(),
        });
        self
    }

    pub fn with_second_parameter(mut self, name: &'a str, value: impl Into<ParameterValue<'a>>) -> Self {
        self.parameters[1] = Some(Parameter {
            name,
            value: value.into(),
        });
        self
    }

    /// Renders the request text. Returns [Error::RequestTooLong] if it exceeds N bytes.
    pub fn encode<const N: usize>(&self) -> Result<String<N>, Error> {
        let mut text = String::new();
        self.write_to(&mut text).map_err(|_| Error::RequestTooLong)?;
        Ok(text)
    }

    fn write_to<W: Write>(&self, target: &mut W) -> core::fmt::Result {
        write!(target, "{} {}", self.method, self.path)?;

        for parameter in self.parameters.iter().flatten() {
            if !parameter.name.is_empty() {
                write!(target, "&{}={}", parameter.name, parameter.value)?;
            }
        }

        // No blank line follows
        write!(target, " HTTP/1.1\r\nHost: {}\r\n", self.host)
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
    /// Executes the given request
    ///
    /// Does nothing if the adapter is not associated. Failures reported by the modem are not returned, just
    /// serial/timer failures and requests which can not be encoded.
    pub fn execute(&mut self, request: &Request<'_>) -> Result<(), Error> {
        if !self.session.is_associated() {
            debug!("Not associated, request skipped");
            return Ok(());
        }

        let data: String<TX_SIZE> = request.encode()?;
        let connect = ConnectCommand::tcp(request.host, request.port)?;

        // Payload is followed by CRLF
        let prepare = TransmissionPrepareCommand::new(data.len() + 2);

        match self.config.strategy {
            RequestStrategy::Retrying => self.execute_retrying(&connect, &prepare, data.as_bytes()),
            RequestStrategy::FixedPacing => self.execute_paced(&connect, &prepare, data.as_bytes()),
        }
    }

    fn execute_retrying(
        &mut self,
        connect: &ConnectCommand,
        prepare: &TransmissionPrepareCommand,
        data: &[u8],
    ) -> Result<(), Error> {
        let timeouts = self.config.timeouts;

        // Closes a connection left open by a previous request
        self.command(&CloseSocketCommand, timeouts.close_ms)?;

        let mut attempts = self.config.retry_attempts;
        while self.session.is_associated() && attempts > 0 {
            attempts -= 1;

            if self.command(connect, timeouts.connect_ms)? == Outcome::MatchedThird {
                warn!("Connecting failed, {} attempts left", attempts);
                continue;
            }

            if self.command(prepare, timeouts.prepare_ms)? == Outcome::MatchedThird {
                warn!("Transmission prompt failed, {} attempts left", attempts);
                continue;
            }

            self.send_data(data)?;
            let outcome = self.await_response(Tokens::SEND, timeouts.send_ms)?;

            self.command(&CloseSocketCommand, timeouts.close_ms)?;

            if outcome == Outcome::MatchedFirst {
                debug!("Request transmitted");
                return Ok(());
            }

            warn!("Transmission failed ({:?}), {} attempts left", outcome, attempts);
        }

        Ok(())
    }

    fn execute_paced(
        &mut self,
        connect: &ConnectCommand,
        prepare: &TransmissionPrepareCommand,
        data: &[u8],
    ) -> Result<(), Error> {
        let base = self.config.http_wait_base_ms;

        self.send_command(connect)?;
        self.pause(base.saturating_mul(6))?;

        self.send_command(prepare)?;
        self.pause(base.saturating_mul(3))?;

        self.send_data(data)?;
        self.pause(base)?;

        self.send_command(&CloseSocketCommand)?;
        self.pause(base.saturating_mul(6))
    }
}

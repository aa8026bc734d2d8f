use crate::responses::{NoResponse, Tokens};
use crate::wifi::Error;
use atat::atat_derive::AtatCmd;
use atat::heapless::String;

/// Max. length of the remote host name accepted by CIPSTART
pub const MAX_HOST_LENGTH: usize = 64;

/// Trait for mapping a command to the tokens its response is classified against
pub trait ExpectedTokens {
    const TOKENS: Tokens;
}

/// Plain attention command, used for checking that the modem responds
#[derive(Clone, AtatCmd)]
#[at_cmd("", NoResponse, timeout_ms = 1_000)]
pub struct AttentionCommand;

impl ExpectedTokens for AttentionCommand {
    const TOKENS: Tokens = Tokens::OK;
}

/// Sets the WIFI mode
#[derive(Clone, Default, AtatCmd)]
#[at_cmd("+CWMODE", NoResponse, timeout_ms = 1_000)]
pub struct WifiModeCommand {
    /// WIFI mode:
    ///     0: Null mode. Wi-Fi RF will be disabled.
    ///     1: Station mode.
    ///     2: SoftAP mode.
    ///     3: SoftAP+Station mode.
    #[at_arg(position = 0)]
    mode: usize,
}

impl WifiModeCommand {
    pub fn station_mode() -> Self {
        Self { mode: 1 }
    }
}

impl ExpectedTokens for WifiModeCommand {
    const TOKENS: Tokens = Tokens::OK;
}

/// Command for joining the target WIFI access point
#[derive(Clone, Default, AtatCmd)]
#[at_cmd("+CWJAP", NoResponse, timeout_ms = 20_000)]
pub struct AccessPointConnectCommand {
    /// The SSID of the target access point
    #[at_arg(position = 0)]
    ssid: String<32>,

    /// The password/key of the target access point
    #[at_arg(position = 1)]
    password: String<64>,
}

impl AccessPointConnectCommand {
    pub fn new(ssid: &str, password: &str) -> Result<Self, Error> {
        Ok(Self {
            ssid: String::try_from(ssid).map_err(|_| Error::InvalidSsidLength)?,
            password: String::try_from(password).map_err(|_| Error::InvalidPassphraseLength)?,
        })
    }
}

impl ExpectedTokens for AccessPointConnectCommand {
    const TOKENS: Tokens = Tokens::GOT_IP;
}

/// Leaves the current access point
#[derive(Clone, AtatCmd)]
#[at_cmd("+CWQAP", NoResponse, timeout_ms = 1_000)]
pub struct AccessPointDisconnectCommand;

impl ExpectedTokens for AccessPointDisconnectCommand {
    const TOKENS: Tokens = Tokens::OK;
}

/// Establishes a single TCP connection
#[derive(Clone, AtatCmd)]
#[at_cmd("+CIPSTART", NoResponse, timeout_ms = 2_000, attempts = 1)]
pub struct ConnectCommand {
    /// Connection type, always TCP
    connection_type: String<5>,

    /// Remote host name or IP address
    remote_host: String<MAX_HOST_LENGTH>,

    /// Remote port
    port: u16,
}

impl ConnectCommand {
    /// Establishes a TCP connection to the given host
    pub fn tcp(host: &str, port: u16) -> Result<Self, Error> {
        if port == 0 {
            return Err(Error::InvalidPort);
        }

        Ok(Self {
            connection_type: String::try_from("TCP").map_err(|_| Error::InvalidHostLength)?,
            remote_host: String::try_from(host).map_err(|_| Error::InvalidHostLength)?,
            port,
        })
    }
}

impl ExpectedTokens for ConnectCommand {
    const TOKENS: Tokens = Tokens::CONNECT;
}

/// Announces the length of the following data transmission
#[derive(Clone, AtatCmd)]
#[at_cmd("+CIPSEND", NoResponse, timeout_ms = 2_000)]
pub struct TransmissionPrepareCommand {
    /// Byte count of the following transmission, including the line terminator
    length: usize,
}

impl TransmissionPrepareCommand {
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl ExpectedTokens for TransmissionPrepareCommand {
    const TOKENS: Tokens = Tokens::PROMPT;
}

/// Closes the single TCP connection
#[derive(Clone, AtatCmd)]
#[at_cmd("+CIPCLOSE", NoResponse, timeout_ms = 2_000)]
pub struct CloseSocketCommand;

impl ExpectedTokens for CloseSocketCommand {
    const TOKENS: Tokens = Tokens::OK;
}

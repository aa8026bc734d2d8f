//! # Adapter configuration
//!
//! All values have working defaults, s. [Config::default()]. Single values may also be changed later
//! by the setters of [Adapter](crate::wifi::Adapter).

/// Serial routing and speed, applied once at the beginning of each join
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SerialSettings {
    /// TX pin of the host connected to RX of the modem
    pub tx_pin: u8,

    /// RX pin of the host connected to TX of the modem
    pub rx_pin: u8,

    /// Baud rate of the link
    pub baud_rate: u32,
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            tx_pin: 15,
            rx_pin: 1,
            baud_rate: 115_200,
        }
    }
}

/// Response timeouts in milliseconds
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timeouts {
    /// AT
    pub attention_ms: u32,

    /// AT+CWMODE
    pub mode_ms: u32,

    /// AT+CWJAP, includes DHCP
    pub join_ms: u32,

    /// AT+CWQAP
    pub disconnect_ms: u32,

    /// AT+CIPSTART
    pub connect_ms: u32,

    /// AT+CIPSEND
    pub prepare_ms: u32,

    /// Transmission of the request payload
    pub send_ms: u32,

    /// AT+CIPCLOSE
    pub close_ms: u32,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            attention_ms: 1_000,
            mode_ms: 1_000,
            join_ms: 20_000,
            disconnect_ms: 1_000,
            connect_ms: 2_000,
            prepare_ms: 2_000,
            send_ms: 5_000,
            close_ms: 2_000,
        }
    }
}

/// How HTTP requests are sequenced
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RequestStrategy {
    /// Each command waits for its response tokens. A failed connect, prompt or transmission is retried.
    #[default]
    Retrying,

    /// Commands are separated by fixed pauses (multiples of `http_wait_base_ms`). Responses are not read.
    FixedPacing,
}

/// Complete adapter configuration
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub serial: SerialSettings,

    pub timeouts: Timeouts,

    pub strategy: RequestStrategy,

    /// Max. number of connect/send attempts of [RequestStrategy::Retrying]
    pub retry_attempts: usize,

    /// Base pause of [RequestStrategy::FixedPacing]
    pub http_wait_base_ms: u32,

    /// Pause between two reads while waiting for a response
    pub poll_interval_ms: u32,

    /// If true, joining stops as soon as AT or AT+CWMODE is not acknowledged by OK
    pub strict_join: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            serial: SerialSettings::default(),
            timeouts: Timeouts::default(),
            strategy: RequestStrategy::Retrying,
            retry_attempts: 2,
            http_wait_base_ms: 1_000,
            poll_interval_ms: 100,
            strict_join: false,
        }
    }
}

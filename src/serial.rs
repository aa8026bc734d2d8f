use crate::config::SerialSettings;
use embedded_io::{ErrorType, Read, ReadReady, Write};

/// Serial link to the modem
///
/// Reading must not block if [ReadReady::read_ready()] returned true. Each command frame is written by
/// `write_all()` followed by a single `flush()`.
pub trait SerialTransport: Read + ReadReady + Write {
    /// Routes the link to the given pins and applies the baud rate. Called once at the beginning of each join.
    ///
    /// Default implementation does nothing, for links which are already set up by the HAL.
    fn configure(&mut self, settings: &SerialSettings) -> Result<(), <Self as ErrorType>::Error> {
        let _ = settings;
        Ok(())
    }
}

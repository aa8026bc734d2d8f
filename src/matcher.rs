//! # Response matching
//!
//! Modem output is collected until one of three [Tokens] shows up or the timeout elapses. The buffer is
//! kept for the whole wait, so tokens may be split across multiple reads.
//!
//! At most one buffer capacity is read per poll and classified before the next read. So bytes are only
//! discarded once they were already checked for tokens.
use crate::responses::{Outcome, Tokens};
use crate::serial::SerialTransport;
use crate::wifi::{serial_error, Adapter, Error};
use fugit::TimerDurationU32;
use fugit_timer::Timer;
use heapless::Vec;

/// Max. bytes moved from the serial link per read call
const READ_CHUNK_SIZE: usize = 32;

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
    /// Waits until the response contains one of the given tokens. Priority follows the order of the tokens
    /// and not the arrival order.
    pub(crate) fn await_response(&mut self, tokens: Tokens, timeout_ms: u32) -> Result<Outcome, Error> {
        let timeout = TimerDurationU32::<TIMER_HZ>::millis(timeout_ms);
        let start = self.clock.now();
        let mut buffer: ResponseBuffer<RX_SIZE> = ResponseBuffer::new();

        while self.clock.now().checked_duration_since(start).is_some_and(|elapsed| elapsed < timeout) {
            self.read_available(&mut buffer)?;

            if let Some(outcome) = tokens.classify(buffer.as_slice()) {
                debug!("Response matched: {:?}", outcome);
                return Ok(outcome);
            }

            self.pause(self.config.poll_interval_ms)?;
        }

        debug!("No response within {} ms", timeout_ms);
        Ok(Outcome::Timeout)
    }

    /// Moves data buffered by the serial link to the response buffer, up to its capacity
    fn read_available(&mut self, buffer: &mut ResponseBuffer<RX_SIZE>) -> Result<(), Error> {
        let mut chunk = [0x0; READ_CHUNK_SIZE];
        let mut total = 0;

        while total < RX_SIZE && self.serial.read_ready().map_err(serial_error)? {
            let max_length = READ_CHUNK_SIZE.min(RX_SIZE - total);
            let length = self.serial.read(&mut chunk[..max_length]).map_err(serial_error)?;
            if length == 0 {
                break;
            }

            buffer.append(&chunk[..length]);
            total += length;
        }

        if total == RX_SIZE {
            trace!("Response buffer filled, further data is read on next poll");
        }

        Ok(())
    }
}

/// Collects the response of a single command
///
/// If the capacity is exceeded, the oldest bytes get discarded.
pub(crate) struct ResponseBuffer<const CAPACITY: usize> {
    data: Vec<u8, CAPACITY>,
}

impl<const CAPACITY: usize> ResponseBuffer<CAPACITY> {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Appends the data, discarding the oldest bytes if required
    pub fn append(&mut self, data: &[u8]) {
        // Just the tail fits anyway
        let data = &data[data.len().saturating_sub(CAPACITY)..];

        let overflow = (self.data.len() + data.len()).saturating_sub(CAPACITY);
        if overflow > 0 {
            self.data.rotate_left(overflow);
            self.data.truncate(self.data.len() - overflow);
        }

        // Can not fail, as space was made above
        let _ = self.data.extend_from_slice(data);
    }

    pub fn as_slice(&self) -> &[u8] {
        self.data.as_slice()
    }
}

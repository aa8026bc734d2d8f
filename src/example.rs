//! Mocks for doc examples
use crate::serial::SerialTransport;
use embedded_io::{ErrorKind, ErrorType, Read, ReadReady, Write};
use fugit::{TimerDurationU32, TimerInstantU32};
use fugit_timer::Timer;
use heapless::{Deque, Vec};

/// Serial link mock, answering a fixed set of frames like an ESP-AT modem would
#[derive(Default)]
pub struct ExampleSerial {
    /// Frame currently written
    frame: Vec<u8, 256>,

    /// Modem output not read yet
    output: Deque<u8, 512>,
}

impl ExampleSerial {
    fn respond(&mut self, response: &[u8]) {
        for byte in response {
            let _ = self.output.push_back(*byte);
        }
    }
}

impl ErrorType for ExampleSerial {
    type Error = ErrorKind;
}

impl Write for ExampleSerial {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.frame.extend_from_slice(buf).map_err(|_| ErrorKind::OutOfMemory)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        let frame = core::mem::take(&mut self.frame);

        match frame.as_slice() {
            b"AT\r\n" | b"AT+CWMODE=1\r\n" => self.respond(b"\r\nOK\r\n"),
            b"AT+CWJAP=\"test_wifi\",\"secret\"\r\n" => {
                self.respond(b"WIFI CONNECTED\r\nWIFI GOT IP\r\n\r\nOK\r\n")
            }
            b"AT+CWQAP\r\n" => self.respond(b"\r\nOK\r\nWIFI DISCONNECT\r\n"),
            b"AT+CIPSTART=\"TCP\",\"example.com\",80\r\n" => self.respond(b"CONNECT\r\n\r\nOK\r\n"),
            b"AT+CIPCLOSE\r\n" => self.respond(b"CLOSED\r\n\r\nOK\r\n"),
            frame if frame.starts_with(b"AT+CIPSEND=") => self.respond(b"\r\nOK\r\n\r\n> "),
            frame if frame.starts_with(b"GET ") => self.respond(b"\r\nRecv bytes\r\n\r\nSEND OK\r\n"),
            &_ => self.respond(b"\r\nERROR\r\n"),
        }

        Ok(())
    }
}

impl Read for ExampleSerial {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let mut length = 0;

        while length < buf.len() {
            match self.output.pop_front() {
                Some(byte) => buf[length] = byte,
                None => break,
            }
            length += 1;
        }

        Ok(length)
    }
}

impl ReadReady for ExampleSerial {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.output.is_empty())
    }
}

impl SerialTransport for ExampleSerial {}

/// Timer mock with millisecond ticks. Time advances by one tick per `now()` call and while waiting.
#[derive(Default)]
pub struct ExampleTimer {
    now: u32,
    duration: u32,
}

impl Timer<1_000> for ExampleTimer {
    type Error = u32;

    fn now(&mut self) -> TimerInstantU32<1_000> {
        self.now += 1;
        TimerInstantU32::from_ticks(self.now)
    }

    fn start(&mut self, duration: TimerDurationU32<1_000>) -> Result<(), Self::Error> {
        self.duration = duration.ticks();
        Ok(())
    }

    fn cancel(&mut self) -> Result<(), Self::Error> {
        self.duration = 0;
        Ok(())
    }

    fn wait(&mut self) -> nb::Result<(), Self::Error> {
        self.now += self.duration;
        Ok(())
    }
}

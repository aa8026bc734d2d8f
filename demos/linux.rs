//! Demo that runs on Linux using a serial-USB-adapter.
use std::{
    env,
    io::{self, Read as IoRead, Write as IoWrite},
    time::Duration,
};

use embedded_io::{ErrorKind, ErrorType, Read, ReadReady, Write};
use esp_at_http::{
    config::{Config, SerialSettings},
    http::{HttpMethod, Request},
    serial::SerialTransport,
    wifi::{Adapter, WifiAdapter},
};
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};

// Max. size of the HTTP request text in bytes
const TX_SIZE: usize = 512;
// Size of the buffer collecting a single command response
const RX_SIZE: usize = 1024;

// Timer frequency in Hz
const TIMER_HZ: u32 = 1000;

fn main() {
    env_logger::init();

    // Parse args
    let args: Vec<String> = env::args().collect();
    if args.len() != 6 {
        println!("Usage: {} <path-to-serial> <baudrate> <ssid> <psk> <host>", args[0]);
        println!("Example: {} /dev/ttyUSB0 115200 mywifi hellopasswd123 example.com", args[0]);
        println!("\nNote: To run the demo with debug logging, run it like this:");
        println!("\n  RUST_LOG=trace cargo run --example linux --features log -- /dev/ttyUSB0 115200 mywifi hellopasswd123 example.com");
        std::process::exit(1);
    }
    let dev = &args[1];
    let baud_rate: u32 = args[2].parse().expect("Invalid baud rate");
    let ssid = &args[3];
    let psk = &args[4];
    let host = &args[5];

    println!("Starting (dev={}, baud={:?})...", dev, baud_rate);

    // Open serial port
    let port = serialport::new(dev, baud_rate)
        .data_bits(DataBits::Eight)
        .flow_control(FlowControl::None)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .timeout(Duration::from_millis(100))
        .open()
        .expect("Could not open serial port");
    let mut serial = Serial { port };

    // Flush serial RX buffer, to ensure that there isn't any remaining left
    // form previous sessions.
    serial.flush_input();

    let config = Config {
        serial: SerialSettings {
            baud_rate,
            ..SerialSettings::default()
        },
        ..Config::default()
    };
    // Two timer instances, one as clock and one for pauses
    let clock = timer::SysTimer::new();
    let delay = timer::SysTimer::new();

    let mut adapter: Adapter<_, _, _, TIMER_HZ, TX_SIZE, RX_SIZE> =
        Adapter::with_config(serial, clock, delay, config);

    // Join WIFI access point
    println!("Join WiFi \"{}\"...", ssid);
    adapter.join(ssid, psk).expect("Serial link failed while joining");
    if !adapter.is_associated() {
        println!("Joining failed");
        std::process::exit(2);
    }

    // Send HTTP request
    println!("Sending HTTP request to {}...", host);
    let request = Request::new(HttpMethod::Get, host, 80, "/?source=esp-at-http").with_first_parameter("uptime", 42);
    adapter.execute(&request).expect("Could not send HTTP request");

    adapter.disconnect().expect("Serial link failed while disconnecting");
    println!("Done");
}

/// Serial port wrapped for the embedded-io traits
struct Serial {
    port: Box<dyn SerialPort>,
}

impl Serial {
    /// Discards everything buffered by the serial port
    fn flush_input(&mut self) {
        let mut buf = [0; 32];
        loop {
            match self.port.read(&mut buf[..]) {
                Ok(0) => break,
                Err(e) if e.kind() == io::ErrorKind::WouldBlock || e.kind() == io::ErrorKind::TimedOut => break,
                Ok(_) => continue,
                Err(e) => panic!("Error while flushing serial: {}", e),
            }
        }
    }
}

fn error_kind(error: io::Error) -> ErrorKind {
    match error.kind() {
        io::ErrorKind::TimedOut => ErrorKind::TimedOut,
        io::ErrorKind::Interrupted => ErrorKind::Interrupted,
        io::ErrorKind::BrokenPipe => ErrorKind::BrokenPipe,
        _ => ErrorKind::Other,
    }
}

impl ErrorType for Serial {
    type Error = ErrorKind;
}

impl Read for Serial {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        match self.port.read(buf) {
            Ok(length) => Ok(length),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock || e.kind() == io::ErrorKind::TimedOut => Ok(0),
            Err(e) => Err(error_kind(e)),
        }
    }
}

impl ReadReady for Serial {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        let pending = self.port.bytes_to_read().map_err(|_| ErrorKind::Other)?;
        Ok(pending > 0)
    }
}

impl Write for Serial {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.port.write(buf).map_err(error_kind)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        IoWrite::flush(&mut self.port).map_err(error_kind)
    }
}

impl SerialTransport for Serial {
    /// Pins are fixed on USB adapters, so just the baud rate is applied
    fn configure(&mut self, settings: &SerialSettings) -> Result<(), Self::Error> {
        self.port.set_baud_rate(settings.baud_rate).map_err(|_| ErrorKind::InvalidInput)
    }
}

mod timer {
    use std::{convert::TryInto, time::Instant as StdInstant};

    use fugit::Instant;
    use fugit_timer::Timer;

    /// A timer with millisecond precision.
    pub struct SysTimer {
        start: StdInstant,
        duration_ms: u32,
        started: bool,
    }

    impl SysTimer {
        pub fn new() -> SysTimer {
            SysTimer {
                start: StdInstant::now(),
                duration_ms: 0,
                started: false,
            }
        }
    }

    impl Timer<1000> for SysTimer {
        type Error = &'static str;

        /// Return current time `Instant`
        fn now(&mut self) -> fugit::TimerInstantU32<1000> {
            let milliseconds = (StdInstant::now() - self.start).as_millis();
            let ticks: u32 = milliseconds.try_into().expect("u32 timer overflow");
            Instant::<u32, 1, 1000>::from_ticks(ticks)
        }

        /// Start timer with a `duration`
        fn start(&mut self, duration: fugit::TimerDurationU32<1000>) -> Result<(), Self::Error> {
            self.start = StdInstant::now();
            self.duration_ms = duration.ticks();
            self.started = true;

            Ok(())
        }

        fn cancel(&mut self) -> Result<(), Self::Error> {
            if !self.started {
                Err("cannot cancel stopped timer")
            } else {
                self.started = false;
                Ok(())
            }
        }

        /// Wait until timer `duration` has expired.
        fn wait(&mut self) -> nb::Result<(), Self::Error> {
            let now = StdInstant::now();
            if (now - self.start).as_millis() >= self.duration_ms.into() {
                Ok(())
            } else {
                Err(nb::Error::WouldBlock)
            }
        }
    }
}

use crate::commands::{
    AccessPointConnectCommand, AccessPointDisconnectCommand, AttentionCommand, CloseSocketCommand, ConnectCommand,
    ExpectedTokens, TransmissionPrepareCommand, WifiModeCommand,
};
use crate::responses::Tokens;
use crate::tests::mock::{Clock, MockSerial, SimulatedTimer};
use crate::wifi::{Adapter, Error};
use alloc::string::{String, ToString};
use atat::AtatCmd;

/// Renders the command to a string
fn render<Cmd: AtatCmd>(command: &Cmd) -> String {
    let mut buffer = [0x0; 256];
    let length = command.write(&mut buffer);
    String::from_utf8(buffer[..length].to_vec()).unwrap()
}

#[test]
fn test_attention_command() {
    assert_eq!("AT\r\n", render(&AttentionCommand));
}

#[test]
fn test_wifi_mode_command() {
    assert_eq!("AT+CWMODE=1\r\n", render(&WifiModeCommand::station_mode()));
}

#[test]
fn test_access_point_connect_command() {
    let command = AccessPointConnectCommand::new("test_wifi", "secret").unwrap();
    assert_eq!("AT+CWJAP=\"test_wifi\",\"secret\"\r\n", render(&command));
}

#[test]
fn test_access_point_connect_length_limits() {
    let ssid = "s".repeat(32);
    let passphrase = "p".repeat(64);
    assert!(AccessPointConnectCommand::new(&ssid, &passphrase).is_ok());

    let ssid = "s".repeat(33);
    assert_eq!(
        Error::InvalidSsidLength,
        AccessPointConnectCommand::new(&ssid, "secret").err().unwrap()
    );

    let passphrase = "p".repeat(65);
    assert_eq!(
        Error::InvalidPassphraseLength,
        AccessPointConnectCommand::new("test_wifi", &passphrase).err().unwrap()
    );
}

#[test]
fn test_access_point_disconnect_command() {
    assert_eq!("AT+CWQAP\r\n", render(&AccessPointDisconnectCommand));
}

#[test]
fn test_connect_command() {
    let command = ConnectCommand::tcp("example.com", 80).unwrap();
    assert_eq!("AT+CIPSTART=\"TCP\",\"example.com\",80\r\n", render(&command));

    let command = ConnectCommand::tcp("10.0.0.1", 65_535).unwrap();
    assert_eq!("AT+CIPSTART=\"TCP\",\"10.0.0.1\",65535\r\n", render(&command));
}

#[test]
fn test_connect_command_invalid_arguments() {
    assert_eq!(Error::InvalidPort, ConnectCommand::tcp("example.com", 0).err().unwrap());

    let host = "h".repeat(65);
    assert_eq!(Error::InvalidHostLength, ConnectCommand::tcp(&host, 80).err().unwrap());

    let host = "h".repeat(64);
    assert!(ConnectCommand::tcp(&host, 80).is_ok());
}

#[test]
fn test_transmission_prepare_command() {
    assert_eq!("AT+CIPSEND=47\r\n", render(&TransmissionPrepareCommand::new(47)));
}

#[test]
fn test_close_socket_command() {
    assert_eq!("AT+CIPCLOSE\r\n", render(&CloseSocketCommand));
}

#[test]
fn test_expected_tokens() {
    assert_eq!(Tokens::OK, AttentionCommand::TOKENS);
    assert_eq!(Tokens::GOT_IP, AccessPointConnectCommand::TOKENS);
    assert_eq!(Tokens::CONNECT, ConnectCommand::TOKENS);
    assert_eq!(Tokens::PROMPT, TransmissionPrepareCommand::TOKENS);
}

#[test]
fn test_send_command_single_frame() {
    let clock = Clock::default();
    let mut adapter: Adapter<MockSerial, SimulatedTimer, SimulatedTimer, 1_000_000, 256, 256> =
        Adapter::new(
            MockSerial::new(clock.clone()),
            SimulatedTimer::new(clock.clone()),
            SimulatedTimer::new(clock),
        );

    adapter.send_command(&WifiModeCommand::station_mode()).unwrap();
    adapter.send_data(b"GET / HTTP/1.1\r\nHost: h\r\n").unwrap();
    adapter.send_data(b"").unwrap();

    let frames = adapter.serial.get_frames_as_strings();
    assert_eq!(3, frames.len());
    assert_eq!("AT+CWMODE=1\r\n".to_string(), frames[0]);
    assert_eq!("GET / HTTP/1.1\r\nHost: h\r\n\r\n".to_string(), frames[1]);
    assert_eq!("\r\n".to_string(), frames[2]);
}

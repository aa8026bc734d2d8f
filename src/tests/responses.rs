use crate::responses::{Outcome, Tokens};

#[test]
fn test_classify_no_token() {
    assert_eq!(None, Tokens::OK.classify(b""));
    assert_eq!(None, Tokens::OK.classify(b"\r\nbusy p...\r\n"));
    assert_eq!(None, Tokens::SEND.classify(b"Recv 45 bytes\r\n"));
}

#[test]
fn test_classify_single_token() {
    assert_eq!(Some(Outcome::MatchedFirst), Tokens::OK.classify(b"AT\r\n\r\nOK\r\n"));
    assert_eq!(Some(Outcome::MatchedSecond), Tokens::OK.classify(b"\r\nERROR\r\n"));
    assert_eq!(Some(Outcome::MatchedThird), Tokens::CONNECT.classify(b"\r\nERROR\r\nCLOSED\r\n"));
}

#[test]
fn test_classify_priority_by_declaration_order() {
    // Third arrives before second
    assert_eq!(Some(Outcome::MatchedSecond), Tokens::OK.classify(b"None\r\nERROR\r\n"));

    // Second arrives before first
    assert_eq!(Some(Outcome::MatchedFirst), Tokens::SEND.classify(b"SEND FAIL\r\nSEND OK\r\n"));
    assert_eq!(Some(Outcome::MatchedFirst), Tokens::OK.classify(b"ERROR\r\nNone\r\nOK\r\n"));
}

#[test]
fn test_classify_case_sensitive() {
    assert_eq!(None, Tokens::OK.classify(b"ok\r\nerror\r\n"));
    assert_eq!(None, Tokens::GOT_IP.classify(b"WIFI got ip\r\n"));
}

#[test]
fn test_classify_substring() {
    // ALREADY CONNECTED is contained, but OK has priority
    assert_eq!(Some(Outcome::MatchedFirst), Tokens::CONNECT.classify(b"ALREADY CONNECTED\r\n\r\nOK\r\n"));
    assert_eq!(Some(Outcome::MatchedSecond), Tokens::CONNECT.classify(b"ALREADY CONNECTED\r\n"));

    // Prompt without line terminator
    assert_eq!(Some(Outcome::MatchedFirst), Tokens::PROMPT.classify(b"\r\nOK\r\n> "));
}

#[test]
fn test_classify_empty_token_always_contained() {
    let tokens = Tokens::new("OK", "", "ERROR");
    assert_eq!(Some(Outcome::MatchedSecond), tokens.classify(b""));
    assert_eq!(Some(Outcome::MatchedFirst), tokens.classify(b"OK"));
}

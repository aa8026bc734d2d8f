use atat::atat_derive::AtatResp;

/// Commands which gets just responded by OK. Responses are classified by [Tokens] instead of ATAT parsing.
#[derive(Clone, AtatResp)]
pub struct NoResponse;

/// Result of waiting for a modem response
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// First token was found
    MatchedFirst,
    /// Second token was found, but not the first one
    MatchedSecond,
    /// Third token was found, but neither the first nor the second one
    MatchedThird,
    /// None of the tokens appeared within the timeout
    Timeout,
}

/// Three literal tokens a response is classified against. Priority follows declaration order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Tokens {
    /// Token signaling success
    pub first: &'static str,

    /// Checked if the first token is missing, usually a failure
    pub second: &'static str,

    /// Checked last. `None` is used as placeholder, as the modem never sends it.
    pub third: &'static str,
}

impl Tokens {
    /// Plain command acknowledgement
    pub const OK: Self = Self::new("OK", "ERROR", "None");

    /// Response of CWJAP. Success is signaled by the IP assignment and not by OK.
    pub const GOT_IP: Self = Self::new("WIFI GOT IP", "ERROR", "None");

    /// Response of CIPSTART. An already open link counts as usable.
    pub const CONNECT: Self = Self::new("OK", "ALREADY CONNECTED", "ERROR");

    /// Response of CIPSEND, '>' is the data prompt
    pub const PROMPT: Self = Self::new(">", "OK", "ERROR");

    /// Response to the transmitted payload
    pub const SEND: Self = Self::new("SEND OK", "SEND FAIL", "ERROR");

    pub const fn new(first: &'static str, second: &'static str, third: &'static str) -> Self {
        Self { first, second, third }
    }

    /// Returns the outcome of the first contained token or None if no token is contained
    pub fn classify(&self, data: &[u8]) -> Option<Outcome> {
        if contains(data, self.first) {
            return Some(Outcome::MatchedFirst);
        }

        if contains(data, self.second) {
            return Some(Outcome::MatchedSecond);
        }

        if contains(data, self.third) {
            return Some(Outcome::MatchedThird);
        }

        None
    }
}

/// Case-sensitive substring search. An empty token is always contained.
fn contains(data: &[u8], token: &str) -> bool {
    let token = token.as_bytes();

    if token.is_empty() {
        return true;
    }

    data.windows(token.len()).any(|window| window == token)
}

use std::fmt;

use serde::{Deserialize, Serialize};

/// Hex account address on the marketplace chain
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn new(address: impl Into<String>) -> Self {
        Address(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Address {
    fn from(address: &str) -> Self {
        Address::new(address)
    }
}

/// A connected account's session context
///
/// Constructed by the calling layer once a wallet is connected and
/// passed explicitly into the pipelines so the core stays testable
/// without a live environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub account: Address,
}

impl Session {
    pub fn new(account: Address) -> Self {
        Session { account }
    }
}

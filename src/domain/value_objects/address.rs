use serde::{Deserialize, Serialize};
use std::fmt;

/// On-chain account of a market participant. Canonical form is
/// lowercase `0x` + 40 hex characters; comparisons are case-insensitive
/// because inputs arrive in mixed checksum casing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    pub fn new(addr: impl Into<String>) -> Result<Self, &'static str> {
        let addr = addr.into().to_lowercase();
        let hex = addr
            .strip_prefix("0x")
            .ok_or("Address must start with 0x")?;
        if hex.len() != 40 {
            return Err("Address must be 40 hex characters after 0x");
        }
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err("Address contains non-hex characters");
        }
        Ok(Address(addr))
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

impl TryFrom<&str> for Address {
    type Error = &'static str;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Address::new(value)
    }
}

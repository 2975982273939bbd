use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a tokenized property listed on the marketplace,
/// e.g. "BRK-TOWER-A" or "LIS-DOCKS-7".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetId(String);

impl AssetId {
    pub fn new(id: impl Into<String>) -> Result<Self, &'static str> {
        let id = id.into().to_uppercase();
        if id.is_empty() {
            return Err("Asset id cannot be empty");
        }
        if id.len() > 32 {
            return Err("Asset id too long (max 32 characters)");
        }
        if !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err("Asset id must be alphanumeric (dashes allowed)");
        }
        Ok(AssetId(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for AssetId {
    type Error = &'static str;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        AssetId::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_asset_id() {
        let id = AssetId::new("brk-tower-a").unwrap();
        assert_eq!(id.as_str(), "BRK-TOWER-A");
    }

    #[test]
    fn test_rejects_empty() {
        assert!(AssetId::new("").is_err());
    }

    #[test]
    fn test_rejects_too_long() {
        assert!(AssetId::new("A".repeat(33)).is_err());
    }

    #[test]
    fn test_rejects_invalid_chars() {
        assert!(AssetId::new("TOWER_A").is_err());
        assert!(AssetId::new("TOWER A").is_err());
    }
}

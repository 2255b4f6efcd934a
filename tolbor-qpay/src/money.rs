//! Currency types for gateway amounts

use serde::{Deserialize, Serialize};

/// Currencies the platform sells in (ISO 4217)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    /// Mongolian tögrög, the gateway's home currency and the default
    #[default]
    MNT,
    USD,
}

impl Currency {
    /// Get currency code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::MNT => "MNT",
            Self::USD => "USD",
        }
    }

    /// Get currency symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::MNT => "₮",
            Self::USD => "$",
        }
    }

    /// Parse from string
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "MNT" => Some(Self::MNT),
            "USD" => Some(Self::USD),
            _ => None,
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_codes() {
        assert_eq!(Currency::MNT.code(), "MNT");
        assert_eq!(Currency::USD.code(), "USD");
        assert_eq!(Currency::from_code("mnt"), Some(Currency::MNT));
        assert_eq!(Currency::from_code("EUR"), None);
    }

    #[test]
    fn test_default_is_mnt() {
        assert_eq!(Currency::default(), Currency::MNT);
    }

    #[test]
    fn test_serde_roundtrip() {
        let json = serde_json::to_string(&Currency::MNT).unwrap();
        assert_eq!(json, "\"MNT\"");
        let parsed: Currency = serde_json::from_str("\"USD\"").unwrap();
        assert_eq!(parsed, Currency::USD);
    }
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{MoneyError, MoneyResult};

/// A validated currency code, always stored upper-case.
/// Codes start with a letter followed by letters or digits (`USD`, `SAT`, `X1`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    /// Validate and normalize a raw currency code.
    pub fn from_text(raw: &str) -> MoneyResult<Self> {
        if raw.trim().is_empty() || !is_currency_code(raw) {
            return Err(MoneyError::InvalidFormat(raw.to_string()));
        }
        Ok(Self(raw.to_ascii_uppercase()))
    }

    pub fn code(&self) -> &str {
        &self.0
    }
}

/// Case-insensitive check of the currency code grammar.
fn is_currency_code(raw: &str) -> bool {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => chars.all(|c| c.is_ascii_alphanumeric()),
        _ => false,
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Currency {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_text(s)
    }
}

impl TryFrom<String> for Currency {
    type Error = MoneyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_text(&value)
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.0
    }
}

impl AsRef<str> for Currency {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

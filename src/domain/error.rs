use thiserror::Error;

use super::Currency;

pub type MoneyResult<T> = Result<T, MoneyError>;

/// The single error vocabulary shared by the value types and every
/// collaborator (parsers, formatters, exchanges, registries).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Invalid currency '{0}'")]
    InvalidFormat(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Operand must be numeric: {0}")]
    InvalidOperand(String),

    #[error("Divisor must not be zero")]
    DivisionByZero,

    #[error("Currencies must be identical: {left} vs {right}")]
    CurrencyMismatch { left: Currency, right: Currency },

    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    #[error("No exchange rate for {base}/{counter}")]
    UnknownExchangeRate { base: Currency, counter: Currency },

    #[error("Unknown service: {0}")]
    UnknownService(String),
}

impl MoneyError {
    pub fn currency_mismatch(left: &Currency, right: &Currency) -> Self {
        Self::CurrencyMismatch {
            left: left.clone(),
            right: right.clone(),
        }
    }

    /// Errors caused by the caller's input rather than by missing configuration.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidFormat(_)
                | Self::InvalidAmount(_)
                | Self::InvalidOperand(_)
                | Self::DivisionByZero
                | Self::CurrencyMismatch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatch_message_names_both_currencies() {
        let usd = Currency::from_text("USD").unwrap();
        let sat = Currency::from_text("SAT").unwrap();
        let err = MoneyError::currency_mismatch(&usd, &sat);

        assert!(err.is_input_error());
        assert_eq!(err.to_string(), "Currencies must be identical: USD vs SAT");
    }

    #[test]
    fn test_configuration_errors_are_not_input_errors() {
        assert!(!MoneyError::UnknownCurrency("XYZ".into()).is_input_error());
        assert!(!MoneyError::UnknownService("paypal".into()).is_input_error());
    }
}

use thiserror::Error;

use crate::domain::MoneyError;

/// Rejections produced by the input validators.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Must not be blank")]
    Missing,

    #[error("Amount must be at least {min}")]
    BelowMinimum { min: String },

    #[error("Amount must be at most {max}")]
    AboveMaximum { max: String },

    #[error("Currency not acceptable: {0}")]
    NotAcceptable(String),

    #[error(transparent)]
    Money(#[from] MoneyError),
}

impl ValidationError {
    /// Errors caused by the submitted value rather than by validator configuration.
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::Money(e) => e.is_input_error() || matches!(e, MoneyError::UnknownService(_)),
            _ => true,
        }
    }
}

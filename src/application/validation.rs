//! Input validators for request payloads.
//!
//! Each validator is a plain function from raw input plus an explicit
//! constraint record to a typed value, built on the service contracts.

use tracing::debug;

use super::{MoneyService, ServiceMap, ValidationError};
use crate::domain::{Currency, Money, MoneyValue};

/// Options recognized by [`validate_money`].
#[derive(Debug, Clone)]
pub struct MoneyConstraints<M = Money> {
    /// Reject blank input unless a default is set.
    pub required: bool,
    /// Returned for blank input.
    pub default: Option<M>,
    /// Currency assumed when the input carries none.
    pub currency: Option<Currency>,
    /// Convert the parsed amount before checking bounds.
    pub convert_to: Option<Currency>,
    /// Inclusive lower bound.
    pub min: Option<M>,
    /// Inclusive upper bound.
    pub max: Option<M>,
}

impl<M> Default for MoneyConstraints<M> {
    fn default() -> Self {
        Self {
            required: true,
            default: None,
            currency: None,
            convert_to: None,
            min: None,
            max: None,
        }
    }
}

/// Options recognized by [`validate_currency`].
#[derive(Debug, Clone)]
pub struct CurrencyConstraints {
    pub required: bool,
    /// Accepted codes; an empty list accepts any well-formed code.
    pub accepted: Vec<Currency>,
}

impl Default for CurrencyConstraints {
    fn default() -> Self {
        Self {
            required: true,
            accepted: Vec::new(),
        }
    }
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.filter(|s| !s.trim().is_empty())
}

/// Parse, optionally convert, then bounds-check a money input.
///
/// Bounds are compared in the final currency, so `min`/`max` must be in the
/// `convert_to` currency when one is set.
pub fn validate_money<M: MoneyValue>(
    raw: Option<&str>,
    service: &MoneyService<M>,
    constraints: &MoneyConstraints<M>,
) -> Result<Option<M>, ValidationError> {
    let Some(raw) = non_blank(raw) else {
        return match (&constraints.default, constraints.required) {
            (Some(default), _) => Ok(Some(default.clone())),
            (None, true) => Err(ValidationError::Missing),
            (None, false) => Ok(None),
        };
    };

    let mut money = service.parse(raw, constraints.currency.as_ref())?;
    if let Some(target) = &constraints.convert_to {
        money = service.convert(&money, target)?;
    }

    if let Some(min) = &constraints.min {
        if !money.is_greater_than_or_equal(min)? {
            debug!(value = %money.to_text(), min = %min.to_text(), "amount below minimum");
            return Err(ValidationError::BelowMinimum { min: min.to_text() });
        }
    }
    if let Some(max) = &constraints.max {
        if !money.is_less_than_or_equal(max)? {
            debug!(value = %money.to_text(), max = %max.to_text(), "amount above maximum");
            return Err(ValidationError::AboveMaximum { max: max.to_text() });
        }
    }

    Ok(Some(money))
}

/// Validate a currency code against an accepted list. Matching is case-insensitive.
pub fn validate_currency(
    raw: Option<&str>,
    constraints: &CurrencyConstraints,
) -> Result<Option<Currency>, ValidationError> {
    let Some(raw) = non_blank(raw) else {
        return if constraints.required {
            Err(ValidationError::Missing)
        } else {
            Ok(None)
        };
    };

    let currency = Currency::from_text(raw)?;
    if !constraints.accepted.is_empty() && !constraints.accepted.contains(&currency) {
        return Err(ValidationError::NotAcceptable(currency.to_string()));
    }
    Ok(Some(currency))
}

/// Resolve a service name from input.
pub fn validate_service<'a, S>(
    raw: Option<&str>,
    services: &'a ServiceMap<S>,
) -> Result<&'a S, ValidationError> {
    let name = non_blank(raw).ok_or(ValidationError::Missing)?;
    Ok(services.get(name)?)
}

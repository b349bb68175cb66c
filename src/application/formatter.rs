use std::collections::HashMap;
use std::sync::Arc;

use num_bigint::BigInt;

use super::CurrencyRegistry;
use crate::domain::{format_minor_units, Currency, MoneyError, MoneyResult};

/// Renders an amount of minor units for display.
pub trait MoneyFormatter: Send + Sync {
    fn format(&self, amount: &BigInt, currency: &Currency) -> MoneyResult<String>;
}

/// `"100USD"`, identical to the canonical text form.
#[derive(Debug, Clone, Copy, Default)]
pub struct CanonicalFormatter;

impl MoneyFormatter for CanonicalFormatter {
    fn format(&self, amount: &BigInt, currency: &Currency) -> MoneyResult<String> {
        Ok(format!("{amount}{currency}"))
    }
}

/// `"1.00 USD"`, using the registry to place the decimal point.
#[derive(Clone)]
pub struct DecimalFormatter {
    currencies: Arc<dyn CurrencyRegistry>,
}

impl DecimalFormatter {
    pub fn new(currencies: Arc<dyn CurrencyRegistry>) -> Self {
        Self { currencies }
    }
}

impl MoneyFormatter for DecimalFormatter {
    fn format(&self, amount: &BigInt, currency: &Currency) -> MoneyResult<String> {
        let subunit = self.currencies.subunit_for(currency)?;
        Ok(format!("{} {}", format_minor_units(amount, subunit), currency))
    }
}

/// Dispatches to the formatter registered for each currency.
#[derive(Clone, Default)]
pub struct AggregateFormatter {
    formatters: HashMap<Currency, Arc<dyn MoneyFormatter>>,
}

impl AggregateFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy with `formatter` registered for `currency`.
    pub fn with(&self, currency: Currency, formatter: Arc<dyn MoneyFormatter>) -> Self {
        let mut formatters = self.formatters.clone();
        formatters.insert(currency, formatter);
        Self { formatters }
    }

    pub fn supports(&self, currency: &Currency) -> bool {
        self.formatters.contains_key(currency)
    }
}

impl MoneyFormatter for AggregateFormatter {
    fn format(&self, amount: &BigInt, currency: &Currency) -> MoneyResult<String> {
        self.formatters
            .get(currency)
            .ok_or_else(|| MoneyError::UnknownCurrency(currency.to_string()))?
            .format(amount, currency)
    }
}

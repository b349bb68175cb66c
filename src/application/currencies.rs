use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::{Currency, MoneyError, MoneyResult};

/// Largest number of minor-unit digits a currency may declare.
pub const MAX_SUBUNIT: u32 = 18;

/// Source of known currencies and the number of decimal digits in their
/// minor unit (2 for USD cents, 0 for JPY, 3 for MSAT per SAT).
pub trait CurrencyRegistry: Send + Sync {
    fn contains(&self, currency: &Currency) -> bool;
    fn subunit_for(&self, currency: &Currency) -> MoneyResult<u32>;
    fn currencies(&self) -> Vec<Currency>;
}

/// A fixed list of currencies with their subunits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrencyList {
    subunits: BTreeMap<Currency, u32>,
}

impl CurrencyList {
    /// Subunits above [`MAX_SUBUNIT`] fail with `InvalidFormat`.
    pub fn new(currencies: impl IntoIterator<Item = (Currency, u32)>) -> MoneyResult<Self> {
        let mut subunits = BTreeMap::new();
        for (currency, subunit) in currencies {
            if subunit > MAX_SUBUNIT {
                return Err(MoneyError::InvalidFormat(format!(
                    "subunit {subunit} of {currency} exceeds {MAX_SUBUNIT}"
                )));
            }
            subunits.insert(currency, subunit);
        }
        Ok(Self { subunits })
    }

    /// Build from raw codes, e.g. `[("USD", 2), ("JPY", 0)]`.
    pub fn from_codes<'a>(codes: impl IntoIterator<Item = (&'a str, u32)>) -> MoneyResult<Self> {
        let currencies = codes
            .into_iter()
            .map(|(code, subunit)| -> MoneyResult<(Currency, u32)> {
                Ok((Currency::from_text(code)?, subunit))
            })
            .collect::<MoneyResult<Vec<_>>>()?;
        Self::new(currencies)
    }

    pub fn len(&self) -> usize {
        self.subunits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subunits.is_empty()
    }
}

impl CurrencyRegistry for CurrencyList {
    fn contains(&self, currency: &Currency) -> bool {
        self.subunits.contains_key(currency)
    }

    fn subunit_for(&self, currency: &Currency) -> MoneyResult<u32> {
        self.subunits
            .get(currency)
            .copied()
            .ok_or_else(|| MoneyError::UnknownCurrency(currency.to_string()))
    }

    fn currencies(&self) -> Vec<Currency> {
        self.subunits.keys().cloned().collect()
    }
}

/// Several registries consulted in order; the first one knowing a currency wins.
#[derive(Clone, Default)]
pub struct AggregateCurrencies {
    registries: Vec<Arc<dyn CurrencyRegistry>>,
}

impl AggregateCurrencies {
    pub fn new(registries: Vec<Arc<dyn CurrencyRegistry>>) -> Self {
        Self { registries }
    }
}

impl CurrencyRegistry for AggregateCurrencies {
    fn contains(&self, currency: &Currency) -> bool {
        self.registries.iter().any(|r| r.contains(currency))
    }

    fn subunit_for(&self, currency: &Currency) -> MoneyResult<u32> {
        self.registries
            .iter()
            .find(|r| r.contains(currency))
            .ok_or_else(|| MoneyError::UnknownCurrency(currency.to_string()))?
            .subunit_for(currency)
    }

    fn currencies(&self) -> Vec<Currency> {
        let mut seen = Vec::new();
        for currency in self.registries.iter().flat_map(|r| r.currencies()) {
            if !seen.contains(&currency) {
                seen.push(currency);
            }
        }
        seen
    }
}

use std::collections::BTreeMap;
use std::sync::Arc;

use num_bigint::BigInt;
use num_rational::BigRational;
use tracing::debug;

use super::{CurrencyRegistry, MAX_SUBUNIT};
use crate::domain::{Currency, Factor, MoneyError, MoneyResult, RoundingMode};

/// Source of conversion rates between currency pairs.
pub trait ExchangeRateSource: Send + Sync {
    /// Rate such that `amount(base) * rate = amount(counter)`, in major units.
    fn quote(&self, base: &Currency, counter: &Currency) -> MoneyResult<Factor>;
}

/// One configured rate for an ordered currency pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeRate {
    pub base: Currency,
    pub counter: Currency,
    pub rate: Factor,
}

/// A table of fixed rates, looked up only in the listed direction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixedExchange {
    rates: BTreeMap<(Currency, Currency), Factor>,
}

impl FixedExchange {
    /// Rates must be strictly positive. A repeated pair keeps the last rate.
    pub fn new(rates: impl IntoIterator<Item = ExchangeRate>) -> MoneyResult<Self> {
        let mut table = BTreeMap::new();
        for ExchangeRate {
            base,
            counter,
            rate,
        } in rates
        {
            if !rate.is_positive() {
                return Err(MoneyError::InvalidOperand(format!(
                    "rate {base}/{counter} must be positive, got {rate}"
                )));
            }
            table.insert((base, counter), rate);
        }
        Ok(Self { rates: table })
    }

    pub fn rates(&self) -> impl Iterator<Item = ExchangeRate> + '_ {
        self.rates
            .iter()
            .map(|((base, counter), rate)| ExchangeRate {
                base: base.clone(),
                counter: counter.clone(),
                rate: rate.clone(),
            })
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl ExchangeRateSource for FixedExchange {
    fn quote(&self, base: &Currency, counter: &Currency) -> MoneyResult<Factor> {
        self.rates
            .get(&(base.clone(), counter.clone()))
            .cloned()
            .ok_or_else(|| MoneyError::UnknownExchangeRate {
                base: base.clone(),
                counter: counter.clone(),
            })
    }
}

/// Falls back to the reciprocal of the reverse pair when the direct pair is missing.
#[derive(Debug, Clone)]
pub struct ReversedExchange<E> {
    inner: E,
}

impl<E: ExchangeRateSource> ReversedExchange<E> {
    pub fn new(inner: E) -> Self {
        Self { inner }
    }
}

impl<E: ExchangeRateSource> ExchangeRateSource for ReversedExchange<E> {
    fn quote(&self, base: &Currency, counter: &Currency) -> MoneyResult<Factor> {
        match self.inner.quote(base, counter) {
            Err(MoneyError::UnknownExchangeRate { .. }) => match self.inner.quote(counter, base) {
                Ok(reverse) => reverse.recip(),
                Err(MoneyError::UnknownExchangeRate { .. }) => {
                    Err(MoneyError::UnknownExchangeRate {
                        base: base.clone(),
                        counter: counter.clone(),
                    })
                }
                Err(e) => Err(e),
            },
            quoted => quoted,
        }
    }
}

impl<T: ExchangeRateSource + ?Sized> ExchangeRateSource for Arc<T> {
    fn quote(&self, base: &Currency, counter: &Currency) -> MoneyResult<Factor> {
        (**self).quote(base, counter)
    }
}

/// Converts minor-unit amounts between registered currencies.
///
/// Rates are quoted in major units, so the product is shifted by the
/// difference in subunits before the single rounding step.
#[derive(Clone)]
pub struct Converter {
    currencies: Arc<dyn CurrencyRegistry>,
    exchange: Arc<dyn ExchangeRateSource>,
}

impl Converter {
    pub fn new(currencies: Arc<dyn CurrencyRegistry>, exchange: Arc<dyn ExchangeRateSource>) -> Self {
        Self {
            currencies,
            exchange,
        }
    }

    pub fn currencies(&self) -> &Arc<dyn CurrencyRegistry> {
        &self.currencies
    }

    pub fn convert(
        &self,
        amount: &BigInt,
        base: &Currency,
        counter: &Currency,
        mode: RoundingMode,
    ) -> MoneyResult<BigInt> {
        let base_subunit = i64::from(self.currencies.subunit_for(base)?);
        let counter_subunit = i64::from(self.currencies.subunit_for(counter)?);
        let shift = counter_subunit
            .checked_sub(base_subunit)
            .and_then(|shift| i32::try_from(shift).ok())
            .filter(|shift| shift.unsigned_abs() <= MAX_SUBUNIT)
            .ok_or_else(|| {
                MoneyError::InvalidOperand(format!(
                    "subunits {base_subunit} ({base}) and {counter_subunit} ({counter}) are out of range"
                ))
            })?;

        // Identical currencies still need a listed rate.
        let rate = self.exchange.quote(base, counter)?;
        debug!(%base, %counter, %rate, "converting with exchange rate");

        let scaled = rate.scale_by_power_of_ten(shift);
        let exact = BigRational::from_integer(amount.clone()) * scaled.ratio();
        Ok(mode.round(&exact))
    }
}

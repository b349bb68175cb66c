use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::{
    AggregateFormatter, AggregateParser, CanonicalFormatter, CanonicalParser, Converter,
    CurrencyList, CurrencyRegistry, DecimalFormatter, DecimalParser, ExchangeRate, FixedExchange,
    MoneyFormatter, MoneyParser, MoneyService, MoneyServiceMap, ReversedExchange, ServiceMap,
};
use crate::domain::{Currency, Factor, MoneyResult, RoundingMode};

/// A registered currency and the number of decimal digits of its minor unit,
/// at most [`MAX_SUBUNIT`](crate::application::MAX_SUBUNIT).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyConfig {
    pub code: String,
    pub subunit: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParserKind {
    Canonical,
    Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatterKind {
    Canonical,
    Decimal,
}

/// A formatter and the currencies it renders. An empty list means every
/// registered currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatterConfig {
    pub kind: FormatterKind,
    #[serde(default)]
    pub currencies: Vec<String>,
}

/// A fixed rate: one unit of `base` buys `rate` units of `quote`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateConfig {
    pub base: String,
    pub quote: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub rate: Decimal,
}

fn default_parsers() -> Vec<ParserKind> {
    vec![ParserKind::Canonical]
}

/// Declarative description of one money service.
///
/// ```json
/// {
///   "currencies": [{"code": "USD", "subunit": 2}],
///   "parsers": ["canonical", "decimal"],
///   "formatters": [{"kind": "decimal", "currencies": ["USD"]}],
///   "fixed_rates": [{"base": "EUR", "quote": "USD", "rate": "1.10"}],
///   "rounding": "HALF_UP"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoneyServiceConfig {
    pub currencies: Vec<CurrencyConfig>,
    #[serde(default = "default_parsers")]
    pub parsers: Vec<ParserKind>,
    #[serde(default)]
    pub formatters: Vec<FormatterConfig>,
    #[serde(default)]
    pub fixed_rates: Vec<RateConfig>,
    #[serde(default)]
    pub rounding: RoundingMode,
}

impl MoneyServiceConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid money service configuration")
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?;
        Self::from_json_str(&json).with_context(|| format!("In {}", path.display()))
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Rates are looked up in both directions, the reverse one through its reciprocal.
    pub fn exchange(&self) -> Result<FixedExchange> {
        let rates = self
            .fixed_rates
            .iter()
            .map(|rate| -> MoneyResult<ExchangeRate> {
                Ok(ExchangeRate {
                    base: Currency::from_text(&rate.base)?,
                    counter: Currency::from_text(&rate.quote)?,
                    rate: Factor::from(rate.rate),
                })
            })
            .collect::<MoneyResult<Vec<_>>>()?;
        Ok(FixedExchange::new(rates)?)
    }

    pub fn build(&self) -> Result<MoneyService> {
        if self.parsers.is_empty() {
            bail!("At least one parser must be configured");
        }

        let currencies: Arc<dyn CurrencyRegistry> = Arc::new(CurrencyList::from_codes(
            self.currencies.iter().map(|c| (c.code.as_str(), c.subunit)),
        )?);
        let exchange = self.exchange()?;
        let rate_count = exchange.len();
        let converter = Converter::new(currencies.clone(), Arc::new(ReversedExchange::new(exchange)));

        let parsers = self
            .parsers
            .iter()
            .map(|kind| -> Arc<dyn MoneyParser> {
                match kind {
                    ParserKind::Canonical => Arc::new(CanonicalParser),
                    ParserKind::Decimal => Arc::new(DecimalParser::new(currencies.clone())),
                }
            })
            .collect();

        let formatter = self.formatter(&currencies)?;

        debug!(
            currencies = currencies.currencies().len(),
            rates = rate_count,
            rounding = %self.rounding,
            "built money service"
        );

        Ok(MoneyService::new(Arc::new(AggregateParser::new(parsers)), converter, formatter)
            .with_rounding(self.rounding))
    }

    fn formatter(&self, currencies: &Arc<dyn CurrencyRegistry>) -> Result<Arc<dyn MoneyFormatter>> {
        if self.formatters.is_empty() {
            return Ok(Arc::new(CanonicalFormatter));
        }

        let mut aggregate = AggregateFormatter::new();
        for config in &self.formatters {
            let formatter: Arc<dyn MoneyFormatter> = match config.kind {
                FormatterKind::Canonical => Arc::new(CanonicalFormatter),
                FormatterKind::Decimal => Arc::new(DecimalFormatter::new(currencies.clone())),
            };

            let targets = if config.currencies.is_empty() {
                currencies.currencies()
            } else {
                config
                    .currencies
                    .iter()
                    .map(|code| Currency::from_text(code))
                    .collect::<MoneyResult<Vec<_>>>()?
            };

            for currency in targets {
                if !currencies.contains(&currency) {
                    bail!("Formatter currency {} is not registered", currency);
                }
                aggregate = aggregate.with(currency, formatter.clone());
            }
        }
        Ok(Arc::new(aggregate))
    }
}

/// A money service under a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedServiceConfig {
    pub name: String,
    #[serde(flatten)]
    pub service: MoneyServiceConfig,
}

/// Several named money services, e.g. one per market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoneyServicesConfig {
    pub services: Vec<NamedServiceConfig>,
}

impl MoneyServicesConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid money services configuration")
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?;
        Self::from_json_str(&json).with_context(|| format!("In {}", path.display()))
    }

    pub fn build(&self) -> Result<MoneyServiceMap> {
        let services = self
            .services
            .iter()
            .map(|named| -> Result<(String, Arc<MoneyService>)> {
                let service = named
                    .service
                    .build()
                    .with_context(|| format!("Failed to build money service '{}'", named.name))?;
                Ok((named.name.clone(), Arc::new(service)))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(ServiceMap::new(services))
    }
}

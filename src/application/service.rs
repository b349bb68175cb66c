use std::marker::PhantomData;
use std::sync::Arc;

use tracing::debug;

use super::{Converter, CurrencyRegistry, MoneyFormatter, MoneyParser};
use crate::domain::{Currency, Money, MoneyResult, MoneyValue, RoundingMode};

/// Application service turning external text into money values and back.
/// This is the primary interface for any client (validators, API handlers, etc.).
///
/// The concrete money type `M` is fixed when the service is assembled.
pub struct MoneyService<M: MoneyValue = Money> {
    parser: Arc<dyn MoneyParser>,
    converter: Converter,
    formatter: Arc<dyn MoneyFormatter>,
    rounding: RoundingMode,
    money: PhantomData<fn() -> M>,
}

impl<M: MoneyValue> MoneyService<M> {
    /// Create a new service from its collaborators, rounding conversions `HALF_UP`.
    pub fn new(
        parser: Arc<dyn MoneyParser>,
        converter: Converter,
        formatter: Arc<dyn MoneyFormatter>,
    ) -> Self {
        Self {
            parser,
            converter,
            formatter,
            rounding: RoundingMode::default(),
            money: PhantomData,
        }
    }

    pub fn with_rounding(mut self, rounding: RoundingMode) -> Self {
        self.rounding = rounding;
        self
    }

    pub fn rounding(&self) -> RoundingMode {
        self.rounding
    }

    pub fn currencies(&self) -> &Arc<dyn CurrencyRegistry> {
        self.converter.currencies()
    }

    /// Parse user text, using `currency` when the text carries no code.
    pub fn parse(&self, text: &str, currency: Option<&Currency>) -> MoneyResult<M> {
        let parsed = self.parser.parse(text, currency)?;
        M::from_text(&parsed.to_text())
    }

    pub fn format(&self, money: &M) -> MoneyResult<String> {
        self.formatter.format(money.amount(), money.currency())
    }

    /// Convert using the service's configured rounding mode.
    pub fn convert(&self, money: &M, currency: &Currency) -> MoneyResult<M> {
        self.convert_with(money, currency, self.rounding)
    }

    pub fn convert_with(&self, money: &M, currency: &Currency, mode: RoundingMode) -> MoneyResult<M> {
        let amount = self
            .converter
            .convert(money.amount(), money.currency(), currency, mode)?;
        let converted = M::from_text(&format!("{amount}{currency}"))?;
        debug!(from = %money.to_text(), to = %converted.to_text(), "converted money");
        Ok(converted)
    }
}

impl<M: MoneyValue> Clone for MoneyService<M> {
    fn clone(&self) -> Self {
        Self {
            parser: Arc::clone(&self.parser),
            converter: self.converter.clone(),
            formatter: Arc::clone(&self.formatter),
            rounding: self.rounding,
            money: PhantomData,
        }
    }
}

use std::sync::Arc;

use lazy_static::lazy_static;
use num_bigint::BigInt;
use regex::Regex;
use tracing::debug;

use super::CurrencyRegistry;
use crate::domain::{parse_minor_units, Currency, Money, MoneyError, MoneyResult};

lazy_static! {
    /// Decimal amount with an optional trailing currency code: "12.34", "-0.5 usd".
    static ref DECIMAL_REGEX: Regex =
        Regex::new(r"^\s*(?P<amount>-?[0-9]*(?:\.[0-9]*)?)\s*(?P<currency>[A-Za-z][A-Za-z0-9]*)?\s*$")
            .expect("Invalid regex pattern");

    static ref INTEGER_REGEX: Regex =
        Regex::new(r"^-?[0-9]+$").expect("Invalid regex pattern");
}

/// Raw result of parsing external text: minor units plus currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMoney {
    pub amount: BigInt,
    pub currency: Currency,
}

impl ParsedMoney {
    /// Canonical text, suitable for any `MoneyValue::from_text`.
    pub fn to_text(&self) -> String {
        format!("{}{}", self.amount, self.currency)
    }
}

impl From<Money> for ParsedMoney {
    fn from(money: Money) -> Self {
        Self {
            amount: money.amount().clone(),
            currency: money.currency().clone(),
        }
    }
}

/// Turns user-facing text into an amount and currency. `hint` supplies the
/// currency when the text carries none.
pub trait MoneyParser: Send + Sync {
    fn parse(&self, text: &str, hint: Option<&Currency>) -> MoneyResult<ParsedMoney>;
}

fn resolve_currency(
    text: &str,
    explicit: Option<Currency>,
    hint: Option<&Currency>,
) -> MoneyResult<Currency> {
    match (explicit, hint) {
        (Some(explicit), Some(hint)) if &explicit != hint => {
            Err(MoneyError::InvalidAmount(format!("{text} is not in {hint}")))
        }
        (Some(explicit), _) => Ok(explicit),
        (None, Some(hint)) => Ok(hint.clone()),
        (None, None) => Err(MoneyError::InvalidAmount(format!("{text} has no currency"))),
    }
}

/// Accepts the canonical `"100USD"` form, or a bare integer of minor units
/// when a currency hint is given.
#[derive(Debug, Clone, Copy, Default)]
pub struct CanonicalParser;

impl MoneyParser for CanonicalParser {
    fn parse(&self, text: &str, hint: Option<&Currency>) -> MoneyResult<ParsedMoney> {
        if INTEGER_REGEX.is_match(text) {
            let amount = text
                .parse()
                .map_err(|_| MoneyError::InvalidAmount(text.to_string()))?;
            let currency = resolve_currency(text, None, hint)?;
            return Ok(ParsedMoney { amount, currency });
        }

        let money = Money::from_text(text)?;
        resolve_currency(text, Some(money.currency().clone()), hint)?;
        Ok(money.into())
    }
}

/// Accepts major-unit decimals (`"12.34 USD"`, or `"12.34"` with a hint) and
/// scales them by the currency's subunit.
#[derive(Clone)]
pub struct DecimalParser {
    currencies: Arc<dyn CurrencyRegistry>,
}

impl DecimalParser {
    pub fn new(currencies: Arc<dyn CurrencyRegistry>) -> Self {
        Self { currencies }
    }
}

impl MoneyParser for DecimalParser {
    fn parse(&self, text: &str, hint: Option<&Currency>) -> MoneyResult<ParsedMoney> {
        let caps = DECIMAL_REGEX
            .captures(text)
            .ok_or_else(|| MoneyError::InvalidAmount(text.to_string()))?;

        let explicit = caps
            .name("currency")
            .map(|m| Currency::from_text(m.as_str()))
            .transpose()?;
        let currency = resolve_currency(text, explicit, hint)?;
        let subunit = self.currencies.subunit_for(&currency)?;
        let amount = parse_minor_units(&caps["amount"], subunit)?;

        Ok(ParsedMoney { amount, currency })
    }
}

/// Tries each parser in order and returns the first success.
#[derive(Clone, Default)]
pub struct AggregateParser {
    parsers: Vec<Arc<dyn MoneyParser>>,
}

impl AggregateParser {
    pub fn new(parsers: Vec<Arc<dyn MoneyParser>>) -> Self {
        Self { parsers }
    }
}

impl MoneyParser for AggregateParser {
    fn parse(&self, text: &str, hint: Option<&Currency>) -> MoneyResult<ParsedMoney> {
        for parser in &self.parsers {
            match parser.parse(text, hint) {
                Ok(parsed) => return Ok(parsed),
                Err(e) => debug!(text, error = %e, "parser rejected input"),
            }
        }
        Err(MoneyError::InvalidAmount(text.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::CurrencyList;

    fn currency(code: &str) -> Currency {
        Currency::from_text(code).unwrap()
    }

    fn parsed(amount: i64, code: &str) -> ParsedMoney {
        ParsedMoney {
            amount: BigInt::from(amount),
            currency: currency(code),
        }
    }

    fn decimal_parser() -> DecimalParser {
        let list = CurrencyList::from_codes([("USD", 2), ("JPY", 0), ("BTC", 8)]).unwrap();
        DecimalParser::new(Arc::new(list))
    }

    #[test]
    fn test_canonical_parser() {
        let parser = CanonicalParser;
        assert_eq!(parser.parse("100usd", None), Ok(parsed(100, "USD")));
        assert_eq!(parser.parse("-5 SAT", None), Ok(parsed(-5, "SAT")));
        assert_eq!(parser.parse("42", Some(&currency("SAT"))), Ok(parsed(42, "SAT")));
        assert!(matches!(parser.parse("42", None), Err(MoneyError::InvalidAmount(_))));
        assert!(matches!(
            parser.parse("42USD", Some(&currency("SAT"))),
            Err(MoneyError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_decimal_parser() {
        let parser = decimal_parser();
        assert_eq!(parser.parse("12.34 USD", None), Ok(parsed(1234, "USD")));
        assert_eq!(parser.parse("12.5usd", None), Ok(parsed(1250, "USD")));
        assert_eq!(parser.parse("-0.01", Some(&currency("USD"))), Ok(parsed(-1, "USD")));
        assert_eq!(parser.parse("150", Some(&currency("JPY"))), Ok(parsed(150, "JPY")));
        assert_eq!(parser.parse("0.00000001 BTC", None), Ok(parsed(1, "BTC")));
    }

    #[test]
    fn test_decimal_parser_failures() {
        let parser = decimal_parser();
        assert!(matches!(parser.parse("1.234 USD", None), Err(MoneyError::InvalidAmount(_))));
        assert!(matches!(parser.parse("1.5", Some(&currency("JPY"))), Err(MoneyError::InvalidAmount(_))));
        assert!(matches!(parser.parse("12.34", None), Err(MoneyError::InvalidAmount(_))));
        assert!(matches!(parser.parse("USD", None), Err(MoneyError::InvalidAmount(_))));
        assert_eq!(
            parser.parse("1 EUR", None),
            Err(MoneyError::UnknownCurrency("EUR".into()))
        );
    }

    #[test]
    fn test_aggregate_parser_first_success_wins() {
        let parser = AggregateParser::new(vec![Arc::new(CanonicalParser), Arc::new(decimal_parser())]);

        assert_eq!(parser.parse("100USD", None), Ok(parsed(100, "USD")));
        assert_eq!(parser.parse("1.00 USD", None), Ok(parsed(100, "USD")));
        assert!(matches!(parser.parse("one dollar", None), Err(MoneyError::InvalidAmount(_))));
        assert!(matches!(
            AggregateParser::default().parse("1USD", None),
            Err(MoneyError::InvalidAmount(_))
        ));
    }
}

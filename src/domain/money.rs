use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, Zero};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{Currency, IntoFactor, MoneyError, MoneyResult, RoundingMode};

lazy_static! {
    /// Canonical money text: integer amount, optional single whitespace, currency code.
    static ref MONEY_REGEX: Regex =
        Regex::new(r"^(?P<amount>-?[0-9]+)\s?(?P<currency>[A-Za-z][A-Za-z0-9]*)$")
            .expect("Invalid regex pattern");

    static ref AMOUNT_REGEX: Regex = Regex::new(r"^-?[0-9]+$").expect("Invalid regex pattern");
}

/// An immutable amount of minor units in a single currency.
///
/// Money is always fully defined: an absent value is an `Option<Money>` at the
/// call site, never a special "empty" Money. Every operation returns a new value.
///
/// ```
/// use denarius::domain::{Money, RoundingMode};
///
/// let price = Money::from_text("12USD").unwrap();
/// let refund = price.multiply("-0.25", RoundingMode::HalfUp).unwrap();
/// assert_eq!(refund.to_text(), "-3USD");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Money {
    amount: BigInt,
    currency: Currency,
}

impl Money {
    pub fn new(amount: impl Into<BigInt>, currency: Currency) -> Self {
        Self {
            amount: amount.into(),
            currency,
        }
    }

    /// Parse the canonical text form, e.g. `"100USD"`, `"-100 a"`.
    pub fn from_text(raw: &str) -> MoneyResult<Self> {
        let caps = MONEY_REGEX
            .captures(raw)
            .ok_or_else(|| MoneyError::InvalidAmount(raw.to_string()))?;

        let amount = caps["amount"]
            .parse::<BigInt>()
            .map_err(|_| MoneyError::InvalidAmount(raw.to_string()))?;
        let currency = Currency::from_text(&caps["currency"])?;

        Ok(Self { amount, currency })
    }

    pub fn zero(currency: &str) -> MoneyResult<Self> {
        Ok(Self::new(0, Currency::from_text(currency)?))
    }

    /// Canonical text form; `Money::from_text(&m.to_text()) == Ok(m)`.
    pub fn to_text(&self) -> String {
        format!("{}{}", self.amount, self.currency)
    }

    pub fn amount(&self) -> &BigInt {
        &self.amount
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    pub fn add(&self, other: &Money) -> MoneyResult<Money> {
        self.assert_same_currency(other)?;
        Ok(self.with_amount(&self.amount + &other.amount))
    }

    pub fn subtract(&self, other: &Money) -> MoneyResult<Money> {
        self.assert_same_currency(other)?;
        Ok(self.with_amount(&self.amount - &other.amount))
    }

    pub fn multiply(&self, factor: impl IntoFactor, mode: RoundingMode) -> MoneyResult<Money> {
        let factor = factor.into_factor()?;
        Ok(self.with_amount(mode.round(&(self.exact() * factor.ratio()))))
    }

    pub fn divide(&self, divisor: impl IntoFactor, mode: RoundingMode) -> MoneyResult<Money> {
        let divisor = divisor.into_factor()?;
        if divisor.is_zero() {
            return Err(MoneyError::DivisionByZero);
        }
        Ok(self.with_amount(mode.round(&(self.exact() / divisor.ratio()))))
    }

    /// `pct` percent of this amount. The product is kept exact and rounded
    /// once, after dividing by 100.
    pub fn percentage(&self, pct: impl IntoFactor, mode: RoundingMode) -> MoneyResult<Money> {
        let pct = pct.into_factor()?;
        let exact = self.exact() * pct.ratio() / BigInt::from(100);
        Ok(self.with_amount(mode.round(&exact)))
    }

    pub fn negate(&self) -> Money {
        self.with_amount(-&self.amount)
    }

    pub fn abs(&self) -> Money {
        self.with_amount(self.amount.abs())
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.amount.is_positive()
    }

    pub fn is_negative(&self) -> bool {
        self.amount.is_negative()
    }

    pub fn compare(&self, other: &Money) -> MoneyResult<Ordering> {
        self.assert_same_currency(other)?;
        Ok(self.amount.cmp(&other.amount))
    }

    pub fn is_less_than_or_equal(&self, other: &Money) -> MoneyResult<bool> {
        Ok(self.compare(other)? != Ordering::Greater)
    }

    pub fn is_greater_than_or_equal(&self, other: &Money) -> MoneyResult<bool> {
        Ok(self.compare(other)? != Ordering::Less)
    }

    pub fn has_same_currency(&self, other: &Money) -> bool {
        self.currency == other.currency
    }

    fn assert_same_currency(&self, other: &Money) -> MoneyResult<()> {
        if !self.has_same_currency(other) {
            return Err(MoneyError::currency_mismatch(&self.currency, &other.currency));
        }
        Ok(())
    }

    fn exact(&self) -> BigRational {
        BigRational::from_integer(self.amount.clone())
    }

    fn with_amount(&self, amount: BigInt) -> Money {
        Money {
            amount,
            currency: self.currency.clone(),
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.currency)
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_text(s)
    }
}

impl TryFrom<String> for Money {
    type Error = MoneyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_text(&value)
    }
}

impl From<Money> for String {
    fn from(money: Money) -> Self {
        money.to_text()
    }
}

/// Structured wire form: `{ "amount": "-100", "currency": "SAT" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoneyRecord {
    pub amount: String,
    pub currency: String,
}

impl TryFrom<MoneyRecord> for Money {
    type Error = MoneyError;

    fn try_from(record: MoneyRecord) -> Result<Self, Self::Error> {
        if !AMOUNT_REGEX.is_match(&record.amount) {
            return Err(MoneyError::InvalidAmount(record.amount));
        }
        let amount = record
            .amount
            .parse::<BigInt>()
            .map_err(|_| MoneyError::InvalidAmount(record.amount.clone()))?;
        Ok(Money::new(amount, Currency::from_text(&record.currency)?))
    }
}

impl From<&Money> for MoneyRecord {
    fn from(money: &Money) -> Self {
        Self {
            amount: money.amount.to_string(),
            currency: money.currency.to_string(),
        }
    }
}

/// Capability set a concrete money type offers to the service layer.
///
/// `MoneyService` is generic over this trait, so the concrete type is chosen
/// when the service is assembled rather than looked up at runtime.
pub trait MoneyValue: Clone + fmt::Debug + PartialEq + Send + Sync + Sized {
    fn from_text(raw: &str) -> MoneyResult<Self>;
    fn to_text(&self) -> String;
    fn amount(&self) -> &BigInt;
    fn currency(&self) -> &Currency;
    fn add(&self, other: &Self) -> MoneyResult<Self>;
    fn subtract(&self, other: &Self) -> MoneyResult<Self>;
    fn multiply(&self, factor: impl IntoFactor, mode: RoundingMode) -> MoneyResult<Self>;
    fn is_less_than_or_equal(&self, other: &Self) -> MoneyResult<bool>;
    fn is_greater_than_or_equal(&self, other: &Self) -> MoneyResult<bool>;
}

impl MoneyValue for Money {
    fn from_text(raw: &str) -> MoneyResult<Self> {
        Money::from_text(raw)
    }

    fn to_text(&self) -> String {
        Money::to_text(self)
    }

    fn amount(&self) -> &BigInt {
        Money::amount(self)
    }

    fn currency(&self) -> &Currency {
        Money::currency(self)
    }

    fn add(&self, other: &Self) -> MoneyResult<Self> {
        Money::add(self, other)
    }

    fn subtract(&self, other: &Self) -> MoneyResult<Self> {
        Money::subtract(self, other)
    }

    fn multiply(&self, factor: impl IntoFactor, mode: RoundingMode) -> MoneyResult<Self> {
        Money::multiply(self, factor, mode)
    }

    fn is_less_than_or_equal(&self, other: &Self) -> MoneyResult<bool> {
        Money::is_less_than_or_equal(self, other)
    }

    fn is_greater_than_or_equal(&self, other: &Self) -> MoneyResult<bool> {
        Money::is_greater_than_or_equal(self, other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn money(raw: &str) -> Money {
        Money::from_text(raw).unwrap()
    }

    #[test]
    fn test_from_text() {
        assert_eq!(money("100USD").to_text(), "100USD");
        assert_eq!(money("-100A").to_text(), "-100A");
        assert_eq!(money("100usd").to_text(), "100USD");
        assert_eq!(money("-100 a").to_text(), "-100A");
        assert_eq!(money("100USD1").to_string(), "100USD1");
    }

    #[test]
    fn test_from_text_rejects_malformed_input() {
        for raw in ["100", "USD", "", "1.5USD", "100  USD", " 100USD", "100USD ", "--1USD", "+1USD"] {
            assert!(
                matches!(Money::from_text(raw), Err(MoneyError::InvalidAmount(_))),
                "expected {raw:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_amounts_beyond_machine_integers() {
        let big = money("123456789012345678901234567890SAT");
        let sum = big.add(&money("1SAT")).unwrap();
        assert_eq!(sum.amount().to_string(), "123456789012345678901234567891");
    }

    #[test]
    fn test_zero() {
        assert_eq!(Money::zero("AB").unwrap().to_text(), "0AB");
        assert!(matches!(Money::zero(""), Err(MoneyError::InvalidFormat(_))));
        assert!(matches!(Money::zero("1X"), Err(MoneyError::InvalidFormat(_))));
    }

    #[test]
    fn test_equals() {
        let m = money("0SAT");
        assert_eq!(m, money("0SAT"));
        assert_ne!(m, money("0MSAT"));
    }

    #[test]
    fn test_accessors() {
        let m = money("0SAT");
        assert_eq!(m.amount().to_string(), "0");
        assert_eq!(m.currency().code(), "SAT");
    }

    #[test]
    fn test_add_and_subtract() {
        assert_eq!(money("100USD").add(&money("-30USD")).unwrap(), money("70USD"));
        assert_eq!(money("100USD").subtract(&money("130USD")).unwrap(), money("-30USD"));
    }

    #[test]
    fn test_currency_mismatch() {
        let usd = money("1USD");
        let eur = money("1EUR");
        assert!(matches!(usd.add(&eur), Err(MoneyError::CurrencyMismatch { .. })));
        assert!(matches!(usd.subtract(&eur), Err(MoneyError::CurrencyMismatch { .. })));
        assert!(matches!(
            usd.is_less_than_or_equal(&eur),
            Err(MoneyError::CurrencyMismatch { .. })
        ));
        assert!(matches!(
            usd.is_greater_than_or_equal(&eur),
            Err(MoneyError::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn test_multiply() {
        let m = money("12USD");
        assert_eq!(m.multiply(-0.25, RoundingMode::HalfUp).unwrap().to_text(), "-3USD");
        assert_eq!(m.multiply("1.5", RoundingMode::HalfUp).unwrap().to_text(), "18USD");
        assert_eq!(money("5USD").multiply("0.5", RoundingMode::HalfUp).unwrap().to_text(), "3USD");
        assert_eq!(money("5USD").multiply("0.5", RoundingMode::HalfDown).unwrap().to_text(), "2USD");
        assert!(matches!(
            m.multiply("abc", RoundingMode::HalfUp),
            Err(MoneyError::InvalidOperand(_))
        ));
    }

    #[test]
    fn test_divide() {
        assert_eq!(
            money("-12USD").divide(-0.25, RoundingMode::HalfUp).unwrap().amount().to_string(),
            "48"
        );
        assert_eq!(money("10USD").divide(3, RoundingMode::Up).unwrap().to_text(), "4USD");
        assert_eq!(money("10USD").divide(3, RoundingMode::Down).unwrap().to_text(), "3USD");
        assert_eq!(money("-10USD").divide(3, RoundingMode::Up).unwrap().to_text(), "-4USD");
        assert_eq!(
            money("10USD").divide(0, RoundingMode::HalfUp),
            Err(MoneyError::DivisionByZero)
        );
        assert_eq!(
            money("10USD").divide("0.0", RoundingMode::Up),
            Err(MoneyError::DivisionByZero)
        );
        assert!(matches!(
            money("10USD").divide("ten", RoundingMode::Up),
            Err(MoneyError::InvalidOperand(_))
        ));
    }

    #[test]
    fn test_percentage() {
        let zero = money("0SAT");
        assert_eq!(zero.percentage(0, RoundingMode::HalfUp).unwrap().to_text(), "0SAT");
        assert_eq!(zero.percentage(10, RoundingMode::HalfUp).unwrap().to_text(), "0SAT");
        assert_eq!(zero.percentage(10.12345, RoundingMode::Up).unwrap().amount().to_string(), "0");
        assert_eq!(zero.percentage(100, RoundingMode::Down).unwrap().to_text(), "0SAT");

        let hundred = money("100SAT");
        assert_eq!(hundred.percentage(0, RoundingMode::HalfUp).unwrap().to_text(), "0SAT");
        assert_eq!(hundred.percentage(10, RoundingMode::HalfUp).unwrap().to_text(), "10SAT");
        assert_eq!(
            hundred.percentage(10.12345, RoundingMode::Up).unwrap().amount().to_string(),
            "11"
        );
        assert_eq!(
            hundred.percentage(10.12345, RoundingMode::Down).unwrap().amount().to_string(),
            "10"
        );
        assert_eq!(hundred.percentage(100, RoundingMode::Down).unwrap().to_text(), "100SAT");
    }

    #[test]
    fn test_percentage_rounds_once() {
        // 3 * 16.5% = 0.495; rounding the product first would yield 1.
        assert_eq!(
            money("3SAT").percentage("16.5", RoundingMode::HalfUp).unwrap().to_text(),
            "0SAT"
        );
    }

    #[test]
    fn test_sign_checks() {
        assert!(money("0X").is_zero());
        assert!(money("1X").is_positive());
        assert!(money("-1X").is_negative());
        assert!(!money("0X").is_positive());
        assert!(!money("0X").is_negative());
        assert_eq!(money("-5X").abs(), money("5X"));
        assert_eq!(money("5X").negate(), money("-5X"));
    }

    #[test]
    fn test_comparisons() {
        let small = money("5X");
        let large = money("7X");
        assert!(small.is_less_than_or_equal(&large).unwrap());
        assert!(small.is_less_than_or_equal(&small).unwrap());
        assert!(!large.is_less_than_or_equal(&small).unwrap());
        assert!(large.is_greater_than_or_equal(&small).unwrap());
        assert!(!small.is_greater_than_or_equal(&large).unwrap());
    }

    #[test]
    fn test_serde_forms() {
        let m = money("-100sat");
        assert_eq!(serde_json::to_string(&m).unwrap(), "\"-100SAT\"");
        assert_eq!(serde_json::from_str::<Money>("\"42 usd\"").unwrap(), money("42USD"));
        assert!(serde_json::from_str::<Money>("\"42\"").is_err());

        let record = MoneyRecord::from(&m);
        assert_eq!(record.amount, "-100");
        assert_eq!(record.currency, "SAT");
        assert_eq!(Money::try_from(record).unwrap(), m);

        for amount in ["1.5", "+5", "1_000", " 5", "", "-"] {
            let bad = MoneyRecord {
                amount: amount.into(),
                currency: "SAT".into(),
            };
            assert_eq!(
                Money::try_from(bad),
                Err(MoneyError::InvalidAmount(amount.into())),
                "expected {amount:?} to be rejected"
            );
        }
    }
}

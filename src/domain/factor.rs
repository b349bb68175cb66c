use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use regex::Regex;
use rust_decimal::Decimal;

use super::{MoneyError, MoneyResult};

/// Exponents beyond this are rejected rather than expanded into huge integers.
const MAX_EXPONENT: i64 = 4096;

lazy_static! {
    /// Numeric text: optional sign, digits with optional fraction, optional exponent.
    /// Matches "10", "-0.25", ".5", "1.", "1e3", "2.5E-2".
    static ref NUMERIC_REGEX: Regex =
        Regex::new(r"^([+-]?)([0-9]*)(?:\.([0-9]*))?(?:[eE]([+-]?[0-9]+))?$")
            .expect("Invalid regex pattern");

    static ref INTEGER_REGEX: Regex = Regex::new(r"^-?[0-9]+$").expect("Invalid regex pattern");
}

/// An exact rational operand for multiply, divide, percentage and exchange rates.
///
/// Factors are never floating point. `f64` inputs go through their shortest
/// decimal representation, so `10.12345_f64` becomes exactly `1012345/100000`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Factor(BigRational);

impl Factor {
    pub fn new(ratio: BigRational) -> Self {
        Self(ratio)
    }

    pub fn from_integer(value: impl Into<BigInt>) -> Self {
        Self(BigRational::from_integer(value.into()))
    }

    pub fn one() -> Self {
        Self(BigRational::one())
    }

    pub fn ratio(&self) -> &BigRational {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.0.is_positive()
    }

    pub fn recip(&self) -> MoneyResult<Self> {
        if self.is_zero() {
            return Err(MoneyError::DivisionByZero);
        }
        Ok(Self(self.0.recip()))
    }

    /// Shift by a power of ten (`exponent` may be negative).
    pub fn scale_by_power_of_ten(&self, exponent: i32) -> Self {
        let power = BigInt::from(10u8).pow(exponent.unsigned_abs());
        if exponent >= 0 {
            Self(self.0.clone() * power)
        } else {
            Self(self.0.clone() / power)
        }
    }
}

impl FromStr for Factor {
    type Err = MoneyError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || MoneyError::InvalidOperand(raw.to_string());

        // "n/d", as produced by Display
        if let Some((numer, denom)) = raw.split_once('/') {
            if !INTEGER_REGEX.is_match(numer) || !INTEGER_REGEX.is_match(denom) {
                return Err(invalid());
            }
            let numer: BigInt = numer.parse().map_err(|_| invalid())?;
            let denom: BigInt = denom.parse().map_err(|_| invalid())?;
            if denom.is_zero() {
                return Err(invalid());
            }
            return Ok(Self(BigRational::new(numer, denom)));
        }

        let caps = NUMERIC_REGEX.captures(raw).ok_or_else(invalid)?;

        let integer = caps.get(2).map_or("", |m| m.as_str());
        let fraction = caps.get(3).map_or("", |m| m.as_str());
        if integer.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }

        let exponent: i64 = match caps.get(4) {
            Some(m) => m.as_str().parse().map_err(|_| invalid())?,
            None => 0,
        };
        if exponent.abs() > MAX_EXPONENT {
            return Err(invalid());
        }

        let mut numer: BigInt = format!("{integer}{fraction}")
            .parse()
            .map_err(|_| invalid())?;
        if caps.get(1).map(|m| m.as_str()) == Some("-") {
            numer = -numer;
        }

        let scale = exponent - fraction.len() as i64;
        let power = BigInt::from(10u8).pow(scale.unsigned_abs() as u32);
        let ratio = if scale >= 0 {
            BigRational::from_integer(numer * power)
        } else {
            BigRational::new(numer, power)
        };
        Ok(Self(ratio))
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_integer() {
            write!(f, "{}", self.0.numer())
        } else {
            write!(f, "{}/{}", self.0.numer(), self.0.denom())
        }
    }
}

impl From<BigInt> for Factor {
    fn from(value: BigInt) -> Self {
        Self::from_integer(value)
    }
}

impl From<BigRational> for Factor {
    fn from(value: BigRational) -> Self {
        Self(value)
    }
}

impl From<Decimal> for Factor {
    fn from(value: Decimal) -> Self {
        let denom = BigInt::from(10u8).pow(value.scale());
        Self(BigRational::new(BigInt::from(value.mantissa()), denom))
    }
}

/// Anything that may be used as a numeric operand. Conversion fails with
/// `InvalidOperand` for non-numeric input.
pub trait IntoFactor {
    fn into_factor(self) -> MoneyResult<Factor>;
}

impl IntoFactor for Factor {
    fn into_factor(self) -> MoneyResult<Factor> {
        Ok(self)
    }
}

impl IntoFactor for &Factor {
    fn into_factor(self) -> MoneyResult<Factor> {
        Ok(self.clone())
    }
}

impl IntoFactor for &str {
    fn into_factor(self) -> MoneyResult<Factor> {
        self.parse()
    }
}

impl IntoFactor for String {
    fn into_factor(self) -> MoneyResult<Factor> {
        self.parse()
    }
}

impl IntoFactor for Decimal {
    fn into_factor(self) -> MoneyResult<Factor> {
        Ok(Factor::from(self))
    }
}

impl IntoFactor for f64 {
    fn into_factor(self) -> MoneyResult<Factor> {
        if !self.is_finite() {
            return Err(MoneyError::InvalidOperand(self.to_string()));
        }
        self.to_string().parse()
    }
}

macro_rules! integer_factor {
    ($($t:ty),*) => {
        $(
            impl IntoFactor for $t {
                fn into_factor(self) -> MoneyResult<Factor> {
                    Ok(Factor::from_integer(self))
                }
            }
        )*
    };
}

integer_factor!(i32, i64, i128, u32, u64, BigInt);

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn factor(numer: i64, denom: i64) -> Factor {
        Factor::new(BigRational::new(BigInt::from(numer), BigInt::from(denom)))
    }

    #[test]
    fn test_parse_decimal_text() {
        assert_eq!("10".parse::<Factor>().unwrap(), factor(10, 1));
        assert_eq!("-0.25".parse::<Factor>().unwrap(), factor(-1, 4));
        assert_eq!("10.12345".parse::<Factor>().unwrap(), factor(1012345, 100000));
        assert_eq!(".5".parse::<Factor>().unwrap(), factor(1, 2));
        assert_eq!("1.".parse::<Factor>().unwrap(), factor(1, 1));
        assert_eq!("+3".parse::<Factor>().unwrap(), factor(3, 1));
    }

    #[test]
    fn test_parse_exponent() {
        assert_eq!("1e3".parse::<Factor>().unwrap(), factor(1000, 1));
        assert_eq!("2.5E-2".parse::<Factor>().unwrap(), factor(1, 40));
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        for raw in ["", "-", ".", "abc", "1,5", "1.2.3", "nan", " 1", "1e", "1e99999"] {
            assert!(
                matches!(raw.parse::<Factor>(), Err(MoneyError::InvalidOperand(_))),
                "expected {raw:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_float_goes_through_shortest_decimal() {
        assert_eq!(10.12345_f64.into_factor().unwrap(), factor(1012345, 100000));
        assert_eq!((-0.25_f64).into_factor().unwrap(), factor(-1, 4));
        assert!(f64::NAN.into_factor().is_err());
        assert!(f64::INFINITY.into_factor().is_err());
    }

    #[test]
    fn test_decimal_is_exact() {
        assert_eq!(dec!(0.85).into_factor().unwrap(), factor(17, 20));
        assert_eq!(dec!(-12).into_factor().unwrap(), factor(-12, 1));
    }

    #[test]
    fn test_recip_and_scaling() {
        assert_eq!(factor(4, 5).recip().unwrap(), factor(5, 4));
        assert_eq!(
            Factor::from_integer(0).recip(),
            Err(MoneyError::DivisionByZero)
        );
        assert_eq!(factor(3, 2).scale_by_power_of_ten(2), factor(150, 1));
        assert_eq!(factor(150, 1).scale_by_power_of_ten(-2), factor(3, 2));
    }

    #[test]
    fn test_display() {
        assert_eq!(factor(10, 1).to_string(), "10");
        assert_eq!(factor(-1, 4).to_string(), "-1/4");
    }

    #[test]
    fn test_parse_ratio_text() {
        assert_eq!("-1/4".parse::<Factor>().unwrap(), factor(-1, 4));
        assert_eq!("10/4".parse::<Factor>().unwrap(), factor(5, 2));
        assert_eq!(factor(1, 3).to_string().parse::<Factor>().unwrap(), factor(1, 3));
        assert!(matches!("1/0".parse::<Factor>(), Err(MoneyError::InvalidOperand(_))));
        for raw in ["1/x", "1_0/4", "1/+4", "+1/4", "1/4/2", " 1/4", "/4", "1/"] {
            assert!(
                matches!(raw.parse::<Factor>(), Err(MoneyError::InvalidOperand(_))),
                "expected {raw:?} to be rejected"
            );
        }
    }
}

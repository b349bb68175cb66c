use std::fmt;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use serde::{Deserialize, Serialize};

/// How a non-integer result of multiply/divide/convert becomes a whole number
/// of minor units. Rounding happens exactly once per operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundingMode {
    /// Away from zero
    Up,
    /// Toward zero
    Down,
    /// Nearest, ties away from zero
    #[default]
    HalfUp,
    /// Nearest, ties toward zero
    HalfDown,
}

impl RoundingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundingMode::Up => "UP",
            RoundingMode::Down => "DOWN",
            RoundingMode::HalfUp => "HALF_UP",
            RoundingMode::HalfDown => "HALF_DOWN",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "UP" => Some(RoundingMode::Up),
            "DOWN" => Some(RoundingMode::Down),
            "HALF_UP" => Some(RoundingMode::HalfUp),
            "HALF_DOWN" => Some(RoundingMode::HalfDown),
            _ => None,
        }
    }

    /// Round an exact rational to an integer.
    pub fn round(self, value: &BigRational) -> BigInt {
        let fraction = value.fract();
        let truncated = value.trunc().to_integer();
        if fraction.is_zero() {
            return truncated;
        }

        let away_from_zero = &truncated + value.signum().to_integer();
        let doubled = fraction.abs() * BigInt::from(2);
        let half = BigRational::one();

        match self {
            RoundingMode::Up => away_from_zero,
            RoundingMode::Down => truncated,
            RoundingMode::HalfUp if doubled >= half => away_from_zero,
            RoundingMode::HalfDown if doubled > half => away_from_zero,
            RoundingMode::HalfUp | RoundingMode::HalfDown => truncated,
        }
    }
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

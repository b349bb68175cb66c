use num_bigint::BigInt;
use num_traits::Signed;

use super::{MoneyError, MoneyResult};

/// Format minor units as a decimal string with `subunit` fraction digits.
/// Example: (1234, 2) -> "12.34", (-1, 2) -> "-0.01", (150, 0) -> "150"
pub fn format_minor_units(amount: &BigInt, subunit: u32) -> String {
    let sign = if amount.is_negative() { "-" } else { "" };
    let digits = amount.abs().to_string();
    if subunit == 0 {
        return format!("{sign}{digits}");
    }

    let width = subunit as usize + 1;
    let padded = format!("{digits:0>width$}");
    let (units, fraction) = padded.split_at(padded.len() - subunit as usize);
    format!("{sign}{units}.{fraction}")
}

/// Parse a decimal string into minor units.
/// Example: ("50.00", 2) -> 5000, ("12.5", 2) -> 1250, ("100", 2) -> 10000
///
/// More fraction digits than the currency has fail with `InvalidAmount`;
/// nothing is truncated.
pub fn parse_minor_units(input: &str, subunit: u32) -> MoneyResult<BigInt> {
    let invalid = || MoneyError::InvalidAmount(input.to_string());
    let trimmed = input.trim();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let (units, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (units.is_empty() && fraction.is_empty()) || !is_digits(units) || !is_digits(fraction) {
        return Err(invalid());
    }
    if fraction.len() > subunit as usize {
        return Err(invalid());
    }

    // Pad the fraction out to the full subunit width: "12.5" in cents is 1250.
    let digits = format!("{units}{fraction:0<width$}", width = subunit as usize);
    let minor: BigInt = digits.parse().map_err(|_| invalid())?;
    Ok(if negative { -minor } else { minor })
}

// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use denarius::application::MoneyService;
use denarius::io::MoneyServiceConfig;
use denarius::{Currency, Money};

/// Service configuration shared by the integration tests: two fiat
/// currencies with cents, bitcoin in sats and millisats.
pub const SERVICE_CONFIG: &str = r#"{
    "currencies": [
        {"code": "USD", "subunit": 2},
        {"code": "EUR", "subunit": 2},
        {"code": "JPY", "subunit": 0},
        {"code": "SAT", "subunit": 0},
        {"code": "MSAT", "subunit": 0}
    ],
    "parsers": ["canonical", "decimal"],
    "formatters": [
        {"kind": "decimal", "currencies": ["USD", "EUR", "JPY"]},
        {"kind": "canonical", "currencies": ["SAT", "MSAT"]}
    ],
    "fixed_rates": [
        {"base": "EUR", "quote": "USD", "rate": "1.10"},
        {"base": "USD", "quote": "JPY", "rate": "150"},
        {"base": "SAT", "quote": "MSAT", "rate": "1000"}
    ]
}"#;

/// Helper to create the shared test service
pub fn test_service() -> Result<MoneyService> {
    MoneyServiceConfig::from_json_str(SERVICE_CONFIG)?.build()
}

pub fn money(raw: &str) -> Money {
    Money::from_text(raw).unwrap()
}

pub fn currency(code: &str) -> Currency {
    Currency::from_text(code).unwrap()
}

// IO layer - configuration loading and rate table import/export

pub mod config;
pub mod rates;

pub use config::*;
pub use rates::*;

use std::io::{Read, Write};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::application::{ExchangeRate, FixedExchange};
use crate::domain::{Currency, Factor};

/// One row of a rate table: `base,quote,rate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RateRecord {
    base: String,
    quote: String,
    rate: String,
}

/// Import a fixed rate table from CSV with a `base,quote,rate` header.
///
/// Rates may be decimal (`1.10`) or exact ratios (`10/11`). Any malformed row
/// aborts the import with its line number.
pub fn import_rates_csv<R: Read>(reader: R) -> Result<FixedExchange> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut rates = Vec::new();

    for (line_num, result) in csv_reader.deserialize::<RateRecord>().enumerate() {
        let line = line_num + 2; // +2 for header and 0-indexing
        let record = result.with_context(|| format!("CSV parse error on line {}", line))?;

        let rate = ExchangeRate {
            base: Currency::from_text(&record.base)
                .with_context(|| format!("Invalid base currency on line {}", line))?,
            counter: Currency::from_text(&record.quote)
                .with_context(|| format!("Invalid quote currency on line {}", line))?,
            rate: record
                .rate
                .parse::<Factor>()
                .with_context(|| format!("Invalid rate on line {}", line))?,
        };
        if rates
            .iter()
            .any(|r: &ExchangeRate| r.base == rate.base && r.counter == rate.counter)
        {
            warn!(line, base = %rate.base, quote = %rate.counter, "duplicate rate, keeping the last one");
        }
        rates.push(rate);
    }

    let exchange = FixedExchange::new(rates)?;
    debug!(rates = exchange.len(), "imported exchange rates");
    Ok(exchange)
}

/// Export a fixed rate table as CSV. Returns the number of rows written.
pub fn export_rates_csv<W: Write>(writer: W, exchange: &FixedExchange) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut count = 0;
    for rate in exchange.rates() {
        csv_writer.serialize(RateRecord {
            base: rate.base.to_string(),
            quote: rate.counter.to_string(),
            rate: rate.rate.to_string(),
        })?;
        count += 1;
    }

    csv_writer.flush()?;
    Ok(count)
}

//! CSV persistence of batch results.
//!
//! The signal file (`Pair,Signal,Score`) is the format trading-terminal
//! expert advisors poll; the currency file carries every derived field.

use crate::domain::batch::BatchResult;
use crate::domain::classifier::CurrencyResult;
use crate::domain::error::CotError;
use crate::ports::signal_port::SignalPort;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct SignalRecord {
    #[serde(rename = "Pair")]
    pair: String,
    #[serde(rename = "Signal")]
    signal: &'static str,
    #[serde(rename = "Score")]
    score: i32,
}

#[derive(Debug, Serialize)]
struct CurrencyRecord<'a> {
    symbol: &'a str,
    name: &'a str,
    long_positions: u64,
    short_positions: u64,
    long_change: i64,
    short_change: i64,
    shift: String,
    notional_value: i64,
    simple_delta: i64,
    weighted_long_change: i64,
    weighted_short_change: i64,
    raw_delta: i64,
    normalized_delta: f64,
    delta_percent: f64,
    historical_tier: &'static str,
    modern_tier: &'static str,
    final_tier: &'static str,
}

impl<'a> From<&'a CurrencyResult> for CurrencyRecord<'a> {
    fn from(r: &'a CurrencyResult) -> Self {
        Self {
            symbol: &r.symbol,
            name: &r.observation.name,
            long_positions: r.observation.long_positions,
            short_positions: r.observation.short_positions,
            long_change: r.observation.long_change,
            short_change: r.observation.short_change,
            shift: r.shift().to_string(),
            notional_value: r.notional_value,
            simple_delta: r.delta.simple_delta,
            weighted_long_change: r.delta.weighted_long_change,
            weighted_short_change: r.delta.weighted_short_change,
            raw_delta: r.delta.raw_delta,
            normalized_delta: r.delta.normalized_delta,
            delta_percent: r.delta.delta_percent,
            historical_tier: r.historical_tier.as_str(),
            modern_tier: r.modern_tier.as_str(),
            final_tier: r.final_tier.as_str(),
        }
    }
}

pub struct CsvSignalWriter;

const SIGNAL_HEADER: [&str; 3] = ["Pair", "Signal", "Score"];

const CURRENCY_HEADER: [&str; 17] = [
    "symbol",
    "name",
    "long_positions",
    "short_positions",
    "long_change",
    "short_change",
    "shift",
    "notional_value",
    "simple_delta",
    "weighted_long_change",
    "weighted_short_change",
    "raw_delta",
    "normalized_delta",
    "delta_percent",
    "historical_tier",
    "modern_tier",
    "final_tier",
];

/// Serializes `records` to `output_path`. `header` is written explicitly when
/// there are no records, since serialize() emits it with the first one only.
fn write_records<S: Serialize>(
    output_path: &Path,
    header: &[&str],
    records: impl IntoIterator<Item = S>,
) -> Result<(), CotError> {
    let write_err = |e: &dyn std::fmt::Display| {
        CotError::Io(format!("{}: {}", output_path.display(), e))
    };
    let mut wtr = csv::Writer::from_path(output_path).map_err(|e| write_err(&e))?;
    let mut written = 0usize;
    for record in records {
        wtr.serialize(record).map_err(|e| write_err(&e))?;
        written += 1;
    }
    if written == 0 {
        wtr.write_record(header).map_err(|e| write_err(&e))?;
    }
    wtr.flush().map_err(|e| write_err(&e))?;
    Ok(())
}

impl SignalPort for CsvSignalWriter {
    fn write_signals(&self, result: &BatchResult, output_path: &Path) -> Result<(), CotError> {
        write_records(
            output_path,
            &SIGNAL_HEADER,
            result.pairs.iter().map(|p| SignalRecord {
                pair: p.name(),
                signal: p.signal().as_str(),
                score: p.score,
            }),
        )
    }

    fn write_currencies(
        &self,
        result: &BatchResult,
        output_path: &Path,
    ) -> Result<(), CotError> {
        write_records(
            output_path,
            &CURRENCY_HEADER,
            result.currencies.iter().map(CurrencyRecord::from),
        )
    }
}

//! Batch run: every configured currency, then every configured pair.

use crate::domain::classifier::{evaluate_currency, CurrencyResult};
use crate::domain::error::CotError;
use crate::domain::observation::{CurrencyObservation, PositioningReport};
use crate::domain::pair::{score_definition, PairResult};
use crate::domain::universe::Universe;
use chrono::NaiveDate;
use tracing::{debug, info, warn};

/// A currency or pair left out of the run, and why.
#[derive(Debug, Clone)]
pub struct Omission {
    pub symbol: String,
    pub reason: CotError,
}

#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    pub as_of: Option<NaiveDate>,
    /// In universe order.
    pub currencies: Vec<CurrencyResult>,
    /// Descending by score; ties keep pair-definition order.
    pub pairs: Vec<PairResult>,
    pub omitted_currencies: Vec<Omission>,
    pub omitted_pairs: Vec<Omission>,
}

impl BatchResult {
    pub fn currency(&self, symbol: &str) -> Option<&CurrencyResult> {
        self.currencies.iter().find(|c| c.symbol == symbol)
    }

    pub fn omission_count(&self) -> usize {
        self.omitted_currencies.len()
    }
}

/// Runs the full evaluation over one report.
///
/// Fails only on configuration errors, which are checked before any row is
/// read. Data gaps (missing or malformed rows) drop the currency and every
/// pair that references it.
pub fn run_batch(report: &PositioningReport, universe: &Universe) -> Result<BatchResult, CotError> {
    universe.validate()?;

    let mut currencies = Vec::with_capacity(universe.count());
    let mut omitted_currencies = Vec::new();

    for profile in &universe.profiles {
        let evaluated = report
            .find(&profile.label)
            .ok_or_else(|| CotError::MissingData {
                symbol: profile.symbol.clone(),
                label: profile.label.clone(),
            })
            .and_then(CurrencyObservation::from_row)
            .and_then(|obs| evaluate_currency(&obs, profile));

        match evaluated {
            Ok(result) => {
                debug!(
                    symbol = %result.symbol,
                    simple_delta = result.delta.simple_delta,
                    delta_percent = result.delta.delta_percent,
                    historical = %result.historical_tier,
                    modern = %result.modern_tier,
                    final_tier = %result.final_tier,
                    "currency evaluated"
                );
                currencies.push(result);
            }
            Err(e) if e.is_recoverable() => {
                warn!(symbol = %profile.symbol, "skipping currency: {}", e);
                omitted_currencies.push(Omission {
                    symbol: profile.symbol.clone(),
                    reason: e,
                });
            }
            Err(e) => return Err(e),
        }
    }

    let mut pairs = Vec::with_capacity(universe.pairs.len());
    let mut omitted_pairs = Vec::new();

    for definition in &universe.pairs {
        match score_definition(definition, |symbol| {
            currencies.iter().find(|c| c.symbol == symbol)
        }) {
            Ok(pair) => pairs.push(pair),
            Err(e) => {
                warn!(pair = %definition, "skipping pair: {}", e);
                omitted_pairs.push(Omission {
                    symbol: definition.name(),
                    reason: e,
                });
            }
        }
    }

    // Stable: equal scores keep definition order.
    pairs.sort_by(|a, b| b.score.cmp(&a.score));

    info!(
        currencies = currencies.len(),
        pairs = pairs.len(),
        omitted_currencies = omitted_currencies.len(),
        omitted_pairs = omitted_pairs.len(),
        "batch complete"
    );

    Ok(BatchResult {
        as_of: report.as_of,
        currencies,
        pairs,
        omitted_currencies,
        omitted_pairs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::observation::ReportRow;
    use crate::domain::tier::Tier;

    fn row(label: &str, long_change: i64, short_change: i64) -> ReportRow {
        ReportRow {
            name: label.to_string(),
            long_positions: "100000".into(),
            short_positions: "100000".into(),
            long_change: long_change.to_string(),
            short_change: short_change.to_string(),
        }
    }

    fn label(universe: &Universe, symbol: &str) -> String {
        universe.profile(symbol).unwrap().label.clone()
    }

    fn full_report(universe: &Universe) -> PositioningReport {
        PositioningReport {
            as_of: NaiveDate::from_ymd_opt(2024, 11, 26),
            rows: universe
                .profiles
                .iter()
                .map(|p| row(&p.label, 100, 50))
                .collect(),
        }
    }

    #[test]
    fn evaluates_every_configured_currency() {
        let universe = Universe::builtin();
        let result = run_batch(&full_report(&universe), &universe).unwrap();
        assert_eq!(result.currencies.len(), 8);
        assert_eq!(result.pairs.len(), 7);
        assert_eq!(result.omission_count(), 0);
        assert_eq!(result.as_of, NaiveDate::from_ymd_opt(2024, 11, 26));
        let symbols: Vec<&str> = result.currencies.iter().map(|c| c.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["AUD", "GBP", "CAD", "EUR", "JPY", "CHF", "USD", "NZD"]);
    }

    #[test]
    fn missing_currency_drops_its_pairs() {
        let universe = Universe::builtin();
        let mut report = full_report(&universe);
        let usd = label(&universe, "USD");
        report.rows.retain(|r| r.name != usd);

        let result = run_batch(&report, &universe).unwrap();
        assert_eq!(result.currencies.len(), 7);
        assert!(result.currency("USD").is_none());
        // Every major pair has a USD leg.
        assert!(result.pairs.is_empty());
        assert_eq!(result.omitted_pairs.len(), 7);
        assert_eq!(result.omission_count(), 1);
        assert!(matches!(
            result.omitted_currencies[0].reason,
            CotError::MissingData { .. }
        ));
    }

    #[test]
    fn malformed_row_is_omitted() {
        let universe = Universe::builtin();
        let mut report = full_report(&universe);
        let eur = label(&universe, "EUR");
        for r in report.rows.iter_mut().filter(|r| r.name == eur) {
            r.long_change = "n/a".into();
        }

        let result = run_batch(&report, &universe).unwrap();
        assert!(result.currency("EUR").is_none());
        assert_eq!(result.pairs.len(), 6);
        assert!(result.pairs.iter().all(|p| p.base_symbol != "EUR"));
        assert!(matches!(
            result.omitted_currencies[0].reason,
            CotError::MalformedRow { .. }
        ));
    }

    #[test]
    fn configuration_error_aborts() {
        let mut universe = Universe::builtin();
        universe.profiles[0].max_historical_delta = 0;
        let err = run_batch(&full_report(&Universe::builtin()), &universe).unwrap_err();
        assert!(matches!(err, CotError::Configuration { .. }));
    }

    #[test]
    fn pairs_sorted_descending_with_stable_ties() {
        let universe = Universe::builtin();
        let mut report = full_report(&universe);
        // USD strongly sold: every XXXUSD pair scores high, every USDXXX low.
        let usd = label(&universe, "USD");
        for r in report.rows.iter_mut().filter(|r| r.name == usd) {
            r.long_change = "-5000".into();
            r.short_change = "5000".into();
        }

        let result = run_batch(&report, &universe).unwrap();
        assert_eq!(result.currency("USD").unwrap().final_tier, Tier::HighNegative);

        let scores: Vec<i32> = result.pairs.iter().map(|p| p.score).collect();
        let mut sorted = scores.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(scores, sorted);

        let names: Vec<String> = result.pairs.iter().map(|p| p.name()).collect();
        assert_eq!(
            names,
            vec!["EURUSD", "GBPUSD", "AUDUSD", "NZDUSD", "USDJPY", "USDCHF", "USDCAD"]
        );
    }

    #[test]
    fn extra_rows_are_ignored() {
        let universe = Universe::builtin();
        let mut report = full_report(&universe);
        report.rows.push(ReportRow {
            name: "WHEAT-SRW - CHICAGO BOARD OF TRADE".into(),
            ..ReportRow::default()
        });
        let result = run_batch(&report, &universe).unwrap();
        assert_eq!(result.omission_count(), 0);
    }
}

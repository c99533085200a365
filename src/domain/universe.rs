//! Instrument universe: the currencies to evaluate and the pairs to score.
//!
//! Ships with the eight CFTC currency futures and the seven USD majors; an INI
//! file can restrict, extend or recalibrate it (see `cli::build_universe`).

use crate::domain::error::CotError;
use crate::domain::instrument::{InstrumentProfile, ThresholdTable};
use crate::domain::pair::PairDefinition;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq)]
pub struct Universe {
    /// Evaluation order of the currencies.
    pub profiles: Vec<InstrumentProfile>,
    /// Pair definitions; their order breaks score ties.
    pub pairs: Vec<PairDefinition>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in list")]
    EmptyToken,

    #[error("duplicate entry: {0}")]
    Duplicate(String),

    #[error("invalid pair '{0}' (expected e.g. EURUSD or EUR/USD)")]
    InvalidPair(String),
}

struct BuiltinCurrency {
    symbol: &'static str,
    label: &'static str,
    notional: i64,
    max_delta: i64,
    absolute: ThresholdTable,
    percent: ThresholdTable,
}

const PERCENT_DEFAULT: ThresholdTable = ThresholdTable::new([0.0, 2.0, 5.0], [0.0, -2.0, -5.0]);

const BUILTIN_CURRENCIES: [BuiltinCurrency; 8] = [
    BuiltinCurrency {
        symbol: "AUD",
        label: "AUSTRALIAN DOLLAR - CHICAGO MERCANTILE EXCHANGE",
        notional: 100_000,
        max_delta: 1_000_000_000,
        absolute: ThresholdTable::new([0.0, 5266.45, 10536.5], [-1.0, -4116.26, -9555.62]),
        percent: ThresholdTable::new([0.0, 3.0, 7.0], [0.0, -3.0, -7.0]),
    },
    BuiltinCurrency {
        symbol: "GBP",
        label: "BRITISH POUND - CHICAGO MERCANTILE EXCHANGE",
        notional: 62_500,
        max_delta: 625_000_000,
        absolute: ThresholdTable::new([0.0, 6175.88, 13982.2], [-1.0, -5972.6, -15947.24]),
        percent: PERCENT_DEFAULT,
    },
    BuiltinCurrency {
        symbol: "CAD",
        label: "CANADIAN DOLLAR - CHICAGO MERCANTILE EXCHANGE",
        notional: 100_000,
        max_delta: 1_000_000_000,
        absolute: ThresholdTable::new([0.0, 5286.64, 12777.62], [-1.0, -5041.2, -12163.68]),
        percent: PERCENT_DEFAULT,
    },
    BuiltinCurrency {
        symbol: "EUR",
        label: "EURO FX - CHICAGO MERCANTILE EXCHANGE",
        notional: 125_000,
        max_delta: 1_250_000_000,
        absolute: ThresholdTable::new([0.0, 8045.12, 14254.48], [-1.0, -6282.6, -18102.4]),
        percent: PERCENT_DEFAULT,
    },
    BuiltinCurrency {
        symbol: "JPY",
        label: "JAPANESE YEN - CHICAGO MERCANTILE EXCHANGE",
        // 12,500,000 yen per contract, scaled by 1/100 to sit alongside the others.
        notional: 125_000,
        max_delta: 1_250_000_000,
        absolute: ThresholdTable::new([0.0, 11200.6, 24151.84], [-1.0, -6402.52, -13879.6]),
        percent: PERCENT_DEFAULT,
    },
    BuiltinCurrency {
        symbol: "CHF",
        label: "SWISS FRANC - CHICAGO MERCANTILE EXCHANGE",
        notional: 125_000,
        max_delta: 1_250_000_000,
        absolute: ThresholdTable::new([0.0, 822.3, 2705.64], [-1.0, -1765.72, -3815.56]),
        percent: PERCENT_DEFAULT,
    },
    BuiltinCurrency {
        symbol: "USD",
        label: "USD INDEX - ICE FUTURES U.S.",
        notional: 1_000,
        max_delta: 10_000_000,
        absolute: ThresholdTable::new([0.0, 579.0, 1271.44], [-1.0, -684.88, -1270.68]),
        percent: PERCENT_DEFAULT,
    },
    BuiltinCurrency {
        symbol: "NZD",
        label: "NZ DOLLAR - CHICAGO MERCANTILE EXCHANGE",
        notional: 100_000,
        max_delta: 1_000_000_000,
        absolute: ThresholdTable::new([0.0, 2557.26, 4250.02], [-1.0, -1946.8, -4773.2]),
        percent: PERCENT_DEFAULT,
    },
];

const MAJOR_PAIRS: [(&str, &str); 7] = [
    ("EUR", "USD"),
    ("GBP", "USD"),
    ("USD", "JPY"),
    ("USD", "CHF"),
    ("AUD", "USD"),
    ("USD", "CAD"),
    ("NZD", "USD"),
];

/// Built-in profile for `symbol`, if one ships with the crate.
pub fn builtin_profile(symbol: &str) -> Option<InstrumentProfile> {
    BUILTIN_CURRENCIES
        .iter()
        .find(|c| c.symbol == symbol)
        .map(|c| InstrumentProfile {
            symbol: c.symbol.to_string(),
            label: c.label.to_string(),
            notional_value: c.notional,
            max_historical_delta: c.max_delta,
            absolute_thresholds: c.absolute,
            percent_thresholds: c.percent,
        })
}

impl Universe {
    pub fn builtin() -> Self {
        Self {
            profiles: BUILTIN_CURRENCIES
                .iter()
                .filter_map(|c| builtin_profile(c.symbol))
                .collect(),
            pairs: MAJOR_PAIRS
                .iter()
                .map(|(base, quote)| PairDefinition::new(base, quote))
                .collect(),
        }
    }

    pub fn count(&self) -> usize {
        self.profiles.len()
    }

    pub fn profile(&self, symbol: &str) -> Option<&InstrumentProfile> {
        self.profiles.iter().find(|p| p.symbol == symbol)
    }

    /// Validates every profile and label uniqueness. Any failure is fatal.
    pub fn validate(&self) -> Result<(), CotError> {
        let mut symbols = HashSet::new();
        let mut labels = HashSet::new();
        for profile in &self.profiles {
            profile.validate()?;
            if !symbols.insert(profile.symbol.as_str()) {
                return Err(CotError::Configuration {
                    symbol: profile.symbol.clone(),
                    reason: "symbol configured twice".to_string(),
                });
            }
            if !labels.insert(profile.label.as_str()) {
                return Err(CotError::Configuration {
                    symbol: profile.symbol.clone(),
                    reason: format!("report label '{}' already used", profile.label),
                });
            }
        }
        Ok(())
    }
}

/// Parses a comma-separated symbol list, upper-cased, rejecting empty tokens
/// and duplicates.
pub fn parse_symbols(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut symbols = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let symbol = trimmed.to_uppercase();
        if !seen.insert(symbol.clone()) {
            return Err(UniverseError::Duplicate(symbol));
        }
        symbols.push(symbol);
    }

    Ok(symbols)
}

/// Parses `EURUSD,GBP/USD,...` into pair definitions.
pub fn parse_pairs(input: &str) -> Result<Vec<PairDefinition>, UniverseError> {
    let mut pairs = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let pair = parse_pair(trimmed)?;
        if !seen.insert(pair.name()) {
            return Err(UniverseError::Duplicate(pair.name()));
        }
        pairs.push(pair);
    }

    Ok(pairs)
}

fn parse_pair(token: &str) -> Result<PairDefinition, UniverseError> {
    let upper = token.to_uppercase();
    let (base, quote) = match upper.split_once('/') {
        Some((b, q)) => (b.trim().to_string(), q.trim().to_string()),
        None if upper.len() == 6 && upper.chars().all(|c| c.is_ascii_alphabetic()) => {
            (upper[..3].to_string(), upper[3..].to_string())
        }
        None => return Err(UniverseError::InvalidPair(token.to_string())),
    };
    if base.is_empty() || quote.is_empty() || base == quote {
        return Err(UniverseError::InvalidPair(token.to_string()));
    }
    Ok(PairDefinition { base, quote })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_universe_is_valid() {
        let universe = Universe::builtin();
        assert_eq!(universe.count(), 8);
        assert_eq!(universe.pairs.len(), 7);
        universe.validate().unwrap();
    }

    #[test]
    fn builtin_pairs_resolve_to_profiles() {
        let universe = Universe::builtin();
        for pair in &universe.pairs {
            assert!(universe.profile(&pair.base).is_some(), "{}", pair);
            assert!(universe.profile(&pair.quote).is_some(), "{}", pair);
        }
    }

    #[test]
    fn builtin_usd_profile() {
        let usd = builtin_profile("USD").unwrap();
        assert_eq!(usd.label, "USD INDEX - ICE FUTURES U.S.");
        assert_eq!(usd.notional_value, 1_000);
        assert_eq!(usd.max_historical_delta, 10_000_000);
        assert!(builtin_profile("XAU").is_none());
    }

    #[test]
    fn duplicate_symbol_fails_validation() {
        let mut universe = Universe::builtin();
        let mut dup = universe.profiles[0].clone();
        dup.label = "SOMETHING ELSE".into();
        universe.profiles.push(dup);
        let err = universe.validate().unwrap_err();
        assert!(matches!(err, CotError::Configuration { reason, .. } if reason.contains("twice")));
    }

    #[test]
    fn duplicate_label_fails_validation() {
        let mut universe = Universe::builtin();
        universe.profiles[1].label = universe.profiles[0].label.clone();
        assert!(universe.validate().is_err());
    }

    #[test]
    fn invalid_profile_fails_validation() {
        let mut universe = Universe::builtin();
        universe.profiles[3].notional_value = -1;
        let err = universe.validate().unwrap_err();
        assert!(matches!(err, CotError::Configuration { symbol, .. } if symbol == "EUR"));
    }

    #[test]
    fn parse_symbols_basic() {
        let result = parse_symbols(" eur, usd ,JPY").unwrap();
        assert_eq!(result, vec!["EUR", "USD", "JPY"]);
    }

    #[test]
    fn parse_symbols_empty_token() {
        assert!(matches!(parse_symbols("EUR,,USD"), Err(UniverseError::EmptyToken)));
    }

    #[test]
    fn parse_symbols_duplicate() {
        let result = parse_symbols("EUR,USD,eur");
        assert!(matches!(result, Err(UniverseError::Duplicate(s)) if s == "EUR"));
    }

    #[test]
    fn parse_pairs_both_notations() {
        let pairs = parse_pairs("eurusd, GBP/USD").unwrap();
        assert_eq!(pairs[0], PairDefinition::new("EUR", "USD"));
        assert_eq!(pairs[1], PairDefinition::new("GBP", "USD"));
    }

    #[test]
    fn parse_pairs_rejects_garbage() {
        assert!(matches!(parse_pairs("EURUS"), Err(UniverseError::InvalidPair(_))));
        assert!(matches!(parse_pairs("EUREUR"), Err(UniverseError::InvalidPair(_))));
        assert!(matches!(parse_pairs("EUR/"), Err(UniverseError::InvalidPair(_))));
    }

    #[test]
    fn parse_pairs_duplicate() {
        let result = parse_pairs("EURUSD,EUR/USD");
        assert!(matches!(result, Err(UniverseError::Duplicate(s)) if s == "EURUSD"));
    }
}

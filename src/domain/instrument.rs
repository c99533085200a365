//! Per-currency static configuration: contract notional, normalization
//! denominator and the two threshold tables.

use crate::domain::error::CotError;

/// Six-band threshold table.
///
/// The positive side is `(floor, low, medium)`: values in `(floor, low]` are low,
/// `(low, medium]` medium, above `medium` high. The negative side is
/// `(ceiling, low, medium)` read towards minus infinity: `[low, ceiling]` is low,
/// `[medium, low)` medium, below `medium` high. Only `low` and `medium` take part
/// in classification; `floor` and `ceiling` anchor the table and are validated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdTable {
    pub positive: [f64; 3],
    pub negative: [f64; 3],
}

impl ThresholdTable {
    pub const fn new(positive: [f64; 3], negative: [f64; 3]) -> Self {
        Self { positive, negative }
    }

    pub fn positive_low(&self) -> f64 {
        self.positive[1]
    }

    pub fn positive_medium(&self) -> f64 {
        self.positive[2]
    }

    pub fn negative_low(&self) -> f64 {
        self.negative[1]
    }

    pub fn negative_medium(&self) -> f64 {
        self.negative[2]
    }

    /// Checks the table shape; `reason` prefixes name the offending table.
    pub fn validate(&self, symbol: &str, table: &str) -> Result<(), CotError> {
        let invalid = |reason: String| CotError::Configuration {
            symbol: symbol.to_string(),
            reason: format!("{} thresholds: {}", table, reason),
        };

        if self
            .positive
            .iter()
            .chain(self.negative.iter())
            .any(|v| !v.is_finite())
        {
            return Err(invalid("boundaries must be finite".to_string()));
        }

        let [floor, p_low, p_med] = self.positive;
        if floor != 0.0 {
            return Err(invalid(format!("positive side must start at 0, got {}", floor)));
        }
        if !(floor < p_low && p_low < p_med) {
            return Err(invalid(format!(
                "positive boundaries must be strictly increasing, got {:?}",
                self.positive
            )));
        }

        let [ceiling, n_low, n_med] = self.negative;
        if !(-1.0..=0.0).contains(&ceiling) {
            return Err(invalid(format!(
                "negative side must end at -1 or 0, got {}",
                ceiling
            )));
        }
        if !(ceiling > n_low && n_low > n_med) {
            return Err(invalid(format!(
                "negative boundaries must be strictly decreasing, got {:?}",
                self.negative
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentProfile {
    pub symbol: String,
    /// Exact label of the instrument in the positioning report.
    pub label: String,
    /// USD value of one contract.
    pub notional_value: i64,
    pub max_historical_delta: i64,
    pub absolute_thresholds: ThresholdTable,
    pub percent_thresholds: ThresholdTable,
}

impl InstrumentProfile {
    pub fn validate(&self) -> Result<(), CotError> {
        if self.label.trim().is_empty() {
            return Err(CotError::Configuration {
                symbol: self.symbol.clone(),
                reason: "report label must not be empty".to_string(),
            });
        }
        if self.notional_value <= 0 {
            return Err(CotError::Configuration {
                symbol: self.symbol.clone(),
                reason: format!("notional must be positive, got {}", self.notional_value),
            });
        }
        if self.max_historical_delta <= 0 {
            return Err(CotError::Configuration {
                symbol: self.symbol.clone(),
                reason: format!(
                    "max_historical_delta must be positive, got {}",
                    self.max_historical_delta
                ),
            });
        }
        self.absolute_thresholds.validate(&self.symbol, "absolute")?;
        self.percent_thresholds.validate(&self.symbol, "percent")?;
        Ok(())
    }
}

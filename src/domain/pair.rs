//! Pair scoring: relative positioning pressure between two currencies.

use crate::domain::classifier::CurrencyResult;
use crate::domain::error::CotError;
use crate::domain::tier::Tier;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairDefinition {
    pub base: String,
    pub quote: String,
}

impl PairDefinition {
    pub fn new(base: &str, quote: &str) -> Self {
        Self {
            base: base.to_string(),
            quote: quote.to_string(),
        }
    }

    /// Conventional six-letter name, e.g. `EURUSD`.
    pub fn name(&self) -> String {
        format!("{}{}", self.base, self.quote)
    }
}

impl std::fmt::Display for PairDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.base, self.quote)
    }
}

/// Qualitative band for a pair score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrengthLabel {
    VeryStrongLong,
    StrongLong,
    ModeratelyStrong,
    Neutral,
    ModeratelyWeak,
    WeakShort,
    VeryWeakShort,
}

impl StrengthLabel {
    pub fn from_score(score: i32) -> Self {
        match score {
            s if s >= 5 => StrengthLabel::VeryStrongLong,
            3..=4 => StrengthLabel::StrongLong,
            1..=2 => StrengthLabel::ModeratelyStrong,
            0 => StrengthLabel::Neutral,
            -2..=-1 => StrengthLabel::ModeratelyWeak,
            -4..=-3 => StrengthLabel::WeakShort,
            _ => StrengthLabel::VeryWeakShort,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StrengthLabel::VeryStrongLong => "very-strong-long",
            StrengthLabel::StrongLong => "strong-long",
            StrengthLabel::ModeratelyStrong => "moderately-strong",
            StrengthLabel::Neutral => "neutral",
            StrengthLabel::ModeratelyWeak => "moderately-weak",
            StrengthLabel::WeakShort => "weak-short",
            StrengthLabel::VeryWeakShort => "very-weak-short",
        }
    }
}

impl std::fmt::Display for StrengthLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Directional instruction written to the signal file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeSignal {
    Buy,
    Sell,
    Neutral,
}

impl TradeSignal {
    pub fn from_score(score: i32) -> Self {
        match score.signum() {
            1 => TradeSignal::Buy,
            -1 => TradeSignal::Sell,
            _ => TradeSignal::Neutral,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TradeSignal::Buy => "BUY",
            TradeSignal::Sell => "SELL",
            TradeSignal::Neutral => "NEUTRAL",
        }
    }
}

impl std::fmt::Display for TradeSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PairResult {
    pub base_symbol: String,
    pub quote_symbol: String,
    pub base_tier: Tier,
    pub quote_tier: Tier,
    pub score: i32,
    pub strength_label: StrengthLabel,
}

impl PairResult {
    pub fn name(&self) -> String {
        format!("{}{}", self.base_symbol, self.quote_symbol)
    }

    pub fn signal(&self) -> TradeSignal {
        TradeSignal::from_score(self.score)
    }
}

/// Scores `base` against `quote` using their final tiers.
pub fn score_pair(base: &CurrencyResult, quote: &CurrencyResult) -> PairResult {
    let score = base.final_tier.severity() - quote.final_tier.severity();
    PairResult {
        base_symbol: base.symbol.clone(),
        quote_symbol: quote.symbol.clone(),
        base_tier: base.final_tier,
        quote_tier: quote.final_tier,
        score,
        strength_label: StrengthLabel::from_score(score),
    }
}

/// Resolves both legs of `pair` through `lookup` and scores them.
///
/// A leg with no result yields `MissingData`; the caller omits the pair.
pub fn score_definition<'a, F>(pair: &PairDefinition, lookup: F) -> Result<PairResult, CotError>
where
    F: Fn(&str) -> Option<&'a CurrencyResult>,
{
    let base = lookup(&pair.base).ok_or_else(|| CotError::MissingData {
        symbol: pair.base.clone(),
        label: pair.name(),
    })?;
    let quote = lookup(&pair.quote).ok_or_else(|| CotError::MissingData {
        symbol: pair.quote.clone(),
        label: pair.name(),
    })?;
    Ok(score_pair(base, quote))
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::domain::delta::DeltaMeasures;
    use crate::domain::observation::CurrencyObservation;

    fn result_with_tier(symbol: &str, tier: Tier) -> CurrencyResult {
        CurrencyResult {
            symbol: symbol.to_string(),
            observation: CurrencyObservation {
                name: symbol.to_string(),
                long_positions: 0,
                short_positions: 0,
                long_change: 0,
                short_change: 0,
            },
            notional_value: 100_000,
            delta: DeltaMeasures {
                simple_delta: 0,
                weighted_long_change: 0,
                weighted_short_change: 0,
                raw_delta: 0,
                normalized_delta: 0.0,
                delta_percent: 0.0,
            },
            historical_tier: tier,
            modern_tier: tier,
            final_tier: tier,
        }
    }

    #[test]
    fn strength_bands() {
        assert_eq!(StrengthLabel::from_score(6), StrengthLabel::VeryStrongLong);
        assert_eq!(StrengthLabel::from_score(5), StrengthLabel::VeryStrongLong);
        assert_eq!(StrengthLabel::from_score(4), StrengthLabel::StrongLong);
        assert_eq!(StrengthLabel::from_score(3), StrengthLabel::StrongLong);
        assert_eq!(StrengthLabel::from_score(2), StrengthLabel::ModeratelyStrong);
        assert_eq!(StrengthLabel::from_score(1), StrengthLabel::ModeratelyStrong);
        assert_eq!(StrengthLabel::from_score(0), StrengthLabel::Neutral);
        assert_eq!(StrengthLabel::from_score(-1), StrengthLabel::ModeratelyWeak);
        assert_eq!(StrengthLabel::from_score(-2), StrengthLabel::ModeratelyWeak);
        assert_eq!(StrengthLabel::from_score(-3), StrengthLabel::WeakShort);
        assert_eq!(StrengthLabel::from_score(-4), StrengthLabel::WeakShort);
        assert_eq!(StrengthLabel::from_score(-5), StrengthLabel::VeryWeakShort);
        assert_eq!(StrengthLabel::from_score(-6), StrengthLabel::VeryWeakShort);
    }

    #[test]
    fn strong_long_example() {
        let base = result_with_tier("AUD", Tier::LowPositive);
        let quote = result_with_tier("USD", Tier::MediumNegative);
        let pair = score_pair(&base, &quote);
        assert_eq!(pair.score, 3);
        assert_eq!(pair.strength_label, StrengthLabel::StrongLong);
        assert_eq!(pair.strength_label.to_string(), "strong-long");
        assert_eq!(pair.name(), "AUDUSD");
        assert_eq!(pair.signal(), TradeSignal::Buy);
    }

    #[test]
    fn signal_follows_sign() {
        assert_eq!(TradeSignal::from_score(-1), TradeSignal::Sell);
        assert_eq!(TradeSignal::from_score(0), TradeSignal::Neutral);
        assert_eq!(TradeSignal::from_score(6).as_str(), "BUY");
    }

    #[test]
    fn missing_leg_is_reported() {
        let eur = result_with_tier("EUR", Tier::HighPositive);
        let pair = PairDefinition::new("EUR", "USD");
        let err = score_definition(&pair, |s| (s == "EUR").then_some(&eur)).unwrap_err();
        assert!(
            matches!(err, CotError::MissingData { symbol, label } if symbol == "USD" && label == "EURUSD")
        );
    }

    #[test]
    fn definition_display() {
        let pair = PairDefinition::new("USD", "JPY");
        assert_eq!(pair.to_string(), "USDJPY");
        assert_eq!(pair.name(), "USDJPY");
    }
}

//! Dual classifier: absolute (historical) and percent (modern) tiers,
//! reconciled towards the less severe reading.

use crate::domain::delta::{compute_delta, DeltaMeasures};
use crate::domain::error::CotError;
use crate::domain::instrument::{InstrumentProfile, ThresholdTable};
use crate::domain::observation::{CurrencyObservation, PositionShift};
use crate::domain::tier::Tier;

/// Maps `value` to a tier. Boundaries belong to the band nearer zero, and
/// zero itself is low negative.
pub fn classify(value: f64, thresholds: &ThresholdTable) -> Tier {
    if value > 0.0 {
        if value <= thresholds.positive_low() {
            Tier::LowPositive
        } else if value <= thresholds.positive_medium() {
            Tier::MediumPositive
        } else {
            Tier::HighPositive
        }
    } else if value >= thresholds.negative_low() {
        Tier::LowNegative
    } else if value >= thresholds.negative_medium() {
        Tier::MediumNegative
    } else {
        Tier::HighNegative
    }
}

/// Picks the tier with the smaller absolute severity; ties keep `historical`.
pub fn reconcile(historical: Tier, modern: Tier) -> Tier {
    if historical.severity().abs() <= modern.severity().abs() {
        historical
    } else {
        modern
    }
}

/// Everything derived for one currency in one run.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyResult {
    pub symbol: String,
    pub observation: CurrencyObservation,
    pub notional_value: i64,
    pub delta: DeltaMeasures,
    pub historical_tier: Tier,
    pub modern_tier: Tier,
    pub final_tier: Tier,
}

impl CurrencyResult {
    pub fn shift(&self) -> PositionShift {
        self.observation.shift()
    }
}

pub fn evaluate_currency(
    observation: &CurrencyObservation,
    profile: &InstrumentProfile,
) -> Result<CurrencyResult, CotError> {
    let delta = compute_delta(observation, profile)?;
    let historical_tier = classify(delta.simple_delta as f64, &profile.absolute_thresholds);
    let modern_tier = classify(delta.delta_percent, &profile.percent_thresholds);

    Ok(CurrencyResult {
        symbol: profile.symbol.clone(),
        observation: observation.clone(),
        notional_value: profile.notional_value,
        delta,
        historical_tier,
        modern_tier,
        final_tier: reconcile(historical_tier, modern_tier),
    })
}

//! Delta calculator: contract-count, notional-weighted and normalized deltas.

use crate::domain::error::CotError;
use crate::domain::instrument::InstrumentProfile;
use crate::domain::observation::CurrencyObservation;

/// Scale of the normalized delta: a raw delta equal to the historical maximum
/// maps to this value.
pub const NORMALIZED_SCALE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeltaMeasures {
    /// `long_change - short_change`, in contracts.
    pub simple_delta: i64,
    pub weighted_long_change: i64,
    pub weighted_short_change: i64,
    /// Notional-weighted delta in USD.
    pub raw_delta: i64,
    /// `raw_delta / max_historical_delta * 10`. Not clamped.
    pub normalized_delta: f64,
    /// `normalized_delta * 10`, the scale the percent thresholds use.
    pub delta_percent: f64,
}

pub fn compute_delta(
    observation: &CurrencyObservation,
    profile: &InstrumentProfile,
) -> Result<DeltaMeasures, CotError> {
    if profile.max_historical_delta <= 0 {
        return Err(CotError::Configuration {
            symbol: profile.symbol.clone(),
            reason: format!(
                "max_historical_delta must be positive, got {}",
                profile.max_historical_delta
            ),
        });
    }
    if profile.notional_value <= 0 {
        return Err(CotError::Configuration {
            symbol: profile.symbol.clone(),
            reason: format!("notional must be positive, got {}", profile.notional_value),
        });
    }

    let overflow = |field: &str| CotError::MalformedRow {
        label: observation.name.clone(),
        field: field.to_string(),
        reason: "overflows the weighted delta range".to_string(),
    };

    let simple_delta = observation
        .long_change
        .checked_sub(observation.short_change)
        .ok_or_else(|| overflow("short_change"))?;
    let weighted_long_change = observation
        .long_change
        .checked_mul(profile.notional_value)
        .ok_or_else(|| overflow("long_change"))?;
    let weighted_short_change = observation
        .short_change
        .checked_mul(profile.notional_value)
        .ok_or_else(|| overflow("short_change"))?;
    let raw_delta = weighted_long_change
        .checked_sub(weighted_short_change)
        .ok_or_else(|| overflow("short_change"))?;

    let normalized_delta = normalize(raw_delta, profile.max_historical_delta);

    Ok(DeltaMeasures {
        simple_delta,
        weighted_long_change,
        weighted_short_change,
        raw_delta,
        normalized_delta,
        delta_percent: normalized_delta * 10.0,
    })
}

/// Linear rescale of `raw_delta` onto the +/-10 scale.
pub fn normalize(raw_delta: i64, max_historical_delta: i64) -> f64 {
    (raw_delta as f64 / max_historical_delta as f64) * NORMALIZED_SCALE
}

//! Derives an absolute threshold table from a history of weekly simple deltas.
//!
//! Each side of the table is split at its 33rd and 66th percentiles: positive
//! deltas up to p33 are low, up to p66 medium, beyond that high. Negative
//! deltas mirror this, p66 (closest to zero) being the low boundary.

use crate::domain::error::CotError;
use crate::domain::instrument::ThresholdTable;

pub const LOW_PERCENTILE: f64 = 33.0;
pub const MEDIUM_PERCENTILE: f64 = 66.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Calibration {
    pub thresholds: ThresholdTable,
    pub min: f64,
    pub max: f64,
    pub positive_samples: usize,
    pub negative_samples: usize,
}

/// Percentile with linear interpolation between closest ranks.
///
/// `sorted` must be ascending and non-empty.
pub fn percentile(sorted: &[f64], pct: f64) -> f64 {
    let rank = pct / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

pub fn calibrate(deltas: &[f64]) -> Result<Calibration, CotError> {
    let mut positive: Vec<f64> = deltas.iter().copied().filter(|v| *v > 0.0).collect();
    let mut negative: Vec<f64> = deltas.iter().copied().filter(|v| *v < 0.0).collect();

    if positive.is_empty() {
        return Err(CotError::Calibration {
            reason: "no positive deltas in history".to_string(),
        });
    }
    if negative.is_empty() {
        return Err(CotError::Calibration {
            reason: "no negative deltas in history".to_string(),
        });
    }

    positive.sort_by(f64::total_cmp);
    negative.sort_by(f64::total_cmp);

    let thresholds = ThresholdTable::new(
        [
            0.0,
            percentile(&positive, LOW_PERCENTILE),
            percentile(&positive, MEDIUM_PERCENTILE),
        ],
        [
            -1.0,
            percentile(&negative, MEDIUM_PERCENTILE),
            percentile(&negative, LOW_PERCENTILE),
        ],
    );

    thresholds
        .validate("history", "calibrated")
        .map_err(|e| CotError::Calibration {
            reason: format!("{} (too few distinct values?)", e),
        })?;

    Ok(Calibration {
        thresholds,
        min: negative[0],
        max: positive[positive.len() - 1],
        positive_samples: positive.len(),
        negative_samples: negative.len(),
    })
}

/// Parses one history line. `.` is a thousands separator (`-2.802` is -2802);
/// blank or non-numeric lines yield `None`.
pub fn parse_delta_line(line: &str) -> Option<f64> {
    let cleaned = line.trim().replace('.', "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<i64>().ok().map(|v| v as f64)
}

pub fn parse_history(content: &str) -> Vec<f64> {
    content.lines().filter_map(parse_delta_line).collect()
}

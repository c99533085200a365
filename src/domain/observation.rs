//! One week of positioning data for a single reporting instrument.

use crate::domain::error::CotError;
use chrono::NaiveDate;

/// A report row as handed over by a data port: the instrument label plus the
/// raw text of the four numeric fields. Parsing is deferred until the row is
/// matched against the universe so unrelated rows never produce errors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportRow {
    pub name: String,
    pub long_positions: String,
    pub short_positions: String,
    pub long_change: String,
    pub short_change: String,
}

/// One materialized positioning report.
#[derive(Debug, Clone, Default)]
pub struct PositioningReport {
    pub as_of: Option<NaiveDate>,
    pub rows: Vec<ReportRow>,
}

impl PositioningReport {
    /// First row whose name equals `label` exactly.
    pub fn find(&self, label: &str) -> Option<&ReportRow> {
        self.rows.iter().find(|row| row.name == label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyObservation {
    pub name: String,
    pub long_positions: u64,
    pub short_positions: u64,
    pub long_change: i64,
    pub short_change: i64,
}

/// Direction of the week's repositioning, judged on the raw changes only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionShift {
    /// Longs added while shorts were cut.
    Long,
    /// Shorts added while longs were cut.
    Short,
    Neutral,
}

impl std::fmt::Display for PositionShift {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PositionShift::Long => write!(f, "LONG"),
            PositionShift::Short => write!(f, "SHORT"),
            PositionShift::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

impl CurrencyObservation {
    pub fn from_row(row: &ReportRow) -> Result<Self, CotError> {
        Ok(Self {
            name: row.name.clone(),
            long_positions: parse_field(&row.name, "long_positions", &row.long_positions)?,
            short_positions: parse_field(&row.name, "short_positions", &row.short_positions)?,
            long_change: parse_field(&row.name, "long_change", &row.long_change)?,
            short_change: parse_field(&row.name, "short_change", &row.short_change)?,
        })
    }

    pub fn shift(&self) -> PositionShift {
        if self.long_change > 0 && self.short_change < 0 {
            PositionShift::Long
        } else if self.long_change < 0 && self.short_change > 0 {
            PositionShift::Short
        } else {
            PositionShift::Neutral
        }
    }
}

fn parse_field<T: std::str::FromStr>(label: &str, field: &str, raw: &str) -> Result<T, CotError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CotError::MalformedRow {
            label: label.to_string(),
            field: field.to_string(),
            reason: "is empty".to_string(),
        });
    }
    trimmed.parse().map_err(|_| CotError::MalformedRow {
        label: label.to_string(),
        field: field.to_string(),
        reason: format!("'{}' is not an integer", trimmed),
    })
}

//! CFTC futures-only report adapter.
//!
//! The comma-delimited report has no header row; fields are located by
//! position. Rows shorter than the layout yield empty fields, which only
//! become errors if the row belongs to a configured currency.

use crate::domain::error::CotError;
use crate::domain::observation::{PositioningReport, ReportRow};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::path::PathBuf;

/// Zero-based column positions of the fields the classifier needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub name: usize,
    pub date: usize,
    pub long_positions: usize,
    pub short_positions: usize,
    pub long_change: usize,
    pub short_change: usize,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            name: 0,
            date: 2,
            long_positions: 8,
            short_positions: 9,
            long_change: 38,
            short_change: 39,
        }
    }
}

pub struct CotCsvAdapter {
    path: PathBuf,
    layout: ColumnLayout,
}

impl CotCsvAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self::with_layout(path, ColumnLayout::default())
    }

    pub fn with_layout(path: PathBuf, layout: ColumnLayout) -> Self {
        Self { path, layout }
    }

    fn parse<R: std::io::Read>(&self, reader: R) -> Result<PositioningReport, CotError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let field = |record: &csv::StringRecord, idx: usize| -> String {
            record.get(idx).unwrap_or_default().to_string()
        };

        let mut report = PositioningReport::default();
        for result in rdr.records() {
            let record = result.map_err(|e| CotError::Report {
                reason: format!("CSV parse error: {}", e),
            })?;

            let name = field(&record, self.layout.name);
            if name.is_empty() {
                continue;
            }

            if report.as_of.is_none() {
                report.as_of =
                    NaiveDate::parse_from_str(&field(&record, self.layout.date), "%Y-%m-%d").ok();
            }

            report.rows.push(ReportRow {
                name,
                long_positions: field(&record, self.layout.long_positions),
                short_positions: field(&record, self.layout.short_positions),
                long_change: field(&record, self.layout.long_change),
                short_change: field(&record, self.layout.short_change),
            });
        }

        Ok(report)
    }
}

impl DataPort for CotCsvAdapter {
    fn load_report(&self) -> Result<PositioningReport, CotError> {
        let file = std::fs::File::open(&self.path).map_err(|e| CotError::Report {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;
        let report = self.parse(file)?;
        if report.rows.is_empty() {
            return Err(CotError::Report {
                reason: format!("{} contains no rows", self.path.display()),
            });
        }
        Ok(report)
    }
}

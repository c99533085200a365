#![allow(dead_code)]

use chrono::NaiveDate;
use cotsignal::domain::batch::BatchResult;
use cotsignal::domain::error::CotError;
use cotsignal::domain::instrument::{InstrumentProfile, ThresholdTable};
pub use cotsignal::domain::observation::{PositioningReport, ReportRow};
use cotsignal::domain::universe::Universe;
use cotsignal::ports::data_port::DataPort;
use cotsignal::ports::signal_port::SignalPort;
use std::cell::RefCell;
use std::path::{Path, PathBuf};

pub struct MockDataPort {
    pub report: PositioningReport,
    pub error: Option<String>,
}

impl MockDataPort {
    pub fn new(report: PositioningReport) -> Self {
        Self {
            report,
            error: None,
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            report: PositioningReport::default(),
            error: Some(reason.to_string()),
        }
    }
}

impl DataPort for MockDataPort {
    fn load_report(&self) -> Result<PositioningReport, CotError> {
        match &self.error {
            Some(reason) => Err(CotError::Report {
                reason: reason.clone(),
            }),
            None => Ok(self.report.clone()),
        }
    }
}

/// Records every write; paths listed in `fail_on` return an I/O error.
#[derive(Default)]
pub struct MockSignalPort {
    pub signal_writes: RefCell<Vec<(PathBuf, Vec<String>)>>,
    pub currency_writes: RefCell<Vec<(PathBuf, Vec<String>)>>,
    pub fail_on: Vec<PathBuf>,
}

impl MockSignalPort {
    pub fn failing_on(path: &str) -> Self {
        Self {
            fail_on: vec![PathBuf::from(path)],
            ..Self::default()
        }
    }

    fn check(&self, path: &Path) -> Result<(), CotError> {
        if self.fail_on.iter().any(|p| p == path) {
            return Err(CotError::Io(format!("{}: permission denied", path.display())));
        }
        Ok(())
    }
}

impl SignalPort for MockSignalPort {
    fn write_signals(&self, result: &BatchResult, output_path: &Path) -> Result<(), CotError> {
        self.check(output_path)?;
        let names = result.pairs.iter().map(|p| p.name()).collect();
        self.signal_writes
            .borrow_mut()
            .push((output_path.to_path_buf(), names));
        Ok(())
    }

    fn write_currencies(
        &self,
        result: &BatchResult,
        output_path: &Path,
    ) -> Result<(), CotError> {
        self.check(output_path)?;
        let symbols = result.currencies.iter().map(|c| c.symbol.clone()).collect();
        self.currency_writes
            .borrow_mut()
            .push((output_path.to_path_buf(), symbols));
        Ok(())
    }
}

pub fn make_row(label: &str, long_change: i64, short_change: i64) -> ReportRow {
    ReportRow {
        name: label.to_string(),
        long_positions: "150000".into(),
        short_positions: "90000".into(),
        long_change: long_change.to_string(),
        short_change: short_change.to_string(),
    }
}

/// One row per universe currency, changes given by `changes(symbol)`.
pub fn make_report<F>(universe: &Universe, changes: F) -> PositioningReport
where
    F: Fn(&str) -> (i64, i64),
{
    PositioningReport {
        as_of: NaiveDate::from_ymd_opt(2024, 11, 26),
        rows: universe
            .profiles
            .iter()
            .map(|p| {
                let (long_change, short_change) = changes(&p.symbol);
                make_row(&p.label, long_change, short_change)
            })
            .collect(),
    }
}

pub fn label_of(universe: &Universe, symbol: &str) -> String {
    universe.profile(symbol).unwrap().label.clone()
}

/// Thresholds used in the worked examples: absolute (0, 5000, 10000) and
/// percent (0, 2, 5), mirrored on the negative side.
pub fn example_profile(symbol: &str) -> InstrumentProfile {
    InstrumentProfile {
        symbol: symbol.to_string(),
        label: format!("{} TEST FUTURES", symbol),
        notional_value: 100_000,
        max_historical_delta: 1_000_000_000,
        absolute_thresholds: ThresholdTable::new(
            [0.0, 5000.0, 10000.0],
            [-1.0, -5000.0, -10000.0],
        ),
        percent_thresholds: ThresholdTable::new([0.0, 2.0, 5.0], [0.0, -2.0, -5.0]),
    }
}

//! Result persistence port trait.

use crate::domain::batch::BatchResult;
use crate::domain::error::CotError;
use std::path::Path;

/// Port for persisting the outcome of a batch run.
pub trait SignalPort {
    /// Writes the ranked pair signals.
    fn write_signals(&self, result: &BatchResult, output_path: &Path) -> Result<(), CotError>;

    /// Writes one record per evaluated currency.
    fn write_currencies(&self, result: &BatchResult, output_path: &Path)
        -> Result<(), CotError>;
}

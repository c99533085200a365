//! Positioning report access port trait.

use crate::domain::error::CotError;
use crate::domain::observation::PositioningReport;

/// Supplies one materialized positioning report per run.
pub trait DataPort {
    fn load_report(&self) -> Result<PositioningReport, CotError>;
}

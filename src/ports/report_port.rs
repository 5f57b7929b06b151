//! Report generation port trait.

use std::path::Path;

use crate::domain::error::SimtraderError;
use crate::domain::simulation::SimulationResult;

/// Sink for a finished simulation (chart data plus performance summary).
pub trait ReportPort {
    fn write(&self, result: &SimulationResult, output: &Path) -> Result<(), SimtraderError>;
}

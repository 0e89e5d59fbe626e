//! Report generation port trait.

use crate::domain::error::StratsimError;
use crate::domain::result::BacktestResult;

/// Port for writing backtest results to an output sink.
pub trait ReportPort {
    fn write(&self, result: &BacktestResult, output_path: &str) -> Result<(), StratsimError>;
}

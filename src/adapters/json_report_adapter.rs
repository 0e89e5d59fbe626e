//! JSON report adapter.
//!
//! Serializes a full [`BacktestResult`] so downstream consumers (chart
//! renderers, validators run elsewhere, spreadsheets) read the same
//! structure the engine produced.

use std::fs::File;
use std::io::BufWriter;

use tracing::info;

use crate::domain::error::StratsimError;
use crate::domain::result::BacktestResult;
use crate::ports::report_port::ReportPort;

pub struct JsonReportAdapter {
    pub pretty: bool,
}

impl JsonReportAdapter {
    pub fn new() -> Self {
        Self { pretty: true }
    }
}

impl Default for JsonReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for JsonReportAdapter {
    fn write(&self, result: &BacktestResult, output_path: &str) -> Result<(), StratsimError> {
        let file = File::create(output_path)?;
        let writer = BufWriter::new(file);
        let serialized = if self.pretty {
            serde_json::to_writer_pretty(writer, result)
        } else {
            serde_json::to_writer(writer, result)
        };
        serialized.map_err(|e| StratsimError::Report {
            reason: format!("failed to serialize result to {}: {}", output_path, e),
        })?;
        info!(output_path, trades = result.trades.len(), "report written");
        Ok(())
    }
}

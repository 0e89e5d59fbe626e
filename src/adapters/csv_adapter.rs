//! CSV file data adapter.
//!
//! Expected header: `timestamp,open,high,low,close,volume`. Timestamps
//! are normalized to unix seconds; rows with unparseable or non-finite
//! fields are skipped and counted, never fatal.

use std::path::Path;

use tracing::{debug, warn};

use crate::domain::candle::{normalize_timestamp, Candle};
use crate::domain::error::StratsimError;
use crate::ports::data_port::{CandleBatch, DataPort};

pub struct CsvAdapter;

impl CsvAdapter {
    pub fn new() -> Self {
        Self
    }

    fn parse_row(record: &csv::StringRecord) -> Option<Candle> {
        let timestamp = normalize_timestamp(record.get(0)?)?;
        let open: f64 = record.get(1)?.trim().parse().ok()?;
        let high: f64 = record.get(2)?.trim().parse().ok()?;
        let low: f64 = record.get(3)?.trim().parse().ok()?;
        let close: f64 = record.get(4)?.trim().parse().ok()?;
        if ![open, high, low, close].iter().all(|v| v.is_finite()) {
            return None;
        }

        // Volume is optional; a missing or bad field degrades to None
        // rather than dropping the row.
        let volume = record
            .get(5)
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite() && *v >= 0.0);

        Some(Candle {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        })
    }
}

impl Default for CsvAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl DataPort for CsvAdapter {
    fn fetch_candles(&self, source: &str) -> Result<CandleBatch, StratsimError> {
        let path = Path::new(source);
        let mut rdr = csv::Reader::from_path(path).map_err(|e| StratsimError::Data {
            reason: format!("failed to open {}: {}", path.display(), e),
        })?;

        let mut candles = Vec::new();
        let mut skipped_rows = 0usize;

        for result in rdr.records() {
            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    debug!(error = %e, "skipping malformed CSV record");
                    skipped_rows += 1;
                    continue;
                }
            };
            match Self::parse_row(&record) {
                Some(candle) => candles.push(candle),
                None => skipped_rows += 1,
            }
        }

        if candles.is_empty() {
            return Err(StratsimError::NoData {
                source_name: source.to_string(),
            });
        }

        candles.sort_by_key(|c| c.timestamp);
        if skipped_rows > 0 {
            warn!(skipped_rows, source, "ingest skipped malformed rows");
        }
        Ok(CandleBatch {
            candles,
            skipped_rows,
        })
    }
}

//! Candle data access port trait.

use crate::domain::candle::Candle;
use crate::domain::error::StratsimError;

/// Candles plus ingestion bookkeeping. Malformed rows are skipped, not
/// fatal; the count is surfaced so callers can decide whether the feed
/// is trustworthy.
#[derive(Debug, Clone)]
pub struct CandleBatch {
    /// Sorted by timestamp ascending.
    pub candles: Vec<Candle>,
    pub skipped_rows: usize,
}

pub trait DataPort {
    fn fetch_candles(&self, source: &str) -> Result<CandleBatch, StratsimError>;
}

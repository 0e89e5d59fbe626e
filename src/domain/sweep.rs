//! Parameter sweep driver.
//!
//! Runs one simulation per configuration in parallel. Each run owns an
//! independent signal source; the candle slice and indicator cache are
//! shared read-only, so no locking is needed. A failed configuration is
//! reported in place and never aborts its siblings.

use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;

use crate::domain::cache::IndicatorCache;
use crate::domain::candle::Candle;
use crate::domain::config::SimConfig;
use crate::domain::error::StratsimError;
use crate::domain::result::BacktestResult;
use crate::domain::signal::SignalSource;
use crate::domain::simulator;

/// One sweep entry's outcome, tagged with its position in the input so
/// callers can map results back to configurations.
#[derive(Debug)]
pub struct SweepOutcome {
    pub index: usize,
    pub result: Result<BacktestResult, StratsimError>,
}

/// Run every configuration against the same candles and cache.
///
/// Cancellation is cooperative and checked only at run boundaries; a run
/// already in flight finishes normally and runs not yet started report
/// [`StratsimError::Cancelled`].
pub fn run_sweep<F>(
    candles: &[Candle],
    cache: &IndicatorCache,
    configs: &[SimConfig],
    make_source: F,
    cancel: &AtomicBool,
) -> Vec<SweepOutcome>
where
    F: Fn() -> Box<dyn SignalSource> + Sync,
{
    configs
        .par_iter()
        .enumerate()
        .map(|(index, config)| {
            if cancel.load(Ordering::Relaxed) {
                return SweepOutcome {
                    index,
                    result: Err(StratsimError::Cancelled),
                };
            }
            let mut source = make_source();
            let result = simulator::run(candles, cache, source.as_mut(), config);
            SweepOutcome { index, result }
        })
        .collect()
}

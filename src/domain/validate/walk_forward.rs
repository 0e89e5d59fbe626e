//! Walk-forward windowed evaluation.
//!
//! Partitions the candle span into W non-overlapping windows, splits each
//! into a train segment and the test segment that immediately follows,
//! and re-runs the simulator on each segment with a fresh signal source.
//! A strategy that only works in-sample shows up as a large win-rate
//! degradation from train to test.

use serde::Serialize;

use crate::domain::cache::IndicatorCache;
use crate::domain::candle::Candle;
use crate::domain::config::SimConfig;
use crate::domain::error::StratsimError;
use crate::domain::signal::SignalSource;
use crate::domain::simulator;

#[derive(Debug, Clone, Copy)]
pub struct WalkForwardConfig {
    pub windows: usize,
    /// Share of each window given to the train segment, in (0, 1).
    pub train_ratio: f64,
}

impl Default for WalkForwardConfig {
    fn default() -> Self {
        WalkForwardConfig {
            windows: 5,
            train_ratio: 0.7,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WindowReport {
    pub window: usize,
    pub train_start: usize,
    pub test_start: usize,
    pub test_end: usize,
    pub train_trades: usize,
    pub test_trades: usize,
    pub train_win_rate: f64,
    pub test_win_rate: f64,
    pub train_profit_factor: f64,
    pub test_profit_factor: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct WalkForwardReport {
    pub windows: Vec<WindowReport>,
    pub avg_train_win_rate: f64,
    pub avg_test_win_rate: f64,
    /// avg_train_win_rate - avg_test_win_rate; positive means the
    /// strategy performs worse out of sample.
    pub win_rate_degradation: f64,
    /// In [0, 1]; penalizes both degradation magnitude and win-rate
    /// variance across test windows.
    pub consistency_score: f64,
}

/// `make_source` builds a fresh signal source per segment so no strategy
/// state leaks across windows.
pub fn walk_forward(
    candles: &[Candle],
    cache: &IndicatorCache,
    config: &SimConfig,
    make_source: &dyn Fn() -> Box<dyn SignalSource>,
    wf: &WalkForwardConfig,
) -> Result<WalkForwardReport, StratsimError> {
    if wf.windows == 0 {
        return Err(StratsimError::ConfigInvalid {
            key: "walk_forward.windows".into(),
            reason: "must be at least 1".into(),
        });
    }
    if !(wf.train_ratio > 0.0 && wf.train_ratio < 1.0) {
        return Err(StratsimError::ConfigInvalid {
            key: "walk_forward.train_ratio".into(),
            reason: "must be in (0, 1)".into(),
        });
    }
    // Every segment needs at least an entry bar and a resolution bar.
    let minimum = wf.windows * 4;
    if candles.len() < minimum {
        return Err(StratsimError::InsufficientData {
            candles: candles.len(),
            minimum,
        });
    }

    let window_len = candles.len() / wf.windows;
    let mut windows = Vec::with_capacity(wf.windows);
    let mut train_win_rates = Vec::with_capacity(wf.windows);
    let mut test_win_rates = Vec::with_capacity(wf.windows);

    for w in 0..wf.windows {
        let start = w * window_len;
        let end = if w == wf.windows - 1 {
            candles.len() - 1
        } else {
            (w + 1) * window_len - 1
        };
        let split = start + ((end - start) as f64 * wf.train_ratio) as usize;

        let train = run_segment(candles, cache, config, make_source, start, split)?;
        let test = run_segment(candles, cache, config, make_source, split, end)?;

        train_win_rates.push(train.metrics.win_rate);
        test_win_rates.push(test.metrics.win_rate);
        windows.push(WindowReport {
            window: w,
            train_start: start,
            test_start: split,
            test_end: end,
            train_trades: train.metrics.total_trades,
            test_trades: test.metrics.total_trades,
            train_win_rate: train.metrics.win_rate,
            test_win_rate: test.metrics.win_rate,
            train_profit_factor: train.metrics.profit_factor,
            test_profit_factor: test.metrics.profit_factor,
        });
    }

    let avg_train = mean(&train_win_rates);
    let avg_test = mean(&test_win_rates);
    let degradation = avg_train - avg_test;

    let variance = test_win_rates
        .iter()
        .map(|r| (r - avg_test).powi(2))
        .sum::<f64>()
        / test_win_rates.len() as f64;
    let consistency_score =
        ((1.0 - degradation.abs().min(1.0)) * (1.0 - variance.sqrt().min(1.0))).clamp(0.0, 1.0);

    Ok(WalkForwardReport {
        windows,
        avg_train_win_rate: avg_train,
        avg_test_win_rate: avg_test,
        win_rate_degradation: degradation,
        consistency_score,
    })
}

fn run_segment(
    candles: &[Candle],
    cache: &IndicatorCache,
    config: &SimConfig,
    make_source: &dyn Fn() -> Box<dyn SignalSource>,
    start: usize,
    end: usize,
) -> Result<crate::domain::result::BacktestResult, StratsimError> {
    let segment_config = SimConfig {
        start_index: start,
        end_index: Some(end),
        ..config.clone()
    };
    let mut source = make_source();
    simulator::run(candles, cache, source.as_mut(), &segment_config)
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

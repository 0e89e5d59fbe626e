//! Out-of-sample split evaluation.
//!
//! Splits the finished trade list chronologically at a ratio of the
//! candle span, computes metrics independently on both halves, and flags
//! likely overfitting when the out-of-sample half degrades past the
//! configured thresholds.

use serde::Serialize;

use crate::domain::metrics::Metrics;
use crate::domain::trade::Trade;

#[derive(Debug, Clone, Copy)]
pub struct OosConfig {
    /// Fraction of the candle span treated as in-sample, in (0, 1).
    pub split_ratio: f64,
    /// Absolute win-rate drop that flags overfitting.
    pub win_rate_delta_threshold: f64,
    /// Relative pnl-per-trade drop that flags overfitting.
    pub pnl_per_trade_delta_threshold: f64,
}

impl Default for OosConfig {
    fn default() -> Self {
        OosConfig {
            split_ratio: 0.7,
            win_rate_delta_threshold: 0.15,
            pnl_per_trade_delta_threshold: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OosReport {
    pub split_index: usize,
    pub in_sample: Metrics,
    pub out_of_sample: Metrics,
    /// in-sample win rate minus out-of-sample win rate.
    pub win_rate_delta: f64,
    /// Relative drop in average pnl per trade, 0 when in-sample made
    /// nothing per trade.
    pub pnl_per_trade_delta: f64,
    pub is_overfit: bool,
    pub recommendation: String,
}

/// `candle_count` is the length of the series the trades came from; the
/// split lands at `candle_count * split_ratio` and trades are assigned by
/// entry index. Both halves are replayed from the same initial balance so
/// their metrics are comparable.
pub fn out_of_sample(
    trades: &[Trade],
    candle_count: usize,
    initial_balance: f64,
    config: &OosConfig,
) -> OosReport {
    let ratio = config.split_ratio.clamp(0.01, 0.99);
    let split_index = (candle_count as f64 * ratio) as usize;

    let boundary = trades.partition_point(|t| t.entry_index < split_index);
    let (is_trades, oos_trades) = trades.split_at(boundary);

    let in_sample = Metrics::compute(is_trades, initial_balance);
    let out_sample = Metrics::compute(oos_trades, initial_balance);

    let win_rate_delta = in_sample.win_rate - out_sample.win_rate;

    let is_ppt = pnl_per_trade(&in_sample);
    let oos_ppt = pnl_per_trade(&out_sample);
    let pnl_per_trade_delta = if is_ppt.abs() > f64::EPSILON {
        (is_ppt - oos_ppt) / is_ppt.abs()
    } else {
        0.0
    };

    let is_overfit = win_rate_delta > config.win_rate_delta_threshold
        || pnl_per_trade_delta > config.pnl_per_trade_delta_threshold;

    let recommendation = if oos_trades.is_empty() {
        "no out-of-sample trades; extend the data range before drawing conclusions".to_string()
    } else if is_overfit {
        format!(
            "likely overfit: win rate dropped {:.1} points and pnl per trade dropped {:.0}% \
             out of sample; re-tune on a longer history or loosen the parameters",
            win_rate_delta * 100.0,
            pnl_per_trade_delta * 100.0
        )
    } else {
        "out-of-sample performance is consistent with in-sample; no overfit signal".to_string()
    };

    OosReport {
        split_index,
        in_sample,
        out_of_sample: out_sample,
        win_rate_delta,
        pnl_per_trade_delta,
        is_overfit,
        recommendation,
    }
}

fn pnl_per_trade(metrics: &Metrics) -> f64 {
    if metrics.total_trades > 0 {
        metrics.net_pnl / metrics.total_trades as f64
    } else {
        0.0
    }
}

//! Monte Carlo trade-order resampling.
//!
//! Shuffles the realized pnl sequence and replays it from the initial
//! balance, asking: how much of the backtest's outcome depends on the
//! lucky ordering of trades? Needs only the trade list, never candles.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;

use crate::domain::trade::Trade;
use crate::domain::validate::percentile;

#[derive(Debug, Clone, Copy)]
pub struct MonteCarloConfig {
    pub iterations: usize,
    /// Fixed seed for reproducible reports; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        MonteCarloConfig {
            iterations: 1000,
            seed: None,
        }
    }
}

/// 5th/25th/50th/75th/95th nearest-rank percentiles of one sampled
/// quantity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PercentileSummary {
    pub p5: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p95: f64,
}

impl PercentileSummary {
    fn from_samples(mut samples: Vec<f64>) -> Self {
        samples.sort_by(|a, b| a.total_cmp(b));
        PercentileSummary {
            p5: percentile(&samples, 5.0),
            p25: percentile(&samples, 25.0),
            p50: percentile(&samples, 50.0),
            p75: percentile(&samples, 75.0),
            p95: percentile(&samples, 95.0),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MonteCarloReport {
    pub iterations: usize,
    pub final_equity: PercentileSummary,
    pub max_drawdown: PercentileSummary,
    /// Share of permutations where equity touched zero or below.
    pub risk_of_ruin: f64,
    /// Share of permutations ending with positive net pnl.
    pub profit_probability: f64,
}

pub fn monte_carlo(
    trades: &[Trade],
    initial_balance: f64,
    config: &MonteCarloConfig,
) -> MonteCarloReport {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut pnls: Vec<f64> = trades.iter().map(|t| t.pnl).collect();
    let iterations = config.iterations;

    let mut finals = Vec::with_capacity(iterations);
    let mut drawdowns = Vec::with_capacity(iterations);
    let mut ruined = 0usize;
    let mut profitable = 0usize;

    for _ in 0..iterations {
        pnls.shuffle(&mut rng);

        let mut equity = initial_balance;
        let mut peak = initial_balance;
        let mut max_dd = 0.0_f64;
        let mut hit_zero = false;
        for pnl in &pnls {
            equity += pnl;
            if equity <= 0.0 {
                hit_zero = true;
            }
            if equity > peak {
                peak = equity;
            }
            let dd = peak - equity;
            if dd > max_dd {
                max_dd = dd;
            }
        }

        finals.push(equity);
        drawdowns.push(max_dd);
        if hit_zero {
            ruined += 1;
        }
        if equity > initial_balance {
            profitable += 1;
        }
    }

    let denom = iterations.max(1) as f64;
    MonteCarloReport {
        iterations,
        final_equity: PercentileSummary::from_samples(finals),
        max_drawdown: PercentileSummary::from_samples(drawdowns),
        risk_of_ruin: ruined as f64 / denom,
        profit_probability: profitable as f64 / denom,
    }
}

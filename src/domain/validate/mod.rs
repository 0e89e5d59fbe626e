//! Statistical validators.
//!
//! All three consume finished trade lists or re-run the simulator over
//! segments; none of them reach into engine internals.

pub mod monte_carlo;
pub mod out_of_sample;
pub mod walk_forward;

pub use monte_carlo::{monte_carlo, MonteCarloConfig, MonteCarloReport, PercentileSummary};
pub use out_of_sample::{out_of_sample, OosConfig, OosReport};
pub use walk_forward::{walk_forward, WalkForwardConfig, WalkForwardReport, WindowReport};

/// Nearest-rank percentile over an already sorted slice. Empty input
/// yields 0.0.
pub(crate) fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = (p / 100.0 * sorted.len() as f64).ceil() as usize;
    let idx = rank.clamp(1, sorted.len()) - 1;
    sorted[idx]
}

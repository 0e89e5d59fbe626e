//! Backtest result container.

use serde::Serialize;

use crate::domain::config::SimConfig;
use crate::domain::metrics::Metrics;
use crate::domain::trade::Trade;

/// Everything a single simulation run produces. Read-only after
/// construction; downstream consumers (validators, exporters, chart
/// renderers) work from this structure, never from engine internals.
#[derive(Debug, Clone, Serialize)]
pub struct BacktestResult {
    pub config: SimConfig,
    /// Chronological, non-overlapping.
    pub trades: Vec<Trade>,
    pub metrics: Metrics,
    /// Non-fatal incidents, e.g. signal-source errors caught per index.
    pub warnings: Vec<String>,
}

impl BacktestResult {
    pub fn new(config: SimConfig, trades: Vec<Trade>, warnings: Vec<String>) -> Self {
        let metrics = Metrics::compute(&trades, config.initial_balance);
        BacktestResult {
            config,
            trades,
            metrics,
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_derived_from_trades() {
        let config = SimConfig::default();
        let result = BacktestResult::new(config, vec![], vec!["warn".into()]);
        assert_eq!(result.metrics.total_trades, 0);
        assert_eq!(result.metrics.final_balance, 1000.0);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn serializes_to_json() {
        let result = BacktestResult::new(SimConfig::default(), vec![], vec![]);
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"metrics\""));
        assert!(json.contains("\"trades\""));
        assert!(json.contains("\"initial_balance\""));
    }
}

//! RSI mean-reversion signal source.
//!
//! Goes long when RSI drops below the oversold threshold, short when it
//! rises above the overbought threshold. One signal per threshold
//! crossing: the RSI must return inside the neutral zone before the same
//! side can fire again.

use crate::domain::error::SignalError;
use crate::domain::indicator::{IndicatorKind, IndicatorSnapshot};
use crate::domain::signal::{EntrySignal, SignalSource};

pub struct RsiReversion {
    period: usize,
    oversold: f64,
    overbought: f64,
    /// Set while RSI sits beyond a threshold; cleared when it re-enters
    /// the neutral zone.
    triggered: bool,
}

impl RsiReversion {
    pub fn new(period: usize, oversold: f64, overbought: f64) -> Self {
        RsiReversion {
            period,
            oversold,
            overbought,
            triggered: false,
        }
    }
}

impl Default for RsiReversion {
    fn default() -> Self {
        RsiReversion::new(14, 30.0, 70.0)
    }
}

impl SignalSource for RsiReversion {
    fn entry(
        &mut self,
        _index: usize,
        snapshot: &IndicatorSnapshot,
    ) -> Result<Option<EntrySignal>, SignalError> {
        // Warmup: no RSI yet, no signal.
        let Some(rsi) = snapshot.rsi else {
            return Ok(None);
        };
        if !rsi.is_finite() {
            return Err(SignalError::new("non-finite RSI value"));
        }

        if rsi > self.oversold && rsi < self.overbought {
            self.triggered = false;
            return Ok(None);
        }
        if self.triggered {
            return Ok(None);
        }
        self.triggered = true;

        if rsi <= self.oversold {
            Ok(Some(EntrySignal::long()))
        } else {
            Ok(Some(EntrySignal::short()))
        }
    }

    fn required_indicators(&self) -> Vec<IndicatorKind> {
        vec![IndicatorKind::Rsi(self.period)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::signal::Direction;

    fn snapshot_with_rsi(rsi: Option<f64>) -> IndicatorSnapshot {
        IndicatorSnapshot {
            rsi,
            ..IndicatorSnapshot::default()
        }
    }

    #[test]
    fn warmup_produces_no_signal() {
        let mut s = RsiReversion::default();
        let result = s.entry(0, &snapshot_with_rsi(None)).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn oversold_goes_long() {
        let mut s = RsiReversion::default();
        let signal = s.entry(20, &snapshot_with_rsi(Some(25.0))).unwrap().unwrap();
        assert_eq!(signal.direction, Direction::Long);
    }

    #[test]
    fn overbought_goes_short() {
        let mut s = RsiReversion::default();
        let signal = s.entry(20, &snapshot_with_rsi(Some(80.0))).unwrap().unwrap();
        assert_eq!(signal.direction, Direction::Short);
    }

    #[test]
    fn neutral_zone_is_silent() {
        let mut s = RsiReversion::default();
        assert!(s.entry(20, &snapshot_with_rsi(Some(50.0))).unwrap().is_none());
    }

    #[test]
    fn fires_once_per_excursion() {
        let mut s = RsiReversion::default();
        assert!(s.entry(20, &snapshot_with_rsi(Some(25.0))).unwrap().is_some());
        // Still oversold: no repeat signal.
        assert!(s.entry(21, &snapshot_with_rsi(Some(22.0))).unwrap().is_none());
        // Back inside the neutral zone, then oversold again: fires.
        assert!(s.entry(22, &snapshot_with_rsi(Some(45.0))).unwrap().is_none());
        assert!(s.entry(23, &snapshot_with_rsi(Some(28.0))).unwrap().is_some());
    }

    #[test]
    fn non_finite_rsi_is_an_error() {
        let mut s = RsiReversion::default();
        assert!(s.entry(20, &snapshot_with_rsi(Some(f64::NAN))).is_err());
    }

    #[test]
    fn requires_rsi_at_configured_period() {
        let s = RsiReversion::new(21, 30.0, 70.0);
        assert_eq!(s.required_indicators(), vec![IndicatorKind::Rsi(21)]);
    }
}

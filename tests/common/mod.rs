#![allow(dead_code)]

pub use stratsim::domain::candle::Candle;
use stratsim::domain::error::SignalError;
use stratsim::domain::indicator::{IndicatorKind, IndicatorSnapshot};
use stratsim::domain::signal::{EntrySignal, SignalSource};

pub const BASE_TS: i64 = 1_700_000_000;

pub fn candle(i: usize, open: f64, high: f64, low: f64, close: f64) -> Candle {
    Candle {
        timestamp: BASE_TS + i as i64 * 60,
        open,
        high,
        low,
        close,
        volume: Some(1_000.0),
    }
}

/// Flat series with a small high/low wiggle around `price`.
pub fn flat_series(n: usize, price: f64) -> Vec<Candle> {
    (0..n)
        .map(|i| candle(i, price, price + 0.05, price - 0.05, price))
        .collect()
}

/// Monotone rising series; every long trade eventually take-profits.
pub fn rising_series(n: usize, start: f64, step: f64) -> Vec<Candle> {
    (0..n)
        .map(|i| {
            let base = start + i as f64 * step;
            candle(i, base, base + step * 3.0, base - step * 0.4, base + step)
        })
        .collect()
}

/// Deterministic wavy series for strategy-level tests.
pub fn wavy_series(n: usize, mid: f64, amplitude: f64) -> Vec<Candle> {
    (0..n)
        .map(|i| {
            let base = mid + (i as f64 * 0.37).sin() * amplitude;
            candle(i, base, base + 0.8, base - 0.8, base + 0.2)
        })
        .collect()
}

/// Signal source that goes long at exactly the scripted indices.
pub struct ScriptedLongs {
    pub indices: Vec<usize>,
}

impl ScriptedLongs {
    pub fn at(indices: Vec<usize>) -> Self {
        Self { indices }
    }
}

impl SignalSource for ScriptedLongs {
    fn entry(
        &mut self,
        index: usize,
        _snapshot: &IndicatorSnapshot,
    ) -> Result<Option<EntrySignal>, SignalError> {
        if self.indices.contains(&index) {
            Ok(Some(EntrySignal::long()))
        } else {
            Ok(None)
        }
    }

    fn required_indicators(&self) -> Vec<IndicatorKind> {
        vec![]
    }
}

/// Goes long every `every` bars.
pub struct PeriodicLongs {
    pub every: usize,
}

impl SignalSource for PeriodicLongs {
    fn entry(
        &mut self,
        index: usize,
        _snapshot: &IndicatorSnapshot,
    ) -> Result<Option<EntrySignal>, SignalError> {
        if index % self.every == 0 {
            Ok(Some(EntrySignal::long()))
        } else {
            Ok(None)
        }
    }

    fn required_indicators(&self) -> Vec<IndicatorKind> {
        vec![]
    }
}

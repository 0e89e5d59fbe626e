//! Indicator pre-computation cache.
//!
//! Built once from a fixed candle array and a set of requested indicators;
//! every series is computed in a single forward pass and stored whole, so
//! point lookups by index are O(1). Immutable after `build`.

use crate::domain::candle::Candle;
use crate::domain::indicator::adx::calculate_adx;
use crate::domain::indicator::atr::calculate_atr;
use crate::domain::indicator::bollinger::calculate_bollinger;
use crate::domain::indicator::rsi::calculate_rsi;
use crate::domain::indicator::vwap::calculate_vwap;
use crate::domain::indicator::{IndicatorKind, IndicatorOutput, IndicatorSnapshot};

#[derive(Debug, Default)]
pub struct IndicatorCache {
    len: usize,
    rsi: Option<Vec<Option<f64>>>,
    atr: Option<Vec<Option<f64>>>,
    adx: Option<Vec<Option<f64>>>,
    plus_di: Option<Vec<Option<f64>>>,
    minus_di: Option<Vec<Option<f64>>>,
    bb_upper: Option<Vec<Option<f64>>>,
    bb_middle: Option<Vec<Option<f64>>>,
    bb_lower: Option<Vec<Option<f64>>>,
    vwap: Option<Vec<Option<f64>>>,
}

impl IndicatorCache {
    /// Compute every requested indicator series over `candles`. Duplicate
    /// requests of the same kind are computed once; a later request of the
    /// same indicator with different parameters overwrites the earlier one.
    pub fn build(candles: &[Candle], requests: &[IndicatorKind]) -> Self {
        let mut cache = IndicatorCache {
            len: candles.len(),
            ..Default::default()
        };

        for request in requests {
            match *request {
                IndicatorKind::Rsi(period) => {
                    cache.rsi = Some(calculate_rsi(candles, period));
                }
                IndicatorKind::Atr(period) => {
                    cache.atr = Some(calculate_atr(candles, period));
                }
                IndicatorKind::Adx(period) => {
                    let series = calculate_adx(candles, period);
                    cache.adx = Some(series.adx);
                    cache.plus_di = Some(series.plus_di);
                    cache.minus_di = Some(series.minus_di);
                }
                IndicatorKind::Bollinger {
                    period,
                    stddev_mult_x100,
                } => {
                    let series = calculate_bollinger(candles, period, stddev_mult_x100);
                    cache.bb_upper = Some(series.upper);
                    cache.bb_middle = Some(series.middle);
                    cache.bb_lower = Some(series.lower);
                }
                IndicatorKind::Vwap => {
                    cache.vwap = Some(calculate_vwap(candles));
                }
            }
        }

        cache
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Indicator values as of candle `index`. Unrequested indicators and
    /// warmup entries are `None`.
    pub fn snapshot(&self, index: usize) -> IndicatorSnapshot {
        let at = |series: &Option<Vec<Option<f64>>>| -> Option<f64> {
            series.as_ref().and_then(|s| s.get(index).copied().flatten())
        };
        IndicatorSnapshot {
            rsi: at(&self.rsi),
            atr: at(&self.atr),
            adx: at(&self.adx),
            plus_di: at(&self.plus_di),
            minus_di: at(&self.minus_di),
            bb_upper: at(&self.bb_upper),
            bb_middle: at(&self.bb_middle),
            bb_lower: at(&self.bb_lower),
            vwap: at(&self.vwap),
        }
    }

    /// Full series for one output column, one entry per candle, or `None`
    /// if the owning indicator was never requested.
    pub fn series(&self, output: IndicatorOutput) -> Option<&[Option<f64>]> {
        let series = match output {
            IndicatorOutput::Rsi => &self.rsi,
            IndicatorOutput::Atr => &self.atr,
            IndicatorOutput::Adx => &self.adx,
            IndicatorOutput::PlusDi => &self.plus_di,
            IndicatorOutput::MinusDi => &self.minus_di,
            IndicatorOutput::BbUpper => &self.bb_upper,
            IndicatorOutput::BbMiddle => &self.bb_middle,
            IndicatorOutput::BbLower => &self.bb_lower,
            IndicatorOutput::Vwap => &self.vwap,
        };
        series.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_candles(n: usize) -> Vec<Candle> {
        (0..n)
            .map(|i| {
                let close = 100.0 + (i as f64 * 0.3).sin() * 10.0;
                Candle {
                    timestamp: 1_700_000_000 + i as i64 * 60,
                    open: close,
                    high: close + 1.0,
                    low: close - 1.0,
                    close,
                    volume: Some(1000.0),
                }
            })
            .collect()
    }

    #[test]
    fn build_requested_series_only() {
        let candles = make_candles(50);
        let cache = IndicatorCache::build(&candles, &[IndicatorKind::Rsi(14)]);

        assert!(cache.series(IndicatorOutput::Rsi).is_some());
        assert!(cache.series(IndicatorOutput::Atr).is_none());
        assert!(cache.series(IndicatorOutput::BbMiddle).is_none());
    }

    #[test]
    fn bollinger_request_fills_all_bands() {
        let candles = make_candles(50);
        let cache = IndicatorCache::build(
            &candles,
            &[IndicatorKind::Bollinger {
                period: 20,
                stddev_mult_x100: 200,
            }],
        );

        assert!(cache.series(IndicatorOutput::BbUpper).is_some());
        assert!(cache.series(IndicatorOutput::BbMiddle).is_some());
        assert!(cache.series(IndicatorOutput::BbLower).is_some());
        let snap = cache.snapshot(30);
        assert!(snap.bb_upper.unwrap() >= snap.bb_middle.unwrap());
        assert!(snap.bb_middle.unwrap() >= snap.bb_lower.unwrap());
    }

    #[test]
    fn snapshot_matches_series() {
        let candles = make_candles(50);
        let cache = IndicatorCache::build(
            &candles,
            &[IndicatorKind::Rsi(14), IndicatorKind::Vwap],
        );

        let rsi_series = cache.series(IndicatorOutput::Rsi).unwrap();
        for i in 0..candles.len() {
            let snap = cache.snapshot(i);
            assert_eq!(snap.rsi, rsi_series[i]);
        }
    }

    #[test]
    fn snapshot_during_warmup_is_none() {
        let candles = make_candles(50);
        let cache = IndicatorCache::build(&candles, &[IndicatorKind::Rsi(14)]);
        assert!(cache.snapshot(0).rsi.is_none());
        assert!(cache.snapshot(13).rsi.is_none());
        assert!(cache.snapshot(14).rsi.is_some());
    }

    #[test]
    fn snapshot_out_of_range_is_none() {
        let candles = make_candles(10);
        let cache = IndicatorCache::build(&candles, &[IndicatorKind::Vwap]);
        let snap = cache.snapshot(999);
        assert_eq!(snap, IndicatorSnapshot::default());
    }

    #[test]
    fn series_length_matches_candles() {
        let candles = make_candles(42);
        let cache = IndicatorCache::build(
            &candles,
            &[IndicatorKind::Adx(14), IndicatorKind::Atr(14)],
        );
        assert_eq!(cache.len(), 42);
        assert_eq!(cache.series(IndicatorOutput::Adx).unwrap().len(), 42);
        assert_eq!(cache.series(IndicatorOutput::PlusDi).unwrap().len(), 42);
        assert_eq!(cache.series(IndicatorOutput::Atr).unwrap().len(), 42);
    }
}

//! ATR (Average True Range).
//!
//! True range of bar 0 is high - low (no previous close). First ATR value
//! at index period-1 is the simple mean of the first n true ranges;
//! afterwards Wilder smoothing: atr = (prev_atr * (n-1) + tr) / n.
//! Warmup: first (period-1) entries are `None`.

use crate::domain::candle::Candle;

pub fn calculate_atr(candles: &[Candle], period: usize) -> Vec<Option<f64>> {
    let mut values = vec![None; candles.len()];
    if period == 0 || candles.len() < period {
        return values;
    }

    let mut atr = 0.0;
    for (i, candle) in candles.iter().enumerate() {
        let tr = if i == 0 {
            candle.high - candle.low
        } else {
            candle.true_range(candles[i - 1].close)
        };

        if i < period {
            atr += tr / period as f64;
            if i + 1 < period {
                continue;
            }
        } else {
            atr = (atr * (period - 1) as f64 + tr) / period as f64;
        }
        values[i] = Some(atr);
    }

    values
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_candle(i: usize, open: f64, high: f64, low: f64, close: f64) -> Candle {
        Candle {
            timestamp: 1_700_000_000 + i as i64 * 60,
            open,
            high,
            low,
            close,
            volume: None,
        }
    }

    fn flat_candles(n: usize, range: f64) -> Vec<Candle> {
        (0..n)
            .map(|i| make_candle(i, 100.0, 100.0 + range, 100.0 - range, 100.0))
            .collect()
    }

    #[test]
    fn atr_warmup() {
        let candles = flat_candles(10, 1.0);
        let values = calculate_atr(&candles, 5);
        for v in values.iter().take(4) {
            assert!(v.is_none());
        }
        assert!(values[4].is_some());
    }

    #[test]
    fn atr_constant_range() {
        let candles = flat_candles(10, 1.0);
        let values = calculate_atr(&candles, 5);
        // Every bar's TR is 2.0; both seed average and Wilder smoothing
        // preserve the constant.
        for v in values.into_iter().flatten() {
            assert!((v - 2.0).abs() < 1e-12);
        }
    }

    #[test]
    fn atr_gap_widens_range() {
        let mut candles = flat_candles(6, 1.0);
        // Gap up: previous close 100, bar spans 109..111.
        candles.push(make_candle(6, 110.0, 111.0, 109.0, 110.0));
        let values = calculate_atr(&candles, 5);

        let before = values[5].unwrap();
        let after = values[6].unwrap();
        // TR for the gap bar is |111 - 100| = 11, pulling the average up.
        assert!(after > before);
        let expected = (before * 4.0 + 11.0) / 5.0;
        assert!((after - expected).abs() < 1e-12);
    }

    #[test]
    fn atr_too_few_candles() {
        let candles = flat_candles(3, 1.0);
        let values = calculate_atr(&candles, 5);
        assert!(values.iter().all(Option::is_none));
    }
}

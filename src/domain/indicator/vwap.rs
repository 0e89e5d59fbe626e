//! VWAP (Volume-Weighted Average Price).
//!
//! Cumulative over the whole array: sum(typical_price * volume) /
//! sum(volume). Candles without volume contribute weight 1.0, so a
//! volume-less feed degrades to a running mean of typical prices.
//! Available from index 0; there is no warmup.

use crate::domain::candle::Candle;

pub fn calculate_vwap(candles: &[Candle]) -> Vec<Option<f64>> {
    let mut values = Vec::with_capacity(candles.len());
    let mut pv_sum = 0.0;
    let mut vol_sum = 0.0;

    for candle in candles {
        let volume = candle.volume.unwrap_or(1.0);
        pv_sum += candle.typical_price() * volume;
        vol_sum += volume;
        if vol_sum > 0.0 {
            values.push(Some(pv_sum / vol_sum));
        } else {
            values.push(None);
        }
    }

    values
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_candle(i: usize, price: f64, volume: Option<f64>) -> Candle {
        Candle {
            timestamp: 1_700_000_000 + i as i64 * 60,
            open: price,
            high: price,
            low: price,
            close: price,
            volume,
        }
    }

    #[test]
    fn vwap_single_candle_is_typical_price() {
        let candles = vec![make_candle(0, 100.0, Some(500.0))];
        let values = calculate_vwap(&candles);
        assert!((values[0].unwrap() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn vwap_weights_by_volume() {
        let candles = vec![
            make_candle(0, 100.0, Some(100.0)),
            make_candle(1, 200.0, Some(300.0)),
        ];
        let values = calculate_vwap(&candles);
        let expected = (100.0 * 100.0 + 200.0 * 300.0) / 400.0;
        assert!((values[1].unwrap() - expected).abs() < 1e-10);
    }

    #[test]
    fn vwap_missing_volume_falls_back_to_mean() {
        let candles = vec![
            make_candle(0, 100.0, None),
            make_candle(1, 110.0, None),
            make_candle(2, 120.0, None),
        ];
        let values = calculate_vwap(&candles);
        assert!((values[2].unwrap() - 110.0).abs() < 1e-10);
    }

    #[test]
    fn vwap_zero_volume_candles_ignored() {
        let candles = vec![
            make_candle(0, 100.0, Some(500.0)),
            make_candle(1, 999.0, Some(0.0)),
        ];
        let values = calculate_vwap(&candles);
        assert!((values[1].unwrap() - 100.0).abs() < 1e-10);
    }

    #[test]
    fn vwap_empty() {
        assert!(calculate_vwap(&[]).is_empty());
    }
}

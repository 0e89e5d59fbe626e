//! Bollinger Bands.
//!
//! - Middle: simple moving average of closes over n periods
//! - Upper/Lower: middle ± multiplier × population stddev (divides by N)
//!
//! Warmup: first (period-1) entries are `None`.

use crate::domain::candle::Candle;

pub struct BollingerSeries {
    pub upper: Vec<Option<f64>>,
    pub middle: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

pub fn calculate_bollinger(
    candles: &[Candle],
    period: usize,
    stddev_mult_x100: u32,
) -> BollingerSeries {
    let n = candles.len();
    let mut series = BollingerSeries {
        upper: vec![None; n],
        middle: vec![None; n],
        lower: vec![None; n],
    };
    if period == 0 {
        return series;
    }
    let mult = stddev_mult_x100 as f64 / 100.0;

    for i in (period - 1)..n {
        let window = &candles[i + 1 - period..=i];
        let mean: f64 = window.iter().map(|c| c.close).sum::<f64>() / period as f64;
        let variance: f64 = window
            .iter()
            .map(|c| {
                let diff = c.close - mean;
                diff * diff
            })
            .sum::<f64>()
            / period as f64;
        let stddev = variance.sqrt();

        series.middle[i] = Some(mean);
        series.upper[i] = Some(mean + mult * stddev);
        series.lower[i] = Some(mean - mult * stddev);
    }

    series
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_candles(closes: &[f64]) -> Vec<Candle> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Candle {
                timestamp: 1_700_000_000 + i as i64 * 60,
                open: close,
                high: close,
                low: close,
                close,
                volume: Some(1000.0),
            })
            .collect()
    }

    #[test]
    fn bollinger_warmup() {
        let candles = make_candles(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let series = calculate_bollinger(&candles, 3, 200);
        assert!(series.middle[0].is_none());
        assert!(series.middle[1].is_none());
        assert!(series.middle[2].is_some());
        assert!(series.middle[4].is_some());
    }

    #[test]
    fn bollinger_constant_prices_collapse() {
        let candles = make_candles(&[100.0; 5]);
        let series = calculate_bollinger(&candles, 3, 200);
        assert!((series.upper[3].unwrap() - 100.0).abs() < f64::EPSILON);
        assert!((series.middle[3].unwrap() - 100.0).abs() < f64::EPSILON);
        assert!((series.lower[3].unwrap() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn bollinger_known_values() {
        let candles = make_candles(&[10.0, 20.0, 30.0]);
        let series = calculate_bollinger(&candles, 3, 200);

        let mean = 20.0;
        let variance: f64 = (100.0 + 0.0 + 100.0) / 3.0;
        let stddev = variance.sqrt();

        assert!((series.middle[2].unwrap() - mean).abs() < 1e-10);
        assert!((series.upper[2].unwrap() - (mean + 2.0 * stddev)).abs() < 1e-10);
        assert!((series.lower[2].unwrap() - (mean - 2.0 * stddev)).abs() < 1e-10);
    }

    #[test]
    fn bollinger_band_symmetry() {
        let candles = make_candles(&[10.0, 20.0, 30.0, 25.0, 15.0]);
        let series = calculate_bollinger(&candles, 3, 150);
        for i in 2..5 {
            let up = series.upper[i].unwrap() - series.middle[i].unwrap();
            let down = series.middle[i].unwrap() - series.lower[i].unwrap();
            assert!((up - down).abs() < 1e-10);
        }
    }

    #[test]
    fn bollinger_zero_period_all_none() {
        let candles = make_candles(&[10.0, 20.0]);
        let series = calculate_bollinger(&candles, 0, 200);
        assert!(series.middle.iter().all(Option::is_none));
    }
}

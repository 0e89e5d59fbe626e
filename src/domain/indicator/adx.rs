//! ADX (Average Directional Index) with +DI / -DI.
//!
//! Wilder's method:
//! - +DM = high[i] - high[i-1] when that move dominates and is positive,
//!   -DM symmetric on lows; smoothed with running Wilder sums
//!   (sum = prev_sum - prev_sum/n + current).
//! - +DI / -DI = 100 * smoothed DM / smoothed TR, valid from index n.
//! - DX = 100 * |+DI - -DI| / (+DI + -DI); ADX is the Wilder-smoothed DX,
//!   first value at index 2n-1 (mean of the first n DX values).

use crate::domain::candle::Candle;

pub struct AdxSeries {
    pub adx: Vec<Option<f64>>,
    pub plus_di: Vec<Option<f64>>,
    pub minus_di: Vec<Option<f64>>,
}

pub fn calculate_adx(candles: &[Candle], period: usize) -> AdxSeries {
    let n = candles.len();
    let mut series = AdxSeries {
        adx: vec![None; n],
        plus_di: vec![None; n],
        minus_di: vec![None; n],
    };
    if period == 0 || n <= period {
        return series;
    }

    let mut smooth_tr = 0.0;
    let mut smooth_plus = 0.0;
    let mut smooth_minus = 0.0;
    let mut adx = 0.0;
    let mut dx_seen = 0usize;

    for i in 1..n {
        let up = candles[i].high - candles[i - 1].high;
        let down = candles[i - 1].low - candles[i].low;
        let plus_dm = if up > down && up > 0.0 { up } else { 0.0 };
        let minus_dm = if down > up && down > 0.0 { down } else { 0.0 };
        let tr = candles[i].true_range(candles[i - 1].close);

        if i <= period {
            smooth_tr += tr;
            smooth_plus += plus_dm;
            smooth_minus += minus_dm;
            if i < period {
                continue;
            }
        } else {
            smooth_tr = smooth_tr - smooth_tr / period as f64 + tr;
            smooth_plus = smooth_plus - smooth_plus / period as f64 + plus_dm;
            smooth_minus = smooth_minus - smooth_minus / period as f64 + minus_dm;
        }

        if smooth_tr == 0.0 {
            continue;
        }
        let plus_di = 100.0 * smooth_plus / smooth_tr;
        let minus_di = 100.0 * smooth_minus / smooth_tr;
        series.plus_di[i] = Some(plus_di);
        series.minus_di[i] = Some(minus_di);

        let di_sum = plus_di + minus_di;
        if di_sum == 0.0 {
            continue;
        }
        let dx = 100.0 * (plus_di - minus_di).abs() / di_sum;
        dx_seen += 1;

        if dx_seen < period {
            adx += dx / period as f64;
        } else if dx_seen == period {
            adx += dx / period as f64;
            series.adx[i] = Some(adx);
        } else {
            adx = (adx * (period - 1) as f64 + dx) / period as f64;
            series.adx[i] = Some(adx);
        }
    }

    series
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_candle(i: usize, high: f64, low: f64, close: f64) -> Candle {
        Candle {
            timestamp: 1_700_000_000 + i as i64 * 60,
            open: close,
            high,
            low,
            close,
            volume: None,
        }
    }

    fn trending_up(n: usize) -> Vec<Candle> {
        (0..n)
            .map(|i| {
                let base = 100.0 + i as f64;
                make_candle(i, base + 1.0, base - 1.0, base)
            })
            .collect()
    }

    #[test]
    fn adx_warmup() {
        let candles = trending_up(40);
        let series = calculate_adx(&candles, 14);
        for i in 0..14 {
            assert!(series.plus_di[i].is_none(), "+DI at {} should be warmup", i);
        }
        assert!(series.plus_di[14].is_some());
        for i in 0..27 {
            assert!(series.adx[i].is_none(), "ADX at {} should be warmup", i);
        }
        assert!(series.adx[27].is_some());
    }

    #[test]
    fn uptrend_plus_di_dominates() {
        let candles = trending_up(40);
        let series = calculate_adx(&candles, 14);
        let plus = series.plus_di[30].unwrap();
        let minus = series.minus_di[30].unwrap();
        assert!(plus > minus);
    }

    #[test]
    fn strong_trend_high_adx() {
        let candles = trending_up(60);
        let series = calculate_adx(&candles, 14);
        let adx = series.adx[59].unwrap();
        assert!(adx > 25.0, "strong uptrend should give ADX > 25, got {}", adx);
    }

    #[test]
    fn adx_bounded() {
        let candles: Vec<Candle> = (0..60)
            .map(|i| {
                let base = 100.0 + ((i * 11) % 7) as f64;
                make_candle(i, base + 2.0, base - 2.0, base)
            })
            .collect();
        let series = calculate_adx(&candles, 14);
        for v in series.adx.into_iter().flatten() {
            assert!((0.0..=100.0).contains(&v));
        }
    }

    #[test]
    fn adx_too_few_candles() {
        let candles = trending_up(10);
        let series = calculate_adx(&candles, 14);
        assert!(series.adx.iter().all(Option::is_none));
        assert!(series.plus_di.iter().all(Option::is_none));
    }
}

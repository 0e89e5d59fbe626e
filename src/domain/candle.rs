//! OHLCV candle representation.

use chrono::NaiveDateTime;

/// Timestamps above this are assumed to be unix milliseconds and scaled down.
const MS_THRESHOLD: i64 = 1_000_000_000_000;

/// One OHLCV bar. `timestamp` is unix seconds after ingest normalization;
/// the simulator only ever indexes candles by position.
#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<f64>,
}

impl Candle {
    /// (high + low + close) / 3
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// max(high - low, |high - prev_close|, |low - prev_close|)
    pub fn true_range(&self, prev_close: f64) -> f64 {
        let hl = self.high - self.low;
        let hc = (self.high - prev_close).abs();
        let lc = (self.low - prev_close).abs();
        hl.max(hc).max(lc)
    }
}

/// Normalize a raw timestamp field to unix seconds.
///
/// Accepts unix seconds, unix milliseconds (values above 1e12 are scaled
/// down), or an ISO-8601 date/datetime string detected by the presence of
/// `-` or `/` separators.
pub fn normalize_timestamp(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.contains('-') || raw.contains('/') {
        let normalized = raw.replace('/', "-");
        let formats = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d"];
        for fmt in formats {
            if let Ok(dt) = NaiveDateTime::parse_from_str(&normalized, fmt) {
                return Some(dt.and_utc().timestamp());
            }
        }
        if let Ok(date) = chrono::NaiveDate::parse_from_str(&normalized, "%Y-%m-%d") {
            return Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp());
        }
        return None;
    }

    let numeric: f64 = raw.parse().ok()?;
    if !numeric.is_finite() {
        return None;
    }
    let ts = numeric as i64;
    if ts > MS_THRESHOLD {
        Some(ts / 1000)
    } else {
        Some(ts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_candle() -> Candle {
        Candle {
            timestamp: 1_700_000_000,
            open: 100.0,
            high: 110.0,
            low: 90.0,
            close: 105.0,
            volume: Some(50_000.0),
        }
    }

    #[test]
    fn typical_price() {
        let c = sample_candle();
        let expected = (110.0 + 90.0 + 105.0) / 3.0;
        assert!((c.typical_price() - expected).abs() < f64::EPSILON);
    }

    #[test]
    fn true_range_hl_dominates() {
        let c = sample_candle();
        assert!((c.true_range(100.0) - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn true_range_gap_up() {
        let c = sample_candle();
        assert!((c.true_range(70.0) - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn true_range_gap_down() {
        let c = sample_candle();
        assert!((c.true_range(130.0) - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn normalize_unix_seconds() {
        assert_eq!(normalize_timestamp("1700000000"), Some(1_700_000_000));
    }

    #[test]
    fn normalize_unix_milliseconds() {
        assert_eq!(normalize_timestamp("1700000000000"), Some(1_700_000_000));
    }

    #[test]
    fn normalize_iso_datetime() {
        let ts = normalize_timestamp("2024-01-15T12:30:00").unwrap();
        assert_eq!(ts, 1_705_321_800);
    }

    #[test]
    fn normalize_iso_date_only() {
        let ts = normalize_timestamp("2024-01-15").unwrap();
        assert_eq!(ts, 1_705_276_800);
    }

    #[test]
    fn normalize_slash_separated() {
        assert_eq!(
            normalize_timestamp("2024/01/15"),
            normalize_timestamp("2024-01-15")
        );
    }

    #[test]
    fn normalize_garbage_is_none() {
        assert_eq!(normalize_timestamp("not a time"), None);
        assert_eq!(normalize_timestamp("NaN"), None);
    }
}

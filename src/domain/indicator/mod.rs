//! Technical indicator implementations.
//!
//! Each submodule computes a full series in a single forward pass over the
//! candle array. Warmup entries are `None`; the simulator treats a `None`
//! as "no signal possible" at that index.

pub mod rsi;
pub mod atr;
pub mod adx;
pub mod bollinger;
pub mod vwap;

use std::fmt;

/// Indicator identity plus parameters. Used to request series from the
/// cache; `Adx` also yields the +DI/-DI outputs, `Bollinger` yields all
/// three bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorKind {
    Rsi(usize),
    Atr(usize),
    Adx(usize),
    Bollinger { period: usize, stddev_mult_x100: u32 },
    Vwap,
}

/// One scalar output column of the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorOutput {
    Rsi,
    Atr,
    Adx,
    PlusDi,
    MinusDi,
    BbUpper,
    BbMiddle,
    BbLower,
    Vwap,
}

/// Indicator values "as of" one candle index. Fields are `None` during the
/// indicator's warmup or when the indicator was not requested. Never
/// mutated after creation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IndicatorSnapshot {
    pub rsi: Option<f64>,
    pub atr: Option<f64>,
    pub adx: Option<f64>,
    pub plus_di: Option<f64>,
    pub minus_di: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_middle: Option<f64>,
    pub bb_lower: Option<f64>,
    pub vwap: Option<f64>,
}

impl IndicatorSnapshot {
    /// Field access by output column, for callers iterating over outputs.
    pub fn get(&self, output: IndicatorOutput) -> Option<f64> {
        match output {
            IndicatorOutput::Rsi => self.rsi,
            IndicatorOutput::Atr => self.atr,
            IndicatorOutput::Adx => self.adx,
            IndicatorOutput::PlusDi => self.plus_di,
            IndicatorOutput::MinusDi => self.minus_di,
            IndicatorOutput::BbUpper => self.bb_upper,
            IndicatorOutput::BbMiddle => self.bb_middle,
            IndicatorOutput::BbLower => self.bb_lower,
            IndicatorOutput::Vwap => self.vwap,
        }
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorKind::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorKind::Atr(period) => write!(f, "ATR({})", period),
            IndicatorKind::Adx(period) => write!(f, "ADX({})", period),
            IndicatorKind::Bollinger {
                period,
                stddev_mult_x100,
            } => {
                let mult = *stddev_mult_x100 as f64 / 100.0;
                write!(f, "BOLLINGER({},{})", period, mult)
            }
            IndicatorKind::Vwap => write!(f, "VWAP"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_display_rsi() {
        assert_eq!(IndicatorKind::Rsi(14).to_string(), "RSI(14)");
    }

    #[test]
    fn kind_display_bollinger() {
        let kind = IndicatorKind::Bollinger {
            period: 20,
            stddev_mult_x100: 200,
        };
        assert_eq!(kind.to_string(), "BOLLINGER(20,2)");
    }

    #[test]
    fn kind_hash_eq() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(IndicatorKind::Rsi(14));
        set.insert(IndicatorKind::Rsi(14));
        set.insert(IndicatorKind::Vwap);
        assert_eq!(set.len(), 2);
        assert!(set.contains(&IndicatorKind::Rsi(14)));
    }

    #[test]
    fn snapshot_default_is_all_none() {
        let snap = IndicatorSnapshot::default();
        assert!(snap.rsi.is_none());
        assert!(snap.bb_middle.is_none());
        assert!(snap.vwap.is_none());
    }
}

//! Entry-signal contract between strategies and the simulator.

use serde::Serialize;

use crate::domain::error::SignalError;
use crate::domain::indicator::{IndicatorKind, IndicatorSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    /// +1.0 for long, -1.0 for short.
    pub fn sign(self) -> f64 {
        match self {
            Direction::Long => 1.0,
            Direction::Short => -1.0,
        }
    }
}

/// An entry request produced by a signal source. `price` of `None` means
/// "enter at the current candle's close"; explicit TP/SL levels override
/// the percentage parameters in the simulator config.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntrySignal {
    pub direction: Direction,
    pub price: Option<f64>,
    pub take_profit: Option<f64>,
    pub stop_loss: Option<f64>,
}

impl EntrySignal {
    pub fn long() -> Self {
        Self {
            direction: Direction::Long,
            price: None,
            take_profit: None,
            stop_loss: None,
        }
    }

    pub fn short() -> Self {
        Self {
            direction: Direction::Short,
            price: None,
            take_profit: None,
            stop_loss: None,
        }
    }
}

/// A strategy's entry-decision capability.
///
/// Implementations may keep internal state across calls (e.g. a phase
/// machine) in their own struct, which is why `entry` takes `&mut self`.
/// They must not observe anything beyond `index`: the snapshot is the
/// only market data they get, and it is strictly causal.
///
/// An `Err` is caught by the simulator per index and downgraded to
/// "no signal" plus a warning on the result.
pub trait SignalSource {
    fn entry(
        &mut self,
        index: usize,
        snapshot: &IndicatorSnapshot,
    ) -> Result<Option<EntrySignal>, SignalError>;

    /// Indicators the source needs in its snapshots. The caller feeds
    /// these into [`crate::domain::cache::IndicatorCache::build`].
    fn required_indicators(&self) -> Vec<IndicatorKind>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_sign() {
        assert_eq!(Direction::Long.sign(), 1.0);
        assert_eq!(Direction::Short.sign(), -1.0);
    }

    #[test]
    fn entry_signal_constructors() {
        let long = EntrySignal::long();
        assert_eq!(long.direction, Direction::Long);
        assert!(long.price.is_none());
        assert!(long.take_profit.is_none());
        assert!(long.stop_loss.is_none());

        let short = EntrySignal::short();
        assert_eq!(short.direction, Direction::Short);
    }
}

//! Trade and equity bookkeeping.

use serde::Serialize;

use crate::domain::signal::Direction;

/// Terminal state of a resolved trade. Exactly one per trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitReason {
    TakeProfit,
    StopLoss,
    BandEarlyExit,
    TrailingBand,
    VwapCross,
    TimeStop,
    Timeout,
}

impl std::fmt::Display for ExitReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ExitReason::TakeProfit => "TAKE_PROFIT",
            ExitReason::StopLoss => "STOP_LOSS",
            ExitReason::BandEarlyExit => "BAND_EARLY_EXIT",
            ExitReason::TrailingBand => "TRAILING_BAND",
            ExitReason::VwapCross => "VWAP_CROSS",
            ExitReason::TimeStop => "TIME_STOP",
            ExitReason::Timeout => "TIMEOUT",
        };
        f.write_str(s)
    }
}

/// A closed round-trip. Owned by the simulator until appended to the
/// result's trade list; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trade {
    pub entry_index: usize,
    pub entry_price: f64,
    pub entry_time: i64,
    pub direction: Direction,
    pub stake: f64,
    pub take_profit: f64,
    pub stop_loss: f64,
    pub exit_index: usize,
    pub exit_price: f64,
    pub exit_time: i64,
    pub exit_reason: ExitReason,
    pub pnl: f64,
    pub bars_held: usize,
    /// Most favorable price excursion while open, as a fraction of entry.
    pub best_excursion: f64,
    /// Most adverse price excursion while open, as a fraction of entry.
    pub worst_excursion: f64,
}

/// Running equity accounting, mutated once per closed trade in
/// chronological order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquityState {
    pub equity: f64,
    pub peak_equity: f64,
    pub max_drawdown: f64,
    pub max_drawdown_pct: f64,
    pub win_streak: usize,
    pub loss_streak: usize,
    pub max_win_streak: usize,
    pub max_loss_streak: usize,
}

impl EquityState {
    pub fn new(initial_balance: f64) -> Self {
        EquityState {
            equity: initial_balance,
            peak_equity: initial_balance,
            max_drawdown: 0.0,
            max_drawdown_pct: 0.0,
            win_streak: 0,
            loss_streak: 0,
            max_win_streak: 0,
            max_loss_streak: 0,
        }
    }

    /// Apply one closed trade's pnl.
    pub fn apply(&mut self, pnl: f64) {
        self.equity += pnl;
        if self.equity > self.peak_equity {
            self.peak_equity = self.equity;
        }
        let drawdown = self.peak_equity - self.equity;
        if drawdown > self.max_drawdown {
            self.max_drawdown = drawdown;
            self.max_drawdown_pct = if self.peak_equity > 0.0 {
                drawdown / self.peak_equity * 100.0
            } else {
                0.0
            };
        }

        if pnl > 0.0 {
            self.win_streak += 1;
            self.loss_streak = 0;
            if self.win_streak > self.max_win_streak {
                self.max_win_streak = self.win_streak;
            }
        } else {
            self.loss_streak += 1;
            self.win_streak = 0;
            if self.loss_streak > self.max_loss_streak {
                self.max_loss_streak = self.loss_streak;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_reason_display() {
        assert_eq!(ExitReason::TakeProfit.to_string(), "TAKE_PROFIT");
        assert_eq!(ExitReason::BandEarlyExit.to_string(), "BAND_EARLY_EXIT");
        assert_eq!(ExitReason::TimeStop.to_string(), "TIME_STOP");
    }

    #[test]
    fn equity_tracks_peak_and_drawdown() {
        let mut eq = EquityState::new(1000.0);
        eq.apply(100.0); // 1100, peak 1100
        eq.apply(-300.0); // 800, dd 300
        eq.apply(50.0); // 850

        assert!((eq.equity - 850.0).abs() < f64::EPSILON);
        assert!((eq.peak_equity - 1100.0).abs() < f64::EPSILON);
        assert!((eq.max_drawdown - 300.0).abs() < f64::EPSILON);
        assert!((eq.max_drawdown_pct - 300.0 / 1100.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn equity_streak_counters() {
        let mut eq = EquityState::new(1000.0);
        for pnl in [10.0, 10.0, 10.0, -5.0, -5.0, 20.0] {
            eq.apply(pnl);
        }
        assert_eq!(eq.max_win_streak, 3);
        assert_eq!(eq.max_loss_streak, 2);
        assert_eq!(eq.win_streak, 1);
        assert_eq!(eq.loss_streak, 0);
    }

    #[test]
    fn breakeven_counts_as_loss_streak() {
        // pnl <= 0 is a loss for streak purposes, consistent with the
        // metrics aggregator's win/loss split.
        let mut eq = EquityState::new(1000.0);
        eq.apply(0.0);
        assert_eq!(eq.loss_streak, 1);
        assert_eq!(eq.win_streak, 0);
    }

    #[test]
    fn drawdown_never_negative() {
        let mut eq = EquityState::new(1000.0);
        eq.apply(50.0);
        eq.apply(50.0);
        assert_eq!(eq.max_drawdown, 0.0);
        assert_eq!(eq.max_drawdown_pct, 0.0);
    }
}

//! Aggregate performance metrics.
//!
//! A pure function of the trade list; every value is well-defined for a
//! zero-trade list (zeros, or the documented profit-factor sentinel).

use serde::Serialize;

use crate::domain::trade::Trade;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub total_trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub gross_profit: f64,
    pub gross_loss: f64,
    pub net_pnl: f64,
    /// gross_profit / gross_loss; +inf when gross_loss == 0 with profits,
    /// 0 when there are no profits either.
    pub profit_factor: f64,
    /// (win_rate * avg_win - loss_rate * avg_loss) / avg_stake.
    pub expectancy: f64,
    /// expectancy / stddev(pnls) * sqrt(n).
    pub sqn: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
    pub avg_bars_held: f64,
    pub max_drawdown: f64,
    pub max_drawdown_pct: f64,
    pub max_win_streak: usize,
    pub max_loss_streak: usize,
    pub final_balance: f64,
}

impl Metrics {
    pub fn compute(trades: &[Trade], initial_balance: f64) -> Self {
        let mut wins = 0usize;
        let mut losses = 0usize;
        let mut gross_profit = 0.0_f64;
        let mut gross_loss = 0.0_f64;
        let mut largest_win = 0.0_f64;
        let mut largest_loss = 0.0_f64;
        let mut total_bars = 0usize;
        let mut total_stake = 0.0_f64;

        // Single chronological replay covers equity, drawdown, and streaks.
        let mut equity = initial_balance;
        let mut peak = initial_balance;
        let mut max_drawdown = 0.0_f64;
        let mut max_drawdown_pct = 0.0_f64;
        let mut win_streak = 0usize;
        let mut loss_streak = 0usize;
        let mut max_win_streak = 0usize;
        let mut max_loss_streak = 0usize;

        for trade in trades {
            let pnl = trade.pnl;
            if pnl > 0.0 {
                wins += 1;
                gross_profit += pnl;
                if pnl > largest_win {
                    largest_win = pnl;
                }
                win_streak += 1;
                loss_streak = 0;
                max_win_streak = max_win_streak.max(win_streak);
            } else {
                losses += 1;
                gross_loss += pnl.abs();
                if pnl.abs() > largest_loss {
                    largest_loss = pnl.abs();
                }
                loss_streak += 1;
                win_streak = 0;
                max_loss_streak = max_loss_streak.max(loss_streak);
            }
            total_bars += trade.bars_held;
            total_stake += trade.stake;

            equity += pnl;
            if equity > peak {
                peak = equity;
            }
            let dd = peak - equity;
            if dd > max_drawdown {
                max_drawdown = dd;
                max_drawdown_pct = if peak > 0.0 { dd / peak * 100.0 } else { 0.0 };
            }
        }

        let n = trades.len();
        let win_rate = if n > 0 { wins as f64 / n as f64 } else { 0.0 };
        let loss_rate = if n > 0 { losses as f64 / n as f64 } else { 0.0 };

        let profit_factor = if gross_loss > 0.0 {
            gross_profit / gross_loss
        } else if gross_profit > 0.0 {
            f64::INFINITY
        } else {
            0.0
        };

        let avg_win = if wins > 0 {
            gross_profit / wins as f64
        } else {
            0.0
        };
        let avg_loss = if losses > 0 {
            gross_loss / losses as f64
        } else {
            0.0
        };
        let avg_stake = if n > 0 { total_stake / n as f64 } else { 0.0 };

        let expectancy = if avg_stake > 0.0 {
            (win_rate * avg_win - loss_rate * avg_loss) / avg_stake
        } else {
            0.0
        };

        let sqn = if n > 1 {
            let mean = trades.iter().map(|t| t.pnl).sum::<f64>() / n as f64;
            let variance = trades
                .iter()
                .map(|t| (t.pnl - mean).powi(2))
                .sum::<f64>()
                / n as f64;
            let stddev = variance.sqrt();
            if stddev > 0.0 {
                expectancy / stddev * (n as f64).sqrt()
            } else {
                0.0
            }
        } else {
            0.0
        };

        Metrics {
            total_trades: n,
            wins,
            losses,
            win_rate,
            gross_profit,
            gross_loss,
            net_pnl: gross_profit - gross_loss,
            profit_factor,
            expectancy,
            sqn,
            avg_win,
            avg_loss,
            largest_win,
            largest_loss,
            avg_bars_held: if n > 0 { total_bars as f64 / n as f64 } else { 0.0 },
            max_drawdown,
            max_drawdown_pct,
            max_win_streak,
            max_loss_streak,
            final_balance: equity,
        }
    }
}

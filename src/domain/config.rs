//! Simulation configuration.
//!
//! Every option has a named default; callers override with struct update
//! syntax (`SimConfig { tp_pct: 2.0, ..SimConfig::default() }`) or through
//! the INI adapter, which merges file values over these defaults.

use serde::Serialize;

use crate::domain::error::StratsimError;

/// Partial take-profit: on first touch of the chosen level, close
/// `fraction` of the stake there and keep simulating the remainder with
/// the original TP/SL.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PartialTakeProfit {
    pub enabled: bool,
    pub at_band_middle: bool,
    pub at_vwap: bool,
    /// Fraction of the stake closed at the partial level, in (0, 1].
    pub fraction: f64,
}

impl Default for PartialTakeProfit {
    fn default() -> Self {
        PartialTakeProfit {
            enabled: false,
            at_band_middle: false,
            at_vwap: false,
            fraction: 0.5,
        }
    }
}

/// Time-based forced exit for stagnant trades: after `bars` bars held
/// with pnl below `min_pnl_pct` percent (and, optionally, the price
/// actively moving against the position), close at the current close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZombieKiller {
    pub enabled: bool,
    pub bars: usize,
    pub min_pnl_pct: f64,
    pub only_if_reversing: bool,
}

impl Default for ZombieKiller {
    fn default() -> Self {
        ZombieKiller {
            enabled: false,
            bars: 30,
            min_pnl_pct: 0.1,
            only_if_reversing: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimConfig {
    /// Take-profit distance in percent of entry price. Default 1.0.
    pub tp_pct: f64,
    /// Stop-loss distance in percent of entry price. Default 0.5.
    pub sl_pct: f64,
    /// Bars to wait after an exit before a new entry. Default 0.
    pub cooldown_bars: usize,
    /// Forced timeout horizon per trade. Default 60.
    pub max_bars_in_trade: usize,
    /// Starting equity. Default 1000.0.
    pub initial_balance: f64,
    /// Fraction of current equity staked per trade, in (0, 1]. Default 1.0.
    pub stake_pct: f64,
    /// Linear pnl multiplier (leverage). Default 1.0.
    pub multiplier: f64,
    /// First candle index eligible for entries. Default 0.
    pub start_index: usize,
    /// Last candle index (inclusive); `None` means the last candle.
    pub end_index: Option<usize>,
    /// Exit at the middle Bollinger band. Default false.
    pub exit_on_band_middle: bool,
    /// Early exit at the opposing outer Bollinger band. Default false.
    pub exit_on_outer_band: bool,
    /// Minimum realized pnl (currency) required for the outer-band exit
    /// to fire. Default 0.0.
    pub min_pnl_for_outer_band_exit: f64,
    /// Exit when price crosses VWAP against the position. Default false.
    pub exit_on_vwap: bool,
    /// Arm a trailing stop at the mid-band; exit on a re-cross against
    /// the position. Mutually exclusive with `exit_on_band_middle`.
    /// Default false.
    pub trailing_from_band_middle: bool,
    pub partial_take_profit: PartialTakeProfit,
    pub zombie_killer: ZombieKiller,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            tp_pct: 1.0,
            sl_pct: 0.5,
            cooldown_bars: 0,
            max_bars_in_trade: 60,
            initial_balance: 1000.0,
            stake_pct: 1.0,
            multiplier: 1.0,
            start_index: 0,
            end_index: None,
            exit_on_band_middle: false,
            exit_on_outer_band: false,
            min_pnl_for_outer_band_exit: 0.0,
            exit_on_vwap: false,
            trailing_from_band_middle: false,
            partial_take_profit: PartialTakeProfit::default(),
            zombie_killer: ZombieKiller::default(),
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), StratsimError> {
        let invalid = |key: &str, reason: &str| {
            Err(StratsimError::ConfigInvalid {
                key: key.into(),
                reason: reason.into(),
            })
        };

        if self.initial_balance <= 0.0 {
            return invalid("initial_balance", "must be positive");
        }
        if !(self.stake_pct > 0.0 && self.stake_pct <= 1.0) {
            return invalid("stake_pct", "must be in (0, 1]");
        }
        if self.tp_pct < 0.0 || self.sl_pct < 0.0 {
            return invalid("tp_pct/sl_pct", "must be non-negative");
        }
        if self.multiplier <= 0.0 {
            return invalid("multiplier", "must be positive");
        }
        if self.max_bars_in_trade == 0 {
            return invalid("max_bars_in_trade", "must be at least 1");
        }
        if let Some(end) = self.end_index {
            if end <= self.start_index {
                return invalid("end_index", "must be greater than start_index");
            }
        }
        if self.trailing_from_band_middle && self.exit_on_band_middle {
            return invalid(
                "trailing_from_band_middle",
                "mutually exclusive with exit_on_band_middle",
            );
        }
        let ptp = &self.partial_take_profit;
        if ptp.enabled && !(ptp.fraction > 0.0 && ptp.fraction <= 1.0) {
            return invalid("partial_take_profit.fraction", "must be in (0, 1]");
        }
        if self.zombie_killer.enabled && self.zombie_killer.bars == 0 {
            return invalid("zombie_killer.bars", "must be at least 1");
        }
        Ok(())
    }
}

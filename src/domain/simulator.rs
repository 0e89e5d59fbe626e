//! Trade lifecycle simulator.
//!
//! The central loop: scan the candle stream, respect cooldown, open trades
//! through the signal source, and resolve each open trade through the
//! fixed-priority exit ladder. Single-threaded and deterministic; ordering
//! is enforced purely by increasing candle index.
//!
//! Within one bar the stop-loss is always evaluated before any
//! profit-taking rule. OHLC data cannot disambiguate the intrabar path, so
//! the engine assumes the pessimistic ordering; changing this would
//! silently change every reported backtest.

use tracing::warn;

use crate::domain::cache::IndicatorCache;
use crate::domain::candle::Candle;
use crate::domain::config::SimConfig;
use crate::domain::error::StratsimError;
use crate::domain::indicator::IndicatorKind;
use crate::domain::result::BacktestResult;
use crate::domain::signal::{Direction, EntrySignal, SignalSource};
use crate::domain::trade::{EquityState, ExitReason, Trade};

/// Indicators the exit ladder itself reads, given the configured exit
/// options. Callers union these with the signal source's requirements
/// when building the cache.
pub fn engine_indicators(config: &SimConfig) -> Vec<IndicatorKind> {
    let mut kinds = Vec::new();
    let wants_bands = config.exit_on_band_middle
        || config.exit_on_outer_band
        || config.trailing_from_band_middle
        || (config.partial_take_profit.enabled && config.partial_take_profit.at_band_middle);
    if wants_bands {
        kinds.push(IndicatorKind::Bollinger {
            period: 20,
            stddev_mult_x100: 200,
        });
    }
    let wants_vwap = config.exit_on_vwap
        || (config.partial_take_profit.enabled && config.partial_take_profit.at_vwap);
    if wants_vwap {
        kinds.push(IndicatorKind::Vwap);
    }
    kinds
}

/// Run one full simulation over `candles`.
///
/// The cache must have been built over the same candle array. Signal
/// source errors are downgraded to per-index warnings; the only hard
/// failures are invalid configuration.
pub fn run(
    candles: &[Candle],
    cache: &IndicatorCache,
    source: &mut dyn SignalSource,
    config: &SimConfig,
) -> Result<BacktestResult, StratsimError> {
    config.validate()?;

    let mut trades: Vec<Trade> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    if candles.len() < 2 {
        return Ok(BacktestResult::new(config.clone(), trades, warnings));
    }

    let end = config
        .end_index
        .map(|e| e.min(candles.len() - 1))
        .unwrap_or(candles.len() - 1);
    let mut equity = EquityState::new(config.initial_balance);
    let mut i = config.start_index;

    // Entries stop one bar before the end so every trade gets at least one
    // resolution bar.
    while i < end {
        let snapshot = cache.snapshot(i);
        let signal = match source.entry(i, &snapshot) {
            Ok(s) => s,
            Err(e) => {
                warn!(index = i, error = %e, "signal source failed; treating as no-signal");
                warnings.push(format!("index {}: {}", i, e));
                None
            }
        };
        let Some(signal) = signal else {
            i += 1;
            continue;
        };

        let stake = equity.equity * config.stake_pct;
        let trade = resolve_trade(candles, cache, config, &signal, i, stake, end);
        equity.apply(trade.pnl);
        // Next entry is allowed at exit_index + cooldown_bars, which keeps
        // the invariant entry[k+1] >= exit[k] + cooldown_bars.
        i = trade.exit_index + config.cooldown_bars;
        trades.push(trade);
    }

    Ok(BacktestResult::new(config.clone(), trades, warnings))
}

struct OpenState {
    /// Fraction of the stake still open (partial TP reduces it).
    remaining: f64,
    /// Currency pnl already realized by a partial close.
    realized: f64,
    /// Trailing stop armed by a mid-band touch.
    trailing_armed: bool,
    partial_taken: bool,
    best_excursion: f64,
    worst_excursion: f64,
}

/// Resolve one open trade bar by bar. Priority within a bar is fixed:
/// stop-loss, outer-band exit, partial take-profit, mid-band / trailing,
/// VWAP cross, take-profit, zombie killer; timeout if nothing fires by the
/// horizon.
fn resolve_trade(
    candles: &[Candle],
    cache: &IndicatorCache,
    config: &SimConfig,
    signal: &EntrySignal,
    entry_index: usize,
    stake: f64,
    end: usize,
) -> Trade {
    let dir = signal.direction;
    let sign = dir.sign();
    let entry_price = signal
        .price
        .filter(|p| *p > 0.0)
        .unwrap_or(candles[entry_index].close);

    let take_profit = signal
        .take_profit
        .unwrap_or(entry_price * (1.0 + sign * config.tp_pct / 100.0));
    let stop_loss = signal
        .stop_loss
        .unwrap_or(entry_price * (1.0 - sign * config.sl_pct / 100.0));

    let last = (entry_index + config.max_bars_in_trade).min(end);
    let mut state = OpenState {
        remaining: 1.0,
        realized: 0.0,
        trailing_armed: false,
        partial_taken: false,
        best_excursion: 0.0,
        worst_excursion: 0.0,
    };

    let close_at = |state: &OpenState, j: usize, price: f64, reason: ExitReason| -> Trade {
        let open_pnl =
            stake * state.remaining * config.multiplier * sign * (price - entry_price)
                / entry_price;
        Trade {
            entry_index,
            entry_price,
            entry_time: candles[entry_index].timestamp,
            direction: dir,
            stake,
            take_profit,
            stop_loss,
            exit_index: j,
            exit_price: price,
            exit_time: candles[j].timestamp,
            exit_reason: reason,
            pnl: state.realized + open_pnl,
            bars_held: j - entry_index,
            best_excursion: state.best_excursion,
            worst_excursion: state.worst_excursion,
        }
    };

    for j in (entry_index + 1)..=last {
        let bar = &candles[j];
        let snap = cache.snapshot(j);

        // Signed excursions as fractions of entry; favorable is positive.
        let (fav_extreme, adv_extreme) = match dir {
            Direction::Long => (bar.high, bar.low),
            Direction::Short => (bar.low, bar.high),
        };
        let fav = sign * (fav_extreme - entry_price) / entry_price;
        let adv = sign * (adv_extreme - entry_price) / entry_price;
        if fav > state.best_excursion {
            state.best_excursion = fav;
        }
        if adv < state.worst_excursion {
            state.worst_excursion = adv;
        }

        // 1. Stop-loss, worst-case intrabar ordering.
        let sl_hit = match dir {
            Direction::Long => bar.low <= stop_loss,
            Direction::Short => bar.high >= stop_loss,
        };
        if sl_hit {
            return close_at(&state, j, stop_loss, ExitReason::StopLoss);
        }

        // 2. Early exit at the opposing outer band, gated on minimum pnl.
        if config.exit_on_outer_band {
            if let (Some(upper), Some(lower)) = (snap.bb_upper, snap.bb_lower) {
                let band = match dir {
                    Direction::Long => upper,
                    Direction::Short => lower,
                };
                if touched(bar, dir, band) {
                    let pnl = state.realized
                        + stake * state.remaining * config.multiplier * sign
                            * (band - entry_price)
                            / entry_price;
                    if pnl >= config.min_pnl_for_outer_band_exit {
                        return close_at(&state, j, band, ExitReason::BandEarlyExit);
                    }
                }
            }
        }

        // 3. Partial take-profit on first touch of the chosen level.
        if config.partial_take_profit.enabled && !state.partial_taken {
            let level = if config.partial_take_profit.at_band_middle {
                snap.bb_middle
            } else if config.partial_take_profit.at_vwap {
                snap.vwap
            } else {
                None
            };
            if let Some(level) = level {
                if touched(bar, dir, level) {
                    let fraction = config.partial_take_profit.fraction;
                    state.realized += stake * fraction * config.multiplier * sign
                        * (level - entry_price)
                        / entry_price;
                    state.remaining -= fraction;
                    state.partial_taken = true;
                    if state.remaining <= f64::EPSILON {
                        state.remaining = 0.0;
                        let reason = if config.partial_take_profit.at_band_middle {
                            ExitReason::BandEarlyExit
                        } else {
                            ExitReason::VwapCross
                        };
                        return close_at(&state, j, level, reason);
                    }
                }
            }
        }

        // 4. Mid-band: either a plain full exit or the trailing state
        //    machine (config.validate rejects both at once).
        if let Some(middle) = snap.bb_middle {
            if config.exit_on_band_middle && touched(bar, dir, middle) {
                return close_at(&state, j, middle, ExitReason::BandEarlyExit);
            }
            if config.trailing_from_band_middle {
                let crossed_back = match dir {
                    Direction::Long => bar.close < middle,
                    Direction::Short => bar.close > middle,
                };
                if state.trailing_armed && crossed_back {
                    return close_at(&state, j, bar.close, ExitReason::TrailingBand);
                }
                if !state.trailing_armed && touched(bar, dir, middle) {
                    state.trailing_armed = true;
                }
            }
        }

        // 5. VWAP cross, symmetric to the band exit.
        if config.exit_on_vwap {
            if let Some(vwap) = snap.vwap {
                if touched(bar, dir, vwap) {
                    return close_at(&state, j, vwap, ExitReason::VwapCross);
                }
            }
        }

        // 6. Take-profit.
        let tp_hit = match dir {
            Direction::Long => bar.high >= take_profit,
            Direction::Short => bar.low <= take_profit,
        };
        if tp_hit {
            return close_at(&state, j, take_profit, ExitReason::TakeProfit);
        }

        // 7. Zombie killer: force out stagnant trades.
        let zk = &config.zombie_killer;
        if zk.enabled && j - entry_index >= zk.bars {
            let pnl_pct = sign * (bar.close - entry_price) / entry_price * 100.0;
            if pnl_pct < zk.min_pnl_pct {
                let reversing = sign * (bar.close - candles[j - 1].close) < 0.0;
                if !zk.only_if_reversing || reversing {
                    return close_at(&state, j, bar.close, ExitReason::TimeStop);
                }
            }
        }
    }

    // 8. Timeout at the horizon; win or loss falls out of the final close.
    close_at(&state, last, candles[last].close, ExitReason::Timeout)
}

/// Did the bar touch `level` on the favorable side for `dir`?
fn touched(bar: &Candle, dir: Direction, level: f64) -> bool {
    match dir {
        Direction::Long => bar.high >= level,
        Direction::Short => bar.low <= level,
    }
}

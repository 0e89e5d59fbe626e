//! INI file configuration adapter.
//!
//! Recognized layout:
//!
//! ```ini
//! [simulation]
//! tp_pct = 1.0
//! sl_pct = 0.5
//! cooldown_bars = 0
//! max_bars_in_trade = 60
//! initial_balance = 1000.0
//! stake_pct = 1.0
//! multiplier = 1.0
//! start_index = 0
//! end_index = 10000
//! exit_on_band_middle = false
//! exit_on_outer_band = false
//! min_pnl_for_outer_band_exit = 0.0
//! exit_on_vwap = false
//! trailing_from_band_middle = false
//!
//! [partial_take_profit]
//! enabled = false
//! at_band_middle = false
//! at_vwap = false
//! fraction = 0.5
//!
//! [zombie_killer]
//! enabled = false
//! bars = 30
//! min_pnl_pct = 0.1
//! only_if_reversing = false
//! ```
//!
//! Every key is optional; file values merge over the built-in defaults.

use std::path::Path;

use configparser::ini::Ini;

use crate::domain::config::{PartialTakeProfit, SimConfig, ZombieKiller};
use crate::domain::error::StratsimError;
use crate::ports::config_port::ConfigPort;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, StratsimError> {
        let mut config = Ini::new();
        config
            .load(path.as_ref())
            .map_err(|e| StratsimError::ConfigParse {
                file: path.as_ref().display().to_string(),
                reason: e,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, StratsimError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|e| StratsimError::ConfigParse {
                file: "<inline>".into(),
                reason: e,
            })?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }

    /// Merge file values over the defaults and validate the result.
    pub fn build_sim_config(&self) -> Result<SimConfig, StratsimError> {
        let defaults = SimConfig::default();
        let sim = "simulation";

        let end_index = self
            .config
            .getint(sim, "end_index")
            .ok()
            .flatten()
            .map(|v| v.max(0) as usize);

        let config = SimConfig {
            tp_pct: self.get_double(sim, "tp_pct", defaults.tp_pct),
            sl_pct: self.get_double(sim, "sl_pct", defaults.sl_pct),
            cooldown_bars: self.get_int(sim, "cooldown_bars", defaults.cooldown_bars as i64)
                .max(0) as usize,
            max_bars_in_trade: self
                .get_int(sim, "max_bars_in_trade", defaults.max_bars_in_trade as i64)
                .max(0) as usize,
            initial_balance: self.get_double(sim, "initial_balance", defaults.initial_balance),
            stake_pct: self.get_double(sim, "stake_pct", defaults.stake_pct),
            multiplier: self.get_double(sim, "multiplier", defaults.multiplier),
            start_index: self.get_int(sim, "start_index", defaults.start_index as i64).max(0)
                as usize,
            end_index,
            exit_on_band_middle: self.get_bool(
                sim,
                "exit_on_band_middle",
                defaults.exit_on_band_middle,
            ),
            exit_on_outer_band: self.get_bool(
                sim,
                "exit_on_outer_band",
                defaults.exit_on_outer_band,
            ),
            min_pnl_for_outer_band_exit: self.get_double(
                sim,
                "min_pnl_for_outer_band_exit",
                defaults.min_pnl_for_outer_band_exit,
            ),
            exit_on_vwap: self.get_bool(sim, "exit_on_vwap", defaults.exit_on_vwap),
            trailing_from_band_middle: self.get_bool(
                sim,
                "trailing_from_band_middle",
                defaults.trailing_from_band_middle,
            ),
            partial_take_profit: PartialTakeProfit {
                enabled: self.get_bool("partial_take_profit", "enabled", false),
                at_band_middle: self.get_bool("partial_take_profit", "at_band_middle", false),
                at_vwap: self.get_bool("partial_take_profit", "at_vwap", false),
                fraction: self.get_double(
                    "partial_take_profit",
                    "fraction",
                    defaults.partial_take_profit.fraction,
                ),
            },
            zombie_killer: ZombieKiller {
                enabled: self.get_bool("zombie_killer", "enabled", false),
                bars: self
                    .get_int("zombie_killer", "bars", defaults.zombie_killer.bars as i64)
                    .max(0) as usize,
                min_pnl_pct: self.get_double(
                    "zombie_killer",
                    "min_pnl_pct",
                    defaults.zombie_killer.min_pnl_pct,
                ),
                only_if_reversing: self.get_bool("zombie_killer", "only_if_reversing", false),
            },
        };

        config.validate()?;
        Ok(config)
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_ref()
            .and_then(|v| Self::parse_bool(v))
            .unwrap_or(default)
    }
}

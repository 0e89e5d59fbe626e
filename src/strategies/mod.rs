//! Built-in signal sources.

pub mod rsi_reversion;

pub use rsi_reversion::RsiReversion;

//! Core engine types and logic.

pub mod candle;
pub mod error;
pub mod indicator;
pub mod cache;
pub mod signal;
pub mod config;
pub mod trade;
pub mod simulator;
pub mod metrics;
pub mod result;
pub mod validate;
pub mod sweep;

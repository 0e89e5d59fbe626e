//! stratsim — strategy-evaluation engine for quantitative trading research.
//!
//! Hexagonal architecture: engine logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`], reference signal sources in
//! [`strategies`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod strategies;
pub mod cli;

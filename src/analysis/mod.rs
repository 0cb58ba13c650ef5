//! Payoff analysis
//!
//! Numerical side of P&L charting: price grids and per-leg breakdowns.

pub mod payoff;

pub use payoff::*;

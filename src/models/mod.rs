//! Pricing Models
//!
//! Implements:
//! - Generalized Black-Scholes with cost of carry, and its specializations
//! - Implied volatility by bisection

pub mod black_scholes;
pub mod implied_vol;

pub use black_scholes::*;
pub use implied_vol::*;

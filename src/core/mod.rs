//! Core data types
//!
//! Defines the instrument algebra and shared result types:
//! - VanillaOption: type, strike, exercise style, optional expiry
//! - OptionPortfolio: signed-quantity combination of options
//! - Valuation: present value plus Greeks
//! - PricingError: error taxonomy for the crate

pub mod option;
pub mod portfolio;
pub mod greeks;
pub mod error;

pub use option::*;
pub use portfolio::*;
pub use greeks::*;
pub use error::*;

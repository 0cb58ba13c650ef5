//! # GBS Options - Generalized Black-Scholes pricing and option algebra
//!
//! Prices European options in closed form, computes their Greeks, backs out
//! implied volatility, and combines single options into multi-leg portfolios
//! whose payoff at expiry can be evaluated and swept over a price range.
//!
//! ## Key Components
//!
//! - **Instrument algebra**: `VanillaOption` and `OptionPortfolio` with
//!   `+`, `-`, `*` and unary `-`
//! - **Generalized Black-Scholes**: a single formula parameterized by the cost
//!   of carry `b`, specialized for stocks, dividend-paying stocks, commodities
//!   and FX
//! - **Implied volatility**: bracketed bisection on the pricing error
//! - **Payoff analysis**: P&L profiles over a price grid, with per-leg detail
//!
//! ## Usage
//!
//! ```rust
//! use gbs_options::prelude::*;
//!
//! // Payoff algebra
//! let spread = VanillaOption::call(100.0) - VanillaOption::call(110.0);
//! assert_eq!(spread.value(125.0), 10.0);
//!
//! // Pricing and Greeks
//! let call = black_scholes(OptionType::Call, 100.0, 100.0, 1.0, 0.05, 0.2).unwrap();
//! assert!((call.value - 10.45).abs() < 0.01);
//!
//! // Implied volatility
//! let iv = implied_volatility_black_scholes(OptionType::Call, call.value, 100.0, 100.0, 1.0, 0.05)
//!     .unwrap();
//! assert!((iv - 0.2).abs() < 0.001);
//! ```
//!
//! ## What This Crate Does NOT Do
//!
//! - Price early exercise (American style is recorded, never used)
//! - Model term structures or calibrate beyond a single implied volatility
//! - Draw charts (profiles are exported as data)

pub mod analysis;
pub mod core;
pub mod models;

/// Prelude with commonly used types
pub mod prelude {
    // Core types
    pub use crate::core::{
        ExerciseStyle, OptionPortfolio, OptionType, PricingError, PricingResult, Valuation,
        VanillaOption,
    };

    // Models
    pub use crate::models::{
        black_scholes,
        black_scholes_commodity,
        black_scholes_merton,
        garman_kohlhagen,
        generalized_black_scholes,
        implied_volatility,
        implied_volatility_black_scholes,
        implied_volatility_commodity,
        implied_volatility_fx,
        implied_volatility_generalized,
        implied_volatility_stock,
        norm_cdf,
        norm_pdf,
        price,
        PricingModel,
        SolverConfig,
    };

    // Payoff analysis
    pub use crate::analysis::{calculate_profit_loss, Payoff, PayoffConfig, ProfitLossProfile};
}

// Re-export main types at crate root
pub use crate::core::{OptionPortfolio, PricingError, PricingResult, VanillaOption};
pub use crate::models::PricingModel;

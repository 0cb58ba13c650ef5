//! Generalized Black-Scholes Model
//!
//! Provides:
//! - European option pricing with a cost-of-carry parameter `b`
//! - Closed-form Greeks
//! - Named specializations that fix `b`
//!
//! | Model                 | b        |
//! |-----------------------|----------|
//! | Black-Scholes         | r        |
//! | Black-Scholes-Merton  | r - q    |
//! | Black-76 (commodity)  | 0        |
//! | Garman-Kohlhagen (FX) | r - rf   |
//!
//! All rates, yields and volatilities are per-unit fractions (0.05 = 5%).
//! `theta` is per year; `vega` and `rho` are per one percentage point.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use statrs::function::erf::erfc;

use crate::core::error::{ensure_finite, ensure_positive};
use crate::core::{OptionType, PricingError, PricingResult, Valuation};

/// Standard normal CDF
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / std::f64::consts::SQRT_2)
}

/// Standard normal PDF
pub fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

/// Generalized Black-Scholes d1 parameter
pub fn d1(fs: f64, x: f64, t: f64, b: f64, v: f64) -> f64 {
    ((fs / x).ln() + (b + 0.5 * v * v) * t) / (v * t.sqrt())
}

/// Generalized Black-Scholes d2 parameter
pub fn d2(fs: f64, x: f64, t: f64, b: f64, v: f64) -> f64 {
    d1(fs, x, t, b, v) - v * t.sqrt()
}

/// Model specialization, carrying whatever extra rate it needs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PricingModel {
    /// Stock without dividends
    BlackScholes,
    /// Stock with continuous dividend yield
    Merton { dividend_yield: f64 },
    /// Futures and commodity options
    Commodity,
    /// FX options with a foreign risk-free rate
    GarmanKohlhagen { foreign_rate: f64 },
}

impl PricingModel {
    /// Cost of carry implied by this model for risk-free rate `r`
    pub fn cost_of_carry(&self, r: f64) -> f64 {
        match self {
            PricingModel::BlackScholes => r,
            PricingModel::Merton { dividend_yield } => r - dividend_yield,
            PricingModel::Commodity => 0.0,
            PricingModel::GarmanKohlhagen { foreign_rate } => r - foreign_rate,
        }
    }
}

pub(crate) fn validate_inputs(fs: f64, x: f64, t: f64, r: f64, b: f64) -> PricingResult<()> {
    ensure_positive("spot", fs)?;
    ensure_positive("strike", x)?;
    ensure_positive("time to expiration", t)?;
    ensure_finite("risk-free rate", r)?;
    ensure_finite("cost of carry", b)
}

/// Price and Greeks under the generalized Black-Scholes formula.
///
/// Fails with a domain error unless `fs`, `x`, `t` and `v` are positive and
/// every input is finite. Inputs whose discount or carry factors overflow
/// (e.g. `r = -800`) are rejected too, so no NaN or infinite value or Greek is
/// ever returned.
pub fn generalized_black_scholes(
    option_type: OptionType,
    fs: f64,
    x: f64,
    t: f64,
    r: f64,
    b: f64,
    v: f64,
) -> PricingResult<Valuation> {
    validate_inputs(fs, x, t, r, b)?;
    ensure_positive("volatility", v)?;

    let sqrt_t = t.sqrt();
    let d1 = d1(fs, x, t, b, v);
    let d2 = d1 - v * sqrt_t;
    let pdf_d1 = norm_pdf(d1);
    let carry = ((b - r) * t).exp();
    let df = (-r * t).exp();
    if !(carry.is_finite() && df.is_finite()) {
        return Err(PricingError::domain(format!(
            "discount factors overflow for r={}, b={}, t={}",
            r, b, t
        )));
    }

    // Gamma and vega do not depend on the option type
    let gamma = carry * pdf_d1 / (fs * v * sqrt_t);
    let vega = carry * fs * sqrt_t * pdf_d1;
    let decay = -(fs * v * carry * pdf_d1) / (2.0 * sqrt_t);

    let valuation = match option_type {
        OptionType::Call => {
            let cdf_d1 = norm_cdf(d1);
            let cdf_d2 = norm_cdf(d2);
            Valuation {
                value: fs * carry * cdf_d1 - x * df * cdf_d2,
                delta: carry * cdf_d1,
                gamma,
                theta: decay - (b - r) * fs * carry * cdf_d1 - r * x * df * cdf_d2,
                vega: vega / 100.0,
                rho: x * t * df * cdf_d2 / 100.0,
            }
        }
        OptionType::Put => {
            let cdf_d1 = norm_cdf(-d1);
            let cdf_d2 = norm_cdf(-d2);
            Valuation {
                value: x * df * cdf_d2 - fs * carry * cdf_d1,
                delta: -carry * cdf_d1,
                gamma,
                theta: decay + (b - r) * fs * carry * cdf_d1 + r * x * df * cdf_d2,
                vega: vega / 100.0,
                rho: -x * t * df * cdf_d2 / 100.0,
            }
        }
    };

    if !valuation.is_finite() {
        return Err(PricingError::domain(format!(
            "non-finite valuation for fs={}, x={}, t={}, r={}, b={}, v={}",
            fs, x, t, r, b, v
        )));
    }

    Ok(valuation)
}

/// Stock option without dividends (b = r)
pub fn black_scholes(
    option_type: OptionType,
    fs: f64,
    x: f64,
    t: f64,
    r: f64,
    v: f64,
) -> PricingResult<Valuation> {
    generalized_black_scholes(option_type, fs, x, t, r, r, v)
}

/// Stock option with continuous dividend yield `q` (b = r - q)
pub fn black_scholes_merton(
    option_type: OptionType,
    fs: f64,
    x: f64,
    t: f64,
    r: f64,
    q: f64,
    v: f64,
) -> PricingResult<Valuation> {
    generalized_black_scholes(option_type, fs, x, t, r, r - q, v)
}

/// Commodity / futures option (b = 0)
pub fn black_scholes_commodity(
    option_type: OptionType,
    fs: f64,
    x: f64,
    t: f64,
    r: f64,
    v: f64,
) -> PricingResult<Valuation> {
    generalized_black_scholes(option_type, fs, x, t, r, 0.0, v)
}

/// FX option with foreign rate `rf` (b = r - rf)
pub fn garman_kohlhagen(
    option_type: OptionType,
    fs: f64,
    x: f64,
    t: f64,
    r: f64,
    rf: f64,
    v: f64,
) -> PricingResult<Valuation> {
    generalized_black_scholes(option_type, fs, x, t, r, r - rf, v)
}

/// Price under any specialization
pub fn price(
    model: PricingModel,
    option_type: OptionType,
    fs: f64,
    x: f64,
    t: f64,
    r: f64,
    v: f64,
) -> PricingResult<Valuation> {
    generalized_black_scholes(option_type, fs, x, t, r, model.cost_of_carry(r), v)
}

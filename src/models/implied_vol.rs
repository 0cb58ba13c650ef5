//! Implied volatility solver
//!
//! Inverts the generalized Black-Scholes formula by bisection on the signed
//! pricing error `value(v) - p` over a volatility bracket.
//!
//! The method assumes the option value is monotonically increasing in
//! volatility across the bracket, which holds for European options under this
//! model. A target price that is not bracketed by the model prices at
//! `min_volatility` and `max_volatility` is rejected as non-convergent rather
//! than searched for outside the bracket.

use serde::{Deserialize, Serialize};

use super::black_scholes::{generalized_black_scholes, validate_inputs, PricingModel};
use crate::core::error::ensure_positive;
use crate::core::{OptionType, PricingError, PricingResult};

/// Bisection solver settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Lower end of the volatility bracket
    /// Default: 0.01
    pub min_volatility: f64,

    /// Upper end of the volatility bracket
    /// Default: 1.0
    pub max_volatility: f64,

    /// Absolute tolerance on the returned volatility
    /// Default: 0.001
    pub xtol: f64,

    /// Maximum bisection steps
    /// Default: 500
    pub max_iter: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            min_volatility: 0.01,
            max_volatility: 1.0,
            xtol: 0.001,
            max_iter: 500,
        }
    }
}

impl SolverConfig {
    /// Tight tolerance for calibration-grade work
    pub fn precise() -> Self {
        Self {
            xtol: 1e-8,
            ..Default::default()
        }
    }

    /// Wide bracket for stressed or short-dated markets
    pub fn wide() -> Self {
        Self {
            min_volatility: 0.001,
            max_volatility: 5.0,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> PricingResult<()> {
        ensure_positive("min_volatility", self.min_volatility)?;
        ensure_positive("max_volatility", self.max_volatility)?;
        ensure_positive("xtol", self.xtol)?;
        if self.min_volatility >= self.max_volatility {
            return Err(PricingError::domain(format!(
                "empty volatility bracket [{}, {}]",
                self.min_volatility, self.max_volatility
            )));
        }
        if self.max_iter == 0 {
            return Err(PricingError::domain("max_iter must be at least 1"));
        }
        Ok(())
    }
}

/// Implied volatility for an explicit cost of carry `b`
pub fn implied_volatility_generalized(
    option_type: OptionType,
    p: f64,
    fs: f64,
    x: f64,
    t: f64,
    r: f64,
    b: f64,
    config: &SolverConfig,
) -> PricingResult<f64> {
    config.validate()?;
    ensure_positive("option price", p)?;
    validate_inputs(fs, x, t, r, b)?;

    let error_at = |v: f64| -> PricingResult<f64> {
        Ok(generalized_black_scholes(option_type, fs, x, t, r, b, v)?.value - p)
    };

    let mut lower = config.min_volatility;
    let mut upper = config.max_volatility;
    let mut err_lower = error_at(lower)?;
    let err_upper = error_at(upper)?;

    if err_lower == 0.0 {
        return Ok(lower);
    }
    if err_upper == 0.0 {
        return Ok(upper);
    }
    if err_lower.signum() == err_upper.signum() {
        tracing::warn!(
            "Price {} not attainable for vol in [{}, {}] (model range {:.6}..{:.6})",
            p,
            lower,
            upper,
            err_lower + p,
            err_upper + p
        );
        return Err(PricingError::non_convergence(0, lower, upper));
    }

    for iteration in 1..=config.max_iter {
        let mid = 0.5 * (lower + upper);
        let half_width = 0.5 * (upper - lower);
        let err_mid = error_at(mid)?;

        if err_mid == 0.0 || half_width < config.xtol {
            tracing::debug!("Implied vol {:.6} found after {} iterations", mid, iteration);
            return Ok(mid);
        }

        if err_mid.signum() == err_lower.signum() {
            lower = mid;
            err_lower = err_mid;
        } else {
            upper = mid;
        }
    }

    tracing::warn!(
        "Implied vol solver stopped after {} iterations in [{}, {}]",
        config.max_iter,
        lower,
        upper
    );
    Err(PricingError::non_convergence(config.max_iter, lower, upper))
}

/// Implied volatility under any pricing specialization
pub fn implied_volatility(
    model: PricingModel,
    option_type: OptionType,
    p: f64,
    fs: f64,
    x: f64,
    t: f64,
    r: f64,
    config: &SolverConfig,
) -> PricingResult<f64> {
    implied_volatility_generalized(option_type, p, fs, x, t, r, model.cost_of_carry(r), config)
}

/// Stock without dividends (b = r), default solver settings
pub fn implied_volatility_black_scholes(
    option_type: OptionType,
    p: f64,
    fs: f64,
    x: f64,
    t: f64,
    r: f64,
) -> PricingResult<f64> {
    implied_volatility(
        PricingModel::BlackScholes,
        option_type,
        p,
        fs,
        x,
        t,
        r,
        &SolverConfig::default(),
    )
}

/// Stock with dividend yield `q` (b = r - q), default solver settings
pub fn implied_volatility_stock(
    option_type: OptionType,
    p: f64,
    fs: f64,
    x: f64,
    t: f64,
    r: f64,
    q: f64,
) -> PricingResult<f64> {
    implied_volatility(
        PricingModel::Merton { dividend_yield: q },
        option_type,
        p,
        fs,
        x,
        t,
        r,
        &SolverConfig::default(),
    )
}

/// Commodity / futures (b = 0), default solver settings
pub fn implied_volatility_commodity(
    option_type: OptionType,
    p: f64,
    fs: f64,
    x: f64,
    t: f64,
    r: f64,
) -> PricingResult<f64> {
    implied_volatility(
        PricingModel::Commodity,
        option_type,
        p,
        fs,
        x,
        t,
        r,
        &SolverConfig::default(),
    )
}

/// FX with foreign rate `rf` (b = r - rf), default solver settings
pub fn implied_volatility_fx(
    option_type: OptionType,
    p: f64,
    fs: f64,
    x: f64,
    t: f64,
    r: f64,
    rf: f64,
) -> PricingResult<f64> {
    implied_volatility(
        PricingModel::GarmanKohlhagen { foreign_rate: rf },
        option_type,
        p,
        fs,
        x,
        t,
        r,
        &SolverConfig::default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::black_scholes::{black_scholes, price};

    #[test]
    fn test_implied_vol() {
        let (spot, strike, rate, vol, time) = (100.0, 100.0, 0.05, 0.25, 0.5);

        let market_price = black_scholes(OptionType::Call, spot, strike, time, rate, vol)
            .unwrap()
            .value;
        let iv = implied_volatility_black_scholes(OptionType::Call, market_price, spot, strike, time, rate)
            .unwrap();

        assert!((iv - vol).abs() < 0.001);
    }

    #[test]
    fn test_iv_otm_put_with_dividend() {
        let (spot, strike, rate, div, vol, time) = (100.0, 90.0, 0.05, 0.01, 0.30, 0.25);
        let model = PricingModel::Merton { dividend_yield: div };

        let market_price = price(model, OptionType::Put, spot, strike, time, rate, vol)
            .unwrap()
            .value;
        let iv = implied_volatility_stock(OptionType::Put, market_price, spot, strike, time, rate, div)
            .unwrap();

        assert!((iv - vol).abs() < 0.001);
    }

    #[test]
    fn test_iv_commodity_and_fx() {
        let model = PricingModel::Commodity;
        let p = price(model, OptionType::Call, 75.0, 80.0, 0.5, 0.03, 0.42).unwrap().value;
        let iv = implied_volatility_commodity(OptionType::Call, p, 75.0, 80.0, 0.5, 0.03).unwrap();
        assert!((iv - 0.42).abs() < 0.001);

        let model = PricingModel::GarmanKohlhagen { foreign_rate: 0.04 };
        let p = price(model, OptionType::Put, 1.10, 1.12, 0.25, 0.05, 0.09).unwrap().value;
        let iv = implied_volatility_fx(OptionType::Put, p, 1.10, 1.12, 0.25, 0.05, 0.04).unwrap();
        assert!((iv - 0.09).abs() < 0.001);
    }

    #[test]
    fn test_precise_config() {
        let p = black_scholes(OptionType::Call, 100.0, 110.0, 1.0, 0.02, 0.3337).unwrap().value;
        let iv = implied_volatility(
            PricingModel::BlackScholes,
            OptionType::Call,
            p,
            100.0,
            110.0,
            1.0,
            0.02,
            &SolverConfig::precise(),
        )
        .unwrap();
        assert!((iv - 0.3337).abs() < 1e-7);
    }

    #[test]
    fn test_vol_outside_bracket() {
        let p = black_scholes(OptionType::Call, 100.0, 100.0, 1.0, 0.05, 1.5).unwrap().value;
        let result = implied_volatility_black_scholes(OptionType::Call, p, 100.0, 100.0, 1.0, 0.05);
        assert!(matches!(result, Err(PricingError::NonConvergence { .. })));

        let iv = implied_volatility(
            PricingModel::BlackScholes,
            OptionType::Call,
            p,
            100.0,
            100.0,
            1.0,
            0.05,
            &SolverConfig::wide(),
        )
        .unwrap();
        assert!((iv - 1.5).abs() < 0.001);
    }

    #[test]
    fn test_unattainable_price() {
        // A call can never be worth more than the spot
        let result = implied_volatility_black_scholes(OptionType::Call, 150.0, 100.0, 100.0, 1.0, 0.05);
        assert!(matches!(result, Err(PricingError::NonConvergence { .. })));
    }

    #[test]
    fn test_price_below_bracket() {
        // Deep ITM call quoted under its discounted intrinsic (~54.88)
        let floor = black_scholes(OptionType::Call, 150.0, 100.0, 1.0, 0.05, 0.01).unwrap().value;
        assert!(floor > 50.0);

        let result = implied_volatility_black_scholes(OptionType::Call, 50.0, 150.0, 100.0, 1.0, 0.05);
        assert!(matches!(
            result,
            Err(PricingError::NonConvergence { iterations: 0, .. })
        ));
    }

    #[test]
    fn test_iteration_cap() {
        let p = black_scholes(OptionType::Call, 100.0, 100.0, 1.0, 0.05, 0.2).unwrap().value;
        let config = SolverConfig {
            max_iter: 2,
            ..Default::default()
        };
        let result = implied_volatility(
            PricingModel::BlackScholes,
            OptionType::Call,
            p,
            100.0,
            100.0,
            1.0,
            0.05,
            &config,
        );
        assert!(matches!(
            result,
            Err(PricingError::NonConvergence { iterations: 2, .. })
        ));
    }

    #[test]
    fn test_round_trip_random_markets() {
        use rand::{Rng, SeedableRng};
        use rand_chacha::ChaCha8Rng;
        use rand_distr::{Distribution, StandardNormal};

        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..200 {
            let z: f64 = StandardNormal.sample(&mut rng);
            let fs = 100.0 * (0.1 * z).exp();
            let x = fs * rng.gen_range(0.85..1.15);
            let t = rng.gen_range(0.25..2.0);
            let r = rng.gen_range(0.0..0.08);
            let q = rng.gen_range(0.0..0.04);
            let v0 = rng.gen_range(0.1..0.9);
            let option_type = if rng.gen_bool(0.5) { OptionType::Call } else { OptionType::Put };

            let model = PricingModel::Merton { dividend_yield: q };
            let p = price(model, option_type, fs, x, t, r, v0).unwrap().value;
            let iv = implied_volatility_stock(option_type, p, fs, x, t, r, q).unwrap();
            assert!((iv - v0).abs() < 0.001, "v0={} iv={}", v0, iv);
        }
    }

    #[test]
    fn test_invalid_inputs() {
        let result = implied_volatility_black_scholes(OptionType::Call, 0.0, 100.0, 100.0, 1.0, 0.05);
        assert!(matches!(result, Err(PricingError::Domain(_))));

        let result = implied_volatility_black_scholes(OptionType::Call, 10.0, 100.0, 100.0, 0.0, 0.05);
        assert!(matches!(result, Err(PricingError::Domain(_))));

        let inverted = SolverConfig {
            min_volatility: 1.0,
            max_volatility: 0.5,
            ..Default::default()
        };
        assert!(inverted.validate().is_err());
        assert!(SolverConfig::default().validate().is_ok());
    }
}

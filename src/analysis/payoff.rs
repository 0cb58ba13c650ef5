//! Profit and loss profiles at expiry
//!
//! Sweeps a payoff over a grid of spot prices so that charting tools can draw
//! it. When no price range is given, the grid spans the strikes padded on both
//! sides.

use std::fs;
use std::path::Path;

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::core::{OptionPortfolio, PricingError, PricingResult, VanillaOption};

/// Anything with a payoff at expiry
pub trait Payoff {
    /// Payoff for a given spot price
    fn value(&self, spot: f64) -> f64;

    /// Strikes used to pick a default price range
    fn exercise_prices(&self) -> Vec<f64>;

    /// Individual legs with quantities, if this payoff has more than one part
    fn leg_breakdown(&self) -> Option<Vec<(VanillaOption, i64)>>;
}

impl Payoff for VanillaOption {
    fn value(&self, spot: f64) -> f64 {
        VanillaOption::value(self, spot)
    }

    fn exercise_prices(&self) -> Vec<f64> {
        vec![self.strike]
    }

    fn leg_breakdown(&self) -> Option<Vec<(VanillaOption, i64)>> {
        None
    }
}

impl Payoff for OptionPortfolio {
    fn value(&self, spot: f64) -> f64 {
        OptionPortfolio::value(self, spot)
    }

    fn exercise_prices(&self) -> Vec<f64> {
        OptionPortfolio::exercise_prices(self)
    }

    fn leg_breakdown(&self) -> Option<Vec<(VanillaOption, i64)>> {
        Some(self.legs().map(|(opt, qty)| (*opt, qty)).collect())
    }
}

/// Price grid settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoffConfig {
    /// Explicit `[lower, upper)` range; derived from strikes when `None`
    pub price_range: Option<(f64, f64)>,

    /// Grid spacing
    /// Default: 0.1
    pub interval: f64,

    /// Distance below the lowest and above the highest strike
    /// Default: 20.0
    pub padding: f64,
}

impl Default for PayoffConfig {
    fn default() -> Self {
        Self {
            price_range: None,
            interval: 0.1,
            padding: 20.0,
        }
    }
}

impl PayoffConfig {
    pub fn with_range(lower: f64, upper: f64) -> Self {
        Self {
            price_range: Some((lower, upper)),
            ..Default::default()
        }
    }

    /// Resolve the `[lower, upper)` range for a payoff
    pub fn range_for(&self, payoff: &impl Payoff) -> PricingResult<(f64, f64)> {
        let (lower, upper) = match self.price_range {
            Some(range) => range,
            None => {
                let strikes = payoff.exercise_prices();
                if strikes.is_empty() {
                    return Err(PricingError::invalid_input(
                        "cannot derive a price range from a payoff without strikes",
                    ));
                }
                let min = strikes.iter().copied().fold(f64::INFINITY, f64::min);
                let max = strikes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                (min - self.padding, max + self.padding)
            }
        };

        if !(lower.is_finite() && upper.is_finite()) || lower >= upper {
            return Err(PricingError::invalid_input(format!(
                "invalid price range [{}, {})",
                lower, upper
            )));
        }
        Ok((lower, upper))
    }
}

/// P&L of one leg across the grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegProfile {
    pub label: String,
    pub quantity: i64,
    pub pnl: Vec<f64>,
}

/// Payoff sampled over a price grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfitLossProfile {
    pub prices: Vec<f64>,
    pub pnl: Vec<f64>,
    /// Per-leg series, present only for portfolios when requested
    pub detail: Option<Vec<LegProfile>>,
}

impl ProfitLossProfile {
    pub fn to_json(&self) -> PricingResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| PricingError::Serialization(e.to_string()))
    }

    /// Write the profile as JSON for an external plotting tool
    pub fn save_json(&self, path: impl AsRef<Path>) -> PricingResult<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)?;

        tracing::info!("Saved P&L profile ({} points) to {:?}", self.prices.len(), path);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

/// Sample a payoff over the configured grid.
///
/// With `return_detail`, portfolios also report each leg's quantity-weighted
/// payoff; single options never carry detail.
pub fn calculate_profit_loss(
    payoff: &impl Payoff,
    config: &PayoffConfig,
    return_detail: bool,
) -> PricingResult<ProfitLossProfile> {
    if !(config.interval.is_finite() && config.interval > 0.0) {
        return Err(PricingError::invalid_input(format!(
            "interval must be positive, got {}",
            config.interval
        )));
    }

    let (lower, upper) = config.range_for(payoff)?;
    let grid = Array1::range(lower, upper, config.interval);
    tracing::debug!("P&L grid [{}, {}) with {} points", lower, upper, grid.len());

    let pnl = grid.mapv(|spot| payoff.value(spot));

    let detail = if return_detail {
        payoff.leg_breakdown().map(|legs| {
            legs.into_iter()
                .map(|(opt, qty)| LegProfile {
                    label: opt.to_string(),
                    quantity: qty,
                    pnl: grid.iter().map(|&spot| opt.value(spot) * qty as f64).collect(),
                })
                .collect()
        })
    } else {
        None
    };

    Ok(ProfitLossProfile {
        prices: grid.to_vec(),
        pnl: pnl.to_vec(),
        detail,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_range_from_strikes() {
        let spread = VanillaOption::call(110.0) - VanillaOption::call(100.0);
        let (lower, upper) = PayoffConfig::default().range_for(&spread).unwrap();
        assert_eq!(lower, 80.0);
        assert_eq!(upper, 130.0);

        let (lower, upper) = PayoffConfig::default()
            .range_for(&VanillaOption::put(50.0))
            .unwrap();
        assert_eq!((lower, upper), (30.0, 70.0));
    }

    #[test]
    fn test_single_option_profile() {
        let call = VanillaOption::call(100.0);
        let config = PayoffConfig {
            interval: 1.0,
            ..Default::default()
        };
        let profile = calculate_profit_loss(&call, &config, true).unwrap();

        // Half-open grid: 80, 81, ..., 119
        assert_eq!(profile.len(), 40);
        assert_eq!(profile.prices[0], 80.0);
        assert_eq!(*profile.prices.last().unwrap(), 119.0);
        assert!(profile.detail.is_none());
        for (spot, pnl) in profile.prices.iter().zip(&profile.pnl) {
            assert_eq!(*pnl, (spot - 100.0).max(0.0));
        }
    }

    #[test]
    fn test_portfolio_detail_sums_to_total() {
        let butterfly =
            VanillaOption::call(90.0) - VanillaOption::call(100.0) * 2 + VanillaOption::call(110.0);
        let profile =
            calculate_profit_loss(&butterfly, &PayoffConfig::with_range(80.0, 120.0), true).unwrap();

        let detail = profile.detail.as_ref().unwrap();
        assert_eq!(detail.len(), 3);
        assert!(detail.iter().any(|leg| leg.quantity == -2 && leg.label.contains("100")));

        for i in 0..profile.len() {
            let sum: f64 = detail.iter().map(|leg| leg.pnl[i]).sum();
            assert!((sum - profile.pnl[i]).abs() < 1e-9);
            assert!(profile.pnl[i] >= -1e-9);
        }

        let without = calculate_profit_loss(&butterfly, &PayoffConfig::default(), false).unwrap();
        assert!(without.detail.is_none());
    }

    #[test]
    fn test_invalid_config() {
        let call = VanillaOption::call(100.0);
        let bad_interval = PayoffConfig {
            interval: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            calculate_profit_loss(&call, &bad_interval, false),
            Err(PricingError::InvalidInput(_))
        ));

        let inverted = PayoffConfig::with_range(120.0, 80.0);
        assert!(calculate_profit_loss(&call, &inverted, false).is_err());

        let empty = OptionPortfolio::new();
        assert!(calculate_profit_loss(&empty, &PayoffConfig::default(), false).is_err());
    }

    #[test]
    fn test_save_json() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("straddle.json");

        let straddle = VanillaOption::call(100.0) + VanillaOption::put(100.0);
        let profile =
            calculate_profit_loss(&straddle, &PayoffConfig::with_range(90.0, 110.0), true).unwrap();
        profile.save_json(&path).unwrap();

        let json = std::fs::read_to_string(&path).unwrap();
        let loaded: ProfitLossProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.len(), profile.len());
        assert_eq!(loaded.detail.unwrap()[0].label, "CallOption(exercise_price=100, exercise_type=EUROPEAN)");
    }
}

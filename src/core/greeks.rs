//! Option value and Greeks
//!
//! Unit conventions follow the pricing engine: `theta` is per year, `vega` and
//! `rho` are per one percentage point move in volatility and rate.

use std::iter::Sum;
use std::ops::Add;

use serde::{Deserialize, Serialize};

/// Present value with first and second order sensitivities
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Valuation {
    /// Present value
    pub value: f64,
    /// Delta: dV/dS
    pub delta: f64,
    /// Gamma: d²V/dS²
    pub gamma: f64,
    /// Theta: dV/dt per year
    pub theta: f64,
    /// Vega: dV/dσ per 1% vol move
    pub vega: f64,
    /// Rho: dV/dr per 1% rate move
    pub rho: f64,
}

impl Valuation {
    /// Scale every field by a factor (e.g., for a position quantity)
    pub fn scale(&self, factor: f64) -> Self {
        Self {
            value: self.value * factor,
            delta: self.delta * factor,
            gamma: self.gamma * factor,
            theta: self.theta * factor,
            vega: self.vega * factor,
            rho: self.rho * factor,
        }
    }

    /// True when the value and every Greek are finite
    pub fn is_finite(&self) -> bool {
        [self.value, self.delta, self.gamma, self.theta, self.vega, self.rho]
            .iter()
            .all(|x| x.is_finite())
    }

    /// Theta per calendar day
    pub fn theta_per_day(&self) -> f64 {
        self.theta / 365.0
    }
}

impl Add for Valuation {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            value: self.value + other.value,
            delta: self.delta + other.delta,
            gamma: self.gamma + other.gamma,
            theta: self.theta + other.theta,
            vega: self.vega + other.vega,
            rho: self.rho + other.rho,
        }
    }
}

impl Sum for Valuation {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Valuation {
        Valuation {
            value: 10.0,
            delta: 0.6,
            gamma: 0.02,
            theta: -6.0,
            vega: 0.4,
            rho: 0.5,
        }
    }

    #[test]
    fn test_scale_short_position() {
        let v = sample().scale(-2.0);
        assert_eq!(v.value, -20.0);
        assert_eq!(v.delta, -1.2);
        assert_eq!(v.theta, 12.0);
    }

    #[test]
    fn test_sum() {
        let total: Valuation = vec![sample(), sample().scale(-1.0), sample()].into_iter().sum();
        assert!((total.value - 10.0).abs() < 1e-12);
        assert!((total.gamma - 0.02).abs() < 1e-12);
        assert!((total.theta_per_day() - (-6.0 / 365.0)).abs() < 1e-12);
    }

    #[test]
    fn test_is_finite() {
        assert!(sample().is_finite());
        let mut v = sample();
        v.gamma = f64::NAN;
        assert!(!v.is_finite());
        v.gamma = 0.02;
        v.value = f64::INFINITY;
        assert!(!v.is_finite());
    }
}

//! Multi-leg option portfolios
//!
//! An `OptionPortfolio` maps each distinct `VanillaOption` to a signed
//! quantity (negative for short legs). Legs iterate in the order they first
//! entered the portfolio. Legs whose quantity nets to zero are kept.
//!
//! The arithmetic operators have value semantics: `a + b` builds a new
//! portfolio and leaves borrowed operands untouched. Use `+=`, `-=` and `*=`
//! to update a portfolio in place. Quantity arithmetic saturates at the `i64`
//! bounds; `checked_scale` reports overflow instead.
//!
//! ```
//! use gbs_options::prelude::*;
//!
//! let long_call = VanillaOption::call(100.0);
//! let short_call = VanillaOption::call(110.0);
//! let bull_spread = long_call - short_call;
//!
//! assert_eq!(bull_spread.value(120.0), 10.0);
//! assert_eq!(bull_spread.value(90.0), 0.0);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use super::error::{PricingError, PricingResult};
use super::greeks::Valuation;
use super::option::VanillaOption;
use crate::models::{price, PricingModel};

/// A combination of option legs with signed quantities
#[derive(Debug, Clone, Default)]
pub struct OptionPortfolio {
    legs: Vec<(VanillaOption, i64)>,
    index: HashMap<VanillaOption, usize>,
}

impl OptionPortfolio {
    pub fn new() -> Self {
        Self::default()
    }

    /// One-leg portfolio
    pub fn single(option: VanillaOption, quantity: i64) -> Self {
        let mut portfolio = Self::new();
        portfolio.add_quantity(option, quantity);
        portfolio
    }

    /// Build from (option, quantity) pairs; repeated legs accumulate.
    pub fn from_legs(legs: impl IntoIterator<Item = (VanillaOption, i64)>) -> Self {
        legs.into_iter().collect()
    }

    /// Add `quantity` to a leg, inserting it at the end if absent.
    pub fn add_quantity(&mut self, option: VanillaOption, quantity: i64) {
        match self.index.get(&option) {
            Some(&i) => self.legs[i].1 = self.legs[i].1.saturating_add(quantity),
            None => {
                self.index.insert(option, self.legs.len());
                self.legs.push((option, quantity));
            }
        }
    }

    /// Net quantity held of `option` (0 when absent)
    pub fn quantity(&self, option: &VanillaOption) -> i64 {
        self.index.get(option).map_or(0, |&i| self.legs[i].1)
    }

    pub fn contains(&self, option: &VanillaOption) -> bool {
        self.index.contains_key(option)
    }

    /// Legs in insertion order
    pub fn legs(&self) -> impl Iterator<Item = (&VanillaOption, i64)> + '_ {
        self.legs.iter().map(|(opt, qty)| (opt, *qty))
    }

    /// Legs with a non-zero quantity
    pub fn net_legs(&self) -> impl Iterator<Item = (&VanillaOption, i64)> + '_ {
        self.legs().filter(|(_, qty)| *qty != 0)
    }

    /// Number of legs, including legs that net to zero
    pub fn len(&self) -> usize {
        self.legs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    /// Aggregate payoff at expiry for the given spot price
    pub fn value(&self, spot: f64) -> f64 {
        self.legs
            .iter()
            .map(|(opt, qty)| opt.value(spot) * *qty as f64)
            .sum()
    }

    /// Strikes of each leg in iteration order (not sorted)
    pub fn exercise_prices(&self) -> Vec<f64> {
        self.legs.iter().map(|(opt, _)| opt.strike).collect()
    }

    /// Present value and Greeks of the whole position.
    ///
    /// Each leg is priced with its own time to expiration under `model` and
    /// weighted by its quantity. Fails if a leg has no expiry attached.
    pub fn valuation(
        &self,
        model: PricingModel,
        spot: f64,
        rate: f64,
        vol: f64,
    ) -> PricingResult<Valuation> {
        self.legs
            .iter()
            .map(|(opt, qty)| -> PricingResult<Valuation> {
                let time = opt.time_to_expiration.ok_or_else(|| {
                    PricingError::domain(format!("{} has no time to expiration", opt))
                })?;
                let leg = price(model, opt.option_type, spot, opt.strike, time, rate, vol)?;
                Ok(leg.scale(*qty as f64))
            })
            .sum()
    }

    /// Copy with every quantity multiplied by `n`, failing on overflow.
    pub fn checked_scale(&self, n: i64) -> PricingResult<OptionPortfolio> {
        let mut scaled = self.clone();
        for (opt, qty) in scaled.legs.iter_mut() {
            let current = *qty;
            *qty = current.checked_mul(n).ok_or_else(|| {
                PricingError::invalid_input(format!(
                    "quantity {} of {} overflows when multiplied by {}",
                    current, opt, n
                ))
            })?;
        }
        Ok(scaled)
    }

    fn scale_quantities(&mut self, n: i64) {
        for (_, qty) in self.legs.iter_mut() {
            *qty = qty.saturating_mul(n);
        }
    }
}

impl PartialEq for OptionPortfolio {
    /// Same legs with the same quantities, regardless of order
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .legs()
                .all(|(opt, qty)| other.contains(opt) && other.quantity(opt) == qty)
    }
}

impl FromIterator<(VanillaOption, i64)> for OptionPortfolio {
    fn from_iter<I: IntoIterator<Item = (VanillaOption, i64)>>(iter: I) -> Self {
        let mut portfolio = Self::new();
        for (opt, qty) in iter {
            portfolio.add_quantity(opt, qty);
        }
        portfolio
    }
}

impl fmt::Display for OptionPortfolio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OptionPortfolio(")?;
        for (i, (opt, qty)) in self.legs().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}:{}", opt, qty)?;
        }
        write!(f, ")")
    }
}

// In-place operators

impl AddAssign<VanillaOption> for OptionPortfolio {
    fn add_assign(&mut self, rhs: VanillaOption) {
        self.add_quantity(rhs, 1);
    }
}

impl SubAssign<VanillaOption> for OptionPortfolio {
    fn sub_assign(&mut self, rhs: VanillaOption) {
        self.add_quantity(rhs, -1);
    }
}

impl AddAssign<&OptionPortfolio> for OptionPortfolio {
    fn add_assign(&mut self, rhs: &OptionPortfolio) {
        for (opt, qty) in rhs.legs() {
            self.add_quantity(*opt, qty);
        }
    }
}

impl SubAssign<&OptionPortfolio> for OptionPortfolio {
    fn sub_assign(&mut self, rhs: &OptionPortfolio) {
        for (opt, qty) in rhs.legs() {
            self.add_quantity(*opt, qty.saturating_neg());
        }
    }
}

impl AddAssign for OptionPortfolio {
    fn add_assign(&mut self, rhs: OptionPortfolio) {
        *self += &rhs;
    }
}

impl SubAssign for OptionPortfolio {
    fn sub_assign(&mut self, rhs: OptionPortfolio) {
        *self -= &rhs;
    }
}

impl MulAssign<i64> for OptionPortfolio {
    fn mul_assign(&mut self, n: i64) {
        self.scale_quantities(n);
    }
}

// Portfolio operators: owned receivers are consumed, borrowed ones cloned

impl Add<VanillaOption> for OptionPortfolio {
    type Output = OptionPortfolio;

    fn add(mut self, rhs: VanillaOption) -> OptionPortfolio {
        self += rhs;
        self
    }
}

impl Add<VanillaOption> for &OptionPortfolio {
    type Output = OptionPortfolio;

    fn add(self, rhs: VanillaOption) -> OptionPortfolio {
        self.clone() + rhs
    }
}

impl Sub<VanillaOption> for OptionPortfolio {
    type Output = OptionPortfolio;

    fn sub(mut self, rhs: VanillaOption) -> OptionPortfolio {
        self -= rhs;
        self
    }
}

impl Sub<VanillaOption> for &OptionPortfolio {
    type Output = OptionPortfolio;

    fn sub(self, rhs: VanillaOption) -> OptionPortfolio {
        self.clone() - rhs
    }
}

impl Add<&OptionPortfolio> for OptionPortfolio {
    type Output = OptionPortfolio;

    fn add(mut self, rhs: &OptionPortfolio) -> OptionPortfolio {
        self += rhs;
        self
    }
}

impl Add for OptionPortfolio {
    type Output = OptionPortfolio;

    fn add(self, rhs: OptionPortfolio) -> OptionPortfolio {
        self + &rhs
    }
}

impl Add for &OptionPortfolio {
    type Output = OptionPortfolio;

    fn add(self, rhs: &OptionPortfolio) -> OptionPortfolio {
        self.clone() + rhs
    }
}

impl Sub<&OptionPortfolio> for OptionPortfolio {
    type Output = OptionPortfolio;

    fn sub(mut self, rhs: &OptionPortfolio) -> OptionPortfolio {
        self -= rhs;
        self
    }
}

impl Sub for OptionPortfolio {
    type Output = OptionPortfolio;

    fn sub(self, rhs: OptionPortfolio) -> OptionPortfolio {
        self - &rhs
    }
}

impl Sub for &OptionPortfolio {
    type Output = OptionPortfolio;

    fn sub(self, rhs: &OptionPortfolio) -> OptionPortfolio {
        self.clone() - rhs
    }
}

impl Mul<i64> for OptionPortfolio {
    type Output = OptionPortfolio;

    fn mul(mut self, n: i64) -> OptionPortfolio {
        self *= n;
        self
    }
}

impl Mul<i64> for &OptionPortfolio {
    type Output = OptionPortfolio;

    fn mul(self, n: i64) -> OptionPortfolio {
        self.clone() * n
    }
}

impl Mul<OptionPortfolio> for i64 {
    type Output = OptionPortfolio;

    fn mul(self, portfolio: OptionPortfolio) -> OptionPortfolio {
        portfolio * self
    }
}

impl Neg for OptionPortfolio {
    type Output = OptionPortfolio;

    fn neg(self) -> OptionPortfolio {
        self * -1
    }
}

impl Neg for &OptionPortfolio {
    type Output = OptionPortfolio;

    fn neg(self) -> OptionPortfolio {
        self.clone() * -1
    }
}

// Single-option operators always produce a portfolio

impl Mul<i64> for VanillaOption {
    type Output = OptionPortfolio;

    fn mul(self, n: i64) -> OptionPortfolio {
        OptionPortfolio::single(self, n)
    }
}

impl Mul<VanillaOption> for i64 {
    type Output = OptionPortfolio;

    fn mul(self, option: VanillaOption) -> OptionPortfolio {
        OptionPortfolio::single(option, self)
    }
}

impl Neg for VanillaOption {
    type Output = OptionPortfolio;

    fn neg(self) -> OptionPortfolio {
        OptionPortfolio::single(self, -1)
    }
}

impl Add for VanillaOption {
    type Output = OptionPortfolio;

    fn add(self, rhs: VanillaOption) -> OptionPortfolio {
        OptionPortfolio::from_legs([(self, 1), (rhs, 1)])
    }
}

impl Sub for VanillaOption {
    type Output = OptionPortfolio;

    fn sub(self, rhs: VanillaOption) -> OptionPortfolio {
        OptionPortfolio::from_legs([(self, 1), (rhs, -1)])
    }
}

impl Add<OptionPortfolio> for VanillaOption {
    type Output = OptionPortfolio;

    fn add(self, rhs: OptionPortfolio) -> OptionPortfolio {
        rhs + self
    }
}

impl Add<&OptionPortfolio> for VanillaOption {
    type Output = OptionPortfolio;

    fn add(self, rhs: &OptionPortfolio) -> OptionPortfolio {
        rhs + self
    }
}

impl Sub<OptionPortfolio> for VanillaOption {
    type Output = OptionPortfolio;

    fn sub(self, rhs: OptionPortfolio) -> OptionPortfolio {
        -(rhs - self)
    }
}

impl Sub<&OptionPortfolio> for VanillaOption {
    type Output = OptionPortfolio;

    fn sub(self, rhs: &OptionPortfolio) -> OptionPortfolio {
        -(rhs - self)
    }
}

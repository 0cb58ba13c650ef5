//! Option contract definitions
//!
//! A `VanillaOption` is the single-leg building block of the combination
//! algebra. It carries its type, strike, exercise style and an optional time
//! to expiration.
//!
//! Identity deliberately ignores `time_to_expiration`: two contracts that share
//! type, strike and exercise style are the same leg inside a portfolio, even if
//! their expiries differ. This is a simplification of the payoff algebra, which
//! only ever evaluates legs at expiry.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::{ensure_positive, PricingError, PricingResult};

/// Option type (Call or Put)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Intrinsic value at given spot
    pub fn intrinsic(&self, spot: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call => (spot - strike).max(0.0),
            OptionType::Put => (strike - spot).max(0.0),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            OptionType::Call => "Call",
            OptionType::Put => "Put",
        }
    }
}

impl FromStr for OptionType {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "call" | "c" => Ok(OptionType::Call),
            "put" | "p" => Ok(OptionType::Put),
            other => Err(PricingError::invalid_state(format!(
                "Unrecognized option type: {}",
                other
            ))),
        }
    }
}

/// Exercise style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ExerciseStyle {
    #[default]
    European,
    American,
}

impl fmt::Display for ExerciseStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExerciseStyle::European => write!(f, "EUROPEAN"),
            ExerciseStyle::American => write!(f, "AMERICAN"),
        }
    }
}

/// Vanilla option contract
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VanillaOption {
    /// Option type (Call/Put)
    pub option_type: OptionType,
    /// Strike (exercise) price
    pub strike: f64,
    /// Exercise style; recorded but not used by any pricing routine
    pub exercise: ExerciseStyle,
    /// Time to expiration in years, if known
    pub time_to_expiration: Option<f64>,
}

impl VanillaOption {
    /// Create a European option with no expiry attached
    pub fn new(option_type: OptionType, strike: f64) -> Self {
        Self {
            option_type,
            strike,
            exercise: ExerciseStyle::European,
            time_to_expiration: None,
        }
    }

    /// European call
    pub fn call(strike: f64) -> Self {
        Self::new(OptionType::Call, strike)
    }

    /// European put
    pub fn put(strike: f64) -> Self {
        Self::new(OptionType::Put, strike)
    }

    pub fn with_exercise(mut self, exercise: ExerciseStyle) -> Self {
        self.exercise = exercise;
        self
    }

    /// Attach a time to expiration (years)
    pub fn with_expiry(mut self, time_to_expiration: f64) -> Self {
        self.time_to_expiration = Some(time_to_expiration);
        self
    }

    /// Check strike and expiry lie in the pricing domain.
    pub fn validate(&self) -> PricingResult<()> {
        ensure_positive("strike", self.strike)?;
        if let Some(t) = self.time_to_expiration {
            ensure_positive("time to expiration", t)?;
        }
        Ok(())
    }

    /// Payoff at expiry for the given spot price
    pub fn value(&self, spot: f64) -> f64 {
        self.option_type.intrinsic(spot, self.strike)
    }

    // -0.0 and 0.0 must hash alike since they compare equal as strikes.
    fn strike_bits(&self) -> u64 {
        (self.strike + 0.0).to_bits()
    }
}

impl PartialEq for VanillaOption {
    fn eq(&self, other: &Self) -> bool {
        self.option_type == other.option_type
            && self.strike_bits() == other.strike_bits()
            && self.exercise == other.exercise
    }
}

impl Eq for VanillaOption {}

impl Hash for VanillaOption {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.option_type.hash(state);
        self.strike_bits().hash(state);
        self.exercise.hash(state);
    }
}

impl fmt::Display for VanillaOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}Option(exercise_price={}, exercise_type={})",
            self.option_type.label(),
            self.strike,
            self.exercise
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_option_type() {
        assert_eq!(OptionType::Call.intrinsic(110.0, 100.0), 10.0);
        assert_eq!(OptionType::Put.intrinsic(90.0, 100.0), 10.0);
        assert_eq!(OptionType::Call.intrinsic(90.0, 100.0), 0.0);
    }

    #[test]
    fn test_parse_option_type() {
        assert_eq!("call".parse::<OptionType>().unwrap(), OptionType::Call);
        assert_eq!(" PUT ".parse::<OptionType>().unwrap(), OptionType::Put);
        assert!(matches!(
            "straddle".parse::<OptionType>(),
            Err(PricingError::InvalidState(_))
        ));
    }

    #[test]
    fn test_payoff() {
        let call = VanillaOption::call(100.0);
        let put = VanillaOption::put(100.0);

        for spot in [0.0, 50.0, 99.5, 100.0, 100.5, 150.0] {
            assert_eq!(call.value(spot), (spot - 100.0).max(0.0));
            assert_eq!(put.value(spot), (100.0 - spot).max(0.0));
        }
    }

    #[test]
    fn test_equality_ignores_expiry() {
        let near = VanillaOption::call(100.0).with_expiry(0.25);
        let far = VanillaOption::call(100.0).with_expiry(1.0);
        assert_eq!(near, far);

        let mut set = HashSet::new();
        set.insert(near);
        set.insert(far);
        assert_eq!(set.len(), 1);

        assert_ne!(VanillaOption::call(100.0), VanillaOption::put(100.0));
        assert_ne!(VanillaOption::call(100.0), VanillaOption::call(105.0));
        assert_ne!(
            VanillaOption::call(100.0),
            VanillaOption::call(100.0).with_exercise(ExerciseStyle::American)
        );
    }

    #[test]
    fn test_validate() {
        assert!(VanillaOption::call(100.0).with_expiry(0.5).validate().is_ok());
        assert!(VanillaOption::call(0.0).validate().is_err());
        assert!(VanillaOption::put(100.0).with_expiry(-1.0).validate().is_err());
    }

    #[test]
    fn test_display() {
        let opt = VanillaOption::call(100.0);
        assert_eq!(
            opt.to_string(),
            "CallOption(exercise_price=100, exercise_type=EUROPEAN)"
        );
        let opt = VanillaOption::put(97.5).with_exercise(ExerciseStyle::American);
        assert_eq!(
            opt.to_string(),
            "PutOption(exercise_price=97.5, exercise_type=AMERICAN)"
        );
    }
}

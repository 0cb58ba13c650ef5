//! Error types for option pricing and portfolio analysis

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PricingError {
    #[error("Domain error: {0}")]
    Domain(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Solver did not converge after {iterations} iterations (bracket [{lower:.6}, {upper:.6}])")]
    NonConvergence {
        iterations: usize,
        lower: f64,
        upper: f64,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type PricingResult<T> = Result<T, PricingError>;

impl PricingError {
    pub fn domain(msg: impl Into<String>) -> Self {
        Self::Domain(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn non_convergence(iterations: usize, lower: f64, upper: f64) -> Self {
        Self::NonConvergence {
            iterations,
            lower,
            upper,
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

/// Require `value` to be finite and strictly positive.
pub(crate) fn ensure_positive(name: &str, value: f64) -> PricingResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PricingError::domain(format!(
            "{} must be positive and finite, got {}",
            name, value
        )))
    }
}

/// Require `value` to be finite (rates may be zero or negative).
pub(crate) fn ensure_finite(name: &str, value: f64) -> PricingResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(PricingError::domain(format!("{} must be finite, got {}", name, value)))
    }
}

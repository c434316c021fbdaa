use thiserror::Error;

/// Probability mass function over an ordered, discrete hypothesis space.
mod pmf;

pub use pmf::*;

/// Cumulative distribution function (the ordered dual of a PMF) and order statistics.
mod cdf;

pub use cdf::*;

/// Free operations combining PMFs (sum of independent variables and weighted mixtures).
mod mixture;

pub use mixture::*;

/// Bayesian suite: a PMF of hypotheses updated by an injected likelihood.
mod suite;

pub use suite::*;

/// Beta conjugate prior over a probability parameter.
mod beta;

pub use beta::*;

/// Recoverable conditions raised by the distributions of this crate. None of them
/// leave a distribution in a partially-mutated state: the operation that fails
/// either did not touch its receiver or restored it before returning.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProbError {

    #[error("Hypothesis {0} is not part of the distribution")]
    MissingHypothesis(String),

    #[error("Distribution has zero total mass and cannot be normalized")]
    DegenerateDistribution,

    #[error("Distribution has no hypotheses")]
    EmptyDistribution,

    #[error("Invalid shape parameters alpha={alpha}, beta={beta} (both should be positive and finite)")]
    InvalidShapeParameters { alpha : f64, beta : f64 },

    #[error("Malformed cumulative distribution at position {index}: {reason}")]
    MalformedCdfInput { index : usize, reason : String },

    #[error("Percentile {0} outside [0, 100]")]
    PercentileOutOfRange(f64),

    #[error("Probability {0} outside [0, 1]")]
    ProbabilityOutOfRange(f64),

    #[error("Weight {0} should be finite and non-negative")]
    InvalidWeight(f64),

    #[error("Likelihood {0} should be finite and non-negative")]
    InvalidLikelihood(f64),

    #[error("Hypothesis {0} cannot be represented as a real number")]
    NonNumericHypothesis(String),

    #[error("Count {0} cannot be represented as a real number")]
    NonNumericCount(String),

    #[error("Order statistics require at least one draw")]
    InvalidDrawCount,

    #[error("Discretization requires at least two steps (informed {0})")]
    InvalidStepCount(usize)

}

impl ProbError {

    pub(crate) fn missing<H : std::fmt::Debug>(h : &H) -> Self {
        ProbError::MissingHypothesis(format!("{:?}", h))
    }

    pub(crate) fn non_numeric<H : std::fmt::Debug>(h : &H) -> Self {
        ProbError::NonNumericHypothesis(format!("{:?}", h))
    }

    pub(crate) fn malformed(index : usize, reason : impl Into<String>) -> Self {
        ProbError::MalformedCdfInput { index, reason : reason.into() }
    }

}

/* Validates a percentage in [0, 100] and maps it to a probability in [0, 1]. */
pub(crate) fn percentage_to_prob(percentage : f64) -> Result<f64, ProbError> {
    if percentage.is_nan() || percentage < 0.0 || percentage > 100.0 {
        return Err(ProbError::PercentileOutOfRange(percentage));
    }
    Ok(percentage / 100.)
}

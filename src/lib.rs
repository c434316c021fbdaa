/// Discrete distributions for Bayesian inference over finite hypothesis spaces:
/// probability mass functions (Pmf), their cumulative duals (Cdf), free operations combining
/// them (convolution and mixtures), the Suite update loop driven by an injected likelihood,
/// and the Beta conjugate prior.
pub mod prob;

/// Numeric tolerances and running (cumulative) computations shared by the distributions.
pub mod calc;

pub use prob::{Beta, Cdf, Likelihood, Pmf, ProbError, Suite};

use super::*;
use num_traits::ToPrimitive;
use rand::Rng;
use rand_distr::Distribution;
use std::fmt::Debug;
use tracing::debug;

/// A beta distribution yields ratios over the interval [0, 1]. It is the conjugate prior of
/// the Bernoulli/Binomial likelihood: alpha and beta can be read as pseudo-counts of successes
/// and failures, and observing h successes and t failures yields Beta(alpha + h, beta + t)
/// exactly, so no renormalization is ever needed. Setting alpha = beta = 1 gives the uniform
/// distribution over [0, 1].
///
/// The normalizing constant B(alpha, beta) is not tracked: eval_pdf returns the unnormalized
/// density.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Beta {

    alpha : f64,

    beta : f64

}

fn valid_shape(alpha : f64, beta : f64) -> bool {
    alpha.is_finite() && beta.is_finite() && alpha > 0.0 && beta > 0.0
}

fn count_to_f64<T>(count : &T) -> Result<f64, ProbError>
where
    T : ToPrimitive + Debug
{
    count.to_f64().ok_or_else(|| ProbError::NonNumericCount(format!("{:?}", count)) )
}

impl Beta {

    pub fn new(alpha : f64, beta : f64) -> Result<Self, ProbError> {
        if !valid_shape(alpha, beta) {
            return Err(ProbError::InvalidShapeParameters { alpha, beta });
        }
        Ok(Self { alpha, beta })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Conjugate update with (successes, failures) counts. Counts may be fractional (or
    /// negative, to retract evidence), but an update that would leave alpha or beta
    /// non-positive is rejected and the distribution is kept as it was. Any count type
    /// convertible to f64 is accepted (integers of every width, floats).
    pub fn update<T>(&mut self, data : (T, T)) -> Result<(), ProbError>
    where
        T : ToPrimitive + Debug
    {
        let heads = count_to_f64(&data.0)?;
        let tails = count_to_f64(&data.1)?;
        let (alpha, beta) = (self.alpha + heads, self.beta + tails);
        if !valid_shape(alpha, beta) {
            return Err(ProbError::InvalidShapeParameters { alpha, beta });
        }
        self.alpha = alpha;
        self.beta = beta;
        debug!(alpha, beta, "beta updated");
        Ok(())
    }

    pub fn mean(&self) -> f64 {
        self.alpha / (self.alpha + self.beta)
    }

    pub fn var(&self) -> f64 {
        let (a, b) = (self.alpha, self.beta);
        a * b / ((a + b).powf(2.) * (a + b + 1.))
    }

    /// Returns the density maximum, which is only interior to [0,1] when alpha and beta are
    /// both greater than one.
    pub fn mode(&self) -> Option<f64> {
        let (a, b) = (self.alpha, self.beta);
        if a > 1. && b > 1. {
            Some((a - 1.) / (a + b - 2.))
        } else {
            None
        }
    }

    /// Unnormalized density x^(alpha-1) (1-x)^(beta-1). Divide by the beta function
    /// B(alpha, beta) to obtain the normalized density. Returns zero outside [0, 1].
    pub fn eval_pdf(&self, x : f64) -> f64 {
        if !(0.0..=1.0).contains(&x) {
            return 0.0;
        }
        x.powf(self.alpha - 1.) * (1. - x).powf(self.beta - 1.)
    }

    pub fn sample_with<R>(&self, rng : &mut R) -> Result<f64, ProbError>
    where
        R : Rng + ?Sized
    {
        let (alpha, beta) = (self.alpha, self.beta);
        let sampler = rand_distr::Beta::new(alpha, beta)
            .map_err(|_| ProbError::InvalidShapeParameters { alpha, beta } )?;
        Ok(sampler.sample(rng))
    }

    pub fn sample(&self) -> Result<f64, ProbError> {
        self.sample_with(&mut rand::thread_rng())
    }

    /// Position in [0, 1] of the i-th point of an evenly-spaced grid with the informed number
    /// of steps (the inverse of the hypotheses of make_pmf).
    pub fn grid_point(i : usize, steps : usize) -> f64 {
        if steps < 2 {
            return 0.0;
        }
        i as f64 / (steps - 1) as f64
    }

    /// Discrete approximation of the distribution over steps evenly-spaced points of [0, 1].
    /// Hypotheses are the grid indices 0..steps (see grid_point), weighted by the density
    /// and normalized.
    pub fn make_pmf(&self, steps : usize) -> Result<Pmf<usize>, ProbError> {
        if steps < 2 {
            return Err(ProbError::InvalidStepCount(steps));
        }
        let mut pmf = Pmf::new();
        for i in 0..steps {
            let x = Self::grid_point(i, steps);
            let mut d = self.eval_pdf(x);

            // alpha < 1 or beta < 1 place an infinite density at the grid boundary.
            if !d.is_finite() {
                d = self.eval_pdf(x.max(f64::EPSILON).min(1. - f64::EPSILON));
            }
            pmf.set(i, d)?;
        }
        pmf.normalize()?;
        Ok(pmf)
    }

}

impl Default for Beta {

    fn default() -> Self {
        Self { alpha : 1., beta : 1. }
    }

}

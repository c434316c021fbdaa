use super::*;
use crate::calc::{self, PROB_TOLERANCE};
use rand::Rng;
use std::cmp::Ordering;
use std::fmt::Debug;

/// Cumulative distribution function over an ordered set of values: probs[i] is the probability
/// that the variable is smaller than or equal to values[i].
///
/// A well-formed CDF has strictly ascending values and non-decreasing cumulative probabilities
/// in [0, 1]. This invariant is checked lazily: append(.) is an unchecked builder, and every
/// operation that depends on the invariant (make_pmf, max_of_k, min_of_k, value, percentile,
/// random sampling) validates the whole CDF first, failing with ProbError::MalformedCdfInput.
#[derive(Debug, Clone, PartialEq)]
pub struct Cdf<H> {

    values : Vec<H>,

    probs : Vec<f64>

}

impl<H> Default for Cdf<H> {

    fn default() -> Self {
        Self { values : Vec::new(), probs : Vec::new() }
    }

}

impl<H> Cdf<H>
where
    H : Ord + Clone + Debug
{

    /// Builds a CDF from parallel sequences of values and cumulative probabilities. The pairs
    /// are sorted by value; their cumulative probabilities are not checked here.
    pub fn new(values : Vec<H>, probs : Vec<f64>) -> Result<Self, ProbError> {
        if values.len() != probs.len() {
            return Err(ProbError::malformed(
                values.len().min(probs.len()),
                format!("{} values informed for {} cumulative probabilities", values.len(), probs.len())
            ));
        }
        let mut pairs : Vec<(H, f64)> = values.into_iter().zip(probs).collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0) );
        let (values, probs) : (Vec<H>, Vec<f64>) = pairs.into_iter().unzip();
        Ok(Self { values, probs })
    }

    /* Used by Pmf::make_cdf, which already iterates in ascending order. */
    pub(crate) fn from_sorted(values : Vec<H>, probs : Vec<f64>) -> Self {
        Self { values, probs }
    }

    /// Appends a point to the end of the CDF. The caller is responsible for keeping values
    /// ascending and cumulative probabilities non-decreasing.
    pub fn append(&mut self, value : H, cumul_prob : f64) {
        self.values.push(value);
        self.probs.push(cumul_prob);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[H] {
        &self.values[..]
    }

    pub fn probs(&self) -> &[f64] {
        &self.probs[..]
    }

    /// (value, cumulative probability) pairs.
    pub fn iter(&self) -> impl Iterator<Item=(&H, f64)> + '_ {
        self.values.iter().zip(self.probs.iter().copied())
    }

    /// Verifies values are strictly ascending and cumulative probabilities are non-decreasing
    /// within [0, 1] (up to PROB_TOLERANCE above 1).
    pub fn validate(&self) -> Result<(), ProbError> {
        for (i, p) in self.probs.iter().enumerate() {
            if p.is_nan() || *p < 0.0 || *p > 1.0 + PROB_TOLERANCE {
                return Err(ProbError::malformed(i, format!("cumulative probability {} outside [0, 1]", p)));
            }
            if i > 0 {
                if self.values[i - 1].cmp(&self.values[i]) != Ordering::Less {
                    return Err(ProbError::malformed(
                        i,
                        format!("value {:?} does not follow {:?}", self.values[i], self.values[i - 1])
                    ));
                }
                if *p < self.probs[i - 1] {
                    return Err(ProbError::malformed(
                        i,
                        format!("cumulative probability decreases from {} to {}", self.probs[i - 1], p)
                    ));
                }
            }
        }
        Ok(())
    }

    /// Cumulative probability at an arbitrary value: zero below the smallest value, and the
    /// cumulative probability of the greatest value smaller than or equal to x otherwise.
    pub fn prob(&self, x : &H) -> Result<f64, ProbError> {
        self.validate()?;
        let n_below = self.values.partition_point(|v| v <= x );
        if n_below == 0 {
            Ok(0.0)
        } else {
            Ok(self.probs[n_below - 1])
        }
    }

    /// Inverse CDF: the smallest value whose cumulative probability reaches p. Values at which
    /// no mass has been accumulated yet are never returned.
    pub fn value(&self, p : f64) -> Result<&H, ProbError> {
        if p.is_nan() || p < 0.0 || p > 1.0 {
            return Err(ProbError::ProbabilityOutOfRange(p));
        }
        self.validate()?;
        let last = self.values.last().ok_or(ProbError::EmptyDistribution)?;
        let found = self.iter()
            .find(|(_, c)| *c > 0.0 && *c >= p - PROB_TOLERANCE )
            .map(|(v, _)| v );
        Ok(found.unwrap_or(last))
    }

    pub fn percentile(&self, percentage : f64) -> Result<&H, ProbError> {
        self.value(percentage_to_prob(percentage)?)
    }

    /// Central interval holding percentage% of the probability mass.
    pub fn credible_interval(&self, percentage : f64) -> Result<(&H, &H), ProbError> {
        percentage_to_prob(percentage)?;
        let tail = (100. - percentage) / 2.;
        Ok((self.percentile(tail)?, self.percentile(100. - tail)?))
    }

    /// Inverse-transform sampling.
    pub fn random_with<R>(&self, rng : &mut R) -> Result<&H, ProbError>
    where
        R : Rng + ?Sized
    {
        self.value(rng.gen::<f64>())
    }

    pub fn random(&self) -> Result<&H, ProbError> {
        self.random_with(&mut rand::thread_rng())
    }

    /// Recovers the probability mass at each value by taking differences between successive
    /// cumulative probabilities (the first value keeps its own cumulative probability).
    pub fn make_pmf(&self) -> Result<Pmf<H>, ProbError> {
        self.validate()?;
        let mut pmf = Pmf::new();
        let masses = calc::running::successive_differences(self.probs.iter().copied());
        for (v, m) in self.values.iter().zip(masses) {
            pmf.incr_unchecked(v.clone(), m);
        }
        Ok(pmf)
    }

    /// Distribution of the maximum of k independent draws: if X1..Xk are iid with CDF F,
    /// P(max(X1..Xk) <= x) = F(x)^k.
    pub fn max_of_k(&self, k : u32) -> Result<Self, ProbError> {
        self.transform_order(k, |p, k| p.powf(k) )
    }

    /// Distribution of the minimum of k independent draws: P(min(X1..Xk) <= x) = 1 - (1 - F(x))^k.
    pub fn min_of_k(&self, k : u32) -> Result<Self, ProbError> {
        self.transform_order(k, |p, k| 1. - (1. - p).powf(k) )
    }

    fn transform_order(&self, k : u32, f : impl Fn(f64, f64) -> f64) -> Result<Self, ProbError> {
        if k == 0 {
            return Err(ProbError::InvalidDrawCount);
        }
        self.validate()?;
        let k = f64::from(k);
        let probs = self.probs.iter().map(|p| f(p.min(1.0), k) ).collect();
        Ok(Self { values : self.values.clone(), probs })
    }

}

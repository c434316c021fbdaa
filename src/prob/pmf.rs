use super::*;
use crate::calc::{self, PROB_TOLERANCE};
use num_traits::ToPrimitive;
use rand::Rng;
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt::Debug;
use std::ops::Add;

/// A probability mass function maps each hypothesis of a finite, discrete space to a
/// non-negative weight. Weights are not required to sum to one between mutations: Set,
/// Incr and Mult change them freely, and normalize() rescales them into probabilities.
///
/// Hypotheses are kept in a BTreeMap, so every iteration over the PMF (cumulative sums,
/// percentiles, CDF conversion, sampling) visits them in ascending value order. Hypotheses
/// only need to be totally ordered; numeric statistics (mean, variance) additionally
/// require them to be convertible to f64; convolution requires them to be addable.
#[derive(Debug, Clone, PartialEq)]
pub struct Pmf<H>
where
    H : Ord
{
    weights : BTreeMap<H, f64>
}

impl<H> Default for Pmf<H>
where
    H : Ord
{

    fn default() -> Self {
        Self { weights : BTreeMap::new() }
    }

}

impl<H> Pmf<H>
where
    H : Ord + Clone + Debug
{

    pub fn new() -> Self {
        Default::default()
    }

    /// Builds a normalized PMF assigning the same probability to every informed hypothesis.
    /// Repeated hypotheses collapse into a single entry.
    pub fn uniform(hypotheses : impl IntoIterator<Item=H>) -> Result<Self, ProbError> {
        let mut pmf = Self::new();
        for h in hypotheses {
            pmf.weights.insert(h, 1.0);
        }
        if pmf.is_empty() {
            return Err(ProbError::EmptyDistribution);
        }
        pmf.normalize()?;
        Ok(pmf)
    }

    /// Histogram of a stream of observations: each occurrence increments its hypothesis
    /// by one. The result holds absolute counts; call normalize() to obtain frequencies.
    ///
    /// ```rust
    /// let mut pmf = thinkbayes::prob::Pmf::from_counts("abracadabra".chars());
    /// assert_eq!(pmf.prob(&'a').unwrap(), 5.0);
    /// pmf.normalize().unwrap();
    /// ```
    pub fn from_counts(observations : impl IntoIterator<Item=H>) -> Self {
        let mut pmf = Self::new();
        for h in observations {
            pmf.incr_one(h);
        }
        pmf
    }

    /// Builds an (unnormalized) PMF from hypothesis/weight pairs. Repeated hypotheses
    /// accumulate their weights.
    pub fn from_items(items : impl IntoIterator<Item=(H, f64)>) -> Result<Self, ProbError> {
        let mut pmf = Self::new();
        for (h, w) in items {
            pmf.incr(h, w)?;
        }
        Ok(pmf)
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn contains(&self, h : &H) -> bool {
        self.weights.contains_key(h)
    }

    /// Sum of all weights (1.0 for a normalized PMF).
    pub fn total(&self) -> f64 {
        self.weights.values().sum()
    }

    /// Hypotheses in ascending order.
    pub fn hypotheses(&self) -> impl Iterator<Item=&H> + '_ {
        self.weights.keys()
    }

    /// (hypothesis, weight) pairs in ascending hypothesis order.
    pub fn iter(&self) -> impl Iterator<Item=(&H, f64)> + Clone + '_ {
        self.weights.iter().map(|(h, w)| (h, *w) )
    }

    /// Overwrites the weight of the hypothesis, inserting it if absent.
    pub fn set(&mut self, h : H, prob : f64) -> Result<(), ProbError> {
        if !calc::is_valid_weight(prob) {
            return Err(ProbError::InvalidWeight(prob));
        }
        self.weights.insert(h, prob);
        Ok(())
    }

    /// Adds amount to the weight of the hypothesis, creating it with that weight when absent.
    /// Negative amounts are accepted as long as the resulting weight stays non-negative.
    pub fn incr(&mut self, h : H, amount : f64) -> Result<(), ProbError> {
        let curr = self.weights.get(&h).copied().unwrap_or(0.0);
        let next = curr + amount;
        if !calc::is_valid_weight(next) {
            return Err(ProbError::InvalidWeight(next));
        }
        self.weights.insert(h, next);
        Ok(())
    }

    /// Counts one more occurrence of the hypothesis.
    pub fn incr_one(&mut self, h : H) {
        *self.weights.entry(h).or_insert(0.0) += 1.0;
    }

    /// Multiplies the weight of the hypothesis by factor. Hypotheses that are not part of
    /// the PMF are left absent (this is a no-op, not an error).
    pub fn mult(&mut self, h : &H, factor : f64) -> Result<(), ProbError> {
        if !calc::is_valid_weight(factor) {
            return Err(ProbError::InvalidWeight(factor));
        }
        if let Some(w) = self.weights.get_mut(h) {
            *w *= factor;
        }
        Ok(())
    }

    /// Removes the hypothesis, returning its weight if it was present.
    pub fn remove(&mut self, h : &H) -> Option<f64> {
        self.weights.remove(h)
    }

    /// Rescales the weights so they sum to one, returning the total weight before the
    /// rescaling (the normalizing constant). A PMF with zero total weight is not touched
    /// and yields ProbError::DegenerateDistribution.
    pub fn normalize(&mut self) -> Result<f64, ProbError> {
        let total = self.total();
        if !(total > 0.0) {
            return Err(ProbError::DegenerateDistribution);
        }
        for w in self.weights.values_mut() {
            *w /= total;
        }
        Ok(total)
    }

    /// Probability (or current weight, if not normalized) of the hypothesis.
    pub fn prob(&self, h : &H) -> Result<f64, ProbError> {
        self.weights.get(h).copied().ok_or_else(|| ProbError::missing(h) )
    }

    /// Weight of the hypothesis, or the informed default when it is absent.
    pub fn prob_or(&self, h : &H, default : f64) -> f64 {
        self.weights.get(h).copied().unwrap_or(default)
    }

    /// Returns the hypothesis with largest probability. When two or more hypotheses share
    /// the largest probability, the greatest of them is returned (i.e. the comparison is made
    /// over (probability, hypothesis) pairs).
    pub fn maximum_a_posteriori(&self) -> Result<&H, ProbError> {
        let mut best : Option<(&H, f64)> = None;
        for (h, w) in self.iter() {
            match best {
                // Ascending iteration: replacing on equal weights lets the greater hypothesis win ties.
                Some((_, best_w)) if w < best_w => { },
                _ => best = Some((h, w))
            }
        }
        best.map(|(h, _)| h ).ok_or(ProbError::EmptyDistribution)
    }

    /// Returns the smallest hypothesis whose cumulative probability reaches percentage / 100.
    /// Cumulative probabilities are taken relative to the total weight, so unnormalized PMFs
    /// are treated as their normalized counterparts. Hypotheses at which the cumulative mass is
    /// still zero are skipped, so percentile(0.) is the smallest hypothesis with positive mass
    /// and percentile(100.) the greatest hypothesis with positive mass.
    pub fn percentile(&self, percentage : f64) -> Result<&H, ProbError> {
        let p = percentage_to_prob(percentage)?;
        if self.is_empty() {
            return Err(ProbError::EmptyDistribution);
        }
        let total = self.total();
        if !(total > 0.0) {
            return Err(ProbError::DegenerateDistribution);
        }
        let mut last_positive = None;
        let cumul = calc::running::cumulative_sum(self.weights.values().map(|w| *w / total ));
        for ((h, w), c) in self.iter().zip(cumul) {
            if c > 0.0 && c >= p - PROB_TOLERANCE {
                return Ok(h);
            }
            if w > 0.0 {
                last_positive = Some(h);
            }
        }

        // Only reachable through rounding of the cumulative sum at p = 1.
        last_positive.ok_or(ProbError::DegenerateDistribution)
    }

    /// Central interval holding percentage% of the probability mass.
    pub fn credible_interval(&self, percentage : f64) -> Result<(&H, &H), ProbError> {
        percentage_to_prob(percentage)?;
        let tail = (100. - percentage) / 2.;
        Ok((self.percentile(tail)?, self.percentile(100. - tail)?))
    }

    /// Accumulates the probabilities in ascending hypothesis order. Cumulative values are
    /// relative to the total weight, so the last cumulative probability is 1.0 whenever the
    /// PMF carries any mass.
    pub fn make_cdf(&self) -> Cdf<H> {
        let total = self.total();
        let scale = if total > 0.0 { total } else { 1.0 };
        let values : Vec<H> = self.weights.keys().cloned().collect();
        let probs : Vec<f64> = calc::running::cumulative_sum(self.weights.values().map(|w| *w / scale ))
            .collect();
        Cdf::from_sorted(values, probs)
    }

    /// Distribution of the maximum of k independent draws from this PMF.
    pub fn max_of_k(&self, k : u32) -> Result<Cdf<H>, ProbError> {
        self.make_cdf().max_of_k(k)
    }

    /// Draws a hypothesis with probability proportional to its weight.
    pub fn random_with<R>(&self, rng : &mut R) -> Result<&H, ProbError>
    where
        R : Rng + ?Sized
    {
        if self.is_empty() {
            return Err(ProbError::EmptyDistribution);
        }
        let total = self.total();
        if !(total > 0.0) {
            return Err(ProbError::DegenerateDistribution);
        }
        let target = rng.gen::<f64>() * total;
        let mut acc = 0.0;
        let mut last_positive = None;
        for (h, w) in self.iter() {
            acc += w;
            if w > 0.0 {
                if acc > target {
                    return Ok(h);
                }
                last_positive = Some(h);
            }
        }
        last_positive.ok_or(ProbError::DegenerateDistribution)
    }

    /// Draws a hypothesis using the thread-local generator.
    pub fn random(&self) -> Result<&H, ProbError> {
        self.random_with(&mut rand::thread_rng())
    }

    /// Distribution of the sum of two independent variables distributed as self and other.
    pub fn convolve(&self, other : &Self) -> Self
    where
        H : Add<Output=H>
    {
        super::mixture::convolve(self, other)
    }

    /* Accumulates weights that are non-negative by construction (products and
    sums of stored weights) without revalidating them. */
    pub(crate) fn incr_unchecked(&mut self, h : H, amount : f64) {
        *self.weights.entry(h).or_insert(0.0) += amount;
    }

    pub(crate) fn weights_mut(&mut self) -> btree_map::ValuesMut<'_, H, f64> {
        self.weights.values_mut()
    }

}

impl<H> Pmf<H>
where
    H : Ord + Clone + Debug + ToPrimitive
{

    fn numeric_items(&self) -> Result<Vec<(f64, f64)>, ProbError> {
        if self.is_empty() {
            return Err(ProbError::EmptyDistribution);
        }
        self.iter()
            .map(|(h, w)| h.to_f64().map(|v| (v, w) ).ok_or_else(|| ProbError::non_numeric(h) ) )
            .collect()
    }

    fn mean_variance(&self) -> Result<(f64, f64), ProbError> {
        let items = self.numeric_items()?;
        let total = self.total();
        if !(total > 0.0) {
            return Err(ProbError::DegenerateDistribution);
        }
        Ok(calc::running::weighted_mean_variance(items.iter().copied(), total))
    }

    /// Expected value sum(h * p(h)). Weights are taken relative to their total, which
    /// makes no difference for a normalized PMF.
    pub fn mean(&self) -> Result<f64, ProbError> {
        self.mean_variance().map(|(m, _)| m )
    }

    pub fn var(&self) -> Result<f64, ProbError> {
        self.mean_variance().map(|(_, v)| v )
    }

}

impl<'a, H> IntoIterator for &'a Pmf<H>
where
    H : Ord
{

    type Item = (&'a H, &'a f64);

    type IntoIter = btree_map::Iter<'a, H, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.weights.iter()
    }

}

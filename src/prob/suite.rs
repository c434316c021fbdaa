use super::*;
use crate::calc;
use std::fmt::Debug;
use std::ops::Deref;
use tracing::{debug, warn};

/// Scores how consistent a hypothesis is with an observation. This is the only capability
/// a concrete inference problem needs to supply to a Suite; the returned weight should be
/// finite and non-negative, and need not be normalized over the observation space.
///
/// Any closure Fn(&D, &H) -> f64 is a likelihood:
///
/// ```rust
/// use thinkbayes::prob::Suite;
///
/// // Which die (4, 6, 8, 12 or 20 sides) produced the roll?
/// let dice = |roll : &u32, sides : &u32| if roll > sides { 0.0 } else { 1.0 / *sides as f64 };
/// let mut suite = Suite::new(vec![4u32, 6, 8, 12, 20], dice).unwrap();
/// suite.update(&6).unwrap();
/// assert_eq!(suite.prob(&4).unwrap(), 0.0);
/// ```
pub trait Likelihood<D, H> {

    fn likelihood(&self, data : &D, hypothesis : &H) -> f64;

}

impl<D, H, F> Likelihood<D, H> for F
where
    F : Fn(&D, &H) -> f64
{

    fn likelihood(&self, data : &D, hypothesis : &H) -> f64 {
        self(data, hypothesis)
    }

}

/// A suite is a PMF whose hypotheses describe a latent parameter, coupled to the likelihood
/// used to update it. Every update multiplies the prior weight of each hypothesis by the
/// likelihood of the evidence and renormalizes (posterior ~ prior * likelihood).
///
/// Updates are transactional: posterior weights are staged, and only committed when every
/// likelihood is valid and the posterior carries positive mass. A failed update leaves the
/// prior exactly as it was.
///
/// The current distribution is readable through Deref<Target=Pmf<H>>; mutations other than
/// updates go through pmf_mut().
#[derive(Debug, Clone)]
pub struct Suite<H, L>
where
    H : Ord
{

    pmf : Pmf<H>,

    likelihood : L

}

impl<H, L> Suite<H, L>
where
    H : Ord + Clone + Debug
{

    /// Builds a suite with a uniform prior over the informed hypotheses.
    pub fn new(hypotheses : impl IntoIterator<Item=H>, likelihood : L) -> Result<Self, ProbError> {
        let pmf = Pmf::uniform(hypotheses)?;
        debug!(hypotheses = pmf.len(), "suite created with uniform prior");
        Ok(Self { pmf, likelihood })
    }

    /// Builds a suite from an arbitrary prior, which is normalized here.
    pub fn from_pmf(mut prior : Pmf<H>, likelihood : L) -> Result<Self, ProbError> {
        if prior.is_empty() {
            return Err(ProbError::EmptyDistribution);
        }
        prior.normalize()?;
        debug!(hypotheses = prior.len(), "suite created from prior");
        Ok(Self { pmf : prior, likelihood })
    }

    pub fn pmf(&self) -> &Pmf<H> {
        &self.pmf
    }

    pub fn pmf_mut(&mut self) -> &mut Pmf<H> {
        &mut self.pmf
    }

    pub fn into_pmf(self) -> Pmf<H> {
        self.pmf
    }

    pub fn likelihood(&self) -> &L {
        &self.likelihood
    }

    /// Performs one Bayesian update with the observation, returning the normalizing constant
    /// (the total posterior weight before normalization, i.e. the probability of the data
    /// under the prior). If the likelihood is zero for every hypothesis, the prior is kept and
    /// ProbError::DegenerateDistribution is returned.
    pub fn update<D>(&mut self, data : &D) -> Result<f64, ProbError>
    where
        L : Likelihood<D, H>
    {
        let (staged, scale) = self.staged_posterior(std::iter::once(data))?;
        let norm = self.commit(staged, scale)?;
        debug!(normalizer = norm, "suite updated");
        Ok(norm)
    }

    /// Updates the suite with every observation of the dataset, normalizing only once at the
    /// end. This is equivalent (up to rounding) to calling update for each observation in turn,
    /// and returns the product of the normalizing constants those calls would have returned.
    ///
    /// Staged weights are rescaled by their maximum after every observation, so long datasets
    /// of very small or very large likelihoods neither underflow nor overflow the posterior.
    /// The returned constant is the product of those scale factors and is not protected: it
    /// may round to zero or to infinity over long datasets while the posterior stays exact.
    /// A dataset under which every hypothesis ends with zero weight (some observation has zero
    /// likelihood wherever the suite still has mass) yields ProbError::DegenerateDistribution
    /// and keeps the prior, at the same point sequential updates would have failed.
    pub fn update_set<'a, D>(&mut self, dataset : impl IntoIterator<Item=&'a D>) -> Result<f64, ProbError>
    where
        D : 'a,
        L : Likelihood<D, H>
    {
        let dataset : Vec<&D> = dataset.into_iter().collect();
        let (staged, scale) = self.staged_posterior(dataset.iter().copied())?;
        let norm = self.commit(staged, scale)?;
        debug!(observations = dataset.len(), normalizer = norm, "suite updated with dataset");
        Ok(norm)
    }

    /* Multiplies the current weights (in ascending hypothesis order) by the likelihood
    of every observation, without touching the suite. The staged weights are kept with
    maximum 1; the returned factor times the staged weights gives the unnormalized posterior. */
    fn staged_posterior<'a, D>(&self, data : impl Iterator<Item=&'a D>) -> Result<(Vec<f64>, f64), ProbError>
    where
        D : 'a,
        L : Likelihood<D, H>
    {
        let mut staged : Vec<f64> = self.pmf.iter().map(|(_, w)| w ).collect();
        let mut scale = rescale_by_max(&mut staged);
        for d in data {
            for ((h, _), w) in self.pmf.iter().zip(staged.iter_mut()) {
                let like = self.likelihood.likelihood(d, h);
                if !calc::is_valid_weight(like) {
                    return Err(ProbError::InvalidLikelihood(like));
                }
                *w *= like;
            }
            scale *= rescale_by_max(&mut staged);
        }
        Ok((staged, scale))
    }

    fn commit(&mut self, staged : Vec<f64>, scale : f64) -> Result<f64, ProbError> {
        let total : f64 = staged.iter().sum();
        if !(total > 0.0) {
            warn!(hypotheses = staged.len(), "update collapsed every hypothesis to zero; prior kept");
            return Err(ProbError::DegenerateDistribution);
        }
        for (w, s) in self.pmf.weights_mut().zip(staged) {
            *w = s / total;
        }
        Ok(total * scale)
    }

}

/* Divides the weights by their maximum, returning it. Weights that are all zero are
left as they are (with a unit factor). */
fn rescale_by_max(weights : &mut [f64]) -> f64 {
    let max = weights.iter().copied().fold(0.0, f64::max);
    if !(max > 0.0) {
        return 1.0;
    }
    for w in weights.iter_mut() {
        *w /= max;
    }
    max
}

impl<H, L> Deref for Suite<H, L>
where
    H : Ord
{

    type Target = Pmf<H>;

    fn deref(&self) -> &Pmf<H> {
        &self.pmf
    }

}

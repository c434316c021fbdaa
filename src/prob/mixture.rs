use super::*;
use crate::calc;
use std::fmt::Debug;
use std::ops::Add;
use tracing::trace;

/// Distribution of the sum of two independent variables: every pair of hypotheses (h1, h2)
/// contributes p1 * p2 to the hypothesis h1 + h2. Pairs that map to the same sum accumulate
/// their probabilities. The cost is proportional to the product of both hypothesis counts.
pub fn convolve<H>(a : &Pmf<H>, b : &Pmf<H>) -> Pmf<H>
where
    H : Ord + Clone + Debug + Add<Output=H>
{
    trace!(lhs = a.len(), rhs = b.len(), "convolving distributions");
    let mut sum = Pmf::new();
    for (h1, p1) in a.iter() {
        for (h2, p2) in b.iter() {
            sum.incr_unchecked(h1.clone() + h2.clone(), p1 * p2);
        }
    }
    sum
}

/// Distribution of the sum of several independent variables, convolving them in order.
/// Fails with ProbError::EmptyDistribution if no distribution is informed.
pub fn convolve_all<'a, H>(pmfs : impl IntoIterator<Item=&'a Pmf<H>>) -> Result<Pmf<H>, ProbError>
where
    H : Ord + Clone + Debug + Add<Output=H> + 'a
{
    let mut pmfs = pmfs.into_iter();
    let first = pmfs.next().ok_or(ProbError::EmptyDistribution)?;
    Ok(pmfs.fold(first.clone(), |acc, pmf| convolve(&acc, pmf) ))
}

impl<'a, 'b, H> Add<&'b Pmf<H>> for &'a Pmf<H>
where
    H : Ord + Clone + Debug + Add<Output=H>
{

    type Output = Pmf<H>;

    fn add(self, other : &'b Pmf<H>) -> Pmf<H> {
        convolve(self, other)
    }

}

/// Marginal distribution of a mixture. Each entry pairs a sub-distribution with its mixing
/// weight (the probability that the outcome is drawn from that sub-distribution); every
/// outcome of a sub-distribution is accumulated with its probability scaled by the mixing
/// weight. The result is normalized whenever the mixing weights and sub-distributions are.
pub fn mixture<'a, H>(weighted : impl IntoIterator<Item=(&'a Pmf<H>, f64)>) -> Result<Pmf<H>, ProbError>
where
    H : Ord + Clone + Debug + 'a
{
    let mut mix = Pmf::new();
    let mut n_components = 0;
    for (pmf, weight) in weighted {
        if !calc::is_valid_weight(weight) {
            return Err(ProbError::InvalidWeight(weight));
        }
        for (h, p) in pmf.iter() {
            mix.incr_unchecked(h.clone(), weight * p);
        }
        n_components += 1;
    }
    if n_components == 0 {
        return Err(ProbError::EmptyDistribution);
    }
    trace!(components = n_components, outcomes = mix.len(), "mixture built");
    Ok(mix)
}

/// Mixture over a meta-distribution: the hypotheses of meta index the sub-distributions
/// found in components, and their probabilities are the mixing weights. Fails with
/// ProbError::MissingHypothesis when a hypothesis of meta has no sub-distribution.
pub fn mixture_of<K, H>(meta : &Pmf<K>, components : impl Fn(&K) -> Option<Pmf<H>>) -> Result<Pmf<H>, ProbError>
where
    K : Ord + Clone + Debug,
    H : Ord + Clone + Debug
{
    let subs = meta.iter()
        .map(|(k, w)| components(k).map(|pmf| (pmf, w) ).ok_or_else(|| ProbError::missing(k) ) )
        .collect::<Result<Vec<_>, _>>()?;
    mixture(subs.iter().map(|(pmf, w)| (pmf, *w) ))
}

#[cfg(test)]
mod tests {

    use super::*;

    const EPS : f64 = 1E-9;

    fn die(sides : i32) -> Pmf<i32> {
        Pmf::uniform(1..=sides).unwrap()
    }

    #[test]
    fn two_dice() {
        let two = &die(6) + &die(6);
        assert_eq!(two.len(), 11);
        assert!((two.prob(&7).unwrap() - 6. / 36.).abs() < EPS);
        assert!((two.prob(&2).unwrap() - 1. / 36.).abs() < EPS);
        assert!((two.total() - 1.0).abs() < EPS);
        assert!((two.mean().unwrap() - 7.0).abs() < EPS);
    }

    #[test]
    fn three_dice() {
        let d = die(6);
        let three = convolve_all(vec![&d, &d, &d]).unwrap();
        assert!((three.mean().unwrap() - 10.5).abs() < EPS);
        assert_eq!(*three.hypotheses().next().unwrap(), 3);
        assert!(convolve_all(Vec::<&Pmf<i32>>::new()).is_err());
    }

    #[test]
    fn dice_box() {
        // A box with a 4-sided, a 6-sided and an 8-sided die, one drawn at random.
        let dice : Vec<Pmf<i32>> = vec![die(4), die(6), die(8)];
        let mix = mixture(dice.iter().map(|d| (d, 1. / 3.) )).unwrap();
        assert!((mix.total() - 1.0).abs() < EPS);
        let expected_one = (1. / 4. + 1. / 6. + 1. / 8.) / 3.;
        assert!((mix.prob(&1).unwrap() - expected_one).abs() < EPS);
        assert!((mix.prob(&8).unwrap() - 1. / 24.).abs() < EPS);
        assert!(mixture(dice.iter().map(|d| (d, -1.) )).is_err());
    }

    #[test]
    fn meta_pmf() {
        let meta = Pmf::from_items(vec![(4, 0.5), (6, 0.5)]).unwrap();
        let mix = mixture_of(&meta, |sides| Pmf::uniform(1..=*sides).ok() ).unwrap();
        assert!((mix.prob(&5).unwrap() - 0.5 / 6.).abs() < EPS);
        let missing = mixture_of(&meta, |sides : &i32| if *sides == 4 { Some(die(4)) } else { None } );
        assert_eq!(missing, Err(ProbError::MissingHypothesis("6".to_string())));
    }

}

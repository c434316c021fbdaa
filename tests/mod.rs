use thinkbayes::prob::*;

const EPS : f64 = 1E-9;

/* Likelihood of a train-spotting observation: the locomotive number observed
is uniform over 1..=n for a company with n locomotives. */
fn train_likelihood(observed : &u32, n : &u32) -> f64 {
    if observed > n { 0.0 } else { 1.0 / *n as f64 }
}

#[test]
fn uniform_suite_prior() {
    let suite = Suite::new(vec![1u32, 2, 3], train_likelihood).unwrap();
    for h in 1..=3 {
        assert!((suite.prob(&h).unwrap() - 1. / 3.).abs() < EPS);
    }
}

#[test]
fn normalization_is_idempotent() -> anyhow::Result<()> {
    let mut pmf = Pmf::from_items(vec![(1, 2.0), (2, 5.0), (4, 1.0)])?;
    assert!((pmf.normalize()? - 8.0).abs() < EPS);
    let once = pmf.clone();
    assert!((pmf.normalize()? - 1.0).abs() < EPS);
    for (h, p) in once.iter() {
        assert!((pmf.prob(h)? - p).abs() < EPS);
    }
    Ok(())
}

#[test]
fn beta_conjugate_update() -> anyhow::Result<()> {
    let mut beta = Beta::new(1., 1.)?;
    beta.update((3, 2))?;
    assert!((beta.alpha() - 4.).abs() < EPS);
    assert!((beta.beta() - 3.).abs() < EPS);
    assert!((beta.mean() - 4. / 7.).abs() < EPS);
    Ok(())
}

#[test]
fn order_statistic_via_cdf() -> anyhow::Result<()> {
    let cdf = Cdf::new(vec![0, 1], vec![0.5, 1.0])?;
    let max2 = cdf.max_of_k(2)?;
    assert_eq!(max2.values(), &[0, 1]);
    assert!((max2.probs()[0] - 0.25).abs() < EPS);
    assert!((max2.probs()[1] - 1.0).abs() < EPS);
    Ok(())
}

#[test]
fn max_of_k_agrees_with_enumeration() -> anyhow::Result<()> {
    // Best of three rolls of a six-sided die, enumerated exhaustively.
    let die = Pmf::uniform(1..=6)?;
    let mut best = Pmf::new();
    for a in 1..=6 {
        for b in 1..=6 {
            for c in 1..=6 {
                best.incr(*[a, b, c].iter().max().unwrap(), 1. / 216.)?;
            }
        }
    }
    let from_cdf = die.max_of_k(3)?.make_pmf()?;
    for (h, p) in best.iter() {
        assert!((from_cdf.prob(h)? - p).abs() < EPS);
    }
    Ok(())
}

#[test]
fn percentile_boundaries() -> anyhow::Result<()> {
    let pmf = Pmf::uniform(vec![1, 2, 3])?;
    assert_eq!(*pmf.percentile(0.)?, 1);
    assert_eq!(*pmf.percentile(100.)?, 3);
    let cdf = pmf.make_cdf();
    assert_eq!(*cdf.percentile(0.)?, 1);
    assert_eq!(*cdf.percentile(100.)?, 3);
    Ok(())
}

#[test]
fn degenerate_update_is_surfaced() {
    let mut suite = Suite::new(vec![1u32, 2, 3], |_ : &u32, _ : &u32| 0.0).unwrap();
    let prior = suite.pmf().clone();
    assert_eq!(suite.update(&1), Err(ProbError::DegenerateDistribution));
    assert_eq!(suite.pmf(), &prior);
}

#[test]
fn locomotive_problem() -> anyhow::Result<()> {
    // Seeing locomotive #60, with a uniform prior over companies of 1..=1000 locomotives.
    let mut suite = Suite::new(1..=1000u32, train_likelihood)?;
    suite.update(&60)?;
    assert!((suite.mean()? - 333.419_893_263_708).abs() < 1E-6);
    assert_eq!(*suite.maximum_a_posteriori()?, 60);

    let (low, high) = suite.credible_interval(90.)?;
    assert!(*low < 100 && *high > 800);

    // Three sightings at once, and the same sightings one at a time.
    let mut batch = Suite::new(1..=1000u32, train_likelihood)?;
    batch.update_set(&[60, 30, 90])?;
    let mut sequential = Suite::new(1..=1000u32, train_likelihood)?;
    for obs in &[60, 30, 90] {
        sequential.update(obs)?;
    }
    for (h, p) in batch.iter() {
        assert!((sequential.prob(h)? - p).abs() < EPS);
    }
    assert!(batch.mean()? < suite.mean()?);
    Ok(())
}

#[test]
fn update_set_survives_extreme_likelihoods() -> anyhow::Result<()> {
    let tiny = |_ : &u8, h : &u32| 1E-200 * f64::from(*h);
    let data = vec![0u8; 3];
    let mut batch = Suite::new(vec![1u32, 2], tiny)?;
    batch.update_set(&data)?;
    let mut sequential = Suite::new(vec![1u32, 2], tiny)?;
    for d in &data {
        sequential.update(d)?;
    }
    assert!((batch.prob(&2)? - 8. / 9.).abs() < EPS);
    assert!((sequential.prob(&2)? - 8. / 9.).abs() < EPS);

    let big = |_ : &u8, h : &u32| 1E200 * f64::from(*h);
    let mut batch = Suite::new(vec![1u32, 2], big)?;
    batch.update_set(&[0u8, 0])?;
    let mut sequential = Suite::new(vec![1u32, 2], big)?;
    for d in &[0u8, 0] {
        sequential.update(d)?;
    }
    assert!((batch.prob(&2)? - 0.8).abs() < EPS);
    assert!((sequential.prob(&2)? - 0.8).abs() < EPS);

    // A zero likelihood after the weights would have overflowed.
    let ruled_out = |d : &u8, h : &u32| if *d == 1 && *h == 1 { 0.0 } else { 1E200 * f64::from(*h) };
    let mut batch = Suite::new(vec![1u32, 2], ruled_out)?;
    batch.update_set(&[0u8, 0, 1])?;
    assert_eq!(batch.prob(&1)?, 0.0);
    assert!((batch.prob(&2)? - 1.0).abs() < EPS);
    Ok(())
}

#[test]
fn sum_and_mixture_of_dice() -> anyhow::Result<()> {
    let d6 = Pmf::uniform(1..=6)?;
    let d8 = Pmf::uniform(1..=8)?;
    let sum = &d6 + &d8;
    assert!((sum.mean()? - (d6.mean()? + d8.mean()?)).abs() < EPS);
    assert!((sum.prob(&14)? - 1. / 48.).abs() < EPS);

    let mix = mixture(vec![(&d6, 0.25), (&d8, 0.75)])?;
    assert!((mix.total() - 1.0).abs() < EPS);
    assert!((mix.prob(&7)? - 0.75 / 8.).abs() < EPS);
    Ok(())
}

use num_traits::Zero;
use std::ops::AddAssign;

/// Absolute tolerance used whenever two probabilities (or a cumulative probability and
/// its target) are compared. Also bounds how far a cumulative probability may exceed 1.0
/// before a CDF is considered malformed.
pub const PROB_TOLERANCE : f64 = 1E-9;

/* A weight is any finite, non-negative real. Probabilities are weights that
happen to sum to one; PMFs hold weights between normalizations. */
pub fn is_valid_weight(w : f64) -> bool {
    w.is_finite() && w >= 0.0
}

/// Compares two probabilities up to PROB_TOLERANCE.
pub fn approx_eq(a : f64, b : f64) -> bool {
    (a - b).abs() <= PROB_TOLERANCE
}

/// Iterator helpers over running (cumulative) quantities.
pub mod running {

    use super::*;
    use std::ops::Sub;

    pub fn cumulative_sum<T>(iter : impl Iterator<Item=T>) -> impl Iterator<Item=T>
    where
        T : AddAssign + Zero + Copy
    {
        iter.scan(
            T::zero(),
            |state : &mut T, it : T| {
                *state += it;
                Some(*state)
            }
        )
    }

    /* Inverse of cumulative_sum: the first element is kept as is, every
    subsequent element is the difference to its predecessor. */
    pub fn successive_differences<T>(iter : impl Iterator<Item=T>) -> impl Iterator<Item=T>
    where
        T : Sub<Output=T> + Zero + Copy
    {
        iter.scan(
            T::zero(),
            |prev : &mut T, it : T| {
                let diff = it - *prev;
                *prev = it;
                Some(diff)
            }
        )
    }

    /// Returns (mean, variance) of values weighted by probs, where the weights are
    /// assumed to sum to total (the variance is the population variance).
    pub fn weighted_mean_variance(items : impl Iterator<Item=(f64, f64)> + Clone, total : f64) -> (f64, f64) {
        let mean = items.clone().fold(0.0, |acc, (v, p)| acc + v * p ) / total;
        let var = items.fold(0.0, |acc, (v, p)| acc + p * (v - mean).powf(2.) ) / total;
        (mean, var)
    }

}

#[cfg(test)]
mod tests {

    use super::*;
    use super::running::*;

    #[test]
    fn cumulative_and_differences_are_inverse() {
        let v = vec![0.25, 0.5, 0.125, 0.125];
        let cumul : Vec<f64> = cumulative_sum(v.iter().cloned()).collect();
        assert!(approx_eq(cumul[3], 1.0));
        let back : Vec<f64> = successive_differences(cumul.iter().cloned()).collect();
        for (a, b) in v.iter().zip(back.iter()) {
            assert!(approx_eq(*a, *b));
        }
    }

    #[test]
    fn weights() {
        assert!(is_valid_weight(0.0));
        assert!(is_valid_weight(3.5));
        assert!(!is_valid_weight(-1E-12));
        assert!(!is_valid_weight(f64::NAN));
        assert!(!is_valid_weight(f64::INFINITY));
    }

    #[test]
    fn weighted_moments() {
        let items = vec![(1.0, 0.5), (3.0, 0.5)];
        let (m, v) = weighted_mean_variance(items.iter().cloned(), 1.0);
        assert!(approx_eq(m, 2.0));
        assert!(approx_eq(v, 1.0));
    }

}

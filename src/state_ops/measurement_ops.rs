#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::errors::{QuantumError, QuantumResult};
use crate::rayon_helper::iter;
use crate::utils::{get_bit, index_to_bitstring};
use crate::{Complex, Precision};
use num_traits::ToPrimitive;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use std::collections::BTreeMap;

/// Get total magnitude of state.
pub fn prob_magnitude<P: Precision>(input: &[Complex<P>]) -> P {
    iter!(input).map(Complex::<P>::norm_sqr).sum()
}

/// Born-rule probability of every basis index.
pub fn measure_probs<P: Precision>(input: &[Complex<P>]) -> Vec<P> {
    iter!(input).map(Complex::<P>::norm_sqr).collect()
}

/// Probability that qubit `q` reads `value`.
///
/// # Examples
/// ```
/// use qtoolkit::state_ops::matrix_ops::from_reals;
/// use qtoolkit::state_ops::measurement_ops::measure_prob;
///
/// // Index 0b01 has qubit 0 set and qubit 1 clear.
/// let input = from_reals(&[0.0, 1.0, 0.0, 0.0]);
///
/// assert_eq!(measure_prob(0, true, &input), 1.0);
/// assert_eq!(measure_prob(1, true, &input), 0.0);
/// assert_eq!(measure_prob(1, false, &input), 1.0);
/// ```
pub fn measure_prob<P: Precision>(q: usize, value: bool, input: &[Complex<P>]) -> P {
    iter!(input)
        .enumerate()
        .filter(|(i, _)| get_bit(*i, q) == value)
        .map(|(_, amp)| amp.norm_sqr())
        .sum()
}

/// Draw `shots` independent samples from `input` using `rng` and count them by bitstring.
///
/// No state collapse happens between shots. Character `k` of each key is the value of qubit
/// `k`, see [`index_to_bitstring`].
pub fn sample_shots<P, R>(
    n: usize,
    input: &[Complex<P>],
    shots: usize,
    rng: &mut R,
) -> QuantumResult<BTreeMap<String, usize>>
where
    P: Precision,
    R: Rng + ?Sized,
{
    let weights = input
        .iter()
        .map(|amp| amp.norm_sqr().to_f64().unwrap_or(0.0));
    let dist = WeightedIndex::new(weights)
        .map_err(|err| QuantumError::validation("state", format!("cannot sample: {}", err)))?;

    let mut tallies = vec![0usize; input.len()];
    for _ in 0..shots {
        tallies[dist.sample(rng)] += 1;
    }

    Ok(tallies
        .into_iter()
        .enumerate()
        .filter(|(_, count)| *count > 0)
        .map(|(index, count)| (index_to_bitstring(n, index), count))
        .collect())
}

//! In-place gate kernels over a little-endian amplitude buffer: bit `k` of an index is the
//! value of qubit `k`. Every kernel touches each amplitude at most once and never builds a
//! `2^n x 2^n` matrix.
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::rayon_helper::{chunks_mut, iter, iter_mut};
use crate::utils::get_bit;
use crate::{Complex, Precision};

/// Make a vector of complex numbers whose reals are given by `data`
pub fn from_reals<P: Precision>(data: &[P]) -> Vec<Complex<P>> {
    data.iter()
        .map(|x| Complex::<P> {
            re: *x,
            im: P::zero(),
        })
        .collect()
}

/// Make a vector of complex numbers whose reals are given by the first tuple entry in `data` and
/// whose imaginaries are from the second.
pub fn from_tuples<P: Precision>(data: &[(P, P)]) -> Vec<Complex<P>> {
    data.iter()
        .map(|x| -> Complex<P> {
            let (r, i) = x;
            Complex::<P> { re: *r, im: *i }
        })
        .collect()
}

/// Apply the row-major 2x2 matrix `mat` to qubit `q`.
///
/// Indices are split into blocks of `2^(q+1)`, the lower half of a block has qubit `q` cleared
/// and the upper half has it set, so pairs differing only in bit `q` sit at the same offset in
/// each half.
///
/// # Example
/// ```
/// use qtoolkit::state_ops::matrix_ops::{apply_single_qubit, from_reals};
///
/// // X on qubit 1 of |00> gives |10> (index 0b10).
/// let mut amps = from_reals(&[1.0, 0.0, 0.0, 0.0]);
/// let x = from_reals(&[0.0, 1.0, 1.0, 0.0]);
/// apply_single_qubit(1, &[x[0], x[1], x[2], x[3]], &mut amps);
/// assert_eq!(amps, from_reals(&[0.0, 0.0, 1.0, 0.0]));
/// ```
pub fn apply_single_qubit<P: Precision>(q: usize, mat: &[Complex<P>; 4], amps: &mut [Complex<P>]) {
    let stride = 1 << q;
    let [m00, m01, m10, m11] = *mat;
    chunks_mut!(amps, stride << 1).for_each(|block: &mut [Complex<P>]| {
        let (zeros, ones) = block.split_at_mut(stride);
        zeros.iter_mut().zip(ones.iter_mut()).for_each(|(a0, a1)| {
            let (v0, v1) = (*a0, *a1);
            *a0 = m00 * v0 + m01 * v1;
            *a1 = m10 * v0 + m11 * v1;
        });
    });
}

/// Controlled NOT: swaps each amplitude with bit `c` set with its partner across bit `t`.
pub fn apply_cnot<P: Precision>(c: usize, t: usize, amps: &mut [Complex<P>]) {
    let t_mask = 1 << t;
    (0..amps.len())
        .filter(|i| get_bit(*i, c) && !get_bit(*i, t))
        .for_each(|i| amps.swap(i, i | t_mask));
}

/// Controlled Z: negates each amplitude with both bit `c` and bit `t` set.
pub fn apply_cz<P: Precision>(c: usize, t: usize, amps: &mut [Complex<P>]) {
    iter_mut!(amps)
        .enumerate()
        .filter(|(i, _)| get_bit(*i, c) && get_bit(*i, t))
        .for_each(|(_, amp)| *amp = -*amp);
}

/// `exp(-i theta/2 Z⊗Z)`: amplitudes whose bits `a` and `b` agree pick up `e^{-i theta/2}`,
/// the rest pick up `e^{+i theta/2}`.
pub fn apply_rzz<P: Precision>(a: usize, b: usize, theta: P, amps: &mut [Complex<P>]) {
    let half = theta / (P::one() + P::one());
    let same = Complex::from_polar(P::one(), -half);
    let differ = Complex::from_polar(P::one(), half);
    iter_mut!(amps).enumerate().for_each(|(i, amp)| {
        let phase = if get_bit(i, a) == get_bit(i, b) {
            same
        } else {
            differ
        };
        *amp = *amp * phase;
    });
}

/// Project qubit `q` onto `|0>` and renormalize.
///
/// When the `|0>` branch carries no weight at all the qubit is exactly `|1>`, in which case the
/// `|1>` branch is moved onto `|0>` instead so the state stays normalized.
pub fn apply_reset<P: Precision>(q: usize, amps: &mut [Complex<P>]) {
    let stride = 1 << q;
    let retained: P = iter!(amps)
        .enumerate()
        .filter(|(i, _)| !get_bit(*i, q))
        .map(|(_, amp)| amp.norm_sqr())
        .sum();

    if retained > P::epsilon() {
        let scale = P::one() / retained.sqrt();
        chunks_mut!(amps, stride << 1).for_each(|block: &mut [Complex<P>]| {
            let (zeros, ones) = block.split_at_mut(stride);
            zeros.iter_mut().for_each(|a| *a = *a * scale);
            ones.iter_mut().for_each(|a| *a = Complex::default());
        });
    } else {
        chunks_mut!(amps, stride << 1).for_each(|block: &mut [Complex<P>]| {
            let (zeros, ones) = block.split_at_mut(stride);
            zeros.iter_mut().zip(ones.iter_mut()).for_each(|(a0, a1)| {
                *a0 = *a1;
                *a1 = Complex::default();
            });
        });
    }
}

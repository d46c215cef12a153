use crate::circuit::Circuit;
use crate::errors::{QuantumError, QuantumResult};
use crate::gates::Gate;
use crate::state_ops::matrix_ops::{apply_cnot, apply_cz, apply_reset, apply_rzz, apply_single_qubit};
use crate::state_ops::measurement_ops::{measure_prob, measure_probs, prob_magnitude, sample_shots};
use crate::types::{Precision, Representation};
use crate::utils::reorder_index;
use crate::Complex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use tracing::trace;

/// Tolerance on the total probability of a state.
pub const NORM_TOLERANCE: f64 = 1e-9;

/// Largest register a dense state vector is built for.
pub const MAX_STATE_QUBITS: usize = usize::BITS as usize / 2;

/// A quantum register state. Only dense state vectors exist today.
///
/// Applying a gate consumes the state and returns the next one, so the amplitude buffer is
/// updated in place without any two handles ever sharing it.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum QuantumState<P: Precision = f64> {
    /// `2^n` amplitudes indexed little-endian: bit `k` of the index is qubit `k`.
    StateVector(StateVector<P>),
}

/// Dense amplitude buffer for `n` qubits.
#[derive(Debug, Clone, PartialEq)]
pub struct StateVector<P: Precision = f64> {
    n: usize,
    amplitudes: Vec<Complex<P>>,
}

impl<P: Precision> StateVector<P> {
    /// Number of qubits.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Amplitudes in little-endian index order.
    pub fn amplitudes(&self) -> &[Complex<P>] {
        &self.amplitudes
    }
}

impl<P: Precision> QuantumState<P> {
    /// The all-zero basis state `|0...0>` on `n` qubits.
    ///
    /// # Panics
    /// Panics if `2^n` does not fit in a `usize`.
    pub fn zero(n: usize) -> Self {
        let mut amplitudes = vec![Complex::default(); 1 << n];
        amplitudes[0] = Complex::new(P::one(), P::zero());
        QuantumState::StateVector(StateVector { n, amplitudes })
    }

    /// Wrap existing little-endian amplitudes, checking the length is `2^n` and the state is
    /// normalized.
    pub fn from_amplitudes(n: usize, amplitudes: Vec<Complex<P>>) -> QuantumResult<Self> {
        let expected = u32::try_from(n).ok().and_then(|n| 1usize.checked_shl(n));
        if expected != Some(amplitudes.len()) {
            return Err(QuantumError::validation(
                "amplitudes",
                format!(
                    "expected 2^{} amplitudes but found {}",
                    n,
                    amplitudes.len()
                ),
            ));
        }
        let norm = prob_magnitude(&amplitudes).to_f64().unwrap_or(f64::NAN);
        if !((norm - 1.0).abs() <= NORM_TOLERANCE) {
            return Err(QuantumError::validation(
                "amplitudes",
                format!("state is not normalized, total probability is {}", norm),
            ));
        }
        Ok(QuantumState::StateVector(StateVector { n, amplitudes }))
    }

    /// Number of qubits.
    pub fn n(&self) -> usize {
        match self {
            QuantumState::StateVector(sv) => sv.n,
        }
    }

    /// Amplitudes in little-endian index order.
    pub fn amplitudes(&self) -> &[Complex<P>] {
        match self {
            QuantumState::StateVector(sv) => &sv.amplitudes,
        }
    }

    /// Amplitudes reordered so that qubit 0 is the least (`LittleEndian`) or most (`BigEndian`)
    /// significant index bit.
    pub fn into_amplitudes(self, order: Representation) -> Vec<Complex<P>> {
        match self {
            QuantumState::StateVector(sv) => match order {
                Representation::LittleEndian => sv.amplitudes,
                Representation::BigEndian => {
                    let n = sv.n;
                    let mut out = vec![Complex::default(); sv.amplitudes.len()];
                    sv.amplitudes
                        .into_iter()
                        .enumerate()
                        .for_each(|(i, amp)| out[reorder_index(n, i, order)] = amp);
                    out
                }
            },
        }
    }

    /// Born-rule probability of each basis index.
    pub fn probabilities(&self) -> Vec<P> {
        measure_probs(self.amplitudes())
    }

    /// Probability that qubit `q` reads `value`.
    pub fn probability_of_qubit(&self, q: usize, value: bool) -> P {
        measure_prob(q, value, self.amplitudes())
    }

    /// Sum of squared magnitudes, 1 for any valid state.
    pub fn norm_sqr(&self) -> P {
        prob_magnitude(self.amplitudes())
    }

    /// Apply one gate, consuming the state.
    pub fn apply(self, gate: &Gate) -> QuantumResult<Self> {
        apply_operation(gate, self)
    }

    fn amplitudes_mut(&mut self) -> &mut [Complex<P>] {
        match self {
            QuantumState::StateVector(sv) => &mut sv.amplitudes,
        }
    }
}

/// The all-zero basis state on `n` qubits, with amplitude 1 at index 0.
///
/// Registers wider than [`MAX_STATE_QUBITS`] are rejected rather than allocated.
pub fn initialize_state<P: Precision>(n: usize) -> QuantumResult<QuantumState<P>> {
    if n > MAX_STATE_QUBITS {
        return Err(QuantumError::validation(
            "qubits",
            format!(
                "{} qubits exceeds the state vector limit of {} qubits",
                n, MAX_STATE_QUBITS
            ),
        ));
    }
    Ok(QuantumState::zero(n))
}

/// Apply `gate` to `state`, returning the new state.
///
/// `Barrier` and `Measure` leave the state untouched, measurement outcomes come from
/// [`sample_state`]. Gates referencing qubits outside the state, or two-qubit gates with a
/// repeated operand, are rejected.
pub fn apply_operation<P: Precision>(
    gate: &Gate,
    mut state: QuantumState<P>,
) -> QuantumResult<QuantumState<P>> {
    check_operands(gate, state.n())?;
    trace!(%gate, "applying gate");
    let amps = state.amplitudes_mut();
    match gate {
        Gate::Cnot(c, t) => apply_cnot(*c, *t, amps),
        Gate::Cz(c, t) => apply_cz(*c, *t, amps),
        Gate::Rzz(a, b, theta) => apply_rzz(*a, *b, to_precision(*theta)?, amps),
        Gate::Reset(q) => apply_reset(*q, amps),
        Gate::Barrier(_) | Gate::Measure(_) => {}
        single => {
            let q = single.qubits()[0];
            let mat = single
                .matrix_1q::<P>()
                .ok_or_else(|| QuantumError::NotImplemented(format!("no kernel for {}", single)))?;
            apply_single_qubit(q, &mat, amps);
        }
    }
    Ok(state)
}

/// Run every gate of `circuit` from `|0...0>`. Measurements do not collapse the returned state.
pub fn execute_to_state<P: Precision>(circuit: &Circuit) -> QuantumResult<QuantumState<P>> {
    circuit.validate().into_result()?;
    circuit
        .gates()
        .iter()
        .try_fold(initialize_state(circuit.n())?, |state, gate| {
            apply_operation(gate, state)
        })
}

/// Sample `shots` measurements of every qubit. A `seed` makes the histogram reproducible,
/// without one a fresh entropy source is used.
pub fn sample_state<P: Precision>(
    state: &QuantumState<P>,
    shots: usize,
    seed: Option<u64>,
) -> QuantumResult<BTreeMap<String, usize>> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    sample_state_with_rng(state, shots, &mut rng)
}

/// Like [`sample_state`], drawing randomness from a caller-held generator.
pub fn sample_state_with_rng<P, R>(
    state: &QuantumState<P>,
    shots: usize,
    rng: &mut R,
) -> QuantumResult<BTreeMap<String, usize>>
where
    P: Precision,
    R: Rng + ?Sized,
{
    sample_shots(state.n(), state.amplitudes(), shots, rng)
}

fn check_operands(gate: &Gate, n: usize) -> QuantumResult<()> {
    let qubits = gate.qubits();
    if let Some(q) = qubits.iter().find(|q| **q >= n) {
        return Err(QuantumError::validation(
            "qubit",
            format!("{} references qubit {} of a {}-qubit state", gate, q, n),
        ));
    }
    match gate {
        Gate::Cnot(a, b) | Gate::Cz(a, b) | Gate::Rzz(a, b, _) if a == b => Err(
            QuantumError::validation("qubit", format!("{} repeats qubit {}", gate, a)),
        ),
        _ => Ok(()),
    }
}

fn to_precision<P: Precision>(theta: f64) -> QuantumResult<P> {
    P::from(theta).ok_or_else(|| {
        QuantumError::validation("angle", format!("{} is not representable", theta))
    })
}

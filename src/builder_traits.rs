//! Chainable gate constructors.
//!
//! ```
//! use qtoolkit::prelude::*;
//!
//! let c = Circuit::new(2).h(0).cnot(0, 1).rz_pi_by(1, 4)?.measure_all();
//! assert_eq!(c.len(), 5);
//! # Ok::<(), QuantumError>(())
//! ```
use crate::circuit::Circuit;
use crate::errors::{QuantumError, QuantumResult};
use crate::gates::Gate;
use crate::types::QubitIndex;
use num_rational::Rational64;
use num_traits::ToPrimitive;
use std::f64::consts::PI;

/// Anything gates can be appended to.
pub trait CircuitBuilder: Sized {
    /// Append `gate`.
    fn apply_gate(self, gate: Gate) -> Self;
}

/// The Clifford+T gate set along with the two-qubit entanglers.
pub trait CliffordTBuilder: CircuitBuilder {
    /// Pauli X.
    fn x(self, q: QubitIndex) -> Self {
        self.apply_gate(Gate::X(q))
    }
    /// Alias for [`CliffordTBuilder::x`].
    fn not(self, q: QubitIndex) -> Self {
        self.x(q)
    }
    /// Pauli Y.
    fn y(self, q: QubitIndex) -> Self {
        self.apply_gate(Gate::Y(q))
    }
    /// Pauli Z.
    fn z(self, q: QubitIndex) -> Self {
        self.apply_gate(Gate::Z(q))
    }
    /// Hadamard.
    fn h(self, q: QubitIndex) -> Self {
        self.apply_gate(Gate::H(q))
    }
    /// Phase gate.
    fn s(self, q: QubitIndex) -> Self {
        self.apply_gate(Gate::S(q))
    }
    /// Inverse phase gate.
    fn s_dagger(self, q: QubitIndex) -> Self {
        self.apply_gate(Gate::Sdg(q))
    }
    /// pi/8 gate.
    fn t(self, q: QubitIndex) -> Self {
        self.apply_gate(Gate::T(q))
    }
    /// Inverse pi/8 gate.
    fn t_dagger(self, q: QubitIndex) -> Self {
        self.apply_gate(Gate::Tdg(q))
    }
    /// Controlled NOT.
    fn cnot(self, control: QubitIndex, target: QubitIndex) -> Self {
        self.apply_gate(Gate::Cnot(control, target))
    }
    /// Controlled Z.
    fn cz(self, control: QubitIndex, target: QubitIndex) -> Self {
        self.apply_gate(Gate::Cz(control, target))
    }
    /// Swap two qubits, as three CNOTs.
    fn swap(self, a: QubitIndex, b: QubitIndex) -> Self {
        self.cnot(a, b).cnot(b, a).cnot(a, b)
    }
    /// Ordering marker across `qubits`.
    fn barrier<It>(self, qubits: It) -> Self
    where
        It: IntoIterator<Item = QubitIndex>,
    {
        self.apply_gate(Gate::barrier(qubits))
    }
}

/// Rotations, with angles in radians or as rational multiples of pi.
pub trait RotationsBuilder: CliffordTBuilder {
    /// Rotation about X.
    fn rx(self, q: QubitIndex, theta: f64) -> Self {
        self.apply_gate(Gate::Rx(q, theta))
    }
    /// Rotation about Y.
    fn ry(self, q: QubitIndex, theta: f64) -> Self {
        self.apply_gate(Gate::Ry(q, theta))
    }
    /// Rotation about Z.
    fn rz(self, q: QubitIndex, theta: f64) -> Self {
        self.apply_gate(Gate::Rz(q, theta))
    }
    /// `exp(-i theta/2 Z⊗Z)`.
    fn rzz(self, a: QubitIndex, b: QubitIndex, theta: f64) -> Self {
        self.apply_gate(Gate::Rzz(a, b, theta))
    }
    /// Rotation about X by `ratio * pi`.
    fn rx_ratio(self, q: QubitIndex, ratio: Rational64) -> QuantumResult<Self> {
        Ok(self.rx(q, ratio_to_angle(ratio)?))
    }
    /// Rotation about Y by `ratio * pi`.
    fn ry_ratio(self, q: QubitIndex, ratio: Rational64) -> QuantumResult<Self> {
        Ok(self.ry(q, ratio_to_angle(ratio)?))
    }
    /// Rotation about Z by `ratio * pi`.
    fn rz_ratio(self, q: QubitIndex, ratio: Rational64) -> QuantumResult<Self> {
        Ok(self.rz(q, ratio_to_angle(ratio)?))
    }
    /// Rotation about X by `pi / m`.
    fn rx_pi_by(self, q: QubitIndex, m: i64) -> QuantumResult<Self> {
        self.rx_ratio(q, pi_fraction(m)?)
    }
    /// Rotation about Y by `pi / m`.
    fn ry_pi_by(self, q: QubitIndex, m: i64) -> QuantumResult<Self> {
        self.ry_ratio(q, pi_fraction(m)?)
    }
    /// Rotation about Z by `pi / m`.
    fn rz_pi_by(self, q: QubitIndex, m: i64) -> QuantumResult<Self> {
        self.rz_ratio(q, pi_fraction(m)?)
    }
}

/// Measurement and reset.
pub trait MeasurementBuilder: CircuitBuilder {
    /// Measure one qubit.
    fn measure(self, q: QubitIndex) -> Self {
        self.apply_gate(Gate::Measure(q))
    }
    /// Project a qubit back to `|0>`.
    fn reset(self, q: QubitIndex) -> Self {
        self.apply_gate(Gate::Reset(q))
    }
    /// Measure every qubit, in index order.
    fn measure_all(self) -> Self;
}

fn pi_fraction(m: i64) -> QuantumResult<Rational64> {
    if m == 0 {
        return Err(QuantumError::validation("angle", "cannot rotate by pi/0"));
    }
    Ok(Rational64::new(1, m))
}

fn ratio_to_angle(ratio: Rational64) -> QuantumResult<f64> {
    ratio
        .to_f64()
        .map(|r| r * PI)
        .ok_or_else(|| QuantumError::validation("angle", format!("{} has no f64 value", ratio)))
}

impl CircuitBuilder for Circuit {
    fn apply_gate(self, gate: Gate) -> Self {
        self.add_gate(gate)
    }
}

impl CliffordTBuilder for Circuit {}

impl RotationsBuilder for Circuit {}

impl MeasurementBuilder for Circuit {
    fn measure_all(self) -> Self {
        let n = self.n();
        self.add_gates((0..n).map(Gate::Measure))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_chain_matches_explicit_gates() {
        let built = Circuit::new(2)
            .h(0)
            .cnot(0, 1)
            .s_dagger(1)
            .t_dagger(0)
            .rzz(0, 1, 0.5)
            .barrier([0, 1])
            .reset(1)
            .measure(0);
        let explicit = Circuit::empty(2).add_gates([
            Gate::H(0),
            Gate::Cnot(0, 1),
            Gate::Sdg(1),
            Gate::Tdg(0),
            Gate::Rzz(0, 1, 0.5),
            Gate::barrier([0, 1]),
            Gate::Reset(1),
            Gate::Measure(0),
        ]);
        assert_eq!(built, explicit);
    }

    #[test]
    fn test_ratio_rotations() {
        let c = Circuit::new(1)
            .rz_pi_by(0, 4)
            .and_then(|c| c.rx_ratio(0, Rational64::new(-3, 2)))
            .unwrap();
        match c.gates() {
            [Gate::Rz(0, a), Gate::Rx(0, b)] => {
                assert_abs_diff_eq!(*a, PI / 4.0);
                assert_abs_diff_eq!(*b, -1.5 * PI);
            }
            gates => panic!("unexpected gates {:?}", gates),
        }
    }

    #[test]
    fn test_pi_by_zero_is_rejected() {
        assert!(matches!(
            Circuit::new(1).ry_pi_by(0, 0),
            Err(QuantumError::ValidationError { .. })
        ));
    }

    #[test]
    fn test_swap_and_measure_all() {
        let c = Circuit::new(3).x(0).swap(0, 2).measure_all();
        assert_eq!(c.count_ops().get("cx"), Some(&3));
        assert_eq!(&c.gates()[4..], &[Gate::Measure(0), Gate::Measure(1), Gate::Measure(2)]);
    }
}

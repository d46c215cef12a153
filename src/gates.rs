use crate::types::{Precision, QubitIndex};
use crate::Complex;
use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};
use std::fmt;

/// Qubit operands of a gate. Only barriers ever spill to the heap.
pub type GateQubits = SmallVec<[QubitIndex; 2]>;

/// A single operation in a circuit.
///
/// Gates are plain values and compare structurally, rotation angles are in radians.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Gate {
    /// Pauli X.
    X(QubitIndex),
    /// Pauli Y.
    Y(QubitIndex),
    /// Pauli Z.
    Z(QubitIndex),
    /// Hadamard.
    H(QubitIndex),
    /// Phase gate, `diag(1, i)`.
    S(QubitIndex),
    /// Inverse phase gate, `diag(1, -i)`.
    Sdg(QubitIndex),
    /// pi/8 gate, `diag(1, e^{i pi/4})`.
    T(QubitIndex),
    /// Inverse pi/8 gate.
    Tdg(QubitIndex),
    /// Rotation about X by an angle.
    Rx(QubitIndex, f64),
    /// Rotation about Y by an angle.
    Ry(QubitIndex, f64),
    /// Rotation about Z by an angle.
    Rz(QubitIndex, f64),
    /// Controlled NOT, `(control, target)`.
    Cnot(QubitIndex, QubitIndex),
    /// Controlled Z, `(control, target)`.
    Cz(QubitIndex, QubitIndex),
    /// `exp(-i theta/2 Z⊗Z)` on two qubits.
    Rzz(QubitIndex, QubitIndex, f64),
    /// Projects a qubit back to `|0>`.
    Reset(QubitIndex),
    /// Ordering marker across a set of qubits.
    Barrier(GateQubits),
    /// Computational basis measurement of one qubit.
    Measure(QubitIndex),
}

impl Gate {
    /// Make a barrier across `qubits`, in the given order.
    pub fn barrier<It>(qubits: It) -> Self
    where
        It: IntoIterator<Item = QubitIndex>,
    {
        Gate::Barrier(qubits.into_iter().collect())
    }

    /// Qubits this gate acts on, in operand order.
    pub fn qubits(&self) -> GateQubits {
        match self {
            Gate::X(q)
            | Gate::Y(q)
            | Gate::Z(q)
            | Gate::H(q)
            | Gate::S(q)
            | Gate::Sdg(q)
            | Gate::T(q)
            | Gate::Tdg(q)
            | Gate::Rx(q, _)
            | Gate::Ry(q, _)
            | Gate::Rz(q, _)
            | Gate::Reset(q)
            | Gate::Measure(q) => smallvec![*q],
            Gate::Cnot(a, b) | Gate::Cz(a, b) | Gate::Rzz(a, b, _) => smallvec![*a, *b],
            Gate::Barrier(qs) => qs.clone(),
        }
    }

    /// The OpenQASM mnemonic for this gate.
    pub fn name(&self) -> &'static str {
        match self {
            Gate::X(_) => "x",
            Gate::Y(_) => "y",
            Gate::Z(_) => "z",
            Gate::H(_) => "h",
            Gate::S(_) => "s",
            Gate::Sdg(_) => "sdg",
            Gate::T(_) => "t",
            Gate::Tdg(_) => "tdg",
            Gate::Rx(_, _) => "rx",
            Gate::Ry(_, _) => "ry",
            Gate::Rz(_, _) => "rz",
            Gate::Cnot(_, _) => "cx",
            Gate::Cz(_, _) => "cz",
            Gate::Rzz(_, _, _) => "rzz",
            Gate::Reset(_) => "reset",
            Gate::Barrier(_) => "barrier",
            Gate::Measure(_) => "measure",
        }
    }

    /// Rotation angle, for parametrized gates.
    pub fn angle(&self) -> Option<f64> {
        match self {
            Gate::Rx(_, theta) | Gate::Ry(_, theta) | Gate::Rz(_, theta) => Some(*theta),
            Gate::Rzz(_, _, theta) => Some(*theta),
            _ => None,
        }
    }

    /// The gate used in place of this one when a circuit is reversed.
    ///
    /// S and T swap with their adjoints. Every other gate, including rotations, `Reset` and
    /// `Barrier`, is returned unchanged.
    pub fn inverse(&self) -> Gate {
        match self {
            Gate::S(q) => Gate::Sdg(*q),
            Gate::Sdg(q) => Gate::S(*q),
            Gate::T(q) => Gate::Tdg(*q),
            Gate::Tdg(q) => Gate::T(*q),
            g => g.clone(),
        }
    }

    /// Row-major 2x2 matrix for single-qubit unitaries, `None` for anything else.
    ///
    /// Rotations follow `R_a(theta) = exp(-i theta/2 a)`.
    pub fn matrix_1q<P: Precision>(&self) -> Option<[Complex<P>; 4]> {
        let zero = Complex::new(P::zero(), P::zero());
        let one = Complex::new(P::one(), P::zero());
        let i = Complex::new(P::zero(), P::one());
        let two = P::one() + P::one();
        let mat = match self {
            Gate::X(_) => [zero, one, one, zero],
            Gate::Y(_) => [zero, -i, i, zero],
            Gate::Z(_) => [one, zero, zero, -one],
            Gate::H(_) => {
                let h = Complex::new(P::one() / two.sqrt(), P::zero());
                [h, h, h, -h]
            }
            Gate::S(_) => [one, zero, zero, i],
            Gate::Sdg(_) => [one, zero, zero, -i],
            Gate::T(_) => [one, zero, zero, Complex::from_polar(P::one(), quarter_pi())],
            Gate::Tdg(_) => [one, zero, zero, Complex::from_polar(P::one(), -quarter_pi::<P>())],
            Gate::Rx(_, theta) => {
                let (c, s) = half_angle::<P>(*theta);
                let c = Complex::new(c, P::zero());
                let mis = Complex::new(P::zero(), -s);
                [c, mis, mis, c]
            }
            Gate::Ry(_, theta) => {
                let (c, s) = half_angle::<P>(*theta);
                let c = Complex::new(c, P::zero());
                let s = Complex::new(s, P::zero());
                [c, -s, s, c]
            }
            Gate::Rz(_, theta) => {
                let half = to_precision::<P>(*theta) / two;
                [
                    Complex::from_polar(P::one(), -half),
                    zero,
                    zero,
                    Complex::from_polar(P::one(), half),
                ]
            }
            _ => return None,
        };
        Some(mat)
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())?;
        if let Some(theta) = self.angle() {
            write!(f, "({})", theta)?;
        }
        let qubits = self
            .qubits()
            .iter()
            .map(|q| q.to_string())
            .collect::<Vec<_>>()
            .join(",");
        write!(f, " {}", qubits)
    }
}

fn to_precision<P: Precision>(theta: f64) -> P {
    P::from(theta).unwrap_or_else(P::nan)
}

fn quarter_pi<P: Precision>() -> P {
    to_precision(std::f64::consts::FRAC_PI_4)
}

fn half_angle<P: Precision>(theta: f64) -> (P, P) {
    let half = to_precision::<P>(theta) / (P::one() + P::one());
    (half.cos(), half.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn mul(a: &[Complex<f64>; 4], b: &[Complex<f64>; 4]) -> [Complex<f64>; 4] {
        [
            a[0] * b[0] + a[1] * b[2],
            a[0] * b[1] + a[1] * b[3],
            a[2] * b[0] + a[3] * b[2],
            a[2] * b[1] + a[3] * b[3],
        ]
    }

    fn assert_identity(m: &[Complex<f64>; 4]) {
        let expected = [1.0, 0.0, 0.0, 1.0];
        for (c, e) in m.iter().zip(expected) {
            assert_abs_diff_eq!(c.re, e, epsilon = 1e-12);
            assert_abs_diff_eq!(c.im, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_inverse_pairs_multiply_to_identity() {
        let gates = [
            Gate::X(0),
            Gate::Y(0),
            Gate::Z(0),
            Gate::H(0),
            Gate::S(0),
            Gate::Sdg(0),
            Gate::T(0),
            Gate::Tdg(0),
        ];
        for g in &gates {
            let a = g.matrix_1q::<f64>().unwrap();
            let b = g.inverse().matrix_1q::<f64>().unwrap();
            assert_identity(&mul(&a, &b));
        }
    }

    #[test]
    fn test_opposite_rotations_cancel() {
        let rotations: [fn(QubitIndex, f64) -> Gate; 3] = [Gate::Rx, Gate::Ry, Gate::Rz];
        for make in rotations {
            let a = make(0, 0.7).matrix_1q::<f64>().unwrap();
            let b = make(0, -0.7).matrix_1q::<f64>().unwrap();
            assert_identity(&mul(&a, &b));
        }
    }

    #[test]
    fn test_t_squared_is_s() {
        let t = Gate::T(0).matrix_1q::<f64>().unwrap();
        let s = Gate::S(0).matrix_1q::<f64>().unwrap();
        let tt = mul(&t, &t);
        for (a, b) in tt.iter().zip(s.iter()) {
            assert_abs_diff_eq!(a.re, b.re, epsilon = 1e-12);
            assert_abs_diff_eq!(a.im, b.im, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_qubits_and_names() {
        assert_eq!(Gate::Cnot(2, 0).qubits().as_slice(), &[2, 0]);
        assert_eq!(Gate::barrier([0, 1, 2]).qubits().as_slice(), &[0, 1, 2]);
        assert_eq!(Gate::Cnot(2, 0).name(), "cx");
        assert_eq!(Gate::Rzz(0, 1, 0.5).to_string(), "rzz(0.5) 0,1");
        assert!(Gate::Cnot(0, 1).matrix_1q::<f64>().is_none());
    }

    #[test]
    fn test_reset_and_barrier_pass_through_inverse() {
        assert_eq!(Gate::Reset(1).inverse(), Gate::Reset(1));
        assert_eq!(Gate::barrier([1, 0]).inverse(), Gate::barrier([1, 0]));
        assert_eq!(Gate::Rx(0, 0.3).inverse(), Gate::Rx(0, 0.3));
    }
}

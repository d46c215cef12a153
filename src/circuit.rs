use crate::errors::{QuantumError, QuantumResult};
use crate::gates::Gate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// A fixed-width register and the ordered gates applied to it.
///
/// Circuits are built by appending, construction never checks qubit bounds. Call
/// [`Circuit::validate`] before running anything built from untrusted input.
///
/// # Example
/// ```
/// use qtoolkit::prelude::*;
///
/// let c = Circuit::empty(2)
///     .add_gate(Gate::H(0))
///     .add_gate(Gate::Cnot(0, 1));
/// assert_eq!(c.n(), 2);
/// assert_eq!(c.gates(), &[Gate::H(0), Gate::Cnot(0, 1)]);
/// assert!(c.validate().is_valid);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    n: usize,
    gates: Vec<Gate>,
}

/// Outcome of [`Circuit::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// True when no violation was found.
    pub is_valid: bool,
    /// One message per violation, in gate order.
    pub messages: Vec<String>,
}

impl ValidationReport {
    /// Turn an invalid report into `QuantumError::InvalidCircuit`.
    pub fn into_result(self) -> QuantumResult<()> {
        if self.is_valid {
            Ok(())
        } else {
            Err(QuantumError::InvalidCircuit(self.messages))
        }
    }
}

impl Circuit {
    /// A circuit over `n` qubits with no gates.
    pub fn empty(n: usize) -> Self {
        Self { n, gates: vec![] }
    }

    /// Same as [`Circuit::empty`].
    pub fn new(n: usize) -> Self {
        Self::empty(n)
    }

    /// Build a circuit from an existing gate list.
    pub fn from_gates<It>(n: usize, gates: It) -> Self
    where
        It: IntoIterator<Item = Gate>,
    {
        Self::empty(n).add_gates(gates)
    }

    /// Number of qubits.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Gates in program order.
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Number of gates.
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    /// True if there are no gates.
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Append a gate.
    pub fn add_gate(mut self, gate: Gate) -> Self {
        self.gates.push(gate);
        self
    }

    /// Append gates in order.
    pub fn add_gates<It>(mut self, gates: It) -> Self
    where
        It: IntoIterator<Item = Gate>,
    {
        self.gates.extend(gates);
        self
    }

    /// Concatenate `other` after `self`. The result is as wide as the wider of the two.
    pub fn compose(&self, other: &Circuit) -> Circuit {
        Circuit {
            n: self.n.max(other.n),
            gates: self.gates.iter().chain(other.gates.iter()).cloned().collect(),
        }
    }

    /// Check every gate, collecting all violations rather than stopping at the first.
    pub fn validate(&self) -> ValidationReport {
        let messages = self
            .gates
            .iter()
            .enumerate()
            .flat_map(|(i, gate)| gate_violations(self.n, i, gate))
            .collect::<Vec<_>>();
        if !messages.is_empty() {
            debug!(violations = messages.len(), "circuit failed validation");
        }
        ValidationReport {
            is_valid: messages.is_empty(),
            messages,
        }
    }

    /// One peephole pass over adjacent gates.
    ///
    /// Identical adjacent `H`, `X`, `Y` or `Z` gates on one qubit cancel, adjacent rotations of
    /// the same axis on one qubit merge into a single rotation by the summed angle. Each gate is
    /// compared against the last gate kept so far, so a chain of rotations merges fully.
    pub fn optimize(&self) -> Circuit {
        let mut out: Vec<Gate> = Vec::with_capacity(self.gates.len());
        for gate in &self.gates {
            match out.last().and_then(|prev| combine(prev, gate)) {
                Some(Combined::Cancel) => {
                    out.pop();
                }
                Some(Combined::Fused(g)) => {
                    if let Some(last) = out.last_mut() {
                        *last = g;
                    }
                }
                None => out.push(gate.clone()),
            }
        }
        Circuit {
            n: self.n,
            gates: out,
        }
    }

    /// Reverse the gate order, replacing S/T with their adjoints.
    pub fn reverse(&self) -> Circuit {
        Circuit {
            n: self.n,
            gates: self.gates.iter().rev().map(Gate::inverse).collect(),
        }
    }

    /// Number of layers when gates on disjoint qubits run in parallel. Barriers align their
    /// qubits without adding a layer.
    pub fn depth(&self) -> usize {
        let mut levels = vec![0usize; self.n];
        let level_of = |levels: &[usize], q: usize| levels.get(q).copied().unwrap_or(0);
        for gate in &self.gates {
            let qubits = gate.qubits();
            let start = qubits.iter().map(|q| level_of(&levels, *q)).max().unwrap_or(0);
            let end = match gate {
                Gate::Barrier(_) => start,
                _ => start + 1,
            };
            qubits.iter().filter(|q| **q < self.n).for_each(|q| levels[*q] = end);
        }
        levels.into_iter().max().unwrap_or(0)
    }

    /// Number of gates of each kind, keyed by mnemonic.
    pub fn count_ops(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for gate in &self.gates {
            *counts.entry(gate.name()).or_insert(0) += 1;
        }
        counts
    }
}

fn gate_violations(n: usize, i: usize, gate: &Gate) -> Vec<String> {
    let mut messages = vec![];
    let qubits = gate.qubits();
    qubits.iter().filter(|q| **q >= n).for_each(|q| {
        messages.push(format!(
            "gate {} ({}): qubit {} is out of range for a {}-qubit circuit",
            i,
            gate.name(),
            q,
            n
        ))
    });
    match gate {
        Gate::Cnot(a, b) | Gate::Cz(a, b) | Gate::Rzz(a, b, _) if a == b => {
            messages.push(format!(
                "gate {} ({}): both operands are qubit {}, they must differ",
                i,
                gate.name(),
                a
            ));
        }
        Gate::Barrier(qs) if qs.is_empty() => {
            messages.push(format!("gate {} (barrier): barrier has no qubits", i));
        }
        Gate::Barrier(qs) => {
            let mut seen = HashSet::new();
            let mut reported = HashSet::new();
            qs.iter()
                .filter(|q| !seen.insert(**q) && reported.insert(**q))
                .for_each(|q| {
                    messages.push(format!(
                        "gate {} (barrier): qubit {} appears more than once",
                        i, q
                    ))
                });
        }
        _ => {}
    }
    messages
}

enum Combined {
    Cancel,
    Fused(Gate),
}

fn combine(prev: &Gate, next: &Gate) -> Option<Combined> {
    match (prev, next) {
        (Gate::H(a), Gate::H(b))
        | (Gate::X(a), Gate::X(b))
        | (Gate::Y(a), Gate::Y(b))
        | (Gate::Z(a), Gate::Z(b))
            if a == b =>
        {
            Some(Combined::Cancel)
        }
        (Gate::Rx(a, s), Gate::Rx(b, t)) if a == b => Some(Combined::Fused(Gate::Rx(*a, s + t))),
        (Gate::Ry(a, s), Gate::Ry(b, t)) if a == b => Some(Combined::Fused(Gate::Ry(*a, s + t))),
        (Gate::Rz(a, s), Gate::Rz(b, t)) if a == b => Some(Combined::Fused(Gate::Rz(*a, s + t))),
        _ => None,
    }
}

//! Execution targets behind one interface.
//!
//! [`LocalBackend`] simulates circuits on the state-vector engine. The remote stubs
//! ([`AzureBackend`], [`QuantinuumBackend`], [`IonQBackend`]) expose the same interface and the
//! translation from provider error codes to [`QuantumError`](crate::errors::QuantumError), but
//! do not submit jobs.

use crate::circuit::Circuit;
use crate::errors::QuantumResult;
use crate::gates::Gate;
use crate::state::QuantumState;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

mod local;
mod remote;

pub use local::{LocalBackend, LocalBackendConfig, DEFAULT_MAX_QUBITS};
pub use remote::{
    AzureBackend, IonQBackend, ProviderErrorKind, QuantinuumBackend, RemoteProvider,
    UNAVAILABLE_RETRY_AFTER,
};

/// The capability interface every execution target implements.
pub trait Backend {
    /// Human readable backend name, copied into every [`ExecutionResult`].
    fn name(&self) -> &str;

    /// The all-zero state on `n` qubits.
    fn initialize_state(&self, n: usize) -> QuantumResult<QuantumState>;

    /// Apply a single gate to `state`.
    fn apply_operation(&self, gate: &Gate, state: QuantumState) -> QuantumResult<QuantumState>;

    /// Run `circuit` and return the final state, ignoring measurements.
    fn execute_to_state(&self, circuit: &Circuit) -> QuantumResult<QuantumState>;

    /// Run `circuit` `shots` times and histogram the measured bitstrings.
    fn execute(&self, circuit: &Circuit, shots: usize) -> QuantumResult<ExecutionResult>;
}

/// Measurement histogram returned by [`Backend::execute`].
///
/// Counts sum to `shots`, every key has one character per qubit and character `k` is the value
/// of qubit `k`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Name of the backend that produced the result.
    pub backend_name: String,
    /// Number of samples taken.
    pub shots: usize,
    /// Bitstring to number of times it was observed.
    pub counts: BTreeMap<String, usize>,
    /// Wall clock time spent executing.
    pub execution_time_ms: f64,
    /// Provider job identifier, if any.
    pub job_id: Option<String>,
}

impl ExecutionResult {
    /// Observed frequency of each bitstring.
    pub fn probabilities(&self) -> BTreeMap<String, f64> {
        self.counts
            .iter()
            .map(|(bits, count)| (bits.clone(), *count as f64 / self.shots as f64))
            .collect()
    }

    /// The most frequently observed bitstring, ties broken by the lowest bitstring.
    pub fn most_frequent(&self) -> Option<(&str, usize)> {
        self.counts
            .iter()
            .fold(None, |best: Option<(&str, usize)>, (bits, count)| match best {
                Some((_, c)) if c >= *count => best,
                _ => Some((bits.as_str(), *count)),
            })
    }

    /// Number of times `bitstring` was observed.
    pub fn get_count(&self, bitstring: &str) -> usize {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Fold the counts and shots of `other` into this result.
    pub fn merge(&mut self, other: &ExecutionResult) {
        for (bits, count) in &other.counts {
            *self.counts.entry(bits.clone()).or_insert(0) += count;
        }
        self.shots += other.shots;
        self.execution_time_ms += other.execution_time_ms;
    }
}

/// Static dispatch over the known backends.
#[derive(Debug, Clone)]
pub enum AnyBackend {
    /// The local state-vector simulator.
    Local(LocalBackend),
    /// Azure Quantum style remote target.
    Azure(AzureBackend),
    /// Quantinuum style remote target.
    Quantinuum(QuantinuumBackend),
    /// IonQ style remote target.
    IonQ(IonQBackend),
}

macro_rules! dispatch {
    ($self:expr, $b:ident => $e:expr) => {
        match $self {
            AnyBackend::Local($b) => $e,
            AnyBackend::Azure($b) => $e,
            AnyBackend::Quantinuum($b) => $e,
            AnyBackend::IonQ($b) => $e,
        }
    };
}

impl Backend for AnyBackend {
    fn name(&self) -> &str {
        dispatch!(self, b => b.name())
    }

    fn initialize_state(&self, n: usize) -> QuantumResult<QuantumState> {
        dispatch!(self, b => b.initialize_state(n))
    }

    fn apply_operation(&self, gate: &Gate, state: QuantumState) -> QuantumResult<QuantumState> {
        dispatch!(self, b => b.apply_operation(gate, state))
    }

    fn execute_to_state(&self, circuit: &Circuit) -> QuantumResult<QuantumState> {
        dispatch!(self, b => b.execute_to_state(circuit))
    }

    fn execute(&self, circuit: &Circuit, shots: usize) -> QuantumResult<ExecutionResult> {
        dispatch!(self, b => b.execute(circuit, shots))
    }
}

impl From<LocalBackend> for AnyBackend {
    fn from(b: LocalBackend) -> Self {
        AnyBackend::Local(b)
    }
}

impl From<AzureBackend> for AnyBackend {
    fn from(b: AzureBackend) -> Self {
        AnyBackend::Azure(b)
    }
}

impl From<QuantinuumBackend> for AnyBackend {
    fn from(b: QuantinuumBackend) -> Self {
        AnyBackend::Quantinuum(b)
    }
}

impl From<IonQBackend> for AnyBackend {
    fn from(b: IonQBackend) -> Self {
        AnyBackend::IonQ(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::QuantumError;

    fn result(counts: &[(&str, usize)]) -> ExecutionResult {
        ExecutionResult {
            backend_name: "test".to_string(),
            shots: counts.iter().map(|(_, c)| c).sum(),
            counts: counts.iter().map(|(b, c)| (b.to_string(), *c)).collect(),
            execution_time_ms: 1.0,
            job_id: None,
        }
    }

    #[test]
    fn test_result_helpers() {
        let r = result(&[("00", 30), ("11", 70)]);
        assert_eq!(r.most_frequent(), Some(("11", 70)));
        assert_eq!(r.get_count("00"), 30);
        assert_eq!(r.get_count("01"), 0);
        assert_eq!(r.probabilities().get("11"), Some(&0.7));
    }

    #[test]
    fn test_most_frequent_tie_prefers_lowest() {
        let r = result(&[("01", 5), ("10", 5)]);
        assert_eq!(r.most_frequent(), Some(("01", 5)));
        assert_eq!(result(&[]).most_frequent(), None);
    }

    #[test]
    fn test_merge() {
        let mut a = result(&[("00", 3)]);
        let b = result(&[("00", 1), ("11", 4)]);
        a.merge(&b);
        assert_eq!(a.shots, 8);
        assert_eq!(a.get_count("00"), 4);
        assert_eq!(a.get_count("11"), 4);
    }

    #[test]
    fn test_any_backend_dispatch() {
        let backends: Vec<AnyBackend> = vec![
            LocalBackend::default().into(),
            AzureBackend::new("ionq.simulator").into(),
            QuantinuumBackend::new("H1-1E").into(),
            IonQBackend::new("aria-1").into(),
        ];
        let circuit = Circuit::empty(1).add_gate(Gate::X(0));
        let outcomes = backends
            .iter()
            .map(|b| b.execute(&circuit, 10))
            .collect::<Vec<_>>();
        assert_eq!(outcomes[0].as_ref().map(|r| r.get_count("1")), Ok(10));
        outcomes[1..]
            .iter()
            .for_each(|o| assert!(matches!(o, Err(QuantumError::NotImplemented(_)))));
    }

    #[test]
    fn test_result_serializes() {
        let r = result(&[("0", 2)]);
        let json = serde_json::to_string(&r).unwrap();
        let back: ExecutionResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }
}

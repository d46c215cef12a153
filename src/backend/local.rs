use super::{Backend, ExecutionResult};
use crate::circuit::Circuit;
use crate::errors::{QuantumError, QuantumResult};
use crate::gates::Gate;
use crate::state::{self, QuantumState};
use std::time::Instant;
use tracing::debug;

/// Largest register the local simulator accepts unless configured otherwise.
pub const DEFAULT_MAX_QUBITS: usize = 10;

/// Configuration for the local simulator backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalBackendConfig {
    /// Seed for shot sampling. `None` draws fresh entropy for every call to `execute`.
    pub seed: Option<u64>,
    /// Largest qubit count accepted. A state takes `16 * 2^n` bytes.
    pub max_qubits: usize,
}

impl Default for LocalBackendConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_qubits: DEFAULT_MAX_QUBITS,
        }
    }
}

impl LocalBackendConfig {
    /// Sample with a fixed seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Change the qubit limit.
    pub fn with_max_qubits(mut self, max_qubits: usize) -> Self {
        self.max_qubits = max_qubits;
        self
    }
}

/// Runs circuits on the in-process state-vector engine.
///
/// # Example
/// ```
/// use qtoolkit::prelude::*;
///
/// let backend = LocalBackend::new(LocalBackendConfig::default().with_seed(42));
/// let bell = Circuit::new(2).h(0).cnot(0, 1);
/// let result = backend.execute(&bell, 1000)?;
/// assert_eq!(result.counts.values().sum::<usize>(), 1000);
/// assert!(result.counts.keys().all(|k| k == "00" || k == "11"));
/// # Ok::<(), QuantumError>(())
/// ```
#[derive(Debug, Clone)]
pub struct LocalBackend {
    name: String,
    config: LocalBackendConfig,
}

impl Default for LocalBackend {
    fn default() -> Self {
        Self::new(LocalBackendConfig::default())
    }
}

impl LocalBackend {
    /// Make a local backend with `config`.
    pub fn new(config: LocalBackendConfig) -> Self {
        Self {
            name: "local_simulator".to_string(),
            config,
        }
    }

    /// Rename the backend.
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &LocalBackendConfig {
        &self.config
    }

    fn check_circuit(&self, circuit: &Circuit) -> QuantumResult<()> {
        if circuit.n() > self.config.max_qubits {
            debug!(
                qubits = circuit.n(),
                limit = self.config.max_qubits,
                "circuit too large for local simulator"
            );
            return Err(QuantumError::invalid_circuit(format!(
                "circuit has {} qubits, which exceeds the local simulator limit of {} qubits",
                circuit.n(),
                self.config.max_qubits
            )));
        }
        circuit.validate().into_result()
    }
}

impl Backend for LocalBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize_state(&self, n: usize) -> QuantumResult<QuantumState> {
        if n > self.config.max_qubits {
            return Err(QuantumError::validation(
                "qubits",
                format!(
                    "{} qubits exceeds the local simulator limit of {} qubits",
                    n, self.config.max_qubits
                ),
            ));
        }
        state::initialize_state(n)
    }

    fn apply_operation(&self, gate: &Gate, current: QuantumState) -> QuantumResult<QuantumState> {
        state::apply_operation(gate, current)
    }

    fn execute_to_state(&self, circuit: &Circuit) -> QuantumResult<QuantumState> {
        self.check_circuit(circuit)?;
        state::execute_to_state(circuit)
    }

    fn execute(&self, circuit: &Circuit, shots: usize) -> QuantumResult<ExecutionResult> {
        if shots == 0 {
            return Err(QuantumError::validation(
                "shots",
                format!("must be positive, got {}", shots),
            ));
        }
        self.check_circuit(circuit)?;
        if circuit.n() == 0 {
            return Err(QuantumError::invalid_circuit("circuit has no qubits to measure"));
        }

        let start = Instant::now();
        let final_state: QuantumState = state::execute_to_state(circuit)?;
        let counts = state::sample_state(&final_state, shots, self.config.seed)?;
        let execution_time_ms = start.elapsed().as_secs_f64() * 1000.0;

        debug!(
            backend = %self.name,
            qubits = circuit.n(),
            gates = circuit.len(),
            shots,
            outcomes = counts.len(),
            execution_time_ms,
            "executed circuit"
        );

        Ok(ExecutionResult {
            backend_name: self.name.clone(),
            shots,
            counts,
            execution_time_ms,
            job_id: None,
        })
    }
}

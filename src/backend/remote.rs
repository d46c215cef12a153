use super::{Backend, ExecutionResult};
use crate::circuit::Circuit;
use crate::errors::{QuantumError, QuantumResult};
use crate::gates::Gate;
use crate::state::QuantumState;
use std::time::Duration;
use tracing::{debug, warn};

/// How long callers are told to wait when a provider reports its backend is down.
pub const UNAVAILABLE_RETRY_AFTER: Duration = Duration::from_secs(5 * 60);

/// The shared error variant a provider code maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// The provider rejected the circuit.
    InvalidCircuit,
    /// The circuit needs more qubits than the target has.
    TooLarge,
    /// Account quota exhausted.
    QuotaExceeded,
    /// Target offline or in maintenance.
    Unavailable,
}

/// A provider whose error codes translate into [`QuantumError`].
pub trait RemoteProvider {
    /// Provider error code to shared variant. Codes not listed become
    /// [`QuantumError::UnknownError`].
    const ERROR_TABLE: &'static [(&'static str, ProviderErrorKind)];

    /// Name of the provider, used in error messages.
    fn provider_name(&self) -> &str;

    /// The provider side target, e.g. a device or simulator name.
    fn target(&self) -> &str;

    /// Map a provider error `code` and `message` onto [`QuantumError`].
    fn translate_error(&self, code: &str, message: &str) -> QuantumError {
        let kind = Self::ERROR_TABLE
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, kind)| *kind);
        debug!(provider = self.provider_name(), code, ?kind, "translating provider error");
        match kind {
            Some(ProviderErrorKind::InvalidCircuit) => QuantumError::invalid_circuit(message),
            Some(ProviderErrorKind::TooLarge) => QuantumError::invalid_circuit(format!(
                "circuit is too large for {} target {}: {}",
                self.provider_name(),
                self.target(),
                message
            )),
            Some(ProviderErrorKind::QuotaExceeded) => {
                QuantumError::QuotaExceeded(format!("{}: {}", self.provider_name(), message))
            }
            Some(ProviderErrorKind::Unavailable) => QuantumError::ServiceUnavailable {
                retry_after: Some(UNAVAILABLE_RETRY_AFTER),
            },
            None => QuantumError::UnknownError {
                code: code.to_string(),
                message: format!("{} error {}: {}", self.provider_name(), code, message),
            },
        }
    }
}

macro_rules! remote_backend {
    ($(#[$doc:meta])* $backend:ident, $provider:expr, $table:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $backend {
            name: String,
            target: String,
        }

        impl $backend {
            /// Point the stub at provider target `target`.
            pub fn new<S: Into<String>>(target: S) -> Self {
                let target = target.into();
                Self {
                    name: format!("{}:{}", $provider, target),
                    target,
                }
            }

            fn not_wired(&self, operation: &str) -> QuantumError {
                warn!(backend = %self.name, operation, "remote backend is not wired to a provider");
                QuantumError::NotImplemented(format!(
                    "{} is not available on {}, no provider connection is configured",
                    operation, self.name
                ))
            }
        }

        impl RemoteProvider for $backend {
            const ERROR_TABLE: &'static [(&'static str, ProviderErrorKind)] = $table;

            fn provider_name(&self) -> &str {
                $provider
            }

            fn target(&self) -> &str {
                &self.target
            }
        }

        impl Backend for $backend {
            fn name(&self) -> &str {
                &self.name
            }

            fn initialize_state(&self, _n: usize) -> QuantumResult<QuantumState> {
                Err(self.not_wired("initialize_state"))
            }

            fn apply_operation(
                &self,
                _gate: &Gate,
                _state: QuantumState,
            ) -> QuantumResult<QuantumState> {
                Err(self.not_wired("apply_operation"))
            }

            fn execute_to_state(&self, _circuit: &Circuit) -> QuantumResult<QuantumState> {
                Err(self.not_wired("execute_to_state"))
            }

            fn execute(&self, _circuit: &Circuit, _shots: usize) -> QuantumResult<ExecutionResult> {
                Err(self.not_wired("execute"))
            }
        }
    };
}

remote_backend!(
    /// Azure Quantum style target.
    AzureBackend,
    "Azure",
    &[
        ("InvalidCircuit", ProviderErrorKind::InvalidCircuit),
        ("InvalidInputData", ProviderErrorKind::InvalidCircuit),
        ("TooManyQubits", ProviderErrorKind::TooLarge),
        ("QuotaExceeded", ProviderErrorKind::QuotaExceeded),
        ("BackendUnavailable", ProviderErrorKind::Unavailable),
        ("TargetUnavailable", ProviderErrorKind::Unavailable),
    ]
);

remote_backend!(
    /// Quantinuum style target.
    QuantinuumBackend,
    "Quantinuum",
    &[
        ("InvalidCircuit", ProviderErrorKind::InvalidCircuit),
        ("TooManyQubits", ProviderErrorKind::TooLarge),
        ("QuotaExceeded", ProviderErrorKind::QuotaExceeded),
        ("InsufficientCredits", ProviderErrorKind::QuotaExceeded),
        ("BackendUnavailable", ProviderErrorKind::Unavailable),
        ("MachineOffline", ProviderErrorKind::Unavailable),
    ]
);

remote_backend!(
    /// IonQ style target.
    IonQBackend,
    "IonQ",
    &[
        ("InvalidCircuit", ProviderErrorKind::InvalidCircuit),
        ("TooManyQubits", ProviderErrorKind::TooLarge),
        ("QuotaExceeded", ProviderErrorKind::QuotaExceeded),
        ("BackendUnavailable", ProviderErrorKind::Unavailable),
    ]
);

#[cfg(test)]
mod tests {
    use super::*;

    fn check_common_table<B: RemoteProvider>(backend: &B) {
        assert_eq!(
            backend.translate_error("InvalidCircuit", "bad gate"),
            QuantumError::InvalidCircuit(vec!["bad gate".to_string()])
        );

        match backend.translate_error("TooManyQubits", "40 > 32") {
            QuantumError::InvalidCircuit(messages) => {
                assert!(messages[0].contains("too large"));
                assert!(messages[0].contains("40 > 32"));
            }
            e => panic!("unexpected {:?}", e),
        }

        assert!(matches!(
            backend.translate_error("QuotaExceeded", "monthly"),
            QuantumError::QuotaExceeded(m) if m.contains("monthly")
        ));

        match backend.translate_error("BackendUnavailable", "maintenance") {
            QuantumError::ServiceUnavailable {
                retry_after: Some(d),
            } => assert!(d >= Duration::from_secs(300)),
            e => panic!("unexpected {:?}", e),
        }

        match backend.translate_error("Weird", "something happened") {
            QuantumError::UnknownError { code, message } => {
                assert_eq!(code, "Weird");
                assert!(message.contains(backend.provider_name()));
                assert!(message.contains("Weird"));
            }
            e => panic!("unexpected {:?}", e),
        }
    }

    #[test]
    fn test_error_tables() {
        check_common_table(&AzureBackend::new("ionq.simulator"));
        check_common_table(&QuantinuumBackend::new("H1-1E"));
        check_common_table(&IonQBackend::new("aria-1"));
    }

    #[test]
    fn test_provider_aliases() {
        let q = QuantinuumBackend::new("H1-1E");
        assert!(matches!(
            q.translate_error("InsufficientCredits", "none left"),
            QuantumError::QuotaExceeded(_)
        ));
        // Not in the IonQ table.
        let i = IonQBackend::new("aria-1");
        assert!(matches!(
            i.translate_error("InsufficientCredits", "none left"),
            QuantumError::UnknownError { .. }
        ));
    }

    #[test]
    fn test_stub_operations_not_implemented() {
        let b = IonQBackend::new("aria-1");
        assert_eq!(b.name(), "IonQ:aria-1");
        assert_eq!(b.target(), "aria-1");
        let c = Circuit::empty(1);
        assert!(matches!(
            b.initialize_state(1),
            Err(QuantumError::NotImplemented(_))
        ));
        assert!(matches!(
            b.execute_to_state(&c),
            Err(QuantumError::NotImplemented(_))
        ));
        assert!(matches!(
            b.apply_operation(&Gate::H(0), QuantumState::zero(1)),
            Err(QuantumError::NotImplemented(_))
        ));
        match b.execute(&c, 10) {
            Err(QuantumError::NotImplemented(m)) => assert!(m.contains("IonQ:aria-1")),
            other => panic!("unexpected {:?}", other),
        }
    }
}

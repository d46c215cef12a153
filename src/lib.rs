#![forbid(unsafe_code)]
#![deny(
    unreachable_pub,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    missing_docs
)]

//! Quantum circuit construction, state-vector simulation and OpenQASM exchange.
//!
//! Circuits are plain values: a qubit count and an ordered list of [`gates::Gate`]s. They are
//! run through a [`backend::Backend`], either the in-process [`backend::LocalBackend`] or one of
//! the remote provider stubs, and exchanged with other tools as OpenQASM 1.0, 2.0 or 3.0 text.
//!
//! Basis states are little-endian throughout: bit `k` of an amplitude index is qubit `k`, and
//! character `k` of a measured bitstring is qubit `k`.
//!
//! # Example (Bell pair)
//! ```
//! use qtoolkit::prelude::*;
//! use qtoolkit::qasm::QasmVersion;
//!
//! # fn main() -> QuantumResult<()> {
//! let bell = Circuit::new(2).h(0).cnot(0, 1);
//! assert!(bell.validate().is_valid);
//!
//! // Final state, without sampling.
//! let state = execute_to_state::<f64>(&bell)?;
//! let r = std::f64::consts::FRAC_1_SQRT_2;
//! assert!((state.amplitudes()[0].re - r).abs() < 1e-12);
//! assert!((state.amplitudes()[3].re - r).abs() < 1e-12);
//!
//! // Sampled histogram, reproducible thanks to the seed.
//! let backend = LocalBackend::new(LocalBackendConfig::default().with_seed(1));
//! let result = backend.execute(&bell.clone().measure_all(), 100)?;
//! assert_eq!(result.get_count("00") + result.get_count("11"), 100);
//!
//! // Wire format.
//! let text = bell.to_openqasm(QasmVersion::V2_0);
//! assert!(text.contains("cx q[0],q[1];"));
//! # Ok(())
//! # }
//! ```

/// Execution targets: the local simulator and remote provider stubs.
pub mod backend;
/// Chainable gate constructors for circuits.
pub mod builder_traits;
/// The circuit value type, validation and peephole optimization.
pub mod circuit;
/// Error types shared by every component.
pub mod errors;
/// The gate set.
pub mod gates;
pub mod qasm;
mod rayon_helper;
/// The state-vector engine.
pub mod state;
/// Lower-level state-vector kernels.
pub mod state_ops;
/// Reusable types.
pub mod types;
/// Utility functions for bit and index manipulation
pub mod utils;

pub use num_complex::Complex;
pub use rand;
pub use types::*;

/// Commonly used types and traits.
/// ```
/// use qtoolkit::prelude::*;
/// ```
pub mod prelude {
    pub use super::*;
    pub use crate::backend::*;
    pub use crate::builder_traits::*;
    pub use crate::circuit::*;
    pub use crate::errors::*;
    pub use crate::gates::*;
    pub use crate::qasm::ToOpenQasm;
    pub use crate::state::*;
}

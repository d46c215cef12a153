//! OpenQASM text encoding and decoding for versions 1.0, 2.0 and 3.0.
//!
//! Exported programs use a single quantum register `q` and, when the circuit measures, a
//! classical register `c` of the same width, so qubit `k` is always `q[k]`. The importer
//! accepts any number of named registers and concatenates them in declaration order.
//!
//! ```
//! use qtoolkit::prelude::*;
//! use qtoolkit::qasm::{from_openqasm, QasmVersion, ToOpenQasm};
//!
//! let circuit = Circuit::new(2).h(0).cnot(0, 1).measure_all();
//! let text = circuit.to_openqasm(QasmVersion::V3_0);
//! assert!(text.contains("c[1] = measure q[1];"));
//! assert_eq!(from_openqasm(&text)?, circuit);
//! # Ok::<(), qtoolkit::qasm::QasmError>(())
//! ```

use crate::errors::QuantumError;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

mod export;
mod expr;
mod import;

pub use export::{to_openqasm, write_openqasm_file, ToOpenQasm};
pub use import::{from_openqasm, parse_openqasm, read_openqasm_file, MAX_DECLARED};

/// The supported OpenQASM dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QasmVersion {
    /// OpenQASM 1.0, same syntax as 2.0 for the supported gates.
    V1_0,
    /// OpenQASM 2.0 with `qreg`/`creg` registers.
    V2_0,
    /// OpenQASM 3.0 with `qubit[]`/`bit[]` declarations.
    V3_0,
}

impl QasmVersion {
    /// All dialects, oldest first.
    pub const ALL: [QasmVersion; 3] = [QasmVersion::V1_0, QasmVersion::V2_0, QasmVersion::V3_0];

    /// Whether registers and measurements use the 3.0 syntax.
    pub fn is_v3(self) -> bool {
        self == QasmVersion::V3_0
    }

    /// The standard gate library include line.
    pub fn include_line(self) -> &'static str {
        if self.is_v3() {
            "include \"stdgates.inc\";"
        } else {
            "include \"qelib1.inc\";"
        }
    }
}

impl fmt::Display for QasmVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            QasmVersion::V1_0 => "1.0",
            QasmVersion::V2_0 => "2.0",
            QasmVersion::V3_0 => "3.0",
        };
        f.write_str(s)
    }
}

impl FromStr for QasmVersion {
    type Err = QasmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" | "1.0" => Ok(QasmVersion::V1_0),
            "2" | "2.0" => Ok(QasmVersion::V2_0),
            "3" | "3.0" => Ok(QasmVersion::V3_0),
            other => Err(QasmError::new(
                0,
                format!("unsupported OpenQASM version '{}'", other),
            )),
        }
    }
}

/// A failure to decode (or read) OpenQASM text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {message}")]
pub struct QasmError {
    /// 1-based line of the offending statement, 0 when not tied to a line.
    pub line: usize,
    /// What went wrong.
    pub message: String,
}

impl QasmError {
    /// Make an error for `line`.
    pub fn new<S: Into<String>>(line: usize, message: S) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

impl From<QasmError> for QuantumError {
    fn from(err: QasmError) -> Self {
        QuantumError::validation("qasm", err.to_string())
    }
}

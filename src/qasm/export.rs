use super::{QasmError, QasmVersion};
use crate::circuit::Circuit;
use crate::gates::Gate;
use std::fmt::Write;
use std::fs::File;
use std::io::Write as IoWrite;
use std::path::Path;

/// Exports a circuit as OpenQASM text.
pub trait ToOpenQasm {
    /// Returns the circuit as an OpenQASM program in dialect `version`.
    fn to_openqasm(&self, version: QasmVersion) -> String;
}

impl ToOpenQasm for Circuit {
    fn to_openqasm(&self, version: QasmVersion) -> String {
        to_openqasm(self, version)
    }
}

/// Render `circuit` as an OpenQASM program.
///
/// Angles use the shortest decimal that parses back to the same `f64`, so importing the output
/// reproduces the circuit exactly.
///
/// # Example
/// ```
/// use qtoolkit::prelude::*;
/// use qtoolkit::qasm::{to_openqasm, QasmVersion};
///
/// let circuit = Circuit::new(2).h(0).rx(1, 0.5);
/// let text = to_openqasm(&circuit, QasmVersion::V2_0);
/// assert_eq!(
///     text,
///     "OPENQASM 2.0;\ninclude \"qelib1.inc\";\nqreg q[2];\nh q[0];\nrx(0.5) q[1];\n"
/// );
/// ```
pub fn to_openqasm(circuit: &Circuit, version: QasmVersion) -> String {
    let n = circuit.n();
    let mut out = String::with_capacity(64 + circuit.len() * 16);

    let _ = writeln!(out, "OPENQASM {};", version);
    let _ = writeln!(out, "{}", version.include_line());
    if version.is_v3() {
        let _ = writeln!(out, "qubit[{}] q;", n);
    } else {
        let _ = writeln!(out, "qreg q[{}];", n);
    }

    let measures = circuit.gates().iter().any(|g| matches!(g, Gate::Measure(_)));
    if measures {
        if version.is_v3() {
            let _ = writeln!(out, "bit[{}] c;", n);
        } else {
            let _ = writeln!(out, "creg c[{}];", n);
        }
    }

    circuit
        .gates()
        .iter()
        .for_each(|gate| emit_gate(&mut out, gate, version));
    out
}

fn emit_gate(out: &mut String, gate: &Gate, version: QasmVersion) {
    match gate {
        Gate::Measure(q) => {
            if version.is_v3() {
                let _ = writeln!(out, "c[{}] = measure q[{}];", q, q);
            } else {
                let _ = writeln!(out, "measure q[{}] -> c[{}];", q, q);
            }
        }
        _ => {
            let operands = gate
                .qubits()
                .iter()
                .map(|q| format!("q[{}]", q))
                .collect::<Vec<_>>()
                .join(",");
            match gate.angle() {
                Some(theta) => {
                    let _ = writeln!(out, "{}({}) {};", gate.name(), theta, operands);
                }
                None => {
                    let _ = writeln!(out, "{} {};", gate.name(), operands);
                }
            }
        }
    }
}

/// Write `circuit` as OpenQASM into `path`.
pub fn write_openqasm_file<P: AsRef<Path>>(
    circuit: &Circuit,
    version: QasmVersion,
    path: P,
) -> Result<(), QasmError> {
    let path = path.as_ref();
    let qasm = to_openqasm(circuit, version);
    File::create(path)
        .and_then(|mut f| f.write_all(qasm.as_bytes()))
        .map_err(|err| QasmError::new(0, format!("cannot write {}: {}", path.display(), err)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<&str> {
        text.lines().collect()
    }

    #[test]
    fn test_barrier_scenario_order() {
        let c = Circuit::empty(3).add_gates([
            Gate::H(0),
            Gate::barrier([0, 1, 2]),
            Gate::Cnot(0, 1),
        ]);
        let text = to_openqasm(&c, QasmVersion::V2_0);
        let h = text.find("h q[0];").unwrap();
        let b = text.find("barrier q[0],q[1],q[2];").unwrap();
        let cx = text.find("cx q[0],q[1];").unwrap();
        assert!(h < b && b < cx);
    }

    #[test]
    fn test_headers_per_version() {
        let c = Circuit::empty(2).add_gate(Gate::X(1));
        assert_eq!(
            lines(&to_openqasm(&c, QasmVersion::V1_0)),
            vec!["OPENQASM 1.0;", "include \"qelib1.inc\";", "qreg q[2];", "x q[1];"]
        );
        assert_eq!(
            lines(&to_openqasm(&c, QasmVersion::V3_0)),
            vec!["OPENQASM 3.0;", "include \"stdgates.inc\";", "qubit[2] q;", "x q[1];"]
        );
    }

    #[test]
    fn test_classical_register_is_lazy() {
        let plain = Circuit::empty(2).add_gate(Gate::H(0));
        assert!(!to_openqasm(&plain, QasmVersion::V2_0).contains("creg"));
        assert!(!to_openqasm(&plain, QasmVersion::V3_0).contains("\nbit["));

        let measured = plain.add_gate(Gate::Measure(1));
        let v2 = to_openqasm(&measured, QasmVersion::V2_0);
        assert!(v2.contains("creg c[2];"));
        assert!(v2.contains("measure q[1] -> c[1];"));
        let v3 = to_openqasm(&measured, QasmVersion::V3_0);
        assert!(v3.contains("bit[2] c;"));
        assert!(v3.contains("c[1] = measure q[1];"));
    }

    #[test]
    fn test_parametrized_templates() {
        let c = Circuit::empty(2).add_gates([
            Gate::Rz(0, -1.25),
            Gate::Rzz(0, 1, 0.1),
            Gate::Sdg(1),
            Gate::Tdg(0),
            Gate::Cz(1, 0),
            Gate::Reset(1),
        ]);
        let text = to_openqasm(&c, QasmVersion::V2_0);
        assert_eq!(
            &lines(&text)[3..],
            &[
                "rz(-1.25) q[0];",
                "rzz(0.1) q[0],q[1];",
                "sdg q[1];",
                "tdg q[0];",
                "cz q[1],q[0];",
                "reset q[1];"
            ]
        );
    }

    #[test]
    fn test_write_file_reports_io_errors() {
        let c = Circuit::empty(1);
        let err = write_openqasm_file(&c, QasmVersion::V2_0, "/nonexistent-dir/x.qasm").unwrap_err();
        assert_eq!(err.line, 0);
        assert!(err.message.contains("cannot write"));
    }
}

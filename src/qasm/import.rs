use super::expr::eval_angle;
use super::{QasmError, QasmVersion};
use crate::circuit::Circuit;
use crate::gates::Gate;
use crate::types::QubitIndex;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Upper bound on the summed width of the quantum or classical registers of one program.
pub const MAX_DECLARED: usize = 1 << 20;

/// Parse OpenQASM text into a circuit.
///
/// The qubit count is the total width of every declared quantum register. See
/// [`parse_openqasm`] to also learn the dialect.
///
/// # Example
/// ```
/// use qtoolkit::prelude::*;
/// use qtoolkit::qasm::from_openqasm;
///
/// let text = "OPENQASM 2.0;\nqreg a[1];\nqreg b[2];\ncx a[0],b[1];\nbarrier b;\n";
/// let circuit = from_openqasm(text)?;
/// assert_eq!(circuit.n(), 3);
/// assert_eq!(circuit.gates(), &[Gate::Cnot(0, 2), Gate::barrier([1, 2])]);
///
/// assert!(from_openqasm("OPENQASM 2.0;\nqreg q[2];\nreset q[5];").is_err());
/// # Ok::<(), qtoolkit::qasm::QasmError>(())
/// ```
pub fn from_openqasm(text: &str) -> Result<Circuit, QasmError> {
    parse_openqasm(text).map(|(_, circuit)| circuit)
}

/// Parse OpenQASM text, returning the declared dialect along with the circuit.
pub fn parse_openqasm(text: &str) -> Result<(QasmVersion, Circuit), QasmError> {
    let mut parser = Parser::default();
    for (i, raw) in text.lines().enumerate() {
        let line = i + 1;
        let code = match raw.find("//") {
            Some(at) => &raw[..at],
            None => raw,
        };
        let code = code.trim();
        if code.is_empty() {
            continue;
        }
        let (statements, rest) = match code.rfind(';') {
            Some(at) => (&code[..at], code[at + 1..].trim()),
            None => ("", code),
        };
        if !rest.is_empty() {
            return Err(QasmError::new(
                line,
                format!("statement '{}' is missing a terminating ';'", rest),
            ));
        }
        statements
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .try_for_each(|s| parser.statement(s).map_err(|msg| QasmError::new(line, msg)))?;
    }

    let version = parser
        .version
        .ok_or_else(|| QasmError::new(0, "missing OPENQASM version header"))?;
    debug!(
        %version,
        qubits = parser.n_qubits,
        gates = parser.gates.len(),
        "parsed OpenQASM program"
    );
    Ok((version, Circuit::from_gates(parser.n_qubits, parser.gates)))
}

/// Read and parse an OpenQASM file.
pub fn read_openqasm_file<P: AsRef<Path>>(path: P) -> Result<Circuit, QasmError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .map_err(|err| QasmError::new(0, format!("cannot read {}: {}", path.display(), err)))?;
    from_openqasm(&text)
}

#[derive(Debug)]
struct Register {
    name: String,
    offset: usize,
    size: usize,
}

/// Register table, followed by the instruction stream.
#[derive(Debug, Default)]
struct Parser {
    version: Option<QasmVersion>,
    qregs: Vec<Register>,
    n_qubits: usize,
    cregs: Vec<Register>,
    n_bits: usize,
    gates: Vec<Gate>,
}

/// An operand before it is resolved against a register table.
enum Operand<'a> {
    Indexed(&'a str, usize),
    Whole(&'a str),
}

impl Parser {
    fn statement(&mut self, stmt: &str) -> Result<(), String> {
        let (keyword, rest) = split_keyword(stmt);

        match (self.version, keyword) {
            (None, "OPENQASM") => {
                let version = rest.parse::<QasmVersion>().map_err(|e| e.message)?;
                self.version = Some(version);
                return Ok(());
            }
            (None, _) => {
                return Err(format!(
                    "expected an OPENQASM version header before '{}'",
                    stmt
                ))
            }
            (Some(_), "OPENQASM") => return Err("duplicate OPENQASM version header".to_string()),
            (Some(_), _) => {}
        }

        match keyword {
            "include" => Ok(()),
            "qreg" => {
                let (name, size) = parse_qreg_style(rest)?;
                self.declare_qubits(name, size)
            }
            "creg" => {
                let (name, size) = parse_qreg_style(rest)?;
                self.declare_bits(name, size)
            }
            "qubit" => {
                let (name, size) = parse_qubit_style(stmt, "qubit")?;
                self.declare_qubits(name, size)
            }
            "bit" => {
                let (name, size) = parse_qubit_style(stmt, "bit")?;
                self.declare_bits(name, size)
            }
            "measure" => self.measure(rest),
            "barrier" => {
                let qubits = split_operands(rest)?
                    .into_iter()
                    .map(|op| self.resolve_qubits(op))
                    .collect::<Result<Vec<_>, _>>()?;
                self.gates
                    .push(Gate::barrier(qubits.into_iter().flatten()));
                Ok(())
            }
            _ => match stmt.split_once('=') {
                Some((target, rhs)) => self.assigned_measure(target, rhs),
                None => self.gate(stmt),
            },
        }
    }

    fn declare_qubits(&mut self, name: &str, size: usize) -> Result<(), String> {
        if self.cregs.iter().any(|r| r.name == name) {
            return Err(format!("register '{}' is already declared", name));
        }
        declare(&mut self.qregs, &mut self.n_qubits, name, size)
    }

    fn declare_bits(&mut self, name: &str, size: usize) -> Result<(), String> {
        if self.qregs.iter().any(|r| r.name == name) {
            return Err(format!("register '{}' is already declared", name));
        }
        declare(&mut self.cregs, &mut self.n_bits, name, size)
    }

    /// `measure q[i] -> c[j]` or the bare `measure q[i]`.
    fn measure(&mut self, rest: &str) -> Result<(), String> {
        let (source, target) = match rest.split_once("->") {
            Some((s, t)) => (s, Some(t)),
            None => (rest, None),
        };
        let q = self.single_qubit(source)?;
        if let Some(target) = target {
            self.resolve_bit(target)?;
        }
        self.gates.push(Gate::Measure(q));
        Ok(())
    }

    /// `c[j] = measure q[i]`.
    fn assigned_measure(&mut self, target: &str, rhs: &str) -> Result<(), String> {
        let (keyword, source) = split_keyword(rhs.trim());
        if keyword != "measure" {
            return Err(format!("unsupported assignment '{} = {}'", target.trim(), rhs.trim()));
        }
        self.resolve_bit(target)?;
        let q = self.single_qubit(source)?;
        self.gates.push(Gate::Measure(q));
        Ok(())
    }

    fn gate(&mut self, stmt: &str) -> Result<(), String> {
        let name_end = stmt
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(stmt.len());
        let (name, rest) = stmt.split_at(name_end);
        let rest = rest.trim_start();

        let (params, operands) = if let Some(inner) = rest.strip_prefix('(') {
            let close = matching_paren(inner)
                .ok_or_else(|| format!("unbalanced parentheses in '{}'", stmt))?;
            let params = inner[..close]
                .split(',')
                .map(eval_angle)
                .collect::<Result<Vec<_>, _>>()?;
            (params, &inner[close + 1..])
        } else {
            (vec![], rest)
        };

        let qubits = split_operands(operands)?
            .into_iter()
            .map(|op| match op {
                Operand::Indexed(reg, idx) => self.resolve_qubit(reg, idx),
                Operand::Whole(reg) => Err(format!(
                    "'{}' needs an indexed qubit operand, found register '{}'",
                    name, reg
                )),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let gate = build_gate(name, &params, &qubits)?;
        self.gates.push(gate);
        Ok(())
    }

    fn single_qubit(&self, operand: &str) -> Result<QubitIndex, String> {
        match parse_operand(operand)? {
            Operand::Indexed(reg, idx) => self.resolve_qubit(reg, idx),
            Operand::Whole(reg) => Err(format!(
                "measure of the whole register '{}' is not supported, index a qubit",
                reg
            )),
        }
    }

    fn resolve_qubit(&self, reg: &str, idx: usize) -> Result<QubitIndex, String> {
        let register = lookup(&self.qregs, reg, "qubit")?;
        if idx >= register.size {
            return Err(format!(
                "index {} out of bounds for register '{}' of size {}",
                idx, reg, register.size
            ));
        }
        Ok(register.offset + idx)
    }

    fn resolve_qubits(&self, op: Operand<'_>) -> Result<Vec<QubitIndex>, String> {
        match op {
            Operand::Indexed(reg, idx) => self.resolve_qubit(reg, idx).map(|q| vec![q]),
            Operand::Whole(reg) => {
                let register = lookup(&self.qregs, reg, "qubit")?;
                let end = register
                    .offset
                    .checked_add(register.size)
                    .ok_or_else(|| format!("register '{}' overflows the qubit index space", reg))?;
                Ok((register.offset..end).collect())
            }
        }
    }

    fn resolve_bit(&self, operand: &str) -> Result<(), String> {
        match parse_operand(operand)? {
            Operand::Indexed(reg, idx) => {
                let register = lookup(&self.cregs, reg, "classical")?;
                if idx >= register.size {
                    return Err(format!(
                        "index {} out of bounds for classical register '{}' of size {}",
                        idx, reg, register.size
                    ));
                }
                Ok(())
            }
            Operand::Whole(reg) => lookup(&self.cregs, reg, "classical").map(|_| ()),
        }
    }
}

fn declare(
    table: &mut Vec<Register>,
    total: &mut usize,
    name: &str,
    size: usize,
) -> Result<(), String> {
    if !is_identifier(name) {
        return Err(format!("invalid register name '{}'", name));
    }
    if table.iter().any(|r| r.name == name) {
        return Err(format!("register '{}' is already declared", name));
    }
    let end = total
        .checked_add(size)
        .filter(|end| *end <= MAX_DECLARED)
        .ok_or_else(|| {
            format!(
                "register '{}' of size {} takes the declared total past {}",
                name, size, MAX_DECLARED
            )
        })?;
    table.push(Register {
        name: name.to_string(),
        offset: *total,
        size,
    });
    *total = end;
    Ok(())
}

fn lookup<'a>(table: &'a [Register], name: &str, kind: &str) -> Result<&'a Register, String> {
    if table.is_empty() {
        return Err(format!(
            "'{}' used before any {} register is declared",
            name, kind
        ));
    }
    table
        .iter()
        .find(|r| r.name == name)
        .ok_or_else(|| format!("unknown {} register '{}'", kind, name))
}

fn split_keyword(stmt: &str) -> (&str, &str) {
    match stmt.find(|c: char| c.is_whitespace() || c == '[' || c == '(') {
        Some(at) => (&stmt[..at], stmt[at..].trim()),
        None => (stmt, ""),
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// `name[size]`, as in `qreg q[3]`.
fn parse_qreg_style(decl: &str) -> Result<(&str, usize), String> {
    match parse_operand(decl)? {
        Operand::Indexed(name, size) => Ok((name, size)),
        Operand::Whole(name) => Err(format!("register '{}' needs a size", name)),
    }
}

/// `qubit[size] name` or `qubit name`.
fn parse_qubit_style<'a>(stmt: &'a str, keyword: &str) -> Result<(&'a str, usize), String> {
    let rest = stmt[keyword.len()..].trim_start();
    match rest.strip_prefix('[') {
        Some(sized) => {
            let (size, name) = sized
                .split_once(']')
                .ok_or_else(|| format!("unclosed '[' in '{}'", stmt))?;
            Ok((name.trim(), parse_index(size)?))
        }
        None => Ok((rest, 1)),
    }
}

fn parse_index(s: &str) -> Result<usize, String> {
    s.trim()
        .parse()
        .map_err(|_| format!("invalid index '{}'", s.trim()))
}

fn parse_operand(s: &str) -> Result<Operand<'_>, String> {
    let s = s.trim();
    let op = match s.split_once('[') {
        Some((name, rest)) => {
            let inner = rest
                .strip_suffix(']')
                .ok_or_else(|| format!("malformed operand '{}'", s))?;
            Operand::Indexed(name.trim(), parse_index(inner)?)
        }
        None => Operand::Whole(s),
    };
    let name = match op {
        Operand::Indexed(name, _) | Operand::Whole(name) => name,
    };
    if !is_identifier(name) {
        return Err(format!("malformed operand '{}'", s));
    }
    Ok(op)
}

fn split_operands(s: &str) -> Result<Vec<Operand<'_>>, String> {
    if s.trim().is_empty() {
        return Err("missing operands".to_string());
    }
    s.split(',').map(parse_operand).collect()
}

fn matching_paren(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' if depth == 0 => return Some(i),
            ')' => depth -= 1,
            _ => {}
        }
    }
    None
}

fn build_gate(name: &str, params: &[f64], qubits: &[QubitIndex]) -> Result<Gate, String> {
    let gate = match (name, params, qubits) {
        ("x", [], &[q]) => Gate::X(q),
        ("y", [], &[q]) => Gate::Y(q),
        ("z", [], &[q]) => Gate::Z(q),
        ("h", [], &[q]) => Gate::H(q),
        ("s", [], &[q]) => Gate::S(q),
        ("sdg", [], &[q]) => Gate::Sdg(q),
        ("t", [], &[q]) => Gate::T(q),
        ("tdg", [], &[q]) => Gate::Tdg(q),
        ("rx", &[theta], &[q]) => Gate::Rx(q, theta),
        ("ry", &[theta], &[q]) => Gate::Ry(q, theta),
        ("rz", &[theta], &[q]) => Gate::Rz(q, theta),
        ("cx" | "CX", [], &[c, t]) => Gate::Cnot(c, t),
        ("cz", [], &[c, t]) => Gate::Cz(c, t),
        ("rzz", &[theta], &[a, b]) => Gate::Rzz(a, b, theta),
        ("reset", [], &[q]) => Gate::Reset(q),
        (
            "x" | "y" | "z" | "h" | "s" | "sdg" | "t" | "tdg" | "rx" | "ry" | "rz" | "cx" | "CX"
            | "cz" | "rzz" | "reset",
            _,
            _,
        ) => {
            return Err(format!(
                "'{}' given {} parameter(s) and {} qubit(s)",
                name,
                params.len(),
                qubits.len()
            ))
        }
        _ => return Err(format!("unsupported instruction '{}'", name)),
    };
    Ok(gate)
}

use approx::assert_abs_diff_eq;
use qtoolkit::prelude::*;
use std::f64::consts::FRAC_1_SQRT_2;

// Classical inputs for the two qubits and the Bell state each one maps to, as little-endian
// amplitudes.
struct BellCase {
    first_bit: bool,
    second_bit: bool,
    expected: [f64; 4],
}

fn bell_cases() -> Vec<BellCase> {
    let r = FRAC_1_SQRT_2;
    vec![
        // |00> -> (|00> + |11>)/sqrt(2)
        BellCase {
            first_bit: false,
            second_bit: false,
            expected: [r, 0.0, 0.0, r],
        },
        // |10> -> (|00> - |11>)/sqrt(2)
        BellCase {
            first_bit: true,
            second_bit: false,
            expected: [r, 0.0, 0.0, -r],
        },
        // |01> -> (|01> + |10>)/sqrt(2)
        BellCase {
            first_bit: false,
            second_bit: true,
            expected: [0.0, r, r, 0.0],
        },
        // |11> -> (|01> - |10>)/sqrt(2), index 0b10 has qubit 0 clear.
        BellCase {
            first_bit: true,
            second_bit: true,
            expected: [0.0, -r, r, 0.0],
        },
    ]
}

#[test]
fn create_entanglement() -> QuantumResult<()> {
    for case in bell_cases() {
        let mut c = Circuit::new(2);
        if case.first_bit {
            c = c.x(0);
        }
        if case.second_bit {
            c = c.x(1);
        }
        let state = execute_to_state::<f64>(&c.h(0).cnot(0, 1))?;
        state
            .amplitudes()
            .iter()
            .zip(case.expected.iter())
            .for_each(|(amp, want)| {
                assert_abs_diff_eq!(amp.re, *want, epsilon = 1e-12);
                assert_abs_diff_eq!(amp.im, 0.0, epsilon = 1e-12);
            });
    }
    Ok(())
}

#[test]
fn bell_samples_are_correlated() -> QuantumResult<()> {
    let backend = LocalBackend::new(LocalBackendConfig::default().with_seed(1234));
    let bell = Circuit::new(2).h(0).cnot(0, 1).measure_all();
    let result = backend.execute(&bell, 2000)?;
    assert_eq!(result.shots, 2000);
    assert_eq!(result.get_count("01") + result.get_count("10"), 0);
    let zeros = result.get_count("00") as f64 / 2000.0;
    assert!((zeros - 0.5).abs() < 0.1, "P(00) = {}", zeros);
    Ok(())
}

#[test]
fn ghz_state() -> QuantumResult<()> {
    let n = 5;
    let ghz = (1..n).fold(Circuit::new(n).h(0), |c, q| c.cnot(q - 1, q));
    let state = execute_to_state::<f64>(&ghz)?;
    let probs = state.probabilities();
    assert_abs_diff_eq!(probs[0], 0.5, epsilon = 1e-12);
    assert_abs_diff_eq!(probs[(1 << n) - 1], 0.5, epsilon = 1e-12);

    let result = LocalBackend::new(LocalBackendConfig::default().with_seed(5)).execute(&ghz, 300)?;
    assert!(result.counts.keys().all(|k| k == "00000" || k == "11111"));
    Ok(())
}

#[test]
fn rzz_is_cnot_rz_cnot() -> QuantumResult<()> {
    let prep = Circuit::new(3).h(0).ry(1, 0.7).h(2).t(2);
    let direct = execute_to_state::<f64>(&prep.clone().rzz(2, 0, 1.1))?;
    let decomposed = execute_to_state::<f64>(&prep.cnot(2, 0).rz(0, 1.1).cnot(2, 0))?;
    direct
        .amplitudes()
        .iter()
        .zip(decomposed.amplitudes())
        .for_each(|(a, b)| {
            assert_abs_diff_eq!(a.re, b.re, epsilon = 1e-12);
            assert_abs_diff_eq!(a.im, b.im, epsilon = 1e-12);
        });
    Ok(())
}

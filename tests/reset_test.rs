use approx::assert_abs_diff_eq;
use qtoolkit::prelude::*;

#[test]
fn reset_after_x_reads_zero() -> QuantumResult<()> {
    for q in 0..3 {
        let state = execute_to_state::<f64>(&Circuit::new(3).x(q).reset(q))?;
        assert!(state.probability_of_qubit(q, false) > 0.99);
        assert_abs_diff_eq!(state.norm_sqr(), 1.0, epsilon = NORM_TOLERANCE);
    }
    Ok(())
}

#[test]
fn reset_leaves_other_qubits() -> QuantumResult<()> {
    let state = execute_to_state::<f64>(&Circuit::new(2).x(1).h(0).reset(0))?;
    // Only |q0=0, q1=1> remains.
    assert_abs_diff_eq!(state.probabilities()[0b10], 1.0, epsilon = 1e-12);
    Ok(())
}

#[test]
fn reset_collapses_entangled_partner() -> QuantumResult<()> {
    let state = execute_to_state::<f64>(&Circuit::new(2).h(0).cnot(0, 1).reset(1))?;
    assert_abs_diff_eq!(state.probabilities()[0], 1.0, epsilon = 1e-12);
    Ok(())
}

#[test]
fn reset_of_superposition_renormalizes() -> QuantumResult<()> {
    let state = execute_to_state::<f64>(&Circuit::new(1).ry(0, 1.0).reset(0))?;
    assert_abs_diff_eq!(state.amplitudes()[0].norm(), 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(state.amplitudes()[1].norm(), 0.0);
    Ok(())
}

#[test]
fn sampled_reset_is_deterministic() -> QuantumResult<()> {
    let backend = LocalBackend::default();
    let result = backend.execute(&Circuit::new(2).x(0).x(1).reset(0).measure_all(), 64)?;
    assert_eq!(result.get_count("01"), 64);
    Ok(())
}

use approx::assert_abs_diff_eq;
use qtoolkit::prelude::*;
use std::f64::consts::{FRAC_1_SQRT_2, PI};

fn run(c: Circuit) -> QuantumResult<QuantumState> {
    execute_to_state::<f64>(&c)
}

fn assert_same_state(a: &QuantumState, b: &QuantumState) {
    assert_eq!(a.n(), b.n());
    a.amplitudes()
        .iter()
        .zip(b.amplitudes())
        .for_each(|(x, y)| {
            assert_abs_diff_eq!(x.re, y.re, epsilon = 1e-10);
            assert_abs_diff_eq!(x.im, y.im, epsilon = 1e-10);
        });
}

#[test]
fn test_x_flips_each_qubit() -> QuantumResult<()> {
    for q in 0..3 {
        let state = run(Circuit::new(3).x(q))?;
        assert_abs_diff_eq!(state.amplitudes()[1 << q].re, 1.0);
        assert_abs_diff_eq!(state.probability_of_qubit(q, true), 1.0);
    }
    Ok(())
}

#[test]
fn test_y_on_zero() -> QuantumResult<()> {
    let state = run(Circuit::new(1).y(0))?;
    assert_eq!(state.amplitudes()[1], Complex::new(0.0, 1.0));
    Ok(())
}

#[test]
fn test_double_hadamard_is_identity() -> QuantumResult<()> {
    let state = run(Circuit::new(2).h(1).h(1))?;
    assert_same_state(&state, &initialize_state(2)?);
    Ok(())
}

#[test]
fn test_phase_gate_algebra() -> QuantumResult<()> {
    // S^2 = Z and T^2 = S, checked on |+>.
    assert_same_state(
        &run(Circuit::new(1).h(0).s(0).s(0))?,
        &run(Circuit::new(1).h(0).z(0))?,
    );
    assert_same_state(
        &run(Circuit::new(1).h(0).t(0).t(0))?,
        &run(Circuit::new(1).h(0).s(0))?,
    );
    assert_same_state(
        &run(Circuit::new(1).h(0).s(0).s_dagger(0).t(0).t_dagger(0))?,
        &run(Circuit::new(1).h(0))?,
    );
    Ok(())
}

#[test]
fn test_rotations() -> QuantumResult<()> {
    let state = run(Circuit::new(1).rx(0, PI))?;
    assert_abs_diff_eq!(state.probabilities()[1], 1.0, epsilon = 1e-12);

    let state = run(Circuit::new(1).ry(0, PI / 2.0))?;
    assert_abs_diff_eq!(state.amplitudes()[0].re, FRAC_1_SQRT_2, epsilon = 1e-12);
    assert_abs_diff_eq!(state.amplitudes()[1].re, FRAC_1_SQRT_2, epsilon = 1e-12);

    // H Rz H turns the phase into a population.
    let theta = 0.9;
    let state = run(Circuit::new(1).h(0).rz(0, theta).h(0))?;
    assert_abs_diff_eq!(
        state.probability_of_qubit(0, true),
        (theta / 2.0).sin().powi(2),
        epsilon = 1e-12
    );
    Ok(())
}

#[test]
fn test_fused_rotations_match_unfused() -> QuantumResult<()> {
    let c = Circuit::new(2).rx(0, 0.3).rx(0, 0.4).h(1).h(1).rz(1, 0.2).rz(1, -0.7);
    let optimized = c.optimize();
    assert_eq!(optimized.len(), 2);
    assert_same_state(&run(c)?, &run(optimized)?);
    Ok(())
}

#[test]
fn test_reverse_undoes_clifford_t() -> QuantumResult<()> {
    let c = Circuit::new(2).h(0).s(0).t(1).cnot(0, 1).cz(1, 0).t(0);
    let round = c.compose(&c.reverse());
    assert_same_state(&run(round)?, &initialize_state(2)?);
    Ok(())
}

#[test]
fn test_norm_is_preserved() -> QuantumResult<()> {
    let c = Circuit::new(4)
        .h(0)
        .ry(1, 0.4)
        .cnot(0, 2)
        .rzz(2, 3, 1.3)
        .t(3)
        .cz(1, 3)
        .rx(0, -2.0)
        .reset(2)
        .s(1);
    let state = run(c)?;
    assert_abs_diff_eq!(state.norm_sqr(), 1.0, epsilon = NORM_TOLERANCE);
    Ok(())
}

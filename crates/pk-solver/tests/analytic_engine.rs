//! Integration tests: the analytic engine against physical invariants and a
//! fine-step reference integration.

use pk_core::{GroupSet, KineticsParams, KineticsState};
use pk_solver::{AnalyticEngine, EngineOptions, SolverError, SumRounding};

const LAMBDAS: [f64; 6] = [0.0127, 0.0317, 0.115, 0.311, 1.40, 3.87];
const RAMP_BETAS: [f64; 6] = [0.000266, 0.001491, 0.001316, 0.002849, 0.000896, 0.000182];
const INSERTION_BETAS: [f64; 6] = [0.000285, 0.0015975, 0.00141, 0.0030525, 0.00096, 0.000195];

fn params(lambdas: &[f64], betas: &[f64], generation_time: f64) -> KineticsParams {
    let groups = GroupSet::new(lambdas.to_vec(), betas.to_vec()).unwrap();
    KineticsParams::new(groups, generation_time).unwrap()
}

/// Classical RK4 on the point-kinetics ODEs, used only as a reference.
fn reference_rk4(p: &KineticsParams, start: &KineticsState, rho: f64, t: f64, steps: usize) -> KineticsState {
    let lambdas = p.groups().decay_constants();
    let betas = p.groups().yield_fractions();
    let gen_time = p.generation_time();
    let beta = p.beta_total();

    let rhs = |y: &[f64]| -> Vec<f64> {
        let n = y[0];
        let mut dy = vec![0.0; y.len()];
        dy[0] = (rho - beta) / gen_time * n
            + lambdas.iter().zip(&y[1..]).map(|(l, c)| l * c).sum::<f64>();
        for k in 0..lambdas.len() {
            dy[k + 1] = betas[k] / gen_time * n - lambdas[k] * y[k + 1];
        }
        dy
    };
    let axpy = |y: &[f64], a: f64, k: &[f64]| -> Vec<f64> {
        y.iter().zip(k).map(|(y, k)| y + a * k).collect()
    };

    let h = t / steps as f64;
    let mut y: Vec<f64> = std::iter::once(start.neutron_density)
        .chain(start.precursors.iter().copied())
        .collect();
    for _ in 0..steps {
        let k1 = rhs(&y);
        let k2 = rhs(&axpy(&y, 0.5 * h, &k1));
        let k3 = rhs(&axpy(&y, 0.5 * h, &k2));
        let k4 = rhs(&axpy(&y, h, &k3));
        for i in 0..y.len() {
            y[i] += h / 6.0 * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]);
        }
    }
    KineticsState::new(y[0], y[1..].to_vec())
}

fn rel_err(a: f64, b: f64) -> f64 {
    (a - b).abs() / b.abs().max(1e-300)
}

#[test]
fn critical_equilibrium_stays_put() {
    for (betas, gen_time) in [(RAMP_BETAS, 2.0e-5), (INSERTION_BETAS, 5.0e-4)] {
        let p = params(&LAMBDAS, &betas, gen_time);
        let state = KineticsState::equilibrium(&p, 1.0);
        let engine = AnalyticEngine::default();

        for t in [0.001, 0.1, 1.0, 10.0, 100.0] {
            let next = engine.advance(&p, &state, 0.0, t).unwrap();
            assert!(
                rel_err(next.neutron_density, 1.0) < 1e-8,
                "n({t}) = {}",
                next.neutron_density
            );
            for (c_new, c_old) in next.precursors.iter().zip(&state.precursors) {
                assert!(rel_err(*c_new, *c_old) < 1e-8, "C drifted at t={t}");
            }
        }
    }
}

#[test]
fn zero_elapsed_time_returns_the_start_state() {
    let p = params(&LAMBDAS, &RAMP_BETAS, 2.0e-5);
    let start = KineticsState::new(
        1.3,
        KineticsState::equilibrium(&p, 1.0).precursors,
    );
    let engine = AnalyticEngine::default();
    let rho = 0.2 * p.beta_total();

    let modes = engine.expand(&p, &start, rho).unwrap();
    assert!(rel_err(modes.factor_sum(), 1.3) < 1e-10);

    let same = engine.advance(&p, &start, rho, 0.0).unwrap();
    assert!(rel_err(same.neutron_density, 1.3) < 1e-10);
    for (a, b) in same.precursors.iter().zip(&start.precursors) {
        assert!(rel_err(*a, *b) < 1e-12);
    }
}

#[test]
fn one_dollar_negative_step_drops_density() {
    let p = params(&LAMBDAS, &INSERTION_BETAS, 5.0e-4);
    let start = KineticsState::equilibrium(&p, 1.0);
    let rho = -p.beta_total();

    let n = AnalyticEngine::default()
        .advance(&p, &start, rho, 10.0)
        .unwrap()
        .neutron_density;
    assert!(n > 0.0 && n < 1.0, "n(10) = {n}");
}

#[test]
fn matches_fine_step_integration() {
    let p = params(&[0.08, 1.2], &[0.002, 0.0045], 1.0e-3);
    let start = KineticsState::equilibrium(&p, 1.0);
    let rho = 0.002;
    let t = 2.0;

    let analytic = AnalyticEngine::default().advance(&p, &start, rho, t).unwrap();
    let reference = reference_rk4(&p, &start, rho, t, 20_000);

    assert!(
        rel_err(analytic.neutron_density, reference.neutron_density) < 1e-8,
        "analytic {} vs reference {}",
        analytic.neutron_density,
        reference.neutron_density
    );
    for (a, r) in analytic.precursors.iter().zip(&reference.precursors) {
        assert!(rel_err(*a, *r) < 1e-8, "analytic {a} vs reference {r}");
    }
}

#[test]
fn single_group_matches_fine_step_integration() {
    let p = params(&[0.0767], &[0.0065], 1.0e-4);
    let start = KineticsState::new(1.0, vec![50.0]);
    let rho = -0.003;
    let t = 0.5;

    let analytic = AnalyticEngine::default().advance(&p, &start, rho, t).unwrap();
    let reference = reference_rk4(&p, &start, rho, t, 50_000);

    assert!(rel_err(analytic.neutron_density, reference.neutron_density) < 1e-8);
    assert!(rel_err(analytic.precursors[0], reference.precursors[0]) < 1e-8);
}

#[test]
fn legacy_rounding_still_solves() {
    let p = params(&LAMBDAS, &RAMP_BETAS, 2.0e-5);
    let start = KineticsState::equilibrium(&p, 1.0);
    let engine = AnalyticEngine::new(EngineOptions {
        rounding: SumRounding::Decimals(8),
        ..EngineOptions::default()
    });

    let n = engine.advance(&p, &start, 0.0, 1.0).unwrap().neutron_density;
    assert!(n.is_finite());
    assert!((n - 1.0).abs() < 1e-2);
}

#[test]
fn rejects_negative_interval() {
    let p = params(&LAMBDAS, &RAMP_BETAS, 2.0e-5);
    let start = KineticsState::equilibrium(&p, 1.0);
    let err = AnalyticEngine::default()
        .advance(&p, &start, 0.0, -1.0)
        .unwrap_err();
    assert!(matches!(err, SolverError::Config(_)));
}

#[test]
fn rejects_mismatched_state() {
    let p = params(&LAMBDAS, &RAMP_BETAS, 2.0e-5);
    let start = KineticsState::new(1.0, vec![1.0; 4]);
    let err = AnalyticEngine::default()
        .advance(&p, &start, 0.0, 1.0)
        .unwrap_err();
    assert!(matches!(err, SolverError::Config(_)));
}

#[test]
fn coincident_decay_constants_report_degenerate_root() {
    // β = 0 decouples the groups: P = (s − ρ/Λ)(s + λ_1)(s + λ_2)
    let engine = AnalyticEngine::default();
    for gap in [0.0, 1e-12, 1e-10] {
        let p = params(&[0.1, 0.1 + gap], &[0.0, 0.0], 1.0e-3);
        let start = KineticsState::new(1.0, vec![0.0, 0.0]);
        let err = engine.expand(&p, &start, 0.001).unwrap_err();
        assert!(
            matches!(err, SolverError::DegenerateRoot { re, .. } if (re + 0.1).abs() < 1e-6),
            "gap {gap}: {err:?}"
        );
    }

    let p = params(&[0.1, 0.11], &[0.0, 0.0], 1.0e-3);
    let start = KineticsState::new(1.0, vec![0.0, 0.0]);
    let modes = engine.expand(&p, &start, 0.001).unwrap();
    assert!((modes.factor_sum() - 1.0).abs() < 1e-9);
}

#[test]
fn six_group_sets_have_simple_roots() {
    let engine = AnalyticEngine::default();
    for (betas, gen_time) in [(RAMP_BETAS, 2.0e-5), (INSERTION_BETAS, 5.0e-4)] {
        let p = params(&LAMBDAS, &betas, gen_time);
        let start = KineticsState::equilibrium(&p, 1.0);
        for dollars in [-10.0, -1.0, 0.0, 0.1, 0.5, 0.99, 1.5] {
            let rho = p.dollars_to_reactivity(dollars);
            let modes = engine.expand(&p, &start, rho).unwrap();
            assert_eq!(modes.roots().len(), 7);
        }
    }
}

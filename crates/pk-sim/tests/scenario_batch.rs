//! Integration test: scenario programs and parallel batches.

use pk_core::{GroupSet, KineticsParams, KineticsState};
use pk_sim::{
    InsertionSpec, RampSpec, ReactivityProgram, Scenario, ScenarioOutcome, SimError, run_batch,
};
use pk_solver::AnalyticEngine;

fn params() -> KineticsParams {
    let groups = GroupSet::new(
        vec![0.0127, 0.0317, 0.115, 0.311, 1.40, 3.87],
        vec![0.000285, 0.0015975, 0.00141, 0.0030525, 0.00096, 0.000195],
    )
    .unwrap();
    KineticsParams::new(groups, 5.0e-4).unwrap()
}

fn scenario(name: &str, program: ReactivityProgram) -> Scenario {
    let params = params();
    let initial = KineticsState::equilibrium(&params, 1.0);
    Scenario {
        name: name.to_string(),
        params,
        initial,
        program,
    }
}

fn scenarios() -> Vec<Scenario> {
    let beta = params().beta_total();
    vec![
        scenario(
            "slow-ramp",
            ReactivityProgram::Ramp(RampSpec::new(0.1, 1.0, 0.01)),
        ),
        scenario(
            "ten-cent-step",
            ReactivityProgram::SingleInsertion(InsertionSpec {
                reactivity: 0.1 * beta,
                time_s: 5.0,
            }),
        ),
        scenario(
            "scram",
            ReactivityProgram::SingleInsertion(InsertionSpec {
                reactivity: -5.0 * beta,
                time_s: 1.0,
            }),
        ),
        scenario(
            "bad-step",
            ReactivityProgram::Ramp(RampSpec::new(0.1, 1.0, -0.01)),
        ),
    ]
}

#[test]
fn ramp_scenario_reports_every_record() {
    let engine = AnalyticEngine::default();
    let s = scenario(
        "ramp",
        ReactivityProgram::Ramp(RampSpec::new(0.2, 0.5, 0.01)),
    );

    let mut seen = Vec::new();
    let outcome = s
        .run_with(&engine, |record| seen.push(record.index))
        .unwrap();

    assert_eq!(seen, (0..50).collect::<Vec<_>>());
    match &outcome {
        ScenarioOutcome::Ramp(records) => assert_eq!(records.len(), 50),
        other => panic!("unexpected outcome {other:?}"),
    }
    assert!(outcome.final_state().unwrap().neutron_density > 1.0);
    assert!((s.program.end_time_s() - 0.5).abs() < 1e-12);
}

#[test]
fn marcher_is_only_offered_for_ramps() {
    let engine = AnalyticEngine::default();
    let all = scenarios();
    assert!(all[0].marcher(&engine).is_some());
    assert!(all[1].marcher(&engine).is_none());

    let lazy: Vec<_> = all[0]
        .marcher(&engine)
        .unwrap()
        .unwrap()
        .take(3)
        .map(|r| r.unwrap().index)
        .collect();
    assert_eq!(lazy, vec![0, 1, 2]);
}

#[test]
fn batch_preserves_order_and_matches_serial_runs() {
    let engine = AnalyticEngine::default();
    let all = scenarios();

    let parallel = run_batch(&all, &engine);
    assert_eq!(parallel.len(), all.len());

    for (scenario, result) in all.iter().zip(&parallel) {
        let serial = scenario.run(&engine);
        assert_eq!(&serial, result, "scenario {}", scenario.name);
    }

    let step = parallel[1].as_ref().unwrap().final_state().unwrap();
    assert!(step.neutron_density > 1.0);
    let scram = parallel[2].as_ref().unwrap().final_state().unwrap();
    assert!(scram.neutron_density > 0.0 && scram.neutron_density < 0.5);
    assert!(matches!(parallel[3], Err(SimError::InvalidArg { .. })));
}

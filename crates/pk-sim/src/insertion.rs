//! Step insertion: reactivity constant from t = 0 on.
//!
//! One factorisation is exact for any elapsed time, so there is no marching.

use pk_core::{KineticsParams, KineticsState, Real, ensure_finite};
use pk_solver::{AnalyticEngine, ModalExpansion};

use crate::error::{SimError, SimResult};

/// Constant reactivity held from t = 0 until `time_s`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InsertionSpec {
    /// Absolute reactivity.
    pub reactivity: Real,
    /// Elapsed time at which the solution is evaluated (s).
    pub time_s: Real,
}

/// Solution of a step insertion at one time.
#[derive(Clone, Debug, PartialEq)]
pub struct InsertionResult {
    pub time_s: Real,
    pub reactivity: Real,
    pub state: KineticsState,
}

impl InsertionResult {
    pub fn neutron_density(&self) -> Real {
        self.state.neutron_density
    }
}

/// Modal expansion for a fixed insertion, evaluable at any t ≥ 0.
#[derive(Clone, Debug)]
pub struct InsertionEvaluator<'a> {
    params: &'a KineticsParams,
    initial: KineticsState,
    reactivity: Real,
    modes: ModalExpansion,
}

impl<'a> InsertionEvaluator<'a> {
    pub fn new(
        engine: &AnalyticEngine,
        params: &'a KineticsParams,
        initial: KineticsState,
        reactivity: Real,
    ) -> SimResult<Self> {
        initial.validate(params)?;
        let modes = engine.expand(params, &initial, reactivity)?;
        tracing::debug!(
            reactivity,
            dollars = params.reactivity_to_dollars(reactivity),
            modes = modes.roots().len(),
            "insertion expanded"
        );
        Ok(Self {
            params,
            initial,
            reactivity,
            modes,
        })
    }

    pub fn modes(&self) -> &ModalExpansion {
        &self.modes
    }

    pub fn state_at(&self, t: Real) -> SimResult<InsertionResult> {
        ensure_finite(t, "insertion time")?;
        if t < 0.0 {
            return Err(SimError::InvalidArg {
                what: "insertion time must be non-negative",
            });
        }
        let state = self.modes.state_at(self.params, &self.initial, t)?;
        Ok(InsertionResult {
            time_s: t,
            reactivity: self.reactivity,
            state,
        })
    }

    pub fn neutron_density(&self, t: Real) -> SimResult<Real> {
        Ok(self.state_at(t)?.state.neutron_density)
    }

    /// Evaluate at several times from the same expansion.
    pub fn sample(&self, times: &[Real]) -> SimResult<Vec<InsertionResult>> {
        times.iter().map(|&t| self.state_at(t)).collect()
    }
}

/// Build once, evaluate once at `spec.time_s`.
pub fn evaluate_insertion(
    engine: &AnalyticEngine,
    params: &KineticsParams,
    initial: KineticsState,
    spec: InsertionSpec,
) -> SimResult<InsertionResult> {
    let result = InsertionEvaluator::new(engine, params, initial, spec.reactivity)?
        .state_at(spec.time_s)?;
    tracing::info!(
        time_s = result.time_s,
        n = result.state.neutron_density,
        "insertion evaluated"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pk_core::GroupSet;

    fn params() -> KineticsParams {
        let groups = GroupSet::new(vec![0.08, 1.2], vec![0.002, 0.0045]).unwrap();
        KineticsParams::new(groups, 1.0e-3).unwrap()
    }

    #[test]
    fn rejects_negative_time() {
        let p = params();
        let start = KineticsState::equilibrium(&p, 1.0);
        let eval = InsertionEvaluator::new(&AnalyticEngine::default(), &p, start, 0.001).unwrap();
        assert!(matches!(
            eval.state_at(-1.0),
            Err(SimError::InvalidArg { .. })
        ));
    }

    #[test]
    fn sampling_matches_single_evaluations() {
        let p = params();
        let start = KineticsState::equilibrium(&p, 1.0);
        let engine = AnalyticEngine::default();
        let eval = InsertionEvaluator::new(&engine, &p, start.clone(), 0.001).unwrap();

        let times = [0.0, 0.5, 2.0];
        let samples = eval.sample(&times).unwrap();
        assert_eq!(samples.len(), 3);
        for (sample, &t) in samples.iter().zip(&times) {
            let single = evaluate_insertion(
                &engine,
                &p,
                start.clone(),
                InsertionSpec {
                    reactivity: 0.001,
                    time_s: t,
                },
            )
            .unwrap();
            assert_eq!(sample.state, single.state);
        }
        assert!((samples[0].neutron_density() - 1.0).abs() < 1e-10);
    }
}

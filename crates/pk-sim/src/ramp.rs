//! Linear reactivity ramp marched interval by interval.
//!
//! The ramp is replaced by a staircase: on interval k the reactivity is the
//! mean of the ramp at both interval ends, which for a linear ramp is the
//! value at the midpoint. Each stair is then solved exactly by the engine and
//! its end state seeds the next one.

use std::iter::FusedIterator;

use pk_core::{KineticsParams, KineticsState, Real};
use pk_solver::AnalyticEngine;

use crate::error::{SimError, SimResult};

/// Guard against Target/Δt landing a hair below an integer.
const INTERVAL_COUNT_GUARD: Real = 1e-9;

/// Ramp definition: ρ(t) = ρ0 + γ·β·t, marched with fixed step Δt.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RampSpec {
    /// γ, in dollars per second.
    pub slope_dollars_per_s: Real,
    /// ρ0, absolute reactivity at t = 0.
    pub initial_reactivity: Real,
    /// Total marched time (s).
    pub horizon_s: Real,
    /// Fixed interval length (s).
    pub dt_s: Real,
}

impl RampSpec {
    pub fn new(slope_dollars_per_s: Real, horizon_s: Real, dt_s: Real) -> Self {
        Self {
            slope_dollars_per_s,
            initial_reactivity: 0.0,
            horizon_s,
            dt_s,
        }
    }

    pub fn with_initial_reactivity(mut self, rho0: Real) -> Self {
        self.initial_reactivity = rho0;
        self
    }

    pub fn validate(&self) -> SimResult<()> {
        if !self.dt_s.is_finite() || self.dt_s <= 0.0 {
            return Err(SimError::InvalidArg {
                what: "dt must be positive",
            });
        }
        if !self.horizon_s.is_finite() || self.horizon_s < 0.0 {
            return Err(SimError::InvalidArg {
                what: "horizon must be non-negative",
            });
        }
        if !self.slope_dollars_per_s.is_finite() || !self.initial_reactivity.is_finite() {
            return Err(SimError::InvalidArg {
                what: "ramp slope and initial reactivity must be finite",
            });
        }
        Ok(())
    }

    /// floor(horizon / Δt).
    pub fn interval_count(&self) -> usize {
        let ratio = self.horizon_s / self.dt_s;
        (ratio * (1.0 + INTERVAL_COUNT_GUARD)).floor() as usize
    }

    /// Ramp reactivity at time `t`.
    pub fn reactivity_at(&self, beta_total: Real, t: Real) -> Real {
        self.initial_reactivity + self.slope_dollars_per_s * beta_total * t
    }

    /// Trapezoidal mean of the ramp over interval `k`.
    pub fn interval_reactivity(&self, beta_total: Real, k: usize) -> Real {
        let t0 = k as Real * self.dt_s;
        let t1 = (k + 1) as Real * self.dt_s;
        0.5 * (self.reactivity_at(beta_total, t0) + self.reactivity_at(beta_total, t1))
    }
}

/// State at the end of one marched interval.
#[derive(Clone, Debug, PartialEq)]
pub struct RampRecord {
    /// 0-based interval index.
    pub index: usize,
    /// Elapsed time at the end of the interval (s).
    pub time_s: Real,
    /// Reactivity held over the interval.
    pub reactivity: Real,
    pub state: KineticsState,
}

/// Lazy producer of [`RampRecord`]s, one per interval.
///
/// Not resumable: a fresh marcher starts again from t = 0. After an error the
/// iterator is exhausted.
pub struct RampMarcher<'a> {
    engine: &'a AnalyticEngine,
    params: &'a KineticsParams,
    spec: RampSpec,
    beta_total: Real,
    state: KineticsState,
    next_index: usize,
    intervals: usize,
    failed: bool,
}

impl<'a> RampMarcher<'a> {
    pub fn new(
        engine: &'a AnalyticEngine,
        params: &'a KineticsParams,
        initial: KineticsState,
        spec: RampSpec,
    ) -> SimResult<Self> {
        spec.validate()?;
        initial.validate(params)?;

        let intervals = spec.interval_count();
        tracing::info!(
            intervals,
            dt_s = spec.dt_s,
            slope_dollars_per_s = spec.slope_dollars_per_s,
            groups = params.group_count(),
            "starting ramp march"
        );

        Ok(Self {
            engine,
            params,
            spec,
            beta_total: params.beta_total(),
            state: initial,
            next_index: 0,
            intervals,
            failed: false,
        })
    }

    /// State after the last completed interval.
    pub fn state(&self) -> &KineticsState {
        &self.state
    }

    pub fn completed(&self) -> usize {
        self.next_index
    }

    pub fn intervals(&self) -> usize {
        self.intervals
    }

    fn step(&mut self) -> SimResult<RampRecord> {
        let index = self.next_index;
        let rho = self.spec.interval_reactivity(self.beta_total, index);
        let next = self
            .engine
            .advance(self.params, &self.state, rho, self.spec.dt_s)
            .map_err(|source| SimError::Interval {
                index,
                start_s: index as Real * self.spec.dt_s,
                source,
            })?;

        let time_s = (index + 1) as Real * self.spec.dt_s;
        tracing::debug!(index, time_s, rho, n = next.neutron_density, "interval complete");

        self.state = next.clone();
        self.next_index += 1;
        if self.next_index == self.intervals {
            tracing::info!(
                intervals = self.intervals,
                n = self.state.neutron_density,
                "ramp march finished"
            );
        }

        Ok(RampRecord {
            index,
            time_s,
            reactivity: rho,
            state: next,
        })
    }
}

impl Iterator for RampMarcher<'_> {
    type Item = SimResult<RampRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.next_index >= self.intervals {
            return None;
        }
        let result = self.step();
        if let Err(err) = &result {
            tracing::error!(%err, "ramp march aborted");
            self.failed = true;
        }
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            return (0, Some(0));
        }
        let remaining = self.intervals - self.next_index;
        (0, Some(remaining))
    }
}

impl FusedIterator for RampMarcher<'_> {}

/// Run a ramp to completion, keeping every record.
pub fn run_ramp(
    engine: &AnalyticEngine,
    params: &KineticsParams,
    initial: KineticsState,
    spec: RampSpec,
) -> SimResult<Vec<RampRecord>> {
    RampMarcher::new(engine, params, initial, spec)?.collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_count_survives_float_division() {
        assert_eq!(RampSpec::new(0.1, 2.0, 0.001).interval_count(), 2000);
        assert_eq!(RampSpec::new(0.1, 0.3, 0.1).interval_count(), 3);
        assert_eq!(RampSpec::new(0.1, 0.25, 0.1).interval_count(), 2);
        assert_eq!(RampSpec::new(0.1, 0.0, 0.1).interval_count(), 0);
    }

    #[test]
    fn interval_reactivity_is_midpoint_value() {
        let spec = RampSpec::new(0.1, 2.0, 0.001).with_initial_reactivity(1e-4);
        let beta = 0.007;
        for k in [0usize, 1, 57, 1999] {
            let mid = (k as f64 + 0.5) * spec.dt_s;
            let expected = spec.reactivity_at(beta, mid);
            assert!((spec.interval_reactivity(beta, k) - expected).abs() < 1e-15);
        }
        // first interval of a zero-offset ramp: γβΔt/2
        let spec = RampSpec::new(0.1, 2.0, 0.001);
        assert!((spec.interval_reactivity(beta, 0) - 0.1 * beta * 0.0005).abs() < 1e-18);
    }

    #[test]
    fn validate_rejects_bad_steps() {
        assert!(RampSpec::new(0.1, 1.0, 0.0).validate().is_err());
        assert!(RampSpec::new(0.1, 1.0, -0.1).validate().is_err());
        assert!(RampSpec::new(0.1, -1.0, 0.1).validate().is_err());
        assert!(RampSpec::new(f64::NAN, 1.0, 0.1).validate().is_err());
        assert!(RampSpec::new(0.1, 1.0, 0.1).validate().is_ok());
    }
}

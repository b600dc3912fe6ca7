//! One-interval analytic engine shared by every driver.

use pk_core::{KineticsParams, KineticsState, PkError, Real, ensure_finite};

use crate::error::SolverResult;
use crate::polynomial::PolynomialSet;
use crate::residue::ModalExpansion;
use crate::roots::{RootConfig, find_roots};
use crate::symmetric::SumRounding;

/// Default relative tolerance for the repeated-root check.
const DEFAULT_DEGENERATE_TOLERANCE: Real = 1e-6;

/// Engine configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngineOptions {
    /// Rounding applied to symmetric sums.
    pub rounding: SumRounding,
    /// Root solver settings.
    pub roots: RootConfig,
    /// Relative root separation (and |P′(r)| threshold) below which a root
    /// counts as repeated.
    pub degenerate_tolerance: Real,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            rounding: SumRounding::Exact,
            roots: RootConfig::default(),
            degenerate_tolerance: DEFAULT_DEGENERATE_TOLERANCE,
        }
    }
}

/// Builds the polynomials, finds the roots and composes the residues.
///
/// Stateless between calls: every interval starts from scratch.
#[derive(Clone, Debug, Default)]
pub struct AnalyticEngine {
    options: EngineOptions,
}

impl AnalyticEngine {
    pub fn new(options: EngineOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Modal expansion of the solution starting from `state` under constant `rho`.
    pub fn expand(
        &self,
        params: &KineticsParams,
        state: &KineticsState,
        rho: Real,
    ) -> SolverResult<ModalExpansion> {
        let polys = PolynomialSet::build(params, rho, state, self.options.rounding)?;
        let roots = find_roots(&polys.p, &self.options.roots)?;
        ModalExpansion::from_roots(
            roots,
            &polys,
            state.neutron_density,
            self.options.degenerate_tolerance,
        )
    }

    /// State after `dt` seconds of constant reactivity `rho`.
    pub fn advance(
        &self,
        params: &KineticsParams,
        state: &KineticsState,
        rho: Real,
        dt: Real,
    ) -> SolverResult<KineticsState> {
        ensure_finite(dt, "interval duration")?;
        if dt < 0.0 {
            return Err(PkError::InvalidArg {
                what: "interval duration must be non-negative",
            }
            .into());
        }
        let modes = self.expand(params, state, rho)?;
        let next = modes.state_at(params, state, dt)?;
        tracing::trace!(rho, dt, n = next.neutron_density, "interval advanced");
        Ok(next)
    }
}

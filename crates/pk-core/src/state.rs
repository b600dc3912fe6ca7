//! Instantaneous point-kinetics state.

use crate::error::{PkError, PkResult};
use crate::groups::KineticsParams;
use crate::numeric::{Real, ensure_finite};

/// Neutron density and per-group precursor concentrations.
#[derive(Clone, Debug, PartialEq)]
pub struct KineticsState {
    /// Neutron density relative to a reference.
    pub neutron_density: Real,
    /// Precursor concentrations, index-aligned with the group set.
    pub precursors: Vec<Real>,
}

impl KineticsState {
    pub fn new(neutron_density: Real, precursors: Vec<Real>) -> Self {
        Self {
            neutron_density,
            precursors,
        }
    }

    /// Critical equilibrium at density `n0`: C_k = n0·β_k / (Λ·λ_k).
    pub fn equilibrium(params: &KineticsParams, n0: Real) -> Self {
        let lambda_m = params.generation_time();
        let precursors = params
            .groups()
            .iter()
            .map(|g| g.yield_fraction / (g.decay_constant * lambda_m) * n0)
            .collect();
        Self::new(n0, precursors)
    }

    /// Check the state is usable with `params`.
    pub fn validate(&self, params: &KineticsParams) -> PkResult<()> {
        ensure_finite(self.neutron_density, "neutron density")?;
        if self.precursors.len() != params.group_count() {
            return Err(PkError::LengthMismatch {
                what: "precursor concentrations vs precursor groups",
                expected: params.group_count(),
                found: self.precursors.len(),
            });
        }
        for (index, &c) in self.precursors.iter().enumerate() {
            if !c.is_finite() {
                return Err(PkError::InvalidEntry {
                    what: "precursor concentration (must be finite)",
                    index,
                    value: c,
                });
            }
        }
        Ok(())
    }
}

//! Delayed-neutron precursor groups and point-kinetics parameters.

use crate::error::{PkError, PkResult};
use crate::numeric::{Real, compensated_sum};
use crate::units::{Frequency, Ratio, Time, fraction, per_second, seconds};

/// One delayed-neutron precursor group.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PrecursorGroup {
    /// Decay constant λ (1/s), strictly positive.
    pub decay_constant: Real,
    /// Delayed yield fraction β, non-negative.
    pub yield_fraction: Real,
}

impl PrecursorGroup {
    pub fn new(decay_constant: Real, yield_fraction: Real) -> Self {
        Self {
            decay_constant,
            yield_fraction,
        }
    }

    pub fn from_si(decay_constant: Frequency, yield_fraction: Ratio) -> Self {
        Self::new(per_second(decay_constant), fraction(yield_fraction))
    }
}

/// Ordered, validated set of precursor groups.
///
/// Decay constants and yields are stored as two index-aligned vectors because
/// every consumer (symmetric sums, polynomial builders) walks them separately.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupSet {
    decay_constants: Vec<Real>,
    yield_fractions: Vec<Real>,
}

impl GroupSet {
    /// Build a group set from aligned λ and β sequences.
    pub fn new(decay_constants: Vec<Real>, yield_fractions: Vec<Real>) -> PkResult<Self> {
        if decay_constants.is_empty() {
            return Err(PkError::InvalidArg {
                what: "at least one precursor group is required",
            });
        }
        if decay_constants.len() != yield_fractions.len() {
            return Err(PkError::LengthMismatch {
                what: "yield fractions vs decay constants",
                expected: decay_constants.len(),
                found: yield_fractions.len(),
            });
        }
        for (index, &lambda) in decay_constants.iter().enumerate() {
            if !lambda.is_finite() || lambda <= 0.0 {
                return Err(PkError::InvalidEntry {
                    what: "decay constant (must be finite and > 0)",
                    index,
                    value: lambda,
                });
            }
        }
        for (index, &beta) in yield_fractions.iter().enumerate() {
            if !beta.is_finite() || beta < 0.0 {
                return Err(PkError::InvalidEntry {
                    what: "yield fraction (must be finite and >= 0)",
                    index,
                    value: beta,
                });
            }
        }
        Ok(Self {
            decay_constants,
            yield_fractions,
        })
    }

    pub fn from_groups(groups: &[PrecursorGroup]) -> PkResult<Self> {
        Self::new(
            groups.iter().map(|g| g.decay_constant).collect(),
            groups.iter().map(|g| g.yield_fraction).collect(),
        )
    }

    /// Number of groups N.
    pub fn len(&self) -> usize {
        self.decay_constants.len()
    }

    /// Always false for a constructed set; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.decay_constants.is_empty()
    }

    pub fn decay_constants(&self) -> &[Real] {
        &self.decay_constants
    }

    pub fn yield_fractions(&self) -> &[Real] {
        &self.yield_fractions
    }

    pub fn iter(&self) -> impl Iterator<Item = PrecursorGroup> + '_ {
        self.decay_constants
            .iter()
            .zip(&self.yield_fractions)
            .map(|(&l, &b)| PrecursorGroup::new(l, b))
    }

    /// Total delayed fraction β = Σβ_k.
    pub fn beta_total(&self) -> Real {
        compensated_sum(self.yield_fractions.iter().copied())
    }
}

/// Point-kinetics parameters: precursor groups plus prompt generation time Λ.
#[derive(Clone, Debug, PartialEq)]
pub struct KineticsParams {
    groups: GroupSet,
    generation_time: Real,
}

impl KineticsParams {
    pub fn new(groups: GroupSet, generation_time: Real) -> PkResult<Self> {
        if !generation_time.is_finite() {
            return Err(PkError::NonFinite {
                what: "generation time",
                value: generation_time,
            });
        }
        if generation_time <= 0.0 {
            return Err(PkError::InvalidArg {
                what: "generation time must be positive",
            });
        }
        Ok(Self {
            groups,
            generation_time,
        })
    }

    pub fn from_si(groups: GroupSet, generation_time: Time) -> PkResult<Self> {
        Self::new(groups, seconds(generation_time))
    }

    pub fn groups(&self) -> &GroupSet {
        &self.groups
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Prompt neutron generation time Λ (s).
    pub fn generation_time(&self) -> Real {
        self.generation_time
    }

    pub fn beta_total(&self) -> Real {
        self.groups.beta_total()
    }

    /// Convert a reactivity in dollars (ρ/β) to absolute reactivity.
    pub fn dollars_to_reactivity(&self, dollars: Real) -> Real {
        dollars * self.beta_total()
    }

    /// Convert an absolute reactivity to dollars.
    pub fn reactivity_to_dollars(&self, rho: Real) -> Real {
        rho / self.beta_total()
    }
}

//! Partial-fraction composition of the interval solution.
//!
//! For simple roots r_i of P the inverse Laplace transform of
//! (n0·Q + H)/P is Σ_i F_i·exp(r_i t) with F_i = (n0·Q(r_i) + H(r_i)) / P′(r_i).

use nalgebra::Complex;
use pk_core::{CompensatedSum, KineticsParams, KineticsState, PkError, Real};

use crate::error::{SolverError, SolverResult};
use crate::polynomial::PolynomialSet;

/// Below this |(r + λ)·Δt| the precursor kernel uses its series limit.
const KERNEL_SERIES_THRESHOLD: Real = 1e-8;

/// Imaginary parts above this (relative) are reported as drift.
const IMAG_WARN_REL: Real = 1e-8;

/// Exponential modes of one interval: rates (roots of P) and amplitudes.
#[derive(Clone, Debug, PartialEq)]
pub struct ModalExpansion {
    roots: Vec<Complex<Real>>,
    factors: Vec<Complex<Real>>,
}

impl ModalExpansion {
    /// Compute residue factors for `roots` at neutron density `n0`.
    ///
    /// Fails with [`SolverError::DegenerateRoot`] when a root sits within
    /// `degenerate_tolerance` (relative) of another root, or when |P′(r)| is
    /// below `degenerate_tolerance` times the magnitude of P′'s terms at r.
    /// Eigen-solvers split an exact double root into a pair about √ε·|r|
    /// apart, so the tolerance must sit well above √ε.
    pub fn from_roots(
        roots: Vec<Complex<Real>>,
        polys: &PolynomialSet,
        n0: Real,
        degenerate_tolerance: Real,
    ) -> SolverResult<Self> {
        let mut factors = Vec::with_capacity(roots.len());
        for (i, &r) in roots.iter().enumerate() {
            let derivative = polys.dp.evaluate(r);
            let separation = nearest_separation(&roots, i);
            if separation <= degenerate_tolerance
                || derivative.norm() <= degenerate_tolerance * polys.dp.magnitude_at(r)
            {
                return Err(SolverError::DegenerateRoot {
                    re: r.re,
                    im: r.im,
                    derivative: derivative.norm(),
                    separation,
                    tolerance: degenerate_tolerance,
                });
            }
            let numerator = polys.q.evaluate(r) * n0 + polys.h.evaluate(r);
            let factor = numerator / derivative;
            if !factor.re.is_finite() || !factor.im.is_finite() {
                return Err(SolverError::Numeric {
                    what: format!("non-finite residue at root {r}"),
                });
            }
            factors.push(factor);
        }
        Ok(Self { roots, factors })
    }

    pub fn roots(&self) -> &[Complex<Real>] {
        &self.roots
    }

    pub fn factors(&self) -> &[Complex<Real>] {
        &self.factors
    }

    /// Σ F_i, equal to n0 for a consistent expansion.
    pub fn factor_sum(&self) -> Real {
        real_part(sum_complex(self.factors.iter().copied()), "residue sum")
    }

    /// n(Δt) = Σ F_i·exp(r_i Δt).
    pub fn neutron_density(&self, dt: Real) -> Real {
        let terms = self
            .roots
            .iter()
            .zip(&self.factors)
            .map(|(&r, &f)| f * (r * dt).exp());
        real_part(sum_complex(terms), "neutron density")
    }

    /// C_k(Δt) for every group, given the concentrations at the interval start.
    pub fn precursors(&self, params: &KineticsParams, c_old: &[Real], dt: Real) -> Vec<Real> {
        let lambda_m = params.generation_time();
        params
            .groups()
            .iter()
            .zip(c_old)
            .map(|(g, &c)| {
                let decay = (-g.decay_constant * dt).exp();
                if g.yield_fraction == 0.0 {
                    return c * decay;
                }
                let terms = self
                    .roots
                    .iter()
                    .zip(&self.factors)
                    .map(|(&r, &f)| f * kernel(r, g.decay_constant, dt));
                let convolution = real_part(sum_complex(terms), "precursor concentration");
                g.yield_fraction / lambda_m * convolution + c * decay
            })
            .collect()
    }

    /// Full state at Δt.
    pub fn state_at(
        &self,
        params: &KineticsParams,
        start: &KineticsState,
        dt: Real,
    ) -> SolverResult<KineticsState> {
        if start.precursors.len() != params.group_count() {
            return Err(PkError::LengthMismatch {
                what: "precursor concentrations vs precursor groups",
                expected: params.group_count(),
                found: start.precursors.len(),
            }
            .into());
        }
        let state = KineticsState::new(
            self.neutron_density(dt),
            self.precursors(params, &start.precursors, dt),
        );
        if !state.neutron_density.is_finite() || state.precursors.iter().any(|c| !c.is_finite()) {
            return Err(SolverError::Numeric {
                what: format!("solution is not finite after {dt} s"),
            });
        }
        Ok(state)
    }
}

/// (exp(r Δt) − exp(−λ Δt)) / (r + λ), continuous through r = −λ.
fn kernel(r: Complex<Real>, lambda: Real, dt: Real) -> Complex<Real> {
    let shift = r + lambda;
    let decay = (-lambda * dt).exp();
    let z = shift * dt;
    if z.norm() < KERNEL_SERIES_THRESHOLD {
        return (Complex::new(1.0, 0.0) + z * 0.5) * (dt * decay);
    }
    ((r * dt).exp() - decay) / shift
}

/// Distance from `roots[i]` to its nearest neighbour, relative to the larger modulus.
fn nearest_separation(roots: &[Complex<Real>], i: usize) -> Real {
    let r = roots[i];
    roots
        .iter()
        .enumerate()
        .filter(|&(j, _)| j != i)
        .map(|(_, &other)| {
            let scale = r.norm().max(other.norm());
            if scale == 0.0 {
                0.0
            } else {
                (r - other).norm() / scale
            }
        })
        .fold(Real::INFINITY, Real::min)
}

fn sum_complex<I: Iterator<Item = Complex<Real>>>(terms: I) -> Complex<Real> {
    let mut re = CompensatedSum::new();
    let mut im = CompensatedSum::new();
    for t in terms {
        re.add(t.re);
        im.add(t.im);
    }
    Complex::new(re.total(), im.total())
}

fn real_part(value: Complex<Real>, what: &'static str) -> Real {
    if value.im.abs() > IMAG_WARN_REL * value.re.abs().max(1.0) {
        tracing::warn!(what, re = value.re, im = value.im, "non-negligible imaginary part");
    }
    value.re
}

//! Characteristic and forcing polynomials for one interval.
//!
//! With u = (ρ − β)/Λ and Q(s) = Π_k (s + λ_k), the Laplace transform of the
//! neutron density over an interval of constant ρ is
//!
//! ```text
//! N(s) = (n0·Q(s) + H(s)) / P(s)
//! P(s) = (s − u)·Q(s) − (1/Λ)·Σ_k λ_k β_k Π_{j≠k}(s + λ_j)
//! H(s) = Σ_k λ_k C_k Π_{j≠k}(s + λ_j)
//! ```
//!
//! All coefficient vectors are stored highest degree first.

use nalgebra::Complex;
use pk_core::{CompensatedSum, GroupSet, KineticsParams, KineticsState, Real, ensure_finite};

use crate::error::SolverResult;
use crate::symmetric::{SumRounding, symmetric_table, symmetric_table_excluding};

/// Dense polynomial, coefficients highest degree first.
#[derive(Clone, Debug, PartialEq)]
pub struct Polynomial {
    coeffs: Vec<Real>,
}

impl Polynomial {
    pub fn new(coeffs: Vec<Real>) -> Self {
        Self { coeffs }
    }

    pub fn coefficients(&self) -> &[Real] {
        &self.coeffs
    }

    /// Degree as stored (leading zeros are not stripped).
    pub fn degree(&self) -> usize {
        self.coeffs.len().saturating_sub(1)
    }

    pub fn leading(&self) -> Real {
        self.coeffs.first().copied().unwrap_or(0.0)
    }

    /// Horner evaluation at a complex point.
    pub fn evaluate(&self, x: Complex<Real>) -> Complex<Real> {
        self.coeffs
            .iter()
            .fold(Complex::new(0.0, 0.0), |acc, &c| acc * x + c)
    }

    /// Horner evaluation at a real point.
    pub fn evaluate_real(&self, x: Real) -> Real {
        self.coeffs.iter().fold(0.0, |acc, &c| acc * x + c)
    }

    /// Σ |c_j|·|x|^(deg−j): the size of the terms that cancel in `evaluate`.
    pub fn magnitude_at(&self, x: Complex<Real>) -> Real {
        let r = x.norm();
        self.coeffs.iter().fold(0.0, |acc, &c| acc * r + c.abs())
    }

    /// Formal derivative. The constant term drops out.
    pub fn derivative(&self) -> Polynomial {
        let degree = self.degree();
        Polynomial::new(
            self.coeffs
                .iter()
                .take(degree)
                .enumerate()
                .map(|(j, &c)| c * (degree - j) as Real)
                .collect(),
        )
    }
}

/// Characteristic polynomial P, degree N+1.
///
/// P[0] = 1, P[1] = S₁ − u, and for i = 2..=N+1
/// P[i] = S_i − u·S_{i−1} − (1/Λ)·Σ_k λ_k β_k S_excl(k, i−2), with S_{N+1} = 0.
pub fn characteristic(params: &KineticsParams, rho: Real, rounding: SumRounding) -> Polynomial {
    let groups = params.groups();
    let lambdas = groups.decay_constants();
    let betas = groups.yield_fractions();
    let n = groups.len();
    let lambda_m = params.generation_time();
    let u = (rho - params.beta_total()) / lambda_m;

    let s = symmetric_table(lambdas, rounding);
    let s_at = |i: usize| s.get(i).copied().unwrap_or(0.0);
    let excl: Vec<Vec<Real>> = (0..n)
        .map(|k| symmetric_table_excluding(k, lambdas, rounding))
        .collect();

    let mut coeffs = Vec::with_capacity(n + 2);
    coeffs.push(1.0);
    coeffs.push(s_at(1) - u);
    for i in 2..=n + 1 {
        let coupling: CompensatedSum = (0..n)
            .map(|k| lambdas[k] * betas[k] * excl[k][i - 2])
            .collect();
        coeffs.push(s_at(i) - u * s_at(i - 1) - coupling.total() / lambda_m);
    }
    Polynomial::new(coeffs)
}

/// Forcing polynomial H, degree N−1: H[m] = Σ_k λ_k C_k S_excl(k, m).
pub fn forcing_h(groups: &GroupSet, precursors: &[Real], rounding: SumRounding) -> Polynomial {
    let lambdas = groups.decay_constants();
    let n = groups.len();
    let excl: Vec<Vec<Real>> = (0..n)
        .map(|k| symmetric_table_excluding(k, lambdas, rounding))
        .collect();

    let coeffs = (0..n)
        .map(|m| {
            (0..n)
                .map(|k| lambdas[k] * precursors[k] * excl[k][m])
                .collect::<CompensatedSum>()
                .total()
        })
        .collect();
    Polynomial::new(coeffs)
}

/// Forcing polynomial Q = Π_k (s + λ_k), degree N.
pub fn forcing_q(groups: &GroupSet, rounding: SumRounding) -> Polynomial {
    let mut coeffs = symmetric_table(groups.decay_constants(), rounding);
    coeffs[0] = 1.0;
    Polynomial::new(coeffs)
}

/// The four polynomials needed to compose one interval's solution.
#[derive(Clone, Debug, PartialEq)]
pub struct PolynomialSet {
    /// Characteristic polynomial P.
    pub p: Polynomial,
    /// P′.
    pub dp: Polynomial,
    /// Precursor forcing H.
    pub h: Polynomial,
    /// Neutron forcing Q.
    pub q: Polynomial,
}

impl PolynomialSet {
    /// Build P, P′, H and Q for reactivity `rho` from the current `state`.
    pub fn build(
        params: &KineticsParams,
        rho: Real,
        state: &KineticsState,
        rounding: SumRounding,
    ) -> SolverResult<Self> {
        ensure_finite(rho, "reactivity")?;
        state.validate(params)?;

        let p = characteristic(params, rho, rounding);
        let dp = p.derivative();
        let h = forcing_h(params.groups(), &state.precursors, rounding);
        let q = forcing_q(params.groups(), rounding);
        Ok(Self { p, dp, h, q })
    }
}

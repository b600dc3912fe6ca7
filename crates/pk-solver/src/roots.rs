//! Roots of the characteristic polynomial.
//!
//! Eigenvalues of the companion matrix via a real Schur decomposition, then a
//! few Newton steps on P itself to clean up the digits the eigen-solver loses
//! when the coefficients span many orders of magnitude (Λ ~ 1e-5 puts β/Λ in
//! P[1] next to constants of order 1e-5).

use nalgebra::linalg::Schur;
use nalgebra::{Complex, DMatrix};

use crate::error::{SolverError, SolverResult};
use crate::polynomial::Polynomial;

/// Root solver configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RootConfig {
    /// Maximum Schur (QR) iterations; 0 means unlimited.
    pub max_schur_iterations: usize,
    /// Newton polishing steps per root.
    pub polish_iterations: usize,
}

impl Default for RootConfig {
    fn default() -> Self {
        Self {
            max_schur_iterations: 10_000,
            polish_iterations: 3,
        }
    }
}

/// All roots of `poly`, in no particular order.
///
/// Repeated roots are returned as-is; the residue stage rejects them.
pub fn find_roots(poly: &Polynomial, config: &RootConfig) -> SolverResult<Vec<Complex<f64>>> {
    let coeffs = poly.coefficients();
    let degree = poly.degree();
    let lead = poly.leading();

    if degree == 0 {
        return Err(SolverError::RootFinding {
            what: "polynomial has no roots (degree 0)".to_string(),
        });
    }
    if lead == 0.0 || !lead.is_finite() {
        return Err(SolverError::RootFinding {
            what: format!("invalid leading coefficient {lead}"),
        });
    }
    if let Some(bad) = coeffs.iter().find(|c| !c.is_finite()) {
        return Err(SolverError::RootFinding {
            what: format!("non-finite coefficient {bad}"),
        });
    }

    let mut roots = if degree == 1 {
        vec![Complex::new(-coeffs[1] / lead, 0.0)]
    } else {
        companion_eigenvalues(coeffs, config)?
    };

    let dp = poly.derivative();
    for root in roots.iter_mut() {
        *root = polish(poly, &dp, *root, config.polish_iterations);
        if !root.re.is_finite() || !root.im.is_finite() {
            return Err(SolverError::RootFinding {
                what: "non-finite root".to_string(),
            });
        }
    }

    tracing::trace!(degree, ?roots, "characteristic roots");
    Ok(roots)
}

fn companion_eigenvalues(coeffs: &[f64], config: &RootConfig) -> SolverResult<Vec<Complex<f64>>> {
    let n = coeffs.len() - 1;
    let lead = coeffs[0];

    // Frobenius companion: first row −a_j/a_0, ones on the subdiagonal
    let mut companion = DMatrix::<f64>::zeros(n, n);
    for j in 0..n {
        companion[(0, j)] = -coeffs[j + 1] / lead;
    }
    for i in 1..n {
        companion[(i, i - 1)] = 1.0;
    }

    let schur = Schur::try_new(companion, f64::EPSILON, config.max_schur_iterations).ok_or_else(
        || SolverError::RootFinding {
            what: format!(
                "Schur decomposition did not converge in {} iterations",
                config.max_schur_iterations
            ),
        },
    )?;

    Ok(schur.complex_eigenvalues().iter().copied().collect())
}

/// Newton on P, accepting a step only when it shrinks |P(r)|.
fn polish(poly: &Polynomial, dp: &Polynomial, mut root: Complex<f64>, steps: usize) -> Complex<f64> {
    let mut value = poly.evaluate(root);
    for _ in 0..steps {
        let slope = dp.evaluate(root);
        if slope.norm() == 0.0 || value.norm() == 0.0 {
            break;
        }
        let candidate = root - value / slope;
        let candidate_value = poly.evaluate(candidate);
        if candidate_value.norm() < value.norm() {
            root = candidate;
            value = candidate_value;
        } else {
            break;
        }
    }
    root
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted_real(mut roots: Vec<Complex<f64>>) -> Vec<f64> {
        for r in &roots {
            assert!(r.im.abs() < 1e-9, "unexpected complex root {r}");
        }
        roots.sort_by(|a, b| a.re.total_cmp(&b.re));
        roots.into_iter().map(|r| r.re).collect()
    }

    #[test]
    fn linear_root() {
        let roots = find_roots(&Polynomial::new(vec![2.0, -3.0]), &RootConfig::default()).unwrap();
        assert_eq!(roots.len(), 1);
        assert!((roots[0].re - 1.5).abs() < 1e-15);
    }

    #[test]
    fn cubic_with_known_roots() {
        // (s + 1)(s − 2)(s + 3) = s^3 + 2s^2 − 5s − 6
        let poly = Polynomial::new(vec![1.0, 2.0, -5.0, -6.0]);
        let roots = sorted_real(find_roots(&poly, &RootConfig::default()).unwrap());
        let expected = [-3.0, -1.0, 2.0];
        for (r, e) in roots.iter().zip(expected) {
            assert!((r - e).abs() < 1e-12, "{r} vs {e}");
        }
    }

    #[test]
    fn complex_pair() {
        // s^2 + 1
        let poly = Polynomial::new(vec![1.0, 0.0, 1.0]);
        let mut roots = find_roots(&poly, &RootConfig::default()).unwrap();
        roots.sort_by(|a, b| a.im.total_cmp(&b.im));
        assert!((roots[0] - Complex::new(0.0, -1.0)).norm() < 1e-12);
        assert!((roots[1] - Complex::new(0.0, 1.0)).norm() < 1e-12);
    }

    #[test]
    fn widely_scaled_roots() {
        // Roots spanning five decades, like prompt vs. slow delayed modes
        let roots_in = [-350.0, -3.9, -0.3, -0.012, 1.0e-3];
        let mut coeffs = vec![1.0];
        for &r in &roots_in {
            // multiply by (s − r)
            let mut next = coeffs.clone();
            next.push(0.0);
            for (j, c) in coeffs.iter().enumerate() {
                next[j + 1] -= r * c;
            }
            coeffs = next;
        }
        let roots = sorted_real(find_roots(&Polynomial::new(coeffs), &RootConfig::default()).unwrap());
        for (r, e) in roots.iter().zip(roots_in) {
            assert!((r - e).abs() <= 1e-9 * e.abs().max(1.0), "{r} vs {e}");
        }
    }

    #[test]
    fn rejects_constant_polynomial() {
        let err = find_roots(&Polynomial::new(vec![1.0]), &RootConfig::default()).unwrap_err();
        assert!(matches!(err, SolverError::RootFinding { .. }));
    }

    #[test]
    fn rejects_non_finite_coefficients() {
        let poly = Polynomial::new(vec![1.0, f64::NAN, 2.0]);
        assert!(find_roots(&poly, &RootConfig::default()).is_err());
    }
}

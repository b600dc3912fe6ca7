//! Exact analytic solution of the point-kinetics equations over one interval
//! of constant reactivity.
//!
//! The neutron density and precursor concentrations are reconstructed as a
//! sum of exponential modes. The mode rates are the roots of a characteristic
//! polynomial P of degree N+1 (N precursor groups); the mode amplitudes are
//! partial-fraction residues built from P′ and two forcing polynomials H and Q.
//! No time discretisation happens inside an interval.

pub mod engine;
pub mod error;
pub mod polynomial;
pub mod residue;
pub mod roots;
pub mod symmetric;

pub use engine::{AnalyticEngine, EngineOptions};
pub use error::{SolverError, SolverResult};
pub use nalgebra::Complex;
pub use polynomial::{Polynomial, PolynomialSet};
pub use residue::ModalExpansion;
pub use roots::{RootConfig, find_roots};
pub use symmetric::{SumRounding, elementary_symmetric, elementary_symmetric_excluding};

//! pk-core: stable foundation for the analytic point-kinetics engine.
//!
//! Contains:
//! - units (uom SI time/frequency types + constructors)
//! - numeric (Real + tolerances + compensated summation)
//! - groups (delayed-neutron precursor groups and kinetics parameters)
//! - state (neutron density + precursor concentrations)
//! - error (shared error types)

pub mod error;
pub mod groups;
pub mod numeric;
pub mod state;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{PkError, PkResult};
pub use groups::{GroupSet, KineticsParams, PrecursorGroup};
pub use numeric::*;
pub use state::KineticsState;
pub use units::*;

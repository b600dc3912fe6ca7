//! Project schema definitions.

use serde::{Deserialize, Serialize};

/// Decimal places the legacy solver rounded every symmetric sum to.
pub const LEGACY_ROUNDING_DECIMALS: u32 = 8;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub solver: SolverDef,
    #[serde(default)]
    pub cores: Vec<CoreDef>,
    #[serde(default)]
    pub scenarios: Vec<ScenarioDef>,
}

impl Project {
    pub fn core(&self, id: &str) -> Option<&CoreDef> {
        self.cores.iter().find(|c| c.id == id)
    }

    pub fn scenario(&self, id: &str) -> Option<&ScenarioDef> {
        self.scenarios.iter().find(|s| s.id == id)
    }
}

/// Numerical settings shared by every scenario in the project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SolverDef {
    /// Round symmetric sums to this many decimals; absent means exact sums.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sum_rounding_decimals: Option<u32>,
    /// Relative root separation below which a root counts as repeated.
    #[serde(default = "default_degenerate_root_tolerance")]
    pub degenerate_root_tolerance: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_schur_iterations: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polish_iterations: Option<usize>,
}

impl Default for SolverDef {
    fn default() -> Self {
        Self {
            sum_rounding_decimals: None,
            degenerate_root_tolerance: default_degenerate_root_tolerance(),
            max_schur_iterations: None,
            polish_iterations: None,
        }
    }
}

fn default_degenerate_root_tolerance() -> f64 {
    1e-6
}

/// Delayed-neutron data and prompt generation time of one core.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoreDef {
    pub id: String,
    pub name: String,
    pub generation_time_s: f64,
    pub groups: Vec<GroupDef>,
}

impl CoreDef {
    pub fn beta_total(&self) -> f64 {
        self.groups.iter().map(|g| g.yield_fraction).sum()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GroupDef {
    pub decay_constant_per_s: f64,
    pub yield_fraction: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioDef {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub core_id: String,
    pub initial: InitialStateDef,
    pub program: ProgramDef,
}

impl ScenarioDef {
    /// Name for display, falling back to the id.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InitialStateDef {
    pub neutron_density: f64,
    #[serde(default)]
    pub precursors: PrecursorInitDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "type")]
pub enum PrecursorInitDef {
    /// C_k = β_k·n0 / (λ_k·Λ).
    #[default]
    Equilibrium,
    /// One concentration per group, in group order.
    Explicit { values: Vec<f64> },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ProgramDef {
    Ramp {
        slope_dollars_per_s: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        initial_reactivity: Option<ReactivityDef>,
        horizon_s: f64,
        dt_s: f64,
    },
    Insertion {
        reactivity: ReactivityDef,
        time_s: f64,
    },
}

impl ProgramDef {
    pub fn kind(&self) -> &'static str {
        match self {
            ProgramDef::Ramp { .. } => "Ramp",
            ProgramDef::Insertion { .. } => "Insertion",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ReactivityDef {
    pub unit: ReactivityUnit,
    pub value: f64,
}

impl ReactivityDef {
    pub fn dollars(value: f64) -> Self {
        Self {
            unit: ReactivityUnit::Dollars,
            value,
        }
    }

    pub fn absolute(value: f64) -> Self {
        Self {
            unit: ReactivityUnit::Absolute,
            value,
        }
    }

    /// Absolute reactivity for a core with total delayed fraction `beta_total`.
    pub fn to_absolute(&self, beta_total: f64) -> f64 {
        match self.unit {
            ReactivityUnit::Dollars => self.value * beta_total,
            ReactivityUnit::Absolute => self.value,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ReactivityUnit {
    Dollars,
    Absolute,
}

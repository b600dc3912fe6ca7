//! Result data types.

use serde::{Deserialize, Serialize};

pub type RunId = String;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunManifest {
    pub run_id: RunId,
    pub scenario_id: String,
    pub core_id: String,
    pub timestamp: String,
    pub run_type: RunType,
    pub solver_version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum RunType {
    Ramp {
        dt_s: f64,
        horizon_s: f64,
        steps: usize,
    },
    Insertion {
        time_s: f64,
    },
}

impl RunType {
    pub fn label(&self) -> &'static str {
        match self {
            RunType::Ramp { .. } => "ramp",
            RunType::Insertion { .. } => "insertion",
        }
    }
}

/// Reactor state at one stored time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeseriesRecord {
    pub time_s: f64,
    /// Absolute reactivity held over the step that ended here.
    pub reactivity: f64,
    pub neutron_density: f64,
    pub precursors: Vec<f64>,
}

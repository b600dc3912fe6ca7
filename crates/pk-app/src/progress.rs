//! Progress events emitted while a run is loaded or computed.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    LoadingProject,
    CheckingCache,
    LoadingCachedResult,
    Compiling,
    Marching,
    Evaluating,
    SavingResults,
    Completed,
}

#[derive(Debug, Clone, Default)]
pub struct MarchProgress {
    pub interval: usize,
    pub intervals: usize,
    pub sim_time_s: f64,
    pub end_time_s: f64,
    pub fraction_complete: f64,
    pub neutron_density: f64,
}

#[derive(Debug, Clone)]
pub struct RunProgressEvent {
    pub stage: RunStage,
    pub elapsed_wall_s: f64,
    pub message: Option<String>,
    pub march: Option<MarchProgress>,
}

impl RunProgressEvent {
    pub fn stage(stage: RunStage, elapsed_wall_s: f64, message: Option<String>) -> Self {
        Self {
            stage,
            elapsed_wall_s,
            message,
            march: None,
        }
    }

    /// Progress through the ramp intervals.
    pub fn marching(elapsed_wall_s: f64, march: MarchProgress) -> Self {
        Self {
            stage: RunStage::Marching,
            elapsed_wall_s,
            message: None,
            march: Some(march),
        }
    }
}

impl RunStage {
    pub fn label(&self) -> &'static str {
        match self {
            RunStage::LoadingProject => "loading project",
            RunStage::CheckingCache => "checking cache",
            RunStage::LoadingCachedResult => "loading cached result",
            RunStage::Compiling => "compiling",
            RunStage::Marching => "marching",
            RunStage::Evaluating => "evaluating",
            RunStage::SavingResults => "saving",
            RunStage::Completed => "completed",
        }
    }
}

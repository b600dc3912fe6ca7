//! A complete run: parameters, initial state and a reactivity program.

use pk_core::{KineticsParams, KineticsState, Real};
use pk_solver::AnalyticEngine;

use crate::error::SimResult;
use crate::insertion::{InsertionResult, InsertionSpec, evaluate_insertion};
use crate::ramp::{RampMarcher, RampRecord, RampSpec};

/// How reactivity evolves over the run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ReactivityProgram {
    /// Linear ramp, marched in fixed intervals.
    Ramp(RampSpec),
    /// Constant reactivity, evaluated once.
    SingleInsertion(InsertionSpec),
}

impl ReactivityProgram {
    pub fn label(&self) -> &'static str {
        match self {
            ReactivityProgram::Ramp(_) => "ramp",
            ReactivityProgram::SingleInsertion(_) => "insertion",
        }
    }

    /// Time covered by the program (s).
    pub fn end_time_s(&self) -> Real {
        match self {
            ReactivityProgram::Ramp(spec) => spec.interval_count() as Real * spec.dt_s,
            ReactivityProgram::SingleInsertion(spec) => spec.time_s,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Scenario {
    pub name: String,
    pub params: KineticsParams,
    pub initial: KineticsState,
    pub program: ReactivityProgram,
}

/// Result of running a scenario to completion.
#[derive(Clone, Debug, PartialEq)]
pub enum ScenarioOutcome {
    Ramp(Vec<RampRecord>),
    SingleInsertion(InsertionResult),
}

impl ScenarioOutcome {
    /// State at the end of the run (the initial state for an empty ramp).
    pub fn final_state(&self) -> Option<&KineticsState> {
        match self {
            ScenarioOutcome::Ramp(records) => records.last().map(|r| &r.state),
            ScenarioOutcome::SingleInsertion(result) => Some(&result.state),
        }
    }
}

impl Scenario {
    /// Run to completion, calling `on_record` as each ramp interval lands.
    pub fn run_with<F>(&self, engine: &AnalyticEngine, mut on_record: F) -> SimResult<ScenarioOutcome>
    where
        F: FnMut(&RampRecord),
    {
        let _span = tracing::info_span!("scenario", name = %self.name, kind = self.program.label())
            .entered();
        match self.program {
            ReactivityProgram::Ramp(spec) => {
                let marcher = RampMarcher::new(engine, &self.params, self.initial.clone(), spec)?;
                let mut records = Vec::with_capacity(marcher.intervals());
                for record in marcher {
                    let record = record?;
                    on_record(&record);
                    records.push(record);
                }
                Ok(ScenarioOutcome::Ramp(records))
            }
            ReactivityProgram::SingleInsertion(spec) => {
                let result = evaluate_insertion(engine, &self.params, self.initial.clone(), spec)?;
                Ok(ScenarioOutcome::SingleInsertion(result))
            }
        }
    }

    pub fn run(&self, engine: &AnalyticEngine) -> SimResult<ScenarioOutcome> {
        self.run_with(engine, |_| {})
    }

    /// Lazy ramp records; `None` for an insertion program.
    pub fn marcher<'a>(&'a self, engine: &'a AnalyticEngine) -> Option<SimResult<RampMarcher<'a>>> {
        match self.program {
            ReactivityProgram::Ramp(spec) => Some(RampMarcher::new(
                engine,
                &self.params,
                self.initial.clone(),
                spec,
            )),
            ReactivityProgram::SingleInsertion(_) => None,
        }
    }
}

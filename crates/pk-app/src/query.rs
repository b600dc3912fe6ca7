//! Summaries of stored runs.

use pk_results::TimeseriesRecord;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub record_count: usize,
    pub group_count: usize,
    pub time_range: (f64, f64),
    pub final_density: f64,
    /// Largest density and the time it was recorded.
    pub peak_density: (f64, f64),
    pub min_density: f64,
}

pub fn get_run_summary(records: &[TimeseriesRecord]) -> AppResult<RunSummary> {
    let (first, last) = match (records.first(), records.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(AppError::Results("run has no records".to_string())),
    };

    let mut peak = (first.time_s, first.neutron_density);
    let mut min_density = first.neutron_density;
    for record in records {
        if record.neutron_density > peak.1 {
            peak = (record.time_s, record.neutron_density);
        }
        min_density = min_density.min(record.neutron_density);
    }

    Ok(RunSummary {
        record_count: records.len(),
        group_count: first.precursors.len(),
        time_range: (first.time_s, last.time_s),
        final_density: last.neutron_density,
        peak_density: peak,
        min_density,
    })
}

/// (time, n) pairs.
pub fn density_series(records: &[TimeseriesRecord]) -> Vec<(f64, f64)> {
    records
        .iter()
        .map(|r| (r.time_s, r.neutron_density))
        .collect()
}

/// (time, C_k) pairs for 1-based group `group`.
pub fn precursor_series(records: &[TimeseriesRecord], group: usize) -> AppResult<Vec<(f64, f64)>> {
    let idx = group
        .checked_sub(1)
        .ok_or_else(|| AppError::Results("precursor groups are numbered from 1".to_string()))?;
    records
        .iter()
        .map(|r| {
            r.precursors
                .get(idx)
                .map(|c| (r.time_s, *c))
                .ok_or_else(|| AppError::Results(format!("no precursor group {}", group)))
        })
        .collect()
}

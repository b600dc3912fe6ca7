//! Comma-separated export: one row per stored time, `time_s,n,c_1..c_N`.

use std::io::Write;

use crate::types::TimeseriesRecord;
use crate::{ResultsError, ResultsResult};

pub struct CsvWriter<W: Write> {
    out: W,
    group_count: usize,
    rows: usize,
}

impl<W: Write> CsvWriter<W> {
    /// Writes the header immediately.
    pub fn new(mut out: W, group_count: usize) -> ResultsResult<Self> {
        let mut header = String::from("time_s,n");
        for k in 1..=group_count {
            header.push_str(&format!(",c_{k}"));
        }
        writeln!(out, "{header}")?;
        Ok(Self {
            out,
            group_count,
            rows: 0,
        })
    }

    pub fn write_record(&mut self, record: &TimeseriesRecord) -> ResultsResult<()> {
        if record.precursors.len() != self.group_count {
            return Err(ResultsError::ColumnMismatch {
                expected: self.group_count,
                found: record.precursors.len(),
            });
        }
        let mut row = format!("{},{}", record.time_s, record.neutron_density);
        for c in &record.precursors {
            row.push_str(&format!(",{c}"));
        }
        writeln!(self.out, "{row}")?;
        self.rows += 1;
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flush and hand back the sink.
    pub fn finish(mut self) -> ResultsResult<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

/// Write all `records` to `path`, replacing any existing file.
pub fn write_csv(path: &std::path::Path, records: &[TimeseriesRecord]) -> ResultsResult<usize> {
    let group_count = records.first().map_or(0, |r| r.precursors.len());
    let file = std::io::BufWriter::new(std::fs::File::create(path)?);
    let mut writer = CsvWriter::new(file, group_count)?;
    for record in records {
        writer.write_record(record)?;
    }
    let rows = writer.rows();
    writer.finish()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(t: f64, n: f64, c: Vec<f64>) -> TimeseriesRecord {
        TimeseriesRecord {
            time_s: t,
            reactivity: 0.0,
            neutron_density: n,
            precursors: c,
        }
    }

    #[test]
    fn header_and_rows() {
        let mut w = CsvWriter::new(Vec::new(), 2).unwrap();
        w.write_record(&record(0.001, 1.5, vec![10.0, 0.25])).unwrap();
        w.write_record(&record(0.002, 2.0, vec![11.0, 0.5])).unwrap();
        assert_eq!(w.rows(), 2);

        let text = String::from_utf8(w.finish().unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["time_s,n,c_1,c_2", "0.001,1.5,10,0.25", "0.002,2,11,0.5"]);
    }

    #[test]
    fn rejects_ragged_rows() {
        let mut w = CsvWriter::new(Vec::new(), 2).unwrap();
        let err = w.write_record(&record(0.0, 1.0, vec![1.0])).unwrap_err();
        assert!(matches!(
            err,
            ResultsError::ColumnMismatch {
                expected: 2,
                found: 1
            }
        ));
    }
}

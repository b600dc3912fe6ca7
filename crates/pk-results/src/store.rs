//! On-disk run cache.
//!
//! One directory per run id holding `timeseries.jsonl` (one record per line,
//! in time order) and `manifest.json`. Records are appended through a
//! [`RunWriter`] while the solver produces them and read back lazily through
//! a [`RecordReader`]. The manifest is written last; a directory without one
//! is an interrupted run and counts as absent.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Lines, Write};
use std::path::{Path, PathBuf};

use crate::types::{RunManifest, TimeseriesRecord};
use crate::{ResultsError, ResultsResult};

const MANIFEST_FILE: &str = "manifest.json";
const TIMESERIES_FILE: &str = "timeseries.jsonl";

#[derive(Clone, Debug)]
pub struct RunStore {
    root_dir: PathBuf,
}

impl RunStore {
    pub fn new(root_dir: PathBuf) -> ResultsResult<Self> {
        fs::create_dir_all(&root_dir)?;
        Ok(Self { root_dir })
    }

    /// Store next to the project file, under `.pointkinetics/runs`.
    pub fn for_project(project_path: &Path) -> ResultsResult<Self> {
        let project_dir = project_path
            .parent()
            .ok_or_else(|| ResultsError::InvalidPath {
                message: format!("{} has no parent directory", project_path.display()),
            })?;
        Self::new(project_dir.join(".pointkinetics").join("runs"))
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    fn manifest_path(&self, run_id: &str) -> PathBuf {
        self.root_dir.join(run_id).join(MANIFEST_FILE)
    }

    fn timeseries_path(&self, run_id: &str) -> PathBuf {
        self.root_dir.join(run_id).join(TIMESERIES_FILE)
    }

    pub fn has_run(&self, run_id: &str) -> bool {
        self.manifest_path(run_id).is_file()
    }

    /// Start writing run `run_id`, replacing whatever was stored under it.
    ///
    /// The old manifest goes first so a rerun that fails half way is not
    /// mistaken for a complete one.
    pub fn begin_run(&self, run_id: &str) -> ResultsResult<RunWriter> {
        let run_dir = self.root_dir.join(run_id);
        fs::create_dir_all(&run_dir)?;
        let manifest_path = run_dir.join(MANIFEST_FILE);
        if manifest_path.exists() {
            fs::remove_file(&manifest_path)?;
        }
        let file = File::create(run_dir.join(TIMESERIES_FILE))?;
        Ok(RunWriter {
            run_id: run_id.to_string(),
            manifest_path,
            out: BufWriter::new(file),
            group_count: None,
            rows: 0,
        })
    }

    /// Write a complete run in one call.
    pub fn save_run(
        &self,
        manifest: &RunManifest,
        records: &[TimeseriesRecord],
    ) -> ResultsResult<()> {
        let mut writer = self.begin_run(&manifest.run_id)?;
        for record in records {
            writer.append(record)?;
        }
        writer.finish(manifest)
    }

    pub fn load_manifest(&self, run_id: &str) -> ResultsResult<RunManifest> {
        let path = self.manifest_path(run_id);
        if !path.is_file() {
            return Err(ResultsError::RunNotFound {
                run_id: run_id.to_string(),
            });
        }
        let file = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(file)?)
    }

    /// Records of a complete run, parsed one line at a time.
    pub fn records(&self, run_id: &str) -> ResultsResult<RecordReader> {
        if !self.has_run(run_id) {
            return Err(ResultsError::RunNotFound {
                run_id: run_id.to_string(),
            });
        }
        let file = File::open(self.timeseries_path(run_id))?;
        Ok(RecordReader {
            lines: BufReader::new(file).lines(),
        })
    }

    pub fn load_timeseries(&self, run_id: &str) -> ResultsResult<Vec<TimeseriesRecord>> {
        self.records(run_id)?.collect()
    }

    /// Runs of one scenario, oldest first.
    pub fn list_runs(&self, scenario_id: &str) -> ResultsResult<Vec<RunManifest>> {
        let mut runs: Vec<RunManifest> = self
            .list_all()?
            .into_iter()
            .filter(|m| m.scenario_id == scenario_id)
            .collect();
        runs.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(runs)
    }

    /// Every complete run in the store, in directory order.
    pub fn list_all(&self) -> ResultsResult<Vec<RunManifest>> {
        let mut runs = Vec::new();
        for entry in fs::read_dir(&self.root_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let run_id = entry.file_name().to_string_lossy().into_owned();
            if self.has_run(&run_id) {
                runs.push(self.load_manifest(&run_id)?);
            }
        }
        Ok(runs)
    }
}

/// Appends records of one run; [`RunWriter::finish`] seals it with the manifest.
///
/// Dropping the writer without finishing leaves an incomplete run behind.
#[derive(Debug)]
pub struct RunWriter {
    run_id: String,
    manifest_path: PathBuf,
    out: BufWriter<File>,
    group_count: Option<usize>,
    rows: usize,
}

impl RunWriter {
    /// Every record of a run carries the same number of precursor groups.
    pub fn append(&mut self, record: &TimeseriesRecord) -> ResultsResult<()> {
        let found = record.precursors.len();
        let expected = *self.group_count.get_or_insert(found);
        if found != expected {
            return Err(ResultsError::ColumnMismatch { expected, found });
        }
        serde_json::to_writer(&mut self.out, record)?;
        self.out.write_all(b"\n")?;
        self.rows += 1;
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn finish(mut self, manifest: &RunManifest) -> ResultsResult<()> {
        if manifest.run_id != self.run_id {
            return Err(ResultsError::RunIdMismatch {
                expected: self.run_id,
                found: manifest.run_id.clone(),
            });
        }
        self.out.flush()?;
        let mut file = BufWriter::new(File::create(&self.manifest_path)?);
        serde_json::to_writer_pretty(&mut file, manifest)?;
        file.flush()?;
        Ok(())
    }
}

/// Lazy reader over a stored timeseries.
#[derive(Debug)]
pub struct RecordReader {
    lines: Lines<BufReader<File>>,
}

impl Iterator for RecordReader {
    type Item = ResultsResult<TimeseriesRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            if line.trim().is_empty() {
                continue;
            }
            return Some(serde_json::from_str(&line).map_err(ResultsError::from));
        }
    }
}

/// RFC 3339 timestamp for a new manifest.
pub fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

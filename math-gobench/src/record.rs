//! Persistent per-(function, algorithm) result records.
//!
//! A record file's existence is the checkpoint: a sweep never recomputes or
//! overwrites an algorithm whose record is already on disk. Records are
//! written once, through a temporary file renamed into place, so a partially
//! written record never satisfies the checkpoint.

use crate::error::{BenchError, Result};
use crate::strategy::RunOutcome;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// One field of one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RecordField {
    /// Whether the optimum was hit
    Success(bool),
    /// Call index of the hit, or the budget when not hit
    Ncall(usize),
    /// Value at the hit
    Fvalue(Option<f64>),
    /// Seconds to the hit
    Time(Option<f64>),
    /// Calls performed
    NcallMax(usize),
}

/// Results of every run of one algorithm on one function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchUnit {
    /// Number of runs
    pub nbruns: usize,
    /// Function name
    pub function: String,
    /// Explicit dimension, when the function was expanded over dimensions
    #[serde(default)]
    pub dimension: Option<usize>,
    /// Algorithm name
    pub algorithm: String,
    /// Per-run success flag
    pub success: Vec<bool>,
    /// Per-run call index of the hit (budget when not hit)
    pub ncall: Vec<usize>,
    /// Per-run value at the hit
    pub fvalue: Vec<Option<f64>>,
    /// Per-run seconds to the hit
    pub time: Vec<Option<f64>>,
    /// Per-run calls performed
    pub ncall_max: Vec<usize>,
}

impl BenchUnit {
    /// Empty record for `nbruns` runs.
    pub fn new(
        nbruns: usize,
        function: impl Into<String>,
        dimension: Option<usize>,
        algorithm: impl Into<String>,
    ) -> Self {
        Self {
            nbruns,
            function: function.into(),
            dimension,
            algorithm: algorithm.into(),
            success: vec![false; nbruns],
            ncall: vec![0; nbruns],
            fvalue: vec![None; nbruns],
            time: vec![None; nbruns],
            ncall_max: vec![0; nbruns],
        }
    }

    /// Function name with its dimension suffix, e.g. `rastrigin_20`.
    pub fn label(&self) -> String {
        match self.dimension {
            Some(dim) => format!("{}_{}", self.function, dim),
            None => self.function.clone(),
        }
    }

    /// `{function}[_{dimension}]_{algorithm}.json`
    pub fn filename(&self) -> String {
        format!("{}_{}.json", self.label(), self.algorithm)
    }

    /// Location of the record inside `folder`.
    pub fn path(&self, folder: &Path) -> PathBuf {
        folder.join(self.filename())
    }

    /// Whether the record already exists in `folder`.
    pub fn exists(&self, folder: &Path) -> bool {
        self.path(folder).is_file()
    }

    /// Writes the record into `folder`, creating it if needed.
    pub fn write(&self, folder: &Path) -> Result<PathBuf> {
        fs::create_dir_all(folder)?;
        let path = self.path(folder);
        let tmp = path.with_extension("json.tmp");
        {
            let mut writer = BufWriter::new(File::create(&tmp)?);
            serde_json::to_writer_pretty(&mut writer, self)?;
            writer.flush()?;
        }
        fs::rename(&tmp, &path)?;
        Ok(path)
    }

    /// Loads a record from `path`.
    pub fn read(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let unit: BenchUnit = serde_json::from_reader(reader)?;
        let consistent = [
            unit.success.len(),
            unit.ncall.len(),
            unit.fvalue.len(),
            unit.time.len(),
            unit.ncall_max.len(),
        ]
        .iter()
        .all(|&len| len == unit.nbruns);
        if !consistent {
            return Err(BenchError::Config(format!(
                "record {} has arrays of the wrong length",
                path.display()
            )));
        }
        Ok(unit)
    }

    /// Sets one field of run `run`.
    pub fn update(&mut self, run: usize, field: RecordField) -> Result<()> {
        if run >= self.nbruns {
            return Err(BenchError::InvalidRun {
                run,
                nbruns: self.nbruns,
            });
        }
        match field {
            RecordField::Success(v) => self.success[run] = v,
            RecordField::Ncall(v) => self.ncall[run] = v,
            RecordField::Fvalue(v) => self.fvalue[run] = v,
            RecordField::Time(v) => self.time[run] = v,
            RecordField::NcallMax(v) => self.ncall_max[run] = v,
        }
        Ok(())
    }

    /// Stores every field of `outcome` as run `run`.
    pub fn record(&mut self, run: usize, outcome: &RunOutcome) -> Result<()> {
        self.update(run, RecordField::Success(outcome.success))?;
        self.update(run, RecordField::Ncall(outcome.ncall_success))?;
        self.update(run, RecordField::Fvalue(outcome.success_value))?;
        self.update(run, RecordField::Time(outcome.duration))?;
        self.update(run, RecordField::NcallMax(outcome.ncall_max))
    }

    /// Copies run 0 into every later run.
    pub fn replicate(&mut self) {
        if self.nbruns == 0 {
            return;
        }
        let (success, ncall, fvalue, time, ncall_max) = (
            self.success[0],
            self.ncall[0],
            self.fvalue[0],
            self.time[0],
            self.ncall_max[0],
        );
        self.success.fill(success);
        self.ncall.fill(ncall);
        self.fvalue.fill(fvalue);
        self.time.fill(time);
        self.ncall_max.fill(ncall_max);
    }
}

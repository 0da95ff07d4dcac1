//! Aggregation of result records into per-(function, algorithm) summaries.

use crate::error::Result;
use crate::record::BenchUnit;
use rayon::prelude::*;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Aggregated statistics of one record.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Function name with dimension suffix
    pub function: String,
    /// Algorithm name
    pub algorithm: String,
    /// Number of runs
    pub runs: usize,
    /// Runs that hit the optimum
    pub successes: usize,
    /// `successes / runs`
    pub success_rate: f64,
    /// Mean call index of the hit over successful runs
    pub mean_ncall: Option<f64>,
    /// Mean seconds to the hit over successful runs
    pub mean_time: Option<f64>,
}

impl Summary {
    /// Summarizes one record.
    pub fn from_unit(unit: &BenchUnit) -> Self {
        let hits: Vec<usize> = (0..unit.nbruns).filter(|&i| unit.success[i]).collect();
        let successes = hits.len();
        let mean = |values: Vec<f64>| {
            (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
        };
        let mean_ncall = mean(hits.iter().map(|&i| unit.ncall[i] as f64).collect());
        let mean_time = mean(hits.iter().filter_map(|&i| unit.time[i]).collect());

        Self {
            function: unit.label(),
            algorithm: unit.algorithm.clone(),
            runs: unit.nbruns,
            successes,
            success_rate: if unit.nbruns == 0 {
                0.0
            } else {
                successes as f64 / unit.nbruns as f64
            },
            mean_ncall,
            mean_time,
        }
    }
}

/// Paths of every record file in `folder`.
pub fn record_paths(folder: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(folder)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Loads every record of `folder` in parallel.
pub fn load_records(folder: &Path) -> Result<Vec<BenchUnit>> {
    record_paths(folder)?
        .par_iter()
        .map(|path| BenchUnit::read(path))
        .collect()
}

/// Summaries of every record of `folder`, sorted by function then algorithm.
pub fn summarize(folder: &Path) -> Result<Vec<Summary>> {
    let mut summaries: Vec<Summary> = load_records(folder)?
        .par_iter()
        .map(Summary::from_unit)
        .collect();
    summaries.sort_by(|a, b| {
        a.function
            .cmp(&b.function)
            .then_with(|| a.algorithm.cmp(&b.algorithm))
    });
    Ok(summaries)
}

/// Writes summaries as CSV.
pub fn write_csv(summaries: &[Summary], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(
        writer,
        "function,algorithm,runs,successes,success_rate,mean_ncall,mean_time"
    )?;
    for s in summaries {
        writeln!(
            writer,
            "{},{},{},{},{:.4},{},{}",
            s.function,
            s.algorithm,
            s.runs,
            s.successes,
            s.success_rate,
            s.mean_ncall.map_or(String::new(), |v| format!("{v:.1}")),
            s.mean_time.map_or(String::new(), |v| format!("{v:.6}")),
        )?;
    }
    writer.flush()?;
    Ok(())
}

//! Benchmark sweep configuration.
//!
//! Everything the sweep needs is carried by [`BenchConfig`]: run counts,
//! filters, dimension expansion, per-run limits, seeding, scheduling and
//! optimizer sizes. It can be built in code through [`BenchConfigBuilder`] or
//! loaded from a JSON file where every field is optional.

use crate::adapter::RunSettings;
use crate::error::{BenchError, Result};
use crate::scheduler::ExecutionMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Dimensions used when scalable functions are expanded.
pub fn default_dimensions() -> Vec<usize> {
    let mut dims = vec![5];
    dims.extend((10..=100).step_by(10));
    dims
}

/// Scalable functions expanded over dimensions in multi-dimension mode.
pub fn default_multidim_selection() -> Vec<String> {
    ["ackley", "exponential", "rastrigin", "rosenbrock", "schwefel"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Complete configuration of a benchmark sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// Runs per (function, algorithm)
    pub nb_runs: usize,
    /// Folder receiving the result records
    pub output_folder: PathBuf,
    /// Restrict the sweep to these functions
    pub functions: Option<Vec<String>>,
    /// Restrict the sweep to these algorithms
    pub methods: Option<Vec<String>>,
    /// Expand selected scalable functions over `dimensions`
    pub multidim: bool,
    /// Dimensions used by the expansion
    pub dimensions: Vec<usize>,
    /// Functions eligible for the expansion
    pub multidim_selection: Vec<String>,
    /// Per-run limits
    pub run: RunSettings,
    /// Seed of run `i` is `seed_base + i`
    pub seed_base: u64,
    /// Scheduler poll period in milliseconds
    pub poll_interval_ms: u64,
    /// Particle swarm size
    pub pso_particles: usize,
    /// Grid points per variable for exhaustive search
    pub grid_points: usize,
    /// Local or cluster execution
    pub execution: ExecutionMode,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            nb_runs: 100,
            output_folder: PathBuf::from("DATA"),
            functions: None,
            methods: None,
            multidim: false,
            dimensions: default_dimensions(),
            multidim_selection: default_multidim_selection(),
            run: RunSettings::default(),
            seed_base: 1234,
            poll_interval_ms: 500,
            pso_particles: 40,
            grid_points: 20,
            execution: ExecutionMode::default(),
        }
    }
}

impl BenchConfig {
    /// Loads and validates a configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: BenchConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Writes the configuration as pretty JSON.
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Seed of run `run`.
    pub fn seed_for_run(&self, run: usize) -> u64 {
        self.seed_base.wrapping_add(run as u64)
    }

    /// Scheduler poll period.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Checks ranges and consistency.
    pub fn validate(&self) -> Result<()> {
        if self.nb_runs == 0 {
            return Err(BenchError::Config("nb_runs must be at least 1".into()));
        }
        if self.run.call_budget == 0 {
            return Err(BenchError::Config("call_budget must be at least 1".into()));
        }
        if !self.run.tolerance.is_finite() || self.run.tolerance < 0.0 {
            return Err(BenchError::Config(format!(
                "tolerance must be finite and non-negative, got {}",
                self.run.tolerance
            )));
        }
        if self.multidim && self.dimensions.is_empty() {
            return Err(BenchError::Config(
                "multidim requires at least one dimension".into(),
            ));
        }
        if self.dimensions.contains(&0) {
            return Err(BenchError::Config("dimensions must be positive".into()));
        }
        if self.pso_particles == 0 {
            return Err(BenchError::Config("pso_particles must be at least 1".into()));
        }
        if self.grid_points == 0 {
            return Err(BenchError::Config("grid_points must be at least 1".into()));
        }
        if matches!(&self.functions, Some(names) if names.is_empty()) {
            return Err(BenchError::Config("empty function filter".into()));
        }
        if matches!(&self.methods, Some(names) if names.is_empty()) {
            return Err(BenchError::Config("empty method filter".into()));
        }
        Ok(())
    }
}

/// Builder for [`BenchConfig`].
///
/// # Example
///
/// ```rust
/// use math_gobench::BenchConfigBuilder;
///
/// let config = BenchConfigBuilder::new()
///     .nb_runs(10)
///     .functions(["rastrigin", "sphere"])
///     .call_budget(5_000)
///     .build()
///     .expect("valid configuration");
/// assert_eq!(config.nb_runs, 10);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BenchConfigBuilder {
    cfg: BenchConfig,
}

impl BenchConfigBuilder {
    /// Creates a builder holding the default configuration.
    pub fn new() -> Self {
        Self {
            cfg: BenchConfig::default(),
        }
    }
    /// Sets the number of runs per (function, algorithm).
    pub fn nb_runs(mut self, v: usize) -> Self {
        self.cfg.nb_runs = v;
        self
    }
    /// Sets the output folder.
    pub fn output_folder(mut self, v: impl Into<PathBuf>) -> Self {
        self.cfg.output_folder = v.into();
        self
    }
    /// Restricts the sweep to the named functions.
    pub fn functions<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cfg.functions = Some(names.into_iter().map(Into::into).collect());
        self
    }
    /// Restricts the sweep to the named algorithms.
    pub fn methods<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cfg.methods = Some(names.into_iter().map(Into::into).collect());
        self
    }
    /// Enables the dimension expansion.
    pub fn multidim(mut self, v: bool) -> Self {
        self.cfg.multidim = v;
        self
    }
    /// Sets the expansion dimensions.
    pub fn dimensions(mut self, v: Vec<usize>) -> Self {
        self.cfg.dimensions = v;
        self
    }
    /// Sets the per-run call budget.
    pub fn call_budget(mut self, v: usize) -> Self {
        self.cfg.run.call_budget = v;
        self
    }
    /// Sets the success tolerance.
    pub fn tolerance(mut self, v: f64) -> Self {
        self.cfg.run.tolerance = v;
        self
    }
    /// Sets the local search allowance.
    pub fn ls_allowance(mut self, v: usize) -> Self {
        self.cfg.run.ls_allowance = v;
        self
    }
    /// Enables trajectory recording.
    pub fn record_trajectory(mut self, v: bool) -> Self {
        self.cfg.run.record_trajectory = v;
        self
    }
    /// Sets the seed base.
    pub fn seed_base(mut self, v: u64) -> Self {
        self.cfg.seed_base = v;
        self
    }
    /// Sets the scheduler poll period.
    pub fn poll_interval(mut self, v: Duration) -> Self {
        self.cfg.poll_interval_ms = v.as_millis() as u64;
        self
    }
    /// Sets the particle swarm size.
    pub fn pso_particles(mut self, v: usize) -> Self {
        self.cfg.pso_particles = v;
        self
    }
    /// Sets the grid resolution.
    pub fn grid_points(mut self, v: usize) -> Self {
        self.cfg.grid_points = v;
        self
    }
    /// Sets the execution mode.
    pub fn execution(mut self, v: ExecutionMode) -> Self {
        self.cfg.execution = v;
        self
    }
    /// Validates and returns the configuration.
    pub fn build(self) -> Result<BenchConfig> {
        self.cfg.validate()?;
        Ok(self.cfg)
    }
}

//! The benchmark sweep: work items, per-item job body and the scheduled run.

use crate::adapter::RunContext;
use crate::algorithms::algorithms;
use crate::config::BenchConfig;
use crate::error::{BenchError, Result};
use crate::job::WorkItem;
use crate::record::BenchUnit;
use crate::scheduler::{Scheduler, SchedulerReport};
use crate::strategy::{Algorithm, RunOutcome};
use log::{error, info};
use math_test_functions::FunctionRegistry;
use std::path::PathBuf;
use std::sync::Arc;

/// What one job did for its work item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BenchReport {
    /// Records written by this job
    pub written: Vec<PathBuf>,
    /// Records found on disk and left untouched
    pub skipped: Vec<PathBuf>,
    /// Objective evaluations performed
    pub evaluations: usize,
}

/// Drives a whole sweep: every selected function with every selected algorithm.
pub struct Benchmarker {
    config: BenchConfig,
    registry: FunctionRegistry,
    algorithms: Vec<Algorithm>,
}

impl Benchmarker {
    /// Sweep over the built-in functions and the algorithms selected by `config`.
    pub fn new(config: BenchConfig) -> Result<Self> {
        config.validate()?;
        let algorithms = algorithms(&config)?;
        Ok(Self::with_parts(config, FunctionRegistry::new(), algorithms))
    }

    /// Sweep over explicit functions and algorithms.
    pub fn with_parts(
        config: BenchConfig,
        registry: FunctionRegistry,
        algorithms: Vec<Algorithm>,
    ) -> Self {
        Self {
            config,
            registry,
            algorithms,
        }
    }

    /// The sweep configuration.
    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    /// The algorithms run on every work item.
    pub fn algorithms(&self) -> &[Algorithm] {
        &self.algorithms
    }

    /// Every (function, dimension) pair of the sweep, before sharding.
    ///
    /// Functions come in name order. In multi-dimension mode, scalable
    /// functions of the selection list get one item per configured dimension,
    /// placed before their default-dimension item.
    pub fn work_items(&self) -> Result<Vec<WorkItem>> {
        if let Some(filter) = &self.config.functions {
            for name in filter {
                if self.registry.get(name).is_none() {
                    return Err(BenchError::UnknownFunction(name.clone()));
                }
            }
        }

        let mut items = Vec::new();
        for name in self.registry.names() {
            let selected = self
                .config
                .functions
                .as_ref()
                .is_none_or(|filter| filter.contains(&name));
            if !selected {
                continue;
            }
            let scalable = self.registry.get(&name).is_some_and(|e| e.scalable);
            if self.config.multidim
                && scalable
                && self.config.multidim_selection.contains(&name)
            {
                for &dim in &self.config.dimensions {
                    info!("Appending function: {} with dim: {}", name, dim);
                    items.push(WorkItem::with_dimension(name.clone(), dim));
                }
            }
            items.push(WorkItem::new(name));
        }
        info!("Nb functions to process: {}", items.len());
        Ok(items)
    }

    /// Runs every algorithm on `item`, skipping algorithms already recorded.
    pub fn bench(&self, item: &WorkItem) -> BenchReport {
        let mut report = BenchReport::default();
        let function = match self.registry.build(&item.name, item.dimension) {
            Ok(function) => function,
            Err(e) => {
                error!("cannot build {}: {}", item, e);
                return report;
            }
        };
        let folder = &self.config.output_folder;

        for algo in &self.algorithms {
            let mut unit = BenchUnit::new(
                self.config.nb_runs,
                item.name.clone(),
                item.dimension,
                algo.name(),
            );
            if unit.exists(folder) {
                info!("File {} already existing, skipping...", unit.filename());
                report.skipped.push(unit.path(folder));
                continue;
            }

            for run in 0..self.config.nb_runs {
                if algo.is_exhaustive() && run > 0 {
                    info!("BRUTE FORCE nbrun > 1, replicating run 0...");
                    unit.replicate();
                    break;
                }
                let seed = self.config.seed_for_run(run);
                let ctx = Arc::new(RunContext::setup(
                    Arc::clone(&function),
                    &self.config.run,
                    seed,
                ));
                let outcome = algo.run(&ctx, run);
                log_outcome(item, algo.name(), run, &outcome);
                report.evaluations += outcome.ncall_max;
                if let Err(e) = unit.record(run, &outcome) {
                    error!("{}: cannot record run {}: {}", unit.filename(), run, e);
                }
            }

            match unit.write(folder) {
                Ok(path) => report.written.push(path),
                Err(e) => error!("cannot write {}: {}", unit.filename(), e),
            }
        }
        report
    }

    /// Schedules every work item of this participant and waits for them.
    pub fn run(self: &Arc<Self>) -> Result<SchedulerReport> {
        let items = self.config.execution.select(&self.work_items()?);
        info!(
            "Benchmarking functions: {:?}",
            items.iter().map(|w| w.to_string()).collect::<Vec<_>>()
        );
        let scheduler = Scheduler::new(
            self.config.execution.pool_size(),
            self.config.poll_interval(),
        );
        let this = Arc::clone(self);
        Ok(scheduler.run(
            items,
            Arc::new(move |item: &WorkItem| {
                this.bench(item);
            }),
        ))
    }
}

fn log_outcome(item: &WorkItem, algo: &str, run: usize, outcome: &RunOutcome) {
    if outcome.success {
        info!(
            ":-)  Func: {} - Algo: {} - RUN: {} -> FOUND after {} calls",
            item, algo, run, outcome.ncall_success
        );
    } else if let Some(note) = &outcome.note {
        info!(
            ":-(  Func: {} - Algo: {} - RUN: {} -> EXCEPTION RAISED after {} calls: {}",
            item, algo, run, outcome.ncall_max, note
        );
    } else {
        info!(
            ":-(  Func: {} - Algo: {} - RUN: {} -> FAILED after {} calls",
            item, algo, run, outcome.ncall_max
        );
    }
}

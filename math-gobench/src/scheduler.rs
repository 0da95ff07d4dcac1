//! Bounded-concurrency job scheduler and cluster sharding.
//!
//! The scheduler is a single-threaded polling loop: each tick reaps finished
//! jobs, counts the running ones and dispatches pending jobs into the free
//! slots, then sleeps for the poll interval.

use crate::error::{BenchError, Result};
use crate::job::{Entrypoint, Job, JobStatus, WorkItem};
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::thread;
use std::time::Duration;

/// Environment variable switching to cluster mode when present.
pub const ENV_USE_CLUSTER: &str = "USE_CLUSTER";
/// Environment variable holding the slots per shard.
pub const ENV_NB_CORES: &str = "NB_CORES";
/// Environment variable holding the shard index.
pub const ENV_SECTION_NUM: &str = "SECTION_NUM";

/// Where the sweep runs and how many slots it gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Single host using `cores` slots.
    Local {
        /// Number of concurrent jobs
        cores: usize,
    },
    /// One shard of a multi-host sweep.
    Cluster {
        /// Shard index
        section: usize,
        /// Slots per shard, also the shard width
        cores: usize,
    },
}

impl Default for ExecutionMode {
    fn default() -> Self {
        Self::local()
    }
}

impl ExecutionMode {
    /// Local mode with one slot per available processing unit.
    pub fn local() -> Self {
        let cores = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        ExecutionMode::Local { cores }
    }

    /// Reads `USE_CLUSTER`, `NB_CORES` and `SECTION_NUM` from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if lookup(ENV_USE_CLUSTER).is_none() {
            return Ok(Self::local());
        }
        let cores = required_count(&lookup, ENV_NB_CORES)?;
        if cores == 0 {
            return Err(BenchError::Environment {
                var: ENV_NB_CORES.to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        let section = required_count(&lookup, ENV_SECTION_NUM)?;
        Ok(ExecutionMode::Cluster { section, cores })
    }

    /// Number of jobs allowed to run at once.
    pub fn pool_size(&self) -> usize {
        match *self {
            ExecutionMode::Local { cores } | ExecutionMode::Cluster { cores, .. } => cores.max(1),
        }
    }

    /// The work items this participant is responsible for.
    pub fn select(&self, items: &[WorkItem]) -> Vec<WorkItem> {
        match *self {
            ExecutionMode::Local { .. } => items.to_vec(),
            ExecutionMode::Cluster { section, cores } => shard(items, section, cores).to_vec(),
        }
    }
}

fn required_count<F>(lookup: &F, var: &str) -> Result<usize>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(var).ok_or_else(|| BenchError::Environment {
        var: var.to_string(),
        reason: format!("required when {ENV_USE_CLUSTER} is set"),
    })?;
    raw.trim()
        .parse::<usize>()
        .map_err(|e| BenchError::Environment {
            var: var.to_string(),
            reason: format!("invalid value {raw:?}: {e}"),
        })
}

/// Slice `[section * cores, section * cores + cores)` of `items`, clipped to its length.
pub fn shard<T>(items: &[T], section: usize, cores: usize) -> &[T] {
    let start = section.saturating_mul(cores).min(items.len());
    let end = start.saturating_add(cores).min(items.len());
    &items[start..end]
}

/// Counters collected while scheduling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchedulerReport {
    /// Jobs that reached `Finished`
    pub completed: usize,
    /// Jobs whose entrypoint panicked or could not start
    pub failed: usize,
    /// Poll ticks performed
    pub ticks: usize,
    /// Largest number of jobs observed running at once
    pub max_running: usize,
}

/// Polling scheduler over a fixed number of slots.
#[derive(Debug, Clone)]
pub struct Scheduler {
    pool_size: usize,
    poll_interval: Duration,
}

impl Scheduler {
    /// Scheduler running at most `pool_size` jobs at once (at least one).
    pub fn new(pool_size: usize, poll_interval: Duration) -> Self {
        Self {
            pool_size: pool_size.max(1),
            poll_interval,
        }
    }

    /// Slots available.
    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    /// Runs `entrypoint` once per item and returns when every job has finished.
    pub fn run(&self, items: Vec<WorkItem>, entrypoint: Entrypoint) -> SchedulerReport {
        let mut jobs: BTreeMap<usize, Job> = items
            .into_iter()
            .map(Job::new)
            .enumerate()
            .collect();
        let mut report = SchedulerReport::default();
        info!(
            "Scheduling {} jobs on {} slots",
            jobs.len(),
            self.pool_size
        );

        while !jobs.is_empty() {
            let finished: Vec<usize> = jobs
                .iter()
                .filter(|(_, job)| job.status() == JobStatus::Finished)
                .map(|(&index, _)| index)
                .collect();
            for index in finished {
                if let Some(mut job) = jobs.remove(&index) {
                    if job.join() {
                        report.completed += 1;
                    } else {
                        report.failed += 1;
                    }
                }
            }
            if jobs.is_empty() {
                break;
            }

            let running = jobs
                .values()
                .filter(|job| job.status() == JobStatus::Running)
                .count();
            let free = self.pool_size.saturating_sub(running);
            let mut started = 0;
            for job in jobs
                .values_mut()
                .filter(|job| job.status() == JobStatus::Pending)
                .take(free)
            {
                match job.start(entrypoint.clone()) {
                    Ok(()) => started += 1,
                    Err(e) => error!("cannot start job {}: {}", job.item(), e),
                }
            }

            report.ticks += 1;
            report.max_running = report.max_running.max(running + started);
            debug!(
                "tick {}: {} running, {} started, {} left",
                report.ticks,
                running,
                started,
                jobs.len()
            );
            thread::sleep(self.poll_interval);
        }

        report
    }
}

//! Benchmark orchestration for global optimization algorithms.
//!
//! The crate measures how reliably and how quickly optimizers locate the known
//! global minimum of standard test functions:
//!
//! - [`adapter`] instruments the objective: call counting, first-hit
//!   detection, trajectory recording and a call budget enforced by aborting
//!   the optimizer from inside its own cost callback.
//! - [`optimizers`] wraps argmin solvers (and an exhaustive grid) behind one
//!   [`Optimizer`] trait.
//! - [`strategy`] drives an optimizer once, with restarts, or as a global
//!   search followed by a local refinement, and turns signals into a
//!   [`RunOutcome`].
//! - [`record`] persists per-(function, algorithm) results; an existing
//!   record is a checkpoint.
//! - [`job`] and [`scheduler`] fan work items over a bounded pool of threads,
//!   with deterministic sharding for cluster runs.
//! - [`report`] aggregates records into summaries.
//!
//! # Example
//!
//! ```rust
//! use math_gobench::{RunContext, RunSettings, algorithms};
//! use math_gobench::BenchConfigBuilder;
//! use math_test_functions::FunctionRegistry;
//! use std::sync::Arc;
//!
//! let config = BenchConfigBuilder::new()
//!     .methods(["NM-R"])
//!     .call_budget(20_000)
//!     .build()
//!     .expect("valid configuration");
//! let algo = &algorithms::algorithms(&config).expect("known method")[0];
//!
//! let sphere = FunctionRegistry::new().build("sphere", Some(3)).expect("registered");
//! let ctx = Arc::new(RunContext::setup(sphere, &config.run, config.seed_for_run(0)));
//! let outcome = algo.run(&ctx, 0);
//! assert!(outcome.success);
//! assert!(outcome.ncall_success <= 20_000);
//! ```
#![warn(missing_docs)]

pub mod adapter;
pub mod algorithms;
pub mod bench;
pub mod config;
pub mod error;
pub mod job;
pub mod optimizers;
pub mod record;
pub mod report;
pub mod scheduler;
pub mod strategy;

pub use adapter::{Candidate, RunContext, RunSettings, Signal, SuccessRecord};
pub use bench::{BenchReport, Benchmarker};
pub use config::{BenchConfig, BenchConfigBuilder};
pub use error::{BenchError, Result};
pub use job::{Entrypoint, Job, JobStatus, WorkItem};
pub use optimizers::{Optimizer, OptimizerError, signal_of};
pub use record::{BenchUnit, RecordField};
pub use scheduler::{ExecutionMode, Scheduler, SchedulerReport, shard};
pub use strategy::{Algorithm, RunOutcome, Strategy};

//! Shared fixtures: scripted objectives and optimizers with fully predictable
//! evaluation streams.
#![allow(dead_code)]

use directories::ProjectDirs;
use math_gobench::{Candidate, Optimizer, OptimizerError, RunContext, RunSettings};
use math_test_functions::TestFunction;
use ndarray::Array1;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Fresh, empty folder under the cache directory.
pub fn test_folder(name: &str) -> PathBuf {
    let proj_dirs = ProjectDirs::from("org", "spinorama", "math-audio")
        .expect("Failed to determine project directories");
    let folder = proj_dirs.cache_dir().join("gobench-tests").join(name);
    let _ = std::fs::remove_dir_all(&folder);
    std::fs::create_dir_all(&folder).expect("Failed to create test folder");
    folder
}

/// 2-D function with `fglob = 0` whose value depends only on the call index.
pub struct ScriptedFunction {
    calls: AtomicUsize,
    script: Box<dyn Fn(usize) -> f64 + Send + Sync>,
}

impl ScriptedFunction {
    /// `script` receives the 1-based call index.
    pub fn new(script: impl Fn(usize) -> f64 + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            script: Box::new(script),
        })
    }
}

impl TestFunction for ScriptedFunction {
    fn name(&self) -> &str {
        "scripted"
    }

    fn dimension(&self) -> usize {
        2
    }

    fn bounds(&self) -> Vec<(f64, f64)> {
        vec![(-1.0, 1.0); 2]
    }

    fn global_optimum(&self) -> f64 {
        0.0
    }

    fn evaluate(&self, _x: &Array1<f64>) -> f64 {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        (self.script)(call)
    }
}

/// Context over `function` with the given budget and allowance.
pub fn context(
    function: Arc<dyn TestFunction>,
    budget: usize,
    ls_allowance: usize,
    record_trajectory: bool,
) -> Arc<RunContext> {
    let settings = RunSettings {
        call_budget: budget,
        ls_allowance,
        record_trajectory,
        ..RunSettings::default()
    };
    Arc::new(RunContext::setup(function, &settings, 1234))
}

/// Evaluates its start point until the adapter raises a signal.
pub struct Sweep;

impl Optimizer for Sweep {
    fn name(&self) -> &str {
        "sweep"
    }

    fn minimize(
        &self,
        ctx: &Arc<RunContext>,
        start: &Array1<f64>,
        _seed: u64,
    ) -> Result<Option<Candidate>, OptimizerError> {
        loop {
            ctx.evaluate(start)?;
        }
    }
}

/// Evaluates fresh random points until the adapter raises a signal.
pub struct RandomSweep;

impl Optimizer for RandomSweep {
    fn name(&self) -> &str {
        "random-sweep"
    }

    fn minimize(
        &self,
        ctx: &Arc<RunContext>,
        _start: &Array1<f64>,
        _seed: u64,
    ) -> Result<Option<Candidate>, OptimizerError> {
        loop {
            let x = ctx.random_point();
            ctx.evaluate(&x)?;
        }
    }
}

/// What one scripted invocation does.
#[derive(Debug, Clone)]
pub enum Step {
    /// Perform `evals` evaluations, then report a candidate with `value`
    /// at point `[tag]`.
    Report { evals: usize, value: f64, tag: f64 },
    /// Perform `evals` evaluations, then stop without a candidate.
    Nothing { evals: usize },
    /// Perform `evals` evaluations, then fail with `message`.
    Fail { evals: usize, message: &'static str },
    /// Perform `evals` evaluations, then panic.
    Panic { evals: usize },
    /// Evaluate until the adapter raises a signal, then panic on it the way
    /// a solver unwrapping the objective's result does.
    Unwrap,
}

/// Replays a list of steps, one per invocation; evaluates forever once the
/// script is exhausted.
pub struct Scripted {
    steps: Mutex<VecDeque<Step>>,
    starts: Mutex<Vec<Array1<f64>>>,
}

impl Scripted {
    pub fn new(steps: Vec<Step>) -> Arc<Self> {
        Arc::new(Self {
            steps: Mutex::new(steps.into()),
            starts: Mutex::new(Vec::new()),
        })
    }

    /// Start points received so far.
    pub fn starts(&self) -> Vec<Array1<f64>> {
        self.starts.lock().clone()
    }
}

impl Optimizer for Scripted {
    fn name(&self) -> &str {
        "scripted"
    }

    fn minimize(
        &self,
        ctx: &Arc<RunContext>,
        start: &Array1<f64>,
        _seed: u64,
    ) -> Result<Option<Candidate>, OptimizerError> {
        self.starts.lock().push(start.clone());
        let step = self.steps.lock().pop_front();
        let evaluate_n = |n: usize| -> Result<(), OptimizerError> {
            for _ in 0..n {
                ctx.evaluate(start)?;
            }
            Ok(())
        };
        match step {
            Some(Step::Report { evals, value, tag }) => {
                evaluate_n(evals)?;
                Ok(Some(Candidate::new(Array1::from(vec![tag]), value)))
            }
            Some(Step::Nothing { evals }) => {
                evaluate_n(evals)?;
                Ok(None)
            }
            Some(Step::Fail { evals, message }) => {
                evaluate_n(evals)?;
                Err(OptimizerError::msg(message))
            }
            Some(Step::Panic { evals }) => {
                evaluate_n(evals)?;
                panic!("scripted panic after {evals} evaluations");
            }
            Some(Step::Unwrap) => loop {
                ctx.evaluate(start).unwrap();
            },
            None => loop {
                ctx.evaluate(start)?;
            },
        }
    }
}

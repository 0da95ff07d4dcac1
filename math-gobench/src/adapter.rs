//! Objective instrumentation.
//!
//! A [`RunContext`] wraps one test function for the duration of one run. Every
//! optimizer evaluates the objective through [`RunContext::evaluate`], which
//! counts calls, records the best-so-far trajectory, detects the first hit of
//! the known optimum and enforces the call budget.
//!
//! Third-party optimizers only see a plain cost callback, so the adapter stops
//! them by returning a [`Signal`] from inside that callback. The signal travels
//! out of the optimizer as an error and is turned back into a run outcome by
//! the strategy layer.

use math_test_functions::TestFunction;
use ndarray::Array1;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Abort conditions raised from inside the objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Signal {
    /// The known global optimum has been reached within tolerance.
    #[error("optimum found")]
    OptimumFound,
    /// The call budget is spent.
    #[error("call budget exhausted")]
    BudgetExhausted,
    /// A refinement phase has no point to start from.
    #[error("no starting point for local refinement")]
    NoStartingPoint,
}

/// Per-run limits shared by every algorithm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    /// Maximum number of objective evaluations per run.
    pub call_budget: usize,
    /// A value within `tolerance` of the global optimum counts as a hit.
    pub tolerance: f64,
    /// Extra evaluations granted once to a deferred local search.
    pub ls_allowance: usize,
    /// Keep the best-so-far value of every evaluation up to the first hit.
    pub record_trajectory: bool,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            call_budget: 1_000_000,
            tolerance: 1e-6,
            ls_allowance: 10_000,
            record_trajectory: false,
        }
    }
}

/// A point together with its objective value.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Location in the search space
    pub point: Array1<f64>,
    /// Objective value at `point`
    pub value: f64,
}

impl Candidate {
    /// Bundles a point with its value.
    pub fn new(point: Array1<f64>, value: f64) -> Self {
        Self { point, value }
    }
}

/// Data captured at the first hit.
#[derive(Debug, Clone, PartialEq)]
pub struct SuccessRecord {
    /// Objective value of the hit
    pub value: f64,
    /// Point of the hit
    pub point: Array1<f64>,
    /// 1-based index of the evaluation that hit
    pub call_index: usize,
    /// Time from run start to the hit
    pub elapsed: Duration,
}

#[derive(Debug)]
struct ContextState {
    call_count: usize,
    call_budget: usize,
    first_hit: bool,
    favor_context: bool,
    budget_extended: bool,
    success: Option<SuccessRecord>,
    trajectory: Vec<f64>,
    incumbent: Option<Candidate>,
    last_eval: Option<(Array1<f64>, f64)>,
    last_signal: Option<(Signal, usize)>,
    rng: StdRng,
}

/// Instrumented view of a test function for one run.
pub struct RunContext {
    function: Arc<dyn TestFunction>,
    settings: RunSettings,
    fglob: f64,
    lower: Array1<f64>,
    upper: Array1<f64>,
    seed: u64,
    initial_point: Array1<f64>,
    start: Instant,
    state: Mutex<ContextState>,
}

impl std::fmt::Debug for RunContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunContext")
            .field("function", &self.function.name())
            .field("seed", &self.seed)
            .field("call_count", &self.call_count())
            .field("call_budget", &self.call_budget())
            .finish()
    }
}

impl RunContext {
    /// Prepares a fresh run of `function` driven by `seed`.
    ///
    /// The initial point is drawn uniformly within bounds from a generator
    /// seeded with `seed`; the same generator later provides restart points and
    /// the seeds handed to optimizers, so a run is reproducible from its seed.
    pub fn setup(function: Arc<dyn TestFunction>, settings: &RunSettings, seed: u64) -> Self {
        let bounds = function.bounds();
        let lower = Array1::from_iter(bounds.iter().map(|&(lo, _)| lo));
        let upper = Array1::from_iter(bounds.iter().map(|&(_, hi)| hi));
        let mut rng = StdRng::seed_from_u64(seed);
        let initial_point = uniform_point(&mut rng, &lower, &upper);
        let fglob = function.global_optimum();

        Self {
            function,
            settings: settings.clone(),
            fglob,
            lower,
            upper,
            seed,
            initial_point,
            start: Instant::now(),
            state: Mutex::new(ContextState {
                call_count: 0,
                call_budget: settings.call_budget,
                first_hit: true,
                favor_context: false,
                budget_extended: false,
                success: None,
                trajectory: Vec::new(),
                incumbent: None,
                last_eval: None,
                last_signal: None,
                rng,
            }),
        }
    }

    /// Evaluates the objective at `point` and applies the run bookkeeping.
    ///
    /// Returns the objective value, or the [`Signal`] that must abort the
    /// current optimizer invocation. The call is counted before the budget is
    /// compared, so the evaluation that crosses the budget can still be a hit.
    pub fn evaluate(&self, point: &Array1<f64>) -> Result<f64, Signal> {
        let value = self.function.evaluate(point);

        let mut state = self.state.lock();
        state.call_count += 1;
        state.last_eval = Some((point.clone(), value));

        if !value.is_nan() {
            let improves = state
                .incumbent
                .as_ref()
                .is_none_or(|best| value < best.value);
            if improves {
                state.incumbent = Some(Candidate::new(point.clone(), value));
            }
        }

        if state.first_hit && self.settings.record_trajectory {
            let sample = match state.trajectory.last() {
                Some(&last) if value.is_nan() || value >= last => last,
                _ if value.is_nan() => f64::INFINITY,
                _ => value,
            };
            state.trajectory.push(sample);
        }

        if state.first_hit && value <= self.fglob + self.settings.tolerance {
            state.first_hit = false;
            state.success = Some(SuccessRecord {
                value,
                point: point.clone(),
                call_index: state.call_count,
                elapsed: self.start.elapsed(),
            });
            state.last_signal = Some((Signal::OptimumFound, state.call_count));
            return Err(Signal::OptimumFound);
        }

        if state.call_count >= state.call_budget {
            if state.favor_context && !state.budget_extended {
                state.call_budget += self.settings.ls_allowance;
                state.budget_extended = true;
            }
            state.last_signal = Some((Signal::BudgetExhausted, state.call_count));
            return Err(Signal::BudgetExhausted);
        }

        Ok(value)
    }

    /// Same as [`evaluate`](Self::evaluate) after clamping `point` into the bounds.
    pub fn evaluate_clamped(&self, point: &[f64]) -> Result<f64, Signal> {
        let x = self.clamp(point);
        self.evaluate(&x)
    }

    /// Projects `point` onto the bounding box.
    pub fn clamp(&self, point: &[f64]) -> Array1<f64> {
        Array1::from_iter(
            point
                .iter()
                .zip(self.lower.iter().zip(self.upper.iter()))
                .map(|(&x, (&lo, &hi))| x.clamp(lo, hi)),
        )
    }

    /// Enables or disables the one-time budget extension.
    pub fn set_favor_context(&self, favor: bool) {
        self.state.lock().favor_context = favor;
    }

    /// Draws a new uniform point within bounds from the run generator.
    pub fn random_point(&self) -> Array1<f64> {
        let mut state = self.state.lock();
        uniform_point(&mut state.rng, &self.lower, &self.upper)
    }

    /// Derives a seed for an optimizer's own generator.
    pub fn fork_seed(&self) -> u64 {
        self.state.lock().rng.next_u64()
    }

    /// The function under test.
    pub fn function(&self) -> &Arc<dyn TestFunction> {
        &self.function
    }

    /// Settings this run was created with.
    pub fn settings(&self) -> &RunSettings {
        &self.settings
    }

    /// Seed the run was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Lower bounds, one per variable.
    pub fn lower(&self) -> &Array1<f64> {
        &self.lower
    }

    /// Upper bounds, one per variable.
    pub fn upper(&self) -> &Array1<f64> {
        &self.upper
    }

    /// Starting point drawn at setup.
    pub fn initial_point(&self) -> &Array1<f64> {
        &self.initial_point
    }

    /// Number of evaluations performed so far.
    pub fn call_count(&self) -> usize {
        self.state.lock().call_count
    }

    /// Current budget, including any extension.
    pub fn call_budget(&self) -> usize {
        self.state.lock().call_budget
    }

    /// Whether evaluations remain before the budget.
    pub fn budget_left(&self) -> bool {
        let state = self.state.lock();
        state.call_count < state.call_budget
    }

    /// `true` until the optimum has been hit.
    pub fn first_hit(&self) -> bool {
        self.state.lock().first_hit
    }

    /// Whether the budget extension has been consumed.
    pub fn budget_extended(&self) -> bool {
        self.state.lock().budget_extended
    }

    /// The first hit, if any.
    pub fn success(&self) -> Option<SuccessRecord> {
        self.state.lock().success.clone()
    }

    /// Best value ever evaluated in this run.
    pub fn incumbent(&self) -> Option<Candidate> {
        self.state.lock().incumbent.clone()
    }

    /// Best-so-far samples recorded up to the first hit.
    pub fn trajectory(&self) -> Vec<f64> {
        self.state.lock().trajectory.clone()
    }

    /// The last signal raised by [`evaluate`](Self::evaluate), with the call
    /// index that raised it.
    ///
    /// Lets a caller recover the abort reason when a solver swallows the
    /// error returned from its cost callback.
    pub fn last_signal(&self) -> Option<(Signal, usize)> {
        self.state.lock().last_signal
    }

    /// Value of the most recent evaluation if it was made at exactly `point`.
    pub fn last_value_at(&self, point: &Array1<f64>) -> Option<f64> {
        match &self.state.lock().last_eval {
            Some((x, value)) if x == point => Some(*value),
            _ => None,
        }
    }

    /// Time since setup.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

fn uniform_point(rng: &mut StdRng, lower: &Array1<f64>, upper: &Array1<f64>) -> Array1<f64> {
    Array1::from_iter(
        lower
            .iter()
            .zip(upper.iter())
            .map(|(&lo, &hi)| rng.gen_range(lo..=hi)),
    )
}

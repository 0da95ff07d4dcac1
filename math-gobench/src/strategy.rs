//! Algorithm strategies.
//!
//! A strategy decides how often and from where an optimizer is invoked within
//! one run, and turns the signals raised by the adapter into a [`RunOutcome`].
//! Signals never travel past [`Algorithm::run`].

use crate::adapter::{Candidate, RunContext, Signal};
use crate::optimizers::{Optimizer, OptimizerError, guarded, signal_of};
use log::{debug, error, warn};
use ndarray::Array1;
use std::fmt;
use std::sync::Arc;

/// How an optimizer is driven within a run.
#[derive(Clone)]
pub enum Strategy {
    /// One invocation, to convergence or to a signal.
    SingleShot,
    /// Fresh random starts until the budget is spent or the optimum is hit.
    RestartUntilBudget,
    /// Global search with the budget extension enabled, then one local
    /// refinement from the best point found.
    SearchThenRefine {
        /// Restart the global phase until the budget is spent
        restart: bool,
        /// Local optimizer used for the refinement pass
        refiner: Arc<dyn Optimizer>,
    },
}

impl fmt::Debug for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::SingleShot => write!(f, "SingleShot"),
            Strategy::RestartUntilBudget => write!(f, "RestartUntilBudget"),
            Strategy::SearchThenRefine { restart, refiner } => f
                .debug_struct("SearchThenRefine")
                .field("restart", restart)
                .field("refiner", &refiner.name())
                .finish(),
        }
    }
}

/// Result of one run, as written to the result record.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    /// Whether the optimum was hit
    pub success: bool,
    /// Call index of the hit, or the configured budget when not hit
    pub ncall_success: usize,
    /// Objective value at the hit
    pub success_value: Option<f64>,
    /// Point of the hit
    pub success_point: Option<Array1<f64>>,
    /// Seconds from run start to the hit
    pub duration: Option<f64>,
    /// Evaluations performed
    pub ncall_max: usize,
    /// Best point reported by the strategy
    pub best: Option<Candidate>,
    /// Reason for an abnormal termination
    pub note: Option<String>,
}

impl RunOutcome {
    fn from_context(ctx: &RunContext, best: Option<Candidate>, note: Option<String>) -> Self {
        let hit = ctx.success();
        Self {
            success: hit.is_some(),
            ncall_success: hit
                .as_ref()
                .map_or(ctx.settings().call_budget, |h| h.call_index),
            success_value: hit.as_ref().map(|h| h.value),
            success_point: hit.as_ref().map(|h| h.point.clone()),
            duration: hit.as_ref().map(|h| h.elapsed.as_secs_f64()),
            ncall_max: ctx.call_count(),
            best,
            note,
        }
    }
}

/// A named optimizer together with the strategy driving it.
#[derive(Clone)]
pub struct Algorithm {
    name: String,
    strategy: Strategy,
    optimizer: Arc<dyn Optimizer>,
    exhaustive: bool,
}

impl fmt::Debug for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Algorithm")
            .field("name", &self.name)
            .field("strategy", &self.strategy)
            .field("optimizer", &self.optimizer.name())
            .field("exhaustive", &self.exhaustive)
            .finish()
    }
}

impl Algorithm {
    /// Binds `optimizer` to `strategy` under `name`.
    pub fn new(name: impl Into<String>, strategy: Strategy, optimizer: Arc<dyn Optimizer>) -> Self {
        Self {
            name: name.into(),
            strategy,
            optimizer,
            exhaustive: false,
        }
    }

    /// Marks the algorithm as deterministic exhaustive search.
    ///
    /// Only the first run of such an algorithm is computed; the others are
    /// copies of it.
    pub fn exhaustive(mut self) -> Self {
        self.exhaustive = true;
        self
    }

    /// Name used in record file names and logs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether runs beyond the first are replicated.
    pub fn is_exhaustive(&self) -> bool {
        self.exhaustive
    }

    /// The driving strategy.
    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// Performs run number `run` on `ctx`.
    ///
    /// Never fails: the optimum signal becomes a success, budget exhaustion a
    /// failure, and any other error (a panicking optimizer included) a failure
    /// carrying a note.
    pub fn run(&self, ctx: &Arc<RunContext>, run: usize) -> RunOutcome {
        let result = guarded(ctx, || match &self.strategy {
            Strategy::SingleShot => self.optimizer.minimize(ctx, ctx.initial_point(), ctx.fork_seed()),
            Strategy::RestartUntilBudget => restart_until_budget(ctx, self.optimizer.as_ref()),
            Strategy::SearchThenRefine { restart, refiner } => {
                search_then_refine(ctx, self.optimizer.as_ref(), *restart, refiner.as_ref())
            }
        });

        match result {
            Ok(best) => RunOutcome::from_context(ctx, best, None),
            Err(err) => {
                let note = match signal_of(&err) {
                    Some(Signal::OptimumFound) | Some(Signal::BudgetExhausted) => None,
                    Some(Signal::NoStartingPoint) => {
                        error!(
                            "Func: {} - Algo: {} - RUN: {}: no starting point for local search after {} calls",
                            ctx.function().name(),
                            self.name,
                            run,
                            ctx.call_count()
                        );
                        Some(err.to_string())
                    }
                    None if ctx.success().is_some() => None,
                    None => {
                        warn!(
                            "Func: {} - Algo: {} - RUN: {}: optimizer failed after {} calls: {}",
                            ctx.function().name(),
                            self.name,
                            run,
                            ctx.call_count(),
                            err
                        );
                        Some(err.to_string())
                    }
                };
                RunOutcome::from_context(ctx, ctx.incumbent(), note)
            }
        }
    }
}

/// Keeps the better of `best` and `candidate`.
///
/// A strictly lower value wins, so on a tie the earlier candidate stays.
/// NaN values never replace anything.
pub fn keep_best(best: Option<Candidate>, candidate: Candidate) -> Option<Candidate> {
    match best {
        Some(current) if candidate.value.is_nan() || candidate.value >= current.value => {
            Some(current)
        }
        None if candidate.value.is_nan() => None,
        _ => Some(candidate),
    }
}

/// Restarts `optimizer` from fresh points until the budget is spent.
///
/// Returns the best candidate over all restarts when the budget runs out;
/// the optimum signal and unexpected errors propagate.
pub fn restart_until_budget(
    ctx: &Arc<RunContext>,
    optimizer: &dyn Optimizer,
) -> Result<Option<Candidate>, OptimizerError> {
    let mut best: Option<Candidate> = None;
    let mut start = ctx.initial_point().clone();
    let mut restarts = 0usize;

    loop {
        let calls_before = ctx.call_count();
        match optimizer.minimize(ctx, &start, ctx.fork_seed()) {
            Ok(Some(candidate)) => best = keep_best(best, candidate),
            Ok(None) => {}
            Err(err) => {
                return match signal_of(&err) {
                    Some(Signal::BudgetExhausted) => Ok(best),
                    _ => Err(err),
                };
            }
        }

        restarts += 1;
        if ctx.call_count() == calls_before {
            debug!(
                "{}: restart {} made no evaluation, stopping",
                optimizer.name(),
                restarts
            );
            return Ok(best);
        }
        if !ctx.budget_left() {
            return Ok(best);
        }
        start = ctx.random_point();
    }
}

fn search_then_refine(
    ctx: &Arc<RunContext>,
    optimizer: &dyn Optimizer,
    restart: bool,
    refiner: &dyn Optimizer,
) -> Result<Option<Candidate>, OptimizerError> {
    ctx.set_favor_context(true);
    let global = if restart {
        restart_until_budget(ctx, optimizer)
    } else {
        match optimizer.minimize(ctx, ctx.initial_point(), ctx.fork_seed()) {
            Err(err) if signal_of(&err) == Some(Signal::BudgetExhausted) => Ok(None),
            other => other,
        }
    };
    ctx.set_favor_context(false);
    let global = global?;

    let start = global
        .clone()
        .or_else(|| ctx.incumbent())
        .ok_or(Signal::NoStartingPoint)?;
    debug!(
        "{}: local search from value {} after {} calls",
        refiner.name(),
        start.value,
        ctx.call_count()
    );

    let refined = refiner.minimize(ctx, &start.point, ctx.fork_seed());
    match refined {
        Ok(Some(candidate)) => Ok(keep_best(global, candidate)),
        Ok(None) => Ok(global),
        Err(err) if signal_of(&err) == Some(Signal::BudgetExhausted) => Ok(global),
        Err(err) => Err(err),
    }
}

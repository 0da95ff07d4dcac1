//! Third-party optimizers behind one calling convention.
//!
//! Each [`Optimizer`] drives an argmin solver (or, for [`GridSearch`], a plain
//! enumeration) over an [`Instrumented`] problem whose cost function is the
//! run context. Signals raised by the context come back out of the solver as
//! [`OptimizerError`] values; [`signal_of`] recovers them. Solvers that
//! unwrap their first cost evaluations are run through [`guarded`].

use crate::adapter::{Candidate, RunContext, Signal};
use argmin::core::{CostFunction, Executor, Gradient, State};
use argmin::solver::linesearch::MoreThuenteLineSearch;
use argmin::solver::neldermead::NelderMead;
use argmin::solver::particleswarm::ParticleSwarm;
use argmin::solver::quasinewton::LBFGS;
use argmin::solver::simulatedannealing::{Anneal, SATempFunc, SimulatedAnnealing};
use log::debug;
use ndarray::Array1;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Error type flowing out of optimizer invocations.
pub use argmin::core::Error as OptimizerError;

/// Relative step of the forward-difference gradient.
const FD_STEP: f64 = 1.490_116_119_384_765_6e-8;

/// A global or local optimizer evaluated through a [`RunContext`].
pub trait Optimizer: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Minimizes the run's objective starting near `start`.
    ///
    /// `seed` drives any internal randomness. Returns the best point found
    /// when the optimizer stops on its own, `Ok(None)` when it stops without
    /// a usable point, and an error when aborted by a [`Signal`] or failing.
    fn minimize(
        &self,
        ctx: &Arc<RunContext>,
        start: &Array1<f64>,
        seed: u64,
    ) -> Result<Option<Candidate>, OptimizerError>;
}

/// Extracts the run signal carried by an optimizer error, if any.
pub fn signal_of(err: &OptimizerError) -> Option<Signal> {
    err.downcast_ref::<Signal>().copied()
}

/// Runs `solve`, turning a panic inside it into an error.
///
/// argmin's Nelder-Mead unwraps the costs of its initial simplex, so a signal
/// raised there unwinds instead of returning. The signal the context raised
/// during `solve`, if any, replaces the panic; otherwise the panic message
/// becomes an ordinary optimizer error.
pub fn guarded<T>(
    ctx: &RunContext,
    solve: impl FnOnce() -> Result<T, OptimizerError>,
) -> Result<T, OptimizerError> {
    let calls_before = ctx.call_count();
    match panic::catch_unwind(AssertUnwindSafe(solve)) {
        Ok(result) => result,
        Err(payload) => match ctx.last_signal() {
            Some((signal, at)) if at > calls_before => {
                debug!(
                    "{}: solver unwound on {:?} at call {}",
                    ctx.function().name(),
                    signal,
                    at
                );
                Err(signal.into())
            }
            _ => Err(OptimizerError::msg(format!(
                "optimizer panicked: {}",
                panic_message(payload.as_ref())
            ))),
        },
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

/// argmin problem evaluating the objective through a run context.
///
/// Points are clamped into the bounds before evaluation.
#[derive(Clone)]
pub struct Instrumented {
    ctx: Arc<RunContext>,
}

impl Instrumented {
    /// Wraps `ctx` as an argmin problem.
    pub fn new(ctx: &Arc<RunContext>) -> Self {
        Self {
            ctx: Arc::clone(ctx),
        }
    }
}

impl CostFunction for Instrumented {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, param: &Self::Param) -> Result<Self::Output, OptimizerError> {
        Ok(self.ctx.evaluate_clamped(param)?)
    }
}

impl Gradient for Instrumented {
    type Param = Vec<f64>;
    type Gradient = Vec<f64>;

    // forward differences, every probe is a counted call; the base value
    // comes from the cost call argmin just made at the same point
    fn gradient(&self, param: &Self::Param) -> Result<Self::Gradient, OptimizerError> {
        let x = self.ctx.clamp(param);
        let f0 = match self.ctx.last_value_at(&x) {
            Some(value) => value,
            None => self.ctx.evaluate(&x)?,
        };
        let upper = self.ctx.upper();

        let mut grad = vec![0.0; x.len()];
        for i in 0..x.len() {
            let h = FD_STEP * x[i].abs().max(1.0);
            let step = if x[i] + h <= upper[i] { h } else { -h };
            let mut probe = x.clone();
            probe[i] += step;
            let fi = self.ctx.evaluate(&probe)?;
            grad[i] = (fi - f0) / step;
        }
        Ok(grad)
    }
}

/// Particle swarm over the whole bounding box.
#[derive(Debug, Clone)]
pub struct ParticleSwarmOptimizer {
    /// Swarm size
    pub particles: usize,
    /// Iteration cap; the call budget normally stops the swarm first
    pub max_iters: u64,
}

impl Default for ParticleSwarmOptimizer {
    fn default() -> Self {
        Self {
            particles: 40,
            max_iters: u64::MAX,
        }
    }
}

impl Optimizer for ParticleSwarmOptimizer {
    fn name(&self) -> &str {
        "particle-swarm"
    }

    fn minimize(
        &self,
        ctx: &Arc<RunContext>,
        _start: &Array1<f64>,
        seed: u64,
    ) -> Result<Option<Candidate>, OptimizerError> {
        let bounds = (ctx.lower().to_vec(), ctx.upper().to_vec());
        let solver = ParticleSwarm::new(bounds, self.particles)
            .with_rng_generator(StdRng::seed_from_u64(seed));

        let res = guarded(ctx, || {
            Executor::new(Instrumented::new(ctx), solver)
                .configure(|state| state.max_iters(self.max_iters))
                .run()
        })?;

        let state = res.state();
        Ok(state
            .get_best_param()
            .map(|best| Candidate::new(ctx.clamp(&best.position), state.get_best_cost())))
    }
}

/// Nelder-Mead simplex started around a point.
#[derive(Debug, Clone)]
pub struct NelderMeadOptimizer {
    /// Simplex edge as a fraction of each variable's range
    pub step_fraction: f64,
    /// Stop once the standard deviation of simplex values falls below this
    pub sd_tolerance: f64,
    /// Iteration cap
    pub max_iters: u64,
}

impl Default for NelderMeadOptimizer {
    fn default() -> Self {
        Self {
            step_fraction: 0.05,
            sd_tolerance: 1e-10,
            max_iters: 10_000,
        }
    }
}

impl NelderMeadOptimizer {
    fn simplex(&self, ctx: &RunContext, start: &Array1<f64>) -> Vec<Vec<f64>> {
        let origin = ctx.clamp(&start.to_vec());
        let mut vertices = vec![origin.to_vec()];
        for i in 0..origin.len() {
            let (lo, hi) = (ctx.lower()[i], ctx.upper()[i]);
            let step = self.step_fraction * (hi - lo);
            let mut vertex = origin.to_vec();
            vertex[i] = if vertex[i] + step <= hi {
                vertex[i] + step
            } else {
                vertex[i] - step
            };
            vertices.push(vertex);
        }
        vertices
    }
}

impl Optimizer for NelderMeadOptimizer {
    fn name(&self) -> &str {
        "nelder-mead"
    }

    fn minimize(
        &self,
        ctx: &Arc<RunContext>,
        start: &Array1<f64>,
        _seed: u64,
    ) -> Result<Option<Candidate>, OptimizerError> {
        let solver = NelderMead::new(self.simplex(ctx, start)).with_sd_tolerance(self.sd_tolerance)?;

        let res = guarded(ctx, || {
            Executor::new(Instrumented::new(ctx), solver)
                .configure(|state| state.max_iters(self.max_iters))
                .run()
        })?;

        let state = res.state();
        Ok(state
            .get_best_param()
            .map(|best| Candidate::new(ctx.clamp(best), state.get_best_cost())))
    }
}

/// Limited-memory BFGS with a Moré-Thuente line search.
///
/// The gradient is estimated by finite differences and every point is
/// projected into the bounds, which makes this a box-constrained stand-in
/// for L-BFGS-B.
#[derive(Debug, Clone)]
pub struct LbfgsOptimizer {
    /// Number of correction pairs kept
    pub memory: usize,
    /// Iteration cap
    pub max_iters: u64,
}

impl Default for LbfgsOptimizer {
    fn default() -> Self {
        Self {
            memory: 7,
            max_iters: 1_000,
        }
    }
}

impl Optimizer for LbfgsOptimizer {
    fn name(&self) -> &str {
        "lbfgs"
    }

    fn minimize(
        &self,
        ctx: &Arc<RunContext>,
        start: &Array1<f64>,
        _seed: u64,
    ) -> Result<Option<Candidate>, OptimizerError> {
        let init = ctx.clamp(&start.to_vec()).to_vec();
        let solver = LBFGS::new(MoreThuenteLineSearch::new(), self.memory);

        let result = guarded(ctx, || {
            Executor::new(Instrumented::new(ctx), solver)
                .configure(|state| state.param(init).max_iters(self.max_iters))
                .run()
        });

        match result {
            Ok(res) => {
                let state = res.state();
                Ok(state
                    .get_best_param()
                    .map(|best| Candidate::new(ctx.clamp(best), state.get_best_cost())))
            }
            Err(err) if signal_of(&err).is_some() => Err(err),
            Err(err) => {
                // line search breakdown on a flat or clamped region
                debug!("{}: lbfgs stopped early: {}", ctx.function().name(), err);
                Ok(None)
            }
        }
    }
}

/// [`Instrumented`] problem with a bounded random neighbour move.
struct Annealed {
    inner: Instrumented,
    rng: Mutex<StdRng>,
}

impl CostFunction for Annealed {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, param: &Self::Param) -> Result<Self::Output, OptimizerError> {
        self.inner.cost(param)
    }
}

impl Anneal for Annealed {
    type Param = Vec<f64>;
    type Output = Vec<f64>;
    type Float = f64;

    // moves floor(temperature) + 1 coordinates by up to a tenth of their range
    fn anneal(&self, param: &Vec<f64>, extent: f64) -> Result<Vec<f64>, OptimizerError> {
        let ctx = &self.inner.ctx;
        let mut next = param.clone();
        let mut rng = self.rng.lock();
        let moves = (extent.max(0.0).floor() as usize + 1).min(next.len());
        for _ in 0..moves {
            let i = rng.gen_range(0..next.len());
            let (lo, hi) = (ctx.lower()[i], ctx.upper()[i]);
            let step = 0.1 * (hi - lo) * rng.gen_range(-1.0..1.0);
            next[i] = (next[i] + step).clamp(lo, hi);
        }
        Ok(next)
    }
}

/// Simulated annealing started from a point.
#[derive(Debug, Clone)]
pub struct SimulatedAnnealingOptimizer {
    /// Starting temperature
    pub initial_temperature: f64,
    /// Stop after this many iterations without a new best point
    pub stall_best: u64,
    /// Iteration cap
    pub max_iters: u64,
}

impl Default for SimulatedAnnealingOptimizer {
    fn default() -> Self {
        Self {
            initial_temperature: 15.0,
            stall_best: 1_000,
            max_iters: 100_000,
        }
    }
}

impl Optimizer for SimulatedAnnealingOptimizer {
    fn name(&self) -> &str {
        "simulated-annealing"
    }

    fn minimize(
        &self,
        ctx: &Arc<RunContext>,
        start: &Array1<f64>,
        seed: u64,
    ) -> Result<Option<Candidate>, OptimizerError> {
        let init = ctx.clamp(&start.to_vec()).to_vec();
        let problem = Annealed {
            inner: Instrumented::new(ctx),
            rng: Mutex::new(StdRng::seed_from_u64(seed.wrapping_add(1))),
        };
        let solver = SimulatedAnnealing::new_with_rng(
            self.initial_temperature,
            StdRng::seed_from_u64(seed),
        )?
        .with_temp_func(SATempFunc::Boltzmann)
        .with_stall_best(self.stall_best);

        let res = guarded(ctx, || {
            Executor::new(problem, solver)
                .configure(|state| state.param(init).max_iters(self.max_iters))
                .run()
        })?;

        let state = res.state();
        Ok(state
            .get_best_param()
            .map(|best| Candidate::new(ctx.clamp(best), state.get_best_cost())))
    }
}

/// Exhaustive grid over the bounds followed by a Nelder-Mead polish.
///
/// Fully deterministic: the start point and seed are ignored.
#[derive(Debug, Clone)]
pub struct GridSearch {
    /// Grid points along each variable
    pub points_per_dim: usize,
    /// Local polish from the best grid point, if any
    pub finish: Option<NelderMeadOptimizer>,
}

impl Default for GridSearch {
    fn default() -> Self {
        Self {
            points_per_dim: 20,
            finish: Some(NelderMeadOptimizer::default()),
        }
    }
}

impl GridSearch {
    fn coordinate(&self, lo: f64, hi: f64, k: usize) -> f64 {
        if self.points_per_dim < 2 {
            0.5 * (lo + hi)
        } else {
            lo + (hi - lo) * k as f64 / (self.points_per_dim - 1) as f64
        }
    }
}

impl Optimizer for GridSearch {
    fn name(&self) -> &str {
        "grid"
    }

    fn minimize(
        &self,
        ctx: &Arc<RunContext>,
        _start: &Array1<f64>,
        seed: u64,
    ) -> Result<Option<Candidate>, OptimizerError> {
        let n = ctx.lower().len();
        let per_dim = self.points_per_dim.max(1);
        let mut index = vec![0usize; n];
        let mut best: Option<Candidate> = None;

        loop {
            let point = Array1::from_iter(
                index
                    .iter()
                    .enumerate()
                    .map(|(i, &k)| self.coordinate(ctx.lower()[i], ctx.upper()[i], k)),
            );
            let value = ctx.evaluate(&point)?;
            if best.as_ref().is_none_or(|b| value < b.value) {
                best = Some(Candidate::new(point, value));
            }

            if !advance(&mut index, per_dim) {
                break;
            }
        }

        match (&self.finish, best) {
            (Some(polish), Some(grid_best)) => {
                let polished = polish.minimize(ctx, &grid_best.point, seed)?;
                Ok(Some(match polished {
                    Some(p) if p.value < grid_best.value => p,
                    _ => grid_best,
                }))
            }
            (_, best) => Ok(best),
        }
    }
}

// odometer increment, last variable fastest; false once the grid wraps
fn advance(index: &mut [usize], base: usize) -> bool {
    for digit in index.iter_mut().rev() {
        *digit += 1;
        if *digit < base {
            return true;
        }
        *digit = 0;
    }
    false
}

//! Catalogue of benchmarked algorithms.

use crate::config::BenchConfig;
use crate::error::{BenchError, Result};
use crate::optimizers::{
    GridSearch, LbfgsOptimizer, NelderMeadOptimizer, Optimizer, ParticleSwarmOptimizer,
    SimulatedAnnealingOptimizer,
};
use crate::strategy::{Algorithm, Strategy};
use std::sync::Arc;

/// Every algorithm name, in catalogue order.
pub const ALGORITHM_NAMES: [&str; 9] = [
    "PSO", "PSO-R", "PSO-LS", "PSO-LS-R", "NM-R", "LBFGS-R", "SA", "SA-LS", "BF",
];

/// One-line description of an algorithm, for listings.
pub fn describe(name: &str) -> Option<&'static str> {
    let text = match name {
        "PSO" => "particle swarm, single run",
        "PSO-R" => "particle swarm, restarted until the budget is spent",
        "PSO-LS" => "particle swarm followed by an L-BFGS local search",
        "PSO-LS-R" => "restarted particle swarm followed by an L-BFGS local search",
        "NM-R" => "Nelder-Mead simplex, restarted from random points",
        "LBFGS-R" => "bounded L-BFGS with numerical gradient, restarted from random points",
        "SA" => "simulated annealing with Boltzmann cooling, single run",
        "SA-LS" => "simulated annealing followed by an L-BFGS local search",
        "BF" => "brute force grid with Nelder-Mead polish (deterministic)",
        _ => return None,
    };
    Some(text)
}

/// Builds the algorithm called `name`, sized by `config`.
pub fn build(name: &str, config: &BenchConfig) -> Result<Algorithm> {
    let pso: Arc<dyn Optimizer> = Arc::new(ParticleSwarmOptimizer {
        particles: config.pso_particles,
        ..ParticleSwarmOptimizer::default()
    });
    let lbfgs: Arc<dyn Optimizer> = Arc::new(LbfgsOptimizer::default());

    let algorithm = match name {
        "PSO" => Algorithm::new(name, Strategy::SingleShot, pso),
        "PSO-R" => Algorithm::new(name, Strategy::RestartUntilBudget, pso),
        "PSO-LS" => Algorithm::new(
            name,
            Strategy::SearchThenRefine {
                restart: false,
                refiner: lbfgs,
            },
            pso,
        ),
        "PSO-LS-R" => Algorithm::new(
            name,
            Strategy::SearchThenRefine {
                restart: true,
                refiner: lbfgs,
            },
            pso,
        ),
        "NM-R" => Algorithm::new(
            name,
            Strategy::RestartUntilBudget,
            Arc::new(NelderMeadOptimizer::default()),
        ),
        "LBFGS-R" => Algorithm::new(name, Strategy::RestartUntilBudget, lbfgs),
        "SA" => Algorithm::new(
            name,
            Strategy::SingleShot,
            Arc::new(SimulatedAnnealingOptimizer::default()),
        ),
        "SA-LS" => Algorithm::new(
            name,
            Strategy::SearchThenRefine {
                restart: false,
                refiner: lbfgs,
            },
            Arc::new(SimulatedAnnealingOptimizer::default()),
        ),
        "BF" => Algorithm::new(
            name,
            Strategy::SingleShot,
            Arc::new(GridSearch {
                points_per_dim: config.grid_points,
                ..GridSearch::default()
            }),
        )
        .exhaustive(),
        _ => return Err(BenchError::UnknownAlgorithm(name.to_string())),
    };
    Ok(algorithm)
}

/// The algorithms selected by `config.methods`, or all of them.
pub fn algorithms(config: &BenchConfig) -> Result<Vec<Algorithm>> {
    match &config.methods {
        Some(methods) => methods.iter().map(|name| build(name, config)).collect(),
        None => ALGORITHM_NAMES
            .iter()
            .map(|name| build(name, config))
            .collect(),
    }
}

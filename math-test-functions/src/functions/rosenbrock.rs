//! Rosenbrock test function

use crate::{TestFunction, uniform_bounds};
use ndarray::Array1;

/// Rosenbrock function - banana-shaped valley
/// Global minimum: f(x) = 0 at x = (1, 1, ..., 1)
/// Bounds: x_i in [-2.048, 2.048]
#[derive(Debug, Clone)]
pub struct Rosenbrock {
    dimension: usize,
}

impl Rosenbrock {
    /// Rosenbrock function in `dimension` variables (at least 2).
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl TestFunction for Rosenbrock {
    fn name(&self) -> &str {
        "rosenbrock"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn bounds(&self) -> Vec<(f64, f64)> {
        uniform_bounds(self.dimension, -2.048, 2.048)
    }

    fn global_optimum(&self) -> f64 {
        0.0
    }

    fn global_minimizer(&self) -> Option<Array1<f64>> {
        Some(Array1::ones(self.dimension))
    }

    fn evaluate(&self, x: &Array1<f64>) -> f64 {
        x.windows(2)
            .into_iter()
            .map(|w| 100.0 * (w[1] - w[0] * w[0]).powi(2) + (1.0 - w[0]).powi(2))
            .sum()
    }

    fn change_dimensionality(&self) -> bool {
        true
    }
}

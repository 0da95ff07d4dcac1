//! Zakharov test function

use crate::{TestFunction, uniform_bounds};
use ndarray::Array1;

/// Zakharov function - plate-shaped, no local minima except the global one
/// Global minimum: f(x) = 0 at x = (0, 0, ..., 0)
/// Bounds: x_i in [-5, 10]
#[derive(Debug, Clone)]
pub struct Zakharov {
    dimension: usize,
}

impl Zakharov {
    /// Zakharov function in `dimension` variables.
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl TestFunction for Zakharov {
    fn name(&self) -> &str {
        "zakharov"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn bounds(&self) -> Vec<(f64, f64)> {
        uniform_bounds(self.dimension, -5.0, 10.0)
    }

    fn global_optimum(&self) -> f64 {
        0.0
    }

    fn global_minimizer(&self) -> Option<Array1<f64>> {
        Some(Array1::zeros(self.dimension))
    }

    fn evaluate(&self, x: &Array1<f64>) -> f64 {
        let sum_sq: f64 = x.iter().map(|&xi| xi * xi).sum();
        let weighted: f64 = x
            .iter()
            .enumerate()
            .map(|(i, &xi)| 0.5 * (i + 1) as f64 * xi)
            .sum();
        sum_sq + weighted.powi(2) + weighted.powi(4)
    }

    fn change_dimensionality(&self) -> bool {
        true
    }
}

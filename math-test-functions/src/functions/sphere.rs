//! Sphere test function

use crate::{TestFunction, uniform_bounds};
use ndarray::Array1;

/// Sphere function - simple quadratic
/// Global minimum: f(x) = 0 at x = (0, 0, ..., 0)
/// Bounds: x_i in [-5.12, 5.12]
#[derive(Debug, Clone)]
pub struct Sphere {
    dimension: usize,
}

impl Sphere {
    /// Sphere function in `dimension` variables.
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl TestFunction for Sphere {
    fn name(&self) -> &str {
        "sphere"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn bounds(&self) -> Vec<(f64, f64)> {
        uniform_bounds(self.dimension, -5.12, 5.12)
    }

    fn global_optimum(&self) -> f64 {
        0.0
    }

    fn global_minimizer(&self) -> Option<Array1<f64>> {
        Some(Array1::zeros(self.dimension))
    }

    fn evaluate(&self, x: &Array1<f64>) -> f64 {
        x.iter().map(|&xi| xi * xi).sum()
    }

    fn change_dimensionality(&self) -> bool {
        true
    }
}

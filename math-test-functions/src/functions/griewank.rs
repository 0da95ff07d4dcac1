//! Griewank test function

use crate::{TestFunction, uniform_bounds};
use ndarray::Array1;

/// Griewank function - N-dimensional with many regularly spaced local minima
/// Global minimum: f(x) = 0 at x = (0, 0, ..., 0)
/// Bounds: x_i in [-600, 600]
#[derive(Debug, Clone)]
pub struct Griewank {
    dimension: usize,
}

impl Griewank {
    /// Griewank function in `dimension` variables.
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl TestFunction for Griewank {
    fn name(&self) -> &str {
        "griewank"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn bounds(&self) -> Vec<(f64, f64)> {
        uniform_bounds(self.dimension, -600.0, 600.0)
    }

    fn global_optimum(&self) -> f64 {
        0.0
    }

    fn global_minimizer(&self) -> Option<Array1<f64>> {
        Some(Array1::zeros(self.dimension))
    }

    fn evaluate(&self, x: &Array1<f64>) -> f64 {
        let sum_sq: f64 = x.iter().map(|&xi| xi * xi).sum::<f64>() / 4000.0;
        let prod_cos: f64 = x
            .iter()
            .enumerate()
            .map(|(i, &xi)| (xi / ((i + 1) as f64).sqrt()).cos())
            .product();
        1.0 + sum_sq - prod_cos
    }

    fn change_dimensionality(&self) -> bool {
        true
    }
}

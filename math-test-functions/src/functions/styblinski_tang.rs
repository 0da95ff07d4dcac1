//! Styblinski-Tang test function

use crate::{TestFunction, uniform_bounds};
use ndarray::Array1;

const STYBLINSKI_TANG_MINIMIZER: f64 = -2.903_534_027_771_177;
const STYBLINSKI_TANG_MINIMUM_PER_DIM: f64 = -39.166_165_703_771_41;

/// Styblinski-Tang function - N-dimensional, minimum value scales with dimension
/// Global minimum: f(x) = -39.16617 * n at x = (-2.903534, ..., -2.903534)
/// Bounds: x_i in [-5, 5]
#[derive(Debug, Clone)]
pub struct StyblinskiTang {
    dimension: usize,
}

impl StyblinskiTang {
    /// Styblinski-Tang function in `dimension` variables.
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl TestFunction for StyblinskiTang {
    fn name(&self) -> &str {
        "styblinski_tang"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn bounds(&self) -> Vec<(f64, f64)> {
        uniform_bounds(self.dimension, -5.0, 5.0)
    }

    fn global_optimum(&self) -> f64 {
        STYBLINSKI_TANG_MINIMUM_PER_DIM * self.dimension as f64
    }

    fn global_minimizer(&self) -> Option<Array1<f64>> {
        Some(Array1::from_elem(self.dimension, STYBLINSKI_TANG_MINIMIZER))
    }

    fn evaluate(&self, x: &Array1<f64>) -> f64 {
        0.5 * x
            .iter()
            .map(|&xi| xi.powi(4) - 16.0 * xi * xi + 5.0 * xi)
            .sum::<f64>()
    }

    fn change_dimensionality(&self) -> bool {
        true
    }
}

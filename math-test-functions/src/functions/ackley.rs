//! Ackley test function

use crate::{TestFunction, uniform_bounds};
use ndarray::Array1;
use std::f64::consts::{E, PI};

/// Ackley function - N-dimensional multimodal
/// Global minimum: f(x) = 0 at x = (0, 0, ..., 0)
/// Bounds: x_i in [-32.768, 32.768]
#[derive(Debug, Clone)]
pub struct Ackley {
    dimension: usize,
}

impl Ackley {
    /// Ackley function in `dimension` variables.
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl TestFunction for Ackley {
    fn name(&self) -> &str {
        "ackley"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn bounds(&self) -> Vec<(f64, f64)> {
        uniform_bounds(self.dimension, -32.768, 32.768)
    }

    fn global_optimum(&self) -> f64 {
        0.0
    }

    fn global_minimizer(&self) -> Option<Array1<f64>> {
        Some(Array1::zeros(self.dimension))
    }

    fn evaluate(&self, x: &Array1<f64>) -> f64 {
        let n = x.len() as f64;
        let sum_sq: f64 = x.iter().map(|&xi| xi.powi(2)).sum();
        let sum_cos: f64 = x.iter().map(|&xi| (2.0 * PI * xi).cos()).sum();

        -20.0 * (-0.2 * (sum_sq / n).sqrt()).exp() - (sum_cos / n).exp() + 20.0 + E
    }

    fn change_dimensionality(&self) -> bool {
        true
    }
}

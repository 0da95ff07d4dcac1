//! Levy test function

use crate::{TestFunction, uniform_bounds};
use ndarray::Array1;
use std::f64::consts::PI;

/// Levy function - N-dimensional multimodal
/// Global minimum: f(x) = 0 at x = (1, 1, ..., 1)
/// Bounds: x_i in [-10, 10]
#[derive(Debug, Clone)]
pub struct Levy {
    dimension: usize,
}

impl Levy {
    /// Levy function in `dimension` variables.
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl TestFunction for Levy {
    fn name(&self) -> &str {
        "levy"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn bounds(&self) -> Vec<(f64, f64)> {
        uniform_bounds(self.dimension, -10.0, 10.0)
    }

    fn global_optimum(&self) -> f64 {
        0.0
    }

    fn global_minimizer(&self) -> Option<Array1<f64>> {
        Some(Array1::ones(self.dimension))
    }

    fn evaluate(&self, x: &Array1<f64>) -> f64 {
        let w: Vec<f64> = x.iter().map(|&xi| 1.0 + (xi - 1.0) / 4.0).collect();
        let n = w.len();
        if n == 0 {
            return 0.0;
        }

        let first = (PI * w[0]).sin().powi(2);
        let middle: f64 = w[..n - 1]
            .iter()
            .map(|&wi| (wi - 1.0).powi(2) * (1.0 + 10.0 * (PI * wi + 1.0).sin().powi(2)))
            .sum();
        let wn = w[n - 1];
        let last = (wn - 1.0).powi(2) * (1.0 + (2.0 * PI * wn).sin().powi(2));
        first + middle + last
    }

    fn change_dimensionality(&self) -> bool {
        true
    }
}

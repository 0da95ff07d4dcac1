//! Schwefel test function

use crate::{TestFunction, uniform_bounds};
use ndarray::Array1;

const SCHWEFEL_CONSTANT: f64 = 418.982_887_272_433_8;
const SCHWEFEL_MINIMIZER: f64 = 420.968_746;

/// Schwefel function - deceptive, the best local minima are far apart
/// Global minimum: f(x) = 0 at x = (420.9687, ..., 420.9687)
/// Bounds: x_i in [-500, 500]
#[derive(Debug, Clone)]
pub struct Schwefel {
    dimension: usize,
}

impl Schwefel {
    /// Schwefel function in `dimension` variables.
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl TestFunction for Schwefel {
    fn name(&self) -> &str {
        "schwefel"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn bounds(&self) -> Vec<(f64, f64)> {
        uniform_bounds(self.dimension, -500.0, 500.0)
    }

    fn global_optimum(&self) -> f64 {
        0.0
    }

    fn global_minimizer(&self) -> Option<Array1<f64>> {
        Some(Array1::from_elem(self.dimension, SCHWEFEL_MINIMIZER))
    }

    fn evaluate(&self, x: &Array1<f64>) -> f64 {
        let n = x.len() as f64;
        SCHWEFEL_CONSTANT * n - x.iter().map(|&xi| xi * xi.abs().sqrt().sin()).sum::<f64>()
    }

    fn change_dimensionality(&self) -> bool {
        true
    }
}

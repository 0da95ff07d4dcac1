//! Matyas test function

use crate::{TestFunction, uniform_bounds};
use ndarray::Array1;

/// Matyas function - 2D plate-shaped
/// Global minimum: f(x) = 0 at x = (0, 0)
/// Bounds: x_i in [-10, 10]
#[derive(Debug, Clone, Copy)]
pub struct Matyas;

impl TestFunction for Matyas {
    fn name(&self) -> &str {
        "matyas"
    }

    fn dimension(&self) -> usize {
        2
    }

    fn bounds(&self) -> Vec<(f64, f64)> {
        uniform_bounds(2, -10.0, 10.0)
    }

    fn global_optimum(&self) -> f64 {
        0.0
    }

    fn global_minimizer(&self) -> Option<Array1<f64>> {
        Some(Array1::zeros(2))
    }

    fn evaluate(&self, x: &Array1<f64>) -> f64 {
        let (x1, x2) = (x[0], x[1]);
        0.26 * (x1 * x1 + x2 * x2) - 0.48 * x1 * x2
    }
}

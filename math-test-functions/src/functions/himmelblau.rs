//! Himmelblau test function

use crate::{TestFunction, uniform_bounds};
use ndarray::{Array1, array};

/// Himmelblau function - 2D with four identical minima
/// Global minimum: f(x) = 0 at (3, 2), (-2.805118, 3.131312),
/// (-3.779310, -3.283186), (3.584428, -1.848126)
/// Bounds: x_i in [-5, 5]
#[derive(Debug, Clone, Copy)]
pub struct Himmelblau;

impl TestFunction for Himmelblau {
    fn name(&self) -> &str {
        "himmelblau"
    }

    fn dimension(&self) -> usize {
        2
    }

    fn bounds(&self) -> Vec<(f64, f64)> {
        uniform_bounds(2, -5.0, 5.0)
    }

    fn global_optimum(&self) -> f64 {
        0.0
    }

    fn global_minimizer(&self) -> Option<Array1<f64>> {
        Some(array![3.0, 2.0])
    }

    fn evaluate(&self, x: &Array1<f64>) -> f64 {
        let (x1, x2) = (x[0], x[1]);
        (x1 * x1 + x2 - 11.0).powi(2) + (x1 + x2 * x2 - 7.0).powi(2)
    }
}

//! Beale test function

use crate::{TestFunction, uniform_bounds};
use ndarray::{Array1, array};

/// Beale function - 2D, unimodal with sharp ridges
/// Global minimum: f(x) = 0 at x = (3, 0.5)
/// Bounds: x_i in [-4.5, 4.5]
#[derive(Debug, Clone, Copy)]
pub struct Beale;

impl TestFunction for Beale {
    fn name(&self) -> &str {
        "beale"
    }

    fn dimension(&self) -> usize {
        2
    }

    fn bounds(&self) -> Vec<(f64, f64)> {
        uniform_bounds(2, -4.5, 4.5)
    }

    fn global_optimum(&self) -> f64 {
        0.0
    }

    fn global_minimizer(&self) -> Option<Array1<f64>> {
        Some(array![3.0, 0.5])
    }

    fn evaluate(&self, x: &Array1<f64>) -> f64 {
        let (x1, x2) = (x[0], x[1]);
        (1.5 - x1 + x1 * x2).powi(2)
            + (2.25 - x1 + x1 * x2.powi(2)).powi(2)
            + (2.625 - x1 + x1 * x2.powi(3)).powi(2)
    }
}

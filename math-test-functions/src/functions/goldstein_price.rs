//! Goldstein-Price test function

use crate::{TestFunction, uniform_bounds};
use ndarray::{Array1, array};

/// Goldstein-Price function - 2D with several local minima
/// Global minimum: f(x) = 3 at x = (0, -1)
/// Bounds: x_i in [-2, 2]
#[derive(Debug, Clone, Copy)]
pub struct GoldsteinPrice;

impl TestFunction for GoldsteinPrice {
    fn name(&self) -> &str {
        "goldstein_price"
    }

    fn dimension(&self) -> usize {
        2
    }

    fn bounds(&self) -> Vec<(f64, f64)> {
        uniform_bounds(2, -2.0, 2.0)
    }

    fn global_optimum(&self) -> f64 {
        3.0
    }

    fn global_minimizer(&self) -> Option<Array1<f64>> {
        Some(array![0.0, -1.0])
    }

    fn evaluate(&self, x: &Array1<f64>) -> f64 {
        let (x1, x2) = (x[0], x[1]);
        let a = 1.0
            + (x1 + x2 + 1.0).powi(2)
                * (19.0 - 14.0 * x1 + 3.0 * x1.powi(2) - 14.0 * x2
                    + 6.0 * x1 * x2
                    + 3.0 * x2.powi(2));
        let b = 30.0
            + (2.0 * x1 - 3.0 * x2).powi(2)
                * (18.0 - 32.0 * x1 + 12.0 * x1.powi(2) + 48.0 * x2 - 36.0 * x1 * x2
                    + 27.0 * x2.powi(2));
        a * b
    }
}

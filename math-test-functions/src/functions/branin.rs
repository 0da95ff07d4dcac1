//! Branin test function

use crate::TestFunction;
use ndarray::{Array1, array};
use std::f64::consts::PI;

/// Branin (Branin-Hoo) function - 2D with three global minima
/// Global minimum: f(x) = 0.397887 at x = (-pi, 12.275), (pi, 2.275), (9.42478, 2.475)
/// Bounds: x1 in [-5, 10], x2 in [0, 15]
#[derive(Debug, Clone, Copy)]
pub struct Branin;

impl TestFunction for Branin {
    fn name(&self) -> &str {
        "branin"
    }

    fn dimension(&self) -> usize {
        2
    }

    fn bounds(&self) -> Vec<(f64, f64)> {
        vec![(-5.0, 10.0), (0.0, 15.0)]
    }

    fn global_optimum(&self) -> f64 {
        0.397_887_357_729_738_16
    }

    fn global_minimizer(&self) -> Option<Array1<f64>> {
        Some(array![PI, 2.275])
    }

    fn evaluate(&self, x: &Array1<f64>) -> f64 {
        let (x1, x2) = (x[0], x[1]);
        let b = 5.1 / (4.0 * PI * PI);
        let c = 5.0 / PI;
        let t = 1.0 / (8.0 * PI);
        (x2 - b * x1 * x1 + c * x1 - 6.0).powi(2) + 10.0 * (1.0 - t) * x1.cos() + 10.0
    }
}

//! Easom test function

use crate::{TestFunction, uniform_bounds};
use ndarray::{Array1, array};
use std::f64::consts::PI;

/// Easom function - 2D, flat almost everywhere with a narrow well
/// Global minimum: f(x) = -1 at x = (pi, pi)
/// Bounds: x_i in [-100, 100]
#[derive(Debug, Clone, Copy)]
pub struct Easom;

impl TestFunction for Easom {
    fn name(&self) -> &str {
        "easom"
    }

    fn dimension(&self) -> usize {
        2
    }

    fn bounds(&self) -> Vec<(f64, f64)> {
        uniform_bounds(2, -100.0, 100.0)
    }

    fn global_optimum(&self) -> f64 {
        -1.0
    }

    fn global_minimizer(&self) -> Option<Array1<f64>> {
        Some(array![PI, PI])
    }

    fn evaluate(&self, x: &Array1<f64>) -> f64 {
        let (x1, x2) = (x[0], x[1]);
        -x1.cos() * x2.cos() * (-((x1 - PI).powi(2) + (x2 - PI).powi(2))).exp()
    }
}

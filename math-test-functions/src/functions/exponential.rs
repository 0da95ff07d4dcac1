//! Exponential test function

use crate::{TestFunction, uniform_bounds};
use ndarray::Array1;

/// Exponential function - unimodal function
/// Global minimum: f(x) = -1 at x = (0, 0, ..., 0)
/// Bounds: x_i in [-1, 1]
#[derive(Debug, Clone)]
pub struct Exponential {
    dimension: usize,
}

impl Exponential {
    /// Exponential function in `dimension` variables.
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl TestFunction for Exponential {
    fn name(&self) -> &str {
        "exponential"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn bounds(&self) -> Vec<(f64, f64)> {
        uniform_bounds(self.dimension, -1.0, 1.0)
    }

    fn global_optimum(&self) -> f64 {
        -1.0
    }

    fn global_minimizer(&self) -> Option<Array1<f64>> {
        Some(Array1::zeros(self.dimension))
    }

    fn evaluate(&self, x: &Array1<f64>) -> f64 {
        let sum_squares: f64 = x.iter().map(|&xi| xi.powi(2)).sum();
        -(-0.5 * sum_squares).exp()
    }

    fn change_dimensionality(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exponential_known_properties() {
        let f = Exponential::new(2);
        let f_global = f.evaluate(&Array1::zeros(2));
        assert!(
            (f_global + 1.0).abs() < 1e-15,
            "Global optimum value not as expected: {}",
            f_global
        );

        let test_points = vec![
            vec![0.5, 0.5],
            vec![-0.5, 0.3],
            vec![1.0, -1.0],
            vec![-1.0, 1.0],
        ];
        for point in test_points {
            let value = f.evaluate(&Array1::from(point.clone()));
            assert!(
                value < 0.0 && value > -1.0,
                "Function should lie in (-1, 0) at {:?}: {}",
                point,
                value
            );
        }
    }
}

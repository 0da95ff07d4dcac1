//! Booth test function

use crate::{TestFunction, uniform_bounds};
use ndarray::{Array1, array};

/// Booth function - 2D plate-shaped
/// Global minimum: f(x) = 0 at x = (1, 3)
/// Bounds: x_i in [-10, 10]
#[derive(Debug, Clone, Copy)]
pub struct Booth;

impl TestFunction for Booth {
    fn name(&self) -> &str {
        "booth"
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
        Some(array![1.0, 3.0])
    }

    fn evaluate(&self, x: &Array1<f64>) -> f64 {
        (x[0] + 2.0 * x[1] - 7.0).powi(2) + (2.0 * x[0] + x[1] - 5.0).powi(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booth_known_properties() {
        let f = Booth;
        assert_eq!(f.evaluate(&array![1.0, 3.0]), 0.0);
        assert_eq!(f.evaluate(&array![0.0, 0.0]), 74.0);
    }
}

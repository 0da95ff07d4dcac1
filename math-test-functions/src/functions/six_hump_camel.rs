//! Six-hump camel test function

use crate::TestFunction;
use ndarray::{Array1, array};

/// Six-hump camel function - 2D with six local minima, two of them global
/// Global minimum: f(x) = -1.0316 at x = (0.0898, -0.7126) and (-0.0898, 0.7126)
/// Bounds: x1 in [-3, 3], x2 in [-2, 2]
#[derive(Debug, Clone, Copy)]
pub struct SixHumpCamel;

impl TestFunction for SixHumpCamel {
    fn name(&self) -> &str {
        "six_hump_camel"
    }

    fn dimension(&self) -> usize {
        2
    }

    fn bounds(&self) -> Vec<(f64, f64)> {
        vec![(-3.0, 3.0), (-2.0, 2.0)]
    }

    fn global_optimum(&self) -> f64 {
        -1.031_628_453_489_877_4
    }

    fn global_minimizer(&self) -> Option<Array1<f64>> {
        Some(array![0.089_842_013_683_013_31, -0.712_656_403_270_413_5])
    }

    fn evaluate(&self, x: &Array1<f64>) -> f64 {
        let (x1, x2) = (x[0], x[1]);
        (4.0 - 2.1 * x1 * x1 + x1.powi(4) / 3.0) * x1 * x1
            + x1 * x2
            + (-4.0 + 4.0 * x2 * x2) * x2 * x2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_six_hump_camel_symmetric_minima() {
        let f = SixHumpCamel;
        let a = f.evaluate(&array![0.0898420136830133, -0.7126564032704135]);
        let b = f.evaluate(&array![-0.0898420136830133, 0.7126564032704135]);
        assert!((a - b).abs() < 1e-12);
        assert!((a - f.global_optimum()).abs() < 1e-9);
    }
}

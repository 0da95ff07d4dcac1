//! Test functions for global optimization benchmarks.
//!
//! Every function is exposed through the [`TestFunction`] capability: its
//! dimension, box bounds, known global optimum and an evaluable objective.
//! Functions whose formula generalizes to any dimension report it through
//! [`TestFunction::change_dimensionality`].
//!
//! The [`FunctionRegistry`] maps names to constructors and is the only way
//! benchmark drivers discover functions.
//!
//! ```rust
//! use math_test_functions::FunctionRegistry;
//! use ndarray::Array1;
//!
//! let registry = FunctionRegistry::new();
//! let rastrigin = registry.build("rastrigin", Some(5)).expect("registered");
//! assert_eq!(rastrigin.dimension(), 5);
//! assert!(rastrigin.evaluate(&Array1::zeros(5)).abs() < 1e-12);
//! ```
#![warn(missing_docs)]

use ndarray::Array1;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

/// Concrete test function implementations.
pub mod functions;
pub use functions::*;

/// Name refused by [`FunctionRegistry::register`]; it marked the abstract base
/// of the function library the registry replaces.
pub const RESERVED_NAME: &str = "Benchmark";

/// Capability exposed by every benchmark function.
pub trait TestFunction: Send + Sync {
    /// Registry name of the function.
    fn name(&self) -> &str;

    /// Number of variables.
    fn dimension(&self) -> usize;

    /// Lower and upper bound for each variable.
    fn bounds(&self) -> Vec<(f64, f64)>;

    /// Value of the global minimum.
    fn global_optimum(&self) -> f64;

    /// Location of one global minimum, when known.
    fn global_minimizer(&self) -> Option<Array1<f64>> {
        None
    }

    /// Evaluate the objective at `x`.
    fn evaluate(&self, x: &Array1<f64>) -> f64;

    /// Whether the formula holds for an arbitrary number of variables.
    fn change_dimensionality(&self) -> bool {
        false
    }
}

/// Errors raised when building functions from the registry.
#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    /// No function registered under this name.
    #[error("unknown test function: {0}")]
    UnknownFunction(String),

    /// The requested dimension is not supported by the function.
    #[error("function {name} does not support dimension {dimension}")]
    InvalidDimension {
        /// Function name
        name: String,
        /// Requested dimension
        dimension: usize,
    },

    /// The name is reserved and cannot be registered.
    #[error("name {0} is reserved")]
    ReservedName(String),
}

/// Constructor taking the requested dimension.
pub type Constructor = fn(usize) -> Arc<dyn TestFunction>;

/// Registry entry for one function.
#[derive(Clone, Copy)]
pub struct FunctionEntry {
    /// Builds the function for a given dimension.
    pub constructor: Constructor,
    /// Dimension used when none is requested.
    pub default_dimension: usize,
    /// Smallest dimension accepted by scalable functions.
    pub min_dimension: usize,
    /// Whether any dimension >= `min_dimension` is accepted.
    pub scalable: bool,
}

impl FunctionEntry {
    fn fixed(constructor: Constructor, dimension: usize) -> Self {
        Self {
            constructor,
            default_dimension: dimension,
            min_dimension: dimension,
            scalable: false,
        }
    }

    fn scalable(constructor: Constructor, default_dimension: usize, min_dimension: usize) -> Self {
        Self {
            constructor,
            default_dimension,
            min_dimension,
            scalable: true,
        }
    }
}

/// Name-to-constructor mapping of the available test functions.
pub struct FunctionRegistry {
    entries: BTreeMap<String, FunctionEntry>,
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionRegistry {
    /// Creates a registry holding every function of this crate.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        let builtin: [(&str, FunctionEntry); 18] = [
            ("ackley", FunctionEntry::scalable(|n| Arc::new(Ackley::new(n)), 2, 1)),
            ("beale", FunctionEntry::fixed(|_| Arc::new(Beale), 2)),
            ("booth", FunctionEntry::fixed(|_| Arc::new(Booth), 2)),
            ("branin", FunctionEntry::fixed(|_| Arc::new(Branin), 2)),
            ("easom", FunctionEntry::fixed(|_| Arc::new(Easom), 2)),
            ("exponential", FunctionEntry::scalable(|n| Arc::new(Exponential::new(n)), 2, 1)),
            ("goldstein_price", FunctionEntry::fixed(|_| Arc::new(GoldsteinPrice), 2)),
            ("griewank", FunctionEntry::scalable(|n| Arc::new(Griewank::new(n)), 2, 1)),
            ("himmelblau", FunctionEntry::fixed(|_| Arc::new(Himmelblau), 2)),
            ("levy", FunctionEntry::scalable(|n| Arc::new(Levy::new(n)), 2, 1)),
            ("matyas", FunctionEntry::fixed(|_| Arc::new(Matyas), 2)),
            ("rastrigin", FunctionEntry::scalable(|n| Arc::new(Rastrigin::new(n)), 2, 1)),
            ("rosenbrock", FunctionEntry::scalable(|n| Arc::new(Rosenbrock::new(n)), 2, 2)),
            ("schwefel", FunctionEntry::scalable(|n| Arc::new(Schwefel::new(n)), 2, 1)),
            ("six_hump_camel", FunctionEntry::fixed(|_| Arc::new(SixHumpCamel), 2)),
            ("sphere", FunctionEntry::scalable(|n| Arc::new(Sphere::new(n)), 2, 1)),
            (
                "styblinski_tang",
                FunctionEntry::scalable(|n| Arc::new(StyblinskiTang::new(n)), 2, 1),
            ),
            ("zakharov", FunctionEntry::scalable(|n| Arc::new(Zakharov::new(n)), 2, 1)),
        ];
        for (name, entry) in builtin {
            registry.entries.insert(name.to_string(), entry);
        }
        registry
    }

    /// Creates a registry without any function.
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Adds or replaces an entry.
    pub fn register(&mut self, name: &str, entry: FunctionEntry) -> Result<(), RegistryError> {
        if name == RESERVED_NAME {
            return Err(RegistryError::ReservedName(name.to_string()));
        }
        self.entries.insert(name.to_string(), entry);
        Ok(())
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Looks up the entry registered under `name`.
    pub fn get(&self, name: &str) -> Option<&FunctionEntry> {
        self.entries.get(name)
    }

    /// Builds `name` at `dimension`, or at its default dimension when `None`.
    pub fn build(
        &self,
        name: &str,
        dimension: Option<usize>,
    ) -> Result<Arc<dyn TestFunction>, RegistryError> {
        let entry = self
            .get(name)
            .ok_or_else(|| RegistryError::UnknownFunction(name.to_string()))?;
        let n = dimension.unwrap_or(entry.default_dimension);
        let supported = if entry.scalable {
            n >= entry.min_dimension
        } else {
            n == entry.default_dimension
        };
        if !supported {
            return Err(RegistryError::InvalidDimension {
                name: name.to_string(),
                dimension: n,
            });
        }
        Ok((entry.constructor)(n))
    }

    /// Functions whose global minimizer sits exactly at the centre of the bounds.
    ///
    /// Optimizers that sample the centre first solve these on their first call,
    /// so benchmark reports usually flag them.
    pub fn centered_optimum_names(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter_map(|(name, entry)| {
                let f = (entry.constructor)(entry.default_dimension);
                let minimizer = f.global_minimizer()?;
                let centered = f
                    .bounds()
                    .iter()
                    .zip(minimizer.iter())
                    .all(|(&(lo, hi), &x)| 0.5 * (lo + hi) == x);
                centered.then(|| name.clone())
            })
            .collect()
    }
}

/// Same `(lower, upper)` pair repeated for `n` variables.
pub fn uniform_bounds(n: usize, lower: f64, upper: f64) -> Vec<(f64, f64)> {
    vec![(lower, upper); n]
}

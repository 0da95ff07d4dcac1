mod common;

use common::test_folder;
use math_gobench::optimizers::{GridSearch, NelderMeadOptimizer};
use math_gobench::{
    Algorithm, BenchConfig, BenchConfigBuilder, BenchUnit, Benchmarker, Strategy, WorkItem,
};
use math_test_functions::{FunctionEntry, FunctionRegistry, TestFunction};
use ndarray::Array1;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

static EVALS: [AtomicUsize; 3] = [
    AtomicUsize::new(0),
    AtomicUsize::new(0),
    AtomicUsize::new(0),
];

/// Shifted sphere counting its evaluations in `EVALS[ID]`.
struct Counting<const ID: usize>;

impl<const ID: usize> TestFunction for Counting<ID> {
    fn name(&self) -> &str {
        "counting"
    }

    fn dimension(&self) -> usize {
        2
    }

    fn bounds(&self) -> Vec<(f64, f64)> {
        vec![(-2.0, 2.0); 2]
    }

    fn global_optimum(&self) -> f64 {
        0.0
    }

    fn evaluate(&self, x: &Array1<f64>) -> f64 {
        EVALS[ID].fetch_add(1, Ordering::SeqCst);
        x.iter().map(|v| (v - 0.3).powi(2)).sum()
    }
}

fn registry<const ID: usize>() -> FunctionRegistry {
    let mut registry = FunctionRegistry::empty();
    registry
        .register(
            "counting",
            FunctionEntry {
                constructor: |_| Arc::new(Counting::<ID>),
                default_dimension: 2,
                min_dimension: 2,
                scalable: false,
            },
        )
        .unwrap();
    registry
}

fn config(folder: &Path, nb_runs: usize) -> BenchConfig {
    BenchConfigBuilder::new()
        .nb_runs(nb_runs)
        .output_folder(folder)
        .call_budget(2_000)
        .build()
        .unwrap()
}

#[test]
fn test_second_pass_is_a_no_op() {
    let folder = test_folder("checkpoint-idempotent");
    let algorithms = vec![
        Algorithm::new(
            "NM-R",
            Strategy::RestartUntilBudget,
            Arc::new(NelderMeadOptimizer::default()),
        ),
        Algorithm::new(
            "GRID",
            Strategy::SingleShot,
            Arc::new(GridSearch {
                points_per_dim: 6,
                finish: None,
            }),
        )
        .exhaustive(),
    ];
    let bench = Benchmarker::with_parts(config(&folder, 3), registry::<0>(), algorithms);
    let item = WorkItem::new("counting");

    let first = bench.bench(&item);
    assert_eq!(first.written.len(), 2);
    assert!(first.skipped.is_empty());
    assert!(first.evaluations > 0);
    let evals_after_first = EVALS[0].load(Ordering::SeqCst);
    assert_eq!(evals_after_first, first.evaluations);
    for path in &first.written {
        assert!(path.exists());
    }
    let before: Vec<String> = first
        .written
        .iter()
        .map(|p| std::fs::read_to_string(p).unwrap())
        .collect();

    let second = bench.bench(&item);
    assert!(second.written.is_empty());
    assert_eq!(second.skipped, first.written);
    assert_eq!(second.evaluations, 0);
    assert_eq!(EVALS[0].load(Ordering::SeqCst), evals_after_first);
    let after: Vec<String> = first
        .written
        .iter()
        .map(|p| std::fs::read_to_string(p).unwrap())
        .collect();
    assert_eq!(before, after);
}

#[test]
fn test_exhaustive_runs_are_replicated() {
    let folder = test_folder("checkpoint-exhaustive");
    let grid = Algorithm::new(
        "GRID",
        Strategy::SingleShot,
        Arc::new(GridSearch {
            points_per_dim: 7,
            finish: None,
        }),
    )
    .exhaustive();
    let bench = Benchmarker::with_parts(config(&folder, 5), registry::<1>(), vec![grid]);

    let report = bench.bench(&WorkItem::new("counting"));
    assert_eq!(report.written.len(), 1);
    // a 7x7 grid never reaches the shifted optimum; only run 0 is computed
    assert_eq!(report.evaluations, 49);
    assert_eq!(EVALS[1].load(Ordering::SeqCst), 49);

    let unit = BenchUnit::read(&report.written[0]).unwrap();
    assert_eq!(unit.nbruns, 5);
    assert_eq!(unit.algorithm, "GRID");
    for run in 1..5 {
        assert_eq!(unit.success[run], unit.success[0]);
        assert_eq!(unit.ncall[run], unit.ncall[0]);
        assert_eq!(unit.fvalue[run], unit.fvalue[0]);
        assert_eq!(unit.time[run], unit.time[0]);
        assert_eq!(unit.ncall_max[run], unit.ncall_max[0]);
    }
    assert!(!unit.success[0]);
    assert_eq!(unit.ncall_max[0], 49);
}

#[test]
fn test_existing_record_is_left_untouched() {
    let folder = test_folder("checkpoint-existing");
    let mut existing = BenchUnit::new(2, "counting", None, "NM-R");
    existing.success = vec![true, true];
    existing.ncall = vec![11, 12];
    let path = existing.write(&folder).unwrap();

    let algorithms = vec![Algorithm::new(
        "NM-R",
        Strategy::RestartUntilBudget,
        Arc::new(NelderMeadOptimizer::default()),
    )];
    let bench = Benchmarker::with_parts(config(&folder, 2), registry::<2>(), algorithms);

    let report = bench.bench(&WorkItem::new("counting"));
    assert_eq!(report.skipped, vec![path.clone()]);
    assert_eq!(report.evaluations, 0);
    assert_eq!(EVALS[2].load(Ordering::SeqCst), 0);
    assert_eq!(BenchUnit::read(&path).unwrap(), existing);
}

#[test]
fn test_config_file_round_trip() {
    let folder = test_folder("config-round-trip");
    let path = folder.join("bench.json");
    let config = BenchConfigBuilder::new()
        .nb_runs(7)
        .output_folder(&folder)
        .functions(["booth"])
        .methods(["NM-R", "SA"])
        .call_budget(1_234)
        .build()
        .unwrap();

    config.to_file(&path).unwrap();
    let loaded = BenchConfig::from_file(&path).unwrap();
    assert_eq!(loaded, config);

    // a file that fails validation is rejected on load
    let mut broken = config.clone();
    broken.nb_runs = 0;
    broken.to_file(&path).unwrap();
    assert!(BenchConfig::from_file(&path).unwrap_err().is_config_error());
}

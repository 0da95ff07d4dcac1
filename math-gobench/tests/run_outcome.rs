mod common;

use common::{RandomSweep, Scripted, ScriptedFunction, Step, Sweep, context};
use math_gobench::optimizers::NelderMeadOptimizer;
use math_gobench::{Algorithm, Signal, Strategy};
use math_test_functions::FunctionRegistry;
use ndarray::array;
use std::sync::Arc;

#[test]
fn test_optimum_hit_on_call_37() {
    let f = ScriptedFunction::new(|call| if call == 37 { 0.0 } else { 5.0 });
    let ctx = context(f, 100, 0, false);
    let algo = Algorithm::new("sweep", Strategy::SingleShot, Arc::new(Sweep));

    let outcome = algo.run(&ctx, 0);
    assert!(outcome.success);
    assert_eq!(outcome.ncall_success, 37);
    assert_eq!(outcome.success_value, Some(0.0));
    assert_eq!(outcome.ncall_max, 37);
    assert!(outcome.duration.is_some());
    assert!(outcome.note.is_none());
}

#[test]
fn test_budget_exhausted_without_hit() {
    let f = ScriptedFunction::new(|call| 1.0 + call as f64);
    let ctx = context(f, 50, 20, false);
    let algo = Algorithm::new("sweep", Strategy::SingleShot, Arc::new(Sweep));

    let outcome = algo.run(&ctx, 0);
    assert!(!outcome.success);
    assert_eq!(outcome.ncall_max, 50);
    assert_eq!(outcome.ncall_success, 50);
    assert_eq!(outcome.success_value, None);
    assert_eq!(outcome.duration, None);
    assert!(outcome.note.is_none());
    // the extension only applies while the context is favored
    assert!(!ctx.budget_extended());
}

#[test]
fn test_refinement_gets_the_allowance() {
    let f = ScriptedFunction::new(|call| 1.0 + call as f64);
    let ctx = context(f, 50, 20, false);
    let algo = Algorithm::new(
        "sweep-refine",
        Strategy::SearchThenRefine {
            restart: false,
            refiner: Arc::new(Sweep),
        },
        Arc::new(Sweep),
    );

    let outcome = algo.run(&ctx, 0);
    assert!(!outcome.success);
    assert!(ctx.budget_extended());
    assert_eq!(outcome.ncall_max, 70);
    // the recorded budget is the configured one
    assert_eq!(outcome.ncall_success, 50);
}

#[test]
fn test_optimum_found_during_refinement() {
    let f = ScriptedFunction::new(|call| if call == 60 { 0.0 } else { 2.0 });
    let ctx = context(f, 50, 20, false);
    let algo = Algorithm::new(
        "sweep-refine",
        Strategy::SearchThenRefine {
            restart: true,
            refiner: Arc::new(Sweep),
        },
        Arc::new(Sweep),
    );

    let outcome = algo.run(&ctx, 0);
    assert!(outcome.success);
    assert_eq!(outcome.ncall_success, 60);
    assert_eq!(outcome.ncall_max, 60);
}

#[test]
fn test_single_success_record() {
    let f = ScriptedFunction::new(|call| if call >= 3 { 0.0 } else { 1.0 });
    let ctx = context(f, 100, 0, false);
    let x = array![0.0, 0.0];

    assert_eq!(ctx.evaluate(&x), Ok(1.0));
    assert_eq!(ctx.evaluate(&x), Ok(1.0));
    assert_eq!(ctx.evaluate(&x), Err(Signal::OptimumFound));
    // later hits are ordinary evaluations
    assert_eq!(ctx.evaluate(&x), Ok(0.0));
    assert_eq!(ctx.evaluate(&x), Ok(0.0));

    let hit = ctx.success().expect("one hit");
    assert_eq!(hit.call_index, 3);
    assert!(!ctx.first_hit());
    assert_eq!(ctx.call_count(), 5);
}

#[test]
fn test_trajectory_is_running_minimum_until_hit() {
    let values = [5.0, 3.0, 4.0, f64::NAN, 2.0, 6.0, 2.5, 1.0, 7.0, 0.0];
    let f = ScriptedFunction::new(move |call| values.get(call - 1).copied().unwrap_or(9.0));
    let ctx = context(f, 100, 0, true);
    let algo = Algorithm::new("sweep", Strategy::SingleShot, Arc::new(Sweep));

    let outcome = algo.run(&ctx, 0);
    assert!(outcome.success);
    assert_eq!(outcome.ncall_success, 10);

    let trajectory = ctx.trajectory();
    assert_eq!(trajectory.len(), 10);
    assert_eq!(
        trajectory,
        vec![5.0, 3.0, 3.0, 3.0, 2.0, 2.0, 2.0, 1.0, 1.0, 0.0]
    );
    assert!(trajectory.windows(2).all(|w| w[1] <= w[0]));
}

#[test]
fn test_call_count_never_exceeds_budget() {
    let registry = FunctionRegistry::new();
    let config = math_gobench::BenchConfig::default();
    for budget in [1, 7, 150, 1_000] {
        for name in ["rastrigin", "schwefel", "easom"] {
            let f = registry.build(name, None).unwrap();
            for algo in math_gobench::algorithms::algorithms(&config).unwrap() {
                let ctx = context(f.clone(), budget, 10, false);
                let outcome = algo.run(&ctx, 0);
                let allowed = if ctx.budget_extended() { budget + 10 } else { budget };
                assert_eq!(ctx.call_budget(), allowed);
                assert!(
                    outcome.ncall_max <= allowed,
                    "{} on {}: {} calls for budget {}",
                    algo.name(),
                    name,
                    outcome.ncall_max,
                    allowed
                );
                if outcome.success {
                    assert!(outcome.ncall_success <= outcome.ncall_max);
                }
            }
        }
    }
}

#[test]
fn test_restarts_keep_earliest_best() {
    let f = ScriptedFunction::new(|_| 10.0);
    let ctx = context(f, 9, 0, false);
    let scripted = Scripted::new(vec![
        Step::Report { evals: 2, value: 5.0, tag: 0.0 },
        Step::Report { evals: 2, value: 3.0, tag: 1.0 },
        Step::Report { evals: 2, value: 3.0, tag: 2.0 },
        Step::Report { evals: 2, value: 4.0, tag: 3.0 },
    ]);
    let algo = Algorithm::new("scripted-r", Strategy::RestartUntilBudget, scripted.clone());

    let outcome = algo.run(&ctx, 0);
    assert!(!outcome.success);
    assert_eq!(outcome.ncall_max, 9);
    let best = outcome.best.expect("best over restarts");
    assert_eq!(best.value, 3.0);
    assert_eq!(best.point[0], 1.0);
    // four scripted restarts plus the one cut by the budget
    assert_eq!(scripted.starts().len(), 5);
    assert_eq!(&scripted.starts()[0], ctx.initial_point());
}

#[test]
fn test_restart_without_evaluation_stops() {
    let f = ScriptedFunction::new(|_| 10.0);
    let ctx = context(f, 100, 0, false);
    let scripted = Scripted::new(vec![
        Step::Nothing { evals: 3 },
        Step::Nothing { evals: 0 },
    ]);
    let algo = Algorithm::new("scripted-r", Strategy::RestartUntilBudget, scripted.clone());

    let outcome = algo.run(&ctx, 0);
    assert!(!outcome.success);
    assert_eq!(outcome.ncall_max, 3);
    assert_eq!(scripted.starts().len(), 2);
}

#[test]
fn test_no_starting_point_is_a_noted_failure() {
    let f = ScriptedFunction::new(|_| 10.0);
    let ctx = context(f, 100, 0, false);
    let refiner = Scripted::new(vec![]);
    let algo = Algorithm::new(
        "empty-refine",
        Strategy::SearchThenRefine {
            restart: false,
            refiner: refiner.clone(),
        },
        Scripted::new(vec![Step::Nothing { evals: 0 }]),
    );

    let outcome = algo.run(&ctx, 0);
    assert!(!outcome.success);
    assert_eq!(outcome.ncall_max, 0);
    assert!(outcome.note.is_some());
    assert!(refiner.starts().is_empty());
}

#[test]
fn test_refinement_starts_from_incumbent() {
    let f = ScriptedFunction::new(|call| 100.0 - call as f64);
    let ctx = context(f, 30, 5, false);
    let refiner = Scripted::new(vec![Step::Nothing { evals: 1 }]);
    let algo = Algorithm::new(
        "random-refine",
        Strategy::SearchThenRefine {
            restart: false,
            refiner: refiner.clone(),
        },
        Arc::new(RandomSweep),
    );

    let outcome = algo.run(&ctx, 0);
    assert!(!outcome.success);
    assert_eq!(outcome.ncall_max, 31);
    let starts = refiner.starts();
    assert_eq!(starts.len(), 1);
    // call 30 had the lowest value of the global phase; the refiner's own
    // call 31 replaced it afterwards at the same point
    assert_eq!(ctx.incumbent().unwrap().point, starts[0]);
    assert_eq!(ctx.incumbent().unwrap().value, 69.0);
}

#[test]
fn test_unexpected_error_is_a_noted_failure() {
    let f = ScriptedFunction::new(|_| 10.0);
    let ctx = context(f, 100, 0, false);
    let algo = Algorithm::new(
        "faulty",
        Strategy::SingleShot,
        Scripted::new(vec![Step::Fail { evals: 3, message: "boom" }]),
    );

    let outcome = algo.run(&ctx, 0);
    assert!(!outcome.success);
    assert_eq!(outcome.ncall_max, 3);
    assert_eq!(outcome.note.as_deref(), Some("boom"));
    assert_eq!(outcome.best.map(|b| b.value), Some(10.0));
}

#[test]
fn test_panicking_optimizer_is_a_noted_failure() {
    let f = ScriptedFunction::new(|_| 10.0);
    let ctx = context(f, 100, 0, false);
    let algo = Algorithm::new(
        "panicky",
        Strategy::SingleShot,
        Scripted::new(vec![Step::Panic { evals: 4 }]),
    );

    let outcome = algo.run(&ctx, 3);
    assert!(!outcome.success);
    assert_eq!(outcome.ncall_max, 4);
    let note = outcome.note.expect("panic is noted");
    assert!(note.contains("scripted panic after 4 evaluations"), "{note}");
}

#[test]
fn test_panic_on_budget_signal_is_a_plain_failure() {
    let f = ScriptedFunction::new(|_| 10.0);
    let ctx = context(f, 5, 0, false);
    let algo = Algorithm::new(
        "unwrapping-r",
        Strategy::RestartUntilBudget,
        Scripted::new(vec![Step::Unwrap]),
    );

    let outcome = algo.run(&ctx, 0);
    assert!(!outcome.success);
    assert_eq!(outcome.ncall_max, 5);
    assert_eq!(outcome.ncall_success, 5);
    assert!(outcome.note.is_none());
}

#[test]
fn test_panic_on_optimum_signal_is_a_success() {
    let f = ScriptedFunction::new(|call| if call == 2 { 0.0 } else { 10.0 });
    let ctx = context(f, 50, 0, false);
    let algo = Algorithm::new("unwrapping", Strategy::SingleShot, Scripted::new(vec![Step::Unwrap]));

    let outcome = algo.run(&ctx, 0);
    assert!(outcome.success);
    assert_eq!(outcome.ncall_success, 2);
    assert_eq!(outcome.success_value, Some(0.0));
    assert!(outcome.note.is_none());
}

#[test]
fn test_nelder_mead_budget_spent_while_building_simplex() {
    let f = ScriptedFunction::new(|_| 10.0);
    let ctx = context(f, 2, 0, false);
    let algo = Algorithm::new(
        "NM-R",
        Strategy::RestartUntilBudget,
        Arc::new(NelderMeadOptimizer::default()),
    );

    let outcome = algo.run(&ctx, 0);
    assert!(!outcome.success);
    assert_eq!(outcome.ncall_max, 2);
    assert_eq!(outcome.ncall_success, 2);
    assert!(outcome.note.is_none());
}

#[test]
fn test_nelder_mead_optimum_hit_while_building_simplex() {
    let f = ScriptedFunction::new(|call| if call == 2 { 0.0 } else { 10.0 });
    let ctx = context(f, 100, 0, false);
    let algo = Algorithm::new(
        "NM-R",
        Strategy::RestartUntilBudget,
        Arc::new(NelderMeadOptimizer::default()),
    );

    let outcome = algo.run(&ctx, 0);
    assert!(outcome.success);
    assert_eq!(outcome.ncall_success, 2);
    assert_eq!(outcome.ncall_max, 2);
    assert!(outcome.note.is_none());
}

#[test]
fn test_same_seed_same_outcome() {
    let registry = FunctionRegistry::new();
    let config = math_gobench::BenchConfigBuilder::new()
        .methods(["PSO-R", "NM-R", "PSO-LS"])
        .call_budget(3_000)
        .build()
        .unwrap();
    for algo in math_gobench::algorithms::algorithms(&config).unwrap() {
        let run = || {
            let f = registry.build("rastrigin", Some(4)).unwrap();
            let ctx = Arc::new(math_gobench::RunContext::setup(f, &config.run, 99));
            algo.run(&ctx, 0)
        };
        let (a, b) = (run(), run());
        assert_eq!(a.success, b.success, "{}", algo.name());
        assert_eq!(a.ncall_success, b.ncall_success, "{}", algo.name());
        assert_eq!(a.ncall_max, b.ncall_max, "{}", algo.name());
        assert_eq!(a.success_point, b.success_point, "{}", algo.name());
        assert_eq!(a.best, b.best, "{}", algo.name());
    }
}

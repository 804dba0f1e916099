//! Evaluation from several threads over one shared object table.
//!
//! The evaluator only borrows the table, so any number of threads may run
//! arithmetic against it at once.

use std::thread;

use crate::common::*;
use ptrcalc::*;

const THREADS: usize = 8;

#[test]
fn test_parallel_walks_agree() {
    // Arrange
    let table = objects(DataLayout::lp64(), &[("arr", "long[64]"), ("other", "int")]);

    // Act
    let results: Vec<i64> = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let table = &table;
                s.spawn(move || {
                    let eval = PointerEvaluator::new(table);
                    let base = first(table, "arr");
                    let mut p = base;
                    for _ in 0..=t {
                        p = eval.eval_pointer_add(p, 7).unwrap();
                    }
                    eval.eval_pointer_diff(p, base).unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    // Assert
    for (t, diff) in results.into_iter().enumerate() {
        assert_eq!(diff, 7 * (t as i64 + 1));
    }
}

#[test]
fn test_parallel_diagnostics_are_independent() {
    let table = objects(DataLayout::ilp32(), &[("x", "int"), ("y", "int")]);

    let reports: Vec<usize> = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let table = &table;
                s.spawn(move || {
                    let eval = PointerEvaluator::new(table);
                    let mut reporter = DiagnosticReporter::new(&EvalConfig::collecting());
                    let (px, py) = (addr(table, "x"), addr(table, "y"));
                    if let Err(d) = eval.eval_pointer_diff(px, py) {
                        reporter.record(d, SourceLocation::at_step(0));
                    }
                    if let Err(d) = eval.eval_pointer_add(px, 2) {
                        reporter.record(d, SourceLocation::at_step(1));
                    }
                    reporter.reports().len()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(reports.iter().all(|&n| n == 2));
}

#[test]
fn test_scenarios_run_in_parallel() {
    let scenario = load_demo("array_walk.json");

    let statuses: Vec<u8> = thread::scope(|s| {
        let handles: Vec<_> = DataLayout::NAMES
            .iter()
            .map(|name| {
                let scenario = &scenario;
                s.spawn(move || {
                    let config = EvalConfig::strict().with_layout(DataLayout::named(name).unwrap());
                    run_clean(scenario, &config).exit_status
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(statuses, vec![5, 5, 5]);
}

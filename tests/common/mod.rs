//! Shared test utilities for ptrcalc integration tests.
//!
//! ## AAA Pattern
//!
//! Tests follow Arrange-Act-Assert:
//! - Arrange: define objects and take pointers
//! - Act: run the operator under test
//! - Assert: check the value or the diagnostic

#![allow(dead_code)]

use std::path::PathBuf;

use ptrcalc::*;

// =============================================================================
// Object Fixtures
// =============================================================================

/// An object table for `layout` with the given `(name, type)` definitions.
///
/// # Panics
/// Panics if a type does not parse, which is appropriate for test code.
pub fn objects(layout: DataLayout, defs: &[(&str, &str)]) -> ObjectTable {
    let mut table = ObjectTable::new(layout);
    for (name, ty) in defs {
        let ty: CType = ty.parse().expect("test type should parse");
        table.define(name, ty).expect("test object should fit");
    }
    table
}

/// Pointer to the first element of array `name`.
pub fn first(table: &ObjectTable, name: &str) -> TypedPointer {
    table.decay(name).expect("array should decay")
}

/// `&name`
pub fn addr(table: &ObjectTable, name: &str) -> TypedPointer {
    table.address_of(name).expect("object should exist")
}

// =============================================================================
// Scenario Helpers
// =============================================================================

/// Path of a file under `demos/`.
pub fn demo_path(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos").join(file)
}

/// Load a scenario from `demos/`.
pub fn load_demo(file: &str) -> Scenario {
    let text = std::fs::read_to_string(demo_path(file)).expect("demo file should be readable");
    Scenario::from_json_str(&text).expect("demo file should parse")
}

/// Run a scenario, expecting it to finish cleanly.
pub fn run_clean(scenario: &Scenario, config: &EvalConfig) -> ScenarioOutcome {
    match run_scenario(scenario, config) {
        Ok(outcome) => outcome,
        Err(reports) => panic!("expected a clean run, got {:?}", reports),
    }
}

/// Run a scenario, expecting diagnostics, and return their codes.
pub fn run_codes(scenario: &Scenario, config: &EvalConfig) -> Vec<u32> {
    match run_scenario(scenario, config) {
        Ok(outcome) => panic!("expected diagnostics, got {:?}", outcome),
        Err(reports) => reports.iter().map(|r| r.diagnostic.code()).collect(),
    }
}

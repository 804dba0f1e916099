//! Scenario documents and their runner.
//!
//! # Layer 2 - depends on core, eval, report
//!
//! Scenarios let a whole test program's worth of pointer arithmetic be
//! written down as data and checked end to end, including the exit status
//! the program would return.

pub mod model;
pub mod runner;

pub use model::{Expr, ObjectDecl, Scenario, Step};
pub use runner::{exit_status_of, run_scenario, ScenarioOutcome};

//! Typed pointer arithmetic for a C-like language front end.
//!
//! Pointers are modelled as an object identity plus a byte offset, tagged with
//! the size of the element they point to. Adding an integer moves by whole
//! elements, subtracting two pointers counts elements, and anything outside
//! a single object's bounds is reported as a [`Diagnostic`] instead of being
//! given a number.
//!
//! ```
//! use ptrcalc::{CType, DataLayout, ObjectTable, PointerEvaluator};
//!
//! let mut objects = ObjectTable::new(DataLayout::word64());
//! objects.define("x", CType::array_of(CType::Int, 2)).unwrap();
//!
//! let eval = PointerEvaluator::new(&objects);
//! let p = objects.decay("x").unwrap();
//! let r = eval.eval_pointer_add(p, 2).unwrap();
//! assert_eq!(eval.eval_pointer_diff(r, p), Ok(2));
//! ```

// ═══════════════════════════════════════════════════════════════════════════
// Layer 0: Core (No internal dependencies)
// ═══════════════════════════════════════════════════════════════════════════
pub mod core;

// ═══════════════════════════════════════════════════════════════════════════
// Layer 1: Evaluation & Configuration (depends on core)
// ═══════════════════════════════════════════════════════════════════════════
pub mod config;
pub mod eval;
pub mod report;

// ═══════════════════════════════════════════════════════════════════════════
// Layer 2: Scenarios (depends on all)
// ═══════════════════════════════════════════════════════════════════════════
pub mod scenario;

pub use crate::core::{
    Address, BinaryOp, CType, CompareOp, DataLayout, Diagnostic, DiagnosticCategory, EvalResult,
    Object, ObjectId, ObjectResolver, ObjectTable, SourceLocation, SubtractionMismatch, TypedPointer,
};
pub use config::{ConfigError, DiagnosticPolicy, EvalConfig};
pub use eval::{PointerEvaluator, Value};
pub use report::{DiagnosticReporter, Report, ReportAction, ReportRecord};
pub use scenario::{exit_status_of, run_scenario, Expr, ObjectDecl, Scenario, ScenarioOutcome, Step};

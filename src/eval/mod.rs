//! Pointer arithmetic evaluation.
//!
//! # Layer 1 - depends on core
//!
//! [`PointerEvaluator`] is the entry point used by an expression evaluator:
//! it takes operands that have already been evaluated and returns the
//! pointer, element count or truth value of the operator, or a diagnostic.

pub mod arith;
pub mod value;

pub use arith::PointerEvaluator;
pub use value::Value;

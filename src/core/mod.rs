//! Core types for the pointer arithmetic evaluator.
//!
//! This module defines the memory model every operation works over:
//!
//! - **Object**: a storage region with a stable identity and byte length
//! - **Address**: an object identity plus a byte offset into it
//! - **TypedPointer**: an address paired with its pointee element size
//! - **CType / DataLayout**: the C types the front end hands us and their sizes
//! - **Op**: the operators the evaluator understands
//! - **Error**: the diagnostic taxonomy
//!
//! # Layer 0 - No Internal Dependencies
//!
//! Nothing in here depends on the evaluator, reporter or scenario layers.

pub mod address;
pub mod error;
pub mod object;
pub mod op;
pub mod pointer;
pub mod types;

pub use address::Address;
pub use error::{Diagnostic, DiagnosticCategory, EvalResult, SourceLocation, SubtractionMismatch};
pub use object::{Object, ObjectId, ObjectResolver, ObjectTable};
pub use op::{BinaryOp, CompareOp};
pub use pointer::TypedPointer;
pub use types::{CType, DataLayout};

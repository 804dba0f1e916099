//! Diagnostic types for pointer arithmetic.
//!
//! Every operation in this crate either produces a value or a [`Diagnostic`].
//! Diagnostics are plain values: they are handed back to the caller, never
//! recovered from locally and never replaced by a fallback number.
//!
//! # Categories
//!
//! - **Bounds**: an offset left its object, or a dereference would read past it
//! - **Provenance**: the operands point into different objects
//! - **Alignment**: a byte distance is not a whole number of elements
//! - **Overflow**: signed arithmetic on offsets or counts overflowed
//! - **Type**: the operands are not something pointer arithmetic applies to
//! - **Lookup**: an object or variable does not exist

use std::fmt;

use thiserror::Error;

use super::object::ObjectId;
use super::op::{BinaryOp, CompareOp};

/// Where a diagnostic was raised, for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceLocation {
    /// Line number (1-indexed, 0 when unknown).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// Index of the evaluation step that raised it.
    pub step: usize,
    /// Index of the object declaration that raised it, when it was not a step.
    pub declaration: Option<usize>,
    /// Optional source file name.
    pub file: Option<String>,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column, step: 0, declaration: None, file: None }
    }

    pub fn at_step(step: usize) -> Self {
        Self { line: 0, column: 0, step, declaration: None, file: None }
    }

    pub fn at_declaration(index: usize) -> Self {
        Self { declaration: Some(index), ..Self::default() }
    }

    pub fn in_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref file) = self.file {
            write!(f, "{}:", file)?;
        }
        if self.line > 0 {
            write!(f, "{}:{}", self.line, self.column)
        } else if let Some(index) = self.declaration {
            write!(f, "declaration {}", index)
        } else {
            write!(f, "step {}", self.step)
        }
    }
}

/// Why a pointer subtraction was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtractionMismatch {
    /// The operands point into different objects.
    CrossObject { left: ObjectId, right: ObjectId },
    /// The operands have different pointee sizes.
    ElementSize { left: u64, right: u64 },
}

impl fmt::Display for SubtractionMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubtractionMismatch::CrossObject { left, right } => {
                write!(f, "operands point into different objects ({} and {})", left, right)
            }
            SubtractionMismatch::ElementSize { left, right } => {
                write!(f, "element sizes differ ({} and {} bytes)", left, right)
            }
        }
    }
}

/// A structured failure from the arithmetic core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    // ═══════════════════════════════════════════════════════════════════
    // Undefined behavior in the evaluated program
    // ═══════════════════════════════════════════════════════════════════

    /// The resulting offset would leave `[0, length]`.
    #[error("offset {offset} is outside object {object} (valid range 0..={length})")]
    OutOfBounds { object: ObjectId, offset: i128, length: u64 },

    /// Subtraction of pointers that do not share an object and element size.
    #[error("invalid pointer subtraction: {reason}")]
    InvalidPointerSubtraction { reason: SubtractionMismatch },

    /// Relational comparison of pointers into different objects.
    #[error("pointers into different objects ({left} and {right}) cannot be ordered with `{op}`")]
    InvalidPointerComparison { op: CompareOp, left: ObjectId, right: ObjectId },

    /// The byte distance between two pointers is not a whole number of elements.
    #[error("byte difference {byte_difference} is not a multiple of element size {element_size}")]
    MisalignedPointer { byte_difference: i128, element_size: u64 },

    /// Signed overflow while computing an offset or element count.
    #[error("integer overflow in {operation}")]
    IntegerOverflow { operation: &'static str },

    /// Reading an element that is not entirely inside its object.
    #[error("dereference of {size} bytes at offset {offset} runs past object {object} of length {length}")]
    InvalidDereference { object: ObjectId, offset: u64, size: u64, length: u64 },

    // ═══════════════════════════════════════════════════════════════════
    // Misuse by the caller
    // ═══════════════════════════════════════════════════════════════════

    /// Typed pointers need a positive stride.
    #[error("pointer element size must be greater than zero")]
    ZeroElementSize,

    /// A static type that cannot be used as a pointer.
    #[error("type `{ty}` is not a pointer type")]
    NotAPointer { ty: String },

    /// An operand of the wrong kind where a specific one is required.
    #[error("expected {expected} operand, found {found}")]
    TypeMismatch { expected: &'static str, found: &'static str },

    /// An operator applied to operands that are not pointer arithmetic.
    #[error("`{lhs} {op} {rhs}` is not pointer arithmetic")]
    UnsupportedOperands { op: BinaryOp, lhs: &'static str, rhs: &'static str },

    /// The object table has no object with this identity.
    #[error("unknown object {id}")]
    UnknownObject { id: ObjectId },

    /// No object was defined under this name.
    #[error("undefined object `{name}`")]
    UndefinedObject { name: String },

    /// No value was bound to this name.
    #[error("undefined variable `{name}`")]
    UndefinedVariable { name: String },

    /// Object identities are exhausted.
    #[error("object table is full ({count} objects)")]
    TooManyObjects { count: usize },
}

impl Diagnostic {
    /// Whether this diagnostic describes undefined behavior in the evaluated
    /// program, as opposed to a malformed request from the caller.
    pub fn is_undefined_behavior(&self) -> bool {
        matches!(
            self,
            Diagnostic::OutOfBounds { .. }
                | Diagnostic::InvalidPointerSubtraction { .. }
                | Diagnostic::InvalidPointerComparison { .. }
                | Diagnostic::MisalignedPointer { .. }
                | Diagnostic::IntegerOverflow { .. }
                | Diagnostic::InvalidDereference { .. }
        )
    }

    /// Get the diagnostic category.
    pub fn category(&self) -> DiagnosticCategory {
        match self {
            Diagnostic::OutOfBounds { .. } | Diagnostic::InvalidDereference { .. } => {
                DiagnosticCategory::Bounds
            }

            Diagnostic::InvalidPointerSubtraction { .. }
            | Diagnostic::InvalidPointerComparison { .. } => DiagnosticCategory::Provenance,

            Diagnostic::MisalignedPointer { .. } => DiagnosticCategory::Alignment,

            Diagnostic::IntegerOverflow { .. } => DiagnosticCategory::Overflow,

            Diagnostic::ZeroElementSize
            | Diagnostic::NotAPointer { .. }
            | Diagnostic::TypeMismatch { .. }
            | Diagnostic::UnsupportedOperands { .. } => DiagnosticCategory::Type,

            Diagnostic::UnknownObject { .. }
            | Diagnostic::UndefinedObject { .. }
            | Diagnostic::UndefinedVariable { .. }
            | Diagnostic::TooManyObjects { .. } => DiagnosticCategory::Lookup,
        }
    }

    /// Stable numeric code for programmatic handling.
    pub fn code(&self) -> u32 {
        match self {
            // Bounds: 1000-1999
            Diagnostic::OutOfBounds { .. } => 1001,
            Diagnostic::InvalidDereference { .. } => 1002,

            // Provenance: 2000-2999
            Diagnostic::InvalidPointerSubtraction { .. } => 2001,
            Diagnostic::InvalidPointerComparison { .. } => 2002,

            // Alignment: 3000-3999
            Diagnostic::MisalignedPointer { .. } => 3001,

            // Overflow: 4000-4999
            Diagnostic::IntegerOverflow { .. } => 4001,

            // Type: 5000-5999
            Diagnostic::ZeroElementSize => 5001,
            Diagnostic::NotAPointer { .. } => 5002,
            Diagnostic::TypeMismatch { .. } => 5003,
            Diagnostic::UnsupportedOperands { .. } => 5004,

            // Lookup: 6000-6999
            Diagnostic::UnknownObject { .. } => 6001,
            Diagnostic::UndefinedObject { .. } => 6002,
            Diagnostic::UndefinedVariable { .. } => 6003,
            Diagnostic::TooManyObjects { .. } => 6004,
        }
    }
}

/// Diagnostic category for filtering and summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticCategory {
    Bounds,
    Provenance,
    Alignment,
    Overflow,
    Type,
    Lookup,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Bounds => write!(f, "bounds"),
            DiagnosticCategory::Provenance => write!(f, "provenance"),
            DiagnosticCategory::Alignment => write!(f, "alignment"),
            DiagnosticCategory::Overflow => write!(f, "overflow"),
            DiagnosticCategory::Type => write!(f, "type"),
            DiagnosticCategory::Lookup => write!(f, "lookup"),
        }
    }
}

/// Result type alias for evaluator operations.
pub type EvalResult<T> = Result<T, Diagnostic>;

//! Operand and result values.

use std::fmt;

use crate::core::{Diagnostic, EvalResult, TypedPointer};

/// A value flowing through pointer arithmetic: a signed integer or a typed
/// pointer. Comparisons produce `Int(0)` or `Int(1)`, as in C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Value {
    Int(i64),
    Pointer(TypedPointer),
}

impl Value {
    pub fn from_bool(b: bool) -> Self {
        Value::Int(i64::from(b))
    }

    /// Short name of the operand kind, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Pointer(_) => "pointer",
        }
    }

    pub fn as_int(&self) -> EvalResult<i64> {
        match self {
            Value::Int(n) => Ok(*n),
            other => Err(Diagnostic::TypeMismatch { expected: "int", found: other.kind_name() }),
        }
    }

    pub fn as_pointer(&self) -> EvalResult<TypedPointer> {
        match self {
            Value::Pointer(p) => Ok(*p),
            other => Err(Diagnostic::TypeMismatch { expected: "pointer", found: other.kind_name() }),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<TypedPointer> for Value {
    fn from(p: TypedPointer) -> Self {
        Value::Pointer(p)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Pointer(p) => write!(f, "{}", p),
        }
    }
}

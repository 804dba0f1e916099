//! The pointer arithmetic evaluator.
//!
//! Operations:
//!
//! - `ptr + n`, `n + ptr`: advance by `n` elements
//! - `ptr - n`: advance by `-n` elements
//! - `ptr - ptr`: signed element count between two pointers into one object
//! - `ptr <op> ptr`: ordering within one object, equality across objects
//!
//! The evaluator holds nothing but a shared borrow of the object resolver;
//! every call is a pure function of its operands and can run on any thread
//! as long as the objects are not mutated meanwhile.

use std::fmt::Debug;

use tracing::debug;

use crate::core::{
    BinaryOp, CompareOp, Diagnostic, EvalResult, ObjectResolver, SubtractionMismatch, TypedPointer,
};

use super::value::Value;

/// Log the outcome of one operation at debug level.
fn traced<T: Debug>(operation: &'static str, result: EvalResult<T>) -> EvalResult<T> {
    match &result {
        Ok(value) => debug!(operation, ?value, "evaluated"),
        Err(diagnostic) => debug!(operation, code = diagnostic.code(), %diagnostic, "rejected"),
    }
    result
}

/// Evaluates pointer operators against a set of objects.
pub struct PointerEvaluator<'a, R: ObjectResolver + ?Sized> {
    objects: &'a R,
}

impl<'a, R: ObjectResolver + ?Sized> PointerEvaluator<'a, R> {
    pub fn new(objects: &'a R) -> Self {
        Self { objects }
    }

    pub fn objects(&self) -> &'a R {
        self.objects
    }

    /// `ptr + n`
    pub fn eval_pointer_add(&self, ptr: TypedPointer, n: i64) -> EvalResult<TypedPointer> {
        traced("ptr + int", ptr.advance(n, self.objects))
    }

    /// `n + ptr`, identical to `ptr + n`.
    pub fn eval_int_add_pointer(&self, n: i64, ptr: TypedPointer) -> EvalResult<TypedPointer> {
        traced("int + ptr", ptr.advance(n, self.objects))
    }

    /// `ptr - n`
    pub fn eval_pointer_sub(&self, ptr: TypedPointer, n: i64) -> EvalResult<TypedPointer> {
        let result = n
            .checked_neg()
            .ok_or(Diagnostic::IntegerOverflow { operation: "negation of pointer offset" })
            .and_then(|neg| ptr.advance(neg, self.objects));
        traced("ptr - int", result)
    }

    /// `&ptr[i]`, the address an index expression reads from.
    pub fn eval_index(&self, ptr: TypedPointer, index: i64) -> EvalResult<TypedPointer> {
        traced("ptr[int]", ptr.advance(index, self.objects))
    }

    /// `a - b`: the signed number of elements from `b` to `a`.
    ///
    /// Both pointers must share an object and an element size. The byte
    /// distance must divide exactly by the element size; the raw byte
    /// distance is never returned.
    pub fn eval_pointer_diff(&self, a: TypedPointer, b: TypedPointer) -> EvalResult<i64> {
        traced("ptr - ptr", self.pointer_diff(a, b))
    }

    fn pointer_diff(&self, a: TypedPointer, b: TypedPointer) -> EvalResult<i64> {
        if !a.address().same_object(&b.address()) {
            return Err(Diagnostic::InvalidPointerSubtraction {
                reason: SubtractionMismatch::CrossObject { left: a.object(), right: b.object() },
            });
        }
        if a.element_size() != b.element_size() {
            return Err(Diagnostic::InvalidPointerSubtraction {
                reason: SubtractionMismatch::ElementSize {
                    left: a.element_size(),
                    right: b.element_size(),
                },
            });
        }
        a.address().validate(self.objects)?;
        b.address().validate(self.objects)?;

        let byte_difference = i128::from(a.offset()) - i128::from(b.offset());
        let element_size = i128::from(a.element_size());
        if byte_difference % element_size != 0 {
            return Err(Diagnostic::MisalignedPointer {
                byte_difference,
                element_size: a.element_size(),
            });
        }
        i64::try_from(byte_difference / element_size)
            .map_err(|_| Diagnostic::IntegerOverflow { operation: "pointer difference" })
    }

    /// `a <op> b`
    ///
    /// Ordering operators require both pointers in the same object and
    /// compare offsets. `==` and `!=` are defined for any two pointers and
    /// compare object identity and offset.
    pub fn eval_pointer_compare(&self, op: CompareOp, a: TypedPointer, b: TypedPointer) -> EvalResult<bool> {
        traced("ptr <op> ptr", self.pointer_compare(op, a, b))
    }

    fn pointer_compare(&self, op: CompareOp, a: TypedPointer, b: TypedPointer) -> EvalResult<bool> {
        let same_object = a.address().same_object(&b.address());
        if op.is_ordering() && !same_object {
            return Err(Diagnostic::InvalidPointerComparison {
                op,
                left: a.object(),
                right: b.object(),
            });
        }
        a.address().validate(self.objects)?;
        b.address().validate(self.objects)?;

        if !same_object {
            return Ok(op == CompareOp::Ne);
        }
        Ok(op.holds(a.offset().cmp(&b.offset())))
    }

    /// Check that `*ptr` reads a whole element inside its object.
    pub fn check_dereference(&self, ptr: TypedPointer) -> EvalResult<()> {
        traced("*ptr", ptr.check_dereference(self.objects))
    }

    /// Dispatch a binary operator on already-evaluated operands.
    ///
    /// Only the pointer forms are handled here:
    ///
    /// | operator | operands          | result  |
    /// |----------|-------------------|---------|
    /// | `+`      | ptr, int / int, ptr | pointer |
    /// | `-`      | ptr, int          | pointer |
    /// | `-`      | ptr, ptr          | int     |
    /// | compare  | ptr, ptr          | int 0/1 |
    ///
    /// Anything else, including int-int arithmetic, is `UnsupportedOperands`
    /// and belongs to the caller's integer evaluator.
    pub fn eval_binary(&self, op: BinaryOp, lhs: Value, rhs: Value) -> EvalResult<Value> {
        match (op, lhs, rhs) {
            (BinaryOp::Add, Value::Pointer(p), Value::Int(n)) => self.eval_pointer_add(p, n).map(Value::Pointer),
            (BinaryOp::Add, Value::Int(n), Value::Pointer(p)) => {
                self.eval_int_add_pointer(n, p).map(Value::Pointer)
            }
            (BinaryOp::Sub, Value::Pointer(p), Value::Int(n)) => self.eval_pointer_sub(p, n).map(Value::Pointer),
            (BinaryOp::Sub, Value::Pointer(a), Value::Pointer(b)) => self.eval_pointer_diff(a, b).map(Value::Int),
            (BinaryOp::Compare(cmp), Value::Pointer(a), Value::Pointer(b)) => {
                self.eval_pointer_compare(cmp, a, b).map(Value::from_bool)
            }
            (op, lhs, rhs) => Err(Diagnostic::UnsupportedOperands {
                op,
                lhs: lhs.kind_name(),
                rhs: rhs.kind_name(),
            }),
        }
    }
}

//! The address space model.
//!
//! An address is never a raw machine integer. It is the identity of the object
//! it was derived from plus a byte offset into that object, so provenance
//! questions have a direct answer instead of depending on where unrelated
//! objects happen to sit.
//!
//! Valid offsets are `0..=length`: the one-past-the-end address exists for
//! comparison and subtraction, but nothing may be read through it.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::{Diagnostic, EvalResult};
use super::object::{ObjectId, ObjectResolver};

/// Object identity plus byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    pub object: ObjectId,
    pub offset: u64,
}

impl Address {
    pub const fn new(object: ObjectId, offset: u64) -> Self {
        Self { object, offset }
    }

    /// The first byte of an object.
    pub const fn start_of(object: ObjectId) -> Self {
        Self { object, offset: 0 }
    }

    /// True iff both addresses were derived from the same object.
    #[inline]
    pub fn same_object(&self, other: &Address) -> bool {
        self.object == other.object
    }

    /// Check that the offset lies in `0..=length` of a known object.
    pub fn validate<R: ObjectResolver + ?Sized>(&self, objects: &R) -> EvalResult<()> {
        let object = objects.require_object(self.object)?;
        if self.offset > object.length {
            return Err(Diagnostic::OutOfBounds {
                object: self.object,
                offset: i128::from(self.offset),
                length: object.length,
            });
        }
        Ok(())
    }

    /// Move by `delta` bytes within the same object.
    ///
    /// Fails with `OutOfBounds` if the result leaves `0..=length`. The sum is
    /// formed in 128 bits, so no intermediate value can wrap.
    pub fn add_offset<R: ObjectResolver + ?Sized>(self, delta: i64, objects: &R) -> EvalResult<Address> {
        let object = objects.require_object(self.object)?;
        let target = i128::from(self.offset) + i128::from(delta);
        if target < 0 || target > i128::from(object.length) {
            return Err(Diagnostic::OutOfBounds {
                object: self.object,
                offset: target,
                length: object.length,
            });
        }
        Ok(Address { object: self.object, offset: target as u64 })
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}", self.object, self.offset)
    }
}

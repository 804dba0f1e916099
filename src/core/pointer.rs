//! Typed pointer values.
//!
//! A [`TypedPointer`] is an [`Address`] together with the size of the type it
//! points to. That size is the stride for all arithmetic: advancing by `n`
//! moves `n * element_size` bytes, and the distance between two pointers is
//! measured in elements.

use std::fmt;
use std::num::NonZeroU64;

use super::address::Address;
use super::error::{Diagnostic, EvalResult};
use super::object::{ObjectId, ObjectResolver};
use super::types::{CType, DataLayout};

/// An address with a pointee element size (always > 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypedPointer {
    address: Address,
    element_size: NonZeroU64,
}

impl TypedPointer {
    /// Create a typed pointer. A zero element size is rejected.
    pub fn new(address: Address, element_size: u64) -> EvalResult<Self> {
        let element_size = NonZeroU64::new(element_size).ok_or(Diagnostic::ZeroElementSize)?;
        Ok(Self { address, element_size })
    }

    /// Create a typed pointer from a static pointer (or array) type.
    pub fn from_type(address: Address, ty: &CType, layout: &DataLayout) -> EvalResult<Self> {
        Self::new(address, ty.element_size(layout)?)
    }

    #[inline]
    pub fn address(&self) -> Address {
        self.address
    }

    #[inline]
    pub fn object(&self) -> ObjectId {
        self.address.object
    }

    #[inline]
    pub fn offset(&self) -> u64 {
        self.address.offset
    }

    #[inline]
    pub fn element_size(&self) -> u64 {
        self.element_size.get()
    }

    /// The same address viewed with a different stride, as after a cast.
    pub fn with_element_size(self, element_size: u64) -> EvalResult<Self> {
        Self::new(self.address, element_size)
    }

    /// Move by `count` elements.
    ///
    /// The byte delta is computed in 128 bits and must fit a signed 64-bit
    /// offset; otherwise the result is `IntegerOverflow`. Bounds are checked
    /// by [`Address::add_offset`].
    pub fn advance<R: ObjectResolver + ?Sized>(self, count: i64, objects: &R) -> EvalResult<Self> {
        let delta = i128::from(count) * i128::from(self.element_size.get());
        let delta = i64::try_from(delta)
            .map_err(|_| Diagnostic::IntegerOverflow { operation: "pointer offset scaling" })?;
        let address = self.address.add_offset(delta, objects)?;
        Ok(Self { address, ..self })
    }

    /// Check that a whole element can be read through this pointer.
    ///
    /// One-past-the-end pointers, and pointers whose element would straddle
    /// the end of the object, fail with `InvalidDereference`.
    pub fn check_dereference<R: ObjectResolver + ?Sized>(&self, objects: &R) -> EvalResult<()> {
        let object = objects.require_object(self.object())?;
        let end = u128::from(self.offset()) + u128::from(self.element_size());
        if end > u128::from(object.length) {
            return Err(Diagnostic::InvalidDereference {
                object: self.object(),
                offset: self.offset(),
                size: self.element_size(),
                length: object.length,
            });
        }
        Ok(())
    }
}

impl fmt::Display for TypedPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "&{} (stride {})", self.address, self.element_size)
    }
}

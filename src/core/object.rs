//! Objects and the table that owns them.
//!
//! An object is a contiguous storage region with a stable identity. Pointer
//! provenance is object identity: two addresses are comparable or subtractable
//! only when they name the same object. Identities are indices into the
//! [`ObjectTable`] arena and are never reused.
//!
//! The evaluator only reads objects, through the [`ObjectResolver`] trait, so a
//! host with its own storage model can plug it in without going through
//! [`ObjectTable`].

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::address::Address;
use super::error::{Diagnostic, EvalResult};
use super::pointer::TypedPointer;
use super::types::{CType, DataLayout};

/// Stable identity of an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

impl ObjectId {
    /// The identity for arena slot `index`. Fails once `u32` identities run out.
    pub fn from_index(index: usize) -> EvalResult<Self> {
        u32::try_from(index)
            .map(ObjectId)
            .map_err(|_| Diagnostic::TooManyObjects { count: index })
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A storage region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Object {
    pub id: ObjectId,
    /// Declared name, absent for anonymous regions.
    pub name: Option<String>,
    /// Declared type, absent for raw byte regions.
    pub ty: Option<CType>,
    /// Length in bytes.
    pub length: u64,
}

/// Read access to objects by identity.
pub trait ObjectResolver {
    /// Look up an object, or `None` if the identity is unknown.
    fn resolve_object(&self, id: ObjectId) -> Option<&Object>;

    /// Look up an object, turning an unknown identity into a diagnostic.
    fn require_object(&self, id: ObjectId) -> EvalResult<&Object> {
        self.resolve_object(id).ok_or(Diagnostic::UnknownObject { id })
    }
}

/// Arena of objects, sized according to a data layout.
#[derive(Debug, Clone, Default)]
pub struct ObjectTable {
    layout: DataLayout,
    objects: Vec<Object>,
    by_name: HashMap<String, ObjectId>,
}

impl ObjectTable {
    pub fn new(layout: DataLayout) -> Self {
        Self { layout, objects: Vec::new(), by_name: HashMap::new() }
    }

    pub fn layout(&self) -> &DataLayout {
        &self.layout
    }

    /// Define a named object of the given type.
    ///
    /// A later definition with the same name shadows the earlier one; the
    /// earlier object keeps existing and stays reachable by identity.
    pub fn define(&mut self, name: &str, ty: CType) -> EvalResult<ObjectId> {
        let length = ty.size_of(&self.layout)?;
        let id = self.push(Some(name.to_string()), Some(ty), length)?;
        self.by_name.insert(name.to_string(), id);
        Ok(id)
    }

    /// Define a raw region of `length` bytes, optionally named.
    pub fn define_bytes(&mut self, name: Option<&str>, length: u64) -> EvalResult<ObjectId> {
        let id = self.push(name.map(str::to_string), None, length)?;
        if let Some(name) = name {
            self.by_name.insert(name.to_string(), id);
        }
        Ok(id)
    }

    fn push(&mut self, name: Option<String>, ty: Option<CType>, length: u64) -> EvalResult<ObjectId> {
        let id = ObjectId::from_index(self.objects.len())?;
        trace!(%id, ?name, length, "define object");
        self.objects.push(Object { id, name, ty, length });
        Ok(id)
    }

    /// Find the object currently bound to `name`.
    pub fn lookup(&self, name: &str) -> EvalResult<&Object> {
        self.by_name
            .get(name)
            .and_then(|id| self.resolve_object(*id))
            .ok_or_else(|| Diagnostic::UndefinedObject { name: name.to_string() })
    }

    /// `&name`: a pointer to the start of the object, typed as a pointer to
    /// the object's own type.
    pub fn address_of(&self, name: &str) -> EvalResult<TypedPointer> {
        let object = self.lookup(name)?;
        let ty = object.ty.as_ref().ok_or_else(|| Diagnostic::NotAPointer {
            ty: format!("untyped region `{}`", name),
        })?;
        TypedPointer::new(Address::start_of(object.id), ty.size_of(&self.layout)?)
    }

    /// `name` used as an rvalue when it is an array: a pointer to its first
    /// element.
    pub fn decay(&self, name: &str) -> EvalResult<TypedPointer> {
        let object = self.lookup(name)?;
        match &object.ty {
            Some(ty @ CType::Array(..)) => {
                TypedPointer::new(Address::start_of(object.id), ty.element_size(&self.layout)?)
            }
            Some(other) => Err(Diagnostic::NotAPointer { ty: other.to_string() }),
            None => Err(Diagnostic::NotAPointer { ty: format!("untyped region `{}`", name) }),
        }
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Object> {
        self.objects.iter()
    }
}

impl ObjectResolver for ObjectTable {
    fn resolve_object(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(id.0 as usize)
    }
}

//! C types and target data layouts.
//!
//! The front end hands the evaluator static types; the only thing pointer
//! arithmetic needs from them is the byte size of the pointee. Sizes come
//! from a [`DataLayout`] so the same program can be evaluated for targets
//! where `int` is 4 or 8 bytes.
//!
//! Types have a compact textual form used by scenario files: a base type
//! (`char`, `int`, `long`) followed by suffixes that apply left to right.
//! `*` wraps the type so far in a pointer, `[N]` wraps it in an array of N:
//!
//! - `int*` is a pointer to int
//! - `int[4]` is an array of four ints
//! - `int*[4]` is an array of four pointers to int
//! - `int[4]*` is a pointer to an array of four ints

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::error::{Diagnostic, EvalResult};

/// Byte sizes of the scalar types on a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataLayout {
    pub char_size: u64,
    pub int_size: u64,
    pub long_size: u64,
    pub pointer_size: u64,
}

impl DataLayout {
    /// Names accepted by [`DataLayout::named`].
    pub const NAMES: [&'static str; 3] = ["word64", "lp64", "ilp32"];

    /// Every scalar except `char` is one 64-bit word.
    pub const fn word64() -> Self {
        Self { char_size: 1, int_size: 8, long_size: 8, pointer_size: 8 }
    }

    /// 32-bit `int`, 64-bit `long` and pointers.
    pub const fn lp64() -> Self {
        Self { char_size: 1, int_size: 4, long_size: 8, pointer_size: 8 }
    }

    /// 32-bit `int`, `long` and pointers.
    pub const fn ilp32() -> Self {
        Self { char_size: 1, int_size: 4, long_size: 4, pointer_size: 4 }
    }

    /// Look up a preset by name.
    pub fn named(name: &str) -> Option<Self> {
        match name {
            "word64" => Some(Self::word64()),
            "lp64" => Some(Self::lp64()),
            "ilp32" => Some(Self::ilp32()),
            _ => None,
        }
    }
}

impl Default for DataLayout {
    fn default() -> Self {
        Self::word64()
    }
}

/// A C type as far as pointer arithmetic cares.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CType {
    Char,
    Int,
    Long,
    Pointer(Box<CType>),
    Array(Box<CType>, u64),
}

impl CType {
    pub fn pointer_to(ty: CType) -> Self {
        CType::Pointer(Box::new(ty))
    }

    pub fn array_of(ty: CType, len: u64) -> Self {
        CType::Array(Box::new(ty), len)
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, CType::Pointer(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, CType::Array(..))
    }

    /// The pointed-to type, if this is a pointer.
    pub fn pointee(&self) -> Option<&CType> {
        match self {
            CType::Pointer(inner) => Some(inner),
            _ => None,
        }
    }

    /// Array-to-pointer decay. Other types are returned unchanged.
    pub fn decay(&self) -> CType {
        match self {
            CType::Array(elem, _) => CType::Pointer(elem.clone()),
            other => other.clone(),
        }
    }

    /// Size of a value of this type in bytes.
    pub fn size_of(&self, layout: &DataLayout) -> EvalResult<u64> {
        match self {
            CType::Char => Ok(layout.char_size),
            CType::Int => Ok(layout.int_size),
            CType::Long => Ok(layout.long_size),
            CType::Pointer(_) => Ok(layout.pointer_size),
            CType::Array(elem, len) => elem
                .size_of(layout)?
                .checked_mul(*len)
                .ok_or(Diagnostic::IntegerOverflow { operation: "sizeof" }),
        }
    }

    /// The stride used when doing arithmetic on a value of this type.
    ///
    /// Arrays decay first, so `int[4]` scales by `sizeof(int)`.
    pub fn element_size(&self, layout: &DataLayout) -> EvalResult<u64> {
        match self.decay().pointee() {
            Some(pointee) => pointee.size_of(layout),
            None => Err(Diagnostic::NotAPointer { ty: self.to_string() }),
        }
    }
}

impl fmt::Display for CType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CType::Char => write!(f, "char"),
            CType::Int => write!(f, "int"),
            CType::Long => write!(f, "long"),
            CType::Pointer(inner) => write!(f, "{}*", inner),
            CType::Array(elem, len) => write!(f, "{}[{}]", elem, len),
        }
    }
}

/// Failure to read a type from its textual form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeParseError {
    #[error("unknown base type `{0}`")]
    UnknownBase(String),
    #[error("malformed array length in `{0}`")]
    BadArrayLength(String),
    #[error("unexpected `{found}` in type `{text}`")]
    Unexpected { found: char, text: String },
}

impl FromStr for CType {
    type Err = TypeParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();
        let base_end = text
            .find(|c: char| c == '*' || c == '[' || c.is_whitespace())
            .unwrap_or(text.len());

        let mut ty = match &text[..base_end] {
            "char" => CType::Char,
            "int" => CType::Int,
            "long" => CType::Long,
            other => return Err(TypeParseError::UnknownBase(other.to_string())),
        };

        let mut rest = text[base_end..].trim_start();
        while let Some(c) = rest.chars().next() {
            match c {
                '*' => {
                    ty = CType::pointer_to(ty);
                    rest = &rest[1..];
                }
                '[' => {
                    let close = rest
                        .find(']')
                        .ok_or_else(|| TypeParseError::BadArrayLength(text.to_string()))?;
                    let len = rest[1..close]
                        .trim()
                        .parse::<u64>()
                        .map_err(|_| TypeParseError::BadArrayLength(text.to_string()))?;
                    ty = CType::array_of(ty, len);
                    rest = &rest[close + 1..];
                }
                found => {
                    return Err(TypeParseError::Unexpected { found, text: text.to_string() });
                }
            }
            rest = rest.trim_start();
        }

        Ok(ty)
    }
}

impl TryFrom<String> for CType {
    type Error = TypeParseError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        text.parse()
    }
}

impl From<CType> for String {
    fn from(ty: CType) -> Self {
        ty.to_string()
    }
}

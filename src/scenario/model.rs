//! The scenario document format.
//!
//! A scenario stands in for a small test program: some object definitions,
//! then a list of steps that bind the results of pointer expressions and
//! finally return one. It is deserialized from JSON:
//!
//! ```json
//! {
//!   "name": "ptr_subtraction_elements",
//!   "objects": [ { "name": "x", "type": "int[2]" } ],
//!   "steps": [
//!     { "let": ["p", { "decay": "x" }] },
//!     { "let": ["r", { "add": [{ "var": "p" }, { "int": 2 }] }] },
//!     { "return": { "sub": [{ "var": "r" }, { "var": "p" }] } }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::core::{CType, CompareOp};

/// A complete scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub objects: Vec<ObjectDecl>,
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// An object definition: `type name;`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: CType,
}

/// One evaluation step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Bind the value of an expression to a name.
    Let(String, Expr),
    /// Return an integer from the program; later steps are not run.
    Return(Expr),
}

/// A pointer expression over already-resolved operands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    Int(i64),
    Var(String),
    /// `&name`
    AddrOf(String),
    /// `name` for an array, decayed to a pointer to its first element.
    Decay(String),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    /// Pointer difference; both operands must be pointers.
    Diff(Box<Expr>, Box<Expr>),
    /// `&ptr[index]`
    Index(Box<Expr>, Box<Expr>),
    Compare(CompareOp, Box<Expr>, Box<Expr>),
    /// Assert the pointer can be dereferenced, yielding it unchanged.
    DerefCheck(Box<Expr>),
    /// `(T*)ptr`: same address, stride of the new pointee.
    Cast(CType, Box<Expr>),
}

impl Expr {
    pub fn int(n: i64) -> Self {
        Expr::Int(n)
    }

    pub fn var(name: &str) -> Self {
        Expr::Var(name.to_string())
    }

    pub fn addr_of(name: &str) -> Self {
        Expr::AddrOf(name.to_string())
    }

    pub fn decay(name: &str) -> Self {
        Expr::Decay(name.to_string())
    }

    pub fn add(lhs: Expr, rhs: Expr) -> Self {
        Expr::Add(Box::new(lhs), Box::new(rhs))
    }

    pub fn sub(lhs: Expr, rhs: Expr) -> Self {
        Expr::Sub(Box::new(lhs), Box::new(rhs))
    }

    pub fn diff(lhs: Expr, rhs: Expr) -> Self {
        Expr::Diff(Box::new(lhs), Box::new(rhs))
    }

    pub fn index(ptr: Expr, index: Expr) -> Self {
        Expr::Index(Box::new(ptr), Box::new(index))
    }

    pub fn compare(op: CompareOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Compare(op, Box::new(lhs), Box::new(rhs))
    }

    pub fn deref_check(ptr: Expr) -> Self {
        Expr::DerefCheck(Box::new(ptr))
    }

    pub fn cast(ty: CType, ptr: Expr) -> Self {
        Expr::Cast(ty, Box::new(ptr))
    }
}

//! Owned fragments of the query AST this core actually touches.
//!
//! Lexing and parsing are out of scope (spec.md §1): everything here is
//! produced by an external planner and handed in already-built. Unlike
//! `juniper::ast`, nothing here borrows from source text — the planner owns
//! the document and is free to drop it once an [`crate::execution::ExecutionPlan`]
//! has been built, since nothing downstream needs to re-read the query
//! source.

use crate::value::ScalarValue;

/// A JSON-like literal that may still contain a variable reference.
///
/// Mirrors `juniper::ast::InputValue`, minus the `Spanning` source-location
/// wrapper (no parser means no source positions to carry).
#[derive(Clone, Debug, PartialEq)]
pub enum InputValue {
    Null,
    Scalar(ScalarValue),
    Enum(String),
    Variable(String),
    List(Vec<InputValue>),
    Object(Vec<(String, InputValue)>),
}

impl InputValue {
    pub fn variable_name(&self) -> Option<&str> {
        match self {
            Self::Variable(name) => Some(name),
            _ => None,
        }
    }

    pub fn null() -> Self {
        Self::Null
    }

    pub fn scalar<T: Into<ScalarValue>>(v: T) -> Self {
        Self::Scalar(v.into())
    }
}

/// A directive applied to a selection, e.g. `@skip(if: $cond)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Directive {
    pub name: String,
    pub arguments: Vec<(String, InputValue)>,
}

impl Directive {
    pub fn argument(&self, name: &str) -> Option<&InputValue> {
        self.arguments
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }
}

/// The part of a field's AST node this core needs: its arguments and
/// directives. The planner has already resolved the field's name, alias,
/// and sub-selection into the owning [`crate::execution::ExecutionInfo`].
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FieldAst {
    pub arguments: Vec<(String, InputValue)>,
    pub directives: Vec<Directive>,
}

impl FieldAst {
    pub fn argument(&self, name: &str) -> Option<&InputValue> {
        self.arguments
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }
}

//! The two error categories of §7: rescued field errors and propagating
//! structural errors.

use derive_more::{Display, Error, From};
use std::sync::Mutex;

use crate::value::Value;

/// An error raised by a resolver, or produced while completing one field's
/// value.
///
/// Mirrors `juniper::executor::FieldError`: a message plus an optional
/// machine-readable `extensions` payload. Caught by the field executor
/// (§4.5), appended to the request's error sink, and replaced in the result
/// tree with `null` — never propagated as a Rust `Err` past the field
/// boundary.
#[derive(Clone, Debug, PartialEq, Display)]
#[display("{message}")]
pub struct FieldError {
    message: String,
    extensions: Value,
}

impl FieldError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            extensions: Value::Null,
        }
    }

    pub fn with_extensions(message: impl Into<String>, extensions: Value) -> Self {
        Self {
            message: message.into(),
            extensions,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn extensions(&self) -> &Value {
        &self.extensions
    }
}

impl std::error::Error for FieldError {}

impl From<&str> for FieldError {
    fn from(e: &str) -> Self {
        Self::new(e)
    }
}

impl From<String> for FieldError {
    fn from(e: String) -> Self {
        Self::new(e)
    }
}

/// A resolver-raised error, possibly an aggregate of several independent
/// causes.
///
/// §4.5: "An aggregated multi-error is unpacked into its individual causes;
/// each is appended to the request error sink." The reference behaviour
/// only guarantees one level of unpacking; this crate resolves that open
/// question (SPEC_FULL.md §C.3) by flattening recursively, since a resolver
/// that aggregates aggregates should still surface every leaf cause.
#[derive(Clone, Debug, PartialEq)]
pub enum ResolverError {
    Single(FieldError),
    Aggregate(Vec<ResolverError>),
}

impl ResolverError {
    pub fn single(err: FieldError) -> Self {
        Self::Single(err)
    }

    pub fn aggregate(errs: Vec<ResolverError>) -> Self {
        Self::Aggregate(errs)
    }

    /// Flattens this error into its leaf [`FieldError`]s, recursing through
    /// arbitrarily nested aggregates.
    pub fn flatten(self) -> Vec<FieldError> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into(self, out: &mut Vec<FieldError>) {
        match self {
            Self::Single(e) => out.push(e),
            Self::Aggregate(errs) => {
                for e in errs {
                    e.flatten_into(out);
                }
            }
        }
    }
}

impl From<FieldError> for ResolverError {
    fn from(e: FieldError) -> Self {
        Self::Single(e)
    }
}

/// Programmer errors: planner/executor mismatches, schema misuse, malformed
/// directive arguments. Per §7 these propagate as failures of the enclosing
/// async computation rather than being rescued — they indicate a bug in the
/// schema or the planner, not a client-triggerable condition.
#[derive(Clone, Debug, PartialEq, Display, Error)]
pub enum GraphQLError {
    #[display("field {field:?}: resolver is undefined")]
    UndefinedResolver {
        #[error(not(source))]
        field: String,
    },

    #[display("field {field:?}: expected plan kind {expected}, found {found}")]
    UnexpectedPlanKind {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    #[display("interface {interface:?} not implemented by type {concrete:?}")]
    InterfaceNotImplemented { interface: String, concrete: String },

    #[display("union {union_name:?} has no case for type {concrete:?}")]
    UnionCaseNotImplemented { union_name: String, concrete: String },

    #[display("no concrete type matched for abstract type {abstract_name:?}")]
    NoConcreteType {
        #[error(not(source))]
        abstract_name: String,
    },

    #[display("directive {directive:?}: `if` argument did not coerce to a boolean")]
    DirectiveArgumentType {
        #[error(not(source))]
        directive: String,
    },

    #[display("variable {name:?}: {message}")]
    VariableCoercion { name: String, message: String },

    #[display("argument {name:?}: {message}")]
    ArgumentCoercion { name: String, message: String },
}

/// Signal used internally by the completion engine (C6) to implement the
/// non-null propagation rule spec.md §9 leaves as an open question.
///
/// `Bubble` carries no payload: the originating [`FieldError`] has already
/// been pushed to the request's [`ErrorSink`] at the point of failure. It is
/// caught by the nearest [`crate::schema::TypeDef::Nullable`] ancestor,
/// which substitutes `null` there instead of at the field that actually
/// failed. `Structural` carries a [`GraphQLError`] and is never caught —
/// it is a programmer error per §7 category 2.
#[derive(Clone, Debug, From)]
pub enum CompletionError {
    Bubble,
    Structural(GraphQLError),
}

impl From<FieldError> for CompletionError {
    fn from(_: FieldError) -> Self {
        Self::Bubble
    }
}

/// Append-only, thread-safe collector for [`FieldError`]s raised while
/// executing a single request.
///
/// §5: "the error sink is the only per-request mutable resource touched by
/// multiple tasks; it is append-only and must be thread-safe." A `Mutex`
/// around a `Vec` is sufficient here — pushes are O(1) and never contend
/// long enough to warrant a lock-free structure.
#[derive(Debug, Default)]
pub struct ErrorSink {
    errors: Mutex<Vec<FieldError>>,
}

impl ErrorSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, error: FieldError) {
        self.errors.lock().unwrap_or_else(|e| e.into_inner()).push(error);
    }

    pub fn push_all(&self, errors: impl IntoIterator<Item = FieldError>) {
        let mut guard = self.errors.lock().unwrap_or_else(|e| e.into_inner());
        guard.extend(errors);
    }

    pub fn into_vec(self) -> Vec<FieldError> {
        self.errors.into_inner().unwrap_or_else(|e| e.into_inner())
    }

    /// Takes every error collected so far, leaving the sink empty. Used by
    /// [`crate::execution::evaluate`] to read out the final error list
    /// without needing unique ownership of the surrounding `Arc`.
    pub fn drain(&self) -> Vec<FieldError> {
        std::mem::take(&mut self.errors.lock().unwrap_or_else(|e| e.into_inner()))
    }

    pub fn is_empty(&self) -> bool {
        self.errors.lock().unwrap_or_else(|e| e.into_inner()).is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

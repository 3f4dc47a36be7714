//! A GraphQL query execution core: type-directed completion, variable and
//! argument coercion, abstract-type resolution, and the concurrent
//! executor that walks a pre-built plan.
//!
//! This crate does not parse or validate GraphQL documents — it consumes
//! an already-built [`execution::ExecutionPlan`] and a [`schema::Schema`]
//! and produces a [`value::Value`] response tree plus a list of
//! [`error::FieldError`]s, the way a planner/validator upstream of this
//! core would call it.

pub mod abstract_type;
pub mod ast;
pub mod async_value;
pub mod coercion;
pub mod directives;
pub mod error;
pub mod execution;
pub mod schema;
pub mod value;

pub use crate::error::{CompletionError, ErrorSink, FieldError, GraphQLError, ResolverError};
pub use crate::execution::{evaluate, ExecutionContext, ExecutionInfo, ExecutionPlan, ResolveFieldContext};
pub use crate::schema::{compile::compile_schema, Schema, TypeDef};
pub use crate::value::{ResultMap, ScalarValue, Value};

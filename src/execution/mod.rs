//! Components C5-C7: compiling fields into executors, completing resolver
//! output, and walking the plan.

mod completion;
mod context;
mod executor;
mod field;
mod plan;

pub use completion::complete_value;
pub use context::{ExecutionContext, ResolveFieldContext};
pub use executor::{evaluate, execute_fields, execute_plan};
pub use field::compile_field;
pub use plan::{ExecutionInfo, ExecutionPlan, Kind, Strategy};

use std::sync::Arc;

use fnv::FnvHashMap;
use futures::future::BoxFuture;

use crate::ast::InputValue;
use crate::error::{CompletionError, GraphQLError};
use crate::value::Value;

/// A field's compiled executor (§4.5/§4.7): given a fresh per-field
/// context and the parent value, produces the field's completed value.
///
/// The error side carries [`CompletionError`] rather than a plain
/// [`GraphQLError`]: a field whose non-nullable return type could not be
/// completed signals `Bubble` so the enclosing object can null itself out
/// instead of the field alone (SPEC_FULL.md §C.4), while a genuine
/// programmer error still propagates as `Structural` and is never rescued.
pub type FieldExecutor =
    Arc<dyn Fn(ResolveFieldContext, Value) -> BoxFuture<'static, Result<Value, CompletionError>> + Send + Sync>;

/// An input field's compiled coercer (§4.2/§4.7): purely synchronous, per
/// §5 ("There are no suspension points inside C1, C2, C3, or C4").
pub type InputExecutor =
    Arc<dyn Fn(&FnvHashMap<String, Value>, &InputValue) -> Result<Value, GraphQLError> + Send + Sync>;

//! Per-request (`ExecutionContext`) and per-field (`ResolveFieldContext`)
//! state (§3).

use std::sync::Arc;

use fnv::FnvHashMap;

use crate::error::{ErrorSink, FieldError};
use crate::execution::plan::{ExecutionInfo, ExecutionPlan};
use crate::schema::{ObjectTypeDef, Schema, TypeDef};
use crate::value::Value;

/// Per-request state. Lives only for the duration of one `evaluate` call
/// and is shared (via `Arc`) across every field task that call spawns.
pub struct ExecutionContext {
    pub schema: Arc<Schema>,
    /// The query/mutation/subscription root object type the top-level plan
    /// selects against — chosen by the caller of [`crate::execution::evaluate`]
    /// from the incoming operation kind, which this core does not itself
    /// determine (operation parsing is out of scope, spec.md §1).
    pub root_type: Arc<ObjectTypeDef>,
    pub plan: Arc<ExecutionPlan>,
    pub root_value: Value,
    pub variables: FnvHashMap<String, Value>,
    pub errors: Arc<ErrorSink>,
}

/// Per-field state, built fresh for every field a plan visits (§3: "Created
/// fresh for each field; cheap").
#[derive(Clone)]
pub struct ResolveFieldContext {
    pub info: Arc<ExecutionInfo>,
    pub request: Arc<ExecutionContext>,
    pub return_type: Arc<TypeDef>,
    pub parent_type: Arc<ObjectTypeDef>,
    pub args: Arc<FnvHashMap<String, Value>>,
}

impl ResolveFieldContext {
    pub fn schema(&self) -> &Schema {
        &self.request.schema
    }

    pub fn variables(&self) -> &FnvHashMap<String, Value> {
        &self.request.variables
    }

    pub fn arg(&self, name: &str) -> Option<&Value> {
        self.args.get(name)
    }

    /// Appends a field error to the request's sink without failing the
    /// field — the caller (C5) still substitutes `null` for the value.
    pub fn add_error(&self, error: FieldError) {
        self.request.errors.push(error);
    }

    pub fn concrete_type_name(&self) -> &str {
        self.parent_type.name.as_str()
    }
}

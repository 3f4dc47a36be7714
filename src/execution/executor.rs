//! Component C7: walking an [`ExecutionPlan`] — `evaluate`, the top-level
//! strategy switch, and `execute_fields`, the shared per-object-selection
//! walker nested completion (C6) recurses back into.
//!
//! Grounded on the teacher's `execute_validated_query_async` /
//! `resolve_selection_set_into_async_recursive` pair
//! (`juniper/src/execution/mod.rs`, `juniper/src/types/async_await.rs`):
//! one entry point that sets up per-request state, and one recursive
//! selection-set walker both the root and every nested object position
//! share.

use std::sync::Arc;

use fnv::FnvHashMap;
use futures::future::BoxFuture;
use futures::FutureExt;

use crate::coercion::get_argument_values;
use crate::error::{CompletionError, ErrorSink, FieldError, GraphQLError};
use crate::execution::context::{ExecutionContext, ResolveFieldContext};
use crate::execution::plan::{ExecutionInfo, ExecutionPlan, Strategy};
use crate::async_value::{collect_parallel, collect_sequential, AsyncValue};
use crate::schema::{ObjectTypeDef, Schema};
use crate::value::{ResultMap, Value};

/// Runs a whole request: builds the per-request [`ExecutionContext`], walks
/// the plan per its top-level [`Strategy`], and drains the error sink.
///
/// `root_type` is the query/mutation/subscription object type the plan's
/// top-level fields select against; choosing it from the incoming
/// operation is the caller's job (§1: operation parsing is out of scope).
pub async fn evaluate(
    schema: Arc<Schema>,
    root_type: Arc<ObjectTypeDef>,
    plan: Arc<ExecutionPlan>,
    root_value: Value,
    variables: FnvHashMap<String, Value>,
) -> (Value, Vec<FieldError>) {
    let request = Arc::new(ExecutionContext {
        schema,
        root_type,
        plan,
        root_value,
        variables,
        errors: Arc::new(ErrorSink::new()),
    });
    let errors = Arc::clone(&request.errors);
    let data = execute_plan(request).await;
    (data, errors.drain())
}

/// Walks the root selection set, honouring the plan's top-level
/// [`Strategy`] (§4.6): `Parallel` for queries/subscriptions, `Sequential`
/// for mutations so their side effects are observably ordered.
pub async fn execute_plan(request: Arc<ExecutionContext>) -> Value {
    let object_type = Arc::clone(&request.root_type);
    let parent_value = request.root_value.clone();
    let fields = request.plan.fields.clone();

    let result = match request.plan.strategy {
        Strategy::Parallel => {
            let pending = fields
                .into_iter()
                .map(|info| {
                    AsyncValue::Pending(resolve_one_field(
                        Arc::clone(&request),
                        Arc::clone(&object_type),
                        parent_value.clone(),
                        info,
                    ))
                })
                .collect();
            assemble(collect_parallel(pending).await)
        }
        Strategy::Sequential => {
            let thunks = fields
                .into_iter()
                .map(|info| {
                    let request = Arc::clone(&request);
                    let object_type = Arc::clone(&object_type);
                    let parent_value = parent_value.clone();
                    Box::new(move || {
                        AsyncValue::Pending(resolve_one_field(request, object_type, parent_value, info))
                    }) as Box<dyn FnOnce() -> AsyncValue<FieldSlot> + Send>
                })
                .collect();
            assemble(collect_sequential(thunks).await)
        }
    };

    match result {
        Ok(value) => value,
        Err(CompletionError::Bubble) => Value::Null,
        Err(CompletionError::Structural(e)) => {
            request.errors.push(FieldError::new(e.to_string()));
            Value::Null
        }
    }
}

/// Executes every field of one object selection concurrently and assembles
/// the result map (§4.5 Object row, §5: "field tasks within a single
/// `executeFields`... run concurrently"). Called both for the root plan's
/// `Parallel` strategy and, via [`crate::execution::completion::complete_value`],
/// for every nested object/interface/union position — nested selections
/// are always `Parallel` regardless of the root's top-level strategy.
pub fn execute_fields(
    request: Arc<ExecutionContext>,
    object_type: Arc<ObjectTypeDef>,
    parent_value: Value,
    subfields: &[Arc<ExecutionInfo>],
) -> BoxFuture<'static, Result<Value, CompletionError>> {
    let subfields = subfields.to_vec();
    async move {
        let pending = subfields
            .into_iter()
            .map(|info| {
                AsyncValue::Pending(resolve_one_field(
                    Arc::clone(&request),
                    Arc::clone(&object_type),
                    parent_value.clone(),
                    info,
                ))
            })
            .collect();
        assemble(collect_parallel(pending).await)
    }
    .boxed()
}

/// One field's resolved slot: `None` when `@skip`/`@include` excluded it
/// from the selection entirely (§4.3 — an excluded field is absent from the
/// response, not null); `Some((key, result))` otherwise.
type FieldSlot = Option<(String, Result<Value, CompletionError>)>;

fn resolve_one_field(
    request: Arc<ExecutionContext>,
    object_type: Arc<ObjectTypeDef>,
    parent_value: Value,
    info: Arc<ExecutionInfo>,
) -> BoxFuture<'static, FieldSlot> {
    async move {
        if !info.is_included(&request.variables) {
            return None;
        }
        let identifier = info.identifier.clone();
        let result = resolve_field_value(request, object_type, parent_value, info).await;
        Some((identifier, result))
    }
    .boxed()
}

async fn resolve_field_value(
    request: Arc<ExecutionContext>,
    object_type: Arc<ObjectTypeDef>,
    parent_value: Value,
    info: Arc<ExecutionInfo>,
) -> Result<Value, CompletionError> {
    let args = get_argument_values(&info.definition.args, &info.ast.arguments, &request.variables)
        .map_err(CompletionError::Structural)?;
    let executor = info.definition.execute().cloned().ok_or_else(|| {
        CompletionError::Structural(GraphQLError::UndefinedResolver {
            field: info.identifier.clone(),
        })
    })?;
    let ctx = ResolveFieldContext {
        return_type: Arc::clone(&info.definition.output_type),
        info: Arc::clone(&info),
        request,
        parent_type: object_type,
        args: Arc::new(args),
    };
    executor(ctx, parent_value).await
}

fn assemble(results: Vec<FieldSlot>) -> Result<Value, CompletionError> {
    let mut pairs = Vec::with_capacity(results.len());
    for slot in results {
        match slot {
            None => {}
            Some((key, Ok(value))) => pairs.push((key, value)),
            Some((_, Err(CompletionError::Bubble))) => return Err(CompletionError::Bubble),
            Some((_, Err(structural))) => return Err(structural),
        }
    }
    Ok(Value::Object(ResultMap::from_pairs(pairs)))
}

//! Component C5: compiling a schema field into its [`FieldExecutor`].
//!
//! Grounded on how the teacher turns a `GraphQLType::resolve_field` call
//! into a boxed future it can drive alongside its siblings
//! (`juniper/src/types/async_await.rs`) — here the indirection is a plain
//! closure stored once in [`crate::schema::FieldDef::execute`] rather than a
//! trait method looked up per call, per the one-shot compile-pass design of
//! spec.md §4.7/§9.

use std::sync::Arc;

use futures::FutureExt;

use crate::error::{CompletionError, GraphQLError};
use crate::execution::completion::complete_value;
use crate::execution::context::ResolveFieldContext;
use crate::execution::FieldExecutor;
use crate::schema::{FieldDef, Resolve, TypeDef};
use crate::value::Value;

/// Compiles `field_def`'s [`Resolve`] strategy into a reusable
/// [`FieldExecutor`], closing over the field definition so every
/// invocation sees its current resolver and output type.
pub fn compile_field(field_def: Arc<FieldDef>) -> FieldExecutor {
    Arc::new(move |ctx: ResolveFieldContext, parent_value: Value| {
        let field_def = Arc::clone(&field_def);
        async move {
            let raw = match &field_def.resolve {
                Resolve::Typename => Ok(Some(Value::scalar(ctx.concrete_type_name().to_string()))),
                Resolve::Sync(resolve) => resolve(&ctx, &parent_value),
                Resolve::Async(resolve) => resolve(ctx.clone(), parent_value.clone()).await,
                Resolve::Undefined => {
                    return Err(CompletionError::Structural(GraphQLError::UndefinedResolver {
                        field: ctx.info.identifier.clone(),
                    }))
                }
            };

            match raw {
                Ok(value) => {
                    complete_value(
                        Arc::clone(&ctx.request),
                        Arc::clone(&ctx.info),
                        Arc::clone(&ctx.return_type),
                        value.unwrap_or(Value::Null),
                    )
                    .await
                }
                // A thrown resolver is handled exactly like a null value
                // reaching this field's own return type (§4.5): caught
                // locally if that type is `Nullable`, else bubbled to the
                // nearest nullable ancestor. Each cause is pushed to the
                // sink first; `bubble_null` is not reused here so the
                // thrown error's own message is the only one recorded.
                Err(resolver_error) => {
                    for err in resolver_error.flatten() {
                        ctx.add_error(err);
                    }
                    if matches!(ctx.return_type.as_ref(), TypeDef::Nullable(_)) {
                        Ok(Value::Null)
                    } else {
                        Err(CompletionError::Bubble)
                    }
                }
            }
        }
        .boxed()
    })
}

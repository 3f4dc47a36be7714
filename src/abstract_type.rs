//! Component C4: resolving a runtime value to a concrete object type at an
//! interface or union position.

use std::sync::Arc;

use crate::error::GraphQLError;
use crate::schema::{InterfaceTypeDef, ObjectTypeDef, Schema, UnionTypeDef};
use crate::value::Value;

/// Resolves the concrete object type backing `value` at an interface
/// position.
///
/// §4.4: an explicit `resolve_type` wins if the interface declares one;
/// otherwise the default resolver finds the unique possible type whose
/// `is_type_of` matches.
pub fn resolve_interface_type(
    schema: &Schema,
    iface: &InterfaceTypeDef,
    value: &Value,
) -> Result<Arc<ObjectTypeDef>, GraphQLError> {
    if let Some(resolve_type) = &iface.resolve_type {
        return resolve_type(value).ok_or_else(|| GraphQLError::NoConcreteType {
            abstract_name: iface.name.clone(),
        });
    }
    default_resolve(schema, &iface.name, possible_types(schema, &iface.possible_types, &iface.name), value)
}

/// Resolves the concrete object type backing `value` at a union position.
///
/// §4.4: for a union, the value is first unwrapped via `resolve_value`
/// before `is_type_of` is consulted.
pub fn resolve_union_type(
    schema: &Schema,
    union_def: &UnionTypeDef,
    value: &Value,
) -> Result<(Arc<ObjectTypeDef>, Value), GraphQLError> {
    let unwrapped = (union_def.resolve_value)(value.clone());
    if let Some(resolve_type) = &union_def.resolve_type {
        let concrete = resolve_type(&unwrapped).ok_or_else(|| GraphQLError::NoConcreteType {
            abstract_name: union_def.name.clone(),
        })?;
        return Ok((concrete, unwrapped));
    }
    let concrete = default_resolve(
        schema,
        &union_def.name,
        possible_types(schema, &union_def.possible_types, &union_def.name),
        &unwrapped,
    )?;
    Ok((concrete, unwrapped))
}

fn possible_types(
    schema: &Schema,
    cache: &std::sync::OnceLock<Vec<Arc<ObjectTypeDef>>>,
    abstract_name: &str,
) -> Vec<Arc<ObjectTypeDef>> {
    cache.get_or_init(|| schema.possible_types(abstract_name)).clone()
}

/// The default abstract-type resolver (§4.4 step 2): the unique possible
/// type whose `is_type_of` returns true for `value`. A schema where more
/// than one implementer matches is a schema bug; per §4.4 "the first match
/// wins".
fn default_resolve(
    _schema: &Schema,
    abstract_name: &str,
    candidates: Vec<Arc<ObjectTypeDef>>,
    value: &Value,
) -> Result<Arc<ObjectTypeDef>, GraphQLError> {
    candidates
        .into_iter()
        .find(|candidate| candidate.is_type_of.as_ref().is_some_and(|f| f(value)))
        .ok_or_else(|| GraphQLError::NoConcreteType {
            abstract_name: abstract_name.to_string(),
        })
}

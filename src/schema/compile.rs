//! Component C8: the one-shot compile pass (§4.7, §9).
//!
//! Fills every [`super::FieldDef::execute`], [`super::InputFieldDef::execute_input`]
//! and abstract-type `possible_types` slot exactly once, before the schema
//! is shared with any request. Mirrors how the teacher's codegen assembles
//! a `meta()` once per `GraphQLType` registration
//! (`juniper_codegen`'s derive output) rather than re-deriving field
//! metadata per call — here the "codegen" is this single pass over
//! already-built [`super::TypeDef`] data instead of a proc-macro.

use std::sync::Arc;

use crate::coercion::compile_by_type;
use crate::execution::compile_field;
use crate::schema::{FieldDef, InputFieldDef, ObjectTypeDef, Schema, TypeDef};

/// Compiles every field and argument reachable from `schema`, and
/// precomputes the possible-types set of every interface and union.
///
/// Idempotent: slots already filled (an `OnceLock::set` on a type visited
/// twice, e.g. because it is both a root type and listed in `type_map`)
/// are silently left alone.
pub fn compile_schema(schema: &Schema) {
    compile_object(&schema.query);
    if let Some(mutation) = &schema.mutation {
        compile_object(mutation);
    }
    if let Some(subscription) = &schema.subscription {
        compile_object(subscription);
    }

    for type_def in schema.type_map.values() {
        match type_def {
            TypeDef::Object(obj) => compile_object(obj),
            TypeDef::Interface(iface) => {
                for field in &iface.fields {
                    compile_field_args(&iface.name, field);
                    field.set_execute(compile_field(Arc::clone(field)));
                }
                let _ = iface.possible_types.set(schema.possible_types(&iface.name));
            }
            TypeDef::Union(union_def) => {
                let members = union_def
                    .possible_type_names
                    .iter()
                    .filter_map(|name| match schema.type_map.get(name) {
                        Some(TypeDef::Object(obj)) => Some(Arc::clone(obj)),
                        _ => None,
                    })
                    .collect();
                let _ = union_def.possible_types.set(members);
            }
            TypeDef::InputObject(obj) => compile_input_fields(&obj.name, &obj.fields),
            TypeDef::Scalar(_) | TypeDef::Enum(_) | TypeDef::List(_) | TypeDef::Nullable(_) => {}
        }
    }
}

fn compile_object(obj: &Arc<ObjectTypeDef>) {
    for field in &obj.fields {
        compile_field_args(&obj.name, field);
        field.set_execute(compile_field(Arc::clone(field)));
    }
}

fn compile_field_args(owner_name: &str, field: &Arc<FieldDef>) {
    for arg in &field.args {
        let prefix = format!("Object '{owner_name}': field '{}': argument '{}': ", field.name, arg.name);
        arg.set_execute_input(compile_by_type(Arc::clone(&arg.input_type), prefix));
    }
}

fn compile_input_fields(owner_name: &str, fields: &[InputFieldDef]) {
    for field in fields {
        let prefix = format!("Input object '{owner_name}': in field '{}': ", field.name);
        field.set_execute_input(compile_by_type(Arc::clone(&field.input_type), prefix));
    }
}

//! The schema data model (§3) plus the compiled executor/coercer slots §4.7
//! fills in.

pub mod compile;

use std::sync::{Arc, OnceLock};

use fnv::FnvHashMap;

use crate::ast::InputValue;
use crate::error::{GraphQLError, ResolverError};
use crate::execution::{FieldExecutor, InputExecutor, ResolveFieldContext};
use crate::value::Value;

/// A schema type, in the shape §3 describes: scalars, enums, and the
/// structural kinds (object/interface/union/input-object/list/nullable).
#[derive(Clone)]
pub enum TypeDef {
    Scalar(Arc<ScalarTypeDef>),
    Enum(Arc<EnumTypeDef>),
    Object(Arc<ObjectTypeDef>),
    Interface(Arc<InterfaceTypeDef>),
    Union(Arc<UnionTypeDef>),
    InputObject(Arc<InputObjectTypeDef>),
    List(Arc<TypeDef>),
    Nullable(Arc<TypeDef>),
}

impl TypeDef {
    pub fn name(&self) -> &str {
        match self {
            Self::Scalar(t) => &t.name,
            Self::Enum(t) => &t.name,
            Self::Object(t) => &t.name,
            Self::Interface(t) => &t.name,
            Self::Union(t) => &t.name,
            Self::InputObject(t) => &t.name,
            Self::List(inner) | Self::Nullable(inner) => inner.name(),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "Scalar",
            Self::Enum(_) => "Enum",
            Self::Object(_) => "Object",
            Self::Interface(_) => "Interface",
            Self::Union(_) => "Union",
            Self::InputObject(_) => "InputObject",
            Self::List(_) => "List",
            Self::Nullable(_) => "Nullable",
        }
    }
}

/// A scalar type. `coerce_value` is the completion-time `CoerceValue` hook
/// (§4.5, output direction); `parse_input` is the input-coercion hook §4.2
/// and §6's `compileByType` ultimately bottom out in (input direction).
pub struct ScalarTypeDef {
    pub name: String,
    pub coerce_value: Arc<dyn Fn(&Value) -> Option<Value> + Send + Sync>,
    pub parse_input: Arc<dyn Fn(&InputValue) -> Option<Value> + Send + Sync>,
}

/// An enum type. `coerce_value` turns a raw resolver value into the enum's
/// string representation, or fails (§4.5 table: "null if coercion fails").
/// `parse_input` accepts an enum literal (or a matching string) and turns it
/// into a host value.
pub struct EnumTypeDef {
    pub name: String,
    pub values: Vec<String>,
    pub coerce_value: Arc<dyn Fn(&Value) -> Option<String> + Send + Sync>,
    pub parse_input: Arc<dyn Fn(&InputValue) -> Option<Value> + Send + Sync>,
}

/// One field of an object or interface type.
pub struct FieldDef {
    pub name: String,
    pub output_type: Arc<TypeDef>,
    pub args: Vec<InputFieldDef>,
    pub resolve: Resolve,
    execute: OnceLock<FieldExecutor>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, output_type: Arc<TypeDef>, args: Vec<InputFieldDef>, resolve: Resolve) -> Self {
        Self {
            name: name.into(),
            output_type,
            args,
            resolve,
            execute: OnceLock::new(),
        }
    }

    /// Filled exactly once by the compile pass (§4.7). Invariant (§3):
    /// "Every field definition in a schema object has `Execute` set before
    /// any request runs."
    pub fn set_execute(&self, executor: FieldExecutor) {
        let _ = self.execute.set(executor);
    }

    pub fn execute(&self) -> Option<&FieldExecutor> {
        self.execute.get()
    }
}

/// How a field's value is produced.
///
/// `Sync`/`Async` resolvers return `Ok(None)` for an explicit business-level
/// null and `Err(ResolverError)` when the resolver itself raised (§4.5: "a
/// thrown exception is caught... and may itself be an aggregate"). Neither
/// channel is conflated with the *absence* of a resolver, which is
/// `Undefined` and always a programmer error.
pub enum Resolve {
    Sync(Arc<dyn Fn(&ResolveFieldContext, &Value) -> Result<Option<Value>, ResolverError> + Send + Sync>),
    Async(
        Arc<
            dyn Fn(ResolveFieldContext, Value) -> futures::future::BoxFuture<'static, Result<Option<Value>, ResolverError>>
                + Send
                + Sync,
        >,
    ),
    /// The typename meta-field (SPEC_FULL.md §C.2): resolved directly from
    /// the concrete object type name, bypassing user resolution entirely.
    Typename,
    Undefined,
}

/// One argument or input-object field definition.
pub struct InputFieldDef {
    pub name: String,
    pub input_type: Arc<TypeDef>,
    pub default_value: Option<InputValue>,
    execute_input: OnceLock<InputExecutor>,
}

impl InputFieldDef {
    pub fn new(name: impl Into<String>, input_type: Arc<TypeDef>, default_value: Option<InputValue>) -> Self {
        Self {
            name: name.into(),
            input_type,
            default_value,
            execute_input: OnceLock::new(),
        }
    }

    /// Filled exactly once by the compile pass (§4.7). Invariant (§3):
    /// "Every input field has `ExecuteInput` set before any request runs."
    pub fn set_execute_input(&self, executor: InputExecutor) {
        let _ = self.execute_input.set(executor);
    }

    pub fn execute_input(&self) -> Option<&InputExecutor> {
        self.execute_input.get()
    }
}

/// An object type: name plus an ordered field mapping.
pub struct ObjectTypeDef {
    pub name: String,
    pub fields: Vec<Arc<FieldDef>>,
    pub interfaces: Vec<String>,
    pub is_type_of: Option<Arc<dyn Fn(&Value) -> bool + Send + Sync>>,
}

impl std::fmt::Debug for ObjectTypeDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectTypeDef")
            .field("name", &self.name)
            .field(
                "fields",
                &self.fields.iter().map(|f| &f.name).collect::<Vec<_>>(),
            )
            .field("interfaces", &self.interfaces)
            .field("is_type_of", &self.is_type_of.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl ObjectTypeDef {
    pub fn field(&self, name: &str) -> Option<&Arc<FieldDef>> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// An interface type. `resolve_type`, when present, is the schema author's
/// explicit abstract-type resolver (§4.4 step 1); `possible_types` is
/// filled in by the compile pass for the default resolver's use (§4.4 step
/// 2, and the caching note in §9).
pub struct InterfaceTypeDef {
    pub name: String,
    pub fields: Vec<Arc<FieldDef>>,
    pub resolve_type: Option<Arc<dyn Fn(&Value) -> Option<Arc<ObjectTypeDef>> + Send + Sync>>,
    pub possible_types: OnceLock<Vec<Arc<ObjectTypeDef>>>,
}

/// A union type: no fields of its own, just a set of possible concrete
/// object types plus an optional `resolve_value` unwrap hook (§3: "allows
/// unwrapping a tagged host value before object-field resolution").
pub struct UnionTypeDef {
    pub name: String,
    pub possible_type_names: Vec<String>,
    pub resolve_type: Option<Arc<dyn Fn(&Value) -> Option<Arc<ObjectTypeDef>> + Send + Sync>>,
    pub resolve_value: Arc<dyn Fn(Value) -> Value + Send + Sync>,
    pub possible_types: OnceLock<Vec<Arc<ObjectTypeDef>>>,
}

pub struct InputObjectTypeDef {
    pub name: String,
    pub fields: Vec<InputFieldDef>,
}

impl InputObjectTypeDef {
    pub fn field(&self, name: &str) -> Option<&InputFieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// The root schema: query/mutation/subscription root types plus the full
/// type map used for abstract-type possible-types lookups.
///
/// Built once, compiled once via [`compile::compile_schema`], then shared
/// immutably by every request (§3 Lifecycles).
pub struct Schema {
    pub query: Arc<ObjectTypeDef>,
    pub mutation: Option<Arc<ObjectTypeDef>>,
    pub subscription: Option<Arc<ObjectTypeDef>>,
    pub type_map: FnvHashMap<String, TypeDef>,
}

impl Schema {
    /// Object types in `type_map` that implement the named interface, or
    /// that the named union lists as a possible type.
    pub fn possible_types(&self, abstract_name: &str) -> Vec<Arc<ObjectTypeDef>> {
        self.type_map
            .values()
            .filter_map(|t| match t {
                TypeDef::Object(obj) if obj.interfaces.iter().any(|i| i == abstract_name) => {
                    Some(Arc::clone(obj))
                }
                _ => None,
            })
            .collect()
    }
}

/// Error raised by coercion collaborators (§4.2, §6). Kept distinct from
/// [`GraphQLError`] only by name — it converts into one at the call sites
/// that need to propagate it as a structural failure.
pub type CoercionError = GraphQLError;

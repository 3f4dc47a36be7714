//! The pre-built plan this core consumes (§3): `ExecutionPlan` and its
//! per-selection `ExecutionInfo` nodes.

use std::collections::HashMap;
use std::sync::Arc;

use fnv::FnvHashMap;

use crate::ast::FieldAst;
use crate::schema::FieldDef;
use crate::value::Value;

/// Top-level execution discipline. Queries and subscriptions use
/// `Parallel`; mutations use `Sequential` to preserve observable ordering
/// of their side effects (§3, §4.6).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    Parallel,
    Sequential,
}

/// What shape of value a plan node expects to complete (§3).
pub enum Kind {
    /// An object sub-selection: for each child, complete `output_type`'s
    /// field and assemble a [`crate::value::ResultMap`].
    SelectFields(Vec<Arc<ExecutionInfo>>),
    /// A list element's plan — reused across every element the resolver
    /// returns.
    ResolveCollection(Arc<ExecutionInfo>),
    /// Per-concrete-type sub-selections for an interface or union position,
    /// keyed by the implementing object type's name.
    ResolveAbstraction(HashMap<String, Vec<Arc<ExecutionInfo>>>),
    /// A scalar or enum leaf — nothing further to recurse into.
    ResolveValue,
}

impl Kind {
    pub fn describe(&self) -> &'static str {
        match self {
            Self::SelectFields(_) => "SelectFields",
            Self::ResolveCollection(_) => "ResolveCollection",
            Self::ResolveAbstraction(_) => "ResolveAbstraction",
            Self::ResolveValue => "ResolveValue",
        }
    }
}

/// One planning node, corresponding to a single response key.
pub struct ExecutionInfo {
    /// The response key — the field's alias if it has one, else its name.
    pub identifier: String,
    pub definition: Arc<FieldDef>,
    pub ast: FieldAst,
    /// Precomputed from `@skip`/`@include` by the planner (§4.3): a pure
    /// function of the request's coerced variables.
    pub include: Arc<dyn Fn(&FnvHashMap<String, Value>) -> bool + Send + Sync>,
    pub kind: Kind,
}

impl ExecutionInfo {
    pub fn is_included(&self, variables: &FnvHashMap<String, Value>) -> bool {
        (self.include)(variables)
    }
}

/// The root plan handed to [`crate::execution::evaluate`].
pub struct ExecutionPlan {
    pub fields: Vec<Arc<ExecutionInfo>>,
    pub strategy: Strategy,
}

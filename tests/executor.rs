//! End-to-end scenarios from spec.md §8, driven through the public API:
//! build a tiny schema and plan by hand (the role an external planner
//! would normally fill), compile it, and check `evaluate`'s output.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use fnv::FnvHashMap;

use graphql_exec::ast::FieldAst;
use graphql_exec::error::{FieldError, ResolverError};
use graphql_exec::execution::{evaluate, ExecutionInfo, ExecutionPlan, Kind, Strategy};
use graphql_exec::schema::{FieldDef, InterfaceTypeDef, ObjectTypeDef, Resolve, ScalarTypeDef, Schema};
use graphql_exec::{compile_schema, ResultMap, ScalarValue, TypeDef, Value};

fn non_null_scalar(name: &str, expect: fn(&ScalarValue) -> bool) -> Arc<TypeDef> {
    let name = name.to_string();
    Arc::new(TypeDef::Scalar(Arc::new(ScalarTypeDef {
        name,
        coerce_value: Arc::new(move |v| match v {
            Value::Scalar(s) if expect(s) => Some(v.clone()),
            _ => None,
        }),
        parse_input: Arc::new(|_| None),
    })))
}

fn int_type() -> Arc<TypeDef> {
    non_null_scalar("Int", |s| matches!(s, ScalarValue::Int(_)))
}

fn string_type() -> Arc<TypeDef> {
    non_null_scalar("String", |s| matches!(s, ScalarValue::String(_)))
}

fn nullable(inner: Arc<TypeDef>) -> Arc<TypeDef> {
    Arc::new(TypeDef::Nullable(inner))
}

fn read_key(key: &'static str) -> Resolve {
    Resolve::Sync(Arc::new(move |_ctx, parent| {
        Ok(match parent {
            Value::Object(map) => map.get(key).ok().cloned(),
            _ => None,
        })
    }))
}

fn leaf(identifier: &str, definition: Arc<FieldDef>) -> Arc<ExecutionInfo> {
    Arc::new(ExecutionInfo {
        identifier: identifier.to_string(),
        definition,
        ast: FieldAst::default(),
        include: Arc::new(|_| true),
        kind: Kind::ResolveValue,
    })
}

fn query_schema(fields: Vec<Arc<FieldDef>>) -> (Arc<Schema>, Arc<ObjectTypeDef>) {
    let query = Arc::new(ObjectTypeDef {
        name: "Query".to_string(),
        fields,
        interfaces: vec![],
        is_type_of: None,
    });
    let schema = Schema {
        query: Arc::clone(&query),
        mutation: None,
        subscription: None,
        type_map: FnvHashMap::default(),
    };
    compile_schema(&schema);
    (Arc::new(schema), query)
}

async fn run(schema: Arc<Schema>, root_type: Arc<ObjectTypeDef>, plan: ExecutionPlan, root_value: Value) -> (Value, Vec<FieldError>) {
    evaluate(schema, root_type, Arc::new(plan), root_value, FnvHashMap::default()).await
}

#[tokio::test]
async fn scalar_field_round_trips() {
    let hello = Arc::new(FieldDef::new("hello", string_type(), vec![], read_key("hello")));
    let (schema, query) = query_schema(vec![Arc::clone(&hello)]);
    let plan = ExecutionPlan {
        fields: vec![leaf("hello", hello)],
        strategy: Strategy::Parallel,
    };
    let root = Value::Object(ResultMap::from_pairs(vec![("hello", Value::scalar("world".to_string()))]));
    let (data, errors) = run(schema, query, plan, root).await;
    assert!(errors.is_empty());
    assert_eq!(data, Value::Object(ResultMap::from_pairs(vec![("hello", Value::scalar("world".to_string()))])));
}

#[tokio::test]
async fn key_order_matches_plan_order_regardless_of_completion_timing() {
    // Each element is an object with one async field; the delay is inversely
    // proportional to the element's own value, so the fastest future to
    // finish is the LAST one in plan order. The output must still read
    // [1, 2, 3] — order is a property of the plan, not of completion speed.
    let value_field = Arc::new(FieldDef::new(
        "value",
        int_type(),
        vec![],
        Resolve::Async(Arc::new(|_ctx, parent| {
            Box::pin(async move {
                let n = match &parent {
                    Value::Object(map) => map.get("value").ok().cloned(),
                    _ => None,
                };
                if let Some(Value::Scalar(ScalarValue::Int(v))) = n {
                    tokio::time::sleep(Duration::from_millis((4 - v) as u64 * 15)).await;
                }
                Ok(n)
            })
        })),
    ));
    let elem_info = Arc::new(ExecutionInfo {
        identifier: "value".to_string(),
        definition: Arc::clone(&value_field),
        ast: FieldAst::default(),
        include: Arc::new(|_| true),
        kind: Kind::ResolveValue,
    });
    let elem_type = Arc::new(TypeDef::Object(Arc::new(ObjectTypeDef {
        name: "Point".to_string(),
        fields: vec![Arc::clone(&value_field)],
        interfaces: vec![],
        is_type_of: None,
    })));

    let xs = Arc::new(FieldDef::new("xs", Arc::new(TypeDef::List(elem_type)), vec![], read_key("xs")));
    let (schema, query) = query_schema(vec![Arc::clone(&xs), Arc::clone(&value_field)]);

    let xs_info = Arc::new(ExecutionInfo {
        identifier: "xs".to_string(),
        definition: xs,
        ast: FieldAst::default(),
        include: Arc::new(|_| true),
        kind: Kind::ResolveCollection(elem_info),
    });
    let plan = ExecutionPlan {
        fields: vec![xs_info],
        strategy: Strategy::Parallel,
    };

    let point = |n: i32| Value::Object(ResultMap::from_pairs(vec![("value", Value::scalar(n))]));
    let root = Value::Object(ResultMap::from_pairs(vec![("xs", Value::List(vec![point(1), point(2), point(3)]))]));

    let (data, errors) = run(schema, query, plan, root).await;
    assert!(errors.is_empty());
    assert_eq!(
        data,
        Value::Object(ResultMap::from_pairs(vec![(
            "xs",
            Value::List(vec![point(1), point(2), point(3)])
        )]))
    );
}

#[tokio::test]
async fn sibling_failure_is_isolated() {
    let a = Arc::new(FieldDef::new(
        "a",
        nullable(string_type()),
        vec![],
        Resolve::Sync(Arc::new(|_ctx, _parent| {
            Err(ResolverError::single(FieldError::new("boom")))
        })),
    ));
    let b = Arc::new(FieldDef::new(
        "b",
        int_type(),
        vec![],
        Resolve::Sync(Arc::new(|_ctx, _parent| Ok(Some(Value::scalar(42_i32))))),
    ));
    let (schema, query) = query_schema(vec![Arc::clone(&a), Arc::clone(&b)]);
    let plan = ExecutionPlan {
        fields: vec![leaf("a", a), leaf("b", b)],
        strategy: Strategy::Parallel,
    };
    let (data, errors) = run(
        schema,
        query,
        plan,
        Value::Object(ResultMap::from_pairs(Vec::<(String, Value)>::new())),
    )
    .await;
    assert_eq!(
        data,
        Value::Object(ResultMap::from_pairs(vec![("a", Value::Null), ("b", Value::scalar(42_i32))]))
    );
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message().contains("boom"));
}

#[tokio::test]
async fn sequential_mutation_ordering_is_observed() {
    let counter = Arc::new(Mutex::new(0_i32));
    let make_inc = || {
        let counter = Arc::clone(&counter);
        Resolve::Async(Arc::new(move |_ctx, _parent| {
            let counter = Arc::clone(&counter);
            Box::pin(async move {
                tokio::time::sleep(Duration::from_millis(10)).await;
                let mut guard = counter.lock().unwrap();
                *guard += 1;
                Ok(Some(Value::scalar(*guard)))
            })
        }))
    };
    let inc1 = Arc::new(FieldDef::new("inc", int_type(), vec![], make_inc()));
    let inc2 = Arc::new(FieldDef::new("inc", int_type(), vec![], make_inc()));
    let (schema, mutation_type) = query_schema(vec![Arc::clone(&inc1), Arc::clone(&inc2)]);
    let plan = ExecutionPlan {
        fields: vec![leaf("inc1", inc1), leaf("inc2", inc2)],
        strategy: Strategy::Sequential,
    };
    let (data, errors) = run(
        schema,
        mutation_type,
        plan,
        Value::Object(ResultMap::from_pairs(Vec::<(String, Value)>::new())),
    )
    .await;
    assert!(errors.is_empty());
    assert_eq!(
        data,
        Value::Object(ResultMap::from_pairs(vec![("inc1", Value::scalar(1_i32)), ("inc2", Value::scalar(2_i32))]))
    );
    assert_eq!(*counter.lock().unwrap(), 2);
}

#[tokio::test]
async fn interface_dispatch_picks_matching_implementor() {
    let name_field = Arc::new(FieldDef::new("name", string_type(), vec![], read_key("name")));
    let title_field = Arc::new(FieldDef::new("title", string_type(), vec![], read_key("title")));

    let is_kind = |kind: &'static str| {
        Arc::new(move |v: &Value| match v {
            Value::Object(map) => matches!(map.get("kind"), Ok(Value::Scalar(ScalarValue::String(k))) if k == kind),
            _ => false,
        }) as Arc<dyn Fn(&Value) -> bool + Send + Sync>
    };
    let user_obj = Arc::new(ObjectTypeDef {
        name: "User".to_string(),
        fields: vec![Arc::clone(&name_field)],
        interfaces: vec!["Node".to_string()],
        is_type_of: Some(is_kind("User")),
    });
    let post_obj = Arc::new(ObjectTypeDef {
        name: "Post".to_string(),
        fields: vec![Arc::clone(&title_field)],
        interfaces: vec!["Node".to_string()],
        is_type_of: Some(is_kind("Post")),
    });
    let node_iface = Arc::new(InterfaceTypeDef {
        name: "Node".to_string(),
        fields: vec![],
        resolve_type: None,
        possible_types: std::sync::OnceLock::new(),
    });

    let node_field = Arc::new(FieldDef::new("node", Arc::new(TypeDef::Interface(Arc::clone(&node_iface))), vec![], read_key("node")));

    let query = Arc::new(ObjectTypeDef {
        name: "Query".to_string(),
        fields: vec![Arc::clone(&node_field)],
        interfaces: vec![],
        is_type_of: None,
    });
    let mut type_map = FnvHashMap::default();
    type_map.insert("User".to_string(), TypeDef::Object(Arc::clone(&user_obj)));
    type_map.insert("Post".to_string(), TypeDef::Object(Arc::clone(&post_obj)));
    type_map.insert("Node".to_string(), TypeDef::Interface(node_iface));
    let schema = Schema {
        query: Arc::clone(&query),
        mutation: None,
        subscription: None,
        type_map,
    };
    compile_schema(&schema);
    let schema = Arc::new(schema);

    let mut by_type = std::collections::HashMap::new();
    by_type.insert("User".to_string(), vec![leaf("name", name_field)]);
    by_type.insert("Post".to_string(), vec![leaf("title", title_field)]);
    let node_info = Arc::new(ExecutionInfo {
        identifier: "node".to_string(),
        definition: node_field,
        ast: FieldAst::default(),
        include: Arc::new(|_| true),
        kind: Kind::ResolveAbstraction(by_type),
    });
    let plan = ExecutionPlan {
        fields: vec![node_info],
        strategy: Strategy::Parallel,
    };

    let ada = Value::Object(ResultMap::from_pairs(vec![
        ("kind", Value::scalar("User".to_string())),
        ("name", Value::scalar("Ada".to_string())),
    ]));
    let root = Value::Object(ResultMap::from_pairs(vec![("node", ada)]));

    let (data, errors) = run(schema, query, plan, root).await;
    assert!(errors.is_empty());
    assert_eq!(
        data,
        Value::Object(ResultMap::from_pairs(vec![(
            "node",
            Value::Object(ResultMap::from_pairs(vec![("name", Value::scalar("Ada".to_string()))]))
        )]))
    );
}

#[tokio::test]
async fn skipped_field_is_absent_from_the_response() {
    let a = Arc::new(FieldDef::new("a", string_type(), vec![], read_key("a")));
    let b = Arc::new(FieldDef::new("b", string_type(), vec![], read_key("b")));
    let (schema, query) = query_schema(vec![Arc::clone(&a), Arc::clone(&b)]);

    let a_info = Arc::new(ExecutionInfo {
        identifier: "a".to_string(),
        definition: a,
        ast: FieldAst::default(),
        include: Arc::new(|vars: &FnvHashMap<String, Value>| {
            !matches!(vars.get("s"), Some(Value::Scalar(ScalarValue::Boolean(true))))
        }),
        kind: Kind::ResolveValue,
    });
    let b_info = leaf("b", b);
    let plan = ExecutionPlan {
        fields: vec![a_info, b_info],
        strategy: Strategy::Parallel,
    };

    let mut variables = FnvHashMap::default();
    variables.insert("s".to_string(), Value::Scalar(ScalarValue::Boolean(true)));
    let root = Value::Object(ResultMap::from_pairs(vec![
        ("a", Value::scalar("skip-me".to_string())),
        ("b", Value::scalar("kept".to_string())),
    ]));
    let (data, errors) = evaluate(schema, query, Arc::new(plan), root, variables).await;
    assert!(errors.is_empty());
    assert_eq!(data, Value::Object(ResultMap::from_pairs(vec![("b", Value::scalar("kept".to_string()))])));
}

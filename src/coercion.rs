//! Component C2: coercing variables and argument literals into host values.
//!
//! `coerce_value_for_type` is this crate's implementation of the
//! `compileByType` collaborator spec.md §6 describes as schema-level
//! machinery — here it is simply a recursive function over [`TypeDef`]
//! rather than a separately compiled object, since [`TypeDef`] is already
//! immutable, `Arc`-shared data once the schema is built.

use std::sync::Arc;

use fnv::FnvHashMap;

use crate::ast::InputValue;
use crate::error::GraphQLError;
use crate::execution::InputExecutor;
use crate::schema::TypeDef;
use crate::value::{ResultMap, Value};

/// An operation-level variable declaration (`$var: Type = default`).
pub struct VariableDefinition {
    pub name: String,
    pub var_type: Arc<TypeDef>,
    pub default_value: Option<InputValue>,
}

/// Coerces every declared variable against the caller-supplied raw values.
///
/// §4.2: "If no variables are supplied, only those variables with default
/// values are coerced (using an empty var map as context). Otherwise all
/// declared variables are coerced against the supplied vars."
pub fn coerce_variable_values(
    var_defs: &[VariableDefinition],
    raw_vars: Option<&FnvHashMap<String, InputValue>>,
) -> Result<FnvHashMap<String, Value>, GraphQLError> {
    let empty = FnvHashMap::default();
    let effective_raw = raw_vars.unwrap_or(&empty);
    let empty_coerced_vars: FnvHashMap<String, Value> = FnvHashMap::default();

    let mut out = FnvHashMap::default();
    for def in var_defs {
        if raw_vars.is_none() && def.default_value.is_none() {
            continue;
        }
        let literal = effective_raw
            .get(&def.name)
            .cloned()
            .or_else(|| def.default_value.clone())
            .unwrap_or(InputValue::Null);
        let coerced = coerce_value_for_type(&def.var_type, &empty_coerced_vars, &literal).map_err(|e| {
            GraphQLError::VariableCoercion {
                name: def.name.clone(),
                message: e.to_string(),
            }
        })?;
        out.insert(def.name.clone(), coerced);
    }
    Ok(out)
}

/// Computes a field's argument map (§4.2 `getArgumentValues`).
///
/// For each argument definition: an AST-supplied value wins unless it
/// coerces to `null`, in which case the default (if any) is used instead;
/// with no AST value, the default is used; with neither, the key is
/// omitted entirely.
pub fn get_argument_values(
    arg_defs: &[crate::schema::InputFieldDef],
    ast_args: &[(String, InputValue)],
    variables: &FnvHashMap<String, Value>,
) -> Result<FnvHashMap<String, Value>, GraphQLError> {
    let mut out = FnvHashMap::default();
    for arg_def in arg_defs {
        let ast_value = ast_args.iter().find(|(name, _)| name == &arg_def.name).map(|(_, v)| v);
        let default = arg_def
            .default_value
            .clone()
            .map(|literal| {
                let executor = arg_def.execute_input().ok_or_else(|| GraphQLError::ArgumentCoercion {
                    name: arg_def.name.clone(),
                    message: "argument has no compiled coercer".to_string(),
                })?;
                executor(variables, &literal)
            })
            .transpose()?;

        let value = match ast_value {
            Some(literal) => {
                let executor = arg_def.execute_input().ok_or_else(|| GraphQLError::ArgumentCoercion {
                    name: arg_def.name.clone(),
                    message: "argument has no compiled coercer".to_string(),
                })?;
                let coerced = executor(variables, literal)?;
                if coerced.is_null() {
                    default
                } else {
                    Some(coerced)
                }
            }
            None => default,
        };

        if let Some(value) = value {
            out.insert(arg_def.name.clone(), value);
        }
    }
    Ok(out)
}

/// Recursively coerces an AST literal (or variable reference) into a host
/// [`Value`], per the shape of `type_def`.
pub(crate) fn coerce_value_for_type(
    type_def: &TypeDef,
    variables: &FnvHashMap<String, Value>,
    input: &InputValue,
) -> Result<Value, GraphQLError> {
    if let InputValue::Variable(name) = input {
        return Ok(variables.get(name).cloned().unwrap_or(Value::Null));
    }

    match type_def {
        TypeDef::Nullable(inner) => {
            if matches!(input, InputValue::Null) {
                Ok(Value::Null)
            } else {
                coerce_value_for_type(inner, variables, input)
            }
        }
        TypeDef::List(inner) => match input {
            InputValue::Null => Ok(Value::Null),
            InputValue::List(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(coerce_value_for_type(inner, variables, item)?);
                }
                Ok(Value::List(out))
            }
            other => Ok(Value::List(vec![coerce_value_for_type(inner, variables, other)?])),
        },
        TypeDef::Scalar(scalar) => match input {
            InputValue::Null => Ok(Value::Null),
            other => Ok((scalar.parse_input)(other).unwrap_or(Value::Null)),
        },
        TypeDef::Enum(enum_def) => match input {
            InputValue::Null => Ok(Value::Null),
            other => Ok((enum_def.parse_input)(other).unwrap_or(Value::Null)),
        },
        TypeDef::InputObject(obj) => match input {
            InputValue::Null => Ok(Value::Null),
            InputValue::Object(fields) => {
                let mut pairs = Vec::with_capacity(obj.fields.len());
                for field_def in &obj.fields {
                    let literal = fields
                        .iter()
                        .find(|(name, _)| name == &field_def.name)
                        .map(|(_, v)| v.clone())
                        .or_else(|| field_def.default_value.clone());
                    let value = match literal {
                        Some(literal) => coerce_value_for_type(&field_def.input_type, variables, &literal)?,
                        None => Value::Null,
                    };
                    pairs.push((field_def.name.clone(), value));
                }
                Ok(Value::Object(ResultMap::from_pairs(pairs)))
            }
            _ => Err(GraphQLError::ArgumentCoercion {
                name: obj.name.clone(),
                message: "expected an input object literal".to_string(),
            }),
        },
        TypeDef::Object(_) | TypeDef::Interface(_) | TypeDef::Union(_) => {
            Err(GraphQLError::ArgumentCoercion {
                name: type_def.name().to_string(),
                message: "output type used in input position".to_string(),
            })
        }
    }
}

/// Wraps [`coerce_value_for_type`] as a reusable [`InputExecutor`] closure,
/// the form C8 stores in a [`crate::schema::InputFieldDef`]'s `ExecuteInput`
/// slot. `err_prefix` matches §4.7's embedded prefixes (e.g. `"Object 'X':
/// field 'f': argument 'a': "`).
pub(crate) fn compile_by_type(type_def: Arc<TypeDef>, err_prefix: String) -> InputExecutor {
    Arc::new(move |variables, input| {
        coerce_value_for_type(&type_def, variables, input).map_err(|e| match e {
            GraphQLError::ArgumentCoercion { name, message } => GraphQLError::ArgumentCoercion {
                name,
                message: format!("{err_prefix}{message}"),
            },
            other => other,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{InputFieldDef, ScalarTypeDef};
    use crate::value::ScalarValue;

    fn int_type() -> Arc<TypeDef> {
        Arc::new(TypeDef::Scalar(Arc::new(ScalarTypeDef {
            name: "Int".to_string(),
            coerce_value: Arc::new(|v| Some(v.clone())),
            parse_input: Arc::new(|v| match v {
                InputValue::Scalar(ScalarValue::Int(i)) => Some(Value::scalar(*i)),
                _ => None,
            }),
        })))
    }

    #[test]
    fn argument_defaulting_uses_default_when_absent() {
        let arg = InputFieldDef::new("limit", int_type(), Some(InputValue::scalar(10_i32)));
        arg.set_execute_input(compile_by_type(int_type(), String::new()));
        let values = get_argument_values(&[arg], &[], &FnvHashMap::default()).unwrap();
        assert_eq!(values.get("limit"), Some(&Value::scalar(10_i32)));
    }

    #[test]
    fn argument_defaulting_falls_back_when_coerced_value_is_null() {
        let arg = InputFieldDef::new("limit", int_type(), Some(InputValue::scalar(10_i32)));
        arg.set_execute_input(compile_by_type(int_type(), String::new()));
        let ast_args = vec![("limit".to_string(), InputValue::Null)];
        let values = get_argument_values(&[arg], &ast_args, &FnvHashMap::default()).unwrap();
        assert_eq!(values.get("limit"), Some(&Value::scalar(10_i32)));
    }

    #[test]
    fn argument_defaulting_uses_ast_value_when_non_null() {
        let arg = InputFieldDef::new("limit", int_type(), Some(InputValue::scalar(10_i32)));
        arg.set_execute_input(compile_by_type(int_type(), String::new()));
        let ast_args = vec![("limit".to_string(), InputValue::scalar(5_i32))];
        let values = get_argument_values(&[arg], &ast_args, &FnvHashMap::default()).unwrap();
        assert_eq!(values.get("limit"), Some(&Value::scalar(5_i32)));
    }

    #[test]
    fn argument_absent_and_no_default_is_omitted() {
        let arg = InputFieldDef::new("limit", int_type(), None);
        arg.set_execute_input(compile_by_type(int_type(), String::new()));
        let values = get_argument_values(&[arg], &[], &FnvHashMap::default()).unwrap();
        assert!(values.get("limit").is_none());
    }
}

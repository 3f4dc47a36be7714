//! Component C3: `@skip`/`@include` evaluation.
//!
//! Grounded on `juniper`'s `is_excluded` (`juniper/src/types/base.rs`),
//! generalised so the predicate can be precomputed once per selection at
//! plan-build time rather than re-walked on every request, per spec.md
//! §4.3 ("planning pre-binds it into `ExecutionInfo.Include`").

use fnv::FnvHashMap;

use crate::ast::{Directive, InputValue};
use crate::error::GraphQLError;
use crate::value::Value;

/// Evaluates a selection's directives against the request's coerced
/// variables and decides whether the selection is included in the
/// response.
///
/// A selection is excluded iff `@skip(if: true)` or `@include(if: false)`
/// appears among its directives; any other directive has no effect here.
pub fn is_included(
    directives: &[Directive],
    variables: &FnvHashMap<String, Value>,
) -> Result<bool, GraphQLError> {
    for directive in directives {
        match directive.name.as_str() {
            "skip" => {
                if eval_if(directive, variables)? {
                    return Ok(false);
                }
            }
            "include" => {
                if !eval_if(directive, variables)? {
                    return Ok(false);
                }
            }
            _ => {}
        }
    }
    Ok(true)
}

fn eval_if(directive: &Directive, variables: &FnvHashMap<String, Value>) -> Result<bool, GraphQLError> {
    let if_arg = directive.argument("if").ok_or_else(|| GraphQLError::DirectiveArgumentType {
        directive: directive.name.clone(),
    })?;
    coerce_bool(if_arg, variables).ok_or_else(|| GraphQLError::DirectiveArgumentType {
        directive: directive.name.clone(),
    })
}

fn coerce_bool(value: &InputValue, variables: &FnvHashMap<String, Value>) -> Option<bool> {
    match value {
        InputValue::Variable(name) => match variables.get(name)? {
            Value::Scalar(s) => s.as_bool(),
            _ => None,
        },
        InputValue::Scalar(s) => s.as_bool(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ScalarValue;

    fn directive(name: &str, if_value: InputValue) -> Directive {
        Directive {
            name: name.to_string(),
            arguments: vec![("if".to_string(), if_value)],
        }
    }

    #[test]
    fn skip_true_excludes() {
        let vars = FnvHashMap::default();
        let d = directive("skip", InputValue::scalar(true));
        assert!(!is_included(&[d], &vars).unwrap());
    }

    #[test]
    fn skip_false_includes() {
        let vars = FnvHashMap::default();
        let d = directive("skip", InputValue::scalar(false));
        assert!(is_included(&[d], &vars).unwrap());
    }

    #[test]
    fn include_false_excludes() {
        let vars = FnvHashMap::default();
        let d = directive("include", InputValue::scalar(false));
        assert!(!is_included(&[d], &vars).unwrap());
    }

    #[test]
    fn variable_bound_if_honours_coerced_variable() {
        let mut vars = FnvHashMap::default();
        vars.insert("s".to_string(), Value::Scalar(ScalarValue::Boolean(true)));
        let d = directive("skip", InputValue::Variable("s".to_string()));
        assert!(!is_included(&[d], &vars).unwrap());
    }

    #[test]
    fn non_boolean_if_is_an_error() {
        let vars = FnvHashMap::default();
        let d = directive("skip", InputValue::scalar(1_i32));
        assert!(is_included(&[d], &vars).is_err());
    }

    #[test]
    fn unrelated_directives_have_no_effect() {
        let vars = FnvHashMap::default();
        let d = Directive {
            name: "deprecated".to_string(),
            arguments: vec![],
        };
        assert!(is_included(&[d], &vars).unwrap());
    }
}

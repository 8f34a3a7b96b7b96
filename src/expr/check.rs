//! Type checking
//!
//! Assigns a static type to every node, resolves each call to exactly one
//! overload and rejects selections and indexes that can never succeed.

use std::sync::Arc;

use crate::env::Env;
use crate::error::Error;
use crate::value::{Type, Value};

use super::ast::{Checked, Expr};

/// Check `expr` against `env`, returning the bound tree and its static type
pub fn check(expr: &Expr, env: &Env) -> Result<(Checked, Type), Error> {
    match expr {
        Expr::Null => Ok((Checked::Literal(Value::Null), Type::Null)),
        Expr::Bool(b) => Ok((Checked::Literal(Value::Bool(*b)), Type::Bool)),
        Expr::Number(n) => Ok((Checked::Literal(Value::Number(*n)), Type::Number)),
        Expr::String(s) => Ok((Checked::Literal(Value::String(s.clone())), Type::String)),
        Expr::List(items) => {
            let items = items
                .iter()
                .map(|item| check(item, env).map(|(checked, _)| checked))
                .collect::<Result<Vec<Checked>, Error>>()?;
            Ok((Checked::List(items), Type::List))
        }
        Expr::Ident(name) => env
            .variable_type(name)
            .map(|ty| (Checked::Ident(name.clone()), ty))
            .ok_or_else(|| Error::UndeclaredReference(name.clone())),
        Expr::Call { function, args } => {
            let (args, arg_types): (Vec<Checked>, Vec<Type>) = args
                .iter()
                .map(|arg| check(arg, env))
                .collect::<Result<Vec<(Checked, Type)>, Error>>()?
                .into_iter()
                .unzip();
            let overload = env.functions().resolve(function, &arg_types)?;
            let result = overload.result();
            Ok((
                Checked::Call {
                    overload: Arc::clone(overload),
                    args,
                },
                result,
            ))
        }
        Expr::Select { operand, field } => {
            let (operand, operand_type) = check(operand, env)?;
            match operand_type {
                Type::Map | Type::Dyn => Ok((
                    Checked::Select {
                        operand: Box::new(operand),
                        field: field.clone(),
                    },
                    Type::Dyn,
                )),
                other => Err(Error::TypeMismatch {
                    found: other.to_string(),
                    reason: format!("field selection '.{}' requires a map", field),
                }),
            }
        }
        Expr::Index { operand, index } => {
            let (operand, operand_type) = check(operand, env)?;
            let (index, index_type) = check(index, env)?;
            let valid = match operand_type {
                Type::List => Type::Number.accepts(index_type),
                Type::Map => Type::String.accepts(index_type),
                Type::Dyn => matches!(index_type, Type::Number | Type::String | Type::Dyn),
                _ => false,
            };
            if !valid {
                return Err(Error::TypeMismatch {
                    found: format!("{}[{}]", operand_type, index_type),
                    reason: "lists are indexed by number and maps by string".into(),
                });
            }
            Ok((
                Checked::Index {
                    operand: Box::new(operand),
                    index: Box::new(index),
                },
                Type::Dyn,
            ))
        }
        Expr::Binary { op, lhs, rhs } => {
            let (lhs, _) = check(lhs, env)?;
            let (rhs, _) = check(rhs, env)?;
            Ok((
                Checked::Binary {
                    op: *op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                Type::Bool,
            ))
        }
    }
}

#[cfg(test)]
mod test_check {
    use super::*;
    use crate::expr::parse;
    use crate::func::{Binding, Overload};

    fn env() -> Env {
        Env::new()
            .function(
                "json_parse",
                Overload::new(
                    "json_parse_string",
                    vec![Type::String],
                    Type::Dyn,
                    Binding::unary(|v: &Value| v.clone()),
                ),
            )
            .unwrap()
            .variable("doc", Type::Map)
            .variable("items", Type::List)
            .variable("text", Type::String)
            .variable("any", Type::Dyn)
    }

    fn type_of(text: &str) -> Result<Type, Error> {
        check(&parse(text)?, &env()).map(|(_, ty)| ty)
    }

    #[test]
    fn test_types() {
        vec![
            ("null", Type::Null),
            ("'a'", Type::String),
            ("[1, 2]", Type::List),
            ("doc", Type::Map),
            ("json_parse('{}')", Type::Dyn),
            ("json_parse(text)", Type::Dyn),
            ("json_parse(any)", Type::Dyn),
            ("json_parse(json_parse('\"x\"'))", Type::Dyn),
            ("doc.a", Type::Dyn),
            ("doc['a']", Type::Dyn),
            ("items[0]", Type::Dyn),
            ("items[any]", Type::Dyn),
            ("any.a[1]['b']", Type::Dyn),
            ("doc == items", Type::Bool),
        ]
        .into_iter()
        .for_each(|(text, exp)| {
            println!("Checking: {}", text);
            assert_eq!(type_of(text).unwrap(), exp);
        })
    }

    #[test]
    fn test_rejections() {
        vec![
            "json_parse(1)",
            "json_parse(doc)",
            "json_parse('a', 'b')",
            "json_parse()",
            "missing",
            "nope('a')",
            "text.a",
            "items.a",
            "items['a']",
            "doc[0]",
            "text[0]",
            "any[true]",
            "[missing]",
        ]
        .into_iter()
        .for_each(|text| {
            println!("Checking: {}", text);
            let err = type_of(text).unwrap_err();
            println!("  error: {}", err);
        })
    }

    #[test]
    fn test_error_variants() {
        assert!(matches!(
            type_of("json_parse(1)"),
            Err(Error::NoMatchingOverload { .. })
        ));
        assert!(matches!(type_of("nope()"), Err(Error::UnknownFunction(_))));
        assert!(matches!(
            type_of("missing"),
            Err(Error::UndeclaredReference(_))
        ));
        assert!(matches!(type_of("text.a"), Err(Error::TypeMismatch { .. })));
    }
}

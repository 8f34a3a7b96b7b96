//! Evaluation
//!
//! A synchronous walk over a checked tree. Failures never interrupt the
//! walk: they are error values, and any node that receives an error value
//! as input returns it unchanged.

use log::trace;

use crate::env::Activation;
use crate::error::ErrorKind;
use crate::value::{List, Value};

use super::ast::{BinaryOp, Checked};

pub fn evaluate(expr: &Checked, activation: &Activation) -> Value {
    match expr {
        Checked::Literal(value) => value.clone(),
        Checked::List(items) => {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                let value = evaluate(item, activation);
                if value.is_error() {
                    return value;
                }
                values.push(value);
            }
            Value::List(List::from(values))
        }
        Checked::Ident(name) => activation.get(name).cloned().unwrap_or_else(|| {
            Value::error(
                ErrorKind::NoSuchAttribute,
                format!("no such attribute: {}", name),
            )
        }),
        Checked::Call { overload, args } => {
            let args = args
                .iter()
                .map(|arg| evaluate(arg, activation))
                .collect::<Vec<Value>>();
            let result = overload.invoke(&args);
            if let Value::Error(err) = &result {
                trace!("overload {} returned an error: {}", overload.id(), err);
            }
            result
        }
        Checked::Select { operand, field } => select(evaluate(operand, activation), field),
        Checked::Index { operand, index } => {
            let operand = evaluate(operand, activation);
            if operand.is_error() {
                return operand;
            }
            index_value(operand, evaluate(index, activation))
        }
        Checked::Binary { op, lhs, rhs } => {
            let lhs = evaluate(lhs, activation);
            if lhs.is_error() {
                return lhs;
            }
            let rhs = evaluate(rhs, activation);
            if rhs.is_error() {
                return rhs;
            }
            match op {
                BinaryOp::Equal => Value::Bool(lhs == rhs),
                BinaryOp::NotEqual => Value::Bool(lhs != rhs),
            }
        }
    }
}

fn select(operand: Value, field: &str) -> Value {
    match operand {
        Value::Map(map) => map.get(field).unwrap_or_else(|| no_such_key(field)),
        Value::Error(_) => operand,
        other => Value::error(
            ErrorKind::NoMatchingOverload,
            format!("type '{}' does not support field selection", other.kind()),
        ),
    }
}

fn index_value(operand: Value, index: Value) -> Value {
    match (operand, index) {
        (err @ Value::Error(_), _) | (_, err @ Value::Error(_)) => err,
        (Value::List(list), Value::Number(n)) => {
            if n.fract() != 0.0 || n < 0.0 || n >= list.len() as f64 {
                return Value::error(
                    ErrorKind::InvalidIndex,
                    format!("index out of range: {}", Value::Number(n)),
                );
            }
            list.get(n as usize).unwrap_or_else(|| {
                Value::error(
                    ErrorKind::InvalidIndex,
                    format!("index out of range: {}", Value::Number(n)),
                )
            })
        }
        (Value::Map(map), Value::String(key)) => {
            map.get(&key).unwrap_or_else(|| no_such_key(&key))
        }
        (operand, index) => Value::error(
            ErrorKind::NoMatchingOverload,
            format!(
                "no such overload: {}[{}]",
                operand.kind(),
                index.kind()
            ),
        ),
    }
}

fn no_such_key(key: &str) -> Value {
    Value::error(ErrorKind::NoSuchKey, format!("no such key: {}", key))
}

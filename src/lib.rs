//! # celjson
//!
//! A `json_parse` function for a typed expression environment.
//!
//! Functions are declared into an [`Env`] as typed [`Overload`]s backed by
//! host closures. Expressions are compiled against the environment, which
//! resolves every call to exactly one overload, and then evaluated to a
//! dynamic [`Value`].
//!
//! `json_parse(text)` parses its string argument and adapts the document
//! lazily: nested arrays and objects are only converted when an expression
//! (or the host) indexes or iterates them.
//!
//! ```rust
//! use celjson::{register_json_parse, Activation, Env, Value};
//!
//! let env = register_json_parse(Env::new()).unwrap();
//! let program = env.compile(r#"json_parse('{"a":[1,2,{"b":3}]}').a[2].b"#).unwrap();
//! assert_eq!(program.evaluate(&Activation::new()), Value::from(3));
//!
//! // Failures at evaluation time are values, not panics.
//! let program = env.compile("json_parse('not json')").unwrap();
//! assert!(program.evaluate(&Activation::new()).is_error());
//! ```

use serde_json::Value as JsonValue;
use std::convert::TryFrom;

pub mod adapter;
mod env;
mod error;
mod expr;
mod func;
pub mod json;
mod op;
mod registry;
mod value;

pub use env::{Activation, Env};
pub use error::{Error, ErrorKind, EvalError};
pub use expr::{parse as parse_expression, BinaryOp, Expr, ParseError, Program};
pub use func::{Binding, Overload};
pub use op::json::parse_string as json_parse;
pub use registry::FunctionRegistry;
pub use value::{Kind, List, ListIter, Map, MapIter, Type, Value, NULL};

/// Function name `json_parse` is declared under
pub const JSON_PARSE: &str = "json_parse";
/// Overload id of the `(string) -> dyn` signature
pub const JSON_PARSE_STRING: &str = "json_parse_string";

/// Declare `json_parse(string) -> dyn` in `env`.
///
/// Declaring it twice in the same environment is a declaration error.
pub fn register_json_parse(env: Env) -> Result<Env, Error> {
    env.function(
        JSON_PARSE,
        Overload::new(
            JSON_PARSE_STRING,
            vec![Type::String],
            Type::Dyn,
            Binding::unary(json_parse),
        ),
    )
}

/// Evaluate an expression with the keys of `data` bound as variables.
///
/// The environment has the built-in functions and `json_parse`; every key of
/// `data` is declared as a `dyn` variable. `data` must be an object or null.
///
/// ```rust
/// use serde_json::json;
/// use celjson::{evaluate, Value};
///
/// let res = evaluate("json_parse(task).cpu", &json!({"task": "{\"cpu\": 512}"})).unwrap();
/// assert_eq!(res, Value::from(512));
/// ```
pub fn evaluate(expression: &str, data: &JsonValue) -> Result<Value, Error> {
    let activation = Activation::try_from(data)?;
    let env = activation.names().fold(
        register_json_parse(Env::with_builtins()?)?,
        |env, name| env.variable(name, Type::Dyn),
    );
    let program = env.compile(expression)?;
    Ok(program.evaluate(&activation))
}

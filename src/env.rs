//! Environments and activations
//!
//! An `Env` holds the declared functions and variables that expressions are
//! compiled against. It is built once and only read afterwards, so a single
//! `Env` (and the programs compiled from it) can be shared across threads.

use log::debug;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::convert::TryFrom;

use crate::error::Error;
use crate::expr::Program;
use crate::func::{Binding, Overload};
use crate::op::BUILTIN_MAP;
use crate::registry::FunctionRegistry;
use crate::value::{Type, Value};

#[derive(Debug, Default, Clone)]
pub struct Env {
    functions: FunctionRegistry,
    variables: BTreeMap<String, Type>,
}

impl Env {
    /// An environment with no functions and no variables
    pub fn new() -> Self {
        Self::default()
    }

    /// An environment with the built-in functions declared
    pub fn with_builtins() -> Result<Self, Error> {
        let mut env = Self::new();
        for builtin in BUILTIN_MAP.values() {
            env.declare_function(
                builtin.symbol,
                Overload::new(
                    builtin.overload_id,
                    builtin.params.to_vec(),
                    builtin.result,
                    Binding::function(builtin.operator),
                ),
            )?;
        }
        Ok(env)
    }

    pub fn declare_function(&mut self, name: &str, overload: Overload) -> Result<(), Error> {
        self.functions.declare(name, overload)
    }

    /// Builder form of `declare_function`
    pub fn function(mut self, name: &str, overload: Overload) -> Result<Self, Error> {
        self.declare_function(name, overload)?;
        Ok(self)
    }

    /// Declare a variable. Redeclaring a name replaces its type.
    pub fn variable<S: Into<String>>(mut self, name: S, ty: Type) -> Self {
        self.variables.insert(name.into(), ty);
        self
    }

    pub fn variable_type(&self, name: &str) -> Option<Type> {
        self.variables.get(name).copied()
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    /// Parse and type check an expression
    pub fn compile(&self, text: &str) -> Result<Program, Error> {
        let program = Program::compile(text, self)?;
        debug!("compiled '{}' with result type {}", text, program.result_type());
        Ok(program)
    }
}

/// Variable bindings for one evaluation
#[derive(Debug, Default, Clone)]
pub struct Activation {
    vars: BTreeMap<String, Value>,
}

impl Activation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<S: Into<String>, V: Into<Value>>(&mut self, name: S, value: V) {
        self.vars.insert(name.into(), value.into());
    }

    /// Builder form of `insert`
    pub fn with<S: Into<String>, V: Into<Value>>(mut self, name: S, value: V) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }
}

/// Bind each key of a JSON object. `null` binds nothing.
impl TryFrom<&JsonValue> for Activation {
    type Error = Error;

    fn try_from(data: &JsonValue) -> Result<Self, Self::Error> {
        match data {
            JsonValue::Null => Ok(Self::new()),
            JsonValue::Object(obj) => Ok(Self {
                vars: obj
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::from(v.clone())))
                    .collect(),
            }),
            _ => Err(Error::InvalidVarMap(data.clone())),
        }
    }
}

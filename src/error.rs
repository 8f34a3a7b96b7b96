//! Error handling
//!
use serde_json::Value as JsonValue;
use thiserror;

use crate::expr::ParseError;

/// Public error enumeration
///
/// These are failures the host sees while building an environment or
/// compiling an expression. Failures that happen during evaluation are
/// never reported here: they become `Value::Error` results (see `EvalError`).
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Invalid declaration - function: '{name}', overload: '{overload}', reason: {reason}")]
    InvalidDeclaration {
        name: String,
        overload: String,
        reason: String,
    },

    #[error("Could not parse expression: {0}")]
    Parse(#[from] ParseError),

    #[error("Undeclared reference to function '{0}'")]
    UnknownFunction(String),

    #[error("Undeclared reference to '{0}'")]
    UndeclaredReference(String),

    #[error("No matching overload for '{name}' applied to ({args})")]
    NoMatchingOverload { name: String, args: String },

    #[error("Ambiguous call to '{name}' applied to ({args}), candidates: {candidates}")]
    AmbiguousOverload {
        name: String,
        args: String,
        candidates: String,
    },

    #[error("Type mismatch - found: {found}, reason: {reason}")]
    TypeMismatch { found: String, reason: String },

    #[error("Invalid variable mapping - {0} is not an object.")]
    InvalidVarMap(JsonValue),

    #[error("Could not serialize value: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// The category of an error value produced during evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A function, selection or index was applied to a value of the wrong kind
    NoMatchingOverload,
    /// Text handed to `json_parse` was not valid JSON
    InvalidJson,
    /// The JSON parser produced something the value model cannot represent
    UnsupportedType,
    NoSuchKey,
    InvalidIndex,
    /// A declared variable had no binding at evaluation time
    NoSuchAttribute,
}

/// An error carried as data through evaluation
///
/// This is the payload of `Value::Error`. It is returned like any other
/// value, so evaluation continues up the tree and the error surfaces as the
/// overall result of the expression.
#[derive(thiserror::Error, Debug, Clone)]
#[error("{message}")]
pub struct EvalError {
    kind: ErrorKind,
    message: String,
}
impl EvalError {
    pub fn new<M: Into<String>>(kind: ErrorKind, message: M) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

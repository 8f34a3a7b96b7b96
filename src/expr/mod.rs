//! Expressions
//!
//! Text is parsed into an `Expr`, checked against an `Env` into a `Program`,
//! and the program is evaluated against an `Activation`.

mod ast;
mod check;
mod eval;
mod parser;

pub use ast::{BinaryOp, Expr};
pub use parser::{parse, ParseError};

use crate::env::{Activation, Env};
use crate::error::Error;
use crate::value::{Type, Value};

use ast::Checked;

/// A checked expression, ready to be evaluated any number of times
#[derive(Debug, Clone)]
pub struct Program {
    checked: Checked,
    result_type: Type,
}

impl Program {
    pub(crate) fn compile(text: &str, env: &Env) -> Result<Self, Error> {
        let expr = parse(text)?;
        let (checked, result_type) = check::check(&expr, env)?;
        Ok(Self {
            checked,
            result_type,
        })
    }

    /// Static type of the expression's result
    pub fn result_type(&self) -> Type {
        self.result_type
    }

    /// Evaluate against the given variables.
    ///
    /// Runtime failures are returned as `Value::Error`, never as a panic.
    pub fn evaluate(&self, activation: &Activation) -> Value {
        eval::evaluate(&self.checked, activation)
    }
}

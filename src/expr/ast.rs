//! Expression trees
//!
//! `Expr` is what the parser produces. `Checked` is the same tree after type
//! checking, with every call bound to the overload it resolved to.

use std::sync::Arc;

use crate::func::Overload;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Equal,
    NotEqual,
}
impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Equal => "==",
            Self::NotEqual => "!=",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<Expr>),
    Ident(String),
    Call {
        function: String,
        args: Vec<Expr>,
    },
    Select {
        operand: Box<Expr>,
        field: String,
    },
    Index {
        operand: Box<Expr>,
        index: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

#[derive(Debug, Clone)]
pub enum Checked {
    Literal(Value),
    List(Vec<Checked>),
    Ident(String),
    Call {
        overload: Arc<Overload>,
        args: Vec<Checked>,
    },
    Select {
        operand: Box<Checked>,
        field: String,
    },
    Index {
        operand: Box<Checked>,
        index: Box<Checked>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Checked>,
        rhs: Box<Checked>,
    },
}

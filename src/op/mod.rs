//! Built-in functions
//!
//! This module contains the global built-in map, which defines the base
//! functions every `Env::with_builtins` environment starts with. `json_parse`
//! is not part of it; it is registered separately with
//! `crate::register_json_parse`.

use phf::phf_map;
use std::fmt;

use crate::error::ErrorKind;
use crate::value::{Type, Value};

mod collection;
pub mod json;
mod string;

pub const BUILTIN_MAP: phf::Map<&'static str, Builtin> = phf_map! {
    "size" => Builtin {
        symbol: "size",
        overload_id: "size_dyn",
        params: &[Type::Dyn],
        result: Type::Number,
        operator: collection::size,
    },
    "keys" => Builtin {
        symbol: "keys",
        overload_id: "keys_map",
        params: &[Type::Map],
        result: Type::List,
        operator: collection::keys,
    },
    "string" => Builtin {
        symbol: "string",
        overload_id: "string_dyn",
        params: &[Type::Dyn],
        result: Type::String,
        operator: string::to_string,
    },
};

type OperatorFn = fn(&[Value]) -> Value;

fn wrong_arg_count(symbol: &str, expected: usize, actual: usize) -> Value {
    Value::error(
        ErrorKind::NoMatchingOverload,
        format!(
            "wrong argument count for '{}' - expected: {}, actual: {}",
            symbol, expected, actual
        ),
    )
}

fn no_such_overload(symbol: &str, arg: &Value) -> Value {
    Value::error(
        ErrorKind::NoMatchingOverload,
        format!("no such overload: {}({})", symbol, arg.kind()),
    )
}

pub struct Builtin {
    pub(crate) symbol: &'static str,
    pub(crate) overload_id: &'static str,
    pub(crate) params: &'static [Type],
    pub(crate) result: Type,
    pub(crate) operator: OperatorFn,
}
impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builtin")
            .field("symbol", &self.symbol)
            .field("overload_id", &self.overload_id)
            .field("operator", &"<operator fn>")
            .finish()
    }
}

//! Functions
//!
//! An `Overload` is one typed signature of a named function together with
//! the host code that implements it. The host code is held by a `Binding`,
//! which turns a plain Rust closure into the calling convention the
//! evaluator uses: a slice of evaluated arguments in, one value out.

use std::fmt;
use std::sync::Arc;

use crate::error::ErrorKind;
use crate::value::{Type, Value};

type NativeFn = dyn Fn(&[Value]) -> Value + Send + Sync;

/// Host implementation of an overload
#[derive(Clone)]
pub struct Binding(Arc<NativeFn>);

impl Binding {
    /// Bind a single-argument host function.
    ///
    /// ```rust
    /// use celjson::{Binding, Value};
    ///
    /// let twice = Binding::unary(|v: &Value| match v.as_f64() {
    ///     Some(n) => Value::from(n * 2.0),
    ///     None => Value::Null,
    /// });
    /// assert_eq!(twice.invoke(&[Value::from(21)]), Value::from(42));
    /// ```
    pub fn unary<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        Binding(Arc::new(move |args: &[Value]| match args {
            [arg] => f(arg),
            _ => arity_error(1, args.len()),
        }))
    }

    pub fn binary<F>(f: F) -> Self
    where
        F: Fn(&Value, &Value) -> Value + Send + Sync + 'static,
    {
        Binding(Arc::new(move |args: &[Value]| match args {
            [first, second] => f(first, second),
            _ => arity_error(2, args.len()),
        }))
    }

    /// Bind a host function taking any number of arguments
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Binding(Arc::new(f))
    }

    /// Call the host function.
    ///
    /// If any argument is an error value, the first one is returned and the
    /// host function is not called.
    pub fn invoke(&self, args: &[Value]) -> Value {
        if let Some(err) = args.iter().find(|arg| arg.is_error()) {
            return err.clone();
        }
        (self.0)(args)
    }
}
impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<binding fn>")
    }
}

fn arity_error(expected: usize, actual: usize) -> Value {
    Value::error(
        ErrorKind::NoMatchingOverload,
        format!(
            "wrong argument count - expected: {}, actual: {}",
            expected, actual
        ),
    )
}

/// One signature of a function, with its implementation
#[derive(Debug, Clone)]
pub struct Overload {
    id: String,
    params: Vec<Type>,
    result: Type,
    binding: Binding,
}
impl Overload {
    pub fn new<S: Into<String>>(id: S, params: Vec<Type>, result: Type, binding: Binding) -> Self {
        Self {
            id: id.into(),
            params,
            result,
            binding,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn params(&self) -> &[Type] {
        &self.params
    }

    pub fn result(&self) -> Type {
        self.result
    }

    /// Whether arguments of the given static types can be passed to this overload
    pub fn accepts(&self, args: &[Type]) -> bool {
        self.params.len() == args.len()
            && self
                .params
                .iter()
                .zip(args.iter())
                .all(|(param, arg)| param.accepts(*arg))
    }

    pub fn invoke(&self, args: &[Value]) -> Value {
        self.binding.invoke(args)
    }
}
impl fmt::Display for Overload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}) -> {}", self.id, type_list(&self.params), self.result)
    }
}

/// Render types as a comma separated list
pub(crate) fn type_list(types: &[Type]) -> String {
    types
        .iter()
        .map(|t| t.name())
        .collect::<Vec<&str>>()
        .join(", ")
}

#[cfg(test)]
mod test_binding {
    use super::*;

    fn echo() -> Binding {
        Binding::function(|args: &[Value]| Value::from(args.to_vec()))
    }

    #[test]
    fn test_unary_arity() {
        let binding = Binding::unary(|v: &Value| v.clone());
        assert_eq!(binding.invoke(&[Value::from("a")]), Value::from("a"));
        let err = binding.invoke(&[]);
        assert_eq!(err.as_error().unwrap().kind(), ErrorKind::NoMatchingOverload);
        binding
            .invoke(&[Value::Null, Value::Null])
            .as_error()
            .unwrap();
    }

    #[test]
    fn test_binary() {
        let binding = Binding::binary(|a: &Value, b: &Value| Value::from(a == b));
        assert_eq!(
            binding.invoke(&[Value::from(1), Value::from(1.0)]),
            Value::Bool(true)
        );
        binding.invoke(&[Value::Null]).as_error().unwrap();
    }

    #[test]
    fn test_errors_are_absorbed() {
        let first = Value::error(ErrorKind::InvalidJson, "first");
        let second = Value::error(ErrorKind::NoSuchKey, "second");
        let res = echo().invoke(&[Value::Null, first, second]);
        assert_eq!(res.as_error().unwrap().message(), "first");
    }

    #[test]
    fn test_overload_accepts() {
        let overload = Overload::new(
            "pair_string_dyn",
            vec![Type::String, Type::Dyn],
            Type::List,
            echo(),
        );
        assert!(overload.accepts(&[Type::String, Type::Map]));
        assert!(overload.accepts(&[Type::Dyn, Type::Null]));
        assert!(!overload.accepts(&[Type::Number, Type::Map]));
        assert!(!overload.accepts(&[Type::String]));
        assert_eq!(
            overload.to_string(),
            "pair_string_dyn(string, dyn) -> list"
        );
    }
}

//! The dynamic value model
//!
//! Every expression evaluates to a `Value`. Lists and maps are either eager
//! (built by the evaluator or from host data) or lazy (backed by a parsed
//! JSON document, see `crate::adapter`). The two behave identically.

use serde::ser::{self, Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::Value as JsonValue;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;
use std::slice;
use std::sync::Arc;

use crate::adapter::{LazyList, LazyListIter, LazyMap, LazyMapIter};
use crate::error::{Error, ErrorKind, EvalError};

/// Runtime kind of a value, as reported by `Value::kind`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Bool,
    Number,
    String,
    List,
    Map,
    Error,
}
impl Kind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Number => "number",
            Self::String => "string",
            Self::List => "list",
            Self::Map => "map",
            Self::Error => "error",
        }
    }
}
impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Static type used in overload signatures and by the checker
///
/// `Dyn` is the wildcard: a `Dyn` parameter accepts any argument, and a
/// `Dyn` argument may be passed to any parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Null,
    Bool,
    Number,
    String,
    List,
    Map,
    Dyn,
}
impl Type {
    pub fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Number => "number",
            Self::String => "string",
            Self::List => "list",
            Self::Map => "map",
            Self::Dyn => "dyn",
        }
    }

    /// Whether an argument of type `arg` may be passed where `self` is declared
    pub fn accepts(self, arg: Type) -> bool {
        self == Type::Dyn || arg == Type::Dyn || self == arg
    }
}
impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A dynamically typed value
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(List),
    Map(Map),
    Error(EvalError),
}

pub const NULL: Value = Value::Null;

impl Value {
    /// Build an error value. Never panics; the value is returned like any other.
    pub fn error<M: Into<String>>(kind: ErrorKind, message: M) -> Self {
        Value::Error(EvalError::new(kind, message))
    }

    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Bool,
            Value::Number(_) => Kind::Number,
            Value::String(_) => Kind::String,
            Value::List(_) => Kind::List,
            Value::Map(_) => Kind::Map,
            Value::Error(_) => Kind::Error,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_error(&self) -> Option<&EvalError> {
        match self {
            Value::Error(e) => Some(e),
            _ => None,
        }
    }

    /// Convert into a JSON document. Error values cannot be represented.
    pub fn to_json(&self) -> Result<JsonValue, Error> {
        serde_json::to_value(self).map_err(Error::from)
    }
}

/// Structural equality
///
/// Lazy and eager collections compare by content. An error value is never
/// equal to anything, itself included.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}
impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}
impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}
impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(f64::from(n))
    }
}
impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}
impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}
impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}
impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(List::from(items))
    }
}
impl From<BTreeMap<String, Value>> for Value {
    fn from(entries: BTreeMap<String, Value>) -> Self {
        Value::Map(Map::from(entries))
    }
}
impl From<List> for Value {
    fn from(list: List) -> Self {
        Value::List(list)
    }
}
impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Map(map)
    }
}
impl From<EvalError> for Value {
    fn from(err: EvalError) -> Self {
        Value::Error(err)
    }
}
/// Eager conversion of host data
impl From<JsonValue> for Value {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => match n.as_f64() {
                Some(f) => Value::Number(f),
                None => Value::error(
                    ErrorKind::UnsupportedType,
                    format!("unsupported JSON type {:?}", n),
                ),
            },
            JsonValue::String(s) => Value::String(s),
            JsonValue::Array(items) => {
                Value::from(items.into_iter().map(Value::from).collect::<Vec<Value>>())
            }
            JsonValue::Object(obj) => Value::from(
                obj.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect::<BTreeMap<String, Value>>(),
            ),
        }
    }
}

#[derive(Debug, Clone)]
enum ListRepr {
    Eager(Arc<Vec<Value>>),
    Lazy(LazyList),
}

/// An ordered, index-addressable sequence of values
#[derive(Debug, Clone)]
pub struct List(ListRepr);

impl List {
    pub fn len(&self) -> usize {
        match &self.0 {
            ListRepr::Eager(items) => items.len(),
            ListRepr::Lazy(lazy) => lazy.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the element at `idx`. Lazy lists convert only that element.
    pub fn get(&self, idx: usize) -> Option<Value> {
        match &self.0 {
            ListRepr::Eager(items) => items.get(idx).cloned(),
            ListRepr::Lazy(lazy) => lazy.get(idx),
        }
    }

    pub fn iter(&self) -> ListIter<'_> {
        match &self.0 {
            ListRepr::Eager(items) => ListIter::Eager(items.iter()),
            ListRepr::Lazy(lazy) => ListIter::Lazy(lazy.iter()),
        }
    }
}
impl From<Vec<Value>> for List {
    fn from(items: Vec<Value>) -> Self {
        List(ListRepr::Eager(Arc::new(items)))
    }
}
impl From<LazyList> for List {
    fn from(lazy: LazyList) -> Self {
        List(ListRepr::Lazy(lazy))
    }
}
impl PartialEq for List {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}
impl<'a> IntoIterator for &'a List {
    type Item = Value;
    type IntoIter = ListIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over list elements, converting lazily backed elements one at a time
pub enum ListIter<'a> {
    Eager(slice::Iter<'a, Value>),
    Lazy(LazyListIter<'a>),
}
impl Iterator for ListIter<'_> {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        match self {
            ListIter::Eager(it) => it.next().cloned(),
            ListIter::Lazy(it) => it.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            ListIter::Eager(it) => it.size_hint(),
            ListIter::Lazy(it) => it.size_hint(),
        }
    }
}

#[derive(Debug, Clone)]
enum MapRepr {
    Eager(Arc<BTreeMap<String, Value>>),
    Lazy(LazyMap),
}

/// A string-keyed mapping of values, iterated in sorted key order
#[derive(Debug, Clone)]
pub struct Map(MapRepr);

impl Map {
    pub fn len(&self) -> usize {
        match &self.0 {
            MapRepr::Eager(entries) => entries.len(),
            MapRepr::Lazy(lazy) => lazy.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up `key`. Lazy maps convert only the value found.
    pub fn get(&self, key: &str) -> Option<Value> {
        match &self.0 {
            MapRepr::Eager(entries) => entries.get(key).cloned(),
            MapRepr::Lazy(lazy) => lazy.get(key),
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        match &self.0 {
            MapRepr::Eager(entries) => entries.contains_key(key),
            MapRepr::Lazy(lazy) => lazy.contains_key(key),
        }
    }

    /// Keys in sorted order. No value is converted.
    pub fn keys(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        match &self.0 {
            MapRepr::Eager(entries) => Box::new(entries.keys().map(String::as_str)),
            MapRepr::Lazy(lazy) => Box::new(lazy.keys()),
        }
    }

    pub fn iter(&self) -> MapIter<'_> {
        match &self.0 {
            MapRepr::Eager(entries) => MapIter::Eager(entries.iter()),
            MapRepr::Lazy(lazy) => MapIter::Lazy(lazy.iter()),
        }
    }
}
impl From<BTreeMap<String, Value>> for Map {
    fn from(entries: BTreeMap<String, Value>) -> Self {
        Map(MapRepr::Eager(Arc::new(entries)))
    }
}
impl From<LazyMap> for Map {
    fn from(lazy: LazyMap) -> Self {
        Map(MapRepr::Lazy(lazy))
    }
}
impl PartialEq for Map {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key).map_or(false, |o| o == value))
    }
}
impl<'a> IntoIterator for &'a Map {
    type Item = (&'a str, Value);
    type IntoIter = MapIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over map entries in sorted key order
pub enum MapIter<'a> {
    Eager(btree_map::Iter<'a, String, Value>),
    Lazy(LazyMapIter<'a>),
}
impl<'a> Iterator for MapIter<'a> {
    type Item = (&'a str, Value);

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            MapIter::Eager(it) => it.next().map(|(k, v)| (k.as_str(), v.clone())),
            MapIter::Lazy(it) => it.next(),
        }
    }
}

/// Render a number the way JSON would: integral values without a fraction
fn write_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        write!(f, "{}", n as i64)
    } else {
        write!(f, "{}", n)
    }
}

/// Quote and escape a string the way JSON would
fn write_string(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    let quoted = serde_json::to_string(s).map_err(|_| fmt::Error)?;
    f.write_str(&quoted)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write_number(f, *n),
            Value::String(s) => write_string(f, s),
            Value::List(list) => {
                f.write_str("[")?;
                for (i, item) in list.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Map(map) => {
                f.write_str("{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_string(f, key)?;
                    write!(f, ": {}", value)?;
                }
                f.write_str("}")
            }
            Value::Error(err) => write!(f, "error: {}", err),
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => {
                if n.is_finite() && n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
                    serializer.serialize_i64(*n as i64)
                } else {
                    serializer.serialize_f64(*n)
                }
            }
            Value::String(s) => serializer.serialize_str(s),
            Value::List(list) => {
                let mut seq = serializer.serialize_seq(Some(list.len()))?;
                for item in list {
                    seq.serialize_element(&item)?;
                }
                seq.end()
            }
            Value::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    out.serialize_entry(key, &value)?;
                }
                out.end()
            }
            Value::Error(err) => Err(ser::Error::custom(format!(
                "cannot serialize error value: {}",
                err
            ))),
        }
    }
}

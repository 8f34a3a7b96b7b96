//! Adapting parsed JSON into values
//!
//! Scalars are converted on the spot. Arrays and objects are wrapped in a
//! `LazyList` or `LazyMap` that holds the native container and a conversion
//! function; a child is only converted when it is indexed, looked up or
//! visited by an iterator. Nothing is cached, so two accesses to the same
//! child convert it twice and yield equal values.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;
use std::slice;
use std::sync::Arc;

use crate::error::ErrorKind;
use crate::json::NativeJson;
use crate::value::{List, Map, Value};

/// Converts one native node into a value
///
/// Must be a pure function of its input.
pub type Converter = fn(&NativeJson) -> Value;

/// Convert a parsed document, deferring work on nested containers.
///
/// ```rust
/// use celjson::adapter::adapt;
/// use celjson::json::parse;
///
/// let doc = parse(r#"{"a": [1, 2, {"b": 3}]}"#).unwrap();
/// let value = adapt(&doc);
/// let b = value.as_map().unwrap()
///     .get("a").unwrap()
///     .as_list().unwrap()
///     .get(2).unwrap()
///     .as_map().unwrap()
///     .get("b");
/// assert_eq!(b, Some(celjson::Value::Number(3.0)));
/// ```
pub fn adapt(native: &NativeJson) -> Value {
    adapt_with(native, adapt)
}

/// Convert `native` with `convert` used for every child, at any depth.
pub fn adapt_with(native: &NativeJson, convert: Converter) -> Value {
    match native {
        NativeJson::Null => Value::Null,
        NativeJson::Bool(b) => Value::Bool(*b),
        NativeJson::Number(n) => Value::Number(*n),
        NativeJson::String(s) => Value::String(s.clone()),
        NativeJson::Array(items) => Value::List(List::from(LazyList {
            items: Arc::clone(items),
            convert,
        })),
        NativeJson::Object(entries) => Value::Map(Map::from(LazyMap {
            entries: Arc::clone(entries),
            convert,
        })),
        NativeJson::Unsupported { type_name } => Value::error(
            ErrorKind::UnsupportedType,
            format!("unsupported JSON type {}", type_name),
        ),
    }
}

/// Convert the whole tree up front
pub fn adapt_eager(native: &NativeJson) -> Value {
    match native {
        NativeJson::Array(items) => Value::from(items.iter().map(adapt_eager).collect::<Vec<_>>()),
        NativeJson::Object(entries) => Value::from(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), adapt_eager(v)))
                .collect::<BTreeMap<String, Value>>(),
        ),
        scalar => adapt(scalar),
    }
}

/// A JSON array whose elements are converted on access
#[derive(Clone)]
pub struct LazyList {
    items: Arc<Vec<NativeJson>>,
    convert: Converter,
}
impl LazyList {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<Value> {
        self.items.get(idx).map(self.convert)
    }

    pub fn iter(&self) -> LazyListIter<'_> {
        LazyListIter {
            inner: self.items.iter(),
            convert: self.convert,
        }
    }
}
impl fmt::Debug for LazyList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyList")
            .field("len", &self.items.len())
            .field("convert", &"<converter fn>")
            .finish()
    }
}

pub struct LazyListIter<'a> {
    inner: slice::Iter<'a, NativeJson>,
    convert: Converter,
}
impl Iterator for LazyListIter<'_> {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        self.inner.next().map(self.convert)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// A JSON object whose values are converted on access
#[derive(Clone)]
pub struct LazyMap {
    entries: Arc<BTreeMap<String, NativeJson>>,
    convert: Converter,
}
impl LazyMap {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).map(self.convert)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> LazyMapIter<'_> {
        LazyMapIter {
            inner: self.entries.iter(),
            convert: self.convert,
        }
    }
}
impl fmt::Debug for LazyMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyMap")
            .field("keys", &self.entries.keys().collect::<Vec<_>>())
            .field("convert", &"<converter fn>")
            .finish()
    }
}

pub struct LazyMapIter<'a> {
    inner: btree_map::Iter<'a, String, NativeJson>,
    convert: Converter,
}
impl<'a> Iterator for LazyMapIter<'a> {
    type Item = (&'a str, Value);

    fn next(&mut self) -> Option<Self::Item> {
        let convert = self.convert;
        self.inner.next().map(|(k, v)| (k.as_str(), convert(v)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

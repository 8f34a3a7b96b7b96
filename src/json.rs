//! Native JSON documents
//!
//! `serde_json` does the lexing and parsing. Its output is decoded through a
//! visitor into `NativeJson`, a closed tagged union the adapter can match on
//! exhaustively. Containers sit behind an `Arc` so a lazy wrapper can hold a
//! child container without copying it.

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A parsed JSON value, as produced by the JSON parser collaborator
#[derive(Debug, Clone, PartialEq)]
pub enum NativeJson {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Arc<Vec<NativeJson>>),
    Object(Arc<BTreeMap<String, NativeJson>>),
    /// Something a serde source handed us that has no JSON counterpart
    Unsupported { type_name: &'static str },
}

/// Parse JSON text into a native tree.
///
/// Duplicate object keys keep the last value, matching `serde_json::Value`.
///
/// ```rust
/// use celjson::json::{parse, NativeJson};
///
/// assert_eq!(parse("42").unwrap(), NativeJson::Number(42.0));
/// assert!(parse("{\"x\":").is_err());
/// ```
pub fn parse(text: &str) -> Result<NativeJson, serde_json::Error> {
    serde_json::from_str(text)
}

impl NativeJson {
    /// Name of the native type, used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Number(_) => "f64",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
            Self::Unsupported { type_name } => *type_name,
        }
    }
}

impl<'de> Deserialize<'de> for NativeJson {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(NativeJsonVisitor)
    }
}

struct NativeJsonVisitor;

impl<'de> Visitor<'de> for NativeJsonVisitor {
    type Value = NativeJson;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("any valid JSON value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<NativeJson, E> {
        Ok(NativeJson::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<NativeJson, E> {
        Ok(NativeJson::Number(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<NativeJson, E> {
        Ok(NativeJson::Number(v as f64))
    }

    fn visit_i128<E: de::Error>(self, _v: i128) -> Result<NativeJson, E> {
        Ok(NativeJson::Unsupported { type_name: "i128" })
    }

    fn visit_u128<E: de::Error>(self, _v: u128) -> Result<NativeJson, E> {
        Ok(NativeJson::Unsupported { type_name: "u128" })
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<NativeJson, E> {
        Ok(NativeJson::Number(v))
    }

    fn visit_char<E: de::Error>(self, v: char) -> Result<NativeJson, E> {
        Ok(NativeJson::String(v.to_string()))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<NativeJson, E> {
        Ok(NativeJson::String(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<NativeJson, E> {
        Ok(NativeJson::String(v))
    }

    fn visit_bytes<E: de::Error>(self, _v: &[u8]) -> Result<NativeJson, E> {
        Ok(NativeJson::Unsupported { type_name: "bytes" })
    }

    fn visit_none<E: de::Error>(self) -> Result<NativeJson, E> {
        Ok(NativeJson::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<NativeJson, D::Error>
    where
        D: Deserializer<'de>,
    {
        Deserialize::deserialize(deserializer)
    }

    fn visit_unit<E: de::Error>(self) -> Result<NativeJson, E> {
        Ok(NativeJson::Null)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<NativeJson, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(NativeJson::Array(Arc::new(items)))
    }

    fn visit_map<A>(self, mut map: A) -> Result<NativeJson, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = BTreeMap::new();
        while let Some((key, value)) = map.next_entry::<String, NativeJson>()? {
            entries.insert(key, value);
        }
        Ok(NativeJson::Object(Arc::new(entries)))
    }
}

impl From<JsonValue> for NativeJson {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(b) => Self::Bool(b),
            JsonValue::Number(n) => match n.as_f64() {
                Some(f) => Self::Number(f),
                None => Self::Unsupported {
                    type_name: "serde_json::Number",
                },
            },
            JsonValue::String(s) => Self::String(s),
            JsonValue::Array(items) => {
                Self::Array(Arc::new(items.into_iter().map(Self::from).collect()))
            }
            JsonValue::Object(obj) => Self::Object(Arc::new(
                obj.into_iter().map(|(k, v)| (k, Self::from(v))).collect(),
            )),
        }
    }
}

//! Collection Operations

use crate::value::Value;

use super::{no_such_overload, wrong_arg_count};

/// Length of a string (in code points), list or map
///
/// Lists and maps backed by a parsed document report their length without
/// converting any element.
pub fn size(args: &[Value]) -> Value {
    let arg = match args {
        [arg] => arg,
        _ => return wrong_arg_count("size", 1, args.len()),
    };
    match arg {
        Value::String(s) => Value::from(s.chars().count() as f64),
        Value::List(list) => Value::from(list.len() as f64),
        Value::Map(map) => Value::from(map.len() as f64),
        Value::Error(_) => arg.clone(),
        other => no_such_overload("size", other),
    }
}

/// The keys of a map, in sorted order, as a list of strings
pub fn keys(args: &[Value]) -> Value {
    let arg = match args {
        [arg] => arg,
        _ => return wrong_arg_count("keys", 1, args.len()),
    };
    match arg {
        Value::Map(map) => Value::from(map.keys().map(Value::from).collect::<Vec<Value>>()),
        Value::Error(_) => arg.clone(),
        other => no_such_overload("keys", other),
    }
}

#[cfg(test)]
mod test_collection {
    use super::*;
    use crate::adapter::adapt;
    use crate::error::ErrorKind;
    use crate::json::parse;
    use serde_json::json;

    #[test]
    fn test_size() {
        vec![
            (Value::from("héllo"), 5.0),
            (Value::from(""), 0.0),
            (Value::from(json!([1, 2, 3])), 3.0),
            (Value::from(json!({"a": 1})), 1.0),
            (adapt(&parse(r#"[[1], {"a": 2}]"#).unwrap()), 2.0),
        ]
        .into_iter()
        .for_each(|(arg, exp)| {
            println!("size({})", arg);
            assert_eq!(size(&[arg]), Value::from(exp));
        })
    }

    #[test]
    fn test_size_wrong_kind() {
        vec![Value::Null, Value::from(true), Value::from(1)]
            .into_iter()
            .for_each(|arg| {
                let res = size(&[arg]);
                assert_eq!(res.as_error().unwrap().kind(), ErrorKind::NoMatchingOverload);
            })
    }

    #[test]
    fn test_keys() {
        let doc = adapt(&parse(r#"{"b": [1], "a": {"c": null}}"#).unwrap());
        assert_eq!(keys(&[doc]), Value::from(json!(["a", "b"])));
        keys(&[Value::from(json!([1]))]).as_error().unwrap();
    }
}

//! String Operations

use crate::value::Value;

use super::{no_such_overload, wrong_arg_count};

/// Convert a scalar to its string form
///
/// Numbers render like JSON numbers, so `string(512)` is `"512"` rather than
/// `"512.0"`. Lists and maps have no string form.
pub fn to_string(args: &[Value]) -> Value {
    let arg = match args {
        [arg] => arg,
        _ => return wrong_arg_count("string", 1, args.len()),
    };
    match arg {
        Value::String(_) | Value::Error(_) => arg.clone(),
        Value::Null | Value::Bool(_) | Value::Number(_) => Value::String(arg.to_string()),
        other => no_such_overload("string", other),
    }
}

#[cfg(test)]
mod test_string {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_string() {
        vec![
            (Value::Null, "null"),
            (Value::from(true), "true"),
            (Value::from(512), "512"),
            (Value::from(-0.25), "-0.25"),
            (Value::from("nginx:1.23.1"), "nginx:1.23.1"),
        ]
        .into_iter()
        .for_each(|(arg, exp)| assert_eq!(to_string(&[arg]), Value::from(exp)))
    }

    #[test]
    fn test_to_string_containers() {
        to_string(&[Value::from(json!([]))]).as_error().unwrap();
        to_string(&[Value::from(json!({}))]).as_error().unwrap();
    }
}

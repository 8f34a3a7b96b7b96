use std::convert::TryFrom;
use std::sync::Arc;
use std::thread;

use serde_json::{json, Value as JsonValue};

use celjson::adapter::{adapt, adapt_eager};
use celjson::{
    register_json_parse, Activation, Binding, Env, Error, ErrorKind, Overload, Type, Value,
};

fn json_env() -> Env {
    register_json_parse(Env::with_builtins().unwrap()).unwrap()
}

fn eval(expression: &str) -> Value {
    json_env()
        .compile(expression)
        .unwrap()
        .evaluate(&Activation::new())
}

/// Wrap JSON text in a single-quoted string literal
fn quoted(text: &str) -> String {
    format!("json_parse('{}')", text.replace('\\', "\\\\").replace('\'', "\\'"))
}

#[test]
fn test_empty_containers() {
    let res = eval("json_parse('{}')");
    assert_eq!(res.as_map().unwrap().len(), 0);
    let res = eval("json_parse('[]')");
    assert_eq!(res.as_list().unwrap().len(), 0);
}

#[test]
fn test_object_entries() {
    let res = eval(r#"json_parse('{"cpu":512,"essential":true}')"#);
    let map = res.as_map().unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(map.get("cpu"), Some(Value::Number(512.0)));
    assert_eq!(map.get("essential"), Some(Value::Bool(true)));
    assert_eq!(map.keys().collect::<Vec<_>>(), vec!["cpu", "essential"]);
}

#[test]
fn test_array_elements() {
    let res = eval(r#"json_parse('[42,"text",true]')"#);
    let items = res.as_list().unwrap().iter().collect::<Vec<_>>();
    assert_eq!(
        items,
        vec![
            Value::Number(42.0),
            Value::String("text".into()),
            Value::Bool(true)
        ]
    );
}

#[test]
fn test_null() {
    assert!(eval("json_parse('null')").is_null());
    assert_eq!(eval("json_parse('null')"), celjson::NULL);
}

#[test]
fn test_nested_access() {
    assert_eq!(
        eval(r#"json_parse('{"a":[1,2,{"b":3}]}').a[2].b"#),
        Value::Number(3.0)
    );
    assert_eq!(
        eval(r#"json_parse('{"a":[1,2,{"b":3}]}')['a'][2]['b'] == 3"#),
        Value::Bool(true)
    );
}

#[test]
fn test_truncated_input() {
    let res = eval(r#"json_parse('{"x":')"#);
    let err = res.as_error().unwrap();
    assert_eq!(err.kind(), ErrorKind::InvalidJson);
    assert!(
        err.message().contains("EOF while parsing"),
        "unexpected message: {}",
        err.message()
    );
}

#[test]
fn test_malformed_input_is_a_value() {
    vec!["not json", "{", "[1,", "\"open", "{\"a\" 1}", "01", "", "[1] [2]"]
        .into_iter()
        .for_each(|text| {
            println!("json_parse({:?})", text);
            let res = eval(&quoted(text));
            assert_eq!(res.as_error().unwrap().kind(), ErrorKind::InvalidJson);
        })
}

#[test]
fn test_scalars_match_direct_construction() {
    vec![
        json!(null),
        json!(true),
        json!(false),
        json!(0),
        json!(-17),
        json!(2.5),
        json!(1e300),
        json!(""),
        json!("with 'quotes' and \\ slashes"),
        json!("ünïcödé ✓"),
    ]
    .into_iter()
    .for_each(|scalar| {
        let text = scalar.to_string();
        println!("json_parse({})", text);
        assert_eq!(eval(&quoted(&text)), Value::from(scalar));
    })
}

#[test]
fn test_lazy_matches_eager() {
    vec![
        json!([1, [2, [3, [4]]], {"a": null}]),
        json!({"z": {"y": {"x": [true, false]}}, "a": "b"}),
        json!([{"name": "task1"}, {"name": "task2"}]),
    ]
    .into_iter()
    .for_each(|doc| {
        let native = celjson::json::parse(&doc.to_string()).unwrap();
        let lazy = adapt(&native);
        let eager = adapt_eager(&native);
        assert_eq!(lazy, eager);
        assert_eq!(lazy, Value::from(doc.clone()));
        assert_eq!(lazy.to_json().unwrap(), doc);
    })
}

#[test]
fn test_lazy_access_matches_eager_access() {
    let text = r#"{"a":[1,2,{"b":3}],"c":{"d":[true]}}"#;
    let native = celjson::json::parse(text).unwrap();
    let eager = adapt_eager(&native);
    vec![".a[2].b", ".a[0]", ".c.d", ".c.d[0]", ".c"]
        .into_iter()
        .for_each(|path| {
            let expression = format!("json_parse('{}'){}", text, path);
            let program = json_env()
                .variable("doc", Type::Dyn)
                .compile(&format!("doc{}", path))
                .unwrap();
            let expected = program.evaluate(&Activation::new().with("doc", eager.clone()));
            println!("{} -> {}", expression, expected);
            assert_eq!(eval(&expression), expected);
        })
}

#[test]
fn test_idempotent() {
    let program = json_env()
        .compile(r#"json_parse('{"a":[1,2,{"b":3}],"s":"x"}')"#)
        .unwrap();
    let first = program.evaluate(&Activation::new());
    let second = program.evaluate(&Activation::new());
    assert_eq!(first, second);
    assert_eq!(
        first.to_json().unwrap(),
        json!({"a": [1, 2, {"b": 3}], "s": "x"})
    );
}

#[test]
fn test_non_string_argument() {
    vec![Value::from(42), Value::Null, Value::from(true), Value::from(json!([]))]
        .into_iter()
        .for_each(|arg| {
            let res = celjson::json_parse(&arg);
            let err = res.as_error().unwrap();
            assert_eq!(err.kind(), ErrorKind::NoMatchingOverload);
            assert!(err.message().contains("expected a string"));
        })
}

#[test]
fn test_dyn_argument_checked_at_runtime() {
    let res = eval("json_parse(json_parse('42'))");
    let err = res.as_error().unwrap();
    assert_eq!(err.kind(), ErrorKind::NoMatchingOverload);
    assert!(err.message().contains("number"), "{}", err.message());

    // The inner string parses, and its result is a string again.
    assert_eq!(
        eval(r#"json_parse(json_parse('"[1, 2]"'))[1]"#),
        Value::Number(2.0)
    );
}

#[test]
fn test_string_literal_argument_is_required() {
    match json_env().compile("json_parse(42)") {
        Err(Error::NoMatchingOverload { name, .. }) => assert_eq!(name, "json_parse"),
        other => panic!("unexpected result {:?}", other),
    }
}

#[test]
fn test_duplicate_declaration() {
    match register_json_parse(json_env()) {
        Err(Error::InvalidDeclaration { name, overload, .. }) => {
            assert_eq!(name, "json_parse");
            assert_eq!(overload, "json_parse_string");
        }
        other => panic!("unexpected result {:?}", other),
    }

    // Same parameters under a new overload id
    let res = json_env().function(
        "json_parse",
        Overload::new(
            "json_parse_text",
            vec![Type::String],
            Type::Map,
            Binding::unary(|_| Value::Null),
        ),
    );
    assert!(matches!(res, Err(Error::InvalidDeclaration { .. })));
}

fn describe_env() -> Env {
    Env::new()
        .function(
            "describe",
            Overload::new(
                "describe_string",
                vec![Type::String],
                Type::String,
                Binding::unary(|_| Value::from("string")),
            ),
        )
        .unwrap()
        .function(
            "describe",
            Overload::new(
                "describe_number",
                vec![Type::Number],
                Type::String,
                Binding::unary(|_| Value::from("number")),
            ),
        )
        .unwrap()
        .variable("x", Type::Dyn)
}

#[test]
fn test_overload_resolution() {
    let env = describe_env();
    vec![("describe('a')", "string"), ("describe(1)", "number")]
        .into_iter()
        .for_each(|(expression, exp)| {
            let res = env.compile(expression).unwrap().evaluate(&Activation::new());
            assert_eq!(res, Value::from(exp));
        });

    match env.compile("describe(x)") {
        Err(Error::AmbiguousOverload { name, .. }) => assert_eq!(name, "describe"),
        other => panic!("unexpected result {:?}", other),
    }
    assert!(matches!(
        env.compile("describe(true)"),
        Err(Error::NoMatchingOverload { .. })
    ));
    assert!(matches!(
        env.compile("nope(1)"),
        Err(Error::UnknownFunction(_))
    ));
}

#[test]
fn test_errors_are_absorbing() {
    vec![
        r#"json_parse('{').a"#,
        r#"json_parse('{')[0]"#,
        r#"size(json_parse('{'))"#,
        r#"string(json_parse('{'))"#,
        r#"[1, json_parse('{')]"#,
        r#"json_parse('{') == 1"#,
    ]
    .into_iter()
    .for_each(|expression| {
        println!("{}", expression);
        let res = eval(expression);
        assert_eq!(res.as_error().unwrap().kind(), ErrorKind::InvalidJson);
    })
}

#[test]
fn test_access_errors() {
    vec![
        (r#"json_parse('{"a": 1}').b"#, ErrorKind::NoSuchKey),
        (r#"json_parse('[1]')[1]"#, ErrorKind::InvalidIndex),
        (r#"json_parse('[1]')[0.5]"#, ErrorKind::InvalidIndex),
        (r#"json_parse('1').a"#, ErrorKind::NoMatchingOverload),
    ]
    .into_iter()
    .for_each(|(expression, kind)| {
        println!("{}", expression);
        assert_eq!(eval(expression).as_error().unwrap().kind(), kind);
    })
}

#[test]
fn test_evaluate_with_data() {
    let data = json!({"task": "{\"cpu\": 512, \"tags\": [\"a\", \"b\"]}"});
    assert_eq!(
        celjson::evaluate("size(json_parse(task).tags)", &data).unwrap(),
        Value::Number(2.0)
    );
    assert!(matches!(
        celjson::evaluate("missing", &data),
        Err(Error::UndeclaredReference(_))
    ));
    assert!(matches!(
        celjson::evaluate("1", &json!([1])),
        Err(Error::InvalidVarMap(_))
    ));
}

#[test]
fn test_to_json_rejects_errors() {
    let res = eval("json_parse('nope')");
    assert!(res.to_json().is_err());
}

#[test]
fn test_concurrent_evaluation() {
    let env = Arc::new(json_env().variable("doc", Type::Dyn));
    let program = Arc::new(env.compile("json_parse(doc).n").unwrap());
    let handles = (0..8)
        .map(|i| {
            let program = Arc::clone(&program);
            let env = Arc::clone(&env);
            thread::spawn(move || {
                let text = JsonValue::from(json!({ "n": i }).to_string());
                let activation = Activation::try_from(&json!({ "doc": text })).unwrap();
                let shared = program.evaluate(&activation);
                let local = env.compile("json_parse(doc).n").unwrap().evaluate(&activation);
                (i, shared, local)
            })
        })
        .collect::<Vec<_>>();
    handles.into_iter().for_each(|handle| {
        let (i, shared, local) = handle.join().unwrap();
        assert_eq!(shared, Value::from(i));
        assert_eq!(local, Value::from(i));
    })
}

#[test]
fn test_deeply_nested_expression_is_a_compile_error() {
    let env = json_env();
    vec![260, 1000, 100_000].into_iter().for_each(|depth| {
        let text = format!("{}json_parse('1'){}", "(".repeat(depth), ")".repeat(depth));
        match env.compile(&text) {
            Err(Error::Parse(celjson::ParseError::NestingTooDeep(_))) => (),
            other => panic!("depth {}: unexpected result {:?}", depth, other),
        }
    });

    let text = format!("{}json_parse('1'){}", "(".repeat(200), ")".repeat(200));
    let res = env.compile(&text).unwrap().evaluate(&Activation::new());
    assert_eq!(res, Value::Number(1.0));
}

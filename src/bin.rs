use std::io;
use std::io::Read;

use anyhow::{bail, Context, Result};
use clap::{App, Arg};
use serde_json::Value as JsonValue;

use celjson;

fn configure_args<'a, 'b>(app: App<'a, 'b>) -> App<'a, 'b> {
    app.version(env!("CARGO_PKG_VERSION"))
        .author("Matthew Planchard <msplanchard@gmail.com>")
        .about(
            "Evaluate an expression that may call json_parse().\n\
            \n\
            Variables are bound from <data>, a JSON object. When <data> \n\
            is -, read it from stdin. When it is omitted, no variables \n\
            are bound.\n\
            \n\
            The result is written to stdout as JSON. An expression that \n\
            evaluates to an error value exits non-zero.",
        )
        .arg(
            Arg::with_name("expression")
                .help("The expression to evaluate")
                .required(true)
                .takes_value(true),
        )
        .arg(
            Arg::with_name("data")
                .help("A JSON object of variables. May be provided as stdin.")
                .required(false)
                .takes_value(true),
        )
        .after_help(
            r#"EXAMPLES:
    celjson "json_parse('{\"cpu\":512,\"essential\":true}')"
    celjson "json_parse(task).portMappings[0].hostPort" '{"task": "{\"portMappings\":[{\"hostPort\":80}]}"}'
    echo '{"doc": "[1, 2, 3]"}' | celjson "size(json_parse(doc))" -

Set RUST_LOG=debug to see declarations and compilation."#,
        )
}

fn main() -> Result<()> {
    env_logger::init();

    let app = configure_args(App::new("celjson"));
    let matches = app.get_matches();

    let expression = matches
        .value_of("expression")
        .context("expression arg expected")?;

    let data = match matches.value_of("data") {
        None => String::from("null"),
        Some("-") => {
            let mut data = String::new();
            io::stdin().lock().read_to_string(&mut data)?;
            data
        }
        Some(data) => data.to_string(),
    };
    let json_data: JsonValue =
        serde_json::from_str(&data).context("Could not parse data as JSON")?;

    let result = celjson::evaluate(expression, &json_data)
        .context("Could not compile expression")?;

    if let Some(err) = result.as_error() {
        bail!("Expression evaluated to an error: {}", err);
    }

    println!("{}", result.to_json()?);

    Ok(())
}

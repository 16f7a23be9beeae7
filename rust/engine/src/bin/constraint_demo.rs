//! Demo server with schema constraints on all four request fields.
//!
//! Reads an optional `EngineConfig` JSON document from `CONSTRAINT_DEMO_CONFIG`.

use schema_constraint::{discriminator_fn, BoxError, HttpRequest, OptionValue, RawOptions};
use schema_constraint_engine::{App, EngineConfig, HttpResponse, HttpServer};
use serde_json::json;
use std::error::Error;
use std::sync::Arc;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let addr = std::env::args().nth(1).unwrap_or_else(|| "127.0.0.1:8080".to_string());
    let config: EngineConfig = match std::env::var("CONSTRAINT_DEMO_CONFIG") {
        Ok(raw) => serde_json::from_str(&raw)?,
        Err(_) => EngineConfig::default(),
    };

    let mut app = App::with_config(config);
    let options = RawOptions::from_json(&json!({
        "body": { "statusCode": 412, "errorMessage": "This constraint return only #schema1" }
    }))
    .set(
        "body",
        "constraint",
        OptionValue::function(discriminator_fn(|_: &HttpRequest| Ok::<_, BoxError>("#schema1"))),
    )
    .set(
        "querystring",
        "constraint",
        OptionValue::function(discriminator_fn(|req: &HttpRequest| {
            Ok::<_, BoxError>(req.query_params.get("schemaNumber").map(|n| format!("#schema{n}")))
        })),
    )
    .set(
        "params",
        "constraint",
        OptionValue::function(discriminator_fn(|req: &HttpRequest| {
            Ok::<_, BoxError>(req.path_params.get("schemaNumber").map(|n| format!("#schema{n}")))
        })),
    )
    .set(
        "headers",
        "constraint",
        OptionValue::function(discriminator_fn(|req: &HttpRequest| {
            Ok::<_, BoxError>(req.header("schemanumber").map(|n| format!("#schema{n}")))
        })),
    );
    app.register_raw(options)?;

    let variants = json!({
        "oneOf": [
            { "$id": "#schema1", "type": "object", "required": ["mul5"], "properties": { "mul5": { "type": "number", "multipleOf": 5 }, "schemaNumber": { "type": "number" } } },
            { "$id": "#schema2", "type": "object", "required": ["mul3"], "properties": { "mul3": { "type": "number", "multipleOf": 3 }, "schemaNumber": { "type": "number" } } },
            { "$id": "#schema3", "type": "object", "required": ["mul2"], "properties": { "mul2": { "type": "number", "multipleOf": 2 }, "schemaNumber": { "type": "number" } } }
        ]
    });
    app.route(
        "POST",
        "/:schemaNumber/:mul5",
        &json!({
            "body": variants,
            "querystring": variants,
            "params": variants,
            "headers": variants,
        }),
        |_: &HttpRequest| HttpResponse::text(200, "hi"),
    )?;
    app.route("GET", "/health", &serde_json::Value::Null, |_: &HttpRequest| {
        HttpResponse::json(200, json!({ "status": "ok" }))
    })?;

    let mut server = HttpServer::new(Arc::new(app));
    let bound = server.serve(addr.as_str())?;
    println!("constraint demo listening on http://{bound} (press Enter to stop)");

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    server.shutdown();
    Ok(())
}

//! Interceptor throughput: warm checks, cold compiles and routing.
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use schema_constraint::routing::parse_route_pattern;
use schema_constraint::{
    discriminator_fn, BoxError, ConstraintOptions, FieldOptions, HttpMethod, HttpRequest,
    RouteMatcher, RouteSchema, SchemaConstraint,
};
use serde_json::json;
use std::time::Duration;

fn route_schema() -> RouteSchema {
    let variants = json!({
        "oneOf": [
            { "$id": "schema1", "type": "object", "required": ["mul5"], "properties": { "mul5": { "type": "number", "multipleOf": 5 } } },
            { "$id": "schema2", "type": "object", "required": ["mul3"], "properties": { "mul3": { "type": "number", "multipleOf": 3 } } }
        ]
    });
    RouteSchema::from_json(&json!({ "body": variants, "querystring": variants })).unwrap()
}

fn interceptor() -> SchemaConstraint {
    let body = FieldOptions::new().constraint(discriminator_fn(|request: &HttpRequest| {
        Ok::<_, BoxError>(request.header("x-variant").map(str::to_string))
    }));
    let querystring =
        FieldOptions::new().constraint(discriminator_fn(|_: &HttpRequest| Ok::<_, BoxError>("schema2")));
    let options = ConstraintOptions::builder()
        .body(body)
        .querystring(querystring)
        .build()
        .unwrap();
    SchemaConstraint::new(options)
}

fn benchmark_intercept(c: &mut Criterion) {
    let mut group = c.benchmark_group("intercept");
    group.measurement_time(Duration::from_secs(10));

    let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
    let interceptor = interceptor();
    let schema = route_schema();

    // Warm cache: every variant already compiled
    let requests = [
        ("unconstrained", HttpRequest::new(HttpMethod::POST, "/").with_query("mul3", "9")),
        (
            "body_and_query",
            HttpRequest::new(HttpMethod::POST, "/")
                .with_header("x-variant", "schema1")
                .with_json(json!({"mul5": 25}))
                .with_query("mul3", "9"),
        ),
        (
            "rejected",
            HttpRequest::new(HttpMethod::POST, "/")
                .with_header("x-variant", "schema1")
                .with_json(json!({"mul5": 7})),
        ),
    ];

    for (name, request) in requests.iter() {
        group.bench_with_input(BenchmarkId::new("check", name), request, |b, request| {
            b.iter(|| {
                let result = runtime.block_on(interceptor.check(black_box(request), &schema));
                black_box(result)
            });
        });
    }

    group.finish();
}

fn benchmark_cold_compile(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
    let schema = route_schema();
    let request = HttpRequest::new(HttpMethod::POST, "/")
        .with_header("x-variant", "schema1")
        .with_json(json!({"mul5": 25}))
        .with_query("mul3", "9");

    c.bench_function("check_cold_cache", |b| {
        b.iter(|| {
            let interceptor = interceptor();
            let result = runtime.block_on(interceptor.check(black_box(&request), &schema));
            black_box(result)
        });
    });
}

fn benchmark_routing(c: &mut Criterion) {
    let mut group = c.benchmark_group("routing");

    let mut matcher = RouteMatcher::new();
    for i in 0..100 {
        let route = parse_route_pattern(
            &format!("/api/v{}/users/{{user_id}}/posts/:post_id", i),
            "GET",
            &format!("handler_{}", i),
            route_schema(),
        )
        .unwrap();
        matcher.add_route(route);
    }

    group.bench_function("match_route_last", |b| {
        b.iter(|| {
            let result = matcher.match_route(black_box("/api/v99/users/123/posts/456"), HttpMethod::GET);
            black_box(result)
        });
    });

    group.bench_function("match_route_miss", |b| {
        b.iter(|| {
            let result = matcher.match_route(black_box("/unknown"), HttpMethod::GET);
            black_box(result)
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_intercept, benchmark_cold_compile, benchmark_routing);
criterion_main!(benches);

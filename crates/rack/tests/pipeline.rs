//! End-to-end invocation tests.
//!
//! Each test feeds a raw event payload through a [`Rack`] and inspects the
//! encoded response (or the abort).

use anyhow::anyhow;
use http::{HeaderValue, StatusCode};
use rack::prelude::*;
use rack::settings::{EventSource, RackSettings};
use rack::InvocationError;
use rack_events::{fixtures, EventError, StaticResolver};
use serde::Deserialize;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
struct Payload {
    key: String,
}

/// The HTTP API fixture with its body replaced.
fn v2_request(body: &str) -> Vec<u8> {
    let mut event: Value = serde_json::from_str(fixtures::API_GATEWAY_V2).unwrap();
    event["body"] = Value::from(body);
    serde_json::to_vec(&event).unwrap()
}

async fn invoke(rack: &Rack, payload: &[u8]) -> Result<Value, InvocationError> {
    let out = rack.invoke(Invocation::new(), payload).await?;
    Ok(serde_json::from_slice(&out).unwrap())
}

async fn conflict(_ctx: Context) -> HandlerResult {
    Err(StatusError::wrap(StatusCode::CONFLICT, std::io::Error::other("error")).into())
}

async fn fail(_ctx: Context) -> HandlerResult {
    Err(anyhow!("error"))
}

async fn nothing(_ctx: Context) -> HandlerResult {
    Ok(())
}

async fn echo_key(ctx: Context) -> HandlerResult {
    let mut payload = Payload::default();
    ctx.bind(&mut payload)?;
    ctx.string(StatusCode::OK, payload.key)
}

async fn body(ctx: Context) -> HandlerResult {
    ctx.string(StatusCode::OK, "body")
}

async fn reraise(_ctx: Context, err: anyhow::Error) -> HandlerResult {
    Err(err)
}

// ---------------------------------------------------------------------------
// Default config
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_invalid_payload_aborts() {
    let rack = Rack::new(nothing);

    let err = invoke(&rack, b"{").await.unwrap_err();
    assert!(matches!(
        err,
        InvocationError::Event(EventError::UnsupportedEventType)
    ));
    assert_eq!(err.stage(), "resolve");
}

#[tokio::test]
async fn test_unclaimed_payload_aborts() {
    let rack = Rack::new(nothing);

    let err = invoke(&rack, br#"{"Records": []}"#).await.unwrap_err();
    assert!(matches!(
        err,
        InvocationError::Event(EventError::UnsupportedEventType)
    ));
}

#[tokio::test]
async fn test_handler_error_becomes_response() {
    let rack = Rack::new(conflict);

    let out = invoke(&rack, &v2_request("")).await.unwrap();
    assert_eq!(out["statusCode"], 409);
    assert_eq!(out["body"], r#"{"message":"error"}"#);
    assert_eq!(out["headers"]["content-type"], "application/json");
    assert_eq!(
        out["multiValueHeaders"]["content-type"],
        serde_json::json!(["application/json"])
    );
}

#[tokio::test]
async fn test_plain_error_is_500() {
    let rack = Rack::new(fail);

    let out = invoke(&rack, &v2_request("")).await.unwrap();
    assert_eq!(out["statusCode"], 500);
    assert_eq!(out["body"], r#"{"message":"error"}"#);
}

#[tokio::test]
async fn test_default_response_when_nothing_written() {
    let rack = Rack::new(nothing);

    let out = invoke(&rack, &v2_request("")).await.unwrap();
    assert_eq!(out["statusCode"], 200);
    assert_eq!(out["body"], "");
    assert_eq!(out["headers"], serde_json::json!({}));
}

#[tokio::test]
async fn test_bound_body_is_echoed() {
    let rack = Rack::new(echo_key);

    let out = invoke(&rack, &v2_request(r#"{"key":"value"}"#))
        .await
        .unwrap();
    assert_eq!(out["statusCode"], 200);
    assert_eq!(out["body"], "value");
    assert_eq!(out["headers"]["content-type"], "text/plain");
}

#[tokio::test]
async fn test_malformed_body_is_400() {
    let rack = Rack::new(echo_key);

    let out = invoke(&rack, &v2_request("{not json")).await.unwrap();
    assert_eq!(out["statusCode"], 400);
}

#[tokio::test]
async fn test_every_format_round_trips() {
    let rack = Rack::new(body);

    for (payload, format) in [
        (fixtures::API_GATEWAY_PROXY, "api_gateway_proxy"),
        (fixtures::API_GATEWAY_V2, "api_gateway_v2"),
        (fixtures::ALB_SINGLE_VALUE, "alb"),
        (fixtures::ALB_MULTI_VALUE, "alb"),
    ] {
        let out = invoke(&rack, payload.as_bytes()).await.unwrap();
        assert_eq!(out["statusCode"], 200, "{format}");
        assert_eq!(out["body"], "body", "{format}");
        assert_eq!(out["isBase64Encoded"], false, "{format}");
    }

    let out = invoke(&rack, fixtures::ALB_SINGLE_VALUE.as_bytes())
        .await
        .unwrap();
    assert_eq!(out["statusDescription"], "OK");
}

#[tokio::test]
async fn test_handler_sees_canonical_request() {
    async fn inspect(ctx: Context) -> HandlerResult {
        let req = ctx.request();
        assert_eq!(req.method, "GET");
        assert_eq!(req.raw_path, "/resource/");
        assert_eq!(ctx.query("q1"), "v1");
        assert_eq!(req.headers["x-custom-header1"], "v1");
        ctx.no_content(StatusCode::NO_CONTENT)
    }

    let rack = Rack::new(inspect);
    for payload in [
        fixtures::API_GATEWAY_PROXY,
        fixtures::API_GATEWAY_V2,
        fixtures::ALB_MULTI_VALUE,
    ] {
        let out = invoke(&rack, payload.as_bytes()).await.unwrap();
        assert_eq!(out["statusCode"], 204);
    }
}

// ---------------------------------------------------------------------------
// Custom config
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_static_resolver_decode_failure_aborts() {
    let config = Config::new().with_format(EventFormat::ApiGatewayV2);
    let rack = Rack::with_config(config, nothing);

    let err = invoke(&rack, b"{").await.unwrap_err();
    assert!(matches!(
        err,
        InvocationError::Event(EventError::Decode { .. })
    ));
    assert_eq!(err.stage(), "decode");
}

#[tokio::test]
async fn test_reraising_error_handler_aborts() {
    let config = Config::new().with_error_handler(reraise);
    let rack = Rack::with_config(config, fail);

    let err = invoke(&rack, &v2_request("")).await.unwrap_err();
    assert!(matches!(err, InvocationError::Handler(_)));
    assert_eq!(err.to_string(), "error");
}

#[tokio::test]
async fn test_bind_hook_error_becomes_500() {
    let config = Config::new().with_bind_hook(|_ctx, _target| Err(anyhow!("error")));
    let rack = Rack::with_config(config, echo_key);

    let out = invoke(&rack, &v2_request(r#"{"key":"value"}"#))
        .await
        .unwrap();
    assert_eq!(out["statusCode"], 500);
    assert_eq!(out["body"], r#"{"message":"error"}"#);
}

#[tokio::test]
async fn test_bind_hook_sees_bound_value() {
    let config = Config::new().with_bind_hook(|_ctx, target| {
        let payload = target
            .downcast_ref::<Payload>()
            .ok_or_else(|| anyhow!("unexpected target"))?;
        if payload.key.is_empty() {
            return Err(StatusError::new(StatusCode::UNPROCESSABLE_ENTITY, "key is empty").into());
        }
        Ok(())
    });
    let rack = Rack::with_config(config, echo_key);

    let out = invoke(&rack, &v2_request(r#"{"key":""}"#)).await.unwrap();
    assert_eq!(out["statusCode"], 422);
    assert_eq!(out["body"], r#"{"message":"key is empty"}"#);
}

#[tokio::test]
async fn test_failing_empty_response_aborts_through_error_handler() {
    let config = Config::new()
        .with_error_handler(reraise)
        .with_empty_response(fail);
    let rack = Rack::with_config(config, nothing);

    let err = invoke(&rack, &v2_request("")).await.unwrap_err();
    assert!(matches!(err, InvocationError::Handler(_)));
}

#[tokio::test]
async fn test_failing_empty_response_is_recovered() {
    let config = Config::new().with_empty_response(conflict);
    let rack = Rack::with_config(config, nothing);

    let out = invoke(&rack, &v2_request("")).await.unwrap();
    assert_eq!(out["statusCode"], 409);
}

#[tokio::test]
async fn test_empty_response_runs_after_silent_error_handler() {
    async fn swallow(_ctx: Context, _err: anyhow::Error) -> HandlerResult {
        Ok(())
    }

    async fn accepted(ctx: Context) -> HandlerResult {
        ctx.no_content(StatusCode::ACCEPTED)
    }

    let config = Config::new()
        .with_error_handler(swallow)
        .with_empty_response(accepted);
    let rack = Rack::with_config(config, fail);

    let out = invoke(&rack, &v2_request("")).await.unwrap();
    assert_eq!(out["statusCode"], 202);
}

#[tokio::test]
async fn test_empty_response_skipped_when_written() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counted = Arc::clone(&calls);
    let config = Config::new().with_empty_response(move |ctx: Context| {
        let counted = Arc::clone(&counted);
        async move {
            counted.fetch_add(1, Ordering::SeqCst);
            ctx.no_content(StatusCode::OK)
        }
    });
    let rack = Rack::with_config(config, body);

    invoke(&rack, &v2_request("")).await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_middleware_sets_header() {
    let config = Config::new().with_middleware(FnMiddleware::new(
        "custom_header",
        |ctx: Context, next: Next| async move {
            ctx.response_mut()
                .headers
                .insert("x-custom-header", HeaderValue::from_static("header"));
            next.run(ctx).await
        },
    ));
    let rack = Rack::with_config(config, body);

    let out = invoke(&rack, &v2_request("")).await.unwrap();
    assert_eq!(out["body"], "body");
    assert_eq!(out["headers"]["x-custom-header"], "header");
    assert_eq!(out["headers"]["content-type"], "text/plain");
}

#[tokio::test]
async fn test_middleware_error_is_recovered() {
    let config = Config::new().with_middleware(FnMiddleware::new(
        "deny",
        |_ctx: Context, _next: Next| async move {
            HandlerResult::Err(StatusError::new(StatusCode::FORBIDDEN, "denied").into())
        },
    ));
    let rack = Rack::with_config(config, body);

    let out = invoke(&rack, &v2_request("")).await.unwrap();
    assert_eq!(out["statusCode"], 403);
    assert_eq!(out["body"], r#"{"message":"denied"}"#);
}

#[tokio::test]
async fn test_custom_resolver() {
    let config = Config::new().with_resolver(StaticResolver::from(EventFormat::Alb));
    let rack = Rack::with_config(config, body);

    let out = invoke(&rack, fixtures::API_GATEWAY_V2.as_bytes())
        .await
        .unwrap();
    assert_eq!(out["statusDescription"], "OK");
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_from_settings_echoes_request_id() {
    let settings = RackSettings {
        event_source: EventSource::ApiGatewayProxy,
        ..RackSettings::default()
    };
    let rack = Rack::with_config(Config::from_settings(&settings), body);

    let out = rack
        .invoke(
            Invocation::new().with_request_id("c6af9ac6"),
            fixtures::API_GATEWAY_PROXY.as_bytes(),
        )
        .await
        .unwrap();
    let out: Value = serde_json::from_slice(&out).unwrap();

    assert_eq!(out["headers"]["x-request-id"], "c6af9ac6");
    assert_eq!(out["body"], "body");
}

#[tokio::test]
async fn test_concurrent_invocations_are_isolated() {
    let rack = Rack::new(echo_key);

    let tasks: Vec<_> = (0..16)
        .map(|i| {
            let rack = rack.clone();
            tokio::spawn(async move {
                let payload = v2_request(&format!(r#"{{"key":"{i}"}}"#));
                (i, invoke(&rack, &payload).await.unwrap())
            })
        })
        .collect();

    for task in tasks {
        let (i, out) = task.await.unwrap();
        assert_eq!(out["body"], i.to_string());
    }
}

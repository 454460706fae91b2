//! Policies used when [`Config`](crate::Config) leaves a slot empty.

use http::StatusCode;
use rack_core::{status_code, Context, HandlerResult};
use serde::Serialize;
use std::any::Any;

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

/// Writes the error's status code and `{"message": "<error>"}`.
///
/// The status comes from the first [`StatusError`](rack_core::StatusError) in
/// the cause chain, or 500.
pub async fn error_handler(ctx: Context, err: anyhow::Error) -> HandlerResult {
    let body = ErrorBody {
        message: err.to_string(),
    };
    ctx.json(status_code(&err), &body)
}

/// Responds `200 OK` with no body.
pub async fn empty_response(ctx: Context) -> HandlerResult {
    ctx.no_content(StatusCode::OK)
}

/// Accepts every bound value.
pub fn accept_bound(_ctx: &Context, _target: &dyn Any) -> HandlerResult {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rack_core::{Invocation, Request, StatusError};

    fn ctx() -> Context {
        Context::new(Invocation::new(), Request::new("GET", "/"))
    }

    #[tokio::test]
    async fn test_error_handler_uses_status_error() {
        let ctx = ctx();
        error_handler(ctx.clone(), StatusError::new(StatusCode::CONFLICT, "error").into())
            .await
            .unwrap();

        let res = ctx.response();
        assert_eq!(res.status, Some(StatusCode::CONFLICT));
        assert_eq!(res.body, r#"{"message":"error"}"#);
        assert_eq!(res.headers["content-type"], "application/json");
    }

    #[tokio::test]
    async fn test_error_handler_defaults_to_500() {
        let ctx = ctx();
        error_handler(ctx.clone(), anyhow::anyhow!("database unavailable"))
            .await
            .unwrap();

        let res = ctx.response();
        assert_eq!(res.status, Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert_eq!(res.body, r#"{"message":"database unavailable"}"#);
    }

    #[tokio::test]
    async fn test_empty_response() {
        let ctx = ctx();
        empty_response(ctx.clone()).await.unwrap();

        let res = ctx.response();
        assert_eq!(res.status, Some(StatusCode::OK));
        assert!(res.body.is_empty());
    }
}

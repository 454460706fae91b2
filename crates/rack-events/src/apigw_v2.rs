//! API Gateway HTTP API (payload format 2.0).
//!
//! Matches when `version` is `"2.0"` and `requestContext.apiId` is present.
//! Headers arrive single-valued; query values carry repeated parameters joined
//! with commas and are split back apart on decode.

use crate::processor::{encode, Processor};
use crate::probe::Probe;
use crate::wire::{collect_query, wire_headers};
use crate::EventError;
use aws_lambda_events::apigw::{ApiGatewayV2httpRequest, ApiGatewayV2httpResponse};
use aws_lambda_events::encodings::Body;
use http::header::{HeaderValue, COOKIE};
use rack_core::{Event, Request, Response};

/// Processor for [`ApiGatewayV2httpRequest`] events.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiGatewayV2Processor;

impl ApiGatewayV2Processor {
    /// Processor name.
    pub const NAME: &'static str = "api_gateway_v2";
}

impl Processor for ApiGatewayV2Processor {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn can_process(&self, payload: &[u8]) -> bool {
        Probe::read(payload).is_some_and(|p| p.version.is("2.0") && p.request_context.api_id.present)
    }

    fn decode_request(&self, payload: &[u8]) -> Result<Request, EventError> {
        let event: ApiGatewayV2httpRequest =
            serde_json::from_slice(payload).map_err(|e| EventError::decode(Self::NAME, e))?;

        let mut headers = event.headers.clone();
        let cookies = event.cookies.as_deref().unwrap_or_default();
        if !cookies.is_empty() && !headers.contains_key(COOKIE) {
            match HeaderValue::from_str(&cookies.join("; ")) {
                Ok(value) => {
                    headers.insert(COOKIE, value);
                }
                Err(err) => {
                    tracing::warn!(format = Self::NAME, error = %err, "skipping invalid cookies");
                }
            }
        }

        let query = collect_query(
            event
                .query_string_parameters
                .iter()
                .flat_map(|(key, joined)| joined.split(',').map(move |value| (key, value))),
        );

        let http = &event.request_context.http;
        Ok(Request {
            method: http.method.as_str().to_string(),
            raw_path: http.path.clone().unwrap_or_default(),
            path: event.path_parameters.clone(),
            query,
            headers,
            body: event.body.clone().unwrap_or_default(),
            event: Event::new(event),
        })
    }

    fn encode_response(&self, response: &Response) -> Result<Vec<u8>, EventError> {
        let headers = wire_headers(Self::NAME, &response.headers);

        encode(
            Self::NAME,
            &ApiGatewayV2httpResponse {
                status_code: i64::from(response.status_u16()),
                headers: headers.clone(),
                multi_value_headers: headers,
                body: Some(Body::Text(response.body.clone())),
                is_base64_encoded: false,
                cookies: Vec::new(),
                ..Default::default()
            },
        )
    }
}

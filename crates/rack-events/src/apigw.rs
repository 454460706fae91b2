//! API Gateway REST proxy integration (payload format 1.0).
//!
//! Matches when `requestContext.apiId` is present and there is no top-level
//! `version`. Headers and query parameters are taken from the multi-value maps,
//! which API Gateway always populates.

use crate::processor::{encode, Processor};
use crate::probe::Probe;
use crate::wire::{collect_query, wire_headers};
use crate::EventError;
use aws_lambda_events::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use aws_lambda_events::encodings::Body;
use rack_core::{Event, Request, Response};

/// Processor for [`ApiGatewayProxyRequest`] events.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiGatewayProxyProcessor;

impl ApiGatewayProxyProcessor {
    /// Processor name.
    pub const NAME: &'static str = "api_gateway_proxy";
}

impl Processor for ApiGatewayProxyProcessor {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn can_process(&self, payload: &[u8]) -> bool {
        Probe::read(payload)
            .is_some_and(|p| !p.version.present && p.request_context.api_id.present)
    }

    fn decode_request(&self, payload: &[u8]) -> Result<Request, EventError> {
        let event: ApiGatewayProxyRequest =
            serde_json::from_slice(payload).map_err(|e| EventError::decode(Self::NAME, e))?;

        Ok(Request {
            method: event.http_method.as_str().to_string(),
            raw_path: event.path.clone().unwrap_or_default(),
            path: event.path_parameters.clone(),
            query: collect_query(event.multi_value_query_string_parameters.iter()),
            headers: event.multi_value_headers.clone(),
            body: event.body.clone().unwrap_or_default(),
            event: Event::new(event),
        })
    }

    fn encode_response(&self, response: &Response) -> Result<Vec<u8>, EventError> {
        let headers = wire_headers(Self::NAME, &response.headers);

        encode(
            Self::NAME,
            &ApiGatewayProxyResponse {
                status_code: i64::from(response.status_u16()),
                headers: headers.clone(),
                multi_value_headers: headers,
                body: Some(Body::Text(response.body.clone())),
                is_base64_encoded: false,
                ..Default::default()
            },
        )
    }
}

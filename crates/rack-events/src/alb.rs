//! Application Load Balancer target group events.
//!
//! Matches when `requestContext.elb` is present. Depending on the target group
//! setting the balancer sends either the single-value or the multi-value maps;
//! both are merged, single-value entries first.

use crate::processor::{encode, Processor};
use crate::probe::Probe;
use crate::wire::{append_headers, collect_query, wire_headers};
use crate::EventError;
use aws_lambda_events::alb::{AlbTargetGroupRequest, AlbTargetGroupResponse};
use aws_lambda_events::encodings::Body;
use rack_core::{Event, PathParams, Request, Response};

/// Processor for [`AlbTargetGroupRequest`] events.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlbTargetGroupProcessor;

impl AlbTargetGroupProcessor {
    /// Processor name.
    pub const NAME: &'static str = "alb";
}

impl Processor for AlbTargetGroupProcessor {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn can_process(&self, payload: &[u8]) -> bool {
        Probe::read(payload).is_some_and(|p| p.request_context.elb.present)
    }

    fn decode_request(&self, payload: &[u8]) -> Result<Request, EventError> {
        let event: AlbTargetGroupRequest =
            serde_json::from_slice(payload).map_err(|e| EventError::decode(Self::NAME, e))?;

        let mut headers = event.headers.clone();
        append_headers(&mut headers, &event.multi_value_headers);
        let query = collect_query(
            event
                .query_string_parameters
                .iter()
                .chain(event.multi_value_query_string_parameters.iter()),
        );

        Ok(Request {
            method: event.http_method.as_str().to_string(),
            raw_path: event.path.clone().unwrap_or_default(),
            path: PathParams::new(),
            query,
            headers,
            body: event.body.clone().unwrap_or_default(),
            event: Event::new(event),
        })
    }

    fn encode_response(&self, response: &Response) -> Result<Vec<u8>, EventError> {
        let status_description = response
            .status
            .and_then(|status| status.canonical_reason())
            .unwrap_or_default()
            .to_string();
        let headers = wire_headers(Self::NAME, &response.headers);

        encode(
            Self::NAME,
            &AlbTargetGroupResponse {
                status_code: i64::from(response.status_u16()),
                status_description: Some(status_description),
                headers: headers.clone(),
                multi_value_headers: headers,
                body: Some(Body::Text(response.body.clone())),
                is_base64_encoded: false,
                ..Default::default()
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use http::{HeaderValue, StatusCode};
    use serde_json::{json, Value};

    #[test]
    fn test_can_process() {
        let sut = AlbTargetGroupProcessor;
        assert!(sut.can_process(fixtures::ALB_SINGLE_VALUE.as_bytes()));
        assert!(sut.can_process(fixtures::ALB_MULTI_VALUE.as_bytes()));
        assert!(sut.can_process(br#"{"requestContext":{"elb":null}}"#));
        assert!(!sut.can_process(fixtures::API_GATEWAY_PROXY.as_bytes()));
        assert!(!sut.can_process(fixtures::API_GATEWAY_V2.as_bytes()));
    }

    #[test]
    fn test_decode_single_value() {
        let req = AlbTargetGroupProcessor
            .decode_request(fixtures::ALB_SINGLE_VALUE.as_bytes())
            .expect("fixture should decode");

        assert_eq!(req.method, "GET");
        assert_eq!(req.raw_path, "/resource/");
        assert!(req.path.is_empty());
        assert_eq!(req.query["q1"], vec!["v1"]);
        assert_eq!(req.query["q2"], vec!["v2"]);
        assert_eq!(req.headers.get("x-custom-header2").unwrap(), "v2");
        assert_eq!(req.body, "body");
    }

    #[test]
    fn test_decode_multi_value() {
        let req = AlbTargetGroupProcessor
            .decode_request(fixtures::ALB_MULTI_VALUE.as_bytes())
            .expect("fixture should decode");

        assert!(req.path.is_empty());
        assert_eq!(req.query["q2"], vec!["v2", "v3"]);
        let h2: Vec<_> = req.headers.get_all("x-custom-header2").iter().collect();
        assert_eq!(h2, vec!["v2", "v3"]);

        let event = req.event::<AlbTargetGroupRequest>().unwrap();
        assert_eq!(event.request_context.elb.target_group_arn.as_deref(), Some("arn"));
    }

    #[test]
    fn test_decode_merges_single_before_multi() {
        let mut payload: Value = serde_json::from_str(fixtures::ALB_SINGLE_VALUE).unwrap();
        payload["multiValueQueryStringParameters"] = json!({"q2": ["v3"]});
        payload["multiValueHeaders"] = json!({"X-Custom-Header2": ["v3"]});
        let bytes = serde_json::to_vec(&payload).unwrap();

        let req = AlbTargetGroupProcessor.decode_request(&bytes).unwrap();
        assert_eq!(req.query["q2"], vec!["v2", "v3"]);
        let h2: Vec<_> = req.headers.get_all("x-custom-header2").iter().collect();
        assert_eq!(h2, vec!["v2", "v3"]);
    }

    #[test]
    fn test_encode_status_description() {
        let mut res = Response::new();
        res.status = Some(StatusCode::OK);
        res.headers.append("x-a", HeaderValue::from_static("1"));

        let bytes = AlbTargetGroupProcessor.encode_response(&res).unwrap();
        let act: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(act["statusCode"], 200);
        assert_eq!(act["statusDescription"], "OK");
        assert_eq!(act["headers"]["x-a"], "1");
    }

    #[test]
    fn test_encode_unset_status() {
        let bytes = AlbTargetGroupProcessor
            .encode_response(&Response::new())
            .unwrap();
        let act: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(act["statusCode"], 0);
        assert_eq!(act["statusDescription"], "");
    }
}

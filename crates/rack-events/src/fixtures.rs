//! Sample payloads for each built-in format.
//!
//! Every fixture describes the same logical request: `GET /resource/` with two
//! custom headers, query parameters `q1=v1` and `q2=v2&q2=v3`, and body `body`
//! (the single-value ALB fixture can only carry `q2=v2`).

/// API Gateway proxy integration request.
pub const API_GATEWAY_PROXY: &str = r#"{
  "resource": "/{proxy+}",
  "path": "/resource/",
  "httpMethod": "GET",
  "headers": {
    "X-Custom-Header1": "v1",
    "X-Custom-Header2": "v3"
  },
  "multiValueHeaders": {
    "X-Custom-Header1": ["v1"],
    "X-Custom-Header2": ["v2", "v3"]
  },
  "queryStringParameters": {
    "q1": "v1",
    "q2": "v3"
  },
  "multiValueQueryStringParameters": {
    "q1": ["v1"],
    "q2": ["v2", "v3"]
  },
  "pathParameters": {
    "proxy": "resource"
  },
  "stageVariables": null,
  "requestContext": {
    "accountId": "123456789012",
    "resourceId": "abc123",
    "stage": "prod",
    "requestId": "c6af9ac6-7b61-11e6-9a41-93e8deadbeef",
    "resourcePath": "/{proxy+}",
    "httpMethod": "GET",
    "apiId": "apiid",
    "identity": {
      "sourceIp": "127.0.0.1",
      "userAgent": "curl/8.0"
    }
  },
  "body": "body",
  "isBase64Encoded": false
}"#;

/// API Gateway HTTP API request.
pub const API_GATEWAY_V2: &str = r#"{
  "version": "2.0",
  "routeKey": "GET /{p}/",
  "rawPath": "/resource/",
  "rawQueryString": "q1=v1&q2=v2&q2=v3",
  "headers": {
    "x-custom-header1": "v1",
    "x-custom-header2": "v2"
  },
  "queryStringParameters": {
    "q1": "v1",
    "q2": "v2,v3"
  },
  "pathParameters": {
    "p": "v"
  },
  "requestContext": {
    "accountId": "123456789012",
    "apiId": "apiid",
    "requestId": "JKJaXmPLvHcESHA=",
    "routeKey": "GET /{p}/",
    "stage": "$default",
    "timeEpoch": 1583348638390,
    "http": {
      "method": "GET",
      "path": "/resource/",
      "protocol": "HTTP/1.1",
      "sourceIp": "127.0.0.1",
      "userAgent": "curl/8.0"
    }
  },
  "body": "body",
  "isBase64Encoded": false
}"#;

/// ALB request from a target group without multi-value headers.
pub const ALB_SINGLE_VALUE: &str = r#"{
  "requestContext": {
    "elb": {
      "targetGroupArn": "arn"
    }
  },
  "httpMethod": "GET",
  "path": "/resource/",
  "queryStringParameters": {
    "q1": "v1",
    "q2": "v2"
  },
  "headers": {
    "x-custom-header1": "v1",
    "x-custom-header2": "v2"
  },
  "body": "body",
  "isBase64Encoded": false
}"#;

/// ALB request from a target group with multi-value headers enabled.
pub const ALB_MULTI_VALUE: &str = r#"{
  "requestContext": {
    "elb": {
      "targetGroupArn": "arn"
    }
  },
  "httpMethod": "GET",
  "path": "/resource/",
  "multiValueQueryStringParameters": {
    "q1": ["v1"],
    "q2": ["v2", "v3"]
  },
  "multiValueHeaders": {
    "x-custom-header1": ["v1"],
    "x-custom-header2": ["v2", "v3"]
  },
  "body": "body",
  "isBase64Encoded": false
}"#;

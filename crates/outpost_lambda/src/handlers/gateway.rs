use std::collections::{BTreeMap, HashMap};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use outpost_core::contract::ErrorBody;
use outpost_core::error::ApiError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Returned verbatim when a payload cannot be serialized. Never re-encoded.
pub const ENCODING_FAILURE_BODY: &str = r#"{"error":"Internal server error encoding response"}"#;

pub const ALLOWED_METHODS: &str = "GET,POST,OPTIONS";

const INVALID_JSON_BODY: &str = "Invalid JSON body";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiGatewayResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseBuilder {
    allowed_origin: String,
}

impl ResponseBuilder {
    pub fn new(allowed_origin: impl Into<String>) -> Self {
        Self {
            allowed_origin: allowed_origin.into(),
        }
    }

    pub fn json(&self, status_code: u16, payload: &impl Serialize) -> ApiGatewayResponse {
        match serde_json::to_string(payload) {
            Ok(body) => self.raw(status_code, body),
            Err(error) => {
                tracing::error!(error = %error, status_code, "failed to encode response body");
                self.raw(500, ENCODING_FAILURE_BODY.to_string())
            }
        }
    }

    pub fn error(&self, error: &ApiError) -> ApiGatewayResponse {
        self.json(error.status_code(), &ErrorBody::from(error))
    }

    pub fn preflight(&self) -> ApiGatewayResponse {
        self.raw(200, "{}".to_string())
    }

    fn raw(&self, status_code: u16, body: String) -> ApiGatewayResponse {
        ApiGatewayResponse {
            status_code,
            headers: BTreeMap::from([
                ("Content-Type".to_string(), "application/json".to_string()),
                (
                    "Access-Control-Allow-Origin".to_string(),
                    self.allowed_origin.clone(),
                ),
                (
                    "Access-Control-Allow-Methods".to_string(),
                    ALLOWED_METHODS.to_string(),
                ),
            ]),
            body,
        }
    }
}

/// The parts of an API Gateway REST (v1) or HTTP (v2) proxy event the
/// handlers read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GatewayRequest {
    pub method: Option<String>,
    pub route: Option<String>,
    pub path_parameters: HashMap<String, String>,
    pub body: Option<String>,
    pub subject: Option<String>,
}

impl GatewayRequest {
    pub fn from_event(event: Value) -> Result<Self, ApiError> {
        let Value::Object(mut object) = event else {
            return Err(ApiError::BadRequest(
                "Request payload must be a JSON object".to_string(),
            ));
        };

        let request_context = object.remove("requestContext").unwrap_or(Value::Null);
        let method = object
            .get("httpMethod")
            .and_then(Value::as_str)
            .or_else(|| request_context.pointer("/http/method").and_then(Value::as_str))
            .map(str::to_ascii_uppercase);
        let route = route_from(&object);
        let path_parameters = object
            .get("pathParameters")
            .and_then(Value::as_object)
            .map(|parameters| {
                parameters
                    .iter()
                    .filter_map(|(name, value)| {
                        value.as_str().map(|text| (name.clone(), text.to_string()))
                    })
                    .collect()
            })
            .unwrap_or_default();
        let is_base64 = object
            .get("isBase64Encoded")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let body = decode_body(object.remove("body").unwrap_or(Value::Null), is_base64)?;
        let subject = subject_claim(&request_context);

        Ok(Self {
            method,
            route,
            path_parameters,
            body,
            subject,
        })
    }

    pub fn is_preflight(&self) -> bool {
        self.method.as_deref() == Some("OPTIONS")
    }

    /// A non-blank path parameter.
    pub fn path_parameter(&self, name: &str) -> Option<&str> {
        self.path_parameters
            .get(name)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    pub fn json_body<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        let text = self
            .body
            .as_deref()
            .ok_or_else(|| ApiError::BadRequest(INVALID_JSON_BODY.to_string()))?;
        serde_json::from_str(text).map_err(|error| {
            tracing::warn!(error = %error, "request body is not valid JSON for this operation");
            ApiError::BadRequest(INVALID_JSON_BODY.to_string())
        })
    }
}

fn route_from(object: &serde_json::Map<String, Value>) -> Option<String> {
    if let Some(route_key) = object.get("routeKey").and_then(Value::as_str) {
        if let Some((_, path)) = route_key.split_once(' ') {
            return Some(path.to_string());
        }
    }
    object
        .get("resource")
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn decode_body(body: Value, is_base64: bool) -> Result<Option<String>, ApiError> {
    match body {
        Value::Null => Ok(None),
        Value::String(text) if is_base64 => STANDARD
            .decode(text.trim())
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .map(Some)
            .ok_or_else(|| ApiError::BadRequest(INVALID_JSON_BODY.to_string())),
        Value::String(text) => Ok(Some(text)),
        // Direct invocations may carry the body already decoded.
        other => Ok(Some(other.to_string())),
    }
}

fn subject_claim(request_context: &Value) -> Option<String> {
    ["/authorizer/jwt/claims/sub", "/authorizer/claims/sub"]
        .iter()
        .find_map(|pointer| request_context.pointer(pointer).and_then(Value::as_str))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use base64::Engine as _;
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_rest_event_with_authorizer_claims() {
        let request = GatewayRequest::from_event(json!({
            "httpMethod": "get",
            "resource": "/runs/{id}",
            "pathParameters": {"id": "run-1"},
            "body": null,
            "requestContext": {"authorizer": {"claims": {"sub": "user-a"}}}
        }))
        .expect("event should decode");

        assert_eq!(request.method.as_deref(), Some("GET"));
        assert_eq!(request.route.as_deref(), Some("/runs/{id}"));
        assert_eq!(request.path_parameter("id"), Some("run-1"));
        assert_eq!(request.subject.as_deref(), Some("user-a"));
        assert_eq!(request.body, None);
    }

    #[test]
    fn decodes_http_api_event_with_jwt_claims_and_base64_body() {
        let request = GatewayRequest::from_event(json!({
            "routeKey": "POST /runs",
            "isBase64Encoded": true,
            "body": STANDARD.encode(r#"{"query":"dentists"}"#),
            "requestContext": {
                "http": {"method": "POST"},
                "authorizer": {"jwt": {"claims": {"sub": "user-b"}}}
            }
        }))
        .expect("event should decode");

        assert_eq!(request.method.as_deref(), Some("POST"));
        assert_eq!(request.route.as_deref(), Some("/runs"));
        assert_eq!(request.subject.as_deref(), Some("user-b"));
        assert_eq!(request.body.as_deref(), Some(r#"{"query":"dentists"}"#));
    }

    #[test]
    fn blank_path_parameter_counts_as_missing() {
        let request = GatewayRequest::from_event(json!({"pathParameters": {"id": " "}}))
            .expect("event should decode");
        assert_eq!(request.path_parameter("id"), None);
    }

    #[test]
    fn missing_or_malformed_body_is_invalid_json() {
        let missing = GatewayRequest::from_event(json!({})).expect("event should decode");
        let malformed =
            GatewayRequest::from_event(json!({"body": "{not json"})).expect("event should decode");

        for request in [missing, malformed] {
            let error = request
                .json_body::<Value>()
                .expect_err("body should be rejected");
            assert_eq!(error.public_message(), "Invalid JSON body");
        }
    }

    #[test]
    fn responses_carry_fixed_cors_headers() {
        let response = ResponseBuilder::new("https://app.example").json(200, &json!({"ok": true}));

        assert_eq!(response.headers["Content-Type"], "application/json");
        assert_eq!(
            response.headers["Access-Control-Allow-Origin"],
            "https://app.example"
        );
        assert_eq!(
            response.headers["Access-Control-Allow-Methods"],
            "GET,POST,OPTIONS"
        );
    }

    #[test]
    fn unserializable_payload_falls_back_to_literal_500() {
        let payload = BTreeMap::from([(vec![1u8], 1u8)]);
        let response = ResponseBuilder::new("*").json(200, &payload);

        assert_eq!(response.status_code, 500);
        assert_eq!(response.body, ENCODING_FAILURE_BODY);
        assert_eq!(response.headers["Access-Control-Allow-Origin"], "*");
    }

    #[test]
    fn internal_errors_use_the_generic_message() {
        let response = ResponseBuilder::new("*")
            .error(&ApiError::Internal("connection reset by peer".to_string()));

        assert_eq!(response.status_code, 500);
        assert_eq!(response.body, r#"{"error":"Internal server error"}"#);
    }
}

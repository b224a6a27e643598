//! AWS Lambda event shapes.
//!
//! v1 events are the job request itself and expect the bare envelope back.
//! v2 (HTTP API) events carry the job request as a JSON string in `body` and
//! expect `{statusCode, body, isBase64Encoded}` back.

use std::sync::Arc;

use axum::{Json, body::Bytes, extract::State};
use base64::{Engine, engine::general_purpose::STANDARD};
use repo_register_core::{
    AdapterReply,
    error::AdapterError,
    models::{Envelope, JobRunId},
};
use repo_register_github::GitHub;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::handlers::parse_json;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LambdaV2Response {
    pub status_code: u16,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl From<AdapterReply> for LambdaV2Response {
    fn from(reply: AdapterReply) -> Self {
        Self {
            status_code: reply.status.as_u16(),
            // Serializing plain maps and strings cannot fail.
            body: serde_json::to_string(&reply.envelope).unwrap_or_default(),
            is_base64_encoded: false,
        }
    }
}

/// Extracts the job request from a v2 event's `body`.
pub fn v2_job_request(event: &Value) -> Result<Value, AdapterError> {
    let encoded = event.get("isBase64Encoded").and_then(Value::as_bool).unwrap_or(false);
    match event.get("body") {
        Some(Value::String(body)) if encoded => {
            let bytes = STANDARD
                .decode(body)
                .map_err(|e| AdapterError::Validation(format!("Invalid base64 body: {e}")))?;
            parse_json(&bytes)
        }
        Some(Value::String(body)) => parse_json(body.as_bytes()),
        Some(body @ Value::Object(_)) => Ok(body.clone()),
        _ => Err(AdapterError::missing_param("body")),
    }
}

/// The HTTP status is dropped; v1 callers only see the envelope.
pub async fn handler_v1(State(github): State<Arc<GitHub>>, body: Bytes) -> Json<Envelope> {
    let reply = match parse_json(&body) {
        Ok(event) => github.create_request(&event).await,
        Err(e) => AdapterReply::error(JobRunId::default(), &e),
    };
    Json(reply.envelope)
}

pub async fn handler_v2(State(github): State<Arc<GitHub>>, body: Bytes) -> Json<LambdaV2Response> {
    let reply = match parse_json(&body).and_then(|event| v2_job_request(&event)) {
        Ok(input) => github.create_request(&input).await,
        Err(e) => AdapterReply::error(JobRunId::default(), &e),
    };
    Json(reply.into())
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_v2_job_request() {
        let request = json!({ "id": "1", "data": { "githubUserId": "u", "ethAddress": "1" } });
        let cases = [
            json!({ "body": request.to_string() }),
            json!({ "body": request.to_string(), "isBase64Encoded": false }),
            json!({ "body": STANDARD.encode(request.to_string()), "isBase64Encoded": true }),
            json!({ "body": request.clone() }),
        ];
        for event in cases {
            assert_eq!(v2_job_request(&event).unwrap(), request, "event {event}");
        }
    }

    #[test]
    fn test_v2_job_request_rejects() {
        let cases = [
            json!({}),
            json!({ "body": null }),
            json!({ "body": "{not json" }),
            json!({ "body": "%%%", "isBase64Encoded": true }),
        ];
        for event in cases {
            let err = v2_job_request(&event).unwrap_err();
            assert!(matches!(err, AdapterError::Validation(_)), "event {event}");
        }
    }

    #[test]
    fn test_v2_response() {
        let reply = AdapterReply::error(
            JobRunId::new("7"),
            &AdapterError::NotFound { address: "0x0000000000000000000000000000000000000001".into() },
        );
        let response = LambdaV2Response::from(reply);
        assert_eq!(response.status_code, StatusCode::INTERNAL_SERVER_ERROR.as_u16());
        assert!(!response.is_base64_encoded);
        let body: Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(body["jobRunID"], "7");
        assert_eq!(
            body["error"]["message"],
            "Repository (0x0000000000000000000000000000000000000001) not found."
        );
        let value = serde_json::to_value(&response).unwrap();
        let mut keys = value.as_object().unwrap().keys().map(String::as_str).collect::<Vec<_>>();
        keys.sort_unstable();
        assert_eq!(keys, ["body", "isBase64Encoded", "statusCode"]);
    }
}

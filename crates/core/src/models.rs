use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{address::EthAddress, error::AdapterError};

/// Job run identifier, echoed back in every envelope.
///
/// Callers may send it as a string or a number; it is always echoed as a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobRunId(String);

impl JobRunId {
    pub fn new(value: impl Into<String>) -> Self { Self(value.into()) }

    /// Reads `id` from a raw request body. Falls back to `"1"` when it is absent,
    /// empty, or not a scalar, so even malformed requests get an addressable reply.
    pub fn from_input(input: &Value) -> Self {
        match input.get("id") {
            Some(Value::String(s)) if !s.is_empty() => Self(s.clone()),
            Some(Value::Number(n)) => Self(n.to_string()),
            _ => Self::default(),
        }
    }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl Default for JobRunId {
    fn default() -> Self { Self("1".to_string()) }
}

impl fmt::Display for JobRunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

/// A validated job request: `{ id, data: { githubUserId, ethAddress } }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRequest {
    pub id: JobRunId,
    pub github_user_id: String,
    pub eth_address: EthAddress,
}

impl JobRequest {
    pub fn validate(input: &Value) -> Result<Self, AdapterError> {
        let id = JobRunId::from_input(input);
        let data = match input.get("data") {
            Some(Value::Object(data)) => data,
            Some(_) => return Err(AdapterError::Validation("data must be an object".into())),
            None => return Err(AdapterError::missing_param("data")),
        };
        let github_user_id = match data.get("githubUserId") {
            Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
            Some(Value::String(_)) | Some(Value::Null) | None => {
                return Err(AdapterError::missing_param("githubUserId"));
            }
            Some(_) => {
                return Err(AdapterError::Validation("githubUserId must be a string".into()));
            }
        };
        let eth_address = match data.get("ethAddress") {
            Some(Value::String(s)) if !s.trim().is_empty() => EthAddress::parse(s)?,
            Some(Value::Number(n)) => match n.as_u64() {
                Some(n) => EthAddress::parse(&n.to_string())?,
                None => {
                    return Err(AdapterError::Validation(format!(
                        "ethAddress is not a non-negative integer: {n}"
                    )));
                }
            },
            Some(Value::String(_)) | Some(Value::Null) | None => {
                return Err(AdapterError::missing_param("ethAddress"));
            }
            Some(_) => {
                return Err(AdapterError::Validation(
                    "ethAddress must be a string or an integer".into(),
                ));
            }
        };
        Ok(Self { id, github_user_id, eth_address })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessEnvelope {
    #[serde(rename = "jobRunID")]
    pub job_run_id: JobRunId,
    /// Upstream GraphQL `data` object without `node`, plus `result`.
    pub data: Map<String, Value>,
    pub result: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(rename = "jobRunID")]
    pub job_run_id: JobRunId,
    pub status: String,
    pub error: ErrorBody,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub name: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Envelope {
    Success(SuccessEnvelope),
    Error(ErrorEnvelope),
}

impl Envelope {
    pub fn job_run_id(&self) -> &JobRunId {
        match self {
            Self::Success(s) => &s.job_run_id,
            Self::Error(e) => &e.job_run_id,
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::Success(s) => s.status_code,
            Self::Error(e) => e.status_code,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_job_run_id_from_input() {
        let cases = [
            (json!({ "id": "278c97ffadb54a5bbb93cfec5f7b5503" }), "278c97ffadb54a5bbb93cfec5f7b5503"),
            (json!({ "id": 7 }), "7"),
            (json!({ "id": "" }), "1"),
            (json!({ "id": null }), "1"),
            (json!({ "id": [1] }), "1"),
            (json!({}), "1"),
            (json!("not an object"), "1"),
        ];
        for (input, expected) in cases {
            assert_eq!(JobRunId::from_input(&input).as_str(), expected, "input {input}");
        }
    }

    #[test]
    fn test_validate() {
        let request = JobRequest::validate(&json!({
            "id": "abc",
            "data": { "githubUserId": "MDQ6VXNlcjE=", "ethAddress": "1" }
        }))
        .unwrap();
        assert_eq!(request.id.as_str(), "abc");
        assert_eq!(request.github_user_id, "MDQ6VXNlcjE=");
        assert_eq!(request.eth_address.as_str(), "0x0000000000000000000000000000000000000001");

        let request = JobRequest::validate(&json!({
            "data": { "githubUserId": "MDQ6VXNlcjE=", "ethAddress": 16 }
        }))
        .unwrap();
        assert_eq!(request.id.as_str(), "1");
        assert_eq!(request.eth_address.as_str(), "0x0000000000000000000000000000000000000010");
    }

    #[test]
    fn test_validate_rejects() {
        let cases = [
            (json!({ "id": "1" }), "Required parameter not supplied: data"),
            (json!({ "data": "x" }), "data must be an object"),
            (
                json!({ "data": { "ethAddress": "1" } }),
                "Required parameter not supplied: githubUserId",
            ),
            (
                json!({ "data": { "githubUserId": "", "ethAddress": "1" } }),
                "Required parameter not supplied: githubUserId",
            ),
            (
                json!({ "data": { "githubUserId": 5, "ethAddress": "1" } }),
                "githubUserId must be a string",
            ),
            (
                json!({ "data": { "githubUserId": "u" } }),
                "Required parameter not supplied: ethAddress",
            ),
            (
                json!({ "data": { "githubUserId": "u", "ethAddress": null } }),
                "Required parameter not supplied: ethAddress",
            ),
            (
                json!({ "data": { "githubUserId": "u", "ethAddress": -1 } }),
                "ethAddress is not a non-negative integer: -1",
            ),
            (
                json!({ "data": { "githubUserId": "u", "ethAddress": true } }),
                "ethAddress must be a string or an integer",
            ),
        ];
        for (input, expected) in cases {
            let err = JobRequest::validate(&input).unwrap_err();
            assert!(matches!(err, AdapterError::Validation(_)));
            assert_eq!(err.to_string(), expected, "input {input}");
        }
    }

    #[test]
    fn test_envelope_wire_format() {
        let mut data = Map::new();
        data.insert("result".into(), json!("Hello World"));
        let envelope = Envelope::Success(SuccessEnvelope {
            job_run_id: JobRunId::new("1"),
            data,
            result: "Hello World".into(),
            status_code: 200,
        });
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({
                "jobRunID": "1",
                "data": { "result": "Hello World" },
                "result": "Hello World",
                "statusCode": 200
            })
        );

        let value = json!({
            "jobRunID": "2",
            "status": "errored",
            "error": { "name": "AdapterError", "message": "boom" },
            "statusCode": 500
        });
        let envelope: Envelope = serde_json::from_value(value).unwrap();
        assert!(matches!(envelope, Envelope::Error(_)));
        assert_eq!(envelope.job_run_id().as_str(), "2");
        assert_eq!(envelope.status_code(), 500);
    }
}

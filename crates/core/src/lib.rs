pub mod address;
pub mod config;
pub mod error;
pub mod models;
pub mod util;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value};

use crate::{
    error::AdapterError,
    models::{Envelope, ErrorBody, ErrorEnvelope, JobRunId, SuccessEnvelope},
};

/// Maximum size of the `result` string, in UTF-8 bytes.
pub const MAX_RESULT_BYTES: usize = 32;

/// The outcome of one job run: the HTTP status to reply with and the envelope body.
#[derive(Debug, Clone, PartialEq)]
pub struct AdapterReply {
    pub status: StatusCode,
    pub envelope: Envelope,
}

impl AdapterReply {
    pub fn success(
        job_run_id: JobRunId,
        status: StatusCode,
        mut data: Map<String, Value>,
        result: String,
    ) -> Self {
        data.insert("result".to_string(), Value::String(result.clone()));
        Self {
            status,
            envelope: Envelope::Success(SuccessEnvelope {
                job_run_id,
                data,
                result,
                status_code: status.as_u16(),
            }),
        }
    }

    pub fn error(job_run_id: JobRunId, error: &AdapterError) -> Self {
        let status = error.status_code();
        Self {
            status,
            envelope: Envelope::Error(ErrorEnvelope {
                job_run_id,
                status: "errored".to_string(),
                error: ErrorBody { name: "AdapterError".to_string(), message: error.to_string() },
                status_code: status.as_u16(),
            }),
        }
    }

    pub fn is_success(&self) -> bool { matches!(self.envelope, Envelope::Success(_)) }
}

impl IntoResponse for AdapterReply {
    fn into_response(self) -> Response {
        if let Envelope::Error(e) = &self.envelope {
            tracing::warn!("Job run {} errored: {}", e.job_run_id, e.error.message);
        }
        (self.status, Json(self.envelope)).into_response()
    }
}

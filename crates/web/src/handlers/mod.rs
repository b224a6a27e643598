use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::State,
    routing::{get, post},
};
use repo_register_core::{AdapterReply, error::AdapterError, models::JobRunId};
use repo_register_github::GitHub;
use serde_json::Value;

use crate::AppState;

pub mod lambda;

pub fn build_router() -> Router<AppState> {
    Router::new()
        .route("/", post(job))
        .route("/lambda", post(lambda::handler_v1))
        .route("/lambda/v2", post(lambda::handler_v2))
        .route("/health", get(health))
}

pub fn parse_json(body: &[u8]) -> Result<Value, AdapterError> {
    serde_json::from_slice(body)
        .map_err(|e| AdapterError::Validation(format!("Invalid JSON body: {e}")))
}

/// Cloud Functions style: the request body is the job request, the reply
/// status mirrors the job outcome.
pub async fn job(State(github): State<Arc<GitHub>>, body: Bytes) -> AdapterReply {
    match parse_json(&body) {
        Ok(input) => github.create_request(&input).await,
        Err(e) => AdapterReply::error(JobRunId::default(), &e),
    }
}

async fn health() -> &'static str { "OK" }

pub mod graphql;
pub mod requester;

use std::sync::Arc;

use anyhow::Result;
use repo_register_core::{
    AdapterReply,
    config::GitHubConfig,
    error::AdapterError,
    models::{JobRequest, JobRunId},
};
use serde_json::Value;

use crate::requester::Requester;

/// Resolves job requests against the GitHub GraphQL API.
#[derive(Clone)]
pub struct GitHub {
    pub requester: Requester,
}

impl GitHub {
    pub fn new(config: &GitHubConfig) -> Result<Arc<Self>> {
        let requester = Requester::new(config)?;
        tracing::info!(
            "GitHub endpoint {} ({} attempts, {}ms retry delay)",
            config.endpoint,
            config.retries,
            config.retry_delay_ms
        );
        Ok(Arc::new(Self { requester }))
    }

    /// Runs one job request end to end. Every failure is folded into an error envelope.
    pub async fn create_request(&self, input: &Value) -> AdapterReply {
        let job_run_id = JobRunId::from_input(input);
        match self.run(input).await {
            Ok(reply) => reply,
            Err(e) => AdapterReply::error(job_run_id, &e),
        }
    }

    async fn run(&self, input: &Value) -> Result<AdapterReply, AdapterError> {
        let request = JobRequest::validate(input)?;
        tracing::info!(
            "Job run {}: looking up repository {} for user {}",
            request.id,
            request.eth_address,
            request.github_user_id
        );
        let query = graphql::build_query(&request.github_user_id, &request.eth_address);
        let response = self.requester.request(&query, graphql::is_retryable).await?;
        let registration = graphql::interpret(&request.eth_address, response.body)?;
        tracing::info!("Job run {}: resolved to {:?}", request.id, registration.result);
        Ok(AdapterReply::success(
            request.id,
            response.status,
            registration.data,
            registration.result,
        ))
    }
}

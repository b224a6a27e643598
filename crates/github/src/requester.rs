//! POSTs a JSON body to the GraphQL endpoint, retrying failed attempts.
//!
//! An attempt fails when the request cannot be sent, the status is not a
//! success, the body carries a top-level `error`, or the caller's classifier
//! flags the body. Failed attempts are retried after a fixed delay until the
//! configured attempt count is used up. A success status with a non-JSON body
//! is final.

use std::time::Duration;

use anyhow::{Context, Result};
use http::StatusCode;
use repo_register_core::{config::GitHubConfig, error::AdapterError};
use reqwest::{
    Client,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT},
};
use serde::Serialize;
use serde_json::Value;
use tokio::time::sleep;
use url::Url;

/// A parsed upstream response.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: Value,
}

enum Attempt {
    Done(UpstreamResponse),
    Retry(String),
    Fail(String),
}

#[derive(Clone)]
pub struct Requester {
    client: Client,
    endpoint: Url,
    attempts: u32,
    delay: Duration,
}

fn build_client(config: &GitHubConfig) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(&config.user_agent).context("Invalid user agent")?,
    );
    let mut auth = HeaderValue::from_str(&format!("bearer {}", config.token))
        .context("Invalid token value")?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);

    Client::builder()
        .default_headers(headers)
        .timeout(config.timeout())
        .build()
        .context("Failed to build HTTP client")
}

impl Requester {
    pub fn new(config: &GitHubConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config)?,
            endpoint: config.endpoint.clone(),
            attempts: config.retries.max(1),
            delay: config.retry_delay(),
        })
    }

    pub fn endpoint(&self) -> &Url { &self.endpoint }

    pub async fn request<B>(
        &self,
        body: &B,
        custom_error: impl Fn(&Value) -> bool,
    ) -> Result<UpstreamResponse, AdapterError>
    where
        B: Serialize + ?Sized,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let message = match self.attempt(body, &custom_error).await {
                Attempt::Done(response) => return Ok(response),
                Attempt::Fail(message) => return Err(AdapterError::Transport(message)),
                Attempt::Retry(message) => message,
            };
            if attempt >= self.attempts {
                tracing::warn!("Request to {} failed after {} attempts", self.endpoint, attempt);
                return Err(AdapterError::Transport(message));
            }
            tracing::info!(
                "Request to {} failed, retrying (attempt {}/{}): {}",
                self.endpoint,
                attempt,
                self.attempts,
                message
            );
            sleep(self.delay).await;
        }
    }

    async fn attempt<B>(&self, body: &B, custom_error: &impl Fn(&Value) -> bool) -> Attempt
    where B: Serialize + ?Sized {
        let response = match self.client.post(self.endpoint.clone()).json(body).send().await {
            Ok(response) => response,
            Err(e) => return Attempt::Retry(format!("Request failed: {e}")),
        };
        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => return Attempt::Retry(format!("Failed to read response body: {e}")),
        };
        if !status.is_success() {
            return Attempt::Retry(format!("Request failed with status code {status}: {text}"));
        }
        let body: Value = match serde_json::from_str(&text) {
            Ok(body) => body,
            Err(e) => return Attempt::Fail(format!("Invalid JSON response ({status}): {e}")),
        };
        if body.get("error").is_some_and(|e| !e.is_null()) || custom_error(&body) {
            return Attempt::Retry(format!("Upstream returned an error response: {body}"));
        }
        Attempt::Done(UpstreamResponse { status, body })
    }
}

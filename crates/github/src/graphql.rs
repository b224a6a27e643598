use graphql_client::{QueryBody, Response};
use repo_register_core::{
    MAX_RESULT_BYTES, address::EthAddress, error::AdapterError, util::truncate_utf8,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const REPOSITORY_DESCRIPTION_QUERY: &str = r#"query RepositoryDescription($githubUserId: ID!, $ethAddress: String!) {
  node(id: $githubUserId) {
    ... on User {
      repository(name: $ethAddress) {
        description
      }
    }
  }
}"#;

const OPERATION_NAME: &str = "RepositoryDescription";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Variables {
    pub github_user_id: String,
    pub eth_address: String,
}

#[derive(Debug, Deserialize)]
struct UserNode {
    #[serde(default)]
    repository: Option<RepositoryNode>,
}

#[derive(Debug, Deserialize)]
struct RepositoryNode {
    #[serde(default)]
    description: Option<String>,
}

/// Extracted repository name plus the remaining GraphQL `data` fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub result: String,
    pub data: Map<String, Value>,
}

pub fn build_query(github_user_id: &str, address: &EthAddress) -> QueryBody<Variables> {
    QueryBody {
        variables: Variables {
            github_user_id: github_user_id.to_string(),
            eth_address: address.as_str().to_string(),
        },
        query: REPOSITORY_DESCRIPTION_QUERY,
        operation_name: OPERATION_NAME,
    }
}

/// Only the `{"Response": "Error"}` shape is retried; everything else is final.
pub fn is_retryable(body: &Value) -> bool {
    body.get("Response").and_then(Value::as_str) == Some("Error")
}

/// Interprets a successful GraphQL response for `address`.
pub fn interpret(address: &EthAddress, body: Value) -> Result<Registration, AdapterError> {
    let response: Response<Map<String, Value>> = serde_json::from_value(body)
        .map_err(|e| AdapterError::Transport(format!("Unexpected GraphQL response: {e}")))?;
    let messages = response
        .errors
        .unwrap_or_default()
        .into_iter()
        .map(|error| error.message)
        .collect::<Vec<_>>()
        .join("\n");
    let Some(mut data) = response.data else {
        return Err(AdapterError::Transport(format!("GraphQL query failed: {messages}")));
    };
    if !messages.is_empty() {
        tracing::debug!("GraphQL errors for {}: {}", address, messages);
    }

    let node = match data.remove("node") {
        Some(Value::Null) | None => None,
        Some(node) => Some(serde_json::from_value::<UserNode>(node).map_err(|e| {
            AdapterError::Transport(format!("Unexpected node in GraphQL response: {e}"))
        })?),
    };
    let Some(repository) = node.and_then(|n| n.repository) else {
        return Err(AdapterError::NotFound { address: address.to_string() });
    };
    let name = match repository.description {
        Some(description) if !description.is_empty() => description,
        _ => address.short_name(),
    };
    let result = truncate_utf8(&name, MAX_RESULT_BYTES).to_string();
    Ok(Registration { result, data })
}

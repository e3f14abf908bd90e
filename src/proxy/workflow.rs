//! Remote workflow execution client

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("WORKFLOW_ID is not configured")]
    MissingWorkflowId,
    #[error("Invalid base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("Workflow request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Workflow API returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Workflow API returned invalid JSON: {0}")]
    InvalidBody(String),
}

/// Executes a workflow with the given input and returns the remote result
#[async_trait]
pub trait WorkflowClient: Send + Sync {
    async fn execute(&self, input_data: Value) -> Result<Value, WorkflowError>;
}

/// Client for the PhenoML workflows API
pub struct PhenomlClient {
    client: Client,
    base_url: Url,
    username: String,
    password: String,
    workflow_id: Option<String>,
}

impl PhenomlClient {
    pub fn new(
        base_url: &str,
        username: String,
        password: String,
        workflow_id: Option<String>,
    ) -> Result<Self, WorkflowError> {
        let base_url = Url::parse(base_url).map_err(|e| WorkflowError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            base_url,
            username,
            password,
            workflow_id,
        })
    }

    fn execute_url(&self, workflow_id: &str) -> String {
        format!(
            "{}/workflows/{}/execute",
            self.base_url.as_str().trim_end_matches('/'),
            workflow_id
        )
    }
}

#[async_trait]
impl WorkflowClient for PhenomlClient {
    async fn execute(&self, input_data: Value) -> Result<Value, WorkflowError> {
        let workflow_id = self
            .workflow_id
            .as_deref()
            .ok_or(WorkflowError::MissingWorkflowId)?;
        let url = self.execute_url(workflow_id);

        tracing::debug!(%url, "Executing workflow");

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.username, Some(&self.password))
            .json(&json!({ "input_data": input_data }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(WorkflowError::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        serde_json::from_str(&body).map_err(|e| WorkflowError::InvalidBody(e.to_string()))
    }
}

//! Workflow proxy server
//!
//! Forwards single workflow-execution calls to the remote PhenoML API so the
//! credentials never leave the server.

mod handlers;
mod types;
mod workflow;

pub use handlers::create_router;
pub use types::*;
pub use workflow::{PhenomlClient, WorkflowClient, WorkflowError};

use std::sync::Arc;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BASE_URL: &str = "https://experiment.app.pheno.ml";

/// Proxy configuration, read from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    pub port: u16,
    pub workflow_id: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub base_url: String,
}

impl ProxyConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Empty values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        Self {
            port: get("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            workflow_id: get("WORKFLOW_ID"),
            username: get("PHENOML_USERNAME"),
            password: get("PHENOML_PASSWORD"),
            base_url: get("PHENOML_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }

    pub fn has_credentials(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }
}

/// Application state shared across handlers
#[derive(Clone, Default)]
pub struct AppState {
    /// `None` when credentials are not configured
    pub workflows: Option<Arc<dyn WorkflowClient>>,
}

impl AppState {
    pub fn new(config: &ProxyConfig) -> Result<Self, WorkflowError> {
        let workflows = match (&config.username, &config.password) {
            (Some(username), Some(password)) => {
                let client = PhenomlClient::new(
                    &config.base_url,
                    username.clone(),
                    password.clone(),
                    config.workflow_id.clone(),
                )?;
                Some(Arc::new(client) as Arc<dyn WorkflowClient>)
            }
            _ => None,
        };
        Ok(Self { workflows })
    }

    pub fn with_client(client: Arc<dyn WorkflowClient>) -> Self {
        Self {
            workflows: Some(client),
        }
    }
}

//! Search engine index client
//!
//! One blocking HTTP client per processor, reused for every record in the
//! batch. Basic auth on every request; certificate verification can be
//! disabled for engines fronted by self-signed certificates.

use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::config::Config;
use crate::types::{ChangeOp, Operation};

use super::error::SyncError;

/// Client for document mutations against the search engine
#[derive(Debug)]
pub struct IndexClient {
    client: Client,
    base_url: String,
    index: String,
    username: String,
    password: String,
}

impl IndexClient {
    /// Build the client from configuration. Fails before any request is
    /// sent when the underlying HTTP client cannot be constructed.
    pub fn new(config: &Config) -> Result<Self, SyncError> {
        let mut builder = Client::builder().timeout(Duration::from_secs(config.engine.timeout_secs));
        if config.engine.insecure_tls {
            builder = builder.danger_accept_invalid_certs(true);
        }
        let client = builder
            .build()
            .map_err(|e| SyncError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.engine.base_url(),
            index: config.sync.index.clone(),
            username: config.engine.username.clone(),
            password: config.engine.password.clone(),
        })
    }

    /// URL of the document resource for an id
    fn doc_url(&self, doc_id: &str) -> String {
        format!("{}/{}/_doc/{}", self.base_url, self.index, doc_id)
    }

    /// Apply a decoded change operation
    pub fn apply(&self, op: &ChangeOp) -> Result<(), SyncError> {
        match op.operation {
            Operation::Upsert => self.upsert(&op.doc_id, &op.doc),
            Operation::Delete => self.delete(&op.doc_id),
        }
    }

    /// Create-or-replace a document
    pub fn upsert(&self, doc_id: &str, doc: &Value) -> Result<(), SyncError> {
        let url = self.doc_url(doc_id);
        debug!("indexing document at {}", url);

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.username, Some(&self.password))
            .json(doc)
            .send()
            .map_err(|e| SyncError::Transport(e.to_string()))?;

        Self::check_status(response)
    }

    /// Remove a document
    pub fn delete(&self, doc_id: &str) -> Result<(), SyncError> {
        let url = self.doc_url(doc_id);
        debug!("deleting document at {}", url);

        let response = self
            .client
            .delete(&url)
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .map_err(|e| SyncError::Transport(e.to_string()))?;

        Self::check_status(response)
    }

    /// The engine acknowledges mutations with 200 or 201 only.
    fn check_status(response: Response) -> Result<(), SyncError> {
        let status = response.status();
        if status == StatusCode::OK || status == StatusCode::CREATED {
            return Ok(());
        }

        let body = response.text().unwrap_or_default();
        Err(SyncError::IndexEngine {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        let mut config = Config::default();
        config.engine.username = "elastic".to_string();
        config.engine.password = "changeme".to_string();
        config
    }

    #[test]
    fn doc_url_joins_index_and_id() {
        let client = IndexClient::new(&test_config()).unwrap();
        assert_eq!(
            client.doc_url("42"),
            "https://127.0.0.1:9200/projects/_doc/42"
        );
    }

    #[test]
    fn doc_url_uses_endpoint_override() {
        let mut config = test_config();
        config.engine.endpoint = Some("http://localhost:9200/".to_string());
        let client = IndexClient::new(&config).unwrap();
        assert_eq!(client.doc_url("abc"), "http://localhost:9200/projects/_doc/abc");
    }

    #[test]
    fn insecure_tls_client_builds() {
        let mut config = test_config();
        config.engine.insecure_tls = true;
        assert!(IndexClient::new(&config).is_ok());
    }
}

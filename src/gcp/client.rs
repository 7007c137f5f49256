//! GCP Client
//!
//! Main client for interacting with GCP APIs, combining authentication
//! and HTTP functionality.

use super::auth::GcpCredentials;
use super::http::GcpHttpClient;
use anyhow::{Context, Result};
use serde_json::Value;
use url::Url;

/// Main GCP client
#[derive(Clone)]
pub struct GcpClient {
    pub credentials: GcpCredentials,
    pub http: GcpHttpClient,
    /// Replaces every service endpoint (emulators, mock servers, private endpoints)
    endpoint_override: Option<Url>,
}

impl GcpClient {
    /// Create a client from already-acquired credentials
    pub fn with_credentials(credentials: GcpCredentials) -> Result<Self> {
        let http = GcpHttpClient::new()?;

        Ok(Self {
            credentials,
            http,
            endpoint_override: None,
        })
    }

    /// Send all requests to `endpoint` instead of the per-service Google endpoints
    pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self> {
        let url = Url::parse(endpoint)
            .with_context(|| format!("Invalid endpoint override: {}", endpoint))?;
        self.endpoint_override = Some(url);
        Ok(self)
    }

    /// Get the current access token
    pub async fn get_token(&self) -> Result<String> {
        self.credentials.get_token().await
    }

    /// Make a GET request to a GCP API
    pub async fn get(&self, url: &str) -> Result<Value> {
        let token = self.get_token().await?;
        self.http.get(url, &token).await
    }

    /// Build a REST URL: `{endpoint}/{api_version}/{path}`
    pub fn service_url(&self, service_endpoint: &str, api_version: &str, path: &str) -> String {
        let base = match &self.endpoint_override {
            Some(url) => url.as_str(),
            None => service_endpoint,
        };

        format!(
            "{}/{}/{}",
            base.trim_end_matches('/'),
            api_version.trim_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Format a GCP API error for display
pub fn format_gcp_error(error: &anyhow::Error) -> String {
    super::http::format_gcp_error(error)
}

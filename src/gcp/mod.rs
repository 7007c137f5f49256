//! GCP API interaction module
//!
//! This module provides the plumbing for talking to Google Cloud Platform
//! REST APIs: authentication and an HTTP client.
//!
//! # Module Structure
//!
//! - [`auth`] - GCP authentication and gcloud default project/region lookup
//! - [`client`] - Main GCP client for making API requests
//! - [`http`] - HTTP utilities for REST API calls
//!
//! # Example
//!
//! ```ignore
//! use gcp_import::gcp::auth::GcpCredentials;
//! use gcp_import::gcp::client::GcpClient;
//!
//! async fn example() -> anyhow::Result<()> {
//!     let client = GcpClient::with_credentials(GcpCredentials::new().await?)?;
//!     let url = client.service_url(
//!         "https://cloudscheduler.googleapis.com",
//!         "v1",
//!         "projects/my-project/locations/us-central1/jobs",
//!     );
//!     let jobs = client.get(&url).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod http;

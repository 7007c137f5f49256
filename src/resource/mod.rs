//! Resource abstraction layer
//!
//! This module turns live GCP inventories into normalized resource
//! descriptors. Resource kinds are defined in JSON files embedded at compile
//! time, so a new regional kind needs no code change.
//!
//! # Architecture
//!
//! - [`registry`] - Loads and caches resource kind definitions from embedded JSON
//! - [`lister`] - Drives cursor pagination against a remote inventory
//! - [`mapper`] - Converts one raw record into a [`ResourceDescriptor`]
//! - [`ignore_keys`] - Pluggable post-pass deciding keys excluded from diffs
//! - [`filter`] - Optional narrowing of a run to selected objects
//! - [`generator`] - Runs the whole pipeline for one kind
//!
//! # Example
//!
//! ```ignore
//! use gcp_import::context::GeneratorArgs;
//! use gcp_import::gcp::client::GcpClient;
//! use gcp_import::resource::{get_resource, Generator, RestPageSource};
//! use tokio_util::sync::CancellationToken;
//!
//! async fn scheduler_jobs(client: GcpClient) -> anyhow::Result<()> {
//!     let kind = get_resource("scheduler-jobs").unwrap();
//!     let generator = Generator::new(kind, GeneratorArgs::new("my-project", "us-central1"))?;
//!     let source = RestPageSource::new(client, kind.clone());
//!     let descriptors = generator.generate(&source, &CancellationToken::new()).await?;
//!     Ok(())
//! }
//! ```

pub mod descriptor;
pub mod error;
pub mod filter;
pub mod generator;
pub mod ignore_keys;
pub mod lister;
pub mod mapper;
mod registry;

pub use descriptor::ResourceDescriptor;
pub use error::{GenerateError, ListError, MapError};
pub use filter::ResourceFilter;
pub use generator::{generate_all, GenerationJob, Generator};
pub use ignore_keys::{IgnoreKeyPopulator, NoIgnoreKeys, ReadOnlyAttributes};
#[cfg(any(test, feature = "test-util"))]
pub use lister::InMemoryPages;
pub use lister::{list_pages, Page, PageSource, RestPageSource};
pub use mapper::{local_id_from_name, Mapper};
pub use registry::*;

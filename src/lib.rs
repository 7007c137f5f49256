//! Import live GCP resources as normalized resource descriptors.
//!
//! - [`gcp`] - authentication and REST plumbing
//! - [`context`] - deployment coordinates handed to generators
//! - [`resource`] - resource kinds and the list/map/ignore-key pipeline
//! - [`config`] - persisted CLI defaults

pub mod config;
pub mod context;
pub mod gcp;
pub mod resource;

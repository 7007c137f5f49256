//! Resource Registry - Load resource kind definitions from JSON
//!
//! Every importable resource kind is described by an entry in the embedded
//! JSON files. The per-kind tables (allowed-empty keys, additional fields,
//! read-only attributes) live on [`ResourceKind`] instead of process-wide
//! constants, so a generator only ever sees the configuration it is bound to.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Embedded resource JSON files (compiled into the binary)
const RESOURCE_FILES: &[&str] = &[include_str!("../resources/gcp.json")];

fn default_parent_template() -> String {
    "projects/{project}/locations/{region}".to_string()
}

fn default_name_field() -> String {
    "name".to_string()
}

fn default_local_id_attribute() -> String {
    "name".to_string()
}

/// Resource kind definition from JSON
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ResourceKind {
    /// Registry key, filled from the JSON map key
    #[serde(skip)]
    pub key: String,
    pub display_name: String,
    /// Target resource type tag, e.g. `google_cloud_scheduler_job`
    pub resource_type: String,
    /// Owning provider tag, e.g. `google`
    pub provider: String,
    pub service_endpoint: String,
    pub api_version: String,
    /// Path segment appended to the parent scope when listing
    pub collection: String,
    /// Dot path of the record array inside a list response
    pub response_path: String,
    #[serde(default = "default_parent_template")]
    pub parent_template: String,
    /// Record field holding the hierarchical remote name
    #[serde(default = "default_name_field")]
    pub name_field: String,
    /// Attribute key that receives the local id
    #[serde(default = "default_local_id_attribute")]
    pub local_id_attribute: String,
    /// Attribute key -> generator argument key
    #[serde(default)]
    pub context_attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub allow_empty_values: Vec<String>,
    #[serde(default)]
    pub additional_fields: BTreeMap<String, String>,
    /// Regex patterns of server-assigned attributes
    #[serde(default)]
    pub read_only_attributes: Vec<String>,
}

impl ResourceKind {
    /// Attribute keys every descriptor of this kind carries, sorted
    pub fn attribute_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = std::iter::once(self.local_id_attribute.as_str())
            .chain(self.context_attributes.keys().map(String::as_str))
            .collect();
        keys.sort_unstable();
        keys.dedup();
        keys
    }
}

/// Root structure of resources/*.json
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceConfig {
    #[serde(default)]
    pub resources: BTreeMap<String, ResourceKind>,
}

/// Global registry loaded from JSON
static REGISTRY: OnceLock<ResourceConfig> = OnceLock::new();

/// Get the resource registry (loads from embedded JSON on first access)
pub fn get_registry() -> &'static ResourceConfig {
    REGISTRY.get_or_init(|| {
        let mut final_config = ResourceConfig {
            resources: BTreeMap::new(),
        };

        for content in RESOURCE_FILES {
            let partial: ResourceConfig = serde_json::from_str(content)
                .unwrap_or_else(|e| panic!("Failed to parse embedded resource JSON: {}", e));
            for (key, mut kind) in partial.resources {
                kind.key = key.clone();
                final_config.resources.insert(key, kind);
            }
        }

        final_config
    })
}

/// Get a resource kind by key (`scheduler-jobs`) or resource type (`google_cloud_scheduler_job`)
pub fn get_resource(key: &str) -> Option<&'static ResourceKind> {
    let registry = get_registry();
    registry.resources.get(key).or_else(|| {
        registry
            .resources
            .values()
            .find(|kind| kind.resource_type == key)
    })
}

/// Get all resource keys, sorted
pub fn get_all_resource_keys() -> Vec<&'static str> {
    get_registry()
        .resources
        .keys()
        .map(|s| s.as_str())
        .collect()
}

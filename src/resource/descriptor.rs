//! Resource Descriptor
//!
//! The normalized, provider-agnostic record handed to downstream renderers.
//! Fields are private: after mapping, the only permitted mutation is adding
//! ignore keys.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// One remote object, normalized
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceDescriptor {
    remote_id: String,
    local_id: String,
    resource_type: String,
    provider: String,
    attributes: BTreeMap<String, String>,
    allow_empty_values: BTreeSet<String>,
    additional_fields: BTreeMap<String, String>,
    #[serde(serialize_with = "serialize_ignore_keys")]
    ignore_keys: IgnoreKeys,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct IgnoreKeys {
    keys: BTreeSet<String>,
    /// Set once the populator has run for this generation cycle
    sealed: bool,
}

fn serialize_ignore_keys<S: serde::Serializer>(
    ignore: &IgnoreKeys,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let keys = ignore.sealed.then_some(&ignore.keys);
    serde::Serialize::serialize(&keys, serializer)
}

impl ResourceDescriptor {
    pub(crate) fn new(
        remote_id: String,
        local_id: String,
        resource_type: &str,
        provider: &str,
        attributes: BTreeMap<String, String>,
        allow_empty_values: BTreeSet<String>,
        additional_fields: BTreeMap<String, String>,
    ) -> Self {
        Self {
            remote_id,
            local_id,
            resource_type: resource_type.to_string(),
            provider: provider.to_string(),
            attributes,
            allow_empty_values,
            additional_fields,
            ignore_keys: IgnoreKeys::default(),
        }
    }

    pub fn remote_id(&self) -> &str {
        &self.remote_id
    }

    pub fn local_id(&self) -> &str {
        &self.local_id
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn allow_empty_values(&self) -> &BTreeSet<String> {
        &self.allow_empty_values
    }

    pub fn additional_fields(&self) -> &BTreeMap<String, String> {
        &self.additional_fields
    }

    /// Keys excluded from later diffing, or `None` while the ignore-key pass
    /// for this generation cycle has not completed
    pub fn ignore_keys(&self) -> Option<&BTreeSet<String>> {
        self.ignore_keys.sealed.then_some(&self.ignore_keys.keys)
    }

    /// Mark `key` as excluded from diffing. Only ever adds, and only while
    /// the set is still open: once sealed the call is a no-op returning `false`.
    pub fn ignore_key(&mut self, key: impl Into<String>) -> bool {
        if self.ignore_keys.sealed {
            return false;
        }
        self.ignore_keys.keys.insert(key.into());
        true
    }

    /// Every key a populator may decide on: attributes and additional fields
    pub fn field_keys(&self) -> impl Iterator<Item = &str> {
        self.attributes
            .keys()
            .chain(self.additional_fields.keys())
            .map(String::as_str)
    }

    pub(crate) fn seal_ignore_keys(&mut self) {
        self.ignore_keys.sealed = true;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample(local_id: &str) -> ResourceDescriptor {
        let attributes = BTreeMap::from([
            ("name".to_string(), local_id.to_string()),
            ("project".to_string(), "P".to_string()),
            ("region".to_string(), "R".to_string()),
        ]);
        ResourceDescriptor::new(
            format!("projects/P/locations/R/jobs/{}", local_id),
            local_id.to_string(),
            "google_cloud_scheduler_job",
            "google",
            attributes,
            BTreeSet::new(),
            BTreeMap::new(),
        )
    }

    #[test]
    fn test_ignore_keys_hidden_until_sealed() {
        let mut descriptor = sample("alpha");
        descriptor.ignore_key("state");
        assert!(descriptor.ignore_keys().is_none());

        descriptor.seal_ignore_keys();
        let keys = descriptor.ignore_keys().unwrap();
        assert_eq!(keys.len(), 1);
        assert!(keys.contains("state"));
    }

    #[test]
    fn test_ignore_key_after_seal_is_rejected() {
        let mut descriptor = sample("alpha");
        assert!(descriptor.ignore_key("state"));
        descriptor.seal_ignore_keys();

        assert!(!descriptor.ignore_key("late"));
        let keys = descriptor.ignore_keys().unwrap();
        assert_eq!(keys.len(), 1);
        assert!(!keys.contains("late"));
    }

    #[test]
    fn test_serialized_ignore_keys_null_before_seal() {
        let mut descriptor = sample("alpha");
        let json = serde_json::to_value(&descriptor).unwrap();
        assert!(json["ignore_keys"].is_null());
        assert_eq!(json["local_id"], "alpha");
        assert_eq!(json["attributes"]["project"], "P");

        descriptor.seal_ignore_keys();
        let json = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(json["ignore_keys"], serde_json::json!([]));
    }

    #[test]
    fn test_field_keys_cover_additional_fields() {
        let mut descriptor = sample("alpha");
        descriptor
            .additional_fields
            .insert("force_destroy".to_string(), "true".to_string());
        let keys: Vec<&str> = descriptor.field_keys().collect();
        assert_eq!(keys, vec!["name", "project", "region", "force_destroy"]);
    }
}

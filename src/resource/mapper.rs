//! Resource Mapper
//!
//! Turns one raw API record into one [`ResourceDescriptor`]. Pure: no I/O,
//! no shared state.

use super::descriptor::ResourceDescriptor;
use super::error::MapError;
use super::registry::ResourceKind;
use crate::context::GeneratorArgs;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Last `/`-delimited segment of a hierarchical name
/// e.g., "projects/p/locations/r/jobs/nightly" -> "nightly"
pub fn local_id_from_name(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

/// Maps records of one kind, bound to the run's arguments
#[derive(Debug, Clone)]
pub struct Mapper<'a> {
    kind: &'a ResourceKind,
    /// Context-derived attributes, identical for every record of the run
    context: BTreeMap<String, String>,
    allow_empty_values: BTreeSet<String>,
}

impl<'a> Mapper<'a> {
    /// Resolve the kind's context attributes against `args`
    pub fn new(kind: &'a ResourceKind, args: &GeneratorArgs) -> Result<Self, MapError> {
        let mut context = BTreeMap::new();
        for (attribute, key) in &kind.context_attributes {
            let value = args.get(key).ok_or_else(|| MapError::MissingContext {
                resource_type: kind.resource_type.clone(),
                attribute: attribute.clone(),
                key: key.clone(),
            })?;
            context.insert(attribute.clone(), value.to_string());
        }

        Ok(Self {
            kind,
            context,
            allow_empty_values: kind.allow_empty_values.iter().cloned().collect(),
        })
    }

    pub fn map(&self, record: &Value) -> Result<ResourceDescriptor, MapError> {
        let name = record
            .get(&self.kind.name_field)
            .and_then(|v| v.as_str())
            .ok_or_else(|| MapError::MissingName {
                resource_type: self.kind.resource_type.clone(),
                field: self.kind.name_field.clone(),
            })?;

        let local_id = local_id_from_name(name);
        if local_id.is_empty() {
            return Err(MapError::EmptyLocalId {
                resource_type: self.kind.resource_type.clone(),
                name: name.to_string(),
            });
        }

        let mut attributes = self.context.clone();
        attributes.insert(self.kind.local_id_attribute.clone(), local_id.to_string());

        Ok(ResourceDescriptor::new(
            name.to_string(),
            local_id.to_string(),
            &self.kind.resource_type,
            &self.kind.provider,
            attributes,
            self.allow_empty_values.clone(),
            self.kind.additional_fields.clone(),
        ))
    }
}

//! Descriptor filters
//!
//! Narrow a generation run to selected objects, e.g.
//! `--filter id=nightly:hourly` or `--filter region=us-central1`.

use super::descriptor::ResourceDescriptor;
use anyhow::{bail, Result};
use std::str::FromStr;

/// Field name that selects on the local id instead of an attribute
pub const ID_FIELD: &str = "id";

/// Keep descriptors whose `field` equals one of `values`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceFilter {
    pub field: String,
    pub values: Vec<String>,
}

impl ResourceFilter {
    pub fn new(field: &str, values: Vec<String>) -> Self {
        Self {
            field: field.to_string(),
            values,
        }
    }

    pub fn matches(&self, descriptor: &ResourceDescriptor) -> bool {
        let value = if self.field == ID_FIELD {
            Some(descriptor.local_id())
        } else {
            descriptor.attribute(&self.field)
        };

        value.is_some_and(|v| self.values.iter().any(|wanted| wanted == v))
    }
}

impl FromStr for ResourceFilter {
    type Err = anyhow::Error;

    /// Parse `field=value1:value2`
    fn from_str(s: &str) -> Result<Self> {
        let Some((field, values)) = s.split_once('=') else {
            bail!("Invalid filter '{}': expected <field>=<value>[:<value>...]", s);
        };

        let field = field.trim();
        if field.is_empty() {
            bail!("Invalid filter '{}': empty field name", s);
        }

        let values: Vec<String> = values
            .split(':')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect();
        if values.is_empty() {
            bail!("Invalid filter '{}': no values", s);
        }

        Ok(Self::new(field, values))
    }
}

/// Drop descriptors rejected by any filter, keeping the order of the rest
pub fn apply_filters(descriptors: &mut Vec<ResourceDescriptor>, filters: &[ResourceFilter]) {
    if filters.is_empty() {
        return;
    }
    descriptors.retain(|d| filters.iter().all(|f| f.matches(d)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::descriptor::tests::sample;

    #[test]
    fn test_parse_filter() {
        let filter: ResourceFilter = "id=alpha:beta".parse().unwrap();
        assert_eq!(filter.field, "id");
        assert_eq!(filter.values, vec!["alpha", "beta"]);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("alpha".parse::<ResourceFilter>().is_err());
        assert!("=alpha".parse::<ResourceFilter>().is_err());
        assert!("id=".parse::<ResourceFilter>().is_err());
        assert!("id=::".parse::<ResourceFilter>().is_err());
    }

    #[test]
    fn test_filter_by_id_keeps_order() {
        let mut descriptors = vec![sample("c"), sample("a"), sample("b")];
        apply_filters(&mut descriptors, &["id=b:c".parse().unwrap()]);

        let ids: Vec<&str> = descriptors.iter().map(|d| d.local_id()).collect();
        assert_eq!(ids, vec!["c", "b"]);
    }

    #[test]
    fn test_filter_by_attribute() {
        let mut descriptors = vec![sample("a"), sample("b")];
        apply_filters(&mut descriptors, &["project=other".parse().unwrap()]);
        assert!(descriptors.is_empty());

        let mut descriptors = vec![sample("a")];
        apply_filters(&mut descriptors, &["region=R".parse().unwrap()]);
        assert_eq!(descriptors.len(), 1);
    }

    #[test]
    fn test_unknown_attribute_never_matches() {
        let filter = ResourceFilter::new("schedule", vec!["x".to_string()]);
        assert!(!filter.matches(&sample("a")));
    }
}

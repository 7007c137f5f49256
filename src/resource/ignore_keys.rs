//! Ignore-key population
//!
//! A post-pass over the complete descriptor sequence of one run that decides
//! which keys later diff/compare logic must skip.

use super::descriptor::ResourceDescriptor;
use super::error::GenerateError;
use super::registry::ResourceKind;
use regex::RegexSet;

/// Decides the ignore keys of a whole generation run.
///
/// Implementations may only add keys through [`ResourceDescriptor::ignore_key`];
/// every other field is read-only to them.
pub trait IgnoreKeyPopulator: Send + Sync {
    fn populate(&self, descriptors: &mut [ResourceDescriptor]);
}

/// Leaves every ignore-key set empty
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIgnoreKeys;

impl IgnoreKeyPopulator for NoIgnoreKeys {
    fn populate(&self, _descriptors: &mut [ResourceDescriptor]) {}
}

/// Ignores every key matching one of the kind's server-assigned attribute patterns
#[derive(Debug, Clone)]
pub struct ReadOnlyAttributes {
    resource_type: String,
    patterns: RegexSet,
}

impl ReadOnlyAttributes {
    pub fn new(resource_type: &str, patterns: &[String]) -> Result<Self, GenerateError> {
        // Compile one by one so the error names the offending pattern
        for pattern in patterns {
            regex::Regex::new(pattern).map_err(|source| GenerateError::InvalidPattern {
                resource_type: resource_type.to_string(),
                pattern: pattern.clone(),
                source,
            })?;
        }

        let patterns = RegexSet::new(patterns).map_err(|source| GenerateError::InvalidPattern {
            resource_type: resource_type.to_string(),
            pattern: patterns.join("|"),
            source,
        })?;

        Ok(Self {
            resource_type: resource_type.to_string(),
            patterns,
        })
    }

    pub fn for_kind(kind: &ResourceKind) -> Result<Self, GenerateError> {
        Self::new(&kind.resource_type, &kind.read_only_attributes)
    }
}

impl IgnoreKeyPopulator for ReadOnlyAttributes {
    fn populate(&self, descriptors: &mut [ResourceDescriptor]) {
        for descriptor in descriptors
            .iter_mut()
            .filter(|d| d.resource_type() == self.resource_type)
        {
            let matched: Vec<String> = descriptor
                .field_keys()
                .filter(|key| self.patterns.is_match(key))
                .map(str::to_string)
                .collect();
            for key in matched {
                descriptor.ignore_key(key);
            }
        }
    }
}

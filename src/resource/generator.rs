//! Resource Generator
//!
//! Runs the list -> map -> filter -> ignore-key pipeline for one resource
//! kind. A run either yields the complete, ordered descriptor sequence or an
//! error; descriptors from pages fetched before a failure are dropped.

use super::descriptor::ResourceDescriptor;
use super::error::{GenerateError, ListError};
use super::filter::{apply_filters, ResourceFilter};
use super::ignore_keys::{IgnoreKeyPopulator, NoIgnoreKeys, ReadOnlyAttributes};
use super::lister::{list_pages, PageSource};
use super::mapper::Mapper;
use super::registry::ResourceKind;
use crate::context::GeneratorArgs;
use tokio_util::sync::CancellationToken;

/// Generator for one resource kind
pub struct Generator<'a> {
    kind: &'a ResourceKind,
    args: GeneratorArgs,
    populator: Box<dyn IgnoreKeyPopulator + 'a>,
    filters: Vec<ResourceFilter>,
}

impl<'a> Generator<'a> {
    /// Generator with the kind's read-only attribute patterns as ignore keys.
    /// A kind without patterns gets [`NoIgnoreKeys`].
    pub fn new(kind: &'a ResourceKind, args: GeneratorArgs) -> Result<Self, GenerateError> {
        let populator: Box<dyn IgnoreKeyPopulator + 'a> =
            if kind.read_only_attributes.is_empty() {
                Box::new(NoIgnoreKeys)
            } else {
                Box::new(ReadOnlyAttributes::for_kind(kind)?)
            };
        Ok(Self {
            kind,
            args,
            populator,
            filters: Vec::new(),
        })
    }

    pub fn with_populator(mut self, populator: impl IgnoreKeyPopulator + 'a) -> Self {
        self.populator = Box::new(populator);
        self
    }

    pub fn with_filters(mut self, filters: Vec<ResourceFilter>) -> Self {
        self.filters = filters;
        self
    }

    /// Parent scope of the listing, e.g. `projects/P/locations/R`
    pub fn scope(&self) -> Result<String, GenerateError> {
        self.args
            .render(&self.kind.parent_template)
            .map_err(|key| GenerateError::MissingArgument {
                resource_type: self.kind.resource_type.clone(),
                key,
            })
    }

    pub async fn generate(
        &self,
        source: &dyn PageSource,
        cancel: &CancellationToken,
    ) -> Result<Vec<ResourceDescriptor>, GenerateError> {
        let resource_type = &self.kind.resource_type;
        let scope = self.scope()?;
        let mapper = Mapper::new(self.kind, &self.args)?;

        tracing::debug!("{}: listing {}", resource_type, scope);

        let mut descriptors: Vec<ResourceDescriptor> = Vec::new();
        let listed = list_pages(source, &scope, cancel, |records| {
            for record in &records {
                descriptors.push(mapper.map(record)?);
            }
            Ok::<_, GenerateError>(())
        })
        .await;

        let pages = match listed {
            Ok(pages) => pages,
            Err(GenerateError::List(ListError::Cancelled { pages_fetched, .. })) => {
                tracing::warn!(
                    "{}: cancelled after {} page(s), {} descriptor(s) mapped",
                    resource_type,
                    pages_fetched,
                    descriptors.len()
                );
                return Err(GenerateError::Cancelled {
                    resource_type: resource_type.clone(),
                    partial: descriptors,
                });
            },
            Err(err) => return Err(err),
        };

        apply_filters(&mut descriptors, &self.filters);

        self.populator.populate(&mut descriptors);
        for descriptor in &mut descriptors {
            descriptor.seal_ignore_keys();
        }

        tracing::info!(
            "{}: {} descriptor(s) from {} page(s) in {}",
            resource_type,
            descriptors.len(),
            pages,
            scope
        );

        Ok(descriptors)
    }
}

/// A generator paired with the inventory it reads
pub struct GenerationJob<'a> {
    pub generator: Generator<'a>,
    pub source: Box<dyn PageSource + 'a>,
}

/// Run several generators concurrently, each with its own accumulator.
/// Results are returned in the order of `jobs`.
pub async fn generate_all(
    jobs: &[GenerationJob<'_>],
    cancel: &CancellationToken,
) -> Vec<Result<Vec<ResourceDescriptor>, GenerateError>> {
    futures::future::join_all(
        jobs.iter()
            .map(|job| job.generator.generate(job.source.as_ref(), cancel)),
    )
    .await
}

//! Property-based tests using proptest
//!
//! These tests verify local-id derivation, attribute key sets and order
//! preservation of the generator using randomized inventories.

use gcp_import::context::GeneratorArgs;
use gcp_import::resource::{
    get_resource, local_id_from_name, GenerateError, Generator, InMemoryPages, ListError,
    NoIgnoreKeys,
};
use proptest::prelude::*;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

/// Generate a hierarchical job name and its expected local id
fn arb_job_name() -> impl Strategy<Value = (String, String)> {
    (
        "[a-z][a-z0-9-]{5,29}",   // project
        "[a-z]+-[a-z]+[0-9]",     // region
        "[a-zA-Z0-9_-]{1,40}",    // job id
    )
        .prop_map(|(project, region, id)| {
            (
                format!("projects/{}/locations/{}/jobs/{}", project, region, id),
                id,
            )
        })
}

/// Generate pages of job records
fn arb_pages() -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(
        prop::collection::vec("[a-z][a-z0-9-]{0,20}", 0..5),
        0..6,
    )
}

fn to_records(pages: &[Vec<String>]) -> Vec<Result<Vec<Value>, String>> {
    pages
        .iter()
        .map(|page| {
            Ok(page
                .iter()
                .map(|id| json!({ "name": format!("projects/P/locations/R/jobs/{}", id) }))
                .collect())
        })
        .collect()
}

proptest! {
    /// The local id is whatever follows the last slash
    #[test]
    fn local_id_is_last_segment((name, id) in arb_job_name()) {
        prop_assert_eq!(local_id_from_name(&name), id.as_str());
    }

    /// A name without slashes is its own local id
    #[test]
    fn slashless_name_is_its_own_local_id(name in "[a-zA-Z0-9_.-]{1,40}") {
        prop_assert_eq!(local_id_from_name(&name), name.as_str());
    }

    /// Derivation is deterministic
    #[test]
    fn local_id_is_deterministic(name in "[a-z/]{0,40}") {
        prop_assert_eq!(local_id_from_name(&name), local_id_from_name(&name));
    }

    /// Output order is the concatenation of page order; attribute keys never vary
    #[test]
    fn generator_preserves_page_order(pages in arb_pages()) {
        let kind = get_resource("scheduler-jobs").unwrap();
        let generator = Generator::new(kind, GeneratorArgs::new("P", "R")).unwrap();
        let source = InMemoryPages::new(to_records(&pages));

        let descriptors = tokio_test::block_on(
            generator.generate(&source, &CancellationToken::new()),
        ).unwrap();

        let expected: Vec<&str> = pages.iter().flatten().map(String::as_str).collect();
        let actual: Vec<&str> = descriptors.iter().map(|d| d.local_id()).collect();
        prop_assert_eq!(actual, expected);

        for descriptor in &descriptors {
            let keys: Vec<&str> = descriptor.attributes().keys().map(String::as_str).collect();
            prop_assert_eq!(keys, kind.attribute_keys());
            prop_assert_eq!(descriptor.attribute("name"), Some(descriptor.local_id()));
        }
    }

    /// Re-running against an unchanged inventory reproduces the same output
    #[test]
    fn rerun_is_idempotent(pages in arb_pages()) {
        let kind = get_resource("scheduler-jobs").unwrap();
        let generator = Generator::new(kind, GeneratorArgs::new("P", "R"))
            .unwrap()
            .with_populator(NoIgnoreKeys);

        let first = tokio_test::block_on(generator.generate(
            &InMemoryPages::new(to_records(&pages)),
            &CancellationToken::new(),
        )).unwrap();
        let second = tokio_test::block_on(generator.generate(
            &InMemoryPages::new(to_records(&pages)),
            &CancellationToken::new(),
        )).unwrap();

        prop_assert_eq!(first, second);
    }

    /// A failure on any page yields no descriptors at all
    #[test]
    fn failure_on_page_k_is_all_or_nothing(
        pages in prop::collection::vec(prop::collection::vec("[a-z]{1,8}", 1..4), 1..6),
        fail_at in 0usize..6,
    ) {
        let fail_at = fail_at % pages.len();
        let mut records = to_records(&pages);
        records[fail_at] = Err("injected failure".to_string());

        let kind = get_resource("scheduler-jobs").unwrap();
        let generator = Generator::new(kind, GeneratorArgs::new("P", "R")).unwrap();
        let source = InMemoryPages::new(records);

        let result = tokio_test::block_on(
            generator.generate(&source, &CancellationToken::new()),
        );

        match result {
            Err(GenerateError::List(ListError::Page { page, .. })) => {
                prop_assert_eq!(page, fail_at + 1);
            },
            other => prop_assert!(false, "expected a page failure, got {:?}", other),
        }
        prop_assert_eq!(source.requests().len(), fail_at + 1);
    }
}

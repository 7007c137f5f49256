//! Resource Lister
//!
//! Drives cursor pagination against a remote inventory, handing every page to
//! a callback before requesting the next one.

use super::error::ListError;
use super::registry::ResourceKind;
use crate::gcp::client::GcpClient;
use anyhow::{bail, Result};
use futures::future::BoxFuture;
use serde_json::Value;
use std::collections::HashSet;
#[cfg(any(test, feature = "test-util"))]
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// One page of raw records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub records: Vec<Value>,
    pub next_page_token: Option<String>,
}

/// A paginated remote inventory
pub trait PageSource: Send + Sync {
    /// Fetch the page of `parent` that starts at `page_token` (first page when `None`)
    fn fetch_page<'a>(
        &'a self,
        parent: &'a str,
        page_token: Option<&'a str>,
    ) -> BoxFuture<'a, Result<Page>>;
}

/// Request every page of `scope`, in cursor order, until the API stops
/// returning a continuation token.
///
/// `on_page` runs to completion before the next request is issued. Any
/// failure stops listing immediately, as does a continuation token that was
/// already followed once. Returns the number of pages fetched.
pub async fn list_pages<S, F, E>(
    source: &S,
    scope: &str,
    cancel: &CancellationToken,
    mut on_page: F,
) -> Result<usize, E>
where
    S: PageSource + ?Sized,
    F: FnMut(Vec<Value>) -> Result<(), E>,
    E: From<ListError>,
{
    let mut page_token: Option<String> = None;
    let mut seen_tokens: HashSet<String> = HashSet::new();
    let mut pages_fetched = 0usize;

    loop {
        let cancelled = || ListError::Cancelled {
            scope: scope.to_string(),
            pages_fetched,
        };
        if cancel.is_cancelled() {
            return Err(cancelled().into());
        }

        let page_number = pages_fetched + 1;
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            result = source.fetch_page(scope, page_token.as_deref()) => Some(result),
        };

        let page = match outcome {
            None => return Err(cancelled().into()),
            Some(Ok(page)) => page,
            Some(Err(source)) => {
                return Err(ListError::Page {
                    scope: scope.to_string(),
                    page: page_number,
                    source,
                }
                .into())
            },
        };
        pages_fetched = page_number;

        let next_token = page.next_page_token.filter(|t| !t.is_empty());
        tracing::debug!(
            "{}: page {} with {} record(s), more: {}",
            scope,
            page_number,
            page.records.len(),
            next_token.is_some()
        );

        if next_token.as_ref().is_some_and(|t| seen_tokens.contains(t)) {
            return Err(ListError::RepeatedPageToken {
                scope: scope.to_string(),
                page: page_number,
            }
            .into());
        }

        on_page(page.records)?;

        match next_token {
            Some(token) => {
                seen_tokens.insert(token.clone());
                page_token = Some(token);
            },
            None => break,
        }
    }

    Ok(pages_fetched)
}

/// Lists one resource kind through its GCP REST `list` method
pub struct RestPageSource {
    client: GcpClient,
    kind: ResourceKind,
    page_size: Option<u32>,
}

impl RestPageSource {
    pub fn new(client: GcpClient, kind: ResourceKind) -> Self {
        Self {
            client,
            kind,
            page_size: None,
        }
    }

    /// Ask the API for at most `page_size` records per page
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    fn list_url(&self, parent: &str, page_token: Option<&str>) -> String {
        let path = format!(
            "{}/{}",
            parent.trim_end_matches('/'),
            self.kind.collection
        );
        let url = self
            .client
            .service_url(&self.kind.service_endpoint, &self.kind.api_version, &path);

        let mut query_parts: Vec<String> = Vec::new();
        if let Some(size) = self.page_size {
            query_parts.push(format!("pageSize={}", size));
        }
        if let Some(token) = page_token {
            query_parts.push(format!("pageToken={}", urlencoding::encode(token)));
        }

        if query_parts.is_empty() {
            url
        } else {
            format!("{}?{}", url, query_parts.join("&"))
        }
    }
}

impl PageSource for RestPageSource {
    fn fetch_page<'a>(
        &'a self,
        parent: &'a str,
        page_token: Option<&'a str>,
    ) -> BoxFuture<'a, Result<Page>> {
        Box::pin(async move {
            let url = self.list_url(parent, page_token);
            let response = self.client.get(&url).await?;

            let records = extract_items(&response, &self.kind.response_path)?;
            let next_page_token = response
                .get("nextPageToken")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string());

            Ok(Page {
                records,
                next_page_token,
            })
        })
    }
}

/// Extract the record array at the dot-notation `path`.
/// GCP omits empty arrays, so a missing field is an empty page.
fn extract_items(response: &Value, path: &str) -> Result<Vec<Value>> {
    if !response.is_object() {
        bail!("Malformed list response: expected a JSON object");
    }

    let mut current = response;
    for part in path.split('.').filter(|p| !p.is_empty()) {
        current = match current.get(part) {
            Some(v) => v,
            None => return Ok(Vec::new()),
        };
    }

    match current {
        Value::Array(items) => Ok(items.clone()),
        Value::Null => Ok(Vec::new()),
        _ => bail!("Malformed list response: '{}' is not an array", path),
    }
}

/// Pages served from memory, for tests of code built on [`PageSource`].
///
/// Page `n` is reached with token `page-{n}`. An `Err` entry makes that
/// page fail with the given message.
#[cfg(any(test, feature = "test-util"))]
pub struct InMemoryPages {
    pages: Vec<std::result::Result<Vec<Value>, String>>,
    requests: Mutex<Vec<(String, Option<String>)>>,
}

#[cfg(any(test, feature = "test-util"))]
impl InMemoryPages {
    pub fn new(pages: Vec<std::result::Result<Vec<Value>, String>>) -> Self {
        Self {
            pages,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Pages whose records are just `{"name": ...}` objects
    pub fn from_names(pages: &[&[&str]]) -> Self {
        Self::new(
            pages
                .iter()
                .map(|names| {
                    Ok(names
                        .iter()
                        .map(|name| serde_json::json!({ "name": name }))
                        .collect())
                })
                .collect(),
        )
    }

    /// `(parent, page_token)` of every request received so far
    pub fn requests(&self) -> Vec<(String, Option<String>)> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[cfg(any(test, feature = "test-util"))]
impl PageSource for InMemoryPages {
    fn fetch_page<'a>(
        &'a self,
        parent: &'a str,
        page_token: Option<&'a str>,
    ) -> BoxFuture<'a, Result<Page>> {
        Box::pin(async move {
            if let Ok(mut requests) = self.requests.lock() {
                requests.push((parent.to_string(), page_token.map(str::to_string)));
            }

            let index = match page_token {
                None => 0,
                Some(token) => match token
                    .strip_prefix("page-")
                    .and_then(|n| n.parse::<usize>().ok())
                {
                    Some(n) if n >= 1 => n - 1,
                    _ => bail!("Unknown page token: {}", token),
                },
            };

            // No configured pages is an empty inventory
            let Some(entry) = self.pages.get(index) else {
                if index == 0 {
                    return Ok(Page::default());
                }
                bail!("Page {} out of range", index + 1);
            };

            let records = entry.clone().map_err(|msg| anyhow::anyhow!(msg))?;
            let next_page_token = (index + 1 < self.pages.len()).then(|| format!("page-{}", index + 2));

            Ok(Page {
                records,
                next_page_token,
            })
        })
    }
}

//! Tag listing, filtering and ordering.
//!
//! Tags come from Docker Hub's repository tag API, which pages results and
//! links each page to the next through a `next` URL. Only cuDNN variants
//! that are not release candidates are catalog candidates.

use crate::client::Client;
use crate::error::{CudexError, Result};
use serde::Deserialize;
use std::collections::HashSet;
use tracing::debug;
use url::Url;

#[cfg(test)]
mod tests;

/// Marker present in every tag that ships cuDNN.
pub const LIB_MARKER: &str = "-cudnn";

/// Suffix of release-candidate tags.
pub const RC_SUFFIX: &str = "-rc";

/// One page of the tag-listing API.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TagPage {
    /// URL of the following page, absent or null on the last page.
    #[serde(default)]
    pub next: Option<String>,
    /// Tags on this page.
    #[serde(default)]
    pub results: Vec<TagEntry>,
}

/// A single tag in a listing page.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TagEntry {
    pub name: String,
}

/// Fetches every tag name reachable from `url`, in page order.
///
/// A relative `next` link is resolved against the page it came from. Any
/// failure aborts the whole listing; there is no partial result.
pub async fn fetch_all_tags(client: &Client, url: &str) -> Result<Vec<String>> {
    let mut tags = Vec::new();
    let mut visited = HashSet::new();
    let mut cursor = Some(url.to_string());

    while let Some(page_url) = cursor.take() {
        if !visited.insert(page_url.clone()) {
            return Err(CudexError::validation(format!(
                "Tag listing links back to an already fetched page: {}",
                page_url
            )));
        }

        let page: TagPage = client.get_json(&page_url).await?;
        debug!(url = %page_url, count = page.results.len(), "fetched tag page");

        tags.extend(page.results.into_iter().map(|entry| entry.name));

        cursor = page
            .next
            .filter(|next| !next.is_empty())
            .map(|next| resolve_next(&page_url, &next))
            .transpose()?;
    }

    Ok(tags)
}

fn resolve_next(current: &str, next: &str) -> Result<String> {
    let base = Url::parse(current).map_err(|e| {
        CudexError::format_with_source(format!("Invalid tag listing URL {}", current), e)
    })?;
    let resolved = base.join(next).map_err(|e| {
        CudexError::format_with_source(format!("Invalid next page link {:?}", next), e)
    })?;
    Ok(resolved.to_string())
}

/// Returns true when a tag belongs in the catalog.
///
/// # Examples
///
/// ```
/// use libcudex::tags::is_candidate;
///
/// assert!(is_candidate("12.2.0-cudnn8-devel-ubuntu22.04"));
/// assert!(!is_candidate("12.2.0-devel-ubuntu22.04"));
/// assert!(!is_candidate("12.2.0-cudnn8-devel-ubuntu22.04-rc"));
/// ```
pub fn is_candidate(tag: &str) -> bool {
    tag.contains(LIB_MARKER) && !tag.ends_with(RC_SUFFIX)
}

/// Keeps candidate tags, preserving their relative order.
pub fn filter_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter().filter(|tag| is_candidate(tag)).collect()
}

/// Sorts tags in descending string order.
///
/// The order is lexicographic, not semantic: `"a-2"` sorts before `"a-10"`.
pub fn sort_descending(tags: &mut [String]) {
    tags.sort_unstable_by(|a, b| b.cmp(a));
}

/// Filters and orders raw tags for catalog assembly.
///
/// A tag listed more than once (listings can shift between pages) is kept
/// once, so every tag in a catalog run is unique.
pub fn select_candidates(tags: Vec<String>) -> Vec<String> {
    let mut candidates = filter_tags(tags);
    sort_descending(&mut candidates);
    candidates.dedup();
    candidates
}

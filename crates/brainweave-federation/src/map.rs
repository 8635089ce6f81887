//! The brain map wire format shared between federated instances.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One cross-site reference carried in a published brain map.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExternalMapReference {
    /// Base URL of the instance the reference points at.
    pub target_site: String,
    /// Page key on the target instance.
    pub target_page: String,
    /// Slug of the referencing page on the publishing instance.
    pub source_page: String,
    /// Rendered preview of the referencing context.
    pub preview_html: String,
}

/// A peer instance's published reference map.
///
/// Treated as an immutable snapshot per fetch: `pages` maps each local slug
/// to every spelling it answers to, and `external_references` lists the
/// peer's outbound cross-site references.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ExternalBrainMap {
    /// Base URL pages on this peer resolve under.
    pub root_domain: String,
    /// Slug to all known spellings (slug, title, aliases).
    pub pages: BTreeMap<String, Vec<String>>,
    /// The peer's outbound cross-site references.
    pub external_references: Vec<ExternalMapReference>,
}

impl ExternalBrainMap {
    /// Resolve a page key against this map's alias lists, returning the
    /// absolute URL of the owning page if any spelling matches.
    pub fn resolve_page(&self, page: &str) -> Option<String> {
        self.pages
            .iter()
            .find(|(_, spellings)| spellings.iter().any(|s| s == page))
            .map(|(slug, _)| self.page_url(slug))
    }

    /// Absolute URL of a page on this peer.
    pub fn page_url(&self, slug: &str) -> String {
        join_url(&self.root_domain, slug)
    }
}

/// Join a base URL and a page key with exactly one separating slash.
pub fn join_url(base: &str, page: &str) -> String {
    if base.is_empty() {
        return page.to_string();
    }
    format!("{}/{}", base.trim_end_matches('/'), page.trim_start_matches('/'))
}

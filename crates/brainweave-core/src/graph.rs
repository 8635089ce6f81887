//! Graph node model: the fully resolved, bidirectional view of one note.

use serde::{Deserialize, Serialize};

/// A backlink preview entry: one concrete mention of this note by another.
///
/// Multiple mentions from the same source are each individually meaningful
/// and are all kept.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InboundPreview {
    /// Slug of the referencing note.
    pub source: String,
    /// Linkified markdown of the context block around the reference.
    pub preview_markdown: String,
    /// The same context rendered to HTML.
    pub preview_html: String,
}

/// A reference from a federated peer pointing at this note.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExternalInbound {
    /// Configured name of the peer's map.
    pub site_name: String,
    /// Slug of the referencing page on the peer.
    pub source_page: String,
    /// Absolute URL of that page.
    pub source_url: String,
    /// Rendered preview supplied by the peer.
    pub preview_html: String,
}

/// A reference from this note to a page on a federated peer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExternalOutbound {
    /// Root domain of the target peer.
    pub target_site: String,
    /// Page key on the target peer.
    pub target_page: String,
    /// Rendered preview of the referencing context.
    pub preview_html: String,
}

/// One node of the assembled note graph.
///
/// Built fresh every rebuild cycle and never mutated afterwards; identity is
/// the slug. Handed as-is to the page-creation collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BrainNode {
    /// Canonical identifier.
    pub slug: String,
    /// Display title.
    pub title: String,
    /// Alternate spellings from frontmatter.
    pub aliases: Vec<String>,
    /// Note body with reference markers rewritten to navigable links.
    pub content: String,
    /// Slugs this note references, first-occurrence order, deduplicated.
    pub outbound_references: Vec<String>,
    /// Slugs of notes referencing this one, first-occurrence order,
    /// deduplicated.
    pub inbound_references: Vec<String>,
    /// One entry per concrete inbound mention, duplicates by source kept.
    pub inbound_reference_previews: Vec<InboundPreview>,
    /// References from federated peers addressed at this note.
    pub external_inbound_references: Vec<ExternalInbound>,
    /// References from this note to federated peers.
    pub external_outbound_references: Vec<ExternalOutbound>,
    /// Stable fingerprint over the resolved fields, for change detection.
    pub content_digest: String,
}

impl BrainNode {
    /// Compute the content fingerprint over every resolved field.
    ///
    /// The digest field itself is excluded; fields are hashed with
    /// separators so adjacent values cannot alias.
    pub fn compute_digest(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        let mut field = |value: &str| {
            hasher.update(value.as_bytes());
            hasher.update(&[0]);
        };

        field(&self.slug);
        field(&self.title);
        field(&self.content);
        for alias in &self.aliases {
            field(alias);
        }
        for slug in &self.outbound_references {
            field(slug);
        }
        for slug in &self.inbound_references {
            field(slug);
        }
        for preview in &self.inbound_reference_previews {
            field(&preview.source);
            field(&preview.preview_markdown);
            field(&preview.preview_html);
        }
        for external in &self.external_inbound_references {
            field(&external.site_name);
            field(&external.source_page);
            field(&external.source_url);
            field(&external.preview_html);
        }
        for external in &self.external_outbound_references {
            field(&external.target_site);
            field(&external.target_page);
            field(&external.preview_html);
        }

        hex::encode(hasher.finalize().as_bytes())
    }

    /// Fill in the content fingerprint, consuming and returning the node.
    pub fn sealed(mut self) -> Self {
        self.content_digest = self.compute_digest();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(slug: &str, content: &str) -> BrainNode {
        BrainNode {
            slug: slug.to_string(),
            title: slug.to_string(),
            aliases: Vec::new(),
            content: content.to_string(),
            outbound_references: Vec::new(),
            inbound_references: Vec::new(),
            inbound_reference_previews: Vec::new(),
            external_inbound_references: Vec::new(),
            external_outbound_references: Vec::new(),
            content_digest: String::new(),
        }
    }

    #[test]
    fn digest_is_deterministic() {
        let a = node("books", "some content").sealed();
        let b = node("books", "some content").sealed();
        assert_eq!(a.content_digest, b.content_digest);
        assert!(!a.content_digest.is_empty());
    }

    #[test]
    fn digest_changes_with_content() {
        let a = node("books", "one").sealed();
        let b = node("books", "two").sealed();
        assert_ne!(a.content_digest, b.content_digest);
    }

    #[test]
    fn digest_distinguishes_field_boundaries() {
        let mut a = node("books", "");
        a.outbound_references = vec!["ab".to_string(), "c".to_string()];
        let mut b = node("books", "");
        b.outbound_references = vec!["a".to_string(), "bc".to_string()];
        assert_ne!(a.compute_digest(), b.compute_digest());
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(node("books", "x").sealed()).unwrap();
        assert!(json.get("outboundReferences").is_some());
        assert!(json.get("inboundReferencePreviews").is_some());
        assert!(json.get("contentDigest").is_some());
    }
}

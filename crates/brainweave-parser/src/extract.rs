//! Reference marker extraction.
//!
//! Finds `[[bracket]]` markers (and optionally `#hashtag` markers) in a note
//! body, skips anything inside code, classifies each marker as internal or
//! external, and attaches the preview markdown of its structural context.

use crate::span_tree::SpanTree;
use regex::Regex;
use std::sync::LazyLock;

static BRACKET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[(.*?)\]\]").expect("bracket marker regex"));

// Rust regex has no lookbehind, so the leading boundary is captured
// explicitly and the marker taken from the second group.
static HASHTAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)(^|\s)#(\w+)").expect("hashtag marker regex"));

/// Extraction switches, mirroring the configuration surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions {
    /// Treat `#word` hashtags as reference markers.
    pub linkify_hashtags: bool,
}

/// An internal reference marker with its preview context.
#[derive(Debug, Clone, PartialEq)]
pub struct RawReference {
    /// Marker text without the surrounding syntax.
    pub text: String,
    /// Raw markdown of the enclosing structural block.
    pub preview_markdown: String,
}

/// A `site/page` marker pointing at a federated peer.
#[derive(Debug, Clone, PartialEq)]
pub struct RawExternalReference {
    /// Full marker text.
    pub text: String,
    /// Remote site key (everything before the last `/`).
    pub site: String,
    /// Remote page key (everything after the last `/`).
    pub page: String,
    /// Raw markdown of the enclosing structural block.
    pub preview_markdown: String,
}

/// All reference markers found in one note body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedReferences {
    /// Internal references, bracket markers first, then hashtags.
    pub internal: Vec<RawReference>,
    /// References whose text splits into `site/page`.
    pub external: Vec<RawExternalReference>,
}

/// Scan a body for reference markers.
///
/// A marker's text containing a `/` is classified external, split at the
/// *last* slash; whether the site is actually a known federation source is
/// decided later, during graph assembly. Markers inside code blocks or
/// inline code spans are not references.
pub fn extract_references(body: &str, tree: &SpanTree, options: ExtractOptions) -> ExtractedReferences {
    let mut refs = ExtractedReferences::default();

    for cap in BRACKET_REGEX.captures_iter(body) {
        let marker = cap.get(0).expect("whole match");
        if tree.in_code(marker.start()) {
            continue;
        }
        let text = cap.get(1).map(|m| m.as_str()).unwrap_or_default();
        let preview_markdown = tree.preview_markdown(body, marker.start()).to_string();

        match text.rsplit_once('/') {
            Some((site, page)) => refs.external.push(RawExternalReference {
                text: text.to_string(),
                site: site.to_string(),
                page: page.to_string(),
                preview_markdown,
            }),
            None => refs.internal.push(RawReference {
                text: text.to_string(),
                preview_markdown,
            }),
        }
    }

    if options.linkify_hashtags {
        for cap in HASHTAG_REGEX.captures_iter(body) {
            let word = cap.get(2).expect("hashtag word group");
            // Offset of the `#` itself, so code detection sees the marker.
            let offset = word.start().saturating_sub(1);
            if tree.in_code(offset) {
                continue;
            }
            refs.internal.push(RawReference {
                text: word.as_str().to_string(),
                preview_markdown: tree.preview_markdown(body, offset).to_string(),
            });
        }
    }

    refs
}

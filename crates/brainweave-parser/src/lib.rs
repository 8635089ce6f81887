//! # Brainweave Markdown Parser
//!
//! Structural analysis of note bodies for the backlink graph:
//! - Frontmatter extraction
//! - A block-level span tree over the body for preview-context derivation
//! - Bracket and hashtag reference extraction
//! - Link rewriting of raw text and preview snippets
//! - GFM-flavored HTML rendering of previews

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod extract;
pub mod frontmatter;
pub mod render;
pub mod rewrite;
pub mod span_tree;

pub use extract::{extract_references, ExtractOptions, ExtractedReferences, RawExternalReference, RawReference};
pub use render::render_html;
pub use rewrite::{rewrite_links, RewriteOptions};
pub use span_tree::{SpanKind, SpanTree};

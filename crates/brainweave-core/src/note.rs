//! Note models: raw sources, parsed notes, and synthesized stubs.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A note file as read from disk, before any parsing.
///
/// Produced once per rebuild cycle and immutable afterwards.
#[derive(Debug, Clone)]
pub struct NoteSource {
    /// Canonical identifier derived from the filename stem.
    pub slug: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// Raw file contents, frontmatter included.
    pub raw: String,
}

/// Typed frontmatter fields recognized by the graph, plus whatever else the
/// author put in the header.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Frontmatter {
    /// Display title; registered as a resolvable name when present.
    pub title: Option<String>,
    /// Alternate spellings, each registered as a resolvable name.
    pub aliases: Vec<String>,
    /// Remaining frontmatter fields, passed through untouched.
    #[serde(flatten)]
    pub extra: serde_yaml::Mapping,
}

/// A note after frontmatter extraction, owned by a single rebuild cycle.
#[derive(Debug, Clone)]
pub struct ParsedNote {
    /// Canonical identifier.
    pub slug: String,
    /// Display title; defaults to the slug.
    pub title: String,
    /// Alternate spellings from frontmatter.
    pub aliases: Vec<String>,
    /// Parsed frontmatter header.
    pub frontmatter: Frontmatter,
    /// Note body with the frontmatter fence removed.
    pub body: String,
    /// Raw file contents.
    pub raw: String,
    /// Source path; `None` for synthesized stubs.
    pub path: Option<PathBuf>,
}

impl ParsedNote {
    /// Synthesize an empty placeholder note for a referenced-but-absent name.
    ///
    /// Title equals the slug and the body is empty. Creation is idempotent
    /// within a rebuild cycle; the caller is responsible for registering the
    /// slug so a second reference resolves instead of re-creating.
    pub fn stub(slug: impl Into<String>) -> Self {
        let slug = slug.into();
        let frontmatter = Frontmatter {
            title: Some(slug.clone()),
            ..Frontmatter::default()
        };
        Self {
            title: slug.clone(),
            slug,
            aliases: Vec::new(),
            frontmatter,
            body: String::new(),
            raw: String::new(),
            path: None,
        }
    }

    /// Whether this note was synthesized rather than read from disk.
    pub fn is_stub(&self) -> bool {
        self.path.is_none()
    }
}

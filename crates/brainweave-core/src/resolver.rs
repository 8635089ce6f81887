//! Name resolution table: every known spelling of a note mapped to its
//! canonical slug.
//!
//! Lookup is case-insensitive. Registration is last-writer-wins; when two
//! notes claim the same title or alias the collision is logged so shadowed
//! names are visible to operators, but the rebuild is never failed over it.

use crate::note::ParsedNote;
use std::collections::HashMap;
use tracing::warn;

/// Mapping from lowercased name (slug, title, or alias) to canonical slug.
///
/// Owned by a single rebuild cycle: populated for every existing note before
/// any cross-reference resolution begins, then extended during resolution as
/// stub identifiers are synthesized.
#[derive(Debug, Clone, Default)]
pub struct NameResolutionTable {
    names: HashMap<String, String>,
}

impl NameResolutionTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a name mapping. Names are lowercased on entry.
    pub fn register(&mut self, name: &str, slug: &str) {
        let key = name.to_lowercase();
        if let Some(previous) = self.names.get(&key) {
            if previous != slug {
                warn!(
                    name = %key,
                    previous = %previous,
                    now = %slug,
                    "name registered by multiple notes; later registration wins"
                );
            }
        }
        self.names.insert(key, slug.to_string());
    }

    /// Register all spellings of a note: its own slug, its title, then each
    /// alias. The slug always maps to itself.
    pub fn register_note(&mut self, note: &ParsedNote) {
        self.register(&note.slug, &note.slug);
        if let Some(title) = &note.frontmatter.title {
            self.register(title, &note.slug);
        }
        for alias in &note.aliases {
            self.register(alias, &note.slug);
        }
    }

    /// Look up a name, case-insensitively.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.names.get(&name.to_lowercase()).map(String::as_str)
    }

    /// Whether any spelling resolves to the given name.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(&name.to_lowercase())
    }

    /// Number of registered spellings.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

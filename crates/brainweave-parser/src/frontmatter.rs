//! YAML frontmatter extraction.
//!
//! Notes may start with a `---` fenced YAML header carrying the title and
//! aliases. A header that fails to parse degrades to no frontmatter rather
//! than failing the note.

use brainweave_core::Frontmatter;
use tracing::warn;

/// Split raw note content into its YAML header (if any) and the body.
///
/// The header must start at the first byte of the file.
pub fn split(raw: &str) -> (Option<&str>, &str) {
    if let Some(rest) = raw.strip_prefix("---\n") {
        if let Some(end) = rest.find("\n---\n") {
            return (Some(&rest[..end]), &rest[end + 5..]);
        }
        if let Some(stripped) = rest.strip_suffix("\n---") {
            // Header fence closes at end-of-file with no trailing newline.
            return (Some(stripped), "");
        }
    }
    (None, raw)
}

/// Extract frontmatter and body from raw note content.
///
/// Unparsable YAML is reported once and treated as an absent header; the
/// body keeps the full file in that case so no content is lost.
pub fn parse(slug: &str, raw: &str) -> (Frontmatter, String) {
    match split(raw) {
        (Some(yaml), body) => match serde_yaml::from_str::<Frontmatter>(yaml) {
            Ok(frontmatter) => (frontmatter, body.to_string()),
            Err(err) => {
                warn!(note = %slug, error = %err, "unparsable frontmatter; treating note as headerless");
                (Frontmatter::default(), raw.to_string())
            }
        },
        (None, body) => (Frontmatter::default(), body.to_string()),
    }
}

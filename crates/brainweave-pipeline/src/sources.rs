//! Note source loading: the directory-scan collaborator.

use crate::Result;
use brainweave_core::{slug, BrainConfig, NoteSource};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Custom naming function, used in place of the slug normalizer when
/// configured.
pub type SlugFn = dyn Fn(&str) -> String + Send + Sync;

fn build_exclusions(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

/// Read every note file in the configured directory.
///
/// The directory is created if missing. Files are taken in filename order
/// for deterministic slugs when two spellings collide; non-matching
/// extensions and excluded patterns are skipped, and an unreadable file is
/// skipped with a warning rather than failing the rebuild.
pub fn load_note_sources(config: &BrainConfig, slugger: Option<&SlugFn>) -> Result<Vec<NoteSource>> {
    fs::create_dir_all(&config.notes_directory)?;
    let exclusions = build_exclusions(&config.exclude)?;

    let mut paths: Vec<_> = fs::read_dir(&config.notes_directory)?
        .collect::<std::io::Result<Vec<_>>>()?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    paths.sort();

    let mut sources = Vec::with_capacity(paths.len());
    for path in paths {
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !config.matches_extension(file_name) {
            continue;
        }
        if exclusions.is_match(file_name) {
            debug!(file = %file_name, "excluded by pattern");
            continue;
        }

        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(file = %path.display(), error = %err, "skipping unreadable note");
                continue;
            }
        };

        let stem = stem_of(&path);
        let note_slug = match slugger {
            Some(custom) => custom(stem),
            None => slug::generate(stem),
        };
        sources.push(NoteSource {
            slug: note_slug,
            path,
            raw,
        });
    }

    Ok(sources)
}

fn stem_of(path: &Path) -> &str {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or_default()
}

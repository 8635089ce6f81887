//! Link rewriting: replace reference markers with navigable markdown links.
//!
//! Two independent passes, brackets then hashtags, each collecting the
//! *unique* markers of the input and substituting every occurrence of each
//! resolved marker literally. Unresolved markers are left untouched, so a
//! reference that maps to nothing degrades to its original text.

use brainweave_core::{NameResolutionTable, OrderedSet};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static BRACKET_INCLUSIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[.*?\]\]").expect("inclusive bracket regex"));

static HASHTAG_INCLUSIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)(^|\s)(#\w+)").expect("inclusive hashtag regex"));

/// Rewriting switches, mirroring the configuration surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct RewriteOptions {
    /// Run the hashtag pass.
    pub linkify_hashtags: bool,
    /// Use the inner text as the link label instead of the whole marker.
    pub hide_double_brackets: bool,
}

/// Rewrite every resolvable reference marker in `text` into a markdown link.
///
/// Internal targets link under `root_path`; externally resolved names link
/// to their absolute URL from `external_map` (keys lowercased). Hashtag
/// links are root-anchored and always keep the `#` in their label.
pub fn rewrite_links(
    text: &str,
    table: &NameResolutionTable,
    external_map: &HashMap<String, String>,
    root_path: &str,
    options: RewriteOptions,
) -> String {
    let mut output = rewrite_brackets(text, table, external_map, root_path, options);
    if options.linkify_hashtags {
        output = rewrite_hashtags(&output, table, external_map, root_path);
    }
    output
}

fn rewrite_brackets(
    text: &str,
    table: &NameResolutionTable,
    external_map: &HashMap<String, String>,
    root_path: &str,
    options: RewriteOptions,
) -> String {
    let markers: OrderedSet<&str> = BRACKET_INCLUSIVE
        .find_iter(text)
        .map(|m| m.as_str())
        .collect();

    let mut output = text.to_string();
    for marker in markers.iter() {
        let inner = &marker[2..marker.len() - 2];
        let label = if options.hide_double_brackets { inner } else { marker };
        let name = inner.to_lowercase();

        if let Some(slug) = table.resolve(&name) {
            let linkified = format!("[{label}]({root_path}{slug})");
            output = output.replace(marker, &linkified);
        } else if let Some(url) = external_map.get(&name) {
            let linkified = format!("[{label}]({url})");
            output = output.replace(marker, &linkified);
        }
    }
    output
}

fn rewrite_hashtags(
    text: &str,
    table: &NameResolutionTable,
    external_map: &HashMap<String, String>,
    root_path: &str,
) -> String {
    // Hashtag links are site-absolute regardless of how root_path is given.
    let anchored_root = if root_path.starts_with('/') {
        root_path.to_string()
    } else {
        format!("/{root_path}")
    };

    // Boundary-aware replacement: the captured lead-in (line start or
    // whitespace) is kept, so `in#fix` is never rewritten.
    HASHTAG_INCLUSIVE
        .replace_all(text, |cap: &regex::Captures| {
            let boundary = &cap[1];
            let marker = &cap[2];
            let name = marker[1..].to_lowercase();

            if let Some(slug) = table.resolve(&name) {
                format!("{boundary}[{marker}]({anchored_root}{slug})")
            } else if let Some(url) = external_map.get(&name) {
                format!("{boundary}[{marker}]({url})")
            } else {
                cap[0].to_string()
            }
        })
        .into_owned()
}
